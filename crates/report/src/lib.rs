//! Printable summary of a reconciliation.
//!
//! The summary only presents values already stored on the record; nothing is
//! recomputed here.

use engine::{Currency, Reconciliation};

pub use pdf::{Font, PAGE_HEIGHT, PAGE_WIDTH, Page};

mod pdf;

pub const TITLE: &str = "ARQUEO - Sistema de Gestión Financiera";

const MARGIN_LEFT: f32 = 50.0;
const MARGIN_BOTTOM: f32 = 50.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const DETAIL_SIZE: f32 = 10.0;

/// One line of the summary with the vertical space consumed before it.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub text: String,
    pub font: Font,
    pub size: f32,
    pub gap_before: f32,
}

impl Line {
    fn new(text: String, font: Font, size: f32, gap_before: f32) -> Self {
        Self {
            text,
            font,
            size,
            gap_before,
        }
    }

    fn body(text: String) -> Self {
        Self::new(text, Font::Regular, BODY_SIZE, 20.0)
    }
}

/// Lines of the summary, top to bottom.
///
/// Header (store, responsible, timestamp), the amounts, the grand total in
/// bold, then the expense detail.
pub fn summary_lines(rec: &Reconciliation) -> Vec<Line> {
    let local = Currency::LOCAL;
    let totals = &rec.totals;

    let mut lines = vec![
        Line::new(TITLE.to_string(), Font::Bold, TITLE_SIZE, 50.0),
        Line::new(format!("Tienda: {}", rec.store), Font::Regular, BODY_SIZE, 50.0),
        Line::body(format!("Responsable: {}", rec.responsible)),
        Line::body(format!(
            "Fecha: {}",
            rec.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )),
        Line::new(
            format!("Fondo Inicial: {}", rec.opening_float.display_in(local)),
            Font::Regular,
            BODY_SIZE,
            40.0,
        ),
        Line::body(format!(
            "Venta con Tarjetas: {}",
            rec.card_sales.display_in(local)
        )),
        Line::body(format!(
            "Total Córdobas: {}",
            totals.local_currency_total.display_in(local)
        )),
        Line::body(format!(
            "Total Dólares: {} ({}) a {} {} por {}",
            totals.foreign_currency_total.display_in(Currency::FOREIGN),
            totals.foreign_in_local_total.display_in(local),
            rec.exchange_rate,
            local.symbol(),
            Currency::FOREIGN.symbol(),
        )),
        Line::body(format!(
            "Total Gastos: {}",
            totals.expenses_total.display_in(local)
        )),
        Line::new(
            format!("TOTAL FINAL: {}", totals.grand_total.display_in(local)),
            Font::Bold,
            BODY_SIZE,
            20.0,
        ),
    ];

    if !rec.expenses.is_empty() {
        lines.push(Line::new(
            "Detalle de gastos:".to_string(),
            Font::Bold,
            DETAIL_SIZE,
            40.0,
        ));
        for item in &rec.expenses {
            lines.push(Line::new(
                format!("- {}: {}", item.concept, item.amount.display_in(local)),
                Font::Regular,
                DETAIL_SIZE,
                14.0,
            ));
        }
    }

    lines
}

/// Renders the one-page PDF summary.
///
/// Expense lines that do not fit the page are collapsed into a final
/// "... y N más" line.
pub fn render_pdf(rec: &Reconciliation) -> Vec<u8> {
    let lines = summary_lines(rec);
    let mut page = Page::new();
    let mut y = PAGE_HEIGHT;

    for (i, line) in lines.iter().enumerate() {
        let remaining = lines.len() - i;
        if remaining > 1 && y - 2.0 * line.gap_before < MARGIN_BOTTOM {
            y -= line.gap_before;
            page.text(
                MARGIN_LEFT,
                y,
                Font::Regular,
                DETAIL_SIZE,
                &format!("... y {remaining} más"),
            );
            break;
        }
        y -= line.gap_before;
        page.text(MARGIN_LEFT, y, line.font, line.size, &line.text);
    }

    page.finish()
}

/// Download name: `arqueo_<store>_<id>.pdf`, store reduced to safe characters.
pub fn filename(rec: &Reconciliation) -> String {
    let store: String = rec
        .store
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("arqueo_{store}_{}.pdf", rec.id)
}
