//! Reconciliation ("arqueo") API endpoints

use api_types::{
    Welcome,
    reconciliation::{
        CashCounts, ExpenseItem, PdfDocument, Reconciliation, ReconciliationNew,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use base64::Engine as _;
use chrono::Utc;
use engine::{Currency, EngineError, MoneyCents};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

const WELCOME: &str = "ARQUEO API - Sistema de Gestión Financiera";

fn map_amount(value: Decimal, label: &str) -> Result<MoneyCents, EngineError> {
    MoneyCents::try_from_decimal(value).map_err(|err| match err {
        EngineError::InvalidAmount(msg) => EngineError::InvalidAmount(format!("{label}: {msg}")),
        other => other,
    })
}

fn map_counts(counts: &CashCounts) -> Result<engine::CashCounts, EngineError> {
    let mut mapped = engine::CashCounts::new();
    for (currency, entries) in [(Currency::Nio, &counts.nio), (Currency::Usd, &counts.usd)] {
        for (&denomination, &count) in entries {
            mapped.set(currency, denomination, count)?;
        }
    }
    Ok(mapped)
}

fn map_input(payload: ReconciliationNew) -> Result<engine::ReconciliationInput, EngineError> {
    let expenses = payload
        .expenses
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Ok(engine::ExpenseItem::new(
                &item.concept,
                map_amount(item.amount, &format!("expenses[{i}].amount"))?,
            ))
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(engine::ReconciliationInput {
        store: payload.store,
        responsible: payload.responsible,
        timestamp: payload.timestamp.map(|dt| dt.with_timezone(&Utc)),
        opening_float: map_amount(payload.opening_float, "opening_float")?,
        card_sales: map_amount(payload.card_sales, "card_sales")?,
        cash_counts: map_counts(&payload.cash_counts)?,
        expenses,
    })
}

fn map_view(rec: engine::Reconciliation) -> Reconciliation {
    let mut cash_counts = CashCounts::default();
    for (currency, denomination, count) in rec.cash_counts.iter() {
        let target = match currency {
            Currency::Nio => &mut cash_counts.nio,
            Currency::Usd => &mut cash_counts.usd,
        };
        target.insert(denomination, count);
    }

    Reconciliation {
        id: rec.id,
        store: rec.store,
        responsible: rec.responsible,
        timestamp: rec.timestamp,
        opening_float: rec.opening_float.to_decimal(),
        card_sales: rec.card_sales.to_decimal(),
        cash_counts,
        expenses: rec
            .expenses
            .into_iter()
            .map(|item| ExpenseItem {
                concept: item.concept,
                amount: item.amount.to_decimal(),
            })
            .collect(),
        exchange_rate: rec.exchange_rate.value(),
        local_currency_total: rec.totals.local_currency_total.to_decimal(),
        foreign_currency_total: rec.totals.foreign_currency_total.to_decimal(),
        foreign_in_local_total: rec.totals.foreign_in_local_total.to_decimal(),
        expenses_total: rec.totals.expenses_total.to_decimal(),
        grand_total: rec.totals.grand_total.to_decimal(),
    }
}

/// Ids that do not parse were never created either.
fn parse_id(raw: &str) -> Result<Uuid, EngineError> {
    Uuid::parse_str(raw).map_err(|_| EngineError::KeyNotFound(raw.to_string()))
}

async fn find(state: &ServerState, raw_id: &str) -> Result<engine::Reconciliation, ServerError> {
    let id = parse_id(raw_id)?;
    match state.engine.reconciliation(id).await {
        Ok(rec) => Ok(rec),
        Err(err @ EngineError::KeyNotFound(_)) => {
            tracing::debug!("reconciliation {raw_id} not found");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn root() -> Json<Welcome> {
    Json(Welcome {
        message: WELCOME.to_string(),
    })
}

/// Handle requests for creating a new reconciliation
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReconciliationNew>,
) -> Result<Json<Reconciliation>, ServerError> {
    let input = map_input(payload)?;
    let rec = state.engine.create_reconciliation(input).await?;
    tracing::info!(
        "created reconciliation {} for {} (grand total {})",
        rec.id,
        rec.store,
        rec.totals.grand_total
    );
    Ok(Json(map_view(rec)))
}

/// Handle requests for listing reconciliations, newest first
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Reconciliation>>, ServerError> {
    let recs = state.engine.reconciliations().await?;
    Ok(Json(recs.into_iter().map(map_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Reconciliation>, ServerError> {
    let rec = find(&state, &id).await?;
    Ok(Json(map_view(rec)))
}

/// Render the summary and return it base64-encoded with its file name.
pub async fn pdf_base64(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<PdfDocument>, ServerError> {
    let rec = find(&state, &id).await?;
    let bytes = report::render_pdf(&rec);
    Ok(Json(PdfDocument {
        pdf_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        filename: report::filename(&rec),
    }))
}

/// Render the summary as a PDF attachment.
pub async fn pdf_download(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let rec = find(&state, &id).await?;
    let bytes = report::render_pdf(&rec);
    let disposition = format!("attachment; filename=\"{}\"", report::filename(&rec));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
