//! Reconciliation ("arqueo") records.
//!
//! A `Reconciliation` is created once from a `ReconciliationInput`, with its
//! totals computed before it is persisted, and never changes afterwards.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    CashCounts, EngineError, ExchangeRate, ExpenseItem, MoneyCents, ResultEngine,
    totals::{Totals, compute_totals},
};

/// What the clerk submits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconciliationInput {
    pub store: String,
    pub responsible: String,
    /// When the count took place. Defaults to the creation time.
    pub timestamp: Option<DateTime<Utc>>,
    pub opening_float: MoneyCents,
    pub card_sales: MoneyCents,
    pub cash_counts: CashCounts,
    pub expenses: Vec<ExpenseItem>,
}

/// A persisted reconciliation with its computed totals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub id: Uuid,
    pub store: String,
    pub responsible: String,
    pub timestamp: DateTime<Utc>,
    pub opening_float: MoneyCents,
    pub card_sales: MoneyCents,
    pub cash_counts: CashCounts,
    pub expenses: Vec<ExpenseItem>,
    pub exchange_rate: ExchangeRate,
    pub totals: Totals,
}

impl Reconciliation {
    /// Validates `input` and computes its totals.
    ///
    /// `now` fills in a missing timestamp.
    pub fn new(
        input: ReconciliationInput,
        rate: ExchangeRate,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let store = normalize_required(&input.store, "store")?;
        let responsible = normalize_required(&input.responsible, "responsible")?;
        require_non_negative(input.opening_float, "opening_float")?;
        require_non_negative(input.card_sales, "card_sales")?;

        let mut expenses = Vec::with_capacity(input.expenses.len());
        for (i, item) in input.expenses.iter().enumerate() {
            let concept = normalize_required(&item.concept, &format!("expenses[{i}].concept"))?;
            require_non_negative(item.amount, &format!("expenses[{i}].amount"))?;
            expenses.push(ExpenseItem {
                concept,
                amount: item.amount,
            });
        }

        let normalized = ReconciliationInput {
            store,
            responsible,
            timestamp: Some(input.timestamp.unwrap_or(now)),
            expenses,
            ..input
        };
        let totals = compute_totals(&normalized, rate);

        Ok(Self {
            id: Uuid::new_v4(),
            timestamp: normalized.timestamp.unwrap_or(now),
            store: normalized.store,
            responsible: normalized.responsible,
            opening_float: normalized.opening_float,
            card_sales: normalized.card_sales,
            cash_counts: normalized.cash_counts,
            expenses: normalized.expenses,
            exchange_rate: rate,
            totals,
        })
    }

    pub(crate) fn from_models(
        model: Model,
        counts: &[super::cash_counts::Model],
        expenses: Vec<super::expenses::Model>,
    ) -> ResultEngine<Self> {
        let id = Uuid::parse_str(&model.id).map_err(|_| {
            EngineError::InvalidData(format!("invalid reconciliation id {}", model.id))
        })?;
        let exchange_rate = model
            .exchange_rate
            .parse::<ExchangeRate>()
            .map_err(|err| EngineError::InvalidData(err.to_string()))?;
        let mut expenses = expenses;
        expenses.sort_by_key(|e| e.position);

        Ok(Self {
            id,
            store: model.store,
            responsible: model.responsible,
            timestamp: model.occurred_at,
            opening_float: MoneyCents::new(model.opening_float_minor),
            card_sales: MoneyCents::new(model.card_sales_minor),
            cash_counts: CashCounts::from_models(counts)?,
            expenses: expenses.into_iter().map(ExpenseItem::from).collect(),
            exchange_rate,
            totals: Totals {
                local_currency_total: MoneyCents::new(model.local_total_minor),
                foreign_currency_total: MoneyCents::new(model.foreign_total_minor),
                foreign_in_local_total: MoneyCents::new(model.foreign_in_local_minor),
                expenses_total: MoneyCents::new(model.expenses_total_minor),
                grand_total: MoneyCents::new(model.grand_total_minor),
            },
        })
    }
}

fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn require_non_negative(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidInput(format!("{label} must be >= 0")));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "reconciliations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub store: String,
    pub responsible: String,
    pub occurred_at: DateTimeUtc,
    pub opening_float_minor: i64,
    pub card_sales_minor: i64,
    pub exchange_rate: String,
    pub local_total_minor: i64,
    pub foreign_total_minor: i64,
    pub foreign_in_local_minor: i64,
    pub expenses_total_minor: i64,
    pub grand_total_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cash_counts::Entity")]
    CashCounts,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::cash_counts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashCounts.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Reconciliation> for ActiveModel {
    fn from(rec: &Reconciliation) -> Self {
        Self {
            id: ActiveValue::Set(rec.id.to_string()),
            store: ActiveValue::Set(rec.store.clone()),
            responsible: ActiveValue::Set(rec.responsible.clone()),
            occurred_at: ActiveValue::Set(rec.timestamp),
            opening_float_minor: ActiveValue::Set(rec.opening_float.cents()),
            card_sales_minor: ActiveValue::Set(rec.card_sales.cents()),
            exchange_rate: ActiveValue::Set(rec.exchange_rate.to_string()),
            local_total_minor: ActiveValue::Set(rec.totals.local_currency_total.cents()),
            foreign_total_minor: ActiveValue::Set(rec.totals.foreign_currency_total.cents()),
            foreign_in_local_minor: ActiveValue::Set(rec.totals.foreign_in_local_total.cents()),
            expenses_total_minor: ActiveValue::Set(rec.totals.expenses_total.cents()),
            grand_total_minor: ActiveValue::Set(rec.totals.grand_total.cents()),
        }
    }
}
