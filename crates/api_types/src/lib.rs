use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `GET /api/`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
}

pub mod reconciliation {
    use std::collections::BTreeMap;

    use super::*;

    /// Counted pieces keyed by face value, one map per currency.
    ///
    /// JSON keys are the denomination as a string: `{"nio": {"100": 3}}`.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct CashCounts {
        /// Córdoba banknotes and coins (1, 5, 10, 20, 50, 100, 500).
        pub nio: BTreeMap<u32, u32>,
        /// US dollar banknotes (1, 5, 10, 20, 50, 100).
        pub usd: BTreeMap<u32, u32>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseItem {
        pub concept: String,
        /// Amount in córdobas, at most two decimals. Defaults to 0.
        #[serde(default)]
        pub amount: Decimal,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ReconciliationNew {
        pub store: String,
        pub responsible: String,
        /// RFC3339 timestamp with a `Z` or `±hh:mm` offset, as sent by
        /// `Date.toISOString()`. Timestamps without an offset are rejected.
        /// Defaults to now.
        #[serde(default)]
        pub timestamp: Option<DateTime<FixedOffset>>,
        #[serde(default)]
        pub opening_float: Decimal,
        #[serde(default)]
        pub card_sales: Decimal,
        #[serde(default)]
        pub cash_counts: CashCounts,
        #[serde(default)]
        pub expenses: Vec<ExpenseItem>,
    }

    /// A stored reconciliation with its computed totals.
    ///
    /// Amounts are córdobas except `foreign_currency_total`, which is dollars.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Reconciliation {
        pub id: Uuid,
        pub store: String,
        pub responsible: String,
        pub timestamp: DateTime<Utc>,
        pub opening_float: Decimal,
        pub card_sales: Decimal,
        pub cash_counts: CashCounts,
        pub expenses: Vec<ExpenseItem>,
        /// Córdobas per dollar used for `foreign_in_local_total`.
        pub exchange_rate: Decimal,
        pub local_currency_total: Decimal,
        pub foreign_currency_total: Decimal,
        pub foreign_in_local_total: Decimal,
        pub expenses_total: Decimal,
        pub grand_total: Decimal,
    }

    /// Body of `POST /api/arqueo/{id}/pdf`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PdfDocument {
        pub pdf_base64: String,
        pub filename: String,
    }
}
