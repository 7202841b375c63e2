//! Cash-register reconciliation engine.
//!
//! Owns the domain types (money, currencies, counts, expenses), the totals
//! computation and the persistence of reconciliation records.

pub use cash_counts::CashCounts;
pub use currency::Currency;
pub use error::EngineError;
pub use exchange::ExchangeRate;
pub use expenses::ExpenseItem;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use reconciliations::{Reconciliation, ReconciliationInput};
pub use totals::{Totals, compute_totals};

mod cash_counts;
mod currency;
mod error;
mod exchange;
mod expenses;
mod money;
mod ops;
mod reconciliations;
mod totals;

type ResultEngine<T> = Result<T, EngineError>;
