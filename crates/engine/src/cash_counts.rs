//! Counted banknotes and coins, per currency and denomination.

use std::collections::BTreeMap;

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{Currency, EngineError, MoneyCents, ResultEngine};

/// Pieces counted for each `(currency, denomination)` pair.
///
/// Denominations that were never set count as 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CashCounts {
    counts: BTreeMap<(Currency, u32), u32>,
}

impl CashCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `count` pieces of `denomination`, replacing any previous count.
    pub fn set(&mut self, currency: Currency, denomination: u32, count: u32) -> ResultEngine<()> {
        if !currency.is_denomination(denomination) {
            return Err(EngineError::InvalidInput(format!(
                "{denomination} is not a {currency} denomination"
            )));
        }
        if count == 0 {
            self.counts.remove(&(currency, denomination));
        } else {
            self.counts.insert((currency, denomination), count);
        }
        Ok(())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, currency: Currency, denomination: u32, count: u32) -> ResultEngine<Self> {
        self.set(currency, denomination, count)?;
        Ok(self)
    }

    #[must_use]
    pub fn count(&self, currency: Currency, denomination: u32) -> u32 {
        self.counts
            .get(&(currency, denomination))
            .copied()
            .unwrap_or(0)
    }

    /// Weighted sum of the counted pieces of one currency.
    #[must_use]
    pub fn total(&self, currency: Currency) -> MoneyCents {
        currency
            .denominations()
            .iter()
            .map(|&d| currency.value_of(d, self.count(currency, d)))
            .sum()
    }

    /// Non-zero counts, ordered by currency then denomination.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, u32, u32)> + '_ {
        self.counts
            .iter()
            .map(|(&(currency, denomination), &count)| (currency, denomination, count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "cash_counts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub reconciliation_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub currency: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub denomination: i64,
    pub count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reconciliations::Entity",
        from = "Column::ReconciliationId",
        to = "super::reconciliations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Reconciliation,
}

impl Related<super::reconciliations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reconciliation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl CashCounts {
    pub(crate) fn to_active_models(&self, reconciliation_id: &str) -> Vec<ActiveModel> {
        self.iter()
            .map(|(currency, denomination, count)| ActiveModel {
                reconciliation_id: ActiveValue::Set(reconciliation_id.to_string()),
                currency: ActiveValue::Set(currency.code().to_string()),
                denomination: ActiveValue::Set(i64::from(denomination)),
                count: ActiveValue::Set(i64::from(count)),
            })
            .collect()
    }

    pub(crate) fn from_models<'a>(models: impl IntoIterator<Item = &'a Model>) -> ResultEngine<Self> {
        let mut counts = Self::new();
        for model in models {
            let currency = Currency::try_from(model.currency.as_str())
                .map_err(|_| EngineError::InvalidData(format!("currency {}", model.currency)))?;
            let denomination = u32::try_from(model.denomination)
                .map_err(|_| EngineError::InvalidData("denomination".to_string()))?;
            let count = u32::try_from(model.count)
                .map_err(|_| EngineError::InvalidData("count".to_string()))?;
            counts
                .set(currency, denomination, count)
                .map_err(|err| EngineError::InvalidData(err.to_string()))?;
        }
        Ok(counts)
    }
}
