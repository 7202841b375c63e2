use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Reconciliation, ReconciliationInput, ResultEngine, cash_counts, expenses,
    reconciliations,
};

use super::{Engine, with_tx};

/// Upper bound on the records returned by a listing.
const LIST_LIMIT: u64 = 1000;

impl Engine {
    /// Validates `input`, computes its totals and persists the record.
    ///
    /// Record, cash counts and expense lines are written in one DB transaction.
    pub async fn create_reconciliation(
        &self,
        input: ReconciliationInput,
    ) -> ResultEngine<Reconciliation> {
        let reconciliation = Reconciliation::new(input, self.exchange_rate, Utc::now())?;
        let id = reconciliation.id.to_string();

        with_tx!(self, |db_tx| {
            reconciliations::ActiveModel::from(&reconciliation)
                .insert(&db_tx)
                .await?;
            for count in reconciliation.cash_counts.to_active_models(&id) {
                count.insert(&db_tx).await?;
            }
            for expense in expenses::to_active_models(&id, &reconciliation.expenses)? {
                expense.insert(&db_tx).await?;
            }
            Ok::<_, EngineError>(())
        })?;

        Ok(reconciliation)
    }

    /// Returns one reconciliation, or `KeyNotFound` for an unknown id.
    pub async fn reconciliation(&self, id: Uuid) -> ResultEngine<Reconciliation> {
        let key = id.to_string();
        let model = reconciliations::Entity::find_by_id(key.clone())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(key.clone()))?;

        let counts = cash_counts::Entity::find()
            .filter(cash_counts::Column::ReconciliationId.eq(key.clone()))
            .all(&self.database)
            .await?;
        let expenses = expenses::Entity::find()
            .filter(expenses::Column::ReconciliationId.eq(key))
            .order_by_asc(expenses::Column::Position)
            .all(&self.database)
            .await?;

        Reconciliation::from_models(model, &counts, expenses)
    }

    /// Returns stored reconciliations, most recent timestamp first.
    pub async fn reconciliations(&self) -> ResultEngine<Vec<Reconciliation>> {
        let models = reconciliations::Entity::find()
            .order_by_desc(reconciliations::Column::OccurredAt)
            .order_by_desc(reconciliations::Column::Id)
            .limit(LIST_LIMIT)
            .all(&self.database)
            .await?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();

        let mut counts_by_id: HashMap<String, Vec<cash_counts::Model>> = HashMap::new();
        for count in cash_counts::Entity::find()
            .filter(cash_counts::Column::ReconciliationId.is_in(ids.clone()))
            .all(&self.database)
            .await?
        {
            counts_by_id
                .entry(count.reconciliation_id.clone())
                .or_default()
                .push(count);
        }

        let mut expenses_by_id: HashMap<String, Vec<expenses::Model>> = HashMap::new();
        for expense in expenses::Entity::find()
            .filter(expenses::Column::ReconciliationId.is_in(ids))
            .all(&self.database)
            .await?
        {
            expenses_by_id
                .entry(expense.reconciliation_id.clone())
                .or_default()
                .push(expense);
        }

        models
            .into_iter()
            .map(|model| {
                let counts = counts_by_id.remove(&model.id).unwrap_or_default();
                let expenses = expenses_by_id.remove(&model.id).unwrap_or_default();
                Reconciliation::from_models(model, &counts, expenses)
            })
            .collect()
    }
}
