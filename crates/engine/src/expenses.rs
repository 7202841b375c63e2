//! Itemized expenses paid out of the register.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, MoneyCents, ResultEngine};

/// One expense line. Has no identity of its own: it only exists inside a
/// reconciliation, at a fixed position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseItem {
    pub concept: String,
    pub amount: MoneyCents,
}

impl ExpenseItem {
    pub fn new(concept: &str, amount: MoneyCents) -> Self {
        Self {
            concept: concept.to_string(),
            amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub reconciliation_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,
    pub concept: String,
    pub amount_minor: i64,
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

pub(crate) fn to_active_models(
    reconciliation_id: &str,
    items: &[ExpenseItem],
) -> ResultEngine<Vec<ActiveModel>> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let position = i32::try_from(position)
                .map_err(|_| EngineError::InvalidInput("too many expenses".to_string()))?;
            Ok(ActiveModel {
                reconciliation_id: ActiveValue::Set(reconciliation_id.to_string()),
                position: ActiveValue::Set(position),
                concept: ActiveValue::Set(item.concept.clone()),
                amount_minor: ActiveValue::Set(item.amount.cents()),
            })
        })
        .collect()
}

impl From<Model> for ExpenseItem {
    fn from(model: Model) -> Self {
        Self {
            concept: model.concept,
            amount: MoneyCents::new(model.amount_minor),
        }
    }
}
