//! Initial schema migration - creates all tables from scratch.
//!
//! - `reconciliations`: one row per submitted cash count, with its totals
//! - `cash_counts`: counted pieces per currency and denomination
//! - `expenses`: ordered expense lines of a reconciliation

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Reconciliations {
    Table,
    Id,
    Store,
    Responsible,
    OccurredAt,
    OpeningFloatMinor,
    CardSalesMinor,
    ExchangeRate,
    LocalTotalMinor,
    ForeignTotalMinor,
    ForeignInLocalMinor,
    ExpensesTotalMinor,
    GrandTotalMinor,
}

#[derive(Iden)]
enum CashCounts {
    Table,
    ReconciliationId,
    Currency,
    Denomination,
    Count,
}

#[derive(Iden)]
enum Expenses {
    Table,
    ReconciliationId,
    Position,
    Concept,
    AmountMinor,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Reconciliations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Reconciliations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reconciliations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reconciliations::Store).string().not_null())
                    .col(
                        ColumnDef::new(Reconciliations::Responsible)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reconciliations::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reconciliations::OpeningFloatMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reconciliations::CardSalesMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reconciliations::ExchangeRate)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reconciliations::LocalTotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reconciliations::ForeignTotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reconciliations::ForeignInLocalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reconciliations::ExpensesTotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reconciliations::GrandTotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-reconciliations-occurred_at")
                    .table(Reconciliations::Table)
                    .col(Reconciliations::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Cash counts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CashCounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashCounts::ReconciliationId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashCounts::Currency).string().not_null())
                    .col(
                        ColumnDef::new(CashCounts::Denomination)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashCounts::Count).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(CashCounts::ReconciliationId)
                            .col(CashCounts::Currency)
                            .col(CashCounts::Denomination),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_counts-reconciliation_id")
                            .from(CashCounts::Table, CashCounts::ReconciliationId)
                            .to(Reconciliations::Table, Reconciliations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::ReconciliationId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Position).integer().not_null())
                    .col(ColumnDef::new(Expenses::Concept).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Expenses::ReconciliationId)
                            .col(Expenses::Position),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-reconciliation_id")
                            .from(Expenses::Table, Expenses::ReconciliationId)
                            .to(Reconciliations::Table, Reconciliations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CashCounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reconciliations::Table).to_owned())
            .await?;
        Ok(())
    }
}
