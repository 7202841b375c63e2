use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use engine::{Currency, Engine, Reconciliation};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "arqueo_admin")]
#[command(about = "Admin utilities for Arqueo (schema, inspection and export of reconciliations)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./arqueo.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the database schema.
    Migrate(Migrate),
    /// List reconciliations, newest first.
    List,
    /// Print the summary of one reconciliation.
    Show(ShowArgs),
    /// Write the PDF summary of one reconciliation.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct Migrate {
    #[command(subcommand)]
    command: MigrateCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum MigrateCommand {
    /// Apply all pending migrations.
    Up,
    /// Roll back the last applied migration.
    Down,
    /// Drop every table and apply all migrations again.
    Fresh,
    /// Print which migrations are applied.
    Status,
}

#[derive(Args, Debug)]
struct ShowArgs {
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long)]
    id: Uuid,
    /// Output path. Defaults to `arqueo_<store>_<id>.pdf` in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

async fn open_engine(database_url: &str) -> Result<Engine, Box<dyn Error + Send + Sync>> {
    let db = connect_db(database_url).await?;
    Ok(Engine::builder().database(db).build().await?)
}

async fn migrate(
    database_url: &str,
    command: MigrateCommand,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    match command {
        MigrateCommand::Up => Migrator::up(&db, None).await?,
        MigrateCommand::Down => Migrator::down(&db, Some(1)).await?,
        MigrateCommand::Fresh => Migrator::fresh(&db).await?,
        MigrateCommand::Status => Migrator::status(&db).await?,
    }
    Ok(())
}

fn list_row(rec: &Reconciliation) -> String {
    format!(
        "{}  {}  {:<20} {:<20} {:>16}",
        rec.id,
        rec.timestamp.format("%Y-%m-%d %H:%M"),
        rec.store,
        rec.responsible,
        rec.totals.grand_total.display_in(Currency::LOCAL)
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Migrate(Migrate { command }) => migrate(&cli.database_url, command).await?,
        Command::List => {
            let engine = open_engine(&cli.database_url).await?;
            let recs = engine.reconciliations().await?;
            if recs.is_empty() {
                println!("no reconciliations");
            }
            for rec in &recs {
                println!("{}", list_row(rec));
            }
        }
        Command::Show(args) => {
            let engine = open_engine(&cli.database_url).await?;
            let rec = engine.reconciliation(args.id).await?;
            for line in report::summary_lines(&rec) {
                println!("{}", line.text);
            }
        }
        Command::Export(args) => {
            let engine = open_engine(&cli.database_url).await?;
            let rec = engine.reconciliation(args.id).await?;
            let path = args
                .out
                .unwrap_or_else(|| PathBuf::from(report::filename(&rec)));
            std::fs::write(&path, report::render_pdf(&rec))?;
            println!("written: {}", path.display());
        }
    }

    Ok(())
}
