use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "arqueo={level},server={level},engine={level},report={level}",
            level = settings.app.level
        ))
        .init();

    let exchange_rate = match settings.app.exchange_rate.as_deref() {
        Some(raw) => raw.parse::<engine::ExchangeRate>()?,
        None => engine::ExchangeRate::default(),
    };

    let server = settings.server;
    tracing::info!("Opening database {:?}...", server.database);
    let db = parse_database(&server.database).await?;

    let engine = engine::Engine::builder()
        .database(db)
        .exchange_rate(exchange_rate)
        .build()
        .await?;

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let options = server::ServerOptions {
        permissive_cors: server.cors,
    };
    if let Err(err) = server::run_with_listener(engine, listener, options).await {
        tracing::error!("server failed: {err}");
        return Err(err.into());
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
