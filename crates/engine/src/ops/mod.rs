use sea_orm::DatabaseConnection;

use crate::{ExchangeRate, ResultEngine};

mod reconciliations;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    exchange_rate: ExchangeRate,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Rate applied to foreign cash in new reconciliations.
    pub fn exchange_rate(&self) -> ExchangeRate {
        self.exchange_rate
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    exchange_rate: ExchangeRate,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the default exchange rate
    pub fn exchange_rate(mut self, rate: ExchangeRate) -> EngineBuilder {
        self.exchange_rate = rate;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            exchange_rate: self.exchange_rate,
        })
    }
}
