//! Conversion of foreign cash into the local currency.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Local-currency units per one foreign-currency unit.
///
/// The rate is a single configured value; records store the rate they were
/// computed with so they stay reproducible after the configuration changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// 36.5 córdobas per US dollar.
    pub const DEFAULT: ExchangeRate = ExchangeRate(Decimal::from_parts(365, 0, 0, false, 1));

    /// Largest accepted rate. Keeps every grand total within `i64` cents for
    /// any combination of `u32` banknote counts.
    pub const MAX: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

    pub fn new(rate: Decimal) -> ResultEngine<Self> {
        if rate <= Decimal::ZERO {
            return Err(EngineError::InvalidInput(
                "exchange rate must be > 0".to_string(),
            ));
        }
        if rate > Self::MAX {
            return Err(EngineError::InvalidInput(format!(
                "exchange rate must be <= {}",
                Self::MAX
            )));
        }
        Ok(Self(rate.normalize()))
    }

    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Converts a foreign amount into local cents, rounding half away from zero.
    ///
    /// Saturates instead of failing: the totals computation has no error path.
    #[must_use]
    pub fn convert(self, foreign: MoneyCents) -> MoneyCents {
        let saturated = if foreign.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        };
        let cents = Decimal::from(foreign.cents())
            .checked_mul(self.0)
            .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|v| v.to_i64())
            .unwrap_or(saturated);
        MoneyCents::new(cents)
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ExchangeRate {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = Decimal::from_str(s.trim())
            .map_err(|_| EngineError::InvalidInput(format!("invalid exchange rate: {s}")))?;
        Self::new(rate)
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = EngineError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(value: ExchangeRate) -> Self {
        value.0
    }
}
