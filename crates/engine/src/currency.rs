use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

/// Currency of a cash count.
///
/// A register holds two currencies: the local córdoba, in which every total
/// is reported, and the US dollar, which is converted into córdobas at the
/// configured exchange rate.
///
/// ## Minor units
///
/// Both currencies use 2 fraction digits, so amounts are stored as cents (see
/// `MoneyCents`). Banknotes and coins are counted in whole units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Nio,
    Usd,
}

impl Currency {
    /// Currency in which totals are reported.
    pub const LOCAL: Currency = Currency::Nio;
    /// Currency converted into the local one.
    pub const FOREIGN: Currency = Currency::Usd;

    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Nio => "NIO",
            Currency::Usd => "USD",
        }
    }

    /// Symbol printed in front of amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Nio => "C$",
            Currency::Usd => "US$",
        }
    }

    /// Face values a clerk can count, in ascending order.
    #[must_use]
    pub const fn denominations(self) -> &'static [u32] {
        match self {
            Currency::Nio => &[1, 5, 10, 20, 50, 100, 500],
            Currency::Usd => &[1, 5, 10, 20, 50, 100],
        }
    }

    #[must_use]
    pub fn is_denomination(self, value: u32) -> bool {
        self.denominations().contains(&value)
    }

    /// Returns the value of `count` pieces of a denomination.
    #[must_use]
    pub fn value_of(self, denomination: u32, count: u32) -> MoneyCents {
        MoneyCents::from_units(i64::from(denomination) * i64::from(count))
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "NIO" => Ok(Currency::Nio),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::InvalidInput(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
