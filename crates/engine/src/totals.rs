//! Derived totals of a reconciliation.
//!
//! Everything here is pure arithmetic on integer cents: no I/O, no clock, no
//! failure path. Absent counts and amounts are zero by construction.
//!
//! ```text
//! local_currency_total   = Σ NIO count × denomination
//! foreign_currency_total = Σ USD count × denomination
//! foreign_in_local_total = foreign_currency_total × rate
//! expenses_total         = Σ expense amounts
//! grand_total            = opening_float + card_sales + local_currency_total
//!                          + foreign_in_local_total − expenses_total
//! ```

use crate::{Currency, ExchangeRate, MoneyCents, ReconciliationInput};

/// The five computed fields of a reconciliation.
///
/// `foreign_currency_total` is expressed in the foreign currency; every other
/// field is in the local one. `grand_total` may be negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub local_currency_total: MoneyCents,
    pub foreign_currency_total: MoneyCents,
    pub foreign_in_local_total: MoneyCents,
    pub expenses_total: MoneyCents,
    pub grand_total: MoneyCents,
}

/// Computes the totals of `input` converting foreign cash at `rate`.
#[must_use]
pub fn compute_totals(input: &ReconciliationInput, rate: ExchangeRate) -> Totals {
    let local_currency_total = input.cash_counts.total(Currency::LOCAL);
    let foreign_currency_total = input.cash_counts.total(Currency::FOREIGN);
    let foreign_in_local_total = rate.convert(foreign_currency_total);
    let expenses_total: MoneyCents = input.expenses.iter().map(|e| e.amount).sum();

    let grand_total = input.opening_float + input.card_sales + local_currency_total
        + foreign_in_local_total
        - expenses_total;

    Totals {
        local_currency_total,
        foreign_currency_total,
        foreign_in_local_total,
        expenses_total,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{CashCounts, ExpenseItem};

    fn scenario() -> ReconciliationInput {
        let mut counts = CashCounts::new();
        for &d in Currency::Nio.denominations() {
            counts.set(Currency::Nio, d, 1).unwrap();
        }
        counts.set(Currency::Usd, 1, 5).unwrap();
        counts.set(Currency::Usd, 5, 2).unwrap();
        counts.set(Currency::Usd, 10, 1).unwrap();

        ReconciliationInput {
            store: "Rusti-K".to_string(),
            responsible: "Juan".to_string(),
            opening_float: MoneyCents::from_units(1000),
            card_sales: MoneyCents::from_units(500),
            cash_counts: counts,
            expenses: vec![
                ExpenseItem::new("Combustible", MoneyCents::from_units(100)),
                ExpenseItem::new("Mantenimiento", MoneyCents::from_units(50)),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn reference_scenario() {
        let totals = compute_totals(&scenario(), ExchangeRate::DEFAULT);

        assert_eq!(totals.local_currency_total, MoneyCents::from_units(686));
        assert_eq!(totals.foreign_currency_total, MoneyCents::from_units(25));
        assert_eq!(totals.foreign_in_local_total, MoneyCents::new(91_250));
        assert_eq!(totals.expenses_total, MoneyCents::from_units(150));
        assert_eq!(totals.grand_total, MoneyCents::new(294_850));
    }

    #[test]
    fn empty_input_is_all_zero() {
        let totals = compute_totals(&ReconciliationInput::default(), ExchangeRate::DEFAULT);
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn empty_expenses_total_is_zero() {
        let mut input = scenario();
        input.expenses.clear();
        let totals = compute_totals(&input, ExchangeRate::DEFAULT);
        assert_eq!(totals.expenses_total, MoneyCents::ZERO);
    }

    #[test]
    fn local_total_is_exact_weighted_sum() {
        for count in [0u32, 1, 7, 1_000, 65_535] {
            let mut counts = CashCounts::new();
            for &d in Currency::Nio.denominations() {
                counts.set(Currency::Nio, d, count + d).unwrap();
            }
            let input = ReconciliationInput {
                cash_counts: counts,
                ..Default::default()
            };
            let expected: i64 = Currency::Nio
                .denominations()
                .iter()
                .map(|&d| i64::from(count + d) * i64::from(d) * 100)
                .sum();
            let totals = compute_totals(&input, ExchangeRate::DEFAULT);
            assert_eq!(totals.local_currency_total.cents(), expected);
        }
    }

    #[test]
    fn foreign_in_local_follows_rate() {
        let input = scenario();
        for rate in [dec!(1), dec!(36.5), dec!(36.6243)] {
            let rate = ExchangeRate::new(rate).unwrap();
            let totals = compute_totals(&input, rate);
            assert_eq!(
                totals.foreign_in_local_total,
                rate.convert(totals.foreign_currency_total)
            );
        }
        let totals = compute_totals(&input, ExchangeRate::new(dec!(36.6243)).unwrap());
        // 25 × 36.6243 = 915.6075
        assert_eq!(totals.foreign_in_local_total, MoneyCents::new(91_561));
    }

    #[test]
    fn largest_counts_at_largest_rate_stay_exact() {
        let mut counts = CashCounts::new();
        for currency in [Currency::Nio, Currency::Usd] {
            for &d in currency.denominations() {
                counts.set(currency, d, u32::MAX).unwrap();
            }
        }
        let input = ReconciliationInput {
            opening_float: MoneyCents::new(1_000_000_000_000),
            card_sales: MoneyCents::new(1_000_000_000_000),
            cash_counts: counts,
            ..Default::default()
        };
        let rate = ExchangeRate::new(ExchangeRate::MAX).unwrap();

        let totals = compute_totals(&input, rate);
        let foreign = totals.foreign_currency_total.cents();
        assert_eq!(foreign, 186 * i64::from(u32::MAX) * 100);
        assert_eq!(totals.foreign_in_local_total.cents(), foreign * 10_000);
        assert_eq!(
            totals.grand_total.cents(),
            2_000_000_000_000 + totals.local_currency_total.cents() + foreign * 10_000
        );
    }

    #[test]
    fn grand_total_is_additive_in_opening_float() {
        let base = scenario();
        let before = compute_totals(&base, ExchangeRate::DEFAULT).grand_total;
        for delta in [1i64, 99, 123_456] {
            let mut input = base.clone();
            input.opening_float += MoneyCents::new(delta);
            let after = compute_totals(&input, ExchangeRate::DEFAULT).grand_total;
            assert_eq!(after - before, MoneyCents::new(delta));
        }
    }

    #[test]
    fn grand_total_can_go_negative() {
        let input = ReconciliationInput {
            opening_float: MoneyCents::from_units(100),
            expenses: vec![ExpenseItem::new("Alquiler", MoneyCents::from_units(350))],
            ..Default::default()
        };
        let totals = compute_totals(&input, ExchangeRate::DEFAULT);
        assert_eq!(totals.grand_total, MoneyCents::from_units(-250));
        assert!(totals.grand_total.is_negative());
    }
}
