//! Invoice billing arithmetic tests
//!
//! Line and invoice totals are computed server-side from the submitted items;
//! these tests pin down the formulas the purchase and sale services rely on.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::models::{compute_invoice_totals, compute_line_amounts, LineAmounts};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_plain_line_total() {
        let line = compute_line_amounts(4, dec("25.0"), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(line.net, dec("100.0"));
        assert_eq!(line.tax_amount, Decimal::ZERO);
        assert_eq!(line.total, dec("100.0"));
    }

    #[test]
    fn test_line_discount_applies_before_tax() {
        // 10 x 50 = 500, minus 100 discount = 400, plus 18% tax = 472
        let line = compute_line_amounts(10, dec("50.0"), dec("100.0"), dec("18"));
        assert_eq!(line.net, dec("400.0"));
        assert_eq!(line.tax_amount, dec("72.00"));
        assert_eq!(line.total, dec("472.00"));
    }

    #[test]
    fn test_invoice_totals_sum_lines() {
        let lines = [
            compute_line_amounts(2, dec("100.0"), Decimal::ZERO, Decimal::ZERO),
            compute_line_amounts(3, dec("40.0"), Decimal::ZERO, Decimal::ZERO),
        ];
        let totals = compute_invoice_totals(
            &lines,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        );

        assert_eq!(totals.subtotal, dec("320.0"));
        assert_eq!(totals.total_amount, dec("320.0"));
    }

    #[test]
    fn test_invoice_level_charges() {
        let lines = [compute_line_amounts(1, dec("1000.0"), Decimal::ZERO, dec("12"))];
        // subtotal 1000, tax 120, -50 discount, +30 shipping, +20 other, -0.25 round off
        let totals =
            compute_invoice_totals(&lines, dec("50.0"), dec("30.0"), dec("20.0"), dec("-0.25"));

        assert_eq!(totals.subtotal, dec("1000.0"));
        assert_eq!(totals.tax_amount, dec("120.00"));
        assert_eq!(totals.total_amount, dec("1119.75"));
    }

    #[test]
    fn test_empty_invoice_is_zero() {
        let totals = compute_invoice_totals(
            &[],
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total_amount, Decimal::ZERO);
    }

    /// A sale's total comes from its items, not from the request body
    #[test]
    fn test_sale_total_computed_from_items() {
        let lines = [compute_line_amounts(4, dec("75.0"), Decimal::ZERO, Decimal::ZERO)];
        let totals = compute_invoice_totals(
            &lines,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert_eq!(totals.total_amount, dec("300.0"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating valid quantities
    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=1000
    }

    /// Strategy for generating valid unit prices
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 1000.00
    }

    /// Strategy for generating tax rates in [0, 100]
    fn tax_rate_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating a batch of undiscounted lines
    fn lines_strategy() -> impl Strategy<Value = Vec<LineAmounts>> {
        prop::collection::vec(
            (quantity_strategy(), price_strategy(), tax_rate_strategy()).prop_map(
                |(quantity, price, tax_rate)| {
                    compute_line_amounts(quantity, price, Decimal::ZERO, tax_rate)
                },
            ),
            1..10,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Line total is net plus tax, and net is quantity x price - discount
        #[test]
        fn prop_line_total_decomposition(
            quantity in quantity_strategy(),
            price in price_strategy(),
            tax_rate in tax_rate_strategy()
        ) {
            let line = compute_line_amounts(quantity, price, Decimal::ZERO, tax_rate);

            prop_assert_eq!(line.net, Decimal::from(quantity) * price);
            prop_assert_eq!(line.total, line.net + line.tax_amount);
        }

        /// An undiscounted, untaxed line never loses money
        #[test]
        fn prop_line_total_non_negative(
            quantity in quantity_strategy(),
            price in price_strategy()
        ) {
            let line = compute_line_amounts(quantity, price, Decimal::ZERO, Decimal::ZERO);
            prop_assert!(line.total >= Decimal::ZERO);
        }

        /// Invoice subtotal and tax are the sums of the line amounts
        #[test]
        fn prop_invoice_totals_additive(lines in lines_strategy()) {
            let totals = compute_invoice_totals(
                &lines,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
            );

            let expected_subtotal: Decimal = lines.iter().map(|l| l.net).sum();
            let expected_tax: Decimal = lines.iter().map(|l| l.tax_amount).sum();

            prop_assert_eq!(totals.subtotal, expected_subtotal);
            prop_assert_eq!(totals.tax_amount, expected_tax);
            prop_assert_eq!(totals.total_amount, expected_subtotal + expected_tax);
        }

        /// Invoice-level charges shift the grand total by exactly their sum
        #[test]
        fn prop_charges_shift_total(
            lines in lines_strategy(),
            shipping in price_strategy(),
            other in price_strategy()
        ) {
            let base = compute_invoice_totals(
                &lines,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
            );
            let charged = compute_invoice_totals(
                &lines,
                Decimal::ZERO,
                shipping,
                other,
                Decimal::ZERO,
            );

            prop_assert_eq!(charged.total_amount, base.total_amount + shipping + other);
        }
    }
}
