//! Payment status derivation tests
//!
//! The status of an invoice is a pure function of (paidAmount, totalAmount):
//! paid >= total -> paid, 0 < paid < total -> partial, otherwise unpaid.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::models::{balance_amount, PaymentStatus};
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
    fn test_zero_paid_is_unpaid() {
        assert_eq!(
            PaymentStatus::classify(Decimal::ZERO, dec("500.0")),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_partial_payment() {
        assert_eq!(
            PaymentStatus::classify(dec("0.01"), dec("500.0")),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentStatus::classify(dec("499.99"), dec("500.0")),
            PaymentStatus::Partial
        );
    }

    #[test]
    fn test_paid_exactly_total() {
        // Paying the exact total settles the invoice
        assert_eq!(
            PaymentStatus::classify(dec("500.0"), dec("500.0")),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_overpayment_is_paid() {
        assert_eq!(
            PaymentStatus::classify(dec("600.0"), dec("500.0")),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_zero_total_invoice_reads_paid() {
        // paid >= total wins over the zero check
        assert_eq!(
            PaymentStatus::classify(Decimal::ZERO, Decimal::ZERO),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(PaymentStatus::Unpaid.as_str(), "unpaid");
        assert_eq!(PaymentStatus::Partial.as_str(), "partial");
        assert_eq!(PaymentStatus::Paid.as_str(), "paid");
    }

    #[test]
    fn test_default_status_is_unpaid() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
    }

    /// No state is terminal: the status follows the paid amount both ways
    #[test]
    fn test_status_transitions_are_reversible() {
        let total = dec("100.0");

        let to_paid = PaymentStatus::classify(dec("100.0"), total);
        assert_eq!(to_paid, PaymentStatus::Paid);

        let back_to_partial = PaymentStatus::classify(dec("40.0"), total);
        assert_eq!(back_to_partial, PaymentStatus::Partial);

        let back_to_unpaid = PaymentStatus::classify(Decimal::ZERO, total);
        assert_eq!(back_to_unpaid, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_balance_follows_payment() {
        let total = dec("750.0");
        assert_eq!(balance_amount(total, dec("250.0")), dec("500.0"));
        assert_eq!(balance_amount(total, total), Decimal::ZERO);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating non-negative amounts
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2)) // 0.00 to 100000.00
    }

    /// Strategy for generating positive invoice totals
    fn total_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Classification matches the three-way partition of the paid amount
        #[test]
        fn prop_classification_partition(
            paid in amount_strategy(),
            total in total_strategy()
        ) {
            let status = PaymentStatus::classify(paid, total);

            if paid >= total {
                prop_assert_eq!(status, PaymentStatus::Paid);
            } else if paid > Decimal::ZERO {
                prop_assert_eq!(status, PaymentStatus::Partial);
            } else {
                prop_assert_eq!(status, PaymentStatus::Unpaid);
            }
        }

        /// Increasing the paid amount never moves the status backwards
        #[test]
        fn prop_status_monotonic_in_paid(
            paid in amount_strategy(),
            extra in amount_strategy(),
            total in total_strategy()
        ) {
            fn rank(s: PaymentStatus) -> u8 {
                match s {
                    PaymentStatus::Unpaid => 0,
                    PaymentStatus::Partial => 1,
                    PaymentStatus::Paid => 2,
                }
            }

            let before = PaymentStatus::classify(paid, total);
            let after = PaymentStatus::classify(paid + extra, total);

            prop_assert!(rank(after) >= rank(before));
        }

        /// Paying the full total always settles the invoice
        #[test]
        fn prop_full_payment_settles(total in total_strategy()) {
            prop_assert_eq!(
                PaymentStatus::classify(total, total),
                PaymentStatus::Paid
            );
        }

        /// Balance is total minus paid, and zero exactly when fully paid
        #[test]
        fn prop_balance_consistent_with_status(
            paid in amount_strategy(),
            total in total_strategy()
        ) {
            let balance = balance_amount(total, paid);

            prop_assert_eq!(balance, total - paid);

            if PaymentStatus::classify(paid, total) == PaymentStatus::Paid {
                prop_assert!(balance <= Decimal::ZERO);
            } else {
                prop_assert!(balance > Decimal::ZERO);
            }
        }
    }
}
