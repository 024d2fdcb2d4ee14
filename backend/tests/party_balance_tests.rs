//! Party balance adjustment tests
//!
//! The running balance starts at the opening balance and moves only through
//! the explicit add/subtract adjustment; invoices and payments never touch it.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::models::AdjustmentDirection;
use shared::validation::validate_amount;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Apply a manual balance adjustment, as the party service does
fn adjust_balance(
    balance: Decimal,
    amount: Decimal,
    direction: AdjustmentDirection,
) -> Result<Decimal, &'static str> {
    validate_amount(amount)?;
    Ok(match direction {
        AdjustmentDirection::Add => balance + amount,
        AdjustmentDirection::Subtract => balance - amount,
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_opening_balance_mirrors_into_current() {
        // Creation copies the opening balance into the running balance
        let opening_balance = dec("500.0");
        let current_balance = opening_balance;
        assert_eq!(current_balance, dec("500.0"));
    }

    /// Opening balance 500, subtract 200, current balance reads 300
    #[test]
    fn test_subtract_adjustment_scenario() {
        let balance = adjust_balance(dec("500.0"), dec("200.0"), AdjustmentDirection::Subtract)
            .unwrap();
        assert_eq!(balance, dec("300.0"));
    }

    #[test]
    fn test_add_adjustment() {
        let balance =
            adjust_balance(dec("300.0"), dec("150.0"), AdjustmentDirection::Add).unwrap();
        assert_eq!(balance, dec("450.0"));
    }

    #[test]
    fn test_balance_may_go_negative() {
        // A party owing more than their balance is a valid ledger state
        let balance =
            adjust_balance(dec("100.0"), dec("250.0"), AdjustmentDirection::Subtract).unwrap();
        assert_eq!(balance, dec("-150.0"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(adjust_balance(dec("100.0"), dec("-50.0"), AdjustmentDirection::Add).is_err());
    }

    #[test]
    fn test_zero_amount_is_a_no_op() {
        let balance =
            adjust_balance(dec("100.0"), Decimal::ZERO, AdjustmentDirection::Subtract).unwrap();
        assert_eq!(balance, dec("100.0"));
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        assert_eq!(AdjustmentDirection::Add.as_str(), "add");
        assert_eq!(AdjustmentDirection::Subtract.as_str(), "subtract");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating balances (either sign)
    fn balance_strategy() -> impl Strategy<Value = Decimal> {
        (-10_000_000i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating non-negative adjustment amounts
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Add moves the balance up by exactly the amount
        #[test]
        fn prop_add_increments(
            balance in balance_strategy(),
            amount in amount_strategy()
        ) {
            let after = adjust_balance(balance, amount, AdjustmentDirection::Add).unwrap();
            prop_assert_eq!(after, balance + amount);
        }

        /// Subtract moves the balance down by exactly the amount
        #[test]
        fn prop_subtract_decrements(
            balance in balance_strategy(),
            amount in amount_strategy()
        ) {
            let after = adjust_balance(balance, amount, AdjustmentDirection::Subtract).unwrap();
            prop_assert_eq!(after, balance - amount);
        }

        /// Add then subtract of the same amount is the identity
        #[test]
        fn prop_add_subtract_roundtrip(
            balance in balance_strategy(),
            amount in amount_strategy()
        ) {
            let up = adjust_balance(balance, amount, AdjustmentDirection::Add).unwrap();
            let down = adjust_balance(up, amount, AdjustmentDirection::Subtract).unwrap();
            prop_assert_eq!(down, balance);
        }
    }
}
