//! Stock adjustment semantics tests
//!
//! Purchases receive stock, sales issue it, deletions reverse their invoice,
//! and a sale is rejected outright when any line exceeds the available stock.
//! The helpers below mirror the guarded adjustments the invoice services
//! apply per line item.

use proptest::prelude::*;
use shared::validation::validate_quantity;

/// Receive a purchased quantity into stock
fn apply_purchase(stock: i32, quantity: i32) -> Result<i32, &'static str> {
    validate_quantity(quantity)?;
    Ok(stock + quantity)
}

/// Issue a sold quantity from stock; insufficient only when stock < requested
fn apply_sale(stock: i32, quantity: i32) -> Result<i32, &'static str> {
    validate_quantity(quantity)?;
    if stock < quantity {
        return Err("Insufficient stock");
    }
    Ok(stock - quantity)
}

/// Reverse a sale (deletion returns the goods)
fn reverse_sale(stock: i32, quantity: i32) -> i32 {
    stock + quantity
}

/// Reverse a purchase (deletion takes the goods back out)
fn reverse_purchase(stock: i32, quantity: i32) -> Result<i32, &'static str> {
    if stock < quantity {
        return Err("Reversal would make stock negative");
    }
    Ok(stock - quantity)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_purchase_receives_stock() {
        assert_eq!(apply_purchase(0, 10).unwrap(), 10);
        assert_eq!(apply_purchase(25, 5).unwrap(), 30);
    }

    #[test]
    fn test_sale_issues_stock() {
        assert_eq!(apply_sale(10, 4).unwrap(), 6);
    }

    #[test]
    fn test_sale_of_exact_stock_allowed() {
        // The check is strict less-than: selling everything that's left is fine
        assert_eq!(apply_sale(6, 6).unwrap(), 0);
    }

    #[test]
    fn test_sale_exceeding_stock_rejected() {
        assert!(apply_sale(6, 7).is_err());
        assert!(apply_sale(0, 1).is_err());
    }

    #[test]
    fn test_zero_and_negative_quantities_rejected() {
        assert!(apply_purchase(10, 0).is_err());
        assert!(apply_purchase(10, -3).is_err());
        assert!(apply_sale(10, 0).is_err());
        assert!(apply_sale(10, -3).is_err());
    }

    #[test]
    fn test_sale_deletion_returns_stock() {
        let after_sale = apply_sale(10, 4).unwrap();
        assert_eq!(reverse_sale(after_sale, 4), 10);
    }

    #[test]
    fn test_purchase_deletion_takes_stock_back() {
        let after_purchase = apply_purchase(0, 10).unwrap();
        assert_eq!(reverse_purchase(after_purchase, 10).unwrap(), 0);
    }

    #[test]
    fn test_purchase_deletion_rejected_when_goods_already_sold() {
        // Bought 10, sold 8: reversing the purchase would go negative
        let stock = apply_sale(apply_purchase(0, 10).unwrap(), 8).unwrap();
        assert!(reverse_purchase(stock, 10).is_err());
    }

    /// End-to-end stock scenario: purchase 10 onto empty stock, sell 4,
    /// reject a sale of 10, delete the first sale
    #[test]
    fn test_stock_lifecycle_scenario() {
        let stock = apply_purchase(0, 10).unwrap();
        assert_eq!(stock, 10);

        let stock = apply_sale(stock, 4).unwrap();
        assert_eq!(stock, 6);

        // Rejected sale leaves stock untouched
        assert!(apply_sale(stock, 10).is_err());
        assert_eq!(stock, 6);

        let stock = reverse_sale(stock, 4);
        assert_eq!(stock, 10);
    }

    /// A multi-line sale is all-or-nothing: one failing line means no line
    /// is applied
    #[test]
    fn test_multi_line_sale_is_atomic() {
        let stocks = [10, 3];
        let quantities = [5, 4];

        let sufficient = stocks
            .iter()
            .zip(quantities.iter())
            .all(|(stock, quantity)| stock >= quantity);
        assert!(!sufficient);

        // The whole operation is rejected, so every stock stays as it was
        let after: Vec<i32> = if sufficient {
            stocks
                .iter()
                .zip(quantities.iter())
                .map(|(s, q)| s - q)
                .collect()
        } else {
            stocks.to_vec()
        };

        assert_eq!(after, stocks.to_vec());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating stock levels
    fn stock_strategy() -> impl Strategy<Value = i32> {
        0i32..=10_000
    }

    /// Strategy for generating valid quantities
    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=1_000
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A sufficient sale decreases stock by exactly the sold quantity
        #[test]
        fn prop_sale_decrements_exactly(
            stock in stock_strategy(),
            quantity in quantity_strategy()
        ) {
            prop_assume!(stock >= quantity);
            prop_assert_eq!(apply_sale(stock, quantity).unwrap(), stock - quantity);
        }

        /// An insufficient sale fails and implies stock < quantity
        #[test]
        fn prop_insufficient_sale_rejected(
            stock in stock_strategy(),
            quantity in quantity_strategy()
        ) {
            match apply_sale(stock, quantity) {
                Ok(remaining) => {
                    prop_assert!(stock >= quantity);
                    prop_assert!(remaining >= 0);
                }
                Err(_) => prop_assert!(stock < quantity),
            }
        }

        /// Sale then deletion is the identity on stock
        #[test]
        fn prop_sale_reversal_roundtrip(
            stock in stock_strategy(),
            quantity in quantity_strategy()
        ) {
            prop_assume!(stock >= quantity);
            let after_sale = apply_sale(stock, quantity).unwrap();
            prop_assert_eq!(reverse_sale(after_sale, quantity), stock);
        }

        /// Purchase then deletion is the identity on stock
        #[test]
        fn prop_purchase_reversal_roundtrip(
            stock in stock_strategy(),
            quantity in quantity_strategy()
        ) {
            let after_purchase = apply_purchase(stock, quantity).unwrap();
            prop_assert_eq!(reverse_purchase(after_purchase, quantity).unwrap(), stock);
        }

        /// Across a multi-line sale, the total stock delta equals the sum of
        /// the line quantities
        #[test]
        fn prop_multi_line_delta_is_quantity_sum(
            lines in prop::collection::vec(
                (stock_strategy(), quantity_strategy()),
                1..10
            )
        ) {
            prop_assume!(lines.iter().all(|(stock, quantity)| stock >= quantity));

            let before: i64 = lines.iter().map(|(s, _)| *s as i64).sum();
            let after: i64 = lines
                .iter()
                .map(|(s, q)| apply_sale(*s, *q).unwrap() as i64)
                .sum();
            let sold: i64 = lines.iter().map(|(_, q)| *q as i64).sum();

            prop_assert_eq!(before - after, sold);
        }

        /// Stock never goes negative through any accepted operation
        #[test]
        fn prop_stock_never_negative(
            stock in stock_strategy(),
            quantity in quantity_strategy()
        ) {
            if let Ok(after) = apply_sale(stock, quantity) {
                prop_assert!(after >= 0);
            }
            if let Ok(after) = reverse_purchase(stock, quantity) {
                prop_assert!(after >= 0);
            }
        }
    }
}
