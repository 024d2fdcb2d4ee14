//! Invoice billing arithmetic and lifecycle enumerations
//!
//! All monetary derivations (line totals, invoice totals, payment status) live
//! here as pure functions so the backend services and the tests share one
//! definition.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How much of an invoice's total has been paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }

    /// Classify a paid amount against an invoice total.
    ///
    /// `paid >= total` wins over the zero check, so a zero-total invoice with
    /// nothing paid reads as `Paid`.
    pub fn classify(paid: Decimal, total: Decimal) -> Self {
        if paid >= total {
            PaymentStatus::Paid
        } else if paid > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

/// Settlement instrument recorded on sales and payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    #[default]
    Cash,
    Upi,
    Card,
    Bank,
    Credit,
    Cheque,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::Upi => "upi",
            PaymentMode::Card => "card",
            PaymentMode::Bank => "bank",
            PaymentMode::Credit => "credit",
            PaymentMode::Cheque => "cheque",
        }
    }
}

/// Lifecycle of a purchase invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Draft,
    #[default]
    Confirmed,
    Cancelled,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Draft => "draft",
            PurchaseStatus::Confirmed => "confirmed",
            PurchaseStatus::Cancelled => "cancelled",
        }
    }
}

/// Lifecycle of a sale invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Draft,
    #[default]
    Confirmed,
    Cancelled,
    Returned,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Draft => "draft",
            SaleStatus::Confirmed => "confirmed",
            SaleStatus::Cancelled => "cancelled",
            SaleStatus::Returned => "returned",
        }
    }
}

/// Derived amounts for a single invoice line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    /// Quantity x unit price, less the line discount
    pub net: Decimal,
    pub tax_amount: Decimal,
    /// Net plus tax
    pub total: Decimal,
}

/// Compute the derived amounts of one invoice line.
///
/// Tax applies to the discounted net; `tax_rate` is a percentage in [0, 100].
pub fn compute_line_amounts(
    quantity: i32,
    unit_price: Decimal,
    discount: Decimal,
    tax_rate: Decimal,
) -> LineAmounts {
    let gross = Decimal::from(quantity) * unit_price;
    let net = gross - discount;
    let tax_amount = net * tax_rate / Decimal::from(100);
    LineAmounts {
        net,
        tax_amount,
        total: net + tax_amount,
    }
}

/// Derived header amounts for a whole invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    /// Sum of line nets, before invoice-level adjustments
    pub subtotal: Decimal,
    /// Sum of line tax amounts
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Roll line amounts up into invoice totals.
///
/// `total = subtotal - discount + tax + shipping + other + round_off`.
pub fn compute_invoice_totals(
    lines: &[LineAmounts],
    discount_amount: Decimal,
    shipping_charges: Decimal,
    other_charges: Decimal,
    round_off: Decimal,
) -> InvoiceTotals {
    let subtotal: Decimal = lines.iter().map(|l| l.net).sum();
    let tax_amount: Decimal = lines.iter().map(|l| l.tax_amount).sum();
    let total_amount =
        subtotal - discount_amount + tax_amount + shipping_charges + other_charges + round_off;
    InvoiceTotals {
        subtotal,
        tax_amount,
        total_amount,
    }
}

/// Outstanding amount on an invoice
pub fn balance_amount(total: Decimal, paid: Decimal) -> Decimal {
    total - paid
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn classify_unpaid_partial_paid() {
        let total = dec("100");
        assert_eq!(
            PaymentStatus::classify(Decimal::ZERO, total),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            PaymentStatus::classify(dec("40"), total),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentStatus::classify(dec("100"), total),
            PaymentStatus::Paid
        );
        assert_eq!(
            PaymentStatus::classify(dec("150"), total),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn line_amounts_apply_discount_then_tax() {
        // 4 x 25 = 100, minus 10 discount = 90, plus 10% tax = 99
        let line = compute_line_amounts(4, dec("25"), dec("10"), dec("10"));
        assert_eq!(line.net, dec("90"));
        assert_eq!(line.tax_amount, dec("9"));
        assert_eq!(line.total, dec("99"));
    }

    #[test]
    fn invoice_totals_roll_up_lines_and_charges() {
        let lines = [
            compute_line_amounts(2, dec("50"), Decimal::ZERO, Decimal::ZERO),
            compute_line_amounts(1, dec("200"), dec("20"), dec("5")),
        ];
        let totals = compute_invoice_totals(&lines, dec("10"), dec("15"), dec("5"), dec("-0.5"));
        // subtotal = 100 + 180 = 280; tax = 0 + 9 = 9
        assert_eq!(totals.subtotal, dec("280"));
        assert_eq!(totals.tax_amount, dec("9"));
        // 280 - 10 + 9 + 15 + 5 - 0.5
        assert_eq!(totals.total_amount, dec("298.5"));
    }

    #[test]
    fn balance_is_total_minus_paid() {
        assert_eq!(balance_amount(dec("250"), dec("100")), dec("150"));
        assert_eq!(balance_amount(dec("250"), dec("250")), Decimal::ZERO);
    }
}
