//! Validation helpers shared by the record-access services
//!
//! Checks run before any persistence call; each returns a static message the
//! backend surfaces in its validation error.

use rust_decimal::Decimal;

/// Validate that a required text field is present and non-blank
pub fn validate_required_text(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        Err("Field is required")
    } else {
        Ok(())
    }
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate phone number format: 7-15 digits, optional leading +
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 7 || digits.len() > 15 {
        return Err("Phone number must contain 7-15 digits");
    }
    Ok(())
}

/// Validate a line-item or adjustment quantity (must be at least 1)
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 1 {
        return Err("Quantity must be a positive number");
    }
    Ok(())
}

/// Validate a monetary amount (must not be negative)
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate a tax rate percentage (must be within [0, 100])
pub fn validate_tax_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO || rate > Decimal::from(100) {
        return Err("Tax rate must be between 0 and 100");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn required_text_rejects_blank() {
        assert!(validate_required_text("Electronics").is_ok());
        assert!(validate_required_text("").is_err());
        assert!(validate_required_text("   ").is_err());
    }

    #[test]
    fn email_basic_format() {
        assert!(validate_email("shop@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-4).is_err());
    }

    #[test]
    fn amount_must_be_non_negative() {
        assert!(validate_amount(Decimal::ZERO).is_ok());
        assert!(validate_amount(Decimal::from(250)).is_ok());
        assert!(validate_amount(Decimal::from(-1)).is_err());
    }

    #[test]
    fn tax_rate_bounds() {
        assert!(validate_tax_rate(Decimal::ZERO).is_ok());
        assert!(validate_tax_rate(Decimal::from(100)).is_ok());
        assert!(validate_tax_rate(Decimal::from(101)).is_err());
        assert!(validate_tax_rate(Decimal::from_str("-0.5").unwrap()).is_err());
    }

    #[test]
    fn phone_digit_count() {
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("12345").is_err());
    }
}
