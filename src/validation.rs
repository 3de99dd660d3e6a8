//! Field-level validation shared by the mutations and the seed binary.
//!
//! Checks here are pure; uniqueness checks that need the database live in the
//! services. Each check returns the human-readable message the API reports.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

pub const NAME_MAX_LEN: usize = 100;
pub const LOW_STOCK_THRESHOLD: i32 = 10;
/// Decimal places kept by the NUMERIC(10,2) money columns.
pub const MONEY_SCALE: u32 = 2;

pub const PHONE_FORMAT_MESSAGE: &str =
    "Phone number must be in format +1234567890 or 123-456-7890";
pub const EMAIL_EXISTS_MESSAGE: &str = "Email already exists";
pub const EMAIL_FORMAT_MESSAGE: &str = "Invalid email format";
pub const PRICE_MESSAGE: &str = "Price must be positive";
pub const STOCK_MESSAGE: &str = "Stock cannot be negative";

fn phone_regex() -> &'static Regex {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^(\+\d{10,15}|\d{3}-\d{3}-\d{4}|\d{10,15})$").expect("phone pattern compiles")
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern compiles")
    })
}

/// Accepts `+` followed by 10-15 digits, `NNN-NNN-NNNN`, or 10-15 bare digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Blank phone numbers are stored as absent.
pub fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

pub fn validate_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        Some("Name is required".to_string())
    } else if name.chars().count() > NAME_MAX_LEN {
        Some(format!("Name must be at most {NAME_MAX_LEN} characters"))
    } else {
        None
    }
}

/// Format checks for a customer row. Uniqueness of the email is checked separately.
pub fn customer_field_errors(name: &str, email: &str, phone: Option<&str>) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(err) = validate_name(name) {
        errors.push(err);
    }
    if !is_valid_email(email.trim()) {
        errors.push(EMAIL_FORMAT_MESSAGE.to_string());
    }
    if phone.is_some_and(|p| !is_valid_phone(p)) {
        errors.push(PHONE_FORMAT_MESSAGE.to_string());
    }
    errors
}

pub fn product_field_errors(name: &str, price: Decimal, stock: i32) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(err) = validate_name(name) {
        errors.push(err);
    }
    // Checked at stored precision; Postgres rounds half away from zero.
    let stored = price.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if stored <= Decimal::ZERO {
        errors.push(PRICE_MESSAGE.to_string());
    }
    if stock < 0 {
        errors.push(STOCK_MESSAGE.to_string());
    }
    errors
}
