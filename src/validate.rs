//! Field-level validation for form input.
//!
//! Every check takes the raw text the operator typed (mask characters and
//! punctuation included) and either returns the normalized value or the first
//! failure as a [`ValidationError`]. Validation runs before any I/O, so a
//! rejected field never leaves partial state behind.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

/// A named, operator-facing validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Rejects text that is empty after trimming; returns the trimmed value.
pub fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Individual tax id: exactly 11 digits once `.` and `-` are stripped.
pub fn individual_tax_id(value: &str) -> Result<String, ValidationError> {
    let digits: String = value
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .collect();
    if digits.len() != 11 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(
            "cpf",
            "must contain exactly 11 digits",
        ));
    }
    Ok(digits)
}

/// Organization tax id: exactly 14 digits once `.`, `/` and `-` are stripped.
pub fn organization_tax_id(value: &str) -> Result<String, ValidationError> {
    let digits: String = value
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != '/' && *c != '-')
        .collect();
    if digits.len() != 14 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(
            "cnpj",
            "must contain exactly 14 digits",
        ));
    }
    Ok(digits)
}

/// Phone: 10 or 11 digits (area code plus number) after dropping every
/// non-digit mask character.
pub fn phone(value: &str) -> Result<String, ValidationError> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        10 | 11 => Ok(digits),
        0 => Err(ValidationError::new("phone", "must not be empty")),
        _ => Err(ValidationError::new(
            "phone",
            "must contain 10 or 11 digits",
        )),
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]{2,4}$")
            .expect("email pattern is a valid regex")
    })
}

/// Email: simple `local@domain.tld` shape over ASCII word characters.
pub fn email(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("email", "must not be empty"));
    }
    if !email_pattern().is_match(trimmed) {
        return Err(ValidationError::new("email", "is not a valid address"));
    }
    Ok(trimmed.to_string())
}

/// Monetary amount: decimal with `.` or `,` separator, strictly positive,
/// at most 9 integer and 2 fractional digits. The returned decimal renders
/// with `.` as the canonical separator.
pub fn amount(value: &str) -> Result<Decimal, ValidationError> {
    let canonical = value.trim().replace(',', ".");
    let parsed: Decimal = canonical
        .parse()
        .map_err(|_| ValidationError::new("amount", "must be a decimal number"))?;
    if parsed <= Decimal::ZERO {
        return Err(ValidationError::new(
            "amount",
            "must be greater than zero",
        ));
    }
    if parsed.trunc().to_string().len() > 9 {
        return Err(ValidationError::new(
            "amount",
            "must have at most 9 integer digits",
        ));
    }
    if parsed.scale() > 2 {
        return Err(ValidationError::new(
            "amount",
            "must have at most 2 decimal places",
        ));
    }
    Ok(parsed)
}

/// Calendar date in strict `dd/mm/yyyy` form. Partially filled input mask
/// text (underscore placeholders, missing digits) is rejected.
pub fn date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains('_') {
        return Err(ValidationError::new(
            field,
            "is required and must be complete (dd/mm/yyyy)",
        ));
    }
    let parsed = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        .map_err(|_| ValidationError::new(field, "must be a valid dd/mm/yyyy date"))?;
    if parsed.format("%d/%m/%Y").to_string() != trimmed {
        return Err(ValidationError::new(field, "must use the dd/mm/yyyy form"));
    }
    Ok(parsed)
}
