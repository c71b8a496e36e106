//! Field-level input syntax checks.
//!
//! These guard what users type at the console before it reaches the engine;
//! the engine itself treats identifiers as opaque.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());

// ISBN-10 (nine digits plus a digit or X check character) or ISBN-13
// (978/979 prefix), after separators are stripped
static ISBN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]{9}[0-9X]|97[89][0-9]{10})$").unwrap());

/// Non-empty after trimming.
pub fn is_not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Basic email shape: local part, @, domain with a dot.
pub fn is_valid_email(email: &str) -> bool {
    is_not_empty(email) && EMAIL.is_match(email)
}

/// 10-15 digits with an optional leading +; spaces and dashes are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    if !is_not_empty(phone) {
        return false;
    }
    let stripped: String = phone.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    PHONE.is_match(&stripped)
}

/// ISBN-10 or ISBN-13 shape; spaces and dashes are ignored. No checksum
/// verification, matching the original validator.
pub fn is_valid_isbn(isbn: &str) -> bool {
    if !is_not_empty(isbn) {
        return false;
    }
    let stripped: String = isbn
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect::<String>()
        .to_uppercase();
    ISBN.is_match(&stripped)
}

/// Publication years run from the printing press to the current year.
pub fn is_valid_publication_year(year: i32, current_year: i32) -> bool {
    (1450..=current_year).contains(&year)
}
