// ABOUTME: Field validators shared by registration, profile and catalog endpoints
// ABOUTME: Email, password strength, names, Romanian mobile numbers and http(s) URLs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::OnceLock;

use regex::Regex;
use tracing::error;
use url::Url;

use crate::constants::limits;
use crate::errors::FieldError;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$";
// +40 7xx xxx xxx, 0040..., 07xx xxx xxx
const PHONE_PATTERN: &str = r"^(\+40|0040|0)7\d{8}$";

fn compile(name: &str, pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| error!(pattern = name, error = %e, "Validation pattern failed to compile"))
        .ok()
}

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| compile("email", EMAIL_PATTERN))
        .as_ref()
}

fn phone_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| compile("phone", PHONE_PATTERN))
        .as_ref()
}

/// Trim and lowercase an email address
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether `email` looks like a deliverable address
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && email_pattern().is_some_and(|p| p.is_match(email))
}

/// Strip spaces, dashes and dots from a phone number
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

/// Whether `phone` (already normalized) is a Romanian mobile number
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    phone_pattern().is_some_and(|p| p.is_match(phone))
}

/// Require at least six characters with a lowercase letter, an uppercase
/// letter and a digit
///
/// The upper bound is in bytes: bcrypt ignores everything past 72 bytes.
pub fn check_password(errors: &mut Vec<FieldError>, password: &str) {
    if password.chars().count() < limits::PASSWORD_MIN_CHARS
        || password.len() > limits::PASSWORD_MAX_BYTES
    {
        errors.push(FieldError::new(
            "password",
            format!(
                "Password must be at least {} characters and at most {} bytes",
                limits::PASSWORD_MIN_CHARS,
                limits::PASSWORD_MAX_BYTES
            ),
        ));
        return;
    }
    let has_lower = password.chars().any(char::is_lowercase);
    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        errors.push(FieldError::new(
            "password",
            "Password must contain at least one lowercase letter, one uppercase letter and one number",
        ));
    }
}

/// Require a trimmed name of 2..=50 characters
pub fn check_name(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    let len = value.trim().chars().count();
    if !(limits::NAME_MIN_CHARS..=limits::NAME_MAX_CHARS).contains(&len) {
        errors.push(FieldError::new(
            field,
            format!(
                "{field} must be between {} and {} characters",
                limits::NAME_MIN_CHARS,
                limits::NAME_MAX_CHARS
            ),
        ));
    }
}

/// Require a Romanian mobile number
pub fn check_phone(errors: &mut Vec<FieldError>, phone: &str) {
    if !is_valid_phone(phone) {
        errors.push(FieldError::new(
            "phone",
            "Please provide a valid Romanian mobile phone number",
        ));
    }
}

/// Require an absolute http(s) URL no longer than `max_chars`
pub fn check_http_url(errors: &mut Vec<FieldError>, field: &str, value: &str, max_chars: usize) {
    if value.chars().count() > max_chars {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {max_chars} characters"),
        ));
        return;
    }
    let valid = Url::parse(value)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some());
    if !valid {
        errors.push(FieldError::new(field, format!("{field} must be a valid URL")));
    }
}

/// Require at most `max_chars` characters
pub fn check_max_length(errors: &mut Vec<FieldError>, field: &str, value: &str, max_chars: usize) {
    if value.chars().count() > max_chars {
        errors.push(FieldError::new(
            field,
            format!("{field} must be at most {max_chars} characters"),
        ));
    }
}
