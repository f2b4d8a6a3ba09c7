//! Local input validation shared by the form flows.
//!
//! Validation failures block submission before any network call is made.

use std::sync::OnceLock;

use regex::Regex;

/// Permissive email shape: something, an `@`, something, a dot, something.
/// Deliverability is the mail server's problem, not ours.
const EMAIL_PATTERN: &str = r"^\S+@\S+\.\S+$";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Returns true when the email passes the permissive format check.
pub fn email_format(email: &str) -> bool {
    let re = EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("valid email pattern"));
    re.is_match(email)
}

/// Strength bucket shown next to the new-password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::Weak => "weak",
            PasswordStrength::Medium => "medium",
            PasswordStrength::Strong => "strong",
        }
    }
}

/// Counts how many of the five strength criteria the password meets:
/// uppercase, lowercase, digit, special character, minimum length of 8.
pub fn strength_score(password: &str) -> u8 {
    let checks = [
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        password.chars().count() >= 8,
    ];
    checks.iter().filter(|met| **met).count() as u8
}

/// Buckets the criterion count: up to 2 weak, 3-4 medium, all 5 strong.
pub fn password_strength(password: &str) -> PasswordStrength {
    match strength_score(password) {
        0..=2 => PasswordStrength::Weak,
        3 | 4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    }
}

/// Hard gate for setting a new password: all four character classes and at
/// least eight characters. Submission is blocked until this passes.
pub fn password_gate(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}
