//! Registration draft and its local validity gate.

use crate::api::RegistrationPayload;
use crate::flows::verify::EmailVerification;

/// Transient state of the registration screen, discarded on navigation
/// away. Holds the entered fields plus the derived email-verification state.
#[derive(Debug, Default)]
pub struct RegistrationDraft {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
    pub language_preference: String,
    pub location: String,
    pub verification: EmailVerification,
}

impl RegistrationDraft {
    /// True when every local gate passes. Nothing is submitted otherwise.
    pub fn is_valid(&self) -> bool {
        self.first_blocker().is_none()
    }

    /// The first gate blocking submission, if any, as a user-facing message.
    ///
    /// Submission is blocked whenever: both email and phone are empty; an
    /// email was supplied but not verified; the password is under 8
    /// characters; the confirmation mismatches.
    pub fn first_blocker(&self) -> Option<&'static str> {
        let email = self.email.trim();
        let phone = self.phone_number.trim();

        if email.is_empty() && phone.is_empty() {
            return Some("Provide an email address or a phone number.");
        }
        if !email.is_empty() && !self.verification.is_verified() {
            return Some("Verify your email address before submitting.");
        }
        if self.password.chars().count() < 8 {
            return Some("Password must be at least 8 characters.");
        }
        if self.password != self.confirm_password {
            return Some("Passwords do not match.");
        }
        None
    }

    /// Builds the wire payload. Call only once [`Self::is_valid`] holds.
    pub fn payload(&self) -> RegistrationPayload {
        RegistrationPayload {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            password: self.password.clone(),
            language_preference: self.language_preference.trim().to_string(),
            location: self.location.trim().to_string(),
        }
    }
}
