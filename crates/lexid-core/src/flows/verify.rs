//! Email ownership verification with a one-time passcode.
//!
//! Drives the sub-flow inside the registration screen: request a passcode
//! for the entered address, collect six digits, confirm them. Failures fall
//! back to the state they started from, carrying an inline error.

use anyhow::Result;
use tracing::debug;

use crate::api::Gateway;
use crate::validate;

/// The exact confirmation message the server sends on success. Anything
/// else leaves the address unverified.
pub const VERIFIED_MESSAGE: &str = "Email verified.";

/// Number of digits in a passcode.
pub const OTP_LEN: usize = 6;

/// Phase of the email-verification sub-flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyPhase {
    /// No code requested yet.
    #[default]
    Unverified,
    /// Send request in flight.
    Sending,
    /// Code sent; awaiting the 6-digit passcode.
    Sent,
    /// Confirm request in flight.
    Verifying,
    /// Address ownership proven.
    Verified,
}

/// Email-verification state machine driven by the registration screen.
#[derive(Debug, Default)]
pub struct EmailVerification {
    phase: VerifyPhase,
    error: Option<String>,
    otp: OtpBuffer,
}

impl EmailVerification {
    pub fn phase(&self) -> VerifyPhase {
        self.phase
    }

    /// Inline error from the last failed send/confirm, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_verified(&self) -> bool {
        self.phase == VerifyPhase::Verified
    }

    pub fn otp(&self) -> &OtpBuffer {
        &self.otp
    }

    pub fn otp_mut(&mut self) -> &mut OtpBuffer {
        &mut self.otp
    }

    /// Requests a passcode for the address. The email format is validated
    /// locally before any network call; a server response stating the
    /// address is already verified short-circuits straight to verified.
    ///
    /// # Errors
    /// Returns an error when validation or the send request fails; the
    /// phase falls back to where it was.
    pub async fn send(&mut self, gateway: &Gateway, email: &str) -> Result<()> {
        if self.phase == VerifyPhase::Verified {
            return Ok(());
        }
        if !validate::email_format(email) {
            let message = "Enter a valid email address.";
            self.error = Some(message.to_string());
            anyhow::bail!(message);
        }

        let prior = self.phase;
        self.phase = VerifyPhase::Sending;
        self.error = None;

        match gateway.send_verification(email).await {
            Ok(response) => {
                if response
                    .message
                    .to_lowercase()
                    .contains("already verified")
                {
                    debug!("address already verified, skipping passcode entry");
                    self.phase = VerifyPhase::Verified;
                    self.otp.clear();
                } else {
                    self.phase = VerifyPhase::Sent;
                }
                Ok(())
            }
            Err(err) => {
                self.phase = prior;
                self.error = Some(err.message.clone());
                Err(anyhow::Error::new(err))
            }
        }
    }

    /// Submits the buffered passcode. Only the exact server confirmation
    /// counts as success; any other outcome reports inline and stays
    /// awaiting the code so the citizen can retry.
    ///
    /// # Errors
    /// Returns an error when the buffer is incomplete or the code is
    /// rejected.
    pub async fn confirm(&mut self, gateway: &Gateway, email: &str) -> Result<()> {
        if self.phase != VerifyPhase::Sent {
            anyhow::bail!("No passcode is awaiting confirmation.");
        }
        let Some(code) = self.otp.code() else {
            let message = format!("Enter the {OTP_LEN}-digit code.");
            self.error = Some(message.clone());
            anyhow::bail!(message);
        };

        self.phase = VerifyPhase::Verifying;
        self.error = None;

        match gateway.confirm_verification(email, &code).await {
            Ok(response) if response.message == VERIFIED_MESSAGE => {
                self.phase = VerifyPhase::Verified;
                self.otp.clear();
                Ok(())
            }
            Ok(response) => {
                self.phase = VerifyPhase::Sent;
                self.error = Some(response.message.clone());
                anyhow::bail!(response.message);
            }
            Err(err) => {
                self.phase = VerifyPhase::Sent;
                self.error = Some(err.message.clone());
                Err(anyhow::Error::new(err))
            }
        }
    }

    /// Closes the passcode entry, discarding any typed digits. The phase is
    /// untouched; a fresh code can still be entered or resent.
    pub fn close_entry(&mut self) {
        self.otp.clear();
    }

    #[cfg(test)]
    pub(crate) fn force_verified(&mut self) {
        self.phase = VerifyPhase::Verified;
    }
}

/// Fixed-length buffer for the 6-digit passcode, mutated per keystroke.
#[derive(Debug, Clone, Default)]
pub struct OtpBuffer {
    digits: Vec<char>,
}

impl OtpBuffer {
    /// Accepts a single digit keystroke; entry advances to the next slot.
    /// Non-digits and overflow are ignored.
    pub fn push(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() && self.digits.len() < OTP_LEN {
            self.digits.push(ch);
            true
        } else {
            false
        }
    }

    /// Removes the most recent digit (backspace).
    pub fn pop(&mut self) -> Option<char> {
        self.digits.pop()
    }

    /// Replaces the whole buffer from a pasted code. Accepts exactly
    /// [`OTP_LEN`] digits; anything else leaves the buffer untouched.
    pub fn paste(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.len() == OTP_LEN && trimmed.chars().all(|c| c.is_ascii_digit()) {
            self.digits = trimmed.chars().collect();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.digits.len() == OTP_LEN
    }

    /// The complete code, present only when all six digits are typed.
    pub fn code(&self) -> Option<String> {
        self.is_complete().then(|| self.digits.iter().collect())
    }
}
