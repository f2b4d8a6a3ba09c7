//! Forgot/reset password screens. The two are independent and share no
//! state: the request screen only knows an email, the completion screen
//! only knows the emailed token.

use anyhow::Result;

use crate::api::Gateway;
use crate::validate;

/// Phase of the reset-request screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForgotPhase {
    /// Awaiting an email address.
    #[default]
    Entry,
    /// Reset email requested; terminal confirmation display.
    Sent,
}

/// Request screen: asks for an email and reports the reset mail was sent.
#[derive(Debug, Default)]
pub struct ForgotPassword {
    phase: ForgotPhase,
    error: Option<String>,
}

impl ForgotPassword {
    pub fn phase(&self) -> ForgotPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Requests a reset email. The address is validated locally first.
    ///
    /// # Errors
    /// Returns an error when validation or the request fails.
    pub async fn submit(&mut self, gateway: &Gateway, email: &str) -> Result<()> {
        if !validate::email_format(email) {
            let message = "Enter a valid email address.";
            self.error = Some(message.to_string());
            anyhow::bail!(message);
        }

        self.error = None;
        match gateway.forgot_password(email).await {
            Ok(_) => {
                self.phase = ForgotPhase::Sent;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.message.clone());
                Err(anyhow::Error::new(err))
            }
        }
    }
}

/// Phase of the reset-completion screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPhase {
    /// Awaiting the new password pair.
    Entry,
    /// Password changed; terminal success display.
    Done,
    /// The token was rejected or missing; terminal display, no further
    /// submission possible.
    InvalidToken,
}

/// Completion screen: consumes the reset token from the emailed link.
#[derive(Debug)]
pub struct ResetPassword {
    token: String,
    phase: ResetPhase,
    error: Option<String>,
}

impl ResetPassword {
    /// Builds the screen from the navigation context. Only the token's
    /// presence is checked here; the server judges its validity.
    pub fn new(token: Option<&str>) -> Self {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => Self {
                token: token.to_string(),
                phase: ResetPhase::Entry,
                error: None,
            },
            None => Self {
                token: String::new(),
                phase: ResetPhase::InvalidToken,
                error: Some("The reset link is missing its token.".to_string()),
            },
        }
    }

    pub fn phase(&self) -> ResetPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submits the new password pair. The pair must match and pass the hard
    /// strength gate locally before anything goes on the wire. A server
    /// message mentioning an expired or invalid token flips the screen into
    /// the terminal invalid-token display.
    ///
    /// # Errors
    /// Returns an error when a local gate or the server rejects the change.
    pub async fn submit(
        &mut self,
        gateway: &Gateway,
        password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        match self.phase {
            ResetPhase::Entry => {}
            ResetPhase::Done => anyhow::bail!("The password was already changed."),
            ResetPhase::InvalidToken => {
                anyhow::bail!("The reset link is invalid or has expired.")
            }
        }

        if password != confirm_password {
            let message = "Passwords do not match.";
            self.error = Some(message.to_string());
            anyhow::bail!(message);
        }
        if !validate::password_gate(password) {
            let message = "Password must be at least 8 characters with uppercase, lowercase, \
                           digit, and special character.";
            self.error = Some(message.to_string());
            anyhow::bail!(message);
        }

        self.error = None;
        match gateway
            .reset_password(&self.token, password, confirm_password)
            .await
        {
            Ok(response) if token_rejected(&response.message) => {
                self.phase = ResetPhase::InvalidToken;
                self.error = Some(response.message.clone());
                anyhow::bail!(response.message);
            }
            Ok(_) => {
                self.phase = ResetPhase::Done;
                Ok(())
            }
            Err(err) => {
                if token_rejected(&err.message) {
                    self.phase = ResetPhase::InvalidToken;
                }
                self.error = Some(err.message.clone());
                Err(anyhow::Error::new(err))
            }
        }
    }
}

/// A response mentioning expiry or invalidity means the token is dead.
fn token_rejected(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("expired") || lower.contains("invalid")
}
