//! Forgot-password and reset-password screens.

use anyhow::{Context, Result};

use lexid_core::api::Gateway;
use lexid_core::config::Config;
use lexid_core::flows::reset::{ForgotPassword, ResetPassword, ResetPhase};
use lexid_core::validate;

use super::prompt_line;

pub async fn forgot(config: &Config) -> Result<()> {
    let gateway = Gateway::from_config(config);
    let mut screen = ForgotPassword::default();

    let email = prompt_line("Email: ")?;
    screen
        .submit(&gateway, &email)
        .await
        .context("Could not request the reset email")?;

    println!();
    println!("✓ Reset email sent");
    println!("  Check {email} for the reset link.");
    Ok(())
}

pub async fn reset(config: &Config, token: Option<&str>) -> Result<()> {
    let gateway = Gateway::from_config(config);

    let token = match token {
        Some(token) => token.to_string(),
        None => prompt_line("Reset token: ")?,
    };
    let mut screen = ResetPassword::new(Some(&token));
    if screen.phase() == ResetPhase::InvalidToken {
        anyhow::bail!(invalid_token_message());
    }

    let password = prompt_line("New password: ")?;
    println!(
        "  Strength: {}",
        validate::password_strength(&password).label()
    );
    let confirm_password = prompt_line("Confirm new password: ")?;

    match screen.submit(&gateway, &password, &confirm_password).await {
        Ok(()) => {
            println!();
            println!("✓ Password updated");
            println!("  Sign in with `lexid login`.");
            Ok(())
        }
        Err(err) => {
            if screen.phase() == ResetPhase::InvalidToken {
                anyhow::bail!(invalid_token_message());
            }
            Err(err).context("Could not reset the password")
        }
    }
}

fn invalid_token_message() -> String {
    "The reset link is invalid or has expired. Request a new one with \
     `lexid forgot-password`."
        .to_string()
}
