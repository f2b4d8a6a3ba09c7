//! Registration screen with the email-verification sub-flow.

use anyhow::{Context, Result};

use lexid_core::api::Gateway;
use lexid_core::config::Config;
use lexid_core::flows::register::RegistrationDraft;
use lexid_core::flows::verify::OTP_LEN;
use lexid_core::session::Session;
use lexid_core::token::TokenStore;

use super::prompt_line;

pub async fn run(config: &Config) -> Result<()> {
    let gateway = Gateway::from_config(config);
    let mut draft = RegistrationDraft::default();

    println!("Register a citizen account");
    println!();
    draft.full_name = prompt_line("Full name: ")?;
    draft.email = prompt_line("Email (leave empty to register with phone only): ")?;
    draft.phone_number = prompt_line("Phone number: ")?;
    draft.language_preference = prompt_line("Language preference: ")?;
    draft.location = prompt_line("Location: ")?;
    draft.password = prompt_line("Password: ")?;
    draft.confirm_password = prompt_line("Confirm password: ")?;

    if !draft.email.trim().is_empty() {
        verify_email(&gateway, &mut draft).await?;
    }

    if let Some(blocker) = draft.first_blocker() {
        anyhow::bail!("Registration blocked: {blocker}");
    }

    println!("Submitting registration...");
    let mut session = Session::new(gateway, TokenStore::default_path());
    let message = session.register_citizen(draft.payload()).await?;

    println!();
    println!("✓ {message}");
    println!("  You can now sign in with `lexid login`.");
    Ok(())
}

/// Runs the OTP sub-flow until the address is verified.
async fn verify_email(gateway: &Gateway, draft: &mut RegistrationDraft) -> Result<()> {
    let email = draft.email.trim().to_string();

    println!();
    println!("Sending a verification code to {email}...");
    draft
        .verification
        .send(gateway, &email)
        .await
        .context("Could not send the verification code")?;

    if draft.verification.is_verified() {
        println!("✓ Email already verified.");
        return Ok(());
    }

    loop {
        let input = prompt_line(&format!(
            "Enter the {OTP_LEN}-digit code (or 'r' to resend): "
        ))?;

        if input.eq_ignore_ascii_case("r") {
            if let Err(err) = draft.verification.send(gateway, &email).await {
                println!("  ✗ {err}");
            } else {
                println!("  Code resent.");
            }
            continue;
        }

        if !draft.verification.otp_mut().paste(&input) {
            println!("  Enter exactly {OTP_LEN} digits.");
            continue;
        }

        match draft.verification.confirm(gateway, &email).await {
            Ok(()) => {
                println!("✓ Email verified.");
                return Ok(());
            }
            Err(_) => {
                let message = draft
                    .verification
                    .error()
                    .unwrap_or("Verification failed.")
                    .to_string();
                println!("  ✗ {message}");
            }
        }
    }
}
