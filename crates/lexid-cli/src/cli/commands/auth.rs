//! Sign-in, sign-out, session status, and the guarded profile screen.

use anyhow::{Context, Result};

use lexid_core::api::Gateway;
use lexid_core::config::Config;
use lexid_core::routes::{self, RouteDecision};
use lexid_core::session::Session;
use lexid_core::token::{TokenStore, mask_token};
use lexid_core::validate;

use super::{confirm, prompt_line};

fn open_session(config: &Config) -> Session {
    Session::new(Gateway::from_config(config), TokenStore::default_path())
}

pub async fn login(config: &Config, return_to: Option<&str>) -> Result<()> {
    let store = TokenStore::default_path();
    if let Some(existing) = store.get()? {
        println!(
            "Already signed in (token: {})",
            mask_token(existing.access.as_str())
        );
        if !confirm("Replace the existing session? [y/N] ")? {
            println!("Login cancelled.");
            return Ok(());
        }
    }

    let email = prompt_line("Email: ")?;
    if !validate::email_format(&email) {
        anyhow::bail!("Enter a valid email address");
    }
    let password = prompt_line("Password: ")?;
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    println!("Signing in...");
    let mut session = open_session(config);
    session
        .login(&email, &password)
        .await
        .context("Could not sign in")?;

    let destination = routes::post_login_destination(return_to, &config.default_landing);
    println!();
    println!("✓ Signed in as {email}");
    if let Some(user) = &session.state().user
        && !user.full_name.is_empty()
    {
        println!("  Welcome, {}", user.full_name);
    }
    println!("  Continuing to {destination}");

    Ok(())
}

pub async fn logout(config: &Config) -> Result<()> {
    let store = TokenStore::default_path();
    let had_session = store.get().unwrap_or(None).is_some();

    let mut session = open_session(config);
    session.logout().await?;

    if had_session {
        println!("✓ Signed out");
        println!("  Session cleared from: {}", store.path().display());
    } else {
        println!("Not signed in (no stored session).");
    }

    Ok(())
}

pub fn status() -> Result<()> {
    let store = TokenStore::default_path();
    match store.get()? {
        None => println!("Not signed in."),
        Some(creds) => {
            println!("Signed in (token: {})", mask_token(creds.access.as_str()));
            if let Ok(claims) = creds.access.claims() {
                println!("  Subject: {}", claims.sub);
            }
            if creds.access.is_expired() {
                println!("  Access token expired (refreshes on next use)");
            } else {
                println!("  Access token valid");
            }
        }
    }
    Ok(())
}

/// The profile screen is authenticated-only: the route guard either renders
/// it or bounces to login, remembering where the citizen was headed.
pub async fn profile(config: &Config) -> Result<()> {
    let mut session = open_session(config);
    let _ = session.check_auth().await;

    match routes::guard(session.state().is_authenticated, "/profile") {
        RouteDecision::Allow => {
            let user = session
                .state()
                .user
                .as_ref()
                .context("profile missing after authentication")?;
            println!("Citizen profile");
            println!("  Name:      {}", user.full_name);
            println!("  Email:     {}", user.email);
            println!("  Phone:     {}", user.phone_number);
            println!("  Language:  {}", user.language_preference);
            println!("  Location:  {}", user.location);
            Ok(())
        }
        RouteDecision::RedirectToLogin { return_to } => {
            anyhow::bail!(
                "Not signed in. Run `lexid login --return-to {return_to}` to continue."
            )
        }
    }
}
