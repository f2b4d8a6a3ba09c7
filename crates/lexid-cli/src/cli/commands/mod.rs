//! Command handlers: one module per screen group.

use std::io::{self, BufRead, Write};

use anyhow::Result;

pub mod auth;
pub mod config;
pub mod password;
pub mod register;

/// Prompts on stdout and reads one trimmed line from stdin.
///
/// # Errors
/// Returns an error on I/O failure or end of input.
pub(crate) fn prompt_line(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().lock().read_line(&mut input)?;
    if read == 0 {
        anyhow::bail!("Unexpected end of input");
    }
    Ok(input.trim().to_string())
}

/// Asks a yes/no question; anything but `y` counts as no.
pub(crate) fn confirm(label: &str) -> Result<bool> {
    let answer = prompt_line(label)?;
    Ok(answer.eq_ignore_ascii_case("y"))
}
