// file: src/cli/prompts.rs
// version: 1.0.0
// guid: b4a9b9c2-b2c8-4540-981d-aee48564e68a

//! Prompt helpers with inquire → stdin fallback.
//!
//! When `inquire` cannot drive the terminal (no TTY, piped input) the prompt
//! falls back to reading a plain line from stdin.

use crate::error::RegistrarError;
use crate::nodes::SiteEntry;
use crate::Result;
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use std::io::{self, BufRead, Write};

fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Text prompt; an empty answer takes `default`
pub fn text_with_default(message: &str, default: &str) -> Result<String> {
    let answer = match Text::new(message).with_default(default).prompt() {
        Ok(v) => v,
        Err(e) if is_cancel(&e) => return Err(e.into()),
        Err(_) => {
            print!("{} [{}] ", message, default);
            io::stdout().flush()?;
            read_line()?
        }
    };

    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

/// Masked password prompt
pub fn password(message: &str) -> Result<String> {
    match Password::new(message)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
    {
        Ok(v) => Ok(v),
        Err(e) if is_cancel(&e) => Err(e.into()),
        Err(_) => {
            print!("{} ", message);
            io::stdout().flush()?;
            read_line()
        }
    }
}

/// Site selection with fallback to a numbered list
pub fn select_site(sites: &[SiteEntry]) -> Result<SiteEntry> {
    match Select::new("Select a site:", sites.to_vec()).prompt() {
        Ok(site) => Ok(site),
        Err(e) if is_cancel(&e) => Err(e.into()),
        Err(_) => {
            for (i, site) in sites.iter().enumerate() {
                println!("  {}. {}", i + 1, site);
            }
            print!("Select a site [1-{}]: ", sites.len());
            io::stdout().flush()?;
            let answer = read_line()?;
            pick_numbered(sites, &answer)
        }
    }
}

/// Resolve a 1-based menu answer to a site
pub fn pick_numbered(sites: &[SiteEntry], answer: &str) -> Result<SiteEntry> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| sites.get(i))
        .cloned()
        .ok_or_else(|| RegistrarError::PromptError(format!("Invalid site selection: {:?}", answer)))
}
