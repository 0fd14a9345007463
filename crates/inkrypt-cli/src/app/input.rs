//! Prompts and body input.

use std::io::{self, IsTerminal, Read};
use std::process::Command;

use dialoguer::{Confirm, Password};
use zeroize::Zeroizing;

use crate::constants::{ARCHIVE_PASSWORD_ENV, PIN_ENV};
use crate::errors::CliError;

fn env_secret(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(Zeroizing::new)
}

/// Whether a PIN was supplied through the environment.
pub fn pin_from_env() -> Option<Zeroizing<String>> {
    env_secret(PIN_ENV)
}

/// Read the PIN from `INKRYPT_PIN` or prompt for it.
pub fn prompt_pin(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(pin) = pin_from_env() {
        return Ok(pin);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No PIN provided and no TTY available. Set {}.",
            PIN_ENV
        ))
        .into());
    }
    Password::new()
        .with_prompt("PIN")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read PIN: {}", e))
}

/// Read a new PIN, asking twice when prompting.
pub fn prompt_new_pin(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(pin) = pin_from_env() {
        return Ok(pin);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No PIN provided and no TTY available. Set {}.",
            PIN_ENV
        ))
        .into());
    }
    Password::new()
        .with_prompt("Choose a PIN (4-16 characters)")
        .with_confirmation("Confirm PIN", "PINs do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read PIN: {}", e))
}

/// Read an archive password from `INKRYPT_ARCHIVE_PASSWORD` or prompt.
///
/// `confirm` asks twice, for exports.
pub fn prompt_archive_password(
    interactive: bool,
    confirm: bool,
) -> anyhow::Result<Zeroizing<String>> {
    if let Some(password) = env_secret(ARCHIVE_PASSWORD_ENV) {
        return Ok(password);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No archive password provided and no TTY available. Set {}.",
            ARCHIVE_PASSWORD_ENV
        ))
        .into());
    }
    let mut prompt = Password::new().with_prompt("Archive password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm archive password", "Passwords do not match");
    }
    prompt
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read archive password: {}", e))
}

/// Ask a yes/no question; non-interactive sessions answer no.
pub fn confirm(interactive: bool, question: &str) -> anyhow::Result<bool> {
    if !interactive {
        return Ok(false);
    }
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read answer: {}", e))
}

/// Body text from `--body`, piped stdin, or `$EDITOR`, in that order.
///
/// Bodies may be empty; an entry with only a title is valid.
pub fn read_body(no_input: bool, body: Option<&str>) -> anyhow::Result<String> {
    if let Some(value) = body {
        return Ok(value.to_string());
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buffer.trim_end().to_string());
    }

    if no_input {
        return Err(
            CliError::invalid_input("--no-input requires --body or content from stdin").into(),
        );
    }

    read_body_from_editor()
}

fn read_body_from_editor() -> anyhow::Result<String> {
    let editor = std::env::var("EDITOR").map_err(|_| {
        CliError::invalid_input("$EDITOR is not set; use --body or pipe content via stdin")
    })?;

    // The draft is plaintext on disk only for the editor's lifetime.
    let draft = tempfile::Builder::new()
        .prefix("inkrypt_entry_")
        .suffix(".md")
        .tempfile()
        .map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;

    let status = Command::new(editor)
        .arg(draft.path())
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = std::fs::read_to_string(draft.path())
        .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?;
    Ok(contents.trim_end().to_string())
}
