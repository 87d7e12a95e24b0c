// UI helpers: interactive credential prompts using `dialoguer` and a spinner
// from `indicatif` for the slow hashing steps.

use std::time::Duration;

use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Result, TodoError};

/// Use `given` when present, otherwise ask for a username.
pub fn username_or_prompt(given: Option<String>) -> Result<String> {
    match given {
        Some(username) => Ok(username),
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(TodoError::Prompt),
    }
}

/// Use `given` when present, otherwise ask for a hidden password.
/// `confirm` asks twice, as registration does.
pub fn password_or_prompt(given: Option<String>, confirm: bool) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    let mut prompt = Password::new();
    prompt.with_prompt("Password");
    if confirm {
        prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt.interact().map_err(TodoError::Prompt)
}

/// Spinner on stderr; invisible when stderr is not a terminal.
pub fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
