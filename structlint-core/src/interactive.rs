use anyhow::{anyhow, Result};
use console::style;
use dialoguer::{Confirm, Input};
use std::io::{self, IsTerminal};

/// Controls behavior when running in non-interactive mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonInteractiveMode {
    /// Fail with an error when required input is missing
    Fail,
    /// Use the supplied default for missing inputs
    Defaults,
}

/// Detects if we're running in an interactive TTY
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Prompts for a text input, pre-filled with `default` when given.
///
/// # Arguments
/// * `prompt` - The prompt text to display
/// * `default` - Optional default value
/// * `allow_empty` - Whether to allow empty input
/// * `non_interactive` - How to behave when not in a TTY
pub fn prompt_text(
    prompt: &str,
    default: Option<&str>,
    allow_empty: bool,
    non_interactive: NonInteractiveMode,
) -> Result<String> {
    if !is_interactive() {
        return handle_non_interactive(non_interactive, prompt, default.map(|s| s.to_string()));
    }

    loop {
        let mut input = Input::<String>::new()
            .with_prompt(format!("{}", style(format!("→ {}", prompt)).cyan()))
            .allow_empty(allow_empty);

        if let Some(default_val) = default {
            input = input.default(default_val.to_string());
        }

        match input.interact_text() {
            Ok(value) => {
                if !allow_empty && value.trim().is_empty() {
                    eprintln!("{}", style("  ✗ Input cannot be empty").red());
                    continue;
                }
                return Ok(value);
            }
            Err(e) if is_eof_error(&e) => {
                return Err(anyhow!("Cancelled by user"));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Prompts for a yes/no confirmation
///
/// # Arguments
/// * `prompt` - The prompt text
/// * `default` - Default value if user just presses enter
/// * `non_interactive` - How to behave when not in a TTY
pub fn prompt_confirm(
    prompt: &str,
    default: bool,
    non_interactive: NonInteractiveMode,
) -> Result<bool> {
    if !is_interactive() {
        return match non_interactive {
            NonInteractiveMode::Fail => Err(anyhow!(
                "Interactive confirmation required for: '{}'. Re-run with --all to apply without prompting",
                prompt
            )),
            NonInteractiveMode::Defaults => Ok(default),
        };
    }

    let confirm = Confirm::new()
        .with_prompt(format!("{}", style(format!("→ {}", prompt)).cyan()))
        .default(default)
        .interact_opt()?;

    match confirm {
        Some(value) => Ok(value),
        None => Err(anyhow!("Cancelled by user")),
    }
}

/// Handles input when not in interactive mode
fn handle_non_interactive(
    mode: NonInteractiveMode,
    prompt: &str,
    default: Option<String>,
) -> Result<String> {
    match mode {
        NonInteractiveMode::Fail => Err(anyhow!(
            "Interactive input required for '{}' and no default provided",
            prompt
        )),
        NonInteractiveMode::Defaults => default.ok_or_else(|| {
            anyhow!(
                "No default value available for '{}' in non-interactive mode",
                prompt
            )
        }),
    }
}

/// Checks if an error is due to EOF (Ctrl+D)
fn is_eof_error(error: &dyn std::error::Error) -> bool {
    let message = error.to_string();
    message.contains("EOF") || message.contains("end of file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_non_interactive_fail() {
        let result = handle_non_interactive(NonInteractiveMode::Fail, "Project name", None);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Interactive input required"));
    }

    #[test]
    fn test_handle_non_interactive_defaults() {
        let result = handle_non_interactive(
            NonInteractiveMode::Defaults,
            "Author",
            Some("Jane Doe".to_string()),
        );
        assert_eq!(result.unwrap(), "Jane Doe");
    }

    #[test]
    fn test_handle_non_interactive_defaults_without_value() {
        let result = handle_non_interactive(NonInteractiveMode::Defaults, "Email", None);
        assert!(result.is_err());
    }
}
