//! Terminal prompts for missing settings

use dialoguer::{theme::ColorfulTheme, Input, Password};

use crate::core::config::{ConfigError, InputProvider};

/// Asks on the terminal; empty answers are accepted as-is
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputProvider for TerminalPrompter {
    fn text(&mut self, prompt: &str) -> Result<Option<String>, ConfigError> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map(Some)
            .map_err(|e| ConfigError::Prompt(e.to_string()))
    }

    fn secret(&mut self, prompt: &str) -> Result<Option<String>, ConfigError> {
        Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map(Some)
            .map_err(|e| ConfigError::Prompt(e.to_string()))
    }
}
