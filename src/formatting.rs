use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

/// How the terminal writer decorates its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
    /// Draw tables with box characters instead of ASCII
    pub unicode: bool,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            unicode: true,
        }
    }
}

impl FormattingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // NO_COLOR per no-color.org
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }
        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }
        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// ASCII-only, no colors.
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            unicode: false,
        }
    }

    /// Apply the color decision to the `colored` crate globally.
    pub fn apply(&self) {
        colored::control::set_override(self.color.should_use_color());
    }

    pub fn header(&self, text: &str) -> String {
        if self.color.should_use_color() {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn highlight(&self, text: &str) -> String {
        if self.color.should_use_color() {
            text.green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warning(&self, text: &str) -> String {
        if self.color.should_use_color() {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color.should_use_color() {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_never_colors() {
        let plain = FormattingConfig::plain();
        assert!(!plain.color.should_use_color());
        assert!(!plain.unicode);
        assert_eq!(plain.header("Results"), "Results");
        assert_eq!(plain.warning("3 excluded"), "3 excluded");
    }

    #[test]
    fn test_explicit_modes() {
        assert!(ColorMode::Always.should_use_color());
        assert!(!ColorMode::Never.should_use_color());
    }
}
