//! Progress feedback for population lookups.
//!
//! Live lookups are the only slow part of a run, so they are the only phase
//! with a progress bar. Bars are hidden in quiet mode (`--quiet` or the
//! `WARDROBE_QUIET` env var) and whenever stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

pub const TEMPLATE_POPULATION: &str = "👥 {msg} {pos}/{len} countries ({percent}%) - {eta}";

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressConfig {
    pub quiet_mode: bool,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var("WARDROBE_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    pub fn should_show_progress(&self) -> bool {
        !self.quiet_mode && std::io::stderr().is_terminal()
    }

    /// A bar over `len` lookups, or a hidden bar.
    pub fn lookup_bar(&self, len: u64) -> ProgressBar {
        if !self.should_show_progress() {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::default_bar()
            .template(TEMPLATE_POPULATION)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░  ");
        let bar = ProgressBar::new(len).with_style(style);
        bar.set_message("Resolving populations");
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_quiet_flag() {
        let config = ProgressConfig::from_env(true);
        assert!(!config.should_show_progress());
        assert!(config.lookup_bar(10).is_hidden());
    }
}
