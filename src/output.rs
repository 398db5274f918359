//! # Output Configuration
//!
//! Controls how the CLI presents install progress and summaries: whether
//! color is used, and the markers printed next to each outcome.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tributary::output::{OutputConfig, Marker};
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} Installed 3 dependencies", out.marker(Marker::Success));
//! ```

use std::env;

use console::Style;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and symbols should be used in output.
    pub use_color: bool,
}

/// The outcome markers printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Success,
    Skipped,
    Warning,
    Failure,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// - `--color=always`: Force colors on (overrides NO_COLOR)
    /// - `--color=never`: Force colors off
    /// - `--color=auto`: Detect based on environment
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stderr().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// The marker for an outcome: a colored symbol, or a bracketed word.
    pub fn marker(&self, marker: Marker) -> String {
        let (symbol, plain, style) = match marker {
            Marker::Success => ("✔", "[OK]", Style::new().green()),
            Marker::Skipped => ("↷", "[SKIP]", Style::new().dim()),
            Marker::Warning => ("⚠", "[WARN]", Style::new().yellow()),
            Marker::Failure => ("✘", "[ERROR]", Style::new().red().bold()),
        };
        if self.use_color {
            style.force_styling(true).apply_to(symbol).to_string()
        } else {
            plain.to_string()
        }
    }

    /// A section heading, bold when color is enabled.
    pub fn heading(&self, text: &str) -> String {
        if self.use_color {
            Style::new()
                .bold()
                .force_styling(true)
                .apply_to(text)
                .to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}
