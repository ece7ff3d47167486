//! # Output Configuration
//!
//! Controls whether CLI output uses color and emoji, based on terminal
//! capabilities and user preferences.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```
//! use bmad_provisioner::output::{emoji, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("never");
//! assert_eq!(emoji(&config, "🔍", "[SCAN]"), "[SCAN]");
//! ```

use std::env;

use crate::status::ChangeType;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///   (case-insensitive; anything else is treated as "auto")
    ///
    /// # Behavior
    /// - `--color=always`: emoji markers even when `NO_COLOR` is set or stdout
    ///   is piped
    /// - `--color=never`: bracketed plain markers such as `[OK]`, which is
    ///   what the end-to-end tests match on
    /// - `--color=auto`: decided from the environment
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
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

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain alternative otherwise.
///
/// # Arguments
/// * `config` - The output configuration
/// * `emoji_str` - Marker used when colors are enabled
/// * `plain` - Marker used when colors are disabled; keep it ASCII so logs
///   and CI output stay greppable
///
/// # Example
/// ```rust,ignore
/// let out = OutputConfig::from_env_and_flag(color_flag);
/// println!("{} Provisioning reference data...", emoji(&out, "🚀", "[RUN]"));
/// ```
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Marker printed in front of a classified artifact or merged row.
///
/// | `ChangeType` | Emoji | Plain |
/// |---|---|---|
/// | `Missing` | ❌ | `[MISSING]` |
/// | `Outdated` | ⚠️ | `[OUTDATED]` |
/// | `UpToDate` | ✅ | `[OK]` |
/// | `Conflicting` | 🔥 | `[CONFLICT]` |
/// | `Extra` | 📦 | `[EXTRA]` |
pub fn status_marker(config: &OutputConfig, change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Missing => emoji(config, "❌", "[MISSING]"),
        ChangeType::Outdated => emoji(config, "⚠️", "[OUTDATED]"),
        ChangeType::UpToDate => emoji(config, "✅", "[OK]"),
        ChangeType::Conflicting => emoji(config, "🔥", "[CONFLICT]"),
        ChangeType::Extra => emoji(config, "📦", "[EXTRA]"),
    }
}
