//! # CLI Output Styling
//!
//! Status lines printed by the `packsmith` binary. Color is decided once per
//! run from the `--color` flag and the environment:
//!
//! - `--color=always|never|auto`
//! - `NO_COLOR` (any value) disables color, per <https://no-color.org/>
//! - `CLICOLOR=0` disables color, `CLICOLOR_FORCE=1` forces it
//! - `TERM=dumb` disables color
//!
//! Without color, each status line starts with a bracketed plain-text marker
//! instead of a symbol, so output stays greppable in CI logs.

use std::env;

use console::style;

/// Whether output may use color and symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Build from the `--color` flag value, falling back to detection for `auto`
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };
        Self { use_color }
    }

    fn detect_color_support() -> bool {
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

    pub fn plain() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Kind of status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Info,
    Plan,
    Success,
    Failure,
}

impl Status {
    fn symbol(self) -> &'static str {
        match self {
            Status::Info => "•",
            Status::Plan => "→",
            Status::Success => "✔",
            Status::Failure => "✘",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Status::Info => "[INFO]",
            Status::Plan => "[PLAN]",
            Status::Success => "[OK]",
            Status::Failure => "[FAIL]",
        }
    }
}

/// Format one status line
pub fn status_line(config: &OutputConfig, status: Status, message: &str) -> String {
    if !config.use_color {
        return format!("{} {}", status.marker(), message);
    }
    let symbol = style(status.symbol()).force_styling(true);
    let symbol = match status {
        Status::Info => symbol.cyan(),
        Status::Plan => symbol.dim(),
        Status::Success => symbol.green().bold(),
        Status::Failure => symbol.red().bold(),
    };
    format!("{} {}", symbol, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_flags() {
        assert!(OutputConfig::from_env_and_flag("always").use_color);
        assert!(!OutputConfig::from_env_and_flag("NEVER").use_color);
    }

    #[test]
    fn test_plain_status_line() {
        let line = status_line(&OutputConfig::plain(), Status::Success, "Saved 3 files");
        assert_eq!(line, "[OK] Saved 3 files");
    }

    #[test]
    fn test_colored_status_line_uses_symbol() {
        let config = OutputConfig { use_color: true };
        let line = status_line(&config, Status::Failure, "boom");
        assert!(line.contains("✘"));
        assert!(line.ends_with("boom"));
        assert!(!line.contains("[FAIL]"));
    }
}
