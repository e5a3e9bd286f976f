//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro shown only with `--verbose`
//! - `OutcomeLine` for the final ✓/✗ line of each command
//!
//! # Example
//!
//! ```ignore
//! log!("git"; "checkout {}", branch);
//! OutcomeLine::new().success("pushed article/my_first_post");
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "git" | "clone" => prefix.bright_blue().bold().to_string(),
        "host" | "auth" => prefix.bright_magenta().bold().to_string(),
        "content" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Outcome line
// ============================================================================

/// Final status line of a command.
///
/// Mirrors the status string handed to the presentation layer: one ✓ or ✗
/// line, with optional detail lines underneath.
pub struct OutcomeLine;

impl OutcomeLine {
    pub const fn new() -> Self {
        Self
    }

    /// Display success message (✓ prefix, green).
    pub fn success(&self, message: &str) {
        self.display(format!("{}", "✓".green()), message);
    }

    /// Display warning message (⚠ prefix, yellow).
    pub fn warning(&self, message: &str) {
        self.display(format!("{}", "⚠".yellow()), message);
    }

    /// Display error message (✗ prefix, red) with optional detail.
    pub fn error(&self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{}", detail.dimmed())
        };
        self.display(format!("{}", "✗".red()), &message);
    }

    fn display(&self, symbol: String, message: &str) {
        let mut stdout = stdout().lock();
        writeln!(stdout, "{symbol} {message}").ok();
        stdout.flush().ok();
    }
}

impl Default for OutcomeLine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_contains_module_name() {
        assert!(colorize_prefix("git", "git").contains("[git]"));
        assert!(colorize_prefix("Host", "host").contains("[Host]"));
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
