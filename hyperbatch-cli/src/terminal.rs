// ============================================================================
// hyperbatch-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// Sections, status lines, the final batch summary and error reports. All
// output goes to stderr so stdout stays clean for --json-progress.
//
// Components follow a small visual hierarchy:
//
// 1. Sections (===== SECTION =====)
// 2. Status items (  Label:           Value)
// 3. Per-file lines (✓ name, ✗ name: reason)

// ---- External crate imports ----
use hyperbatch_core::format_duration;
use hyperbatch_core::reporting::{BatchSummary, FileStatus};
use hyperbatch_core::utils::display_name;
use owo_colors::OwoColorize;

// ---- Standard library imports ----
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};

// ============================================================================
// STYLING CONSTANTS
// ============================================================================

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const ERROR_SYMBOL: &str = "✗";
    pub const SKIPPED_SYMBOL: &str = "-";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";
    pub const LABEL_WIDTH: usize = 16;
}

// Global color setting
static USE_COLOR: AtomicBool = AtomicBool::new(true);

/// Set whether to use color in terminal output
pub fn set_color(enable: bool) {
    USE_COLOR.store(enable, Ordering::Relaxed);
}

fn should_use_color() -> bool {
    USE_COLOR.load(Ordering::Relaxed)
}

/// Color is on unless NO_COLOR is set.
pub fn color_from_env() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

// ============================================================================
// COMPONENT RENDERING
// ============================================================================

pub fn render_section(title: &str, color: bool) -> String {
    let title = title.to_uppercase();
    if color {
        format!(
            "{}{}{}",
            styling::SECTION_PREFIX,
            title.cyan().bold(),
            styling::SECTION_SUFFIX
        )
    } else {
        format!("{}{}{}", styling::SECTION_PREFIX, title, styling::SECTION_SUFFIX)
    }
}

pub fn render_status(label: &str, value: &str, highlight: bool, color: bool) -> String {
    let label = format!("{label}:");
    let padded = format!("{label:<width$}", width = styling::LABEL_WIDTH);
    if color && highlight {
        format!("{}{} {}", styling::STATUS_INDENT, padded, value.bold())
    } else {
        format!("{}{} {}", styling::STATUS_INDENT, padded, value)
    }
}

fn render_file_line(name: &str, status: &FileStatus, color: bool) -> String {
    let (symbol, detail) = match status {
        FileStatus::Succeeded => (styling::SUCCESS_SYMBOL, String::new()),
        FileStatus::Failed(msg) => (styling::ERROR_SYMBOL, format!(": failed: {msg}")),
        FileStatus::Cancelled => (styling::ERROR_SYMBOL, ": cancelled".to_string()),
        FileStatus::Skipped(msg) => (styling::SKIPPED_SYMBOL, format!(": skipped: {msg}")),
    };

    if !color {
        return format!("{}{} {}{}", styling::STATUS_INDENT, symbol, name, detail);
    }
    let symbol = match status {
        FileStatus::Succeeded => symbol.green().to_string(),
        FileStatus::Failed(_) | FileStatus::Cancelled => symbol.red().to_string(),
        FileStatus::Skipped(_) => symbol.yellow().to_string(),
    };
    format!("{}{} {}{}", styling::STATUS_INDENT, symbol, name, detail)
}

/// Renders the end-of-batch report: one line per file and the tally.
pub fn render_summary(summary: &BatchSummary, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_section("Summary", color));
    for result in &summary.results {
        let _ = writeln!(
            out,
            "{}",
            render_file_line(&display_name(&result.input), &result.status, color)
        );
    }
    let _ = writeln!(out);

    let succeeded = format!("{} of {}", summary.succeeded(), summary.total());
    let _ = writeln!(out, "{}", render_status("Succeeded", &succeeded, true, color));
    for (label, count) in [
        ("Failed", summary.failed()),
        ("Cancelled", summary.cancelled()),
        ("Skipped", summary.skipped()),
    ] {
        if count > 0 {
            let _ = writeln!(out, "{}", render_status(label, &count.to_string(), false, color));
        }
    }
    let elapsed = format_duration(summary.total_elapsed.as_secs_f64());
    let _ = write!(out, "{}", render_status("Total time", &elapsed, false, color));
    out
}

pub fn render_error(title: &str, message: &str, suggestion: Option<&str>, color: bool) -> String {
    let mut out = if color {
        format!("{} {}", styling::ERROR_SYMBOL, title.red().bold())
    } else {
        format!("{} {}", styling::ERROR_SYMBOL, title)
    };
    let _ = write!(out, "\n{}Message:  {}", styling::STATUS_INDENT, message);
    if let Some(suggestion) = suggestion {
        let _ = write!(out, "\n{}Suggestion: {}", styling::STATUS_INDENT, suggestion);
    }
    out
}

// ============================================================================
// PRINTING
// ============================================================================

pub fn print_section(title: &str) {
    eprintln!();
    eprintln!("{}", render_section(title, should_use_color()));
}

pub fn print_status(label: &str, value: &str, highlight: bool) {
    eprintln!("{}", render_status(label, value, highlight, should_use_color()));
}

pub fn print_summary(summary: &BatchSummary) {
    eprintln!();
    eprintln!("{}", render_summary(summary, should_use_color()));
}

/// Errors are printed regardless of verbosity.
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    eprintln!("{}", render_error(title, message, suggestion, should_use_color()));
}
