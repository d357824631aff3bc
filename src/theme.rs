//! Terminal theme and spinner helpers.
//!
//! Respects the `NO_COLOR` env-var and the `--no-color` CLI flag.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static COLOR_DISABLED: AtomicBool = AtomicBool::new(false);

/// Initialise the colour system.  Checks `NO_COLOR` and the optional
/// `--no-color` flag; call once at startup after CLI parsing.
pub fn init_color(no_color_flag: bool) {
    if no_color_flag
        || std::env::var("NO_COLOR")
            .map(|v| !v.is_empty())
            .unwrap_or(false)
    {
        COLOR_DISABLED.store(true, Ordering::Relaxed);
        colored::control::set_override(false);
    }
}

fn is_color() -> bool {
    !COLOR_DISABLED.load(Ordering::Relaxed)
}

/// Kingfisher palette hex values.
pub mod palette {
    pub const ACCENT: (u8, u8, u8) = (0x2D, 0x9C, 0xDB);
    pub const INFO: (u8, u8, u8) = (0x56, 0xCC, 0xF2);
    pub const SUCCESS: (u8, u8, u8) = (0x27, 0xAE, 0x60);
    pub const WARN: (u8, u8, u8) = (0xF2, 0x99, 0x4A);
    pub const ERROR: (u8, u8, u8) = (0xEB, 0x57, 0x57);
    pub const MUTED: (u8, u8, u8) = (0x82, 0x8A, 0x8F);
}

fn apply(text: &str, rgb: (u8, u8, u8)) -> String {
    if is_color() {
        text.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        text.to_string()
    }
}

/// Primary accent (headings, labels).
pub fn accent(text: &str) -> String {
    apply(text, palette::ACCENT)
}

/// Informational values.
pub fn info(text: &str) -> String {
    apply(text, palette::INFO)
}

/// Success state.
pub fn success(text: &str) -> String {
    apply(text, palette::SUCCESS)
}

/// Warning / attention.
pub fn warn(text: &str) -> String {
    apply(text, palette::WARN)
}

/// Error / failure.
pub fn error(text: &str) -> String {
    apply(text, palette::ERROR)
}

/// De-emphasis / metadata.
pub fn muted(text: &str) -> String {
    apply(text, palette::MUTED)
}

/// Bold heading in accent colour.
pub fn heading(text: &str) -> String {
    if is_color() {
        text.truecolor(
            palette::ACCENT.0,
            palette::ACCENT.1,
            palette::ACCENT.2,
        )
        .bold()
        .to_string()
    } else {
        text.to_string()
    }
}

/// Green ✓
pub fn icon_ok(label: &str) -> String {
    format!("{} {}", success("✓"), label)
}

/// Red ✗
pub fn icon_fail(label: &str) -> String {
    format!("{} {}", error("✗"), label)
}

/// Yellow ⚠
pub fn icon_warn(label: &str) -> String {
    format!("{} {}", warn("⚠"), label)
}

/// Format "  Label : value" with the label dimmed and the value highlighted.
pub fn label_value(label: &str, value: &str) -> String {
    format!("  {} : {}", muted(label), info(value))
}

// ── Spinner helpers ─────────────────────────────────────────────────────────

const SPINNER_CHARS: &[&str] = &["◒", "◐", "◓", "◑"];

/// Create an indeterminate spinner with a message.  The caller finishes it
/// via [`spinner_ok`] / [`spinner_fail`].
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = if is_color() {
        ProgressStyle::with_template("{spinner:.cyan}  {msg}")
            .unwrap()
            .tick_strings(SPINNER_CHARS)
    } else {
        ProgressStyle::with_template("{spinner}  {msg}")
            .unwrap()
            .tick_strings(SPINNER_CHARS)
    };
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success icon + message.
pub fn spinner_ok(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(icon_ok(message));
}

/// Finish a spinner with a failure icon + message.
pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(icon_fail(message));
}
