//! Theme-aware terminal output.
//!
//! One `Ui` is constructed at startup from the `--color` flag and the
//! environment, then passed explicitly to every handler. No process-wide
//! color state exists.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use quill_common::format_duration;

use crate::cli::ColorMode;

/// ANSI color set for one terminal theme.
struct Theme {
    success: &'static str,
    error: &'static str,
    warning: &'static str,
    info: &'static str,
    dim: &'static str,
    bold: &'static str,
    reset: &'static str,
}

/// Dark terminal backgrounds (the common case).
const DARK: Theme = Theme {
    success: "\x1b[38;2;0;245;212m",
    error: "\x1b[38;2;255;107;107m",
    warning: "\x1b[38;2;255;200;87m",
    info: "\x1b[38;2;72;202;228m",
    dim: "\x1b[38;2;130;154;177m",
    bold: "\x1b[1m",
    reset: "\x1b[0m",
};

/// Light terminal backgrounds: darker tones for contrast.
const LIGHT: Theme = Theme {
    success: "\x1b[38;2;0;150;125m",
    error: "\x1b[38;2;217;61;61m",
    warning: "\x1b[38;2;201;154;46m",
    info: "\x1b[38;2;0;100;160m",
    dim: "\x1b[38;2;100;100;100m",
    bold: "\x1b[1m",
    reset: "\x1b[0m",
};

/// Terminal output context.
pub struct Ui {
    colors: bool,
    theme: &'static Theme,
}

impl Ui {
    /// Build the UI context from the requested color mode and environment.
    pub fn new(mode: ColorMode) -> Self {
        let colors = match mode {
            ColorMode::Never => false,
            ColorMode::Always => true,
            ColorMode::Auto => !no_color() && std::io::stdout().is_terminal(),
        };
        let theme = if light_background() { &LIGHT } else { &DARK };
        Self { colors, theme }
    }

    /// Whether progress animations should run.
    pub fn animations_enabled(&self) -> bool {
        self.colors && std::io::stderr().is_terminal()
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colors {
            format!("{color}{text}{}", self.theme.reset)
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, message: &str) {
        eprintln!("{}", self.paint(self.theme.success, &format!("[OK] {message}")));
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.paint(self.theme.error, &format!("[ERROR] {message}")));
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.paint(self.theme.warning, &format!("[WARN] {message}")));
    }

    pub fn info(&self, message: &str) {
        eprintln!("{}", self.paint(self.theme.info, &format!("[INFO] {message}")));
    }

    pub fn dim(&self, message: &str) {
        eprintln!("{}", self.paint(self.theme.dim, message));
    }

    /// Bold title with an underline, to stdout.
    pub fn header(&self, title: &str) {
        println!("{}", self.paint(self.theme.bold, title));
        println!(
            "{}",
            self.paint(self.theme.dim, &"=".repeat(title.chars().count()))
        );
    }

    /// Bold section title preceded by a blank line.
    pub fn section(&self, title: &str) {
        println!();
        println!("{}", self.paint(self.theme.bold, title));
    }

    /// Inline prompt label without a trailing newline.
    pub fn prompt(&self, label: &str) {
        print!("{}", self.paint(self.theme.bold, label));
        let _ = std::io::stdout().flush();
    }

    /// One streamed fragment, written as-is.
    pub fn stream_chunk(&self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    /// Elapsed-time line shown when a response completes.
    pub fn elapsed(&self, elapsed: Duration) {
        self.dim(&format!("({})", format_duration(elapsed)));
    }

    /// Aligned columnar table.
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        let columns = headers.len();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let header_line = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{h:<width$}", width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", self.paint(self.theme.bold, &header_line));
        println!(
            "{}",
            self.paint(self.theme.dim, &"-".repeat(header_line.chars().count()))
        );
        for row in rows {
            let line = row
                .iter()
                .enumerate()
                .take(columns)
                .map(|(i, cell)| format!("{cell:<width$}", width = widths[i]))
                .collect::<Vec<_>>()
                .join("  ");
            println!("{line}");
        }
    }

    /// Bulleted list.
    pub fn list(&self, items: &[String]) {
        for item in items {
            println!("  - {item}");
        }
    }
}

/// Whether NO_COLOR disables colors.
fn no_color() -> bool {
    std::env::var("NO_COLOR")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

/// Detect a light terminal background from the environment; defaults to dark.
fn light_background() -> bool {
    // COLORFGBG is "fg;bg" where bg 7+ usually means a light background
    if let Ok(colorfgbg) = std::env::var("COLORFGBG")
        && let Some(bg) = colorfgbg.split(';').next_back()
        && let Ok(bg_num) = bg.parse::<u8>()
    {
        return bg_num >= 7;
    }

    if let Ok(profile) = std::env::var("ITERM_PROFILE") {
        return profile.to_lowercase().contains("light");
    }

    false
}
