//! Terminal console utilities for diagnostic output

use std::env;
use std::io::{self, IsTerminal};

use crate::diagnostics::Severity;

/// Colour and width settings for terminal output
#[derive(Debug, Clone)]
pub struct Console {
    color_enabled: bool,
    max_width: usize,
}

impl Console {
    /// Colours when stdout is a terminal and `NO_COLOR` is unset
    pub fn new() -> Self {
        Self {
            color_enabled: io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none(),
            max_width: Self::detect_terminal_width(),
        }
    }

    pub fn no_colors() -> Self {
        Self {
            color_enabled: false,
            max_width: Self::detect_terminal_width(),
        }
    }

    /// Force colours on or off regardless of the terminal
    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.color_enabled = enabled;
        self
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    fn detect_terminal_width() -> usize {
        term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
    }

    pub fn is_color_enabled(&self) -> bool {
        self.color_enabled
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }

    pub fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        format!("\x1b[{}m{text}\x1b[0m", color.ansi_code())
    }

    /// Colour used for a diagnostic of `severity`
    pub fn severity_color(severity: Severity) -> Color {
        match severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Blue,
            Severity::Hint => Color::Dim,
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// ANSI colours used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
    Dim,
    Bold,
}

impl Color {
    fn ansi_code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Green => 32,
            Color::Dim => 2,
            Color::Bold => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_colors_passthrough() {
        let console = Console::no_colors();
        assert!(!console.is_color_enabled());
        assert_eq!(console.colorize("text", Color::Red), "text");
        assert_eq!(console.colorize("text", Color::Bold), "text");
    }

    #[test]
    fn test_forced_colors() {
        let console = Console::no_colors().with_colors(true);
        assert_eq!(console.colorize("x", Color::Red), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_with_max_width() {
        let console = Console::no_colors().with_max_width(80);
        assert_eq!(console.max_width(), 80);
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(Console::severity_color(Severity::Error), Color::Red);
        assert_eq!(Console::severity_color(Severity::Warning), Color::Yellow);
    }
}
