//! Diagnostic renderer with rich terminal output

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{Diagnostic, LineIndex, Severity};
use crate::console::{Color, Console};
use crate::error::SharpsynError;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Header plus a code frame with carets under the span
    #[default]
    Human,
    /// One JSON array of [`DiagnosticRecord`]s
    Json,
    /// `file:line:col: severity[code]: message`, one per line
    Compact,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
            OutputFormat::Compact => "compact",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = SharpsynError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "compact" => Ok(OutputFormat::Compact),
            _ => Err(SharpsynError::invalid_option(
                "format",
                s,
                "human, json, compact",
            )),
        }
    }
}

/// A diagnostic resolved against its source text, ready for output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub start: u32,
    pub end: u32,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl DiagnosticRecord {
    pub fn new(diagnostic: &Diagnostic, text: &str, index: &LineIndex, file: Option<&Path>) -> Self {
        let (line, column) = index.line_col(text, diagnostic.span.start);
        let (end_line, end_column) = index.line_col(text, diagnostic.span.end);
        Self {
            file: file.map(|p| p.display().to_string()),
            code: diagnostic.code.as_str().to_string(),
            severity: diagnostic.severity,
            message: diagnostic.message(),
            start: diagnostic.span.start,
            end: diagnostic.span.end,
            line,
            column,
            end_line,
            end_column,
        }
    }
}

/// Renders diagnostics for one source text
pub struct DiagnosticRenderer {
    console: Console,
    format: OutputFormat,
}

impl DiagnosticRenderer {
    /// Human output with automatic colour detection
    pub fn new() -> Self {
        Self {
            console: Console::new(),
            format: OutputFormat::Human,
        }
    }

    pub fn no_colors() -> Self {
        Self {
            console: Console::no_colors(),
            format: OutputFormat::Human,
        }
    }

    /// Machine formats never carry colour codes
    pub fn with_format(format: OutputFormat) -> Self {
        let console = match format {
            OutputFormat::Human => Console::new(),
            OutputFormat::Json | OutputFormat::Compact => Console::no_colors(),
        };
        Self { console, format }
    }

    pub fn with_console(mut self, console: Console) -> Self {
        if self.format == OutputFormat::Human {
            self.console = console;
        }
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render every diagnostic of `text` in the configured format
    pub fn render(&self, diagnostics: &[Diagnostic], text: &str, file: Option<&Path>) -> String {
        let index = LineIndex::new(text);
        let records: Vec<DiagnosticRecord> = diagnostics
            .iter()
            .map(|d| DiagnosticRecord::new(d, text, &index, file))
            .collect();
        match self.format {
            OutputFormat::Json => Self::render_json(&records),
            OutputFormat::Compact => records
                .iter()
                .map(|r| self.render_compact(r))
                .collect::<Vec<_>>()
                .join(""),
            OutputFormat::Human => records
                .iter()
                .map(|r| self.render_human(r, text, &index))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// JSON array of records, for callers that merge several files
    pub fn render_json(records: &[DiagnosticRecord]) -> String {
        serde_json::to_string_pretty(records)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }

    fn render_compact(&self, record: &DiagnosticRecord) -> String {
        let file = record.file.as_deref().unwrap_or("<input>");
        format!(
            "{file}:{}:{}: {}[{}]: {}\n",
            record.line, record.column, record.severity, record.code, record.message
        )
    }

    fn render_header(&self, record: &DiagnosticRecord) -> String {
        let color = Console::severity_color(record.severity);
        format!(
            "{}{}: {}",
            self.console.colorize(&record.severity.to_string(), color),
            self.console.colorize(&format!("[{}]", record.code), Color::Dim),
            self.console.colorize(&record.message, Color::Bold)
        )
    }

    fn render_human(&self, record: &DiagnosticRecord, text: &str, index: &LineIndex) -> String {
        let mut output = self.render_header(record);
        output.push('\n');
        output.push_str(&self.render_code_frame(record, text, index));
        output
    }

    /// Location line, the offending line with one line of context on each
    /// side, and carets under the span. Lines wider than the console are
    /// cut to a window that keeps the carets visible.
    fn render_code_frame(&self, record: &DiagnosticRecord, text: &str, index: &LineIndex) -> String {
        let color = Console::severity_color(record.severity);
        let first = record.line.saturating_sub(1).max(1);
        let last = (record.line + 1).min(index.line_count());
        let gutter = last.to_string().len();
        let available = self.console.max_width().saturating_sub(gutter + 5).max(MIN_FRAME_WIDTH);

        let (mut pad, mut carets) = (0, 1);
        if let Some(range) = index.line_range(text, record.line) {
            let start = (record.start as usize).clamp(range.start, range.end);
            let end = if record.end_line == record.line {
                (record.end as usize).clamp(start, range.end)
            } else {
                range.end
            };
            pad = text[range.start..start].width();
            carets = text[start..end].width().max(1);
        }
        let skip = if pad + carets <= available {
            0
        } else {
            pad.saturating_sub(available / 3)
        };

        let mut frame = format!(
            "  {} {}:{}:{}\n",
            self.console.colorize("-->", Color::Blue),
            record.file.as_deref().unwrap_or("<input>"),
            record.line,
            record.column
        );
        for line in first..=last {
            let Some(range) = index.line_range(text, line) else {
                continue;
            };
            let content = clip_columns(&text[range], skip, available);
            let marker = if line == record.line {
                self.console.colorize(">", color)
            } else {
                " ".to_string()
            };
            frame.push_str(&format!(
                "{marker} {}{}{content}\n",
                self.console.colorize(&format!("{line:>gutter$}"), Color::Dim),
                self.console.colorize(" | ", Color::Dim),
            ));
            if line == record.line {
                let pad = pad - skip;
                let carets = carets.min(available.saturating_sub(pad)).max(1);
                frame.push_str(&format!(
                    "  {}{}{}{}\n",
                    " ".repeat(gutter),
                    self.console.colorize(" | ", Color::Dim),
                    " ".repeat(pad),
                    self.console.colorize(&"^".repeat(carets), color)
                ));
            }
        }
        frame
    }

    /// One-line tally, e.g. `2 errors, 1 warning in 3 files`
    pub fn render_summary(&self, errors: usize, warnings: usize, files: usize) -> String {
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("{n} {word}")
            } else {
                format!("{n} {word}s")
            }
        };
        let errors_text = plural(errors, "error");
        let errors_text = if errors > 0 {
            self.console.colorize(&errors_text, Color::Red)
        } else {
            self.console.colorize(&errors_text, Color::Green)
        };
        format!(
            "{errors_text}, {} in {}",
            plural(warnings, "warning"),
            plural(files, "file")
        )
    }
}

/// Narrowest source window a code frame is cut to
const MIN_FRAME_WIDTH: usize = 20;

/// Display columns `skip..skip + width` of `line`, with `...` standing in
/// for the columns cut off on either side
fn clip_columns(line: &str, skip: usize, width: usize) -> String {
    let total = line.width();
    if skip == 0 && total <= width {
        return line.to_string();
    }
    let cut_left = skip > 0;
    let cut_right = total > skip + width;
    let from = if cut_left { skip + 3 } else { skip };
    let to = if cut_right { skip + width - 3 } else { skip + width };

    let mut out = String::new();
    if cut_left {
        out.push_str("...");
    }
    let mut column = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        let next = column + w;
        if column >= from && next <= to {
            out.push(ch);
        } else if column < from && next > from {
            // wide character split by the left edge
            out.push_str(&" ".repeat(next.min(to) - from));
        }
        column = next;
        if column >= to {
            break;
        }
    }
    if cut_right {
        out.push_str("...");
    }
    out
}

impl Default for DiagnosticRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{ErrorCode, Span};

    fn missing_semicolon() -> (String, Vec<Diagnostic>) {
        let text = "class C\n{\n    int x\n}\n".to_string();
        let offset = text.find("\n}").unwrap() as u32;
        let diagnostic = Diagnostic::with_args(ErrorCode::TokenExpected, Span::empty(offset), [";"]);
        (text, vec![diagnostic])
    }

    #[test]
    fn test_record_positions() {
        let (text, diagnostics) = missing_semicolon();
        let index = LineIndex::new(&text);
        let record = DiagnosticRecord::new(&diagnostics[0], &text, &index, None);
        assert_eq!(record.code, "SS1100");
        assert_eq!((record.line, record.column), (3, 10));
        assert_eq!(record.message, "';' expected");
    }

    #[test]
    fn test_human_output() {
        let (text, diagnostics) = missing_semicolon();
        let output = DiagnosticRenderer::no_colors().render(&diagnostics, &text, Some(Path::new("a.cs")));
        insta::assert_snapshot!(output, @r"
        error[SS1100]: ';' expected
          --> a.cs:3:10
          2 | {
        > 3 |     int x
            |          ^
          4 | }
        ");
    }

    #[test]
    fn test_long_lines_fit_the_console() {
        let text = format!("int x = {}1\n", "a + ".repeat(30));
        let offset = text.find('\n').unwrap() as u32;
        let diagnostics = vec![Diagnostic::with_args(ErrorCode::TokenExpected, Span::empty(offset), [";"])];

        let narrow = DiagnosticRenderer::no_colors().with_console(Console::no_colors().with_max_width(40));
        let output = narrow.render(&diagnostics, &text, None);
        assert!(output.lines().all(|line| line.width() <= 40), "{output}");
        let source = output.lines().find(|line| line.starts_with('>')).unwrap();
        let carets = output.lines().find(|line| line.contains('^')).unwrap();
        assert_eq!(source, "> 1 | ... + a + 1");
        assert_eq!(carets.find('^'), Some(source.len()));

        let wide = DiagnosticRenderer::no_colors().with_console(Console::no_colors().with_max_width(200));
        let output = wide.render(&diagnostics, &text, None);
        assert!(!output.contains("..."));
    }

    #[test]
    fn test_clip_columns() {
        assert_eq!(clip_columns("abcdefghij", 0, 20), "abcdefghij");
        assert_eq!(clip_columns("abcdefghijklmnop", 0, 10), "abcdefg...");
        assert_eq!(clip_columns("abcdefghijklmnop", 4, 10), "...hijk...");
    }

    #[test]
    fn test_compact_output() {
        let (text, diagnostics) = missing_semicolon();
        let output = DiagnosticRenderer::with_format(OutputFormat::Compact).render(
            &diagnostics,
            &text,
            Some(Path::new("a.cs")),
        );
        assert_eq!(output, "a.cs:3:10: error[SS1100]: ';' expected\n");
    }

    #[test]
    fn test_json_output() {
        let (text, diagnostics) = missing_semicolon();
        let output = DiagnosticRenderer::with_format(OutputFormat::Json).render(&diagnostics, &text, None);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["code"], "SS1100");
        assert_eq!(parsed[0]["severity"], "error");
        assert_eq!(parsed[0]["line"], 3);
        assert!(parsed[0].get("file").is_none());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_summary() {
        let renderer = DiagnosticRenderer::no_colors();
        assert_eq!(renderer.render_summary(1, 0, 2), "1 error, 0 warnings in 2 files");
    }
}
