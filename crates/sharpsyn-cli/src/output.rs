//! Output formatting and reporting
//!
//! Collects per-file results and prints them in the selected format.

use sharpsyn_core::diagnostics::LineIndex;
use sharpsyn_core::{
    Console, Diagnostic, DiagnosticRecord, DiagnosticRenderer, OutputFormat, Parse, Severity,
};
use std::path::PathBuf;

/// Result of parsing one file
pub struct FileReport {
    pub path: PathBuf,
    pub parse: Parse,
}

impl FileReport {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.parse.diagnostics()
    }
}

/// Summary statistics over all files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl Summary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Summary {
            files: reports.len(),
            ..Default::default()
        };
        for diagnostic in reports.iter().flat_map(FileReport::diagnostics) {
            match diagnostic.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info | Severity::Hint => {}
            }
        }
        summary
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Prints reports in one of the renderer's formats
pub struct Reporter {
    renderer: DiagnosticRenderer,
}

impl Reporter {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        let renderer = if no_color {
            DiagnosticRenderer::with_format(format).with_console(Console::no_colors())
        } else {
            DiagnosticRenderer::with_format(format)
        };
        Self { renderer }
    }

    /// Everything the reports produce in the selected format
    pub fn render(&self, reports: &[FileReport], summary: &Summary) -> String {
        match self.renderer.format() {
            OutputFormat::Json => {
                let records: Vec<DiagnosticRecord> = reports
                    .iter()
                    .flat_map(|report| {
                        let text = report.parse.text();
                        let index = LineIndex::new(text);
                        report
                            .diagnostics()
                            .iter()
                            .map(|d| DiagnosticRecord::new(d, text, &index, Some(&report.path)))
                            .collect::<Vec<_>>()
                    })
                    .collect();
                let mut output = DiagnosticRenderer::render_json(&records);
                output.push('\n');
                output
            }
            OutputFormat::Compact => reports
                .iter()
                .map(|r| self.render_file(r))
                .collect::<Vec<_>>()
                .join(""),
            OutputFormat::Human => {
                let mut output = String::new();
                for report in reports.iter().filter(|r| !r.diagnostics().is_empty()) {
                    output.push_str(&self.render_file(report));
                    output.push('\n');
                }
                output.push_str(&self.renderer.render_summary(
                    summary.errors,
                    summary.warnings,
                    summary.files,
                ));
                output.push('\n');
                output
            }
        }
    }

    fn render_file(&self, report: &FileReport) -> String {
        self.renderer
            .render(report.diagnostics(), report.parse.text(), Some(&report.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpsyn_core::{ParseOptions, parse};

    fn report(name: &str, text: &str) -> FileReport {
        FileReport {
            path: PathBuf::from(name),
            parse: parse(text, ParseOptions::default()),
        }
    }

    #[test]
    fn test_summary_counts() {
        let reports = vec![
            report("a.cs", "class A { int x }"),
            report("b.cs", "class B { void M() { while (x); } }"),
        ];
        let summary = Summary::from_reports(&reports);
        assert_eq!(
            summary,
            Summary {
                files: 2,
                errors: 1,
                warnings: 1
            }
        );
        assert!(summary.has_errors());
    }

    #[test]
    fn test_human_output_skips_clean_files() {
        let reports = vec![report("ok.cs", "class A { }"), report("bad.cs", "class B { int x }")];
        let summary = Summary::from_reports(&reports);
        let output = Reporter::new(OutputFormat::Human, true).render(&reports, &summary);
        assert!(output.contains("--> bad.cs:1:17"));
        assert!(!output.contains("ok.cs"));
        assert!(output.ends_with("1 error, 0 warnings in 2 files\n"));
    }

    #[test]
    fn test_json_output_merges_files() {
        let reports = vec![report("a.cs", "class A { int x }"), report("b.cs", "class B {")];
        let summary = Summary::from_reports(&reports);
        let output = Reporter::new(OutputFormat::Json, true).render(&reports, &summary);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let files: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["file"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(files, vec!["a.cs", "b.cs"]);
    }
}
