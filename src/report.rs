/*!
 * Reporting functionality for ctxfile
 *
 * Renders a summary of a generated document as console tables using the
 * tabled library.
 */

use std::path::PathBuf;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::document::DocumentStatistics;
use crate::types::AddResult;
use crate::utils::format_number;

/// Information about a file in the report
#[derive(Debug, Clone, Default)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
    /// Read failure shown in place of the content
    pub error: Option<String>,
}

/// Summary of one generation run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Where the document went
    pub destination: String,
    /// Root folder the paths are relative to
    pub root: Option<PathBuf>,
    /// Time taken to collect files and build the document
    pub duration: Duration,
    /// Selection counts
    pub selection: AddResult,
    /// Document statistics
    pub statistics: DocumentStatistics,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for generation results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &GenerationReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr, keeping stdout for the document
    pub fn print_report(&self, report: &GenerationReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &GenerationReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let root = report
            .root
            .as_ref()
            .map(|r| r.display().to_string())
            .unwrap_or_else(|| "Not set".to_string());

        let rows = vec![
            SummaryRow {
                key: "Destination",
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "Root",
                value: root,
            },
            SummaryRow {
                key: "Process Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "Files Added",
                value: format!(
                    "{} ({} duplicates skipped)",
                    format_number(report.selection.added),
                    format_number(report.selection.skipped)
                ),
            },
            SummaryRow {
                key: "Files Processed",
                value: format_number(stats.files_processed),
            },
            SummaryRow {
                key: "Read Errors",
                value: format_number(stats.read_errors),
            },
            SummaryRow {
                key: "Total Lines",
                value: format_number(stats.total_lines),
            },
            SummaryRow {
                key: "LLM Tokens",
                value: format!(
                    "{} tokens (estimated)",
                    format_number(stats.total_chars / 4)
                ),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &GenerationReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        let rows: Vec<FileRow> = report
            .statistics
            .file_details
            .iter()
            .map(|(path, info)| match &info.error {
                Some(_) => FileRow {
                    path: path.clone(),
                    lines: "-".to_string(),
                    tokens: "unreadable".to_string(),
                },
                None => FileRow {
                    path: path.clone(),
                    lines: format_number(info.lines),
                    tokens: format_number(info.chars / 4),
                },
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &GenerationReport) -> String {
        format!(
            "FILES\n{}\n\nSUMMARY\n{}",
            self.create_files_table(report),
            self.create_summary_table(report)
        )
    }
}
