//! Shared output formatting for validation reports.
//!
//! Provides JSON and plain-text formatters for `ValidationReport`.
//! Color/terminal formatting belongs to the CLI layer.

use std::io::Write;

use crate::report::ValidationReport;

/// Format a `ValidationReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `ValidationReport` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  TERRAFORM MODULE DOCUMENTATION VALIDATOR")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Files checked:  {}", report.files_checked)?;
    match &report.urls_skipped {
        Some(reason) => writeln!(writer, "  URLs checked:   skipped ({reason})")?,
        None => writeln!(writer, "  URLs checked:   {}", report.urls_checked)?,
    }
    writeln!(writer, "  Errors found:   {}", report.errors_count())?;
    writeln!(writer)?;

    if !report.file_errors.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  FILE ERRORS")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for error in &report.file_errors {
            writeln!(writer, "{error}")?;
        }
        writeln!(writer)?;
    }

    if !report.url_errors.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  URL ERRORS")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for error in &report.url_errors {
            writeln!(writer, "{error}")?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if report.ok {
        writeln!(writer, "\u{2713} All checks passed")?;
    } else {
        if !report.file_errors.is_empty() {
            writeln!(
                writer,
                "\u{2717} {} file problem(s) found",
                report.file_errors.len()
            )?;
        }
        if !report.url_errors.is_empty() {
            writeln!(
                writer,
                "\u{2717} {} unreachable URL(s) found",
                report.url_errors.len()
            )?;
        }
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}
