//! Validation report types.

use serde::Serialize;

use crate::error::{FileValidationError, UrlError};

/// Combined result of the file and URL validators for one module.
///
/// Both error lists are sorted on construction (files by class then path,
/// URLs by URL) so that output is stable even though URL probes finish in
/// arbitrary order.
#[derive(Debug, Serialize)]
#[non_exhaustive]
pub struct ValidationReport {
    /// Whether no check failed.
    pub ok: bool,
    /// Number of files checked (required + additional).
    pub files_checked: usize,
    /// Number of URLs probed. Zero when URL checks were skipped.
    pub urls_checked: usize,
    /// Why URL checks did not run, if they did not. `None` with
    /// `urls_checked == 0` means the README simply has no links.
    pub urls_skipped: Option<String>,
    /// Missing, empty or unreadable files.
    pub file_errors: Vec<FileValidationError>,
    /// Unreachable URLs.
    pub url_errors: Vec<UrlError>,
}

impl ValidationReport {
    /// Merge the two validators' results.
    #[must_use]
    pub fn new(
        files_checked: usize,
        mut file_errors: Vec<FileValidationError>,
        urls_checked: usize,
        mut url_errors: Vec<UrlError>,
    ) -> Self {
        file_errors.sort_by(|a, b| (a.class, &a.path).cmp(&(b.class, &b.path)));
        url_errors.sort_by(|a, b| a.url().cmp(b.url()));
        Self {
            ok: file_errors.is_empty() && url_errors.is_empty(),
            files_checked,
            urls_checked,
            urls_skipped: None,
            file_errors,
            url_errors,
        }
    }

    /// Mark URL checks as not run, with a human-readable reason.
    #[must_use]
    pub fn with_urls_skipped(mut self, reason: impl Into<String>) -> Self {
        self.urls_skipped = Some(reason.into());
        self
    }

    /// Total number of failures across both validators.
    #[must_use]
    pub fn errors_count(&self) -> usize {
        self.file_errors.len() + self.url_errors.len()
    }
}
