//! Documentation text supplied to the link checker.
//!
//! The link checker only needs one scannable blob of text; how that text is
//! loaded or parsed is up to the [`ContentProvider`] implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::ContentError;

/// Default cap on README size (10 MiB).
pub const DEFAULT_MAX_CONTENT_SIZE: u64 = 10_485_760;

/// Exposes the raw text that [`crate::UrlValidator`] scans for URLs.
pub trait ContentProvider: Send + Sync {
    /// The full text to scan.
    fn text(&self) -> &str;
}

impl ContentProvider for str {
    fn text(&self) -> &str {
        self
    }
}

impl ContentProvider for String {
    fn text(&self) -> &str {
        self.as_str()
    }
}

/// Raw markdown loaded from a README file.
#[derive(Debug, Clone)]
pub struct MarkdownContent {
    path: Option<PathBuf>,
    data: String,
}

impl MarkdownContent {
    /// Wrap already-loaded markdown text.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            path: None,
            data: data.into(),
        }
    }

    /// Load markdown from `path`, reading at most `max_size` bytes.
    ///
    /// The read is bounded with `Read::take`, so an oversized file is detected
    /// without buffering all of it.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the file cannot be opened or read, is larger
    /// than `max_size`, or is not valid UTF-8.
    pub fn from_file(path: &Path, max_size: u64) -> Result<Self, ContentError> {
        let io_err = |source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = std::fs::File::open(path).map_err(io_err)?;

        // One extra byte tells "exactly max_size" apart from "larger".
        let mut buffer = Vec::new();
        file.take(max_size.saturating_add(1))
            .read_to_end(&mut buffer)
            .map_err(io_err)?;

        if buffer.len() as u64 > max_size {
            return Err(ContentError::TooLarge {
                path: path.to_path_buf(),
                max_size,
            });
        }

        let data = String::from_utf8(buffer).map_err(|_| ContentError::InvalidEncoding {
            path: path.to_path_buf(),
        })?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "loaded documentation");

        Ok(Self {
            path: Some(path.to_path_buf()),
            data,
        })
    }

    /// File the content was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ContentProvider for MarkdownContent {
    fn text(&self) -> &str {
        &self.data
    }
}
