//! # tfdoc-validator
//!
//! Validator for Terraform module documentation.
//!
//! Two independent checks, each returning every failure it finds:
//!
//! - [`FileValidator`]: the README, `outputs.tf`, `variables.tf` and
//!   `terraform.tf`, plus any caller-supplied files, must exist and be non-empty.
//! - [`UrlValidator`]: every URL in the documentation text must answer a GET
//!   with `200 OK`. Terraform provider registry listings are exempt.
//!
//! Merging the two result lists is up to the caller; [`ValidationReport`] is
//! provided for that.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tfdoc_validator::{FileValidator, MarkdownContent, UrlValidator, DEFAULT_MAX_CONTENT_SIZE};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let files = FileValidator::new("mod/README.md", "mod", &["USAGE.md"]);
//! for error in files.validate() {
//!     println!("{error}");
//! }
//!
//! let readme = MarkdownContent::from_file(Path::new("mod/README.md"), DEFAULT_MAX_CONTENT_SIZE)?;
//! let urls = UrlValidator::new(&readme)?;
//! for error in urls.validate().await {
//!     println!("{error}");
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod content;
mod error;
mod files;
pub mod output;
mod report;
mod urls;

pub use config::{TERRAFORM_REGISTRY_MARKER, UrlCheckConfig};
pub use content::{ContentProvider, DEFAULT_MAX_CONTENT_SIZE, MarkdownContent};
pub use error::{
    ConfigError, ContentError, FileClass, FileError, FileValidationError, UrlError,
};
pub use files::{FileValidator, REQUIRED_MODULE_FILES};
pub use report::ValidationReport;
pub use urls::{UrlValidator, build_client, extract_urls};
