//! Configuration types for documentation validation.
//!
//! Only the link checker is configurable; the set of required module files
//! is fixed and lives in [`crate::files`].

use std::time::Duration;

/// Path fragment identifying a Terraform provider registry listing.
///
/// Registry pages are rate limited aggressively, so links to them are
/// trusted and never probed.
pub const TERRAFORM_REGISTRY_MARKER: &str = "registry.terraform.io/providers/";

/// Options for [`crate::UrlValidator`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct UrlCheckConfig {
    /// URLs containing any of these substrings are never probed.
    /// Defaults to [`TERRAFORM_REGISTRY_MARKER`].
    pub exempt_patterns: Vec<String>,
    /// Upper bound on in-flight probes. `None` spawns one unbounded task per URL.
    pub max_concurrency: Option<usize>,
    /// Per-request timeout. `None` keeps the HTTP client's default (no timeout).
    pub timeout: Option<Duration>,
}

impl Default for UrlCheckConfig {
    fn default() -> Self {
        Self {
            exempt_patterns: vec![TERRAFORM_REGISTRY_MARKER.to_owned()],
            max_concurrency: None,
            timeout: None,
        }
    }
}

impl UrlCheckConfig {
    /// Whether `url` matches one of the exemption patterns.
    #[must_use]
    pub fn is_exempt(&self, url: &str) -> bool {
        self.exempt_patterns
            .iter()
            .any(|pattern| url.contains(pattern.as_str()))
    }
}
