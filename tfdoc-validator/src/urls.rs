//! URL discovery and concurrent reachability probing.
//!
//! Two stages:
//! 1. A strict discovery regex pulls every `scheme://...` literal out of the text
//! 2. Each distinct, non-exempt URL gets its own probe task (HTTP GET)

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use reqwest::{Client, StatusCode};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;

use crate::config::UrlCheckConfig;
use crate::content::ContentProvider;
use crate::error::{ConfigError, UrlError};

/// Strict URL discovery: a scheme is mandatory, so bare domains such as
/// `example.com` never match. Whitespace, quotes, square brackets and angle
/// brackets end a URL. Parentheses are allowed; an unbalanced closing `)`
/// (the end of a markdown link) is trimmed afterwards.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(concat!(
        r"(?i)\b",
        r"[a-z][a-z0-9+.\-]*://",   // scheme
        r#"[^\s<>\[\]{}"'`|\\^]+"#, // authority, path, query, fragment
    )) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid URL discovery regex: {err}"),
    }
});

/// Prose punctuation and markdown emphasis that commonly trails a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '*', '_', '~'];

/// Strip trailing punctuation and any closing `)` that has no matching `(`.
fn trim_url_end(mut url: &str) -> &str {
    loop {
        url = url.trim_end_matches(TRAILING_PUNCTUATION);
        let unbalanced = url.matches(')').count() > url.matches('(').count();
        match url.strip_suffix(')') {
            Some(stripped) if unbalanced => url = stripped,
            _ => return url,
        }
    }
}

/// Extract every URL literal from `text`, in order of appearance.
///
/// Only `scheme://...` forms are recognised: `mailto:` and other
/// authority-less URIs are not extracted and so are never probed.
/// Balanced parentheses stay part of the URL
/// (`https://en.wikipedia.org/wiki/Rust_(programming_language)`).
///
/// Duplicates are kept; see [`UrlValidator::urls`] for the probe set.
#[must_use]
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .filter_map(|mat| {
            let url = trim_url_end(mat.as_str());
            let (_, rest) = url.split_once("://")?;
            (!rest.is_empty()).then(|| url.to_owned())
        })
        .collect()
}

/// Build a client for probing. The per-request timeout is applied separately,
/// so a client passed to [`UrlValidator::with_client`] honours it too.
///
/// # Errors
///
/// Returns [`ConfigError::HttpClient`] if the TLS backend cannot be initialised.
pub fn build_client() -> Result<Client, ConfigError> {
    Ok(Client::builder().build()?)
}

/// Probes every URL found in a document and reports the unreachable ones.
pub struct UrlValidator<'a, C: ContentProvider + ?Sized> {
    content: &'a C,
    client: Client,
    config: UrlCheckConfig,
}

impl<'a, C: ContentProvider + ?Sized> UrlValidator<'a, C> {
    /// Validator with the default exemptions and no concurrency bound.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(content: &'a C) -> Result<Self, ConfigError> {
        Self::with_config(content, UrlCheckConfig::default())
    }

    /// Validator with its own freshly built HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP client cannot be built or
    /// `max_concurrency` is zero.
    pub fn with_config(content: &'a C, config: UrlCheckConfig) -> Result<Self, ConfigError> {
        Self::with_client(content, build_client()?, config)
    }

    /// Validator sharing an existing client. `reqwest::Client` is an
    /// immutable handle around a connection pool, so one instance can serve
    /// every validator in the process.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroConcurrency`] if `max_concurrency` is `Some(0)`.
    pub fn with_client(
        content: &'a C,
        client: Client,
        config: UrlCheckConfig,
    ) -> Result<Self, ConfigError> {
        if config.max_concurrency == Some(0) {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(Self {
            content,
            client,
            config,
        })
    }

    /// The URLs [`validate`](Self::validate) will probe: distinct, in order
    /// of first appearance, exemptions removed.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        extract_urls(self.content.text())
            .into_iter()
            .filter(|url| {
                if self.config.is_exempt(url) {
                    tracing::debug!(%url, "skipping exempt URL");
                    return false;
                }
                seen.insert(url.clone())
            })
            .collect()
    }

    /// Probe every non-exempt URL concurrently and collect the failures.
    ///
    /// Blocks until all probes have finished. The result order follows
    /// completion order and is not deterministic.
    pub async fn validate(&self) -> Vec<UrlError> {
        let urls = self.urls();
        if urls.is_empty() {
            tracing::debug!("no URLs to probe");
            return Vec::new();
        }

        let total = urls.len();
        // One slot per URL: producers never wait on the consumer.
        let (tx, mut rx) = mpsc::channel(total);
        let limiter = self
            .config
            .max_concurrency
            .map(|permits| Arc::new(Semaphore::new(permits)));

        let handles: Vec<(String, JoinHandle<()>)> = urls
            .into_iter()
            .map(|url| {
                let task_url = url.clone();
                let tx = tx.clone();
                let client = self.client.clone();
                let limiter = limiter.clone();
                let timeout = self.config.timeout;
                let handle = tokio::spawn(async move {
                    let _permit = match limiter {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    if let Err(err) = probe_url(&client, task_url, timeout).await {
                        tracing::warn!(error = %err, "URL check failed");
                        if tx.send(err).await.is_err() {
                            tracing::error!("URL result channel closed early");
                        }
                    }
                });
                (url, handle)
            })
            .collect();
        drop(tx);

        let mut errors = join_probes(handles).await;
        while let Some(err) = rx.recv().await {
            errors.push(err);
        }

        tracing::info!(probed = total, failed = errors.len(), "URL checks complete");
        errors
    }
}

/// Wait for every probe task. A task that panicked or was cancelled never
/// delivered its result, so it is reported as [`UrlError::ProbeAborted`].
async fn join_probes(handles: Vec<(String, JoinHandle<()>)>) -> Vec<UrlError> {
    let mut aborted = Vec::new();
    for (url, handle) in handles {
        if let Err(source) = handle.await {
            tracing::error!(%url, error = %source, "URL probe task did not complete");
            aborted.push(UrlError::ProbeAborted { url, source });
        }
    }
    aborted
}

/// Issue one GET. Anything but `200 OK` is a failure; the body is dropped
/// unread, which releases the connection.
async fn probe_url(
    client: &Client,
    url: String,
    timeout: Option<Duration>,
) -> Result<(), UrlError> {
    tracing::debug!(%url, "probing URL");

    let mut request = client.get(&url);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    match request.send().await {
        Err(source) => Err(UrlError::TransportError { url, source }),
        Ok(response) if response.status() == StatusCode::OK => {
            tracing::debug!(%url, "URL reachable");
            Ok(())
        }
        Ok(response) => Err(UrlError::BadStatus {
            url,
            status: response.status().as_u16(),
        }),
    }
}
