use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use colored::Colorize;
use tfdoc_validator::{
    DEFAULT_MAX_CONTENT_SIZE, FileValidator, MarkdownContent, UrlCheckConfig, UrlValidator,
    ValidationReport, output,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Check a Terraform module's documentation: required files and link reachability.
#[derive(Debug, Parser)]
#[command(name = "tfdoc-validator", version, about)]
pub struct Cli {
    /// Path to the module README
    #[arg(long, env = "TFDOC_README_PATH")]
    pub readme: PathBuf,

    /// Module root directory (defaults to the README's directory)
    #[arg(long, env = "TFDOC_MODULE_PATH")]
    pub module_path: Option<PathBuf>,

    /// Extra files that must exist and be non-empty, relative to the module root or absolute
    #[arg(
        long = "additional-file",
        env = "TFDOC_ADDITIONAL_FILES",
        value_delimiter = ','
    )]
    pub additional_files: Vec<PathBuf>,

    /// Do not probe URLs found in the README
    #[arg(long, env = "TFDOC_SKIP_URLS")]
    pub skip_urls: bool,

    /// Extra URL substrings that are never probed (the provider registry is always exempt)
    #[arg(long = "exempt", env = "TFDOC_EXEMPT_URLS", value_delimiter = ',')]
    pub exempt: Vec<String>,

    /// Maximum number of URL probes in flight (unbounded by default)
    #[arg(long, env = "TFDOC_MAX_CONCURRENCY")]
    pub max_concurrency: Option<usize>,

    /// Per-request timeout in seconds (HTTP client default when unset)
    #[arg(long, env = "TFDOC_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    fn module_root(&self) -> PathBuf {
        self.module_path
            .clone()
            .unwrap_or_else(|| readme_dir(&self.readme))
    }

    fn url_config(&self) -> UrlCheckConfig {
        let mut config = UrlCheckConfig::default();
        config.exempt_patterns.extend(self.exempt.iter().cloned());
        config.max_concurrency = self.max_concurrency;
        config.timeout = self.timeout_secs.map(Duration::from_secs);
        config
    }
}

/// Directory holding the README; `.` for a bare file name.
fn readme_dir(readme: &Path) -> PathBuf {
    match readme.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Parse arguments, run both validators, print the report.
///
/// Returns `Ok(true)` when every check passed.
pub async fn run() -> Result<bool> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    let report = validate_module(&cli).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Json => output::write_json(&report, &mut out)?,
        OutputFormat::Human => {
            output::write_human(&report, &mut out)?;
            out.flush()?;
            let verdict = if report.ok {
                "PASSED".green().bold()
            } else {
                "FAILED".red().bold()
            };
            eprintln!("{verdict}");
        }
    }

    Ok(report.ok)
}

async fn validate_module(cli: &Cli) -> Result<ValidationReport> {
    let module_root = cli.module_root();
    tracing::info!(
        readme = %cli.readme.display(),
        module = %module_root.display(),
        "validating module documentation"
    );

    let files = FileValidator::new(cli.readme.clone(), module_root, &cli.additional_files);
    let files_checked = files.required_files().len() + files.additional_files().len();
    let file_errors = files.validate();

    if cli.skip_urls {
        tracing::info!("URL checks skipped");
        return Ok(ValidationReport::new(files_checked, file_errors, 0, Vec::new())
            .with_urls_skipped("disabled by --skip-urls"));
    }

    let content = match MarkdownContent::from_file(&cli.readme, DEFAULT_MAX_CONTENT_SIZE) {
        Ok(content) => content,
        // A missing or empty README is already a file error; nothing to scan.
        Err(err) if !file_errors.is_empty() => {
            tracing::warn!(error = %err, "README unreadable, URL checks skipped");
            return Ok(ValidationReport::new(files_checked, file_errors, 0, Vec::new())
                .with_urls_skipped(format!("README unreadable: {err}")));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("loading {}", cli.readme.display()));
        }
    };

    let urls = UrlValidator::with_config(&content, cli.url_config())?;
    let urls_checked = urls.urls().len();
    let url_errors = urls.validate().await;

    Ok(ValidationReport::new(
        files_checked,
        file_errors,
        urls_checked,
        url_errors,
    ))
}
