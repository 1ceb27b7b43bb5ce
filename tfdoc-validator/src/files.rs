//! Required and additional module file checks.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{FileClass, FileError, FileValidationError};

/// Files every Terraform module must ship next to its README.
pub const REQUIRED_MODULE_FILES: &[&str] = &["outputs.tf", "variables.tf", "terraform.tf"];

/// Checks that a module's required files, plus any caller-supplied extras,
/// exist and are non-empty.
#[derive(Debug, Clone)]
pub struct FileValidator {
    root_dir: PathBuf,
    required_files: Vec<PathBuf>,
    additional_files: Vec<PathBuf>,
}

impl FileValidator {
    /// Build a validator for the module at `module_path`.
    ///
    /// The README path is checked as given. Relative `additional_files` are
    /// resolved against `module_path`; absolute ones are kept unchanged.
    #[must_use]
    pub fn new<P: AsRef<Path>>(
        readme_path: impl Into<PathBuf>,
        module_path: impl Into<PathBuf>,
        additional_files: &[P],
    ) -> Self {
        let root_dir = module_path.into();

        let mut required_files = Vec::with_capacity(REQUIRED_MODULE_FILES.len() + 1);
        required_files.push(readme_path.into());
        required_files.extend(REQUIRED_MODULE_FILES.iter().map(|name| root_dir.join(name)));

        let additional_files = additional_files
            .iter()
            .map(|file| {
                let file = file.as_ref();
                if file.is_absolute() {
                    file.to_path_buf()
                } else {
                    root_dir.join(file)
                }
            })
            .collect();

        Self {
            root_dir,
            required_files,
            additional_files,
        }
    }

    /// The module root directory.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// README plus the fixed module files, in check order.
    #[must_use]
    pub fn required_files(&self) -> &[PathBuf] {
        &self.required_files
    }

    /// Caller-supplied files, already resolved against the module root.
    #[must_use]
    pub fn additional_files(&self) -> &[PathBuf] {
        &self.additional_files
    }

    /// Check every required file, then every additional file.
    ///
    /// All paths are checked even when earlier ones fail. An empty `Vec`
    /// means everything passed.
    #[must_use]
    pub fn validate(&self) -> Vec<FileValidationError> {
        let classified = self
            .required_files
            .iter()
            .map(|path| (FileClass::Required, path))
            .chain(
                self.additional_files
                    .iter()
                    .map(|path| (FileClass::Additional, path)),
            );

        let mut errors = Vec::new();
        let mut checked: usize = 0;
        for (class, path) in classified {
            checked += 1;
            if let Err(error) = check_file(path) {
                tracing::warn!(%class, path = %path.display(), %error, "file check failed");
                errors.push(FileValidationError::new(class, path, error));
            }
        }

        tracing::info!(
            module = %self.root_dir.display(),
            checked,
            failed = errors.len(),
            "file checks complete"
        );
        errors
    }
}

/// Stat `path` and confirm it exists with a non-zero size.
fn check_file(path: &Path) -> Result<(), FileError> {
    let name = base_name(path);
    tracing::debug!(path = %path.display(), "checking file");

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(FileError::NotFound { name }),
        Err(source) => return Err(FileError::AccessError { name, source }),
    };

    if metadata.len() == 0 {
        return Err(FileError::Empty { name });
    }
    Ok(())
}

/// Final path component, falling back to the whole path when there is none.
fn base_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
