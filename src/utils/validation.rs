// file: src/utils/validation.rs
// description: command-line input validation helpers
// reference: input validation patterns

use crate::error::{CrawlError, Result};
use std::path::{MAIN_SEPARATOR, Path};

pub struct Validator;

impl Validator {
    /// `--output` must be absolute, name a file rather than a directory, and
    /// carry an extension.
    pub fn validate_output_path(path: &Path) -> Result<()> {
        if !path.is_absolute() {
            return Err(CrawlError::usage(format!(
                "Output path must be a full absolute path: {}",
                path.display()
            )));
        }

        let raw = path.to_string_lossy();
        if raw.ends_with(MAIN_SEPARATOR) || raw.ends_with('/') || path.is_dir() {
            return Err(CrawlError::usage(format!(
                "Output path must be a file, not a directory: {}",
                path.display()
            )));
        }

        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| !e.is_empty());
        if !has_extension {
            return Err(CrawlError::usage(format!(
                "Output file must have an extension: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Extensions are bare names like `rs`; separators and globs are rejected.
    pub fn validate_extensions<S: AsRef<str>>(extensions: &[S]) -> Result<()> {
        for ext in extensions {
            let ext = ext.as_ref().trim();
            if ext.is_empty() {
                return Err(CrawlError::usage("Extensions must not be empty"));
            }
            if ext.contains(['/', '\\', '*', '?']) || ext.contains(char::is_whitespace) {
                return Err(CrawlError::usage(format!(
                    "Invalid extension '{}': expected a bare extension such as 'py'",
                    ext
                )));
            }
        }
        Ok(())
    }
}
