//! Error handling for vend
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`VendError`]) so callers can match on the failure class
//! 2. **User-friendly messages** ([`ErrorContext`]) with suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Manifest**: [`VendError::ManifestParseError`], [`VendError::InvalidVersionSelector`]
//! - **Import scanning**: [`VendError::ImportScanFailed`], [`VendError::NotAPackage`]
//! - **Downloads**: [`VendError::DownloadFailed`], [`VendError::GitCommandError`]
//! - **Graph walk**: [`VendError::CircularImport`]
//! - **Vendor tree**: [`VendError::VendorTreeFailed`]
//! - **Toolchain**: [`VendError::ToolchainNotFound`], [`VendError::ToolchainFailed`]
//!
//! Every variant carries the offending import path, directory or program so that a
//! failure deep inside the recursive walk can still be diagnosed from the top-level
//! message.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vend::core::{VendError, user_friendly_error};
//!
//! let err = VendError::DownloadFailed {
//!     import_path: "example.com/lib/net".to_string(),
//!     reason: "repository not found".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(err));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for vend operations.
#[derive(Error, Debug, Clone)]
pub enum VendError {
    /// A manifest file exists but could not be parsed.
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Path to the manifest file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// A pinned version selector is not of the form `<kind>:<value>`.
    #[error("Invalid version selector '{selector}' for '{import_path}'")]
    InvalidVersionSelector {
        /// Import path the selector was declared for
        import_path: String,
        /// The selector text as written in the manifest
        selector: String,
    },

    /// The import scanner could not read a directory.
    #[error("Failed to scan imports in {dir}: {reason}")]
    ImportScanFailed {
        /// Directory that was being scanned
        dir: String,
        /// Underlying failure
        reason: String,
    },

    /// The directory exists but contains no source files.
    #[error("No source files in {dir}")]
    NotAPackage {
        /// Directory without buildable sources
        dir: String,
    },

    /// Fetching a package into the install repository failed.
    #[error("Failed to download '{import_path}': {reason}")]
    DownloadFailed {
        /// Import path that could not be fetched
        import_path: String,
        /// Reason reported by the downloader
        reason: String,
    },

    /// A git invocation returned a non-zero exit code.
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g. "clone", "checkout")
        operation: String,
        /// The error output from the git command
        stderr: String,
    },

    /// The import graph re-entered a package that is still being resolved.
    #[error("Circular import detected: {chain}")]
    CircularImport {
        /// The import chain, outermost first, closing on the repeated entry
        chain: String,
    },

    /// A filesystem operation on the vendor tree failed.
    #[error("Vendor tree operation failed: {operation} {path}: {reason}")]
    VendorTreeFailed {
        /// The operation being performed ("remove", "create", "link")
        operation: String,
        /// Path the operation was applied to
        path: String,
        /// Underlying I/O failure
        reason: String,
    },

    /// The configured toolchain program is not on `PATH`.
    #[error("Toolchain '{program}' not found in PATH")]
    ToolchainNotFound {
        /// Program name that was looked up
        program: String,
    },

    /// The toolchain ran but reported failure.
    #[error("Toolchain '{program}' failed: {status}")]
    ToolchainFailed {
        /// Program that was invoked
        program: String,
        /// Exit status description
        status: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information.
///
/// When displayed, errors show:
/// 1. **error**: the main message in red
/// 2. **details**: additional context in yellow (optional)
/// 3. **suggestion**: actionable steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: VendError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: VendError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion tailored to its kind.
///
/// The anyhow chain is searched for a [`VendError`]; context frames added with
/// `.with_context(..)` along the way become the details line so the offending
/// directory or import path is preserved.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    let chain: Vec<String> = error.chain().map(ToString::to_string).collect();
    let details = if chain.len() > 1 {
        Some(chain[..chain.len() - 1].join("\n  caused by: "))
    } else {
        None
    };

    let vend_error = error.chain().find_map(|e| e.downcast_ref::<VendError>());
    let Some(vend_error) = vend_error else {
        let root = error.root_cause().to_string();
        let mut ctx = ErrorContext::new(VendError::Other {
            message: root,
        });
        if let Some(details) = details {
            ctx = ctx.with_details(details);
        }
        return ctx;
    };

    let mut ctx = ErrorContext::new(vend_error.clone());
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }

    match vend_error {
        VendError::ManifestParseError {
            reason,
            ..
        } => ctx
            .with_details(reason.clone())
            .with_suggestion("Check the TOML syntax of vend.toml ([target] and [build] sections)"),
        VendError::InvalidVersionSelector {
            ..
        } => ctx.with_suggestion(
            "Use 'branch:<name>', 'tag:<name>', 'commit:<sha>' or an empty string for latest",
        ),
        VendError::NotAPackage {
            ..
        } => ctx.with_suggestion(
            "Make sure the directory contains source files, or that the package was downloaded completely",
        ),
        VendError::DownloadFailed {
            ..
        }
        | VendError::GitCommandError {
            ..
        } => ctx.with_suggestion(
            "Check your network connection and that the import path names a reachable repository",
        ),
        VendError::CircularImport {
            ..
        } => ctx.with_suggestion(
            "Break the import cycle, or set on_cycle = \"skip\" in the global config to tolerate it",
        ),
        VendError::ToolchainNotFound {
            program,
        } => ctx.with_suggestion(format!(
            "Install '{program}' or set 'toolchain' in ~/.vend/config.toml"
        )),
        VendError::VendorTreeFailed {
            ..
        } => ctx.with_suggestion("Check permissions and free space in the project directory"),
        VendError::ConfigError {
            ..
        } => ctx.with_suggestion(
            "Check ~/.vend/config.toml, or the file named by VEND_CONFIG_PATH or --config",
        ),
        _ => ctx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_context_display_includes_details_and_suggestion() {
        let ctx = ErrorContext::new(VendError::NotAPackage {
            dir: "/tmp/x".to_string(),
        })
        .with_details("while resolving example.com/lib")
        .with_suggestion("add sources");

        let text = ctx.to_string();
        assert!(text.contains("No source files in /tmp/x"));
        assert!(text.contains("Details: while resolving example.com/lib"));
        assert!(text.contains("Suggestion: add sources"));
    }

    #[test]
    fn test_user_friendly_error_keeps_context_chain() {
        let err: anyhow::Result<()> = Err(VendError::DownloadFailed {
            import_path: "example.com/lib/net".to_string(),
            reason: "timeout".to_string(),
        })
        .context("resolving imports of /work/app");

        let ctx = user_friendly_error(err.unwrap_err());
        assert!(matches!(ctx.error, VendError::DownloadFailed { .. }));
        assert!(ctx.details.as_deref().unwrap_or_default().contains("/work/app"));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_for_foreign_error() {
        let ctx = user_friendly_error(anyhow::anyhow!("plain failure"));
        assert!(matches!(ctx.error, VendError::Other { .. }));
        assert_eq!(ctx.error.to_string(), "plain failure");
    }

    #[test]
    fn test_toolchain_not_found_suggests_config() {
        let ctx = user_friendly_error(
            VendError::ToolchainNotFound {
                program: "go".to_string(),
            }
            .into(),
        );
        assert!(ctx.suggestion.unwrap().contains("toolchain"));
    }
}
