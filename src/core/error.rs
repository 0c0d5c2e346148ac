//! Error handling for tplc
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can tell failure modes apart
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`TplcError`] - Enumerated error types for every failure the core can report
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion for display
//!
//! Template rendering failures carry their own richer type,
//! [`TemplateError`](crate::templating::TemplateError), which
//! [`user_friendly_error`] also understands.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tplc::core::{TplcError, user_friendly_error};
//!
//! let err = anyhow::Error::new(TplcError::InvalidArgument {
//!     message: "unknown escape method '7'".to_string(),
//! });
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::templating::TemplateError;

/// Errors produced by the text and context core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TplcError {
    /// An argument outside its recognised set of values, e.g. an unknown escape method.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument
        message: String,
    },

    /// A front matter block whose body is not a JSON object.
    #[error("Invalid front matter in {file}: {reason}")]
    FrontMatterParse {
        /// Template the block was found in
        file: String,
        /// Underlying parse error message
        reason: String,
    },

    /// Merge recursion went deeper than the nesting limit.
    #[error("Context nesting exceeds {limit} levels at '{path}' (cyclic or runaway structure)")]
    CyclicStructure {
        /// Dotted key path where the limit was hit
        path: String,
        /// The configured depth limit
        limit: usize,
    },

    #[error("Invalid options file {file}")]
    OptionsParse {
        file: String,
        reason: String,
    },

    #[error("Invalid data file {file}")]
    DataParse {
        file: String,
        reason: String,
    },

    #[error("File system error: {operation}")]
    FileSystemError {
        operation: String,
        path: String,
    },

    #[error("{message}")]
    Other {
        message: String,
    },
}

/// Error wrapper with display-oriented extras.
///
/// Details are printed in yellow, suggestions in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: TplcError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: TplcError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
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

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// Recognises [`TplcError`], [`TemplateError`] and [`std::io::Error`] anywhere in
/// the `anyhow` chain; everything else becomes [`TplcError::Other`] with the
/// full cause chain as details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(tplc_error) = cause.downcast_ref::<TplcError>() {
            return create_error_context(tplc_error.clone());
        }

        if let Some(template_error) = cause.downcast_ref::<TemplateError>() {
            return ErrorContext::new(TplcError::Other {
                message: template_error.to_string(),
            })
            .with_details(template_error.format_with_context());
        }

        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            let operation = error.to_string();
            return match io_error.kind() {
                std::io::ErrorKind::NotFound => ErrorContext::new(TplcError::FileSystemError {
                    operation,
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file exists and the path is correct")
                .with_details(io_error.to_string()),
                std::io::ErrorKind::PermissionDenied => {
                    ErrorContext::new(TplcError::FileSystemError {
                        operation,
                        path: "unknown".to_string(),
                    })
                    .with_suggestion("Check file ownership and permissions")
                    .with_details(io_error.to_string())
                }
                _ => ErrorContext::new(TplcError::FileSystemError {
                    operation,
                    path: "unknown".to_string(),
                })
                .with_details(io_error.to_string()),
            };
        }
    }

    let details = error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>().join("\n  → ");
    let context = ErrorContext::new(TplcError::Other {
        message: error.to_string(),
    });
    if details.is_empty() {
        context
    } else {
        context.with_details(details)
    }
}

fn create_error_context(error: TplcError) -> ErrorContext {
    match &error {
        TplcError::InvalidArgument {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use one of the documented values (e.g. --method uri or --method regexp)"),

        TplcError::FrontMatterParse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion(
                "Front matter must be a single JSON object, e.g. {% frontmatter %}{\"title\": \"Mars\"}{% endfrontmatter %}",
            )
            .with_details("Rendering of this template was aborted; other templates are unaffected"),

        TplcError::CyclicStructure {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Flatten the data file or front matter so objects nest less deeply"),

        TplcError::OptionsParse {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the options file is valid JSON with known keys (autoescape, slug, slug_key)")
                .with_details(details)
        }

        TplcError::DataParse {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("The data file must contain a single JSON object")
                .with_details(details)
        }

        TplcError::FileSystemError {
            path,
            ..
        } => {
            let details = format!("Path: {path}");
            ErrorContext::new(error).with_details(details)
        }

        TplcError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
