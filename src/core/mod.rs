//! Core types shared across tplc.
//!
//! - [`error`] - [`TplcError`], [`ErrorContext`] and [`user_friendly_error`]

pub mod error;

pub use error::{ErrorContext, TplcError, user_friendly_error};
