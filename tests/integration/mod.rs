//! Integration test suite for tplc
//!
//! Drives the `tplc` binary end to end against scratch projects.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render**: data files, layouts, front matter, slugs, options and render errors
//! - **text_commands**: the `slugify` and `escape` commands

#[path = "../common/mod.rs"]
mod common;

mod render;
mod text_commands;
