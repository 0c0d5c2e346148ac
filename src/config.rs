//! Renderer configuration.
//!
//! Loaded from the JSON file given with `--options`; every key is optional.
//!
//! ```json
//! {
//!   "autoescape": false,
//!   "slug_key": "slug",
//!   "slug": { "separator": "-", "lowercase": true, "camel_split": false }
//! }
//! ```
//!
//! An empty `slug_key` disables attaching the per-file slug to the context.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SLUG_KEY;
use crate::core::TplcError;
use crate::text::SlugOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// HTML-escape every `{{ }}` expression
    pub autoescape: bool,
    /// Options for file slugs and the `slug` filter
    pub slug: SlugOptions,
    /// Context key the file slug is stored under
    pub slug_key: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            autoescape: false,
            slug: SlugOptions::default(),
            slug_key: DEFAULT_SLUG_KEY.to_string(),
        }
    }
}

impl RenderOptions {
    /// Parse options from JSON text; `file` is used in error messages.
    pub fn from_json(content: &str, file: &str) -> Result<Self, TplcError> {
        serde_json::from_str(content).map_err(|e| TplcError::OptionsParse {
            file: file.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn slug_key(&self) -> Option<&str> {
        if self.slug_key.is_empty() {
            None
        } else {
            Some(&self.slug_key)
        }
    }
}
