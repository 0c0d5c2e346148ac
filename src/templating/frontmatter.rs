//! JSON front matter embedded in templates.
//!
//! A template may carry one or more blocks of the form
//!
//! ```text
//! {% frontmatter %}
//! {"title": "Mars"}
//! {% endfrontmatter %}
//! ```
//!
//! Tera has no such tag, so blocks are cut out of the source before the
//! template is registered ([`extract`]) and their bodies are folded into the
//! per-file context at render time ([`apply`]).
//!
//! Whitespace control follows Tera: `{%-` on the opening tag trims whitespace
//! before the block and `-%}` on the closing tag trims whitespace after it.
//! Without `-%}` a single newline following the closing tag is consumed with
//! the block. Blocks inside `{% raw %}...{% endraw %}` are left untouched.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::context::{Context, json_type_name, merge};
use crate::constants::{FRONTMATTER_END_TAG, FRONTMATTER_START_TAG};
use crate::core::TplcError;

/// A front matter block, or a raw region that shields its contents.
static BLOCK_OR_RAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s)(?P<raw>\{{%-?\s*raw\s*-?%\}}.*?\{{%-?\s*endraw\s*-?%\}})|\{{%(?P<lead>-?)\s*{FRONTMATTER_START_TAG}\s*-?%\}}(?P<body>.*?)\{{%-?\s*{FRONTMATTER_END_TAG}\s*(?P<trail>-?)%\}}(?:\r?\n)?"
    ))
    .expect("front matter pattern is valid")
});

/// A template source split into front matter bodies and remaining content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// Raw text between each start/end marker pair, in source order
    pub blocks: Vec<String>,
    /// The template with every block removed
    pub content: String,
}

impl FrontMatter {
    pub fn has_front_matter(&self) -> bool {
        !self.blocks.is_empty()
    }

    /// Parse every block, failing on the first one that is not a JSON object.
    pub fn validate(&self, origin: &str) -> Result<(), TplcError> {
        for block in &self.blocks {
            parse(block, origin)?;
        }
        Ok(())
    }
}

/// Split `source` into its front matter blocks and the remaining template.
///
/// An unterminated start marker is left in place; Tera will report it as an
/// unknown tag when the template is parsed.
pub fn extract(source: &str) -> FrontMatter {
    let mut blocks = Vec::new();
    let mut content = String::with_capacity(source.len());
    let mut last = 0;

    for caps in BLOCK_OR_RAW.captures_iter(source) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.name("body")) else {
            continue;
        };

        let before = &source[last..whole.start()];
        if caps.name("lead").is_some_and(|m| !m.as_str().is_empty()) {
            content.push_str(before.trim_end());
        } else {
            content.push_str(before);
        }
        blocks.push(body.as_str().to_string());

        last = whole.end();
        if caps.name("trail").is_some_and(|m| !m.as_str().is_empty()) {
            let rest = &source[last..];
            last += rest.len() - rest.trim_start().len();
        }
    }
    content.push_str(&source[last..]);

    if !blocks.is_empty() {
        tracing::debug!("Extracted {} front matter block(s)", blocks.len());
    }

    FrontMatter {
        blocks,
        content,
    }
}

/// Parse one block body into a context.
///
/// Returns `Ok(None)` when the body is empty or whitespace.
///
/// # Errors
///
/// [`TplcError::FrontMatterParse`] when the body is not JSON or not an object;
/// `origin` names the template in the error.
pub fn parse(body: &str, origin: &str) -> Result<Option<Context>, TplcError> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(body).map_err(|e| TplcError::FrontMatterParse {
        file: origin.to_string(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(data) => Ok(Some(data)),
        other => Err(TplcError::FrontMatterParse {
            file: origin.to_string(),
            reason: format!("expected a JSON object, found {}", json_type_name(&other)),
        }),
    }
}

/// Parse one block body and merge it into `context`.
///
/// Returns `Ok(false)` without touching `context` when the body is empty or
/// whitespace.
///
/// # Errors
///
/// - [`TplcError::FrontMatterParse`] from [`parse`]
/// - [`TplcError::CyclicStructure`] from the merge
pub fn apply(body: &str, context: &mut Context, origin: &str) -> Result<bool, TplcError> {
    let Some(data) = parse(body, origin)? else {
        return Ok(false);
    };

    tracing::debug!("Merging {} front matter key(s) from {}", data.len(), origin);
    merge(context, data)?;
    Ok(true)
}

/// Apply every block of `front_matter` to `context`, in order.
pub fn apply_all(
    front_matter: &FrontMatter,
    context: &mut Context,
    origin: &str,
) -> Result<usize, TplcError> {
    let mut applied = 0;
    for block in &front_matter.blocks {
        if apply(block, context, origin)? {
            applied += 1;
        }
    }
    Ok(applied)
}
