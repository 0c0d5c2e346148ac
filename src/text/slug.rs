//! Slug generation.
//!
//! Turns arbitrary text (typically a template path) into an identifier-safe
//! slug: diacritics stripped, punctuation and whitespace folded into a single
//! separator, optional camel-case splitting and lowercasing.
//!
//! ```
//! use tplc::text::{SlugOptions, slugify};
//!
//! assert_eq!(slugify("Hello, World!", &SlugOptions::default()).unwrap(), "hello-world");
//!
//! let camel = SlugOptions::default().with_camel_split(true);
//! assert_eq!(slugify("HTTPServerName", &camel).unwrap(), "http-server-name");
//! ```

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use super::escape::{EscapeMethod, escape};
use crate::constants::DEFAULT_SEPARATOR;
use crate::core::TplcError;

/// Punctuation that survives normalization and is folded into the separator.
pub const ALLOWED_PUNCTUATION: &[char] = &[
    '.', '-', '_', '\\', '/', ',', ':', ';', '<', '>', '|', '`', '~', '!', '@', '#', '$', '%',
    '^', '&', '*', '(', ')', '[', ']',
];

static PUNCTUATION_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s\.\-_\\/,:;<>\|`~!@#\$%\^&\*\(\)\[\]]+")
        .expect("punctuation class is a valid pattern")
});

/// Slug generation settings.
///
/// An empty `separator` means words are concatenated with no joiner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugOptions {
    /// Token placed between words
    pub separator: String,
    /// Lowercase the final slug
    pub lowercase: bool,
    /// Insert a separator at camel-case boundaries (`fooBar` → `foo-bar`)
    pub camel_split: bool,
}

impl Default for SlugOptions {
    /// `-` separator, lowercase, no camel splitting.
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            lowercase: true,
            camel_split: false,
        }
    }
}

impl SlugOptions {
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_camel_split(mut self, camel_split: bool) -> Self {
        self.camel_split = camel_split;
        self
    }
}

/// Patterns derived from the escaped separator.
#[derive(Debug, Clone)]
struct SeparatorPatterns {
    /// Separator runs anchored at either end
    edges: Regex,
    /// Two or more consecutive separators
    repeats: Regex,
}

/// A slug generator with its separator patterns compiled once.
///
/// Use this when slugifying many strings with the same options; [`slugify`]
/// is the one-shot form.
#[derive(Debug, Clone)]
pub struct Slugifier {
    options: SlugOptions,
    patterns: Option<SeparatorPatterns>,
}

impl Slugifier {
    /// Compile the separator patterns for `options`.
    ///
    /// # Errors
    ///
    /// [`TplcError::InvalidArgument`] if the escaped separator cannot be
    /// compiled (only possible for pathologically large separators).
    pub fn new(options: SlugOptions) -> Result<Self, TplcError> {
        let patterns = if options.separator.is_empty() {
            None
        } else {
            let escaped = escape(&options.separator, EscapeMethod::Regexp);
            let compile = |pattern: String| {
                Regex::new(&pattern).map_err(|e| TplcError::InvalidArgument {
                    message: format!("unusable slug separator '{}': {e}", options.separator),
                })
            };
            Some(SeparatorPatterns {
                edges: compile(format!("^(?:{escaped})+|(?:{escaped})+$"))?,
                repeats: compile(format!("(?:{escaped}){{2,}}"))?,
            })
        };

        Ok(Self {
            options,
            patterns,
        })
    }

    pub fn options(&self) -> &SlugOptions {
        &self.options
    }

    /// Convert `input` into a slug.
    pub fn slugify(&self, input: &str) -> String {
        let sep = self.options.separator.as_str();

        let mut text = strip_diacritics(input);

        if self.options.camel_split {
            text = split_camel_case(&text, sep);
        }

        let mut slug = PUNCTUATION_RUN.replace_all(&text, NoExpand(sep)).into_owned();

        if let Some(patterns) = &self.patterns {
            slug = patterns.edges.replace_all(&slug, "").into_owned();
            slug = patterns.repeats.replace_all(&slug, NoExpand(sep)).into_owned();
        }

        if self.options.lowercase {
            slug = slug.to_lowercase();
        }

        slug
    }
}

/// One-shot slug generation.
///
/// # Errors
///
/// See [`Slugifier::new`].
pub fn slugify(input: &str, options: &SlugOptions) -> Result<String, TplcError> {
    Ok(Slugifier::new(options.clone())?.slugify(input))
}

/// NFKD-decompose and keep only ASCII word characters, whitespace and
/// [`ALLOWED_PUNCTUATION`]. Combining marks fall out here, leaving base letters.
fn strip_diacritics(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| {
            c.is_ascii_alphanumeric()
                || *c == '_'
                || c.is_whitespace()
                || ALLOWED_PUNCTUATION.contains(c)
        })
        .collect()
}

/// Insert `sep` before uppercase letters that start a new word.
///
/// A boundary is a lower-to-upper transition, or the last capital of an
/// uppercase run when the next character is lowercase or starts `sep`
/// (`HTTPServer` → `HTTP-Server`). Never at the start of the string.
fn split_camel_case(input: &str, sep: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 2);
    let mut prev: Option<char> = None;

    for (idx, ch) in input.char_indices() {
        if ch.is_ascii_uppercase() {
            if let Some(last) = prev {
                let rest = &input[idx + ch.len_utf8()..];
                let lower_to_upper = !last.is_ascii_uppercase();
                let run_tail = last.is_ascii_uppercase()
                    && rest.chars().next().is_some_and(|next| {
                        next.is_ascii_lowercase() || (!sep.is_empty() && rest.starts_with(sep))
                    });

                if lower_to_upper || run_tail {
                    out.push_str(sep);
                }
            }
        }
        out.push(ch);
        prev = Some(ch);
    }

    out
}
