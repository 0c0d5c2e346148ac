//! String escaping for URI components and regular expressions.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt;
use std::str::FromStr;

use crate::core::TplcError;

/// Characters left untouched by [`EscapeMethod::Uri`]; everything else is
/// percent-encoded (non-ASCII as its UTF-8 bytes).
const URI_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'*')
    .remove(b'_')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/');

/// Characters prefixed with `\` by [`EscapeMethod::Regexp`].
pub const REGEXP_METACHARACTERS: &[char] =
    &['-', '[', ']', '/', '{', '}', '(', ')', '*', '+', '?', '.', '\\', '^', '$', '|'];

/// Escaping grammar selector.
///
/// External encodings accepted by [`TryFrom<u8>`] and [`FromStr`]:
/// `0`/`uri` and `1`/`regexp`. Anything else is a
/// [`TplcError::InvalidArgument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeMethod {
    /// Percent-encode for safe inclusion in a URI component
    Uri,
    /// Backslash-escape regular expression metacharacters
    Regexp,
}

impl TryFrom<u8> for EscapeMethod {
    type Error = TplcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Uri),
            1 => Ok(Self::Regexp),
            other => Err(TplcError::InvalidArgument {
                message: format!("unknown escape method '{other}' (expected 0 or 1)"),
            }),
        }
    }
}

impl FromStr for EscapeMethod {
    type Err = TplcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "uri" => Ok(Self::Uri),
            "1" | "regexp" | "regex" => Ok(Self::Regexp),
            _ => Err(TplcError::InvalidArgument {
                message: format!("unknown escape method '{s}' (expected uri or regexp)"),
            }),
        }
    }
}

impl fmt::Display for EscapeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri => f.write_str("uri"),
            Self::Regexp => f.write_str("regexp"),
        }
    }
}

/// Escape `input` so it can be embedded safely using the given `method`.
///
/// # Examples
///
/// ```
/// use tplc::text::{EscapeMethod, escape};
///
/// assert_eq!(escape("a b&c", EscapeMethod::Uri), "a%20b%26c");
/// assert_eq!(escape("a.b", EscapeMethod::Regexp), r"a\.b");
/// ```
pub fn escape(input: &str, method: EscapeMethod) -> String {
    match method {
        EscapeMethod::Uri => utf8_percent_encode(input, URI_SAFE).to_string(),
        EscapeMethod::Regexp => {
            let mut out = String::with_capacity(input.len() * 2);
            for ch in input.chars() {
                if REGEXP_METACHARACTERS.contains(&ch) {
                    out.push('\\');
                }
                out.push(ch);
            }
            out
        }
    }
}
