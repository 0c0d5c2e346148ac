//! Text normalization helpers.
//!
//! - [`escape`] - escape a string for a URI component or a regular expression
//! - [`slug`] - turn arbitrary text into a separator-joined slug
//!
//! Slug generation builds its separator patterns from the
//! [`EscapeMethod::Regexp`] form of the separator, so metacharacter
//! separators such as `.` or `|` behave literally.

pub mod escape;
pub mod slug;

pub use escape::{EscapeMethod, escape};
pub use slug::{SlugOptions, Slugifier, slugify};
