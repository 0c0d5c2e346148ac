//! Template compilation with Tera.
//!
//! A run loads every template it was given (pages plus partials and layouts),
//! builds one base context, then renders each page against its own copy of
//! that context.
//!
//! # Template Context
//!
//! Each page is rendered with, in order of precedence (last wins):
//! - the data file's top-level keys
//! - `env`: the process environment, unless disabled
//! - `slug`: the slug of the template's name (key configurable)
//! - the page's own front matter blocks
//!
//! # Front Matter
//!
//! ```text
//! {% frontmatter %}
//! { "name": "mars" }
//! {% endfrontmatter %}
//! hello {{ name }}!
//! ```
//!
//! Front matter is JSON, deep-merged into the page's context only. Other
//! pages rendered in the same run never see it.
//!
//! # Custom Filters
//!
//! - `slug`: `{{ title | slug }}`, `{{ title | slug(sep="_", camel=true) }}`
//! - `escape_uri`: `{{ query | escape_uri }}`
//! - `escape_regexp`: `{{ word | escape_regexp }}`
//!
//! # Layouts and Partials
//!
//! Any template can `{% extends %}` or `{% include %}` another by the name it
//! was registered under. Names come from paths relative to the project root,
//! e.g. `_layout.tpl` or `partials/_nav.tpl`.

pub mod context;
pub mod error;
pub mod filters;
pub mod frontmatter;
pub mod renderer;

pub use context::{
    Context, ValueKind, build_base_context, derive_file_context, merge, parse_data,
};
pub use error::{ErrorLocation, TemplateError};
pub use frontmatter::FrontMatter;
pub use renderer::{TemplateRenderer, TemplateSource};
