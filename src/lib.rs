//! tplc - a template compiler
//!
//! Renders [Tera](https://keats.github.io/tera/) templates with a JSON data file,
//! the process environment, per-template JSON front matter and layouts or
//! partials loaded alongside the page.
//!
//! # Core Modules
//!
//! - [`text`] - String escaping (URI component, regular expression) and slug generation
//! - [`templating`] - Context merging, front matter extraction and the Tera renderer
//! - [`config`] - Renderer options loaded from `--options`
//! - [`core`] - Error types and user-facing error formatting
//! - [`cli`] - Command-line interface
//!
//! # Library Usage
//!
//! ```rust
//! use serde_json::json;
//! use tplc::config::RenderOptions;
//! use tplc::templating::{Context, TemplateRenderer, TemplateSource};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut renderer = TemplateRenderer::new(&RenderOptions::default())?;
//! renderer.add_templates(vec![
//!     TemplateSource::new("_layout.tpl", "<h1>{% block title %}{% endblock %}</h1>"),
//!     TemplateSource::new(
//!         "third.tpl",
//!         "{% frontmatter %}{\"name\": \"mars\"}{% endfrontmatter %}\
//!          {% extends \"_layout.tpl\" %}{% block title %}hello {{ name }}!{% endblock %}",
//!     ),
//! ])?;
//!
//! let base: Context = serde_json::from_value(json!({"name": "world"}))?;
//! assert_eq!(renderer.render("third.tpl", &base)?, "<h1>hello mars!</h1>");
//! # Ok(())
//! # }
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! tplc render first.tpl --data data.json --partial _layout.tpl --output public/first.html
//! tplc render first.tpl second.tpl --data data.json --partial _layout.tpl
//! tplc slugify "Hello, World!"
//! tplc escape --method regexp "a.b"
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod templating;
pub mod text;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
