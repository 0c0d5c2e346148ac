//! Template rendering engine with Tera.
//!
//! [`TemplateRenderer`] owns a Tera instance loaded with every template of a
//! run, the front matter cut out of each template, and the slug settings.
//! Rendering one template:
//!
//! 1. derive a fresh context from the base context
//! 2. attach the template's slug
//! 3. fold in front matter: first from the layouts and partials the template
//!    reaches through `extends` and `include` (parents before children, in
//!    source order), then the template's own blocks
//! 4. render with Tera
//!
//! Steps 1-3 only ever touch the derived context, so one page's front matter
//! is never visible to another page. Front matter is validated when a
//! template is registered, so a malformed block in an unused partial still
//! fails the run.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::LazyLock;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::context::{Context, derive_file_context};
use super::error::{ErrorLocation, TemplateError};
use super::filters;
use super::frontmatter::{self, FrontMatter};
use crate::config::RenderOptions;
use crate::core::TplcError;
use crate::text::{EscapeMethod, Slugifier};

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// How deep available-variable listings descend into the context.
const AVAILABLE_VARIABLE_DEPTH: usize = 3;

static VARIABLE_NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Variable `([^`]+)` not found").expect("variable pattern is valid")
});

static LINE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d+)").expect("line pattern is valid"));

/// `{% extends "x" %}` and `{% include "x" %}` / `{% include ["x", "y"] %}`.
static TEMPLATE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{%-?\s*(?:extends|include)\s+("[^"]*"|'[^']*'|\[[^\]]*\])"#)
        .expect("template reference pattern is valid")
});

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("quoted string pattern is valid")
});

static TEMPLATE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:parse|render) ['"]([^'"]+)['"]"#).expect("template name pattern is valid")
});

/// A template handed to the renderer.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    /// Name used by `render`, `extends` and `include`
    pub name: String,
    /// Raw template text, front matter included
    pub content: String,
    /// Where the template was read from, for error messages
    pub path: Option<PathBuf>,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[derive(Debug)]
struct LoadedTemplate {
    front_matter: FrontMatter,
    /// Templates named by `extends` and `include`, in source order
    references: Vec<String>,
    path: Option<PathBuf>,
}

/// Template renderer with Tera engine and custom filters.
pub struct TemplateRenderer {
    tera: Tera,
    slugifier: Slugifier,
    slug_key: Option<String>,
    templates: HashMap<String, LoadedTemplate>,
}

impl TemplateRenderer {
    /// Create a renderer with the `slug`, `escape_uri` and `escape_regexp`
    /// filters registered.
    ///
    /// # Errors
    ///
    /// Fails if the configured slug separator cannot be compiled.
    pub fn new(options: &RenderOptions) -> Result<Self, TplcError> {
        let slugifier = Slugifier::new(options.slug.clone())?;

        let mut tera = Tera::default();
        if options.autoescape {
            tera.autoescape_on(vec![""]);
        } else {
            tera.autoescape_on(vec![]);
        }
        tera.register_filter("slug", filters::create_slug_filter(slugifier.clone()));
        tera.register_filter("escape_uri", filters::create_escape_filter(EscapeMethod::Uri));
        tera.register_filter("escape_regexp", filters::create_escape_filter(EscapeMethod::Regexp));

        Ok(Self {
            tera,
            slugifier,
            slug_key: options.slug_key().map(str::to_string),
            templates: HashMap::new(),
        })
    }

    /// Register templates, cutting their front matter out first.
    ///
    /// All templates are added in one batch so `extends` can refer to any of
    /// them regardless of order.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::Context`] when a front matter block is not a JSON object
    /// - [`TemplateError::SyntaxError`] when Tera rejects a template
    pub fn add_templates<I>(&mut self, sources: I) -> Result<(), TemplateError>
    where
        I: IntoIterator<Item = TemplateSource>,
    {
        let mut raw = Vec::new();

        for source in sources {
            let front_matter = frontmatter::extract(&source.content);
            front_matter.validate(&source.name).map_err(|e| TemplateError::Context {
                source: e,
                location: Box::new(ErrorLocation {
                    template_name: source.name.clone(),
                    file_path: source.path.clone(),
                    ..ErrorLocation::default()
                }),
            })?;

            let references = Self::extract_references(&front_matter.content);
            tracing::debug!(
                "Registering template '{}' ({} front matter block(s), references: {:?})",
                source.name,
                front_matter.blocks.len(),
                references
            );
            raw.push((source.name.clone(), front_matter.content.clone()));
            self.templates.insert(
                source.name,
                LoadedTemplate {
                    front_matter,
                    references,
                    path: source.path,
                },
            );
        }

        self.tera.add_raw_templates(raw).map_err(|e| {
            let name = Self::extract_template_name(&e).unwrap_or_default();
            let content = self
                .templates
                .get(&name)
                .map(|t| t.front_matter.content.clone())
                .unwrap_or_default();
            let location = self.location_for(&name, &e, &content);
            TemplateError::SyntaxError {
                message: Self::format_tera_error(&e),
                location: Box::new(location),
            }
        })
    }

    /// Names of every registered template, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the context `name` is rendered with: a copy of `base`, the slug,
    /// then the front matter of every template in [`Self::front_matter_chain`].
    pub fn file_context(&self, name: &str, base: &Context) -> Result<Context, TemplateError> {
        self.lookup(name)?;
        let location = |origin: &str| {
            Box::new(ErrorLocation {
                template_name: origin.to_string(),
                file_path: self.templates.get(origin).and_then(|t| t.path.clone()),
                ..ErrorLocation::default()
            })
        };

        let mut context = derive_file_context(base).map_err(|source| TemplateError::Context {
            source,
            location: location(name),
        })?;

        if let Some(key) = &self.slug_key {
            let slug = self.slugifier.slugify(name);
            tracing::debug!("Slug for '{}': {}", name, slug);
            context.insert(key.clone(), serde_json::Value::String(slug));
        }

        for origin in self.front_matter_chain(name) {
            let Some(loaded) = self.templates.get(origin) else {
                continue;
            };
            frontmatter::apply_all(&loaded.front_matter, &mut context, origin).map_err(
                |source| TemplateError::Context {
                    source,
                    location: location(origin),
                },
            )?;
        }

        Ok(context)
    }

    /// Templates whose front matter applies to `name`, in merge order.
    ///
    /// Depth-first over `extends`/`include` references: each template comes
    /// after everything it references, so `name` itself is last and wins.
    /// Unregistered references are skipped (Tera reports them) and each
    /// template appears once even when references form a cycle.
    pub fn front_matter_chain<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        fn visit<'a>(
            renderer: &'a TemplateRenderer,
            name: &'a str,
            seen: &mut HashSet<&'a str>,
            order: &mut Vec<&'a str>,
        ) {
            if !seen.insert(name) {
                return;
            }
            let Some(template) = renderer.templates.get(name) else {
                return;
            };
            for reference in &template.references {
                visit(renderer, reference, seen, order);
            }
            order.push(name);
        }

        let mut seen = HashSet::new();
        let mut order = Vec::new();
        visit(self, name, &mut seen, &mut order);
        order
    }

    /// Render the template registered as `name`.
    pub fn render(&self, name: &str, base: &Context) -> Result<String, TemplateError> {
        let context = self.file_context(name, base)?;

        tracing::debug!("Rendering '{}' with {} top-level key(s)", name, context.len());
        let tera_context = TeraContext::from_value(serde_json::Value::Object(context.clone()))
            .map_err(|e| TemplateError::SyntaxError {
                message: Self::format_tera_error(&e),
                location: Box::new(ErrorLocation::new(name)),
            })?;

        self.tera.render(name, &tera_context).map_err(|e| self.parse_tera_error(name, &e, &context))
    }

    fn lookup(&self, name: &str) -> Result<&LoadedTemplate, TemplateError> {
        self.templates.get(name).ok_or_else(|| {
            let available: Vec<String> = self.templates.keys().cloned().collect();
            TemplateError::TemplateNotFound {
                name: name.to_string(),
                suggestions: Box::new(Self::find_similar(name, &available)),
            }
        })
    }

    /// Parse a Tera render error into a structured TemplateError
    fn parse_tera_error(&self, name: &str, error: &tera::Error, context: &Context) -> TemplateError {
        let content = self
            .templates
            .get(name)
            .map(|t| t.front_matter.content.as_str())
            .unwrap_or_default();
        let location = self.location_for(name, error, content);

        let chain = Self::error_chain(error);
        if let Some(variable) = chain.iter().find_map(|msg| Self::extract_variable_name(msg)) {
            let available_variables = Self::extract_available_variables(context);
            let suggestions = Self::find_similar(&variable, &available_variables);
            return TemplateError::VariableNotFound {
                variable,
                available_variables: Box::new(available_variables),
                suggestions: Box::new(suggestions),
                location: Box::new(location),
            };
        }

        TemplateError::SyntaxError {
            message: Self::format_tera_error(error),
            location: Box::new(location),
        }
    }

    fn location_for(&self, name: &str, error: &tera::Error, content: &str) -> ErrorLocation {
        let line_number = Self::extract_line_from_tera_error(error);
        let context_lines = line_number
            .map(|line| Self::extract_context_lines(content, line, 2))
            .filter(|lines| !lines.is_empty());

        ErrorLocation {
            template_name: name.to_string(),
            file_path: self.templates.get(name).and_then(|t| t.path.clone()),
            line_number,
            context_lines,
        }
    }

    fn error_chain(error: &tera::Error) -> Vec<String> {
        use std::error::Error;

        let mut messages = vec![error.to_string()];
        let mut current: Option<&dyn Error> = error.source();
        while let Some(err) = current {
            messages.push(err.to_string());
            current = err.source();
        }
        messages
    }

    /// Template names referenced by `extends` and `include` tags, in order.
    fn extract_references(content: &str) -> Vec<String> {
        TEMPLATE_REFERENCE
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .flat_map(|target| {
                QUOTED
                    .captures_iter(target.as_str())
                    .filter_map(|quoted| quoted.get(1).or_else(|| quoted.get(2)))
                    .map(|m| m.as_str().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Extract variable name from "Variable `foo` not found" message
    fn extract_variable_name(error_msg: &str) -> Option<String> {
        VARIABLE_NOT_FOUND
            .captures(error_msg)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn extract_template_name(error: &tera::Error) -> Option<String> {
        Self::error_chain(error).iter().find_map(|msg| {
            TEMPLATE_NAME.captures(msg).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
        })
    }

    /// Dotted paths of the context's keys, a few levels deep.
    fn extract_available_variables(context: &Context) -> Vec<String> {
        fn walk(prefix: &str, map: &Context, depth: usize, out: &mut Vec<String>) {
            for (key, value) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                match value {
                    serde_json::Value::Object(inner) if depth + 1 < AVAILABLE_VARIABLE_DEPTH => {
                        walk(&path, inner, depth + 1, out);
                    }
                    _ => out.push(path),
                }
            }
        }

        let mut vars = Vec::new();
        walk("", context, 0, &mut vars);
        vars.sort();
        vars
    }

    /// Find similar names using Levenshtein distance
    fn find_similar(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> = available
            .iter()
            .map(|var| {
                let distance = levenshtein(target, var);
                (var.clone(), distance)
            })
            .collect();

        scored.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Return up to `context_size` lines either side of `error_line` (1-indexed).
    fn extract_context_lines(
        content: &str,
        error_line: usize,
        context_size: usize,
    ) -> Vec<(usize, String)> {
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        if error_line == 0 || error_line > total_lines {
            return Vec::new();
        }

        let start = error_line.saturating_sub(context_size + 1);
        let end = (error_line + context_size).min(total_lines);

        lines[start..end]
            .iter()
            .enumerate()
            .map(|(idx, line)| (start + idx + 1, line.to_string()))
            .collect()
    }

    /// Tera parse errors carry `line:column` (e.g. "3:7").
    fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
        let error_msg = format!("{:?}", error);
        LINE_COLUMN
            .captures(&error_msg)
            .and_then(|caps| caps.get(1))
            .and_then(|line| line.as_str().parse::<usize>().ok())
    }

    /// Flatten a Tera error chain into one readable message.
    pub fn format_tera_error(error: &tera::Error) -> String {
        let messages: Vec<String> = Self::error_chain(error)
            .into_iter()
            .map(|msg| msg.trim().to_string())
            .filter(|msg| !msg.is_empty())
            .collect();

        if messages.is_empty() {
            "Template error (no details available)".to_string()
        } else {
            messages.join("\n  → ")
        }
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod renderer_tests;
