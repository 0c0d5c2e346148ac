//! Template error handling
//!
//! Structured errors for template loading and rendering, with enough location
//! information to point the user at the offending template and line.

use std::path::PathBuf;

use crate::core::TplcError;

/// Template errors with detailed context
#[derive(Debug)]
pub enum TemplateError {
    VariableNotFound {
        variable: String,
        available_variables: Box<Vec<String>>,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },

    TemplateNotFound {
        name: String,
        suggestions: Box<Vec<String>>,
    },

    /// Building the file's context failed (front matter or merge).
    Context {
        source: TplcError,
        location: Box<ErrorLocation>,
    },
}

/// Location information for template errors
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// Name the template is registered under
    pub template_name: String,
    /// File path if known
    pub file_path: Option<PathBuf>,
    /// Line number if available from Tera
    pub line_number: Option<usize>,
    /// Lines around the error, 1-indexed
    pub context_lines: Option<Vec<(usize, String)>>,
}

impl ErrorLocation {
    pub fn new(template_name: impl Into<String>) -> Self {
        Self {
            template_name: template_name.into(),
            ..Self::default()
        }
    }

    fn describe(&self) -> String {
        match &self.file_path {
            Some(path) => format!("{} ({})", self.template_name, path.display()),
            None => self.template_name.clone(),
        }
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::VariableNotFound {
                variable,
                location,
                ..
            } => {
                write!(
                    f,
                    "Template variable not found: '{}' in {}",
                    variable, location.template_name
                )
            }
            TemplateError::SyntaxError {
                message,
                ..
            } => {
                write!(f, "Template syntax error: {}", message)
            }
            TemplateError::TemplateNotFound {
                name,
                ..
            } => {
                write!(f, "Template not found: '{}'", name)
            }
            TemplateError::Context {
                source,
                ..
            } => {
                write!(f, "{}", source)
            }
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Context {
                source,
                ..
            } => Some(source),
            _ => None,
        }
    }
}

impl TemplateError {
    /// The underlying core error, if this failure came from building the context.
    pub fn as_context_error(&self) -> Option<&TplcError> {
        match self {
            TemplateError::Context {
                source,
                ..
            } => Some(source),
            _ => None,
        }
    }

    /// Generate user-friendly error message with context and suggestions
    pub fn format_with_context(&self) -> String {
        match self {
            TemplateError::VariableNotFound {
                variable,
                available_variables,
                suggestions,
                location,
            } => format_variable_not_found_error(
                variable,
                available_variables,
                suggestions,
                location,
            ),
            TemplateError::SyntaxError {
                message,
                location,
            } => format_syntax_error(message, location),
            TemplateError::TemplateNotFound {
                name,
                suggestions,
            } => format_template_not_found_error(name, suggestions),
            TemplateError::Context {
                source,
                location,
            } => format_context_error(source, location),
        }
    }
}

/// Format a detailed "variable not found" error message
fn format_variable_not_found_error(
    variable: &str,
    available_variables: &[String],
    suggestions: &[String],
    location: &ErrorLocation,
) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Variable Not Found\n\n");
    msg.push_str(&format!("Variable: {}\n", variable));

    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }

    msg.push_str(&format!("Template: {}\n\n", location.describe()));

    if !suggestions.is_empty() {
        msg.push_str("Did you mean one of these?\n");
        for suggestion in suggestions.iter() {
            msg.push_str(&format!("  - {}\n", suggestion));
        }
        msg.push('\n');
    }

    if !available_variables.is_empty() {
        msg.push_str("Available variables in this context:\n");

        // Group by top-level key
        let mut grouped = std::collections::BTreeMap::new();
        for var in available_variables.iter() {
            let prefix = var.split('.').next().unwrap_or(var);
            grouped.entry(prefix).or_insert_with(Vec::new).push(var.clone());
        }

        for (prefix, vars) in grouped.iter().take(5) {
            if vars.len() <= 3 {
                for var in vars {
                    msg.push_str(&format!("  {}\n", var));
                }
            } else {
                msg.push_str(&format!("  {}.*  ({} variables)\n", prefix, vars.len()));
            }
        }

        if grouped.len() > 5 {
            msg.push_str(&format!("  ... and {} more\n", grouped.len() - 5));
        }
        msg.push('\n');
    }

    msg.push_str(
        "SUGGESTION: Define the variable in the data file or in a {% frontmatter %} block,\n",
    );
    msg.push_str("or guard it with `{% if name is defined %}`.\n");

    msg
}

/// Format syntax error
fn format_syntax_error(message: &str, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Syntax Error\n\n");
    msg.push_str(&format!("Error: {}\n", message));
    msg.push_str(&format!("Template: {}\n", location.describe()));

    if let Some(line) = location.line_number {
        msg.push_str(&format!("Line: {}\n", line));
    }

    if let Some(lines) = &location.context_lines {
        msg.push('\n');
        for (number, text) in lines {
            let marker = if Some(*number) == location.line_number {
                ">"
            } else {
                " "
            };
            msg.push_str(&format!("{} {:>4} | {}\n", marker, number, text));
        }
    }

    msg.push_str("\nSUGGESTION: Check template syntax for unclosed tags or invalid expressions.\n");
    msg.push_str("Common issues:\n");
    msg.push_str("  - Unclosed {{ }} or {% %} delimiters\n");
    msg.push_str("  - Invalid filter names\n");
    msg.push_str("  - Layouts passed to `extends` that were not given with --partial\n");

    msg
}

fn format_template_not_found_error(name: &str, suggestions: &[String]) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Template Not Found\n\n");
    msg.push_str(&format!("Template: {}\n", name));

    if !suggestions.is_empty() {
        msg.push_str("\nDid you mean one of these?\n");
        for suggestion in suggestions {
            msg.push_str(&format!("  - {}\n", suggestion));
        }
    }

    msg
}

fn format_context_error(source: &TplcError, location: &ErrorLocation) -> String {
    let mut msg = String::new();

    msg.push_str("ERROR: Render Context Could Not Be Built\n\n");
    msg.push_str(&format!("Error: {}\n", source));
    msg.push_str(&format!("Template: {}\n", location.describe()));

    if matches!(source, TplcError::FrontMatterParse { .. }) {
        msg.push_str("\nSUGGESTION: The front matter body must be a single JSON object.\n");
    }

    msg
}
