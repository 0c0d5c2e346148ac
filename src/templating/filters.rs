//! Custom Tera filters.
//!
//! Expose the text helpers to templates so a page can slug or escape values
//! with exactly the rules used for file slugs.
//!
//! ```text
//! {{ title | slug }}                          -> "hello-world"
//! {{ title | slug(sep="_", camel=true) }}     -> "hello_world"
//! {{ query | escape_uri }}                    -> "a%20b"
//! {{ sep | escape_regexp }}                   -> "\."
//! ```

use std::collections::HashMap;

use crate::text::{EscapeMethod, SlugOptions, Slugifier, escape};

/// Build the `slug` filter around a precompiled [`Slugifier`].
///
/// Optional arguments override the configured options for one call:
/// `sep` (string), `lower` (bool), `camel` (bool).
pub fn create_slug_filter(slugifier: Slugifier) -> impl tera::Filter + 'static {
    move |value: &tera::Value, args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let input = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("slug filter requires a string value"))?;

        if args.is_empty() {
            return Ok(tera::Value::String(slugifier.slugify(input)));
        }

        let options = override_options(slugifier.options(), args)?;
        let one_off = Slugifier::new(options)
            .map_err(|e| tera::Error::msg(format!("slug filter error: {}", e)))?;
        Ok(tera::Value::String(one_off.slugify(input)))
    }
}

fn override_options(
    base: &SlugOptions,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<SlugOptions> {
    let mut options = base.clone();

    for (name, value) in args {
        match name.as_str() {
            "sep" => {
                options.separator = match value {
                    tera::Value::Null => String::new(),
                    tera::Value::String(s) => s.clone(),
                    _ => return Err(tera::Error::msg("slug filter: `sep` must be a string")),
                };
            }
            "lower" => {
                options.lowercase = value
                    .as_bool()
                    .ok_or_else(|| tera::Error::msg("slug filter: `lower` must be a boolean"))?;
            }
            "camel" => {
                options.camel_split = value
                    .as_bool()
                    .ok_or_else(|| tera::Error::msg("slug filter: `camel` must be a boolean"))?;
            }
            other => {
                return Err(tera::Error::msg(format!("slug filter: unknown argument `{}`", other)));
            }
        }
    }

    Ok(options)
}

/// Build an escaping filter for the given method (`escape_uri`, `escape_regexp`).
pub fn create_escape_filter(method: EscapeMethod) -> impl tera::Filter + 'static {
    move |value: &tera::Value, _args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
        let input = value.as_str().ok_or_else(|| {
            tera::Error::msg(format!("escape_{} filter requires a string value", method))
        })?;
        Ok(tera::Value::String(escape(input, method)))
    }
}
