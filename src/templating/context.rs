//! Render contexts and deep merging.
//!
//! A [`Context`] is a JSON object. The base context is built once per run
//! (data file plus environment); every template gets its own copy derived
//! with [`derive_file_context`], so nothing a template does to its context
//! can reach another template's render.
//!
//! # Merge semantics
//!
//! [`merge`] walks the keys of `source`:
//! - both sides [`ValueKind::Structured`] → merge recursively, in place
//! - anything else → `source` overwrites `target`
//!
//! Arrays are leaves: they replace, never merge element-wise.
//!
//! ```
//! use serde_json::json;
//! use tplc::templating::{Context, merge};
//!
//! let mut target: Context = serde_json::from_value(json!({"a": {"x": 1, "y": 2}, "b": "old"})).unwrap();
//! let source: Context = serde_json::from_value(json!({"a": {"y": 3, "z": 4}, "b": {"nested": true}})).unwrap();
//!
//! merge(&mut target, source).unwrap();
//! assert_eq!(
//!     serde_json::Value::Object(target),
//!     json!({"a": {"x": 1, "y": 3, "z": 4}, "b": {"nested": true}})
//! );
//! ```

use serde_json::{Map, Value};
use std::ffi::OsString;

use crate::constants::{ENV_CONTEXT_KEY, MAX_MERGE_DEPTH};
use crate::core::TplcError;

/// Named values available to a single render pass.
pub type Context = Map<String, Value>;

/// Merge classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A JSON object; merged key by key
    Structured,
    /// Scalars, arrays and null; replaced wholesale
    Leaf,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Structured,
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Array(_) => Self::Leaf,
        }
    }
}

/// Deep-merge `source` into `target` and return `target`.
///
/// Branches of `source` that do not merge into an existing object are moved
/// into `target` as they are. Callers that need to keep `source` pass a clone.
///
/// # Errors
///
/// [`TplcError::CyclicStructure`] when objects nest deeper than
/// [`MAX_MERGE_DEPTH`] on both sides.
pub fn merge(target: &mut Context, source: Context) -> Result<&mut Context, TplcError> {
    let mut path = Vec::new();
    merge_level(target, source, &mut path)?;
    Ok(target)
}

fn merge_level(
    target: &mut Context,
    source: Context,
    path: &mut Vec<String>,
) -> Result<(), TplcError> {
    if path.len() >= MAX_MERGE_DEPTH {
        return Err(TplcError::CyclicStructure {
            path: path.join("."),
            limit: MAX_MERGE_DEPTH,
        });
    }

    for (key, incoming) in source {
        let existing_kind = target.get(&key).map(ValueKind::of);

        match (existing_kind, incoming) {
            (Some(ValueKind::Structured), Value::Object(incoming)) => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    path.push(key);
                    merge_level(existing, incoming, path)?;
                    path.pop();
                }
            }
            (_, incoming) => {
                target.insert(key, incoming);
            }
        }
    }

    Ok(())
}

/// Derive an independent per-file context from `base`.
///
/// Equivalent to merging a clone of `base` into an empty context.
pub fn derive_file_context(base: &Context) -> Result<Context, TplcError> {
    let mut context = Context::new();
    merge(&mut context, base.clone())?;
    Ok(context)
}

/// Build the base context from optional data and, if requested, the process
/// environment (exposed under [`ENV_CONTEXT_KEY`]).
///
/// The environment replaces any `env` key the data file defines. Variables
/// whose name or value is not valid UTF-8 are skipped with a warning.
pub fn build_base_context(data: Option<Context>, include_env: bool) -> Context {
    let mut context = data.unwrap_or_default();

    if include_env {
        let env = environment_context(std::env::vars_os());
        tracing::debug!("Exposing {} environment variables under '{}'", env.len(), ENV_CONTEXT_KEY);
        context.insert(ENV_CONTEXT_KEY.to_string(), Value::Object(env));
    }

    context
}

fn environment_context<I>(vars: I) -> Context
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, Value::String(value))),
            (Ok(key), Err(_)) => {
                tracing::warn!("Skipping environment variable {} (value is not valid UTF-8)", key);
                None
            }
            (Err(key), _) => {
                tracing::warn!(
                    "Skipping environment variable {} (name is not valid UTF-8)",
                    key.to_string_lossy()
                );
                None
            }
        })
        .collect()
}

/// Parse a JSON data file into a context.
///
/// # Errors
///
/// [`TplcError::DataParse`] when the content is not valid JSON or is not an object.
pub fn parse_data(content: &str, file: &str) -> Result<Context, TplcError> {
    let value: Value = serde_json::from_str(content).map_err(|e| TplcError::DataParse {
        file: file.to_string(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(TplcError::DataParse {
            file: file.to_string(),
            reason: format!("expected a JSON object, found {}", json_type_name(&other)),
        }),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(value: Value) -> Context {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Structured);
        assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::Leaf);
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Leaf);
        assert_eq!(ValueKind::of(&json!("s")), ValueKind::Leaf);
    }

    #[test]
    fn test_merge_recurses_and_overwrites() {
        let mut target = ctx(json!({"a": {"x": 1, "y": 2}, "b": "old"}));
        let source = ctx(json!({"a": {"y": 3, "z": 4}, "b": {"nested": true}}));

        merge(&mut target, source).unwrap();

        assert_eq!(
            Value::Object(target),
            json!({"a": {"x": 1, "y": 3, "z": 4}, "b": {"nested": true}})
        );
    }

    #[test]
    fn test_merge_object_replaced_by_scalar() {
        let mut target = ctx(json!({"a": {"x": 1}}));
        merge(&mut target, ctx(json!({"a": 5}))).unwrap();
        assert_eq!(Value::Object(target), json!({"a": 5}));
    }

    #[test]
    fn test_merge_arrays_replace_wholesale() {
        let mut target = ctx(json!({"tags": [1, 2, 3], "nested": {"list": ["a", "b"]}}));
        merge(&mut target, ctx(json!({"tags": [9], "nested": {"list": []}}))).unwrap();
        assert_eq!(Value::Object(target), json!({"tags": [9], "nested": {"list": []}}));
    }

    #[test]
    fn test_merge_adopts_missing_keys() {
        let mut target = ctx(json!({"keep": true}));
        merge(&mut target, ctx(json!({"deep": {"er": {"est": 1}}}))).unwrap();
        assert_eq!(Value::Object(target), json!({"keep": true, "deep": {"er": {"est": 1}}}));
    }

    #[test]
    fn test_merge_null_overwrites() {
        let mut target = ctx(json!({"a": {"x": 1}}));
        merge(&mut target, ctx(json!({"a": null}))).unwrap();
        assert_eq!(Value::Object(target), json!({"a": null}));
    }

    #[test]
    fn test_merge_returns_target() {
        let mut target = ctx(json!({"a": 1}));
        let merged = merge(&mut target, ctx(json!({"b": 2}))).unwrap();
        merged.insert("c".to_string(), json!(3));
        assert_eq!(Value::Object(target), json!({"a": 1, "b": 2, "c": 3}));
    }

    #[test]
    fn test_merge_with_self_is_identity() {
        let original = ctx(json!({
            "site": {"title": "Mars", "tags": ["red", "planet"]},
            "count": 3,
            "flag": null
        }));

        let mut target = original.clone();
        merge(&mut target, original.clone()).unwrap();
        assert_eq!(target, original);
    }

    #[test]
    fn test_merge_depth_guard() {
        fn nest(depth: usize) -> Value {
            (0..depth).fold(json!(1), |inner, _| json!({ "n": inner }))
        }

        let mut target = ctx(nest(MAX_MERGE_DEPTH + 2));
        let err = merge(&mut target, ctx(nest(MAX_MERGE_DEPTH + 2))).unwrap_err();
        match err {
            TplcError::CyclicStructure {
                path,
                limit,
            } => {
                assert_eq!(limit, MAX_MERGE_DEPTH);
                assert_eq!(path.split('.').count(), MAX_MERGE_DEPTH);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_within_depth_limit() {
        fn nest(depth: usize) -> Value {
            (0..depth).fold(json!(1), |inner, _| json!({ "n": inner }))
        }

        let mut target = ctx(nest(MAX_MERGE_DEPTH - 1));
        assert!(merge(&mut target, ctx(nest(MAX_MERGE_DEPTH - 1))).is_ok());
    }

    #[test]
    fn test_derived_context_is_independent() {
        let base = ctx(json!({"site": {"title": "Base"}}));
        let mut derived = derive_file_context(&base).unwrap();

        merge(&mut derived, ctx(json!({"site": {"title": "Mars"}, "extra": 1}))).unwrap();

        assert_eq!(Value::Object(base), json!({"site": {"title": "Base"}}));
        assert_eq!(Value::Object(derived), json!({"site": {"title": "Mars"}, "extra": 1}));
    }

    #[test]
    fn test_build_base_context_with_env() {
        let data = ctx(json!({"name": "site", "env": "overridden"}));
        let context = build_base_context(Some(data), true);

        assert_eq!(context["name"], json!("site"));
        assert!(context["env"].is_object());
        if let Ok(path) = std::env::var("PATH") {
            assert_eq!(context["env"]["PATH"], json!(path));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_environment_skips_non_utf8_entries() {
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![
            (OsString::from("GOOD"), OsString::from("yes")),
            (OsString::from("BAD_VALUE"), OsString::from_vec(vec![0xff, 0xfe])),
            (OsString::from_vec(vec![b'K', 0xff]), OsString::from("v")),
        ];

        let env = environment_context(vars);
        assert_eq!(Value::Object(env), json!({"GOOD": "yes"}));
    }

    #[test]
    fn test_build_base_context_without_env() {
        let context = build_base_context(None, false);
        assert!(context.is_empty());
    }

    #[test]
    fn test_parse_data() {
        let context = parse_data(r#"{"list": ["json", "file"]}"#, "data.json").unwrap();
        assert_eq!(context["list"], json!(["json", "file"]));

        let err = parse_data("[1, 2]", "data.json").unwrap_err();
        assert!(matches!(err, TplcError::DataParse { ref reason, .. } if reason.contains("an array")));

        let err = parse_data("{not json", "data.json").unwrap_err();
        assert!(matches!(err, TplcError::DataParse { .. }));
    }
}
