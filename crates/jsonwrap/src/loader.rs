//! Load tree values from text or files.
//!
//! Input is tried as strict JSON first. If that fails it is parsed as YAML,
//! after the configured indentation token has been normalized to two spaces.
//! Only when both parsers reject the input is an error returned, carrying
//! both diagnostics.

use crate::error::{Result, WrapError};
use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::io;
use std::path::Path;

/// The indentation YAML input is normalized to.
pub const YAML_INDENT: &str = "  ";

/// Options for [`parse_text`] and [`load_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Indentation token used by YAML input (e.g. `"\t"` or `"    "`).
    /// Every occurrence is replaced with two spaces before the YAML pass.
    pub indent: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            indent: YAML_INDENT.to_string(),
        }
    }
}

impl ParseOptions {
    pub fn with_indent(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }
}

/// Parse `text` as JSON, falling back to YAML. Merge keys (`<<: *anchor`)
/// in YAML input are resolved.
///
/// # Errors
///
/// Returns [`WrapError::Parse`] when the text is neither valid JSON nor
/// valid YAML.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use jsonwrap::{parse_text, ParseOptions};
///
/// let opts = ParseOptions::default();
/// assert_eq!(parse_text(r#"{"a":1}"#, &opts).unwrap(), json!({"a": 1}));
/// assert_eq!(parse_text("a: 1", &opts).unwrap(), json!({"a": 1}));
/// assert!(parse_text("{not valid", &opts).is_err());
/// ```
pub fn parse_text(text: &str, options: &ParseOptions) -> Result<Value> {
    let json_err = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    tracing::debug!(error = %json_err, "input is not JSON, falling back to YAML");

    let normalized = normalize_indent(text, &options.indent);
    let yaml = serde_yaml::from_str::<serde_yaml::Value>(&normalized).and_then(|mut yaml| {
        yaml.apply_merge()?;
        Ok(yaml)
    });
    match yaml {
        Ok(yaml) => Ok(yaml_to_json(yaml)),
        Err(yaml_err) => Err(WrapError::Parse {
            json: json_err.to_string(),
            yaml: yaml_err.to_string(),
        }),
    }
}

/// Read a UTF-8 file and [`parse_text`] its contents.
///
/// # Errors
///
/// - [`WrapError::FileNotFound`] if `path` does not exist
/// - [`WrapError::Io`] for any other read failure, including invalid UTF-8
/// - [`WrapError::Parse`] as for [`parse_text`]
pub fn load_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Value> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading file");
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => WrapError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => WrapError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_text(&text, options)
}

/// An empty token would splice spaces between every character, so it is
/// treated like the default.
fn normalize_indent<'t>(text: &'t str, indent: &str) -> Cow<'t, str> {
    if indent.is_empty() || indent == YAML_INDENT {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.replace(indent, YAML_INDENT))
    }
}

/// Convert a YAML document into the JSON tree model.
///
/// Mapping keys are stringified, tags are dropped in favour of the tagged
/// value, and non-finite floats become null.
fn yaml_to_json(yaml: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(mapping_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn mapping_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Null => "null".to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        // Sequences, mappings and tagged keys: compact JSON of the key.
        complex => yaml_to_json(complex).to_string(),
    }
}
