//! Serialize tree values to JSON or YAML text and files.
//!
//! The output format is an explicit [`Format`]. For files it is derived from
//! the extension before anything is written, so an unknown extension fails
//! without touching the filesystem.

use crate::error::{Result, WrapError};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

/// Text formats understood by [`format_text`] and [`save_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    Json,
    #[default]
    Yaml,
}

impl Format {
    /// Resolve the format from a path's extension (without the dot).
    /// A path with no extension is unsupported.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy())
            .unwrap_or_default();
        let format: Result<Self> = ext.parse();
        tracing::trace!(path = %path.display(), %ext, ok = format.is_ok(), "format from extension");
        format
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

impl FromStr for Format {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(WrapError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`format_text`] and [`save_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// JSON indentation width. `None` emits single-line JSON with a space
    /// after every `,` and `:` (`{"a": 1, "b": [1, 2]}`).
    pub indent: Option<usize>,
    /// Sort mapping keys recursively (JSON and YAML).
    pub sort_keys: bool,
    /// Emit YAML in single-line flow style (`{"a": 1}`) instead of block style.
    pub flow_style: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indent: Some(2),
            sort_keys: false,
            flow_style: false,
        }
    }
}

/// Serialize `value` in the given format.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use jsonwrap::{format_text, DumpOptions, Format};
///
/// let value = json!({"b": 1, "a": [true, null]});
/// let opts = DumpOptions { sort_keys: true, ..DumpOptions::default() };
/// assert_eq!(
///     format_text(&value, Format::Yaml, &opts).unwrap(),
///     "a:\n- true\n- null\nb: 1\n"
/// );
/// ```
pub fn format_text(value: &Value, format: Format, options: &DumpOptions) -> Result<String> {
    let sorted;
    let value = if options.sort_keys {
        sorted = sort_keys(value);
        &sorted
    } else {
        value
    };

    match format {
        Format::Json => {
            let mut buf = Vec::new();
            write_json(&mut buf, value, options.indent)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        }
        Format::Yaml if options.flow_style => {
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, FlowFormatter);
            value.serialize(&mut ser)?;
            buf.push(b'\n');
            Ok(String::from_utf8_lossy(&buf).into_owned())
        }
        Format::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

/// Like [`format_text`], with the format given by name (`"json"`, `"yaml"`,
/// `"yml"`).
///
/// # Errors
///
/// Returns [`WrapError::UnsupportedFormat`] for any other name.
pub fn format_text_as(value: &Value, format: &str, options: &DumpOptions) -> Result<String> {
    format_text(value, format.parse()?, options)
}

/// Write `value` to `path`, choosing the format from the file extension.
///
/// # Errors
///
/// - [`WrapError::UnsupportedFormat`] for an unknown or missing extension;
///   nothing is written in that case
/// - [`WrapError::PathNotFound`] if the containing directory does not exist
/// - [`WrapError::Io`] for any other write failure
pub fn save_file(value: &Value, path: impl AsRef<Path>, options: &DumpOptions) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let text = format_text(value, format, options)?;
    tracing::debug!(path = %path.display(), %format, bytes = text.len(), "saving file");
    std::fs::write(path, text).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => WrapError::PathNotFound {
            path: path.to_path_buf(),
        },
        _ => WrapError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Pretty JSON text with the given indentation width.
pub fn to_pretty_string(value: &Value, indent: usize) -> Result<String> {
    let mut buf = Vec::new();
    write_json(&mut buf, value, Some(indent))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Print `value` to stdout as pretty JSON, followed by a newline.
pub fn pretty_print(value: &Value, indent: usize) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, value, Some(indent))?;
    writeln!(out).map_err(serde_json::Error::io)?;
    Ok(())
}

fn write_json<W: Write>(writer: W, value: &Value, indent: Option<usize>) -> serde_json::Result<()> {
    match indent {
        None => {
            let mut ser = serde_json::Serializer::with_formatter(writer, FlowFormatter);
            value.serialize(&mut ser)
        }
        Some(width) => {
            let indent = " ".repeat(width);
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
            value.serialize(&mut ser)
        }
    }
}

/// Recursively rebuild `value` with every mapping's keys in sorted order.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, child)| (key.clone(), sort_keys(child)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Single-line output with a space after every `,` and `:`. Used for
/// unindented JSON and for YAML flow style.
struct FlowFormatter;

impl Formatter for FlowFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}
