//! `jwrap` CLI -- navigate and convert JSON/YAML documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Print a subtree as pretty JSON (stdin → stdout)
//! echo '{"servers":[{"name":"alpha"}]}' | jwrap get servers 0
//!
//! # Pick several values at once; dotted selectors walk several levels
//! jwrap at -i config.yaml name servers.0.port missing
//!
//! # List the immediate children of a node, keys sorted
//! jwrap ls -i config.yaml servers
//!
//! # Convert YAML to JSON, or derive the format from the output extension
//! jwrap convert -i config.yaml --to json --sort
//! jwrap convert -i config.json -o config.yml
//!
//! # Tab-indented YAML input
//! jwrap get -i tabbed.yaml --yaml-indent $'\t' root
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jsonwrap::{DumpOptions, Format, Key, ParseOptions, Wrapper};
use serde_json::{json, Value};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jwrap",
    version,
    about = "Navigate and convert JSON/YAML documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct InputArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Indentation token of YAML input, normalized to two spaces
    #[arg(long, default_value = "  ")]
    yaml_indent: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the subtree at PATH as pretty JSON (null when missing)
    Get {
        #[command(flatten)]
        input: InputArgs,
        /// Keys and indices, one per level
        #[arg(allow_negative_numbers = true)]
        path: Vec<String>,
        /// Indentation width of the output
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },
    /// Pick values by selector; dotted selectors walk several levels
    At {
        #[command(flatten)]
        input: InputArgs,
        /// Selectors such as `name` or `servers.0.port`
        #[arg(required = true, allow_negative_numbers = true)]
        selectors: Vec<String>,
        /// Print the bare value instead of an array (single selector only)
        #[arg(long)]
        one: bool,
    },
    /// List the immediate children of the node at PATH
    Ls {
        #[command(flatten)]
        input: InputArgs,
        /// Keys and indices, one per level
        #[arg(allow_negative_numbers = true)]
        path: Vec<String>,
        /// Print a JSON array of {"key", "value"} objects
        #[arg(long)]
        json: bool,
    },
    /// Convert between JSON and YAML
    Convert {
        #[command(flatten)]
        input: InputArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Output format (json, yaml); derived from --output when omitted
        #[arg(long)]
        to: Option<String>,
        /// JSON indentation width
        #[arg(long, default_value_t = 2)]
        indent: usize,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
        /// Sort mapping keys
        #[arg(long)]
        sort: bool,
        /// YAML flow style
        #[arg(long)]
        flow: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Get {
            input,
            path,
            indent,
        } => {
            let doc = load(&input)?;
            let node = resolve(Wrapper::new(&doc), &path);
            let text = jsonwrap::to_pretty_string(node.value(), indent)?;
            println!("{}", text);
        }
        Commands::At {
            input,
            selectors,
            one,
        } => {
            if one && selectors.len() != 1 {
                anyhow::bail!("--one requires exactly one selector, got {}", selectors.len());
            }
            let doc = load(&input)?;
            let root = Wrapper::new(&doc);
            let paths: Vec<Vec<Key>> = selectors
                .iter()
                .map(|s| resolve_keys(root, split_selector(s)))
                .collect();
            let values = root.at_many(paths);
            let out = if one {
                values[0].clone()
            } else {
                Value::Array(values.into_iter().cloned().collect())
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Ls { input, path, json } => {
            let doc = load(&input)?;
            let node = resolve(Wrapper::new(&doc), &path);
            if json {
                let entries: Vec<Value> = node
                    .children()
                    .map(|(key, child)| json!({"key": key, "value": child}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for (key, child) in node {
                    let label = key.map_or_else(|| "-".to_string(), |k| k.to_string());
                    println!("{}\t{}", label, child.value());
                }
            }
        }
        Commands::Convert {
            input,
            output,
            to,
            indent,
            compact,
            sort,
            flow,
        } => {
            let doc = load(&input)?;
            let options = DumpOptions {
                indent: if compact { None } else { Some(indent) },
                sort_keys: sort,
                flow_style: flow,
            };
            match (to.as_deref(), output.as_deref()) {
                (None, Some(path)) => {
                    jsonwrap::save_file(&doc, path, &options)
                        .with_context(|| format!("Failed to save {}", path))?;
                }
                (to, output) => {
                    let format: Format = to.unwrap_or("yaml").parse()?;
                    let text = jsonwrap::format_text(&doc, format, &options)
                        .context("Failed to serialize document")?;
                    write_output(output, &text)?;
                }
            }
        }
    }

    Ok(())
}

/// Stderr logging, `warn` by default, `debug` with `--verbose`; `RUST_LOG`
/// takes precedence over both.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load(args: &InputArgs) -> Result<Value> {
    let options = ParseOptions::with_indent(args.yaml_indent.as_str());
    match args.input.as_deref() {
        Some(path) => jsonwrap::load_file(path, &options)
            .with_context(|| format!("Failed to load {}", path)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            tracing::debug!(bytes = buf.len(), "read stdin");
            jsonwrap::parse_text(&buf, &options).context("Failed to parse stdin")
        }
    }
}

/// Split a dotted selector (`servers.0.port`) into its segments.
/// An empty selector addresses the root.
fn split_selector(selector: &str) -> Vec<&str> {
    if selector.is_empty() {
        Vec::new()
    } else {
        selector.split('.').collect()
    }
}

/// Turn command-line segments into keys, using the data to decide: a
/// segment that parses as an integer is an index when the node it applies
/// to is a sequence, and a mapping key otherwise.
fn resolve_keys<'s>(root: Wrapper<'_>, segments: impl IntoIterator<Item = &'s str>) -> Vec<Key<'s>> {
    let mut node = root;
    let mut keys = Vec::new();
    for segment in segments {
        let key = match segment.parse::<i64>() {
            Ok(index) if node.value().is_array() => Key::Index(index),
            _ => Key::Name(segment),
        };
        node = node.child(key);
        keys.push(key);
    }
    keys
}

fn resolve<'a>(root: Wrapper<'a>, segments: &[String]) -> Wrapper<'a> {
    root.get(resolve_keys(root, segments.iter().map(String::as_str)))
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
