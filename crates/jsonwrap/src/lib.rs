//! # jsonwrap
//!
//! Failure-safe navigation over loosely-typed tree data (parsed JSON or YAML),
//! plus a small set of load/dump helpers.
//!
//! Navigation never fails: a missing key, an out-of-range index or an attempt
//! to index into a scalar yields `null` rather than an error. Loading and
//! dumping return typed errors for genuine I/O and format problems.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonwrap::{parse_text, path, ParseOptions, Wrapper};
//!
//! let doc = parse_text("
//! servers:
//!   - name: alpha
//!     ports: [80, 443]
//! ", &ParseOptions::default()).unwrap();
//!
//! let root = Wrapper::new(&doc);
//! let server = root.get(path!["servers", 0]);
//! assert_eq!(server.at_one("name"), "alpha");
//! assert_eq!(server.at_one(path!["ports", -1]), 443);
//! assert!(server.get(["missing", "deeper"]).is_null());
//!
//! let ports: Vec<_> = server.child("ports").children().map(|(_, p)| p.value().clone()).collect();
//! assert_eq!(ports, [80, 443]);
//! ```
//!
//! ## Modules
//!
//! - [`wrapper`] -- `Wrapper`, `Key`, `Selector` and the `Children` iterator
//! - [`loader`] -- JSON-with-YAML-fallback parsing of text and files
//! - [`dumper`] -- JSON/YAML serialization of values to text and files
//! - [`kind`] -- `is_leaf` / `is_node` classification
//! - [`error`] -- error types for load/dump failures

pub mod dumper;
pub mod error;
pub mod kind;
pub mod loader;
pub mod wrapper;

pub use dumper::{
    format_text, format_text_as, pretty_print, save_file, to_pretty_string, DumpOptions, Format,
};
pub use error::{Result, WrapError};
pub use kind::{is_leaf, is_node};
pub use loader::{load_file, parse_text, ParseOptions};
pub use wrapper::{Children, Key, Selector, Wrapper};

/// The tree value type every function in this crate operates on.
pub use serde_json::Value;
