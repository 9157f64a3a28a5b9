//! # Variable JSON
//!
//! Resolve symbolic variable references inside JSON documents before they
//! reach a normal JSON consumer.
//!
//! ## Overview
//!
//! A document may declare a reserved top-level object, the variables section
//! (`"$vars"` by default). Any string value elsewhere in the document of the
//! form `$(path.to.var)` is replaced by the value found by following that path
//! inside the variables section. Variables may reference other variables, so
//! resolution is recursive, bounded by a configurable hop limit that also
//! catches cycles.
//!
//! ## Basic Usage
//!
//! ```rust
//! use variable_json::{parse, to_string};
//!
//! let json = r#"{
//!     "$vars": {
//!         "user": {"name": "Ada", "langs": ["en", "fr"]},
//!         "owner": "$(user.name)"
//!     },
//!     "title": "$(owner)",
//!     "first_lang": "$(user.langs.0)",
//!     "langs": "$(user.langs)"
//! }"#;
//!
//! let resolved = parse(json)?;
//! assert_eq!(
//!     to_string(&resolved)?,
//!     r#"{"title":"Ada","first_lang":"en","langs":["en","fr"]}"#
//! );
//! # Ok::<(), variable_json::VariableJsonError>(())
//! ```
//!
//! ## Typed Deserialization
//!
//! ```rust
//! use serde::Deserialize;
//! use variable_json::from_str;
//!
//! #[derive(Debug, Deserialize)]
//! struct Config {
//!     host: String,
//!     port: u16,
//! }
//!
//! let config: Config = from_str(r#"{
//!     "$vars": {"defaults": {"port": 8080}},
//!     "host": "localhost",
//!     "port": "$(defaults.port)"
//! }"#)?;
//! assert_eq!(config.port, 8080);
//! # Ok::<(), variable_json::VariableJsonError>(())
//! ```
//!
//! ## Options
//!
//! ```rust
//! use variable_json::{Options, parse_with_options};
//!
//! let options = Options::default()
//!     .with_variable_key("$variables")
//!     .with_delimiter("/")
//!     .with_keep_vars(true)
//!     .with_emitted_name("vars");
//!
//! let resolved = parse_with_options(
//!     r#"{"$variables": {"a": {"b": 1}}, "x": "$(a/b)"}"#,
//!     options,
//! )?;
//! assert!(resolved.as_object().unwrap().contains_key("vars"));
//! # Ok::<(), variable_json::VariableJsonError>(())
//! ```
//!
//! ## Error Handling
//!
//! Every failure aborts resolution; no partial output is produced.
//!
//! ```rust
//! use variable_json::{parse, VariableJsonError};
//!
//! match parse(r#"{"$vars": {"a": {}}, "x": "$(a.b)"}"#) {
//!     Err(VariableJsonError::VariableNotFound { path }) => assert_eq!(path, "a.b"),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (`debug` for document-level steps,
//! `trace` for every followed reference). Install any subscriber to see them.

pub mod deserializer;
pub mod error;
pub mod options;
pub mod parser;
pub mod path;
pub mod rebuilder;
pub mod resolver;
pub mod value;


// Re-export main types and functions
pub use deserializer::{from_str, from_str_with_options, from_value};
pub use error::{Result, VariableJsonError};
pub use options::Options;
pub use parser::{
    VariableJsonParser, parse, parse_value, parse_with_options, resolve_str, to_string,
    to_string_pretty,
};
pub use path::Path;
pub use rebuilder::TreeRebuilder;
pub use resolver::{Resolved, VariableResolver};
pub use value::{Array, Object, Value, is_reference};
