//! Document driver
//!
//! Splits the variables section out of a parsed document, rebuilds the rest
//! with every reference resolved, and optionally re-attaches the section.

use crate::error::{Result, VariableJsonError};
use crate::options::Options;
use crate::rebuilder::TreeRebuilder;
use crate::value::{Object, Value};
use serde::Serialize;
use tracing::debug;

/// Resolves the variables of a single document.
///
/// Each parser owns its document and variables section; nothing is shared
/// between parsers.
#[derive(Debug, Clone)]
pub struct VariableJsonParser {
    document: Object,
    variables: Object,
    options: Options,
}

impl VariableJsonParser {
    /// Parses JSON text and extracts the variables section
    pub fn new(json: &str, options: Options) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        Self::from_value(document, options)
    }

    /// Extracts the variables section from an already parsed document
    pub fn from_value(document: Value, options: Options) -> Result<Self> {
        let mut document = match document {
            Value::Object(obj) => obj,
            other => {
                return Err(VariableJsonError::invalid_document(format!(
                    "top-level value must be an object, found {}",
                    other.kind()
                )));
            }
        };

        let variables = match document.shift_remove(&options.variable_key) {
            None => Object::new(),
            Some(Value::Object(section)) => section,
            Some(other) => {
                return Err(VariableJsonError::invalid_document(format!(
                    "variables section '{}' must be an object, found {}",
                    options.variable_key,
                    other.kind()
                )));
            }
        };

        Ok(Self {
            document,
            variables,
            options,
        })
    }

    /// Returns the extracted variables section
    pub fn variables(&self) -> &Object {
        &self.variables
    }

    /// Returns the document with the variables section removed
    pub fn document(&self) -> &Object {
        &self.document
    }

    /// Returns the options this parser was built with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Resolves every reference and returns the output tree
    pub fn parse(self) -> Result<Value> {
        let Self {
            document,
            variables,
            options,
        } = self;

        if variables.is_empty() {
            debug!(
                variable_key = %options.variable_key,
                "no variables declared, returning document unchanged"
            );
            return Ok(Value::Object(document));
        }

        debug!(
            variable_key = %options.variable_key,
            count = variables.len(),
            "resolving document variables"
        );

        let document = Value::Object(document);
        let variables = Value::Object(variables);
        let mut output = Value::new_object();
        TreeRebuilder::new(&variables, &options).rebuild(&document, &mut output, "")?;

        if options.keep_vars {
            debug!(emitted_name = %options.emitted_name, "re-emitting variables section");
            if let Value::Object(obj) = &mut output {
                if obj.contains_key(&options.emitted_name) {
                    return Err(VariableJsonError::DuplicateKey {
                        key: options.emitted_name,
                    });
                }
                obj.insert(options.emitted_name, variables);
            }
        }

        Ok(output)
    }
}

/// Resolves `json` with default options
pub fn parse(json: &str) -> Result<Value> {
    parse_with_options(json, Options::default())
}

/// Resolves `json` with the given options
pub fn parse_with_options(json: &str, options: Options) -> Result<Value> {
    VariableJsonParser::new(json, options)?.parse()
}

/// Resolves an already parsed document
pub fn parse_value(document: Value, options: Options) -> Result<Value> {
    VariableJsonParser::from_value(document, options)?.parse()
}

/// Resolves `json` and serializes the result back to JSON text
pub fn resolve_str(json: &str, options: Options) -> Result<String> {
    to_string(&parse_with_options(json, options)?)
}

/// Serializes any value to compact JSON text
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serializes any value to pretty-printed JSON text
pub fn to_string_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolved(json: &str, options: Options) -> serde_json::Value {
        parse_with_options(json, options).unwrap().into()
    }

    #[test]
    fn test_variables_are_extracted() {
        let parser = VariableJsonParser::new(
            r#"{"$vars": {"a": 1}, "x": "$(a)"}"#,
            Options::default(),
        )
        .unwrap();

        assert_eq!(parser.variables().len(), 1);
        assert!(!parser.document().contains_key("$vars"));
        assert_eq!(parser.options().variable_key, "$vars");
    }

    #[test]
    fn test_short_circuit_without_variables() {
        let json = r#"{"x": "$(a)", "y": [1, 2]}"#;
        assert_eq!(
            resolved(json, Options::default()),
            json!({"x": "$(a)", "y": [1, 2]})
        );
    }

    #[test]
    fn test_short_circuit_strips_empty_section() {
        let json = r#"{"$vars": {}, "x": "$(a)"}"#;
        assert_eq!(resolved(json, Options::default()), json!({"x": "$(a)"}));
    }

    #[test]
    fn test_short_circuit_preserves_key_order() {
        let json = r#"{"z": 1, "$vars": {}, "a": 2}"#;
        let output = parse(json).unwrap();
        assert_eq!(to_string(&output).unwrap(), r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_resolution_preserves_key_order() {
        let json = r#"{"z": "$(v)", "$vars": {"v": 0}, "a": {"c": 1, "b": 2}}"#;
        let output = parse(json).unwrap();
        assert_eq!(
            to_string(&output).unwrap(),
            r#"{"z":0,"a":{"c":1,"b":2}}"#
        );
    }

    #[test]
    fn test_keep_vars_re_emits_section() {
        let json = r#"{"$vars": {"a": "$(b)", "b": 2}, "x": "$(a)"}"#;
        let options = Options::default()
            .with_keep_vars(true)
            .with_emitted_name("vars");

        assert_eq!(
            resolved(json, options),
            json!({"x": 2, "vars": {"a": "$(b)", "b": 2}})
        );
    }

    #[test]
    fn test_keep_vars_collision_is_rejected() {
        let json = r#"{"$vars": {"a": 1}, "vars": "$(a)"}"#;
        let options = Options::default()
            .with_keep_vars(true)
            .with_emitted_name("vars");

        let err = parse_with_options(json, options).unwrap_err();
        assert!(matches!(err, VariableJsonError::DuplicateKey { ref key } if key == "vars"));
    }

    #[test]
    fn test_non_object_root_is_invalid() {
        for json in ["[1, 2]", "42", "\"text\"", "null"] {
            let err = parse(json).unwrap_err();
            assert!(err.is_document_error(), "{json}: {err}");
        }
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        let err = parse(r#"{"a": "#).unwrap_err();
        assert!(err.is_document_error());
    }

    #[test]
    fn test_non_object_variables_section_is_invalid() {
        let err = parse(r#"{"$vars": [1], "x": 1}"#).unwrap_err();
        assert!(err.is_document_error());
        assert!(err.to_string().contains("$vars"));
    }

    #[test]
    fn test_resolve_str_round_trip() {
        let text = resolve_str(
            r#"{"$vars": {"greeting": "hi"}, "msg": "$(greeting)"}"#,
            Options::default(),
        )
        .unwrap();

        assert_eq!(text, r#"{"msg":"hi"}"#);
    }

    #[test]
    fn test_parse_value() {
        let document = Value::from(json!({"$vars": {"n": 3}, "list": ["$(n)"]}));
        let output = parse_value(document, Options::default()).unwrap();

        assert_eq!(serde_json::Value::from(output), json!({"list": [3]}));
    }
}
