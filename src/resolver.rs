//! Variable lookup inside the variables section
//!
//! A lookup descends the section one path component at a time. When the
//! value it lands on is itself a reference, the resolver follows it, counting
//! one hop per followed reference. The hop counter is the only cycle guard: a
//! chain longer than `max_recursion` fails whether or not it actually loops.

use crate::error::{Result, VariableJsonError};
use crate::options::Options;
use crate::path::Path;
use crate::value::{Value, is_reference};
use tracing::trace;

/// Result of a successful lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'v> {
    /// The non-reference value the chain ends at
    pub value: &'v Value,
    /// Hops taken to get there, including the initial lookup
    pub hops: usize,
}

/// Looks up references against an immutable variables section
#[derive(Debug, Clone, Copy)]
pub struct VariableResolver<'v> {
    variables: &'v Value,
    delimiter: &'v str,
    max_recursion: usize,
}

impl<'v> VariableResolver<'v> {
    /// Creates a resolver over `variables`, which is expected to be an object
    pub fn new(variables: &'v Value, options: &'v Options) -> Self {
        Self {
            variables,
            delimiter: &options.delimiter,
            max_recursion: options.max_recursion,
        }
    }

    /// Returns the variables section this resolver reads from
    pub fn variables(&self) -> &'v Value {
        self.variables
    }

    /// Resolves `reference` (the path inside `$(...)`) with a fresh hop counter
    pub fn resolve(&self, reference: &str) -> Result<&'v Value> {
        self.resolve_from(reference, 0).map(|resolved| resolved.value)
    }

    /// Resolves `reference` continuing a chain that has already taken
    /// `hops` hops.
    pub fn resolve_from(&self, reference: &str, hops: usize) -> Result<Resolved<'v>> {
        let mut hops = hops;
        let value = self.follow(reference, &mut hops)?;
        Ok(Resolved { value, hops })
    }

    fn follow(&self, reference: &str, hops: &mut usize) -> Result<&'v Value> {
        *hops += 1;
        if *hops > self.max_recursion {
            return Err(VariableJsonError::MaxRecursionExceeded {
                max: self.max_recursion,
            });
        }
        trace!(reference, hops = *hops, "following variable reference");

        let path = Path::split(reference, self.delimiter);
        let mut node = self.variables;
        for segment in &path.segments {
            node = self.step(node, segment, reference)?;
            // An intermediate reference is followed before descending further
            if let Some(inner) = is_reference(node) {
                node = self.follow(inner, hops)?;
            }
        }

        let leaf = self.step(node, &path.key, reference)?;
        match is_reference(leaf) {
            Some(inner) => self.follow(inner, hops),
            None => Ok(leaf),
        }
    }

    /// Moves one component down from `node`
    fn step(&self, node: &'v Value, component: &str, reference: &str) -> Result<&'v Value> {
        match node {
            Value::Object(obj) => obj
                .get(component)
                .ok_or_else(|| VariableJsonError::not_found(reference)),
            Value::Array(arr) => {
                let index: usize = component.parse().map_err(|_| {
                    VariableJsonError::invalid_path(
                        reference,
                        format!("Index \"{component}\" is not an integer."),
                    )
                })?;
                arr.get(index).ok_or_else(|| {
                    VariableJsonError::invalid_path(reference, format!("Index {index} out of range."))
                })
            }
            other => Err(VariableJsonError::invalid_path(
                reference,
                format!("cannot look up '{component}' in a {} value", other.kind()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: serde_json::Value) -> Value {
        Value::from(value)
    }

    #[test]
    fn test_resolve_literal() {
        let variables = vars(json!({"name": "John", "age": 42}));
        let options = Options::default();
        let resolver = VariableResolver::new(&variables, &options);

        assert_eq!(resolver.resolve("name").unwrap(), &Value::from("John"));
        assert_eq!(resolver.resolve("age").unwrap().as_i64(), Some(42));
    }

    #[test]
    fn test_resolve_nested_path() {
        let variables = vars(json!({"john": {"address": {"city": "Oslo"}}}));
        let options = Options::default();
        let resolver = VariableResolver::new(&variables, &options);

        assert_eq!(
            resolver.resolve("john.address.city").unwrap(),
            &Value::from("Oslo")
        );
        assert!(resolver.resolve("john.address").unwrap().is_object());
    }

    #[test]
    fn test_resolve_chain() {
        let variables = vars(json!({"a": "$(b)", "b": "$(c.d)", "c": {"d": true}}));
        let options = Options::default();
        let resolver = VariableResolver::new(&variables, &options);

        let resolved = resolver.resolve_from("a", 0).unwrap();
        assert_eq!(resolved.value, &Value::Boolean(true));
        assert_eq!(resolved.hops, 3);
    }

    #[test]
    fn test_resolve_through_intermediate_reference() {
        let variables = vars(json!({"alias": "$(real)", "real": {"host": "db"}}));
        let options = Options::default();
        let resolver = VariableResolver::new(&variables, &options);

        assert_eq!(resolver.resolve("alias.host").unwrap(), &Value::from("db"));
    }

    #[test]
    fn test_resolve_array_index() {
        let variables = vars(json!({"servers": [{"host": "a"}, {"host": "b"}]}));
        let options = Options::default();
        let resolver = VariableResolver::new(&variables, &options);

        assert_eq!(
            resolver.resolve("servers.1.host").unwrap(),
            &Value::from("b")
        );
    }

    #[test]
    fn test_missing_variable_reports_full_path() {
        let variables = vars(json!({"a": {}}));
        let options = Options::default();
        let resolver = VariableResolver::new(&variables, &options);

        let err = resolver.resolve("a.b").unwrap_err();
        assert!(matches!(err, VariableJsonError::VariableNotFound { ref path } if path == "a.b"));
        assert_eq!(err.to_string(), "Variable a.b not found.");

        let err = resolver.resolve("x.y.z").unwrap_err();
        assert_eq!(err.to_string(), "Variable x.y.z not found.");
    }

    #[test]
    fn test_missing_variable_in_chain_reports_inner_path() {
        let variables = vars(json!({"fizz": "$(buzz)"}));
        let options = Options::default();
        let resolver = VariableResolver::new(&variables, &options);

        let err = resolver.resolve("fizz").unwrap_err();
        assert_eq!(err.to_string(), "Variable buzz not found.");
    }

    #[test]
    fn test_invalid_index_errors() {
        let variables = vars(json!({"list": [1], "d": 5}));
        let options = Options::default();
        let resolver = VariableResolver::new(&variables, &options);

        let err = resolver.resolve("list.1").unwrap_err();
        assert!(err.to_string().contains("Index 1 out of range."));

        let err = resolver.resolve("list.a").unwrap_err();
        assert!(err.to_string().contains("Index \"a\" is not an integer."));

        let err = resolver.resolve("d.z").unwrap_err();
        assert!(matches!(err, VariableJsonError::InvalidPath { ref path, .. } if path == "d.z"));
    }

    #[test]
    fn test_self_reference_hits_recursion_limit() {
        let variables = vars(json!({"a": "$(a)"}));
        let options = Options::default().with_max_recursion(10);
        let resolver = VariableResolver::new(&variables, &options);

        let err = resolver.resolve("a").unwrap_err();
        assert!(matches!(err, VariableJsonError::MaxRecursionExceeded { max: 10 }));
    }

    #[test]
    fn test_custom_delimiter() {
        let variables = vars(json!({"a": {"b": 1}}));
        let options = Options::default().with_delimiter("/");
        let resolver = VariableResolver::new(&variables, &options);

        assert_eq!(resolver.resolve("a/b").unwrap().as_i64(), Some(1));
        assert!(resolver.resolve("a.b").is_err());
    }
}
