//! Depth-first rebuild of the document with references substituted
//!
//! The walker computes a delimiter-joined path for every object member and
//! array element, and inserts each leaf into a fresh output tree at that path,
//! creating intermediate objects on the way. Arrays are inserted as whole
//! values; their elements are appended in visitation order.

use crate::error::{Result, VariableJsonError};
use crate::options::Options;
use crate::path::{Path, child_path};
use crate::resolver::VariableResolver;
use crate::value::Value;

/// Rebuilds documents against one variables section
#[derive(Debug, Clone, Copy)]
pub struct TreeRebuilder<'a> {
    resolver: VariableResolver<'a>,
    delimiter: &'a str,
}

impl<'a> TreeRebuilder<'a> {
    /// Creates a rebuilder resolving against `variables`
    pub fn new(variables: &'a Value, options: &'a Options) -> Self {
        Self {
            resolver: VariableResolver::new(variables, options),
            delimiter: &options.delimiter,
        }
    }

    /// Returns the resolver used for references
    pub fn resolver(&self) -> &VariableResolver<'a> {
        &self.resolver
    }

    /// Walks `node`, inserting its contents into `output` under `path`
    pub fn rebuild(&self, node: &Value, output: &mut Value, path: &str) -> Result<()> {
        self.rebuild_at(node, output, path, 0)
    }

    /// Inserts `value` into `output` at `path`, resolving it first if it is a
    /// reference
    pub fn insert(&self, output: &mut Value, path: &str, value: &Value) -> Result<()> {
        self.insert_at(output, path, value, 0)
    }

    // `hops` is the length of the reference chain that produced `node`. It is
    // zero for the document body and carries over into resolved subtrees, so
    // a variable that contains a reference to itself still hits the limit.
    fn rebuild_at(&self, node: &Value, output: &mut Value, path: &str, hops: usize) -> Result<()> {
        match node {
            Value::Object(obj) => {
                for (key, child) in obj {
                    let member_path = child_path(path, self.delimiter, key);
                    match child {
                        Value::Object(inner) if !inner.is_empty() => {
                            self.rebuild_at(child, output, &member_path, hops)?
                        }
                        _ => self.insert_at(output, &member_path, child, hops)?,
                    }
                }
                Ok(())
            }
            Value::Array(arr) => {
                for (index, element) in arr.iter().enumerate() {
                    let element_path = child_path(path, self.delimiter, index);
                    self.insert_at(output, &element_path, element, hops)?;
                }
                Ok(())
            }
            scalar => self.insert_at(output, path, scalar, hops),
        }
    }

    fn insert_at(&self, output: &mut Value, path: &str, value: &Value, hops: usize) -> Result<()> {
        let (value, hops) = match value.as_reference() {
            Some(reference) => {
                let resolved = self.resolver.resolve_from(reference, hops)?;
                (resolved.value, resolved.hops)
            }
            None => (value, hops),
        };

        let value = self.materialize(value, hops)?;
        let path = Path::split(path, self.delimiter);
        let container = self.ensure_segments(output, &path)?;

        match container {
            Value::Object(obj) => {
                if obj.contains_key(&path.key) {
                    return Err(VariableJsonError::DuplicateKey {
                        key: path.join(self.delimiter),
                    });
                }
                obj.insert(path.key, value);
                Ok(())
            }
            // Only fresh containers built by `materialize` are filled by
            // position; a named path never addresses into an array
            Value::Array(arr) if path.segments.is_empty() => {
                arr.push(value);
                Ok(())
            }
            other => Err(VariableJsonError::invalid_path(
                path.join(self.delimiter),
                format!("cannot insert into a {} value", other.kind()),
            )),
        }
    }

    /// Walks `path.segments` from the output root, creating empty objects
    /// for absent segments, and returns the terminal container
    fn ensure_segments<'o>(&self, output: &'o mut Value, path: &Path) -> Result<&'o mut Value> {
        let mut current = output;
        for segment in &path.segments {
            current = match current {
                Value::Object(obj) => obj
                    .entry(segment.clone())
                    .or_insert_with(Value::new_object),
                other => {
                    return Err(VariableJsonError::invalid_path(
                        path.join(self.delimiter),
                        format!("segment '{segment}' addresses a {} value", other.kind()),
                    ));
                }
            };
        }
        Ok(current)
    }

    /// Produces the owned value to insert: containers are rebuilt into fresh
    /// ones so nested references resolve, scalars are copied
    fn materialize(&self, value: &Value, hops: usize) -> Result<Value> {
        match value {
            Value::Object(_) => {
                let mut out = Value::new_object();
                self.rebuild_at(value, &mut out, "", hops)?;
                Ok(out)
            }
            Value::Array(_) => {
                let mut out = Value::new_array();
                self.rebuild_at(value, &mut out, "", hops)?;
                Ok(out)
            }
            scalar => Ok(scalar.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rebuild(document: serde_json::Value, variables: serde_json::Value) -> Result<serde_json::Value> {
        rebuild_with(document, variables, &Options::default())
    }

    fn rebuild_with(
        document: serde_json::Value,
        variables: serde_json::Value,
        options: &Options,
    ) -> Result<serde_json::Value> {
        let document = Value::from(document);
        let variables = Value::from(variables);
        let rebuilder = TreeRebuilder::new(&variables, options);

        let mut output = Value::new_object();
        rebuilder.rebuild(&document, &mut output, "")?;
        Ok(output.into())
    }

    #[test]
    fn test_rebuild_without_references_is_identity() {
        let document = json!({
            "a": 1,
            "b": {"c": [1, 2, {"d": null}], "e": {"f": "g"}},
            "h": []
        });

        assert_eq!(rebuild(document.clone(), json!({"unused": 0})).unwrap(), document);
    }

    #[test]
    fn test_rebuild_substitutes_references() {
        let output = rebuild(
            json!({"name": "$(person.name)", "nested": {"age": "$(person.age)"}}),
            json!({"person": {"name": "Ada", "age": 36}}),
        )
        .unwrap();

        assert_eq!(output, json!({"name": "Ada", "nested": {"age": 36}}));
    }

    #[test]
    fn test_rebuild_preserves_array_order() {
        let output = rebuild(
            json!({"x": ["$(v1)", "literal", "$(v2)"]}),
            json!({"v1": 1, "v2": [true, false]}),
        )
        .unwrap();

        assert_eq!(output, json!({"x": [1, "literal", [true, false]]}));
    }

    #[test]
    fn test_rebuild_resolves_inside_resolved_subtree() {
        let output = rebuild(
            json!({"server": "$(defaults)"}),
            json!({"defaults": {"host": "$(host)", "ports": ["$(port)"]}, "host": "localhost", "port": 80}),
        )
        .unwrap();

        assert_eq!(output, json!({"server": {"host": "localhost", "ports": [80]}}));
    }

    #[test]
    fn test_rebuild_keeps_empty_object() {
        let output = rebuild(json!({"a": {}, "b": {"c": {}}}), json!({"v": 1})).unwrap();
        assert_eq!(output, json!({"a": {}, "b": {"c": {}}}));
    }

    #[test]
    fn test_insert_creates_intermediate_objects() {
        let variables = Value::from(json!({"v": "x"}));
        let options = Options::default();
        let rebuilder = TreeRebuilder::new(&variables, &options);

        let mut output = Value::new_object();
        rebuilder
            .insert(&mut output, ".a.b.c", &Value::from("$(v)"))
            .unwrap();

        assert_eq!(serde_json::Value::from(output), json!({"a": {"b": {"c": "x"}}}));
    }

    #[test]
    fn test_insert_never_overwrites() {
        let variables = Value::from(json!({"v": 1}));
        let options = Options::default();
        let rebuilder = TreeRebuilder::new(&variables, &options);

        let mut output = Value::new_object();
        rebuilder.insert(&mut output, ".a", &Value::from(1i64)).unwrap();
        let err = rebuilder
            .insert(&mut output, ".a", &Value::from(2i64))
            .unwrap_err();

        assert!(matches!(err, VariableJsonError::DuplicateKey { ref key } if key == "a"));
    }

    #[test]
    fn test_insert_through_scalar_fails() {
        let variables = Value::from(json!({"v": 1}));
        let options = Options::default();
        let rebuilder = TreeRebuilder::new(&variables, &options);

        let mut output = Value::new_object();
        rebuilder.insert(&mut output, ".a", &Value::from(1i64)).unwrap();
        let err = rebuilder
            .insert(&mut output, ".a.b.c", &Value::from(2i64))
            .unwrap_err();

        assert!(matches!(err, VariableJsonError::InvalidPath { ref path, .. } if path == "a.b.c"));
    }

    #[test]
    fn test_insert_through_array_fails() {
        for key in ["a.x", "a.0"] {
            let err = rebuild(json!({"a": [1], (key): "$(v)"}), json!({"v": 9})).unwrap_err();
            assert!(
                matches!(err, VariableJsonError::InvalidPath { ref path, .. } if path == key),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn test_self_containing_variable_hits_recursion_limit() {
        let err = rebuild_with(
            json!({"x": "$(node)"}),
            json!({"node": {"child": "$(node)"}}),
            &Options::default().with_max_recursion(16),
        )
        .unwrap_err();

        assert!(matches!(err, VariableJsonError::MaxRecursionExceeded { .. }));
    }

    #[test]
    fn test_missing_reference_propagates() {
        let err = rebuild(json!({"x": "$(a.b)"}), json!({"a": {}})).unwrap_err();
        assert!(matches!(err, VariableJsonError::VariableNotFound { ref path } if path == "a.b"));
    }
}
