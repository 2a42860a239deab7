//! Recursive structural validation of configuration mappings
//!
//! A schema template is a nested mapping whose keys (not values) describe
//! the required shape of a candidate mapping. Template leaf values are
//! placeholders and are never inspected; only key presence and nesting
//! shape matter. Validation is pure and never mutates its arguments.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;

/// Structural mismatch between a template and a candidate mapping
///
/// Paths are JSONPath-style: `$` is the root, `$.credentials` a nested
/// mapping under the top-level `credentials` key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("missing required keys at `{path}`: {}", .keys.join(", "))]
    MissingKeys { path: String, keys: Vec<String> },

    /// A nested mapping was expected but the candidate holds a scalar,
    /// array or null. Guarded explicitly rather than treated as a plain
    /// key mismatch.
    #[error("expected a mapping at `{path}`")]
    NotAMapping { path: String },
}

/// Check that every key path in `template` exists in `candidate` with the
/// same nesting shape.
///
/// Strictness is one-directional: extra candidate keys are accepted.
pub fn check_structure(template: &Value, candidate: &Value) -> Result<(), StructureError> {
    let Some(template) = template.as_object() else {
        return Err(StructureError::NotAMapping { path: "$".to_string() });
    };
    let Some(candidate) = candidate.as_object() else {
        return Err(StructureError::NotAMapping { path: "$".to_string() });
    };
    check_level(template, candidate, "$")
}

/// The boolean gate form of [`check_structure`].
pub fn validate(template: &Value, candidate: &Value) -> bool {
    check_structure(template, candidate).is_ok()
}

fn check_level(
    template: &Map<String, Value>,
    candidate: &Map<String, Value>,
    path: &str,
) -> Result<(), StructureError> {
    let required: BTreeSet<&str> = template.keys().map(String::as_str).collect();
    let present: BTreeSet<&str> = candidate.keys().map(String::as_str).collect();

    let missing: Vec<String> = required.difference(&present).map(|k| k.to_string()).collect();
    if !missing.is_empty() {
        return Err(StructureError::MissingKeys {
            path: path.to_string(),
            keys: missing,
        });
    }

    for (key, value) in template {
        if let Some(nested) = value.as_object() {
            let child_path = format!("{path}.{key}");
            match candidate.get(key).and_then(Value::as_object) {
                Some(candidate_nested) => check_level(nested, candidate_nested, &child_path)?,
                None => return Err(StructureError::NotAMapping { path: child_path }),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn connection_template() -> Value {
        json!({
            "region": "",
            "credentials": {
                "username": "",
                "secret": "",
            }
        })
    }

    #[test]
    fn complete_candidate_validates() {
        let candidate = json!({
            "region": "us",
            "credentials": { "username": "a", "secret": "b" }
        });
        assert!(validate(&connection_template(), &candidate));
    }

    #[test]
    fn missing_nested_mapping_fails() {
        let candidate = json!({ "region": "us" });
        assert!(!validate(&connection_template(), &candidate));

        let err = check_structure(&connection_template(), &candidate).unwrap_err();
        assert_eq!(
            err,
            StructureError::MissingKeys {
                path: "$".to_string(),
                keys: vec!["credentials".to_string()],
            }
        );
    }

    #[test]
    fn missing_nested_key_fails_with_path() {
        let candidate = json!({
            "region": "us",
            "credentials": { "username": "a" }
        });
        let err = check_structure(&connection_template(), &candidate).unwrap_err();
        assert_eq!(
            err,
            StructureError::MissingKeys {
                path: "$.credentials".to_string(),
                keys: vec!["secret".to_string()],
            }
        );
    }

    #[test]
    fn scalar_where_mapping_expected_is_guarded() {
        let candidate = json!({ "region": "us", "credentials": "nope" });
        let err = check_structure(&connection_template(), &candidate).unwrap_err();
        assert_eq!(err, StructureError::NotAMapping { path: "$.credentials".to_string() });
    }

    #[test]
    fn extra_candidate_keys_are_accepted() {
        let candidate = json!({
            "region": "us",
            "tenant": "acme",
            "credentials": { "username": "a", "secret": "b", "token": "t" }
        });
        assert!(validate(&connection_template(), &candidate));
    }

    #[test]
    fn leaf_values_are_never_inspected() {
        let candidate = json!({
            "region": 42,
            "credentials": { "username": null, "secret": ["x"] }
        });
        assert!(validate(&connection_template(), &candidate));
    }

    #[test]
    fn deeply_nested_templates_terminate() {
        let template = json!({ "a": { "b": { "c": { "d": { "e": "" } } } } });
        let ok = json!({ "a": { "b": { "c": { "d": { "e": 1 } } } } });
        let short = json!({ "a": { "b": { "c": { "d": {} } } } });

        assert!(validate(&template, &ok));
        let err = check_structure(&template, &short).unwrap_err();
        assert_eq!(
            err,
            StructureError::MissingKeys {
                path: "$.a.b.c.d".to_string(),
                keys: vec!["e".to_string()],
            }
        );
    }

    #[test]
    fn non_mapping_root_is_guarded() {
        assert!(!validate(&json!([1, 2]), &json!({})));
        assert!(!validate(&json!({}), &json!("scalar")));
        // An empty template accepts any mapping.
        assert!(validate(&json!({}), &json!({ "anything": 1 })));
    }
}
