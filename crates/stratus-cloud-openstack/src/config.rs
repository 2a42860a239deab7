//! Connection parameter parsing and validation
//!
//! Parameters are shape-checked against a key-only template before any
//! provider connection is attempted; a driver is never partially
//! constructed over bad configuration.

use serde_json::{json, Value};
use stratus_cloud::{check_structure, CloudError, Result};

/// Parsed connection parameters for the OpenStack backend
///
/// Validated once at construction and immutable afterwards.
#[derive(Debug, Clone)]
pub struct OpenStackConfig {
    pub region: String,
    pub identity_api_endpoint: String,
    pub username: String,
    pub password: String,
}

impl OpenStackConfig {
    /// Required parameter shape. Template values are placeholders; only
    /// the key structure matters.
    fn template() -> Value {
        json!({
            "region": "",
            "identityApiEndpoint": "",
            "credentials": {
                "username": "",
                "secret": "",
            }
        })
    }

    /// Validate and parse raw connection parameters.
    pub fn from_value(params: &Value) -> Result<Self> {
        if let Err(violation) = check_structure(&Self::template(), params) {
            return Err(CloudError::InvalidConfig(format!(
                "one or more required provider connection parameters is missing or invalid ({violation})"
            )));
        }

        Ok(Self {
            region: string_param(params, &["region"])?,
            identity_api_endpoint: string_param(params, &["identityApiEndpoint"])?,
            username: string_param(params, &["credentials", "username"])?,
            password: string_param(params, &["credentials", "secret"])?,
        })
    }
}

fn string_param(params: &Value, path: &[&str]) -> Result<String> {
    let mut value = params;
    for key in path {
        value = &value[*key];
    }
    value.as_str().map(str::to_owned).ok_or_else(|| {
        CloudError::InvalidConfig(format!(
            "connection parameter `{}` must be a string",
            path.join(".")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> Value {
        json!({
            "region": "DFW",
            "identityApiEndpoint": "https://identity.example.com/v2.0/",
            "credentials": {
                "username": "ops",
                "secret": "hunter2",
            }
        })
    }

    #[test]
    fn parses_valid_parameters() {
        let config = OpenStackConfig::from_value(&valid_params()).unwrap();
        assert_eq!(config.region, "DFW");
        assert_eq!(config.identity_api_endpoint, "https://identity.example.com/v2.0/");
        assert_eq!(config.username, "ops");
        assert_eq!(config.password, "hunter2");
    }

    #[test]
    fn missing_credential_key_is_invalid_config() {
        let params = json!({
            "region": "DFW",
            "identityApiEndpoint": "https://identity.example.com/v2.0/",
            "credentials": { "username": "ops" }
        });

        let err = OpenStackConfig::from_value(&params).unwrap_err();
        match err {
            CloudError::InvalidConfig(msg) => {
                assert!(msg.contains("connection parameters"), "{msg}");
                assert!(msg.contains("secret"), "{msg}");
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn scalar_credentials_is_invalid_config() {
        let params = json!({
            "region": "DFW",
            "identityApiEndpoint": "https://identity.example.com/v2.0/",
            "credentials": "ops:hunter2"
        });
        assert!(matches!(
            OpenStackConfig::from_value(&params),
            Err(CloudError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_string_leaf_is_invalid_config() {
        let mut params = valid_params();
        params["region"] = json!(7);
        let err = OpenStackConfig::from_value(&params).unwrap_err();
        match err {
            CloudError::InvalidConfig(msg) => assert!(msg.contains("region"), "{msg}"),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }
}
