//! Request and response shapes for an httpbin-style echo service.
//!
//! Response types are declared with camelCase field names and rely on the
//! executor's snake_case conversion to match what the service sends.

use serde::{Deserialize, Serialize};

/// Parameters sent to the echo service.
///
/// Serialized with camelCase keys, so the wire carries `paramA` / `paramB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequest {
    pub param_a: String,
    pub param_b: String,
}

impl SampleRequest {
    pub fn new(param_a: impl Into<String>, param_b: impl Into<String>) -> Self {
        Self {
            param_a: param_a.into(),
            param_b: param_b.into(),
        }
    }
}

impl Default for SampleRequest {
    fn default() -> Self {
        Self::new("valueA", "valueB")
    }
}

/// The echo envelope returned by both `/get` and `/post`.
///
/// `/get` fills `args` from the query string, `/post` fills `json` from the
/// request body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    #[serde(default)]
    pub args: EchoArgs,
    pub json: Option<EchoJson>,
    pub url: Option<String>,
    pub origin: Option<String>,
}

/// Query parameters echoed back; query values are never required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoArgs {
    pub param_a: Option<String>,
    pub param_b: Option<String>,
}

/// JSON body echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoJson {
    pub param_a: String,
    pub param_b: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::KeyDecodingStrategy;

    fn decode(value: serde_json::Value) -> Result<EchoResponse, serde_json::Error> {
        serde_json::from_value(KeyDecodingStrategy::ConvertFromSnakeCase.apply(value))
    }

    #[test]
    fn sample_request_uses_camel_case_keys() {
        let value = serde_json::to_value(SampleRequest::default()).unwrap();
        assert_eq!(value, json!({ "paramA": "valueA", "paramB": "valueB" }));
    }

    #[test]
    fn get_echo_fills_args_only() {
        let echo = decode(json!({
            "args": { "param_a": "valueA", "param_b": "valueB" },
            "url": "https://httpbin.org/get?paramA=valueA&paramB=valueB"
        }))
        .unwrap();

        assert_eq!(echo.args.param_a.as_deref(), Some("valueA"));
        assert_eq!(echo.args.param_b.as_deref(), Some("valueB"));
        assert!(echo.json.is_none());
        assert!(echo.origin.is_none());
    }

    #[test]
    fn post_echo_without_args_defaults_them() {
        let echo = decode(json!({ "json": { "param_a": "valueA", "param_b": "valueB" } })).unwrap();

        assert_eq!(echo.args, EchoArgs::default());
        assert_eq!(
            echo.json,
            Some(EchoJson {
                param_a: "valueA".into(),
                param_b: "valueB".into()
            })
        );
    }

    #[test]
    fn echo_json_requires_both_fields() {
        let result = decode(json!({ "json": { "param_a": "valueA" } }));
        assert!(result.is_err());
    }

    #[test]
    fn partial_args_are_allowed() {
        let echo = decode(json!({ "args": { "param_a": "valueA" } })).unwrap();
        assert_eq!(echo.args.param_a.as_deref(), Some("valueA"));
        assert!(echo.args.param_b.is_none());
    }
}
