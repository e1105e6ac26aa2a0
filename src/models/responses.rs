//! Response models for the voting backend
//!
//! The backend answers with `{ success: true, data }` or
//! `{ success: false, error|message, ...markers }`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, VoteClientError};

/// Typed view of the response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// == Api Response ==
/// Raw status and JSON body of one backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed body, `Value::Null` when the body was not JSON
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Parses the envelope; non-object bodies give an empty envelope.
    pub fn envelope(&self) -> Envelope {
        Envelope::deserialize(&self.body).unwrap_or_default()
    }

    /// 2xx status, a JSON object body and no explicit `success: false`.
    ///
    /// Non-JSON and non-object bodies (an HTML page from a proxy, a bare
    /// string) are never a success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
            && self.body.is_object()
            && self.envelope().success != Some(false)
    }

    /// `error`, then `message`, then a generic status line.
    pub fn error_message(&self) -> String {
        let envelope = self.envelope();
        envelope
            .error
            .or(envelope.message)
            .unwrap_or_else(|| format!("HTTP {}", self.status))
    }

    /// The envelope's `data`, or the whole body when there is none.
    pub fn data(&self) -> Value {
        self.envelope().data.unwrap_or_else(|| self.body.clone())
    }

    /// Turns a failure envelope into [`VoteClientError::Application`].
    pub fn into_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(VoteClientError::Application {
                status: self.status,
                message: self.error_message(),
                body: self.body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let resp = ApiResponse::new(200, json!({ "success": true, "data": { "votes": 12 } }));
        assert!(resp.is_success());
        assert_eq!(resp.data(), json!({ "votes": 12 }));
    }

    #[test]
    fn test_body_without_data() {
        let resp = ApiResponse::new(200, json!({ "status": "ok" }));
        assert!(resp.is_success());
        assert_eq!(resp.data(), json!({ "status": "ok" }));
    }

    #[test]
    fn test_non_json_body_on_2xx() {
        let resp = ApiResponse::new(200, Value::Null);
        assert!(!resp.is_success());
        assert_eq!(resp.error_message(), "HTTP 200");
    }

    #[test]
    fn test_non_object_body_on_2xx() {
        for body in [json!("<html>portal</html>"), json!([1, 2]), json!(true), json!(3)] {
            let resp = ApiResponse::new(200, body.clone());
            assert!(!resp.is_success(), "{} should not be a success", body);
        }
    }

    #[test]
    fn test_failure_envelope_on_2xx() {
        let resp = ApiResponse::new(200, json!({ "success": false, "message": "Closed" }));
        assert!(!resp.is_success());
        assert_eq!(resp.error_message(), "Closed");
    }

    #[test]
    fn test_error_status() {
        let resp = ApiResponse::new(500, Value::Null);
        assert!(!resp.is_success());
        assert_eq!(resp.error_message(), "HTTP 500");
    }

    #[test]
    fn test_error_preferred_over_message() {
        let resp = ApiResponse::new(400, json!({ "error": "Bad", "message": "Other" }));
        assert_eq!(resp.error_message(), "Bad");
    }

    #[test]
    fn test_into_success() {
        let ok = ApiResponse::new(201, json!({ "success": true }));
        assert!(ok.into_success().is_ok());

        let portal = ApiResponse::new(200, Value::Null);
        assert!(matches!(
            portal.into_success(),
            Err(VoteClientError::Application { status: 200, .. })
        ));

        let failed = ApiResponse::new(400, json!({ "success": false, "error": "Bad choice" }));
        match failed.into_success() {
            Err(VoteClientError::Application { status, message, .. }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad choice");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
