//! Security Error Classifier
//!
//! Decides whether a response payload describes a security-policy condition
//! (rate limited, blocked, invalid session) rather than a plain failure.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Backend codes that mean "slow down"
const RATE_LIMIT_CODES: &[&str] = &["RATE_LIMITED", "RATE_LIMIT_EXCEEDED"];
/// Backend codes that mean "voting is blocked for this client"
const BLOCKED_CODES: &[&str] = &["BLOCKED", "VOTING_BLOCKED"];
/// Backend codes that mean "the session is no longer valid"
const SESSION_CODES: &[&str] = &["SESSION_INVALID", "INVALID_SESSION", "SESSION_EXPIRED"];

// == Security Error Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityErrorKind {
    RateLimited,
    Blocked,
    SessionInvalid,
    Unknown,
}

impl SecurityErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityErrorKind::RateLimited => "RATE_LIMITED",
            SecurityErrorKind::Blocked => "BLOCKED",
            SecurityErrorKind::SessionInvalid => "SESSION_INVALID",
            SecurityErrorKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SecurityErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Security Error ==
/// A classified security-policy condition. Only built by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{code}: {error}")]
pub struct SecurityError {
    error: String,
    code: SecurityErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_remaining: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocked_reason: Option<String>,
}

impl SecurityError {
    /// Human-readable message from the payload.
    pub fn message(&self) -> &str {
        &self.error
    }

    pub fn kind(&self) -> SecurityErrorKind {
        self.code
    }

    /// Seconds until the condition lifts, when the backend says so.
    pub fn time_remaining(&self) -> Option<u64> {
        self.time_remaining
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The backend's `blockedReason`, when the payload carried one.
    pub fn blocked_reason(&self) -> Option<&str> {
        self.blocked_reason.as_deref()
    }
}

// == Classify ==
/// Classifies a response payload and its HTTP status.
///
/// Returns `None` unless the payload is an object with an `error` (or
/// `message`) string and at least one recognized marker.
pub fn classify(payload: &Value, status: u16) -> Option<SecurityError> {
    let body = payload.as_object()?;
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        return None;
    }

    let error = string_field(body, "error").or_else(|| string_field(body, "message"))?;
    let code = string_field(body, "code");
    let has_code = |codes: &[&str]| code.is_some_and(|c| codes.contains(&c));

    let time_remaining = body.get("timeRemaining").and_then(as_seconds);
    let blocked_reason = string_field(body, "blockedReason");
    let rate_limited = status == 429 || has_code(RATE_LIMIT_CODES);
    let blocked = has_code(BLOCKED_CODES)
        || body.get("blocked").and_then(Value::as_bool) == Some(true)
        || blocked_reason.is_some();
    let session_invalid = status == 401 || has_code(SESSION_CODES);

    let kind = if rate_limited {
        SecurityErrorKind::RateLimited
    } else if blocked {
        SecurityErrorKind::Blocked
    } else if session_invalid {
        SecurityErrorKind::SessionInvalid
    } else if time_remaining.is_some() {
        SecurityErrorKind::Unknown
    } else {
        return None;
    };

    Some(SecurityError {
        error: error.to_string(),
        code: kind,
        time_remaining,
        status: (status != 0).then_some(status),
        blocked_reason: blocked_reason.map(str::to_string),
    })
}

fn string_field<'a>(body: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    body.get(name).and_then(Value::as_str)
}

/// Accepts whole or fractional seconds; fractions round up.
fn as_seconds(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| secs.ceil() as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rate_limited_with_countdown() {
        let error = classify(&json!({ "error": "Rate limited", "timeRemaining": 120 }), 429)
            .expect("should classify");

        assert_eq!(error.kind(), SecurityErrorKind::RateLimited);
        assert_eq!(error.time_remaining(), Some(120));
        assert_eq!(error.status(), Some(429));
        assert_eq!(error.message(), "Rate limited");
    }

    #[test]
    fn test_success_envelope_is_not_security() {
        assert!(classify(&json!({ "success": true, "data": {} }), 200).is_none());
    }

    #[test]
    fn test_blocked_on_403() {
        let error = classify(
            &json!({ "success": false, "error": "Voting blocked", "blockedReason": "duplicate device" }),
            403,
        )
        .unwrap();
        assert_eq!(error.kind(), SecurityErrorKind::Blocked);
        assert_eq!(error.message(), "Voting blocked");
        assert_eq!(error.blocked_reason(), Some("duplicate device"));

        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["blockedReason"], "duplicate device");
    }

    #[test]
    fn test_blocked_code() {
        let error = classify(&json!({ "message": "Nope", "code": "VOTING_BLOCKED" }), 200).unwrap();
        assert_eq!(error.kind(), SecurityErrorKind::Blocked);
        assert_eq!(error.message(), "Nope");
        assert_eq!(error.blocked_reason(), None);
    }

    #[test]
    fn test_plain_403_is_application_error() {
        assert!(classify(&json!({ "success": false, "error": "Forbidden" }), 403).is_none());
    }

    #[test]
    fn test_session_invalid_on_401() {
        let error = classify(&json!({ "error": "Session expired" }), 401).unwrap();
        assert_eq!(error.kind(), SecurityErrorKind::SessionInvalid);
    }

    #[test]
    fn test_session_code() {
        let error = classify(&json!({ "error": "Who are you", "code": "INVALID_SESSION" }), 400).unwrap();
        assert_eq!(error.kind(), SecurityErrorKind::SessionInvalid);
    }

    #[test]
    fn test_countdown_only_is_unknown() {
        let error = classify(&json!({ "error": "Slow down", "timeRemaining": 5.2 }), 400).unwrap();
        assert_eq!(error.kind(), SecurityErrorKind::Unknown);
        assert_eq!(error.time_remaining(), Some(6));
    }

    #[test]
    fn test_rate_limit_takes_precedence() {
        let error = classify(&json!({ "error": "x", "blocked": true }), 429).unwrap();
        assert_eq!(error.kind(), SecurityErrorKind::RateLimited);
    }

    #[test]
    fn test_missing_message_is_not_security() {
        assert!(classify(&json!({ "timeRemaining": 30 }), 429).is_none());
        assert!(classify(&json!({ "error": { "nested": true } }), 429).is_none());
    }

    #[test]
    fn test_non_object_payload() {
        assert!(classify(&Value::Null, 429).is_none());
        assert!(classify(&json!("Too many requests"), 429).is_none());
    }

    #[test]
    fn test_negative_countdown_ignored() {
        let error = classify(&json!({ "error": "x", "timeRemaining": -3 }), 429).unwrap();
        assert_eq!(error.time_remaining(), None);
    }

    #[test]
    fn test_serialize_shape() {
        let error = classify(&json!({ "error": "Rate limited", "timeRemaining": 60 }), 429).unwrap();
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            json!({ "error": "Rate limited", "code": "RATE_LIMITED", "timeRemaining": 60, "status": 429 })
        );
        assert_eq!(error.to_string(), "RATE_LIMITED: Rate limited");
    }
}
