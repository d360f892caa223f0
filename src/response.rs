//! Structured view over a raw API response body.
//!
//! Zoho answers everything as JSON, but the shape varies: happy-path bodies
//! carry a `data` array, errors carry top-level `code`/`message`/`status`
//! fields, and some endpoints return nothing at all. The envelope never fails
//! on a missing key; classification is by predicate.

use serde_json::Value;

pub const CODE_SUCCESS: &str = "SUCCESS";
pub const CODE_INVALID_TOKEN: &str = "INVALID_TOKEN";
pub const CODE_AUTHENTICATION_FAILURE: &str = "AUTHENTICATION_FAILURE";
pub const CODE_RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";

#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    body: Value,
}

impl ResponseEnvelope {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// The `data` payload, or an empty list when absent. Entries are raw
    /// remote field maps.
    pub fn data(&self) -> Vec<Value> {
        match self.body.get("data") {
            Some(Value::Array(entries)) => entries.clone(),
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_null() || self.data().is_empty()
    }

    pub fn code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }

    pub fn message(&self) -> String {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// The access token attached to the request has expired.
    pub fn invalid_token(&self) -> bool {
        self.code() == Some(CODE_INVALID_TOKEN)
    }

    /// Authentication was rejected for a reason other than token expiry.
    pub fn authentication_failure(&self) -> bool {
        self.code() == Some(CODE_AUTHENTICATION_FAILURE)
    }

    pub fn not_found(&self) -> bool {
        self.code() == Some(CODE_RESOURCE_NOT_FOUND)
    }

    /// Structured error carried by the body, if any, as `(code, message)`.
    /// `SUCCESS` is not an error even though it arrives as a code.
    pub fn error(&self) -> Option<(String, String)> {
        match self.code() {
            Some(CODE_SUCCESS) | None => None,
            Some(code) => Some((code.to_string(), self.message())),
        }
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_inner(self) -> Value {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_data_key_yields_empty_list() {
        let envelope = ResponseEnvelope::new(json!({}));
        assert!(envelope.data().is_empty());
        assert!(envelope.is_empty());

        let envelope = ResponseEnvelope::new(Value::Null);
        assert!(envelope.data().is_empty());
    }

    #[test]
    fn classifies_token_expiry() {
        let envelope = ResponseEnvelope::new(json!({
            "code": "INVALID_TOKEN",
            "details": {},
            "message": "invalid oauth token",
            "status": "error"
        }));
        assert!(envelope.invalid_token());
        assert!(!envelope.authentication_failure());
        assert_eq!(
            envelope.error(),
            Some(("INVALID_TOKEN".to_string(), "invalid oauth token".to_string()))
        );
    }

    #[test]
    fn classifies_authentication_failure() {
        let envelope = ResponseEnvelope::new(json!({
            "code": "AUTHENTICATION_FAILURE",
            "message": "Authentication failed",
            "status": "error"
        }));
        assert!(envelope.authentication_failure());
        assert!(!envelope.invalid_token());
    }

    #[test]
    fn classifies_not_found() {
        let envelope = ResponseEnvelope::new(json!({
            "code": "RESOURCE_NOT_FOUND",
            "status": "error"
        }));
        assert!(envelope.not_found());
    }

    #[test]
    fn success_code_is_not_an_error() {
        let envelope = ResponseEnvelope::new(json!({ "code": "SUCCESS" }));
        assert_eq!(envelope.error(), None);
    }

    #[test]
    fn data_preserves_falsy_values() {
        let envelope = ResponseEnvelope::new(json!({
            "data": [{ "My_String": "", "My_Bool": false }]
        }));
        let data = envelope.data();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["My_String"], json!(""));
        assert_eq!(data[0]["My_Bool"], json!(false));
    }
}
