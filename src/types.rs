//! Wire types exchanged with the remote API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-owned conversation state.
///
/// Sent as the JSON body of every converse turn and handed mutably to
/// handlers; the crate never replaces it, only passes it through.
pub type Context = Map<String, Value>;

/// One turn of the converse dialog.
///
/// A body without a `type` field fails deserialization, so a malformed
/// response surfaces as an error instead of looping forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverseResponse {
    /// Response discriminator: `"message"`, `"action"`, `"stop"`, `"error"`,
    /// or any other value the service chooses to send.
    #[serde(rename = "type")]
    pub kind: String,
    /// Action name, present when `kind == "action"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Bot message text, present when `kind == "message"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub entities: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Fields not modeled above, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of the stateless `/message` parse endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<String>,
    /// Echo of the parsed input (wire name `_text`).
    #[serde(rename = "_text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub entities: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converse_response_requires_type() {
        let err = serde_json::from_value::<ConverseResponse>(json!({"msg": "hi"}));

        assert!(err.is_err());
    }

    #[test]
    fn converse_response_keeps_unknown_fields() {
        let response: ConverseResponse = serde_json::from_value(json!({
            "type": "merge",
            "quickreplies": ["yes", "no"]
        }))
        .unwrap();

        assert_eq!(response.kind, "merge");
        assert_eq!(response.extra["quickreplies"], json!(["yes", "no"]));
    }

    #[test]
    fn message_response_maps_wire_names() {
        let response: MessageResponse = serde_json::from_value(json!({
            "msg_id": "abc123",
            "_text": "turn on the lights",
            "entities": {"on_off": [{"value": "on"}]}
        }))
        .unwrap();

        assert_eq!(response.msg_id.as_deref(), Some("abc123"));
        assert_eq!(response.text.as_deref(), Some("turn on the lights"));
        assert_eq!(response.entities["on_off"][0]["value"], json!("on"));
    }
}
