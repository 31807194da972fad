//! Discord interaction payloads and callback responses
//!
//! Only the handful of fields the bridge looks at are modelled; everything
//! else in the inbound JSON is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interaction type sent by Discord to check the endpoint is alive
pub const INTERACTION_TYPE_PING: u64 = 1;

/// Callback type acknowledging a ping
pub const CALLBACK_TYPE_PONG: u8 = 1;

/// Callback type replying with a message in the invoking channel
pub const CALLBACK_TYPE_CHANNEL_MESSAGE: u8 = 4;

/// Inbound interaction body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionPayload {
    /// Raw `type` discriminant; anything other than the number 1 is an invocation
    #[serde(rename = "type", default)]
    pub kind: Option<Value>,

    /// Command data, present for application command invocations
    #[serde(default)]
    pub data: Option<Value>,
}

impl InteractionPayload {
    /// Interaction type as an integer, if it is one
    pub fn interaction_type(&self) -> Option<u64> {
        self.kind.as_ref().and_then(Value::as_u64)
    }

    /// Whether this is the platform's handshake ping
    ///
    /// Any JSON number equal to 1 counts, so `1.0` is a ping too.
    pub fn is_ping(&self) -> bool {
        match self.kind.as_ref() {
            Some(Value::Number(n)) => {
                n.as_u64() == Some(INTERACTION_TYPE_PING)
                    || n.as_f64() == Some(INTERACTION_TYPE_PING as f64)
            }
            _ => false,
        }
    }

    /// Invoked command name (`data.name`), used for logging only
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref()?.get("name")?.as_str()
    }
}

/// Message data carried by a channel-message callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseData {
    pub content: String,
}

/// Interaction callback returned synchronously to Discord
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl InteractionResponse {
    /// `{"type":1}`
    pub fn pong() -> Self {
        Self {
            kind: CALLBACK_TYPE_PONG,
            data: None,
        }
    }

    /// `{"type":4,"data":{"content":...}}`
    pub fn channel_message(content: impl Into<String>) -> Self {
        Self {
            kind: CALLBACK_TYPE_CHANNEL_MESSAGE,
            data: Some(ResponseData {
                content: content.into(),
            }),
        }
    }
}

/// Decide the callback for an interaction.
///
/// Pings are answered with a pong before anything else is considered; every
/// other interaction gets the static reply.
pub fn respond(payload: &InteractionPayload, reply_content: &str) -> InteractionResponse {
    if payload.is_ping() {
        return InteractionResponse::pong();
    }
    InteractionResponse::channel_message(reply_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> InteractionPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_ping_is_detected() {
        assert!(parse(r#"{"type":1}"#).is_ping());
        assert!(!parse(r#"{"type":2}"#).is_ping());
    }

    #[test]
    fn test_float_one_is_ping() {
        let payload = parse(r#"{"type":1.0}"#);
        assert!(payload.is_ping());
        assert_eq!(respond(&payload, "hi"), InteractionResponse::pong());
        assert!(parse(r#"{"type":1e0}"#).is_ping());
    }

    #[test]
    fn test_missing_or_non_numeric_type_is_not_ping() {
        assert!(!parse("{}").is_ping());
        assert!(!parse(r#"{"type":"1"}"#).is_ping());
        assert!(!parse(r#"{"type":null}"#).is_ping());
        assert!(!parse(r#"{"type":1.5}"#).is_ping());
    }

    #[test]
    fn test_command_name() {
        let payload = parse(r#"{"type":2,"data":{"name":"ping","options":[]}}"#);
        assert_eq!(payload.command_name(), Some("ping"));
        assert_eq!(payload.interaction_type(), Some(2));

        assert_eq!(parse(r#"{"type":2,"data":"odd"}"#).command_name(), None);
        assert_eq!(parse(r#"{"type":1}"#).command_name(), None);
    }

    #[test]
    fn test_pong_serialization() {
        let json = serde_json::to_string(&InteractionResponse::pong()).unwrap();
        assert_eq!(json, r#"{"type":1}"#);
    }

    #[test]
    fn test_channel_message_serialization() {
        let json =
            serde_json::to_string(&InteractionResponse::channel_message("Hello from ngrok!")).unwrap();
        assert_eq!(json, r#"{"type":4,"data":{"content":"Hello from ngrok!"}}"#);
    }

    #[test]
    fn test_respond() {
        assert_eq!(
            respond(&parse(r#"{"type":1}"#), "hi"),
            InteractionResponse::pong()
        );
        assert_eq!(
            respond(&parse(r#"{"type":2,"data":{"name":"ping"}}"#), "hi"),
            InteractionResponse::channel_message("hi")
        );
        assert_eq!(
            respond(&InteractionPayload::default(), "hi"),
            InteractionResponse::channel_message("hi")
        );
    }
}
