//! Signaling wire protocol
//!
//! Every WebSocket text frame is a JSON object with a `type` field.
//! `frame` messages carry a webcam frame for analysis; every other type
//! is an opaque signaling message relayed to peers.

use poise_core::{PoiseError, PoiseResult, UserId};
use poise_vision::FrameAnalysis;
use serde::Serialize;
use serde_json::{Map, Value};

/// Message type carrying a webcam frame
pub const FRAME_TYPE: &str = "frame";

/// Parsed inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Base64 frame, optionally data-URI prefixed
    Frame { data: String },
    /// Signaling message for `target`, or for everyone when `None`
    Signal {
        kind: String,
        target: Option<UserId>,
        payload: Map<String, Value>,
    },
}

impl Inbound {
    pub fn parse(text: &str) -> PoiseResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PoiseError::InvalidMessage(format!("malformed JSON: {e}")))?;
        let Value::Object(payload) = value else {
            return Err(PoiseError::InvalidMessage("expected a JSON object".into()));
        };

        let kind = match payload.get("type") {
            Some(Value::String(kind)) if !kind.is_empty() => kind.clone(),
            _ => return Err(PoiseError::InvalidMessage("missing \"type\" field".into())),
        };

        if kind == FRAME_TYPE {
            return match payload.get("data") {
                Some(Value::String(data)) => Ok(Inbound::Frame { data: data.clone() }),
                _ => Err(PoiseError::InvalidMessage(
                    "frame message without \"data\"".into(),
                )),
            };
        }

        let target = match payload.get("target") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(UserId::parse(raw)?),
            Some(_) => {
                return Err(PoiseError::InvalidMessage(
                    "\"target\" must be a string".into(),
                ))
            }
        };

        Ok(Inbound::Signal {
            kind,
            target,
            payload,
        })
    }
}

/// Stamp the sender onto a signaling payload and serialize it
pub fn relay_text(mut payload: Map<String, Value>, from: &UserId) -> String {
    payload.insert("from".to_owned(), Value::String(from.to_string()));
    Value::Object(payload).to_string()
}

/// Server-originated messages
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    Analysis { feedback: FrameAnalysis },
    Error { message: String },
}

impl Outbound {
    pub fn error(message: impl Into<String>) -> Self {
        Outbound::Error {
            message: message.into(),
        }
    }

    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({ "type": "error", "message": e.to_string() }).to_string()
        })
    }
}
