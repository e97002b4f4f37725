//! JSON-RPC 2.0 wire envelopes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;

pub const JSONRPC_VERSION: &str = "2.0";

/// Outgoing request
#[derive(Debug, Clone, Serialize)]
pub struct Request<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub params: Value,
    pub id: u64,
}

impl<'a> Request<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id,
        }
    }
}

/// Error object carried by a failed response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Unsolicited message pushed by the host
///
/// Only delivered over persistent sessions. The `params` carry the sender
/// and a method-specific `data` object.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNotification {
    pub method: String,
    pub params: Value,
}

/// Any message read from the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Response { id: u64, outcome: Result<Value, TransportError> },
    Notification(RawNotification),
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    /// `Some(Value::Null)` for an explicit `"result": null`, `None` when absent
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Classify a decoded JSON value as a response or a notification
pub fn parse_incoming(value: Value) -> Result<Incoming, TransportError> {
    let message: WireMessage = serde_json::from_value(value)
        .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

    match (message.id, message.method) {
        (None, Some(method)) | (Some(Value::Null), Some(method)) => {
            Ok(Incoming::Notification(RawNotification {
                method,
                params: message.params.unwrap_or(Value::Null),
            }))
        }
        (Some(id), _) => {
            let id = id
                .as_u64()
                .ok_or_else(|| TransportError::InvalidResponse(format!("Unexpected id {}", id)))?;
            let outcome = match (message.error, message.result) {
                (Some(error), _) => Err(TransportError::Rpc {
                    code: error.code,
                    message: error.message,
                }),
                (None, Some(result)) => Ok(result),
                (None, None) => Err(TransportError::InvalidResponse(
                    "Response has neither result nor error".to_string(),
                )),
            };
            Ok(Incoming::Response { id, outcome })
        }
        (None, None) => Err(TransportError::InvalidResponse(
            "Message has neither id nor method".to_string(),
        )),
    }
}
