use crate::domain::Operation;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// A decoded gateway frame: one opcode byte followed by an optional
/// UTF-8 JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub operation: Operation,
    pub payload: Option<Value>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FrameError {
    Empty,
    UnknownOpcode(u8),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty frame"),
            Self::UnknownOpcode(byte) => write!(f, "unknown opcode {byte:#04x}"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Encodes `[opcode][JSON payload]`. Payload serialization of a
/// `serde_json::Value` cannot fail, so the result is plain bytes.
pub fn encode(operation: Operation, payload: &Value) -> Vec<u8> {
    let body = payload.to_string();
    let mut frame = Vec::with_capacity(1 + body.len());
    frame.push(operation.as_byte());
    frame.extend_from_slice(body.as_bytes());
    frame
}

/// Decodes an inbound frame. A body that fails to parse as JSON is
/// treated as absent, since acknowledgement frames legitimately carry
/// no payload at all.
pub fn decode(bytes: &[u8]) -> Result<Frame, FrameError> {
    let (&opcode, body) = bytes.split_first().ok_or(FrameError::Empty)?;
    let operation = Operation::from_byte(opcode).ok_or(FrameError::UnknownOpcode(opcode))?;

    let payload = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice(body) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!("discarding unparsable body for {operation:?}: {err}");
                None
            }
        }
    };

    Ok(Frame { operation, payload })
}
