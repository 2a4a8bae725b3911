use std::error::Error;
use std::fmt;

use crate::matrix::ShapeMismatch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    MalformedPayload { reason: String },
    Encode { reason: String },
}

impl WireError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        WireError::MalformedPayload {
            reason: reason.into(),
        }
    }

    pub fn encode(reason: impl Into<String>) -> Self {
        WireError::Encode {
            reason: reason.into(),
        }
    }

    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, WireError::MalformedPayload { .. })
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::MalformedPayload { reason } => write!(f, "malformed payload: {reason}"),
            WireError::Encode { reason } => write!(f, "encode payload failed: {reason}"),
        }
    }
}

impl Error for WireError {}

impl From<ShapeMismatch> for WireError {
    fn from(error: ShapeMismatch) -> Self {
        WireError::MalformedPayload {
            reason: error.to_string(),
        }
    }
}
