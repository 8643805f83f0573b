//! Bridge error type
//!
//! Typed errors for the IPC surface. Serialized as their display form so
//! the frontend receives a plain message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// A shared-state mutex was poisoned by a panicking writer.
    #[error("shared state lock poisoned")]
    LockPoisoned,

    /// No frame has been published yet (scene still warming up).
    #[error("no frame yet")]
    FrameNotReady,

    /// Resize request with a zero dimension.
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

impl serde::Serialize for BridgeError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_message() {
        let err = BridgeError::InvalidSize {
            width: 0,
            height: 600,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"invalid surface size 0x600\"");
    }
}
