//! Error types for the JSON-RPC transports

use thiserror::Error;

/// Errors that can occur while executing a remote call
///
/// Every variant maps to a stable numeric [`TransportError::code`] so that callers
/// can tell "host unreachable" apart from "host answered with an error".
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// Could not open a connection to the host
    #[error("Unable to connect to host: {0}")]
    Connect(String),

    /// The request could not be written
    #[error("Failed to send request: {0}")]
    Send(String),

    /// The response could not be read
    #[error("Failed to read response: {0}")]
    Read(String),

    /// The host answered with a non-success HTTP status
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// The host answered with a JSON-RPC error object
    #[error("Method error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The host answered with something that is not valid JSON-RPC
    #[error("Invalid response from host: {0}")]
    InvalidResponse(String),

    /// No response arrived within the configured timeout
    #[error("Timed out waiting for response")]
    Timeout,

    /// The persistent session was closed while the call was pending
    #[error("Connection closed")]
    Closed,
}

impl TransportError {
    /// Stable numeric code for this error
    pub fn code(&self) -> i32 {
        match self {
            TransportError::Connect(_) => 0,
            TransportError::Send(_) => 1,
            TransportError::Read(_) => 2,
            TransportError::HttpStatus(_) => 3,
            TransportError::Rpc { .. } => 5,
            TransportError::InvalidResponse(_) => 6,
            TransportError::Timeout => 7,
            TransportError::Closed => 8,
        }
    }

    /// Whether this error means the host could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            TransportError::Connect(_) | TransportError::Timeout | TransportError::Closed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            TransportError::Connect("refused".to_string()),
            TransportError::Send("broken pipe".to_string()),
            TransportError::Read("eof".to_string()),
            TransportError::HttpStatus(401),
            TransportError::Rpc { code: -32601, message: "Method not found".to_string() },
            TransportError::InvalidResponse("not json".to_string()),
            TransportError::Timeout,
            TransportError::Closed,
        ];

        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display() {
        let error = TransportError::Rpc { code: -32602, message: "Invalid params".to_string() };
        assert_eq!(error.to_string(), "Method error -32602: Invalid params");

        let error = TransportError::HttpStatus(401);
        assert_eq!(error.to_string(), "HTTP error: status 401");
    }

    #[rstest]
    #[case(TransportError::Connect("refused".to_string()), 0, true)]
    #[case(TransportError::Send("broken pipe".to_string()), 1, false)]
    #[case(TransportError::Read("eof".to_string()), 2, false)]
    #[case(TransportError::HttpStatus(401), 3, false)]
    #[case(TransportError::Rpc { code: 1, message: String::new() }, 5, false)]
    #[case(TransportError::InvalidResponse("not json".to_string()), 6, false)]
    #[case(TransportError::Timeout, 7, true)]
    #[case(TransportError::Closed, 8, true)]
    fn test_code_and_reachability(#[case] error: TransportError, #[case] code: i32, #[case] unreachable: bool) {
        assert_eq!(error.code(), code);
        assert_eq!(error.is_unreachable(), unreachable);
    }
}
