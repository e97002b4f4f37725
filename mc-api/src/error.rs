use rpc_client::TransportError;
use thiserror::Error;

/// High-level API errors for remote calls
///
/// Wraps transport failures and adds decoding failures for typed results.
/// Every error can be reduced to an [`ErrorInfo`] (numeric code plus a
/// human-readable description) for publishing to observers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The call itself failed: unreachable host, timeout, HTTP or method error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The host answered but the result did not match the expected shape
    #[error("Failed to decode result of {method}: {message}")]
    Decode {
        method: &'static str,
        message: String,
    },

    /// Parameters could not be encoded
    #[error("Failed to encode parameters for {method}: {message}")]
    Encode {
        method: &'static str,
        message: String,
    },
}

impl ApiError {
    /// Numeric code for this error
    ///
    /// Transport failures keep the transport code; decoding failures share the
    /// "invalid response" code since from the caller's view the host sent garbage.
    pub fn code(&self) -> i32 {
        match self {
            ApiError::Transport(e) => e.code(),
            ApiError::Decode { .. } => TransportError::InvalidResponse(String::new()).code(),
            ApiError::Encode { .. } => TransportError::Send(String::new()).code(),
        }
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Code of the host's JSON-RPC error object, for method-level failures
    pub fn server_code(&self) -> Option<i64> {
        match self {
            ApiError::Transport(TransportError::Rpc { code, .. }) => Some(*code),
            _ => None,
        }
    }

    /// Whether the host could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_unreachable())
    }

    /// Code and description pair
    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            description: self.description(),
            server_code: self.server_code(),
        }
    }
}

/// Coarse classification of error codes
///
/// Lets observers branch on "why" without matching transport internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unreachable,
    Io,
    Http,
    Method,
    InvalidResponse,
    Timeout,
    Closed,
    Unknown,
}

impl ErrorCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ErrorCode::Unreachable,
            1 | 2 => ErrorCode::Io,
            3 => ErrorCode::Http,
            5 => ErrorCode::Method,
            6 => ErrorCode::InvalidResponse,
            7 => ErrorCode::Timeout,
            8 => ErrorCode::Closed,
            _ => ErrorCode::Unknown,
        }
    }
}

/// Published form of an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: i32,
    pub description: String,
    /// The host's own error code when it answered with an error object
    pub server_code: Option<i64>,
}

impl ErrorInfo {
    pub fn new(code: i32, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            server_code: None,
        }
    }

    pub fn with_server_code(mut self, server_code: Option<i64>) -> Self {
        self.server_code = server_code;
        self
    }
}

impl ErrorInfo {
    pub fn kind(&self) -> ErrorCode {
        ErrorCode::from_code(self.code)
    }

    /// Same failure for change suppression: equal code and equal server code
    pub fn same_error(&self, other: &ErrorInfo) -> bool {
        self.code == other.code && self.server_code == other.server_code
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)
    }
}

impl From<&ApiError> for ErrorInfo {
    fn from(error: &ApiError) -> Self {
        error.info()
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_conversion_keeps_code() {
        let api_error: ApiError = TransportError::Timeout.into();
        assert_eq!(api_error.code(), TransportError::Timeout.code());
        assert!(api_error.is_unreachable());
    }

    #[test]
    fn test_unreachable_and_method_error_are_distinguishable() {
        let unreachable: ApiError = TransportError::Connect("refused".to_string()).into();
        let method: ApiError = TransportError::Rpc {
            code: -32602,
            message: "Invalid params.".to_string(),
        }
        .into();

        assert_ne!(unreachable.code(), method.code());
        assert!(method.description().contains("Invalid params."));
        assert!(!method.is_unreachable());
    }

    #[test]
    fn test_decode_error_info() {
        let error = ApiError::Decode {
            method: "Player.GetItem",
            message: "missing field `item`".to_string(),
        };
        let info = error.info();
        assert_eq!(info.code, 6);
        assert!(info.description.contains("Player.GetItem"));
        assert_eq!(info.to_string(), format!("[6] {}", info.description));
        assert_eq!(info.kind(), ErrorCode::InvalidResponse);
    }

    #[test]
    fn test_method_errors_keep_server_code() {
        let not_found: ApiError = TransportError::Rpc {
            code: -32601,
            message: "Method not found.".to_string(),
        }
        .into();
        let invalid: ApiError = TransportError::Rpc {
            code: -32602,
            message: "Invalid params.".to_string(),
        }
        .into();

        assert_eq!(not_found.info().server_code, Some(-32601));
        assert_eq!(not_found.code(), invalid.code());
        assert!(!not_found.info().same_error(&invalid.info()));
        assert!(not_found.info().same_error(&not_found.info()));
        assert_eq!(ApiError::from(TransportError::Timeout).info().server_code, None);
    }

    #[test]
    fn test_error_code_classification() {
        assert_eq!(ErrorCode::from_code(0), ErrorCode::Unreachable);
        assert_eq!(ErrorCode::from_code(5), ErrorCode::Method);
        assert_eq!(ErrorCode::from_code(7), ErrorCode::Timeout);
        assert_eq!(ErrorCode::from_code(42), ErrorCode::Unknown);
    }
}
