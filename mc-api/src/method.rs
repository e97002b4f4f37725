//! Typed method framework
//!
//! Each remote method is a zero-sized type implementing [`RpcMethod`]. The
//! associated types fix the parameter and result shapes at compile time, so
//! [`RemoteClient::execute`](crate::RemoteClient::execute) can only be called
//! with matching arguments.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::namespace::Namespace;

/// A typed remote method
pub trait RpcMethod {
    /// Parameter object, serialized as the request `params`
    type Params: Serialize;

    /// Decoded `result` of a successful response
    type Result: DeserializeOwned;

    /// Namespace this method belongs to
    const NAMESPACE: Namespace;

    /// Full wire name, e.g. `Player.GetItem`
    const METHOD: &'static str;

    /// Decode the raw result value
    ///
    /// The default uses the `Deserialize` impl of [`RpcMethod::Result`].
    fn parse_result(value: Value) -> Result<Self::Result, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::Decode {
            method: Self::METHOD,
            message: e.to_string(),
        })
    }
}

/// Declare a method type with its parameter and result types
///
/// # Example
/// ```rust,ignore
/// rpc_method! {
///     /// Liveness check
///     Ping: JsonRpc, "JSONRPC.Ping", NoParams => String
/// }
/// ```
#[macro_export]
macro_rules! rpc_method {
    ($(#[$meta:meta])* $name:ident: $ns:ident, $method:literal, $params:ty => $result:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl $crate::method::RpcMethod for $name {
            type Params = $params;
            type Result = $result;

            const NAMESPACE: $crate::namespace::Namespace = $crate::namespace::Namespace::$ns;
            const METHOD: &'static str = $method;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoParams;
    use serde_json::json;

    rpc_method! {
        Echo: JsonRpc, "JSONRPC.Echo", NoParams => Vec<u32>
    }

    #[test]
    fn test_default_parse_result() {
        assert_eq!(Echo::parse_result(json!([1, 2])).unwrap(), vec![1, 2]);
        assert_eq!(Echo::NAMESPACE, Namespace::JsonRpc);
    }

    #[test]
    fn test_parse_result_reports_method() {
        match Echo::parse_result(json!("nope")) {
            Err(ApiError::Decode { method, .. }) => assert_eq!(method, "JSONRPC.Echo"),
            other => panic!("Expected decode error, got {:?}", other),
        }
    }
}
