use crate::types::NoParams;

crate::rpc_method! {
    /// Liveness check, answers `"pong"`
    Ping: JsonRpc, "JSONRPC.Ping", NoParams => String
}
