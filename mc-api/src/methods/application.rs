use serde::Deserialize;

use crate::types::PropertyParams;

/// Volume and mute state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ApplicationProperties {
    #[serde(default)]
    pub volume: u8,
    #[serde(default)]
    pub muted: bool,
}

impl ApplicationProperties {
    pub const PROPERTIES: &'static [&'static str] = &["volume", "muted"];

    pub fn params() -> PropertyParams {
        PropertyParams {
            properties: Self::PROPERTIES,
        }
    }
}

crate::rpc_method! {
    GetProperties: Application, "Application.GetProperties", PropertyParams => ApplicationProperties
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::RpcMethod;
    use serde_json::json;

    #[test]
    fn test_parse_volume() {
        let props = GetProperties::parse_result(json!({"volume": 73, "muted": true})).unwrap();
        assert_eq!(props.volume, 73);
        assert!(props.muted);
    }
}
