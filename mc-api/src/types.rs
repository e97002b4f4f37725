//! Shared JSON-RPC value types

use serde::{Deserialize, Serialize};

/// Requested window of a list, `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListLimits {
    pub start: u32,
    pub end: u32,
}

impl ListLimits {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Window of `size` items starting at `offset`
    pub fn page(offset: u32, size: u32) -> Self {
        Self {
            start: offset,
            end: offset.saturating_add(size),
        }
    }
}

/// Window actually returned by the host, plus the total list length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ListLimitsReturned {
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub end: u32,
    #[serde(default)]
    pub total: u32,
}

impl ListLimitsReturned {
    /// Whether the host holds items past the returned window
    pub fn more_available(&self) -> bool {
        i64::from(self.total) - i64::from(self.end) > 0
    }
}

/// Time value as reported by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct GlobalTime {
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
    #[serde(default)]
    pub milliseconds: u32,
}

impl GlobalTime {
    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0 && self.milliseconds == 0
    }

    pub fn total_millis(&self) -> u64 {
        (u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)) * 1000
            + u64::from(self.milliseconds)
    }
}

/// Parameters for methods that take none
///
/// Serializes to `null`, which the transports omit from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NoParams;

/// Parameters carrying only a property selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertyParams {
    pub properties: &'static [&'static str],
}

/// Parameters carrying a property selection and a list window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagedParams {
    pub properties: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<ListLimits>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_more_available() {
        let page = ListLimitsReturned { start: 0, end: 300, total: 725 };
        assert!(page.more_available());

        let last = ListLimitsReturned { start: 600, end: 725, total: 725 };
        assert!(!last.more_available());

        let empty = ListLimitsReturned::default();
        assert!(!empty.more_available());
    }

    #[test]
    fn test_no_params_serializes_to_null() {
        assert_eq!(serde_json::to_value(NoParams).unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_paged_params_shape() {
        let params = PagedParams {
            properties: &["title", "year"],
            limits: Some(ListLimits::page(300, 300)),
        };
        assert_eq!(
            serde_json::to_value(params).unwrap(),
            json!({"properties": ["title", "year"], "limits": {"start": 300, "end": 600}})
        );
    }

    #[test]
    fn test_global_time() {
        let time: GlobalTime = serde_json::from_value(json!({"hours": 0, "minutes": 0, "seconds": 0, "milliseconds": 0})).unwrap();
        assert!(time.is_zero());

        let time: GlobalTime = serde_json::from_value(json!({"minutes": 2, "seconds": 5})).unwrap();
        assert!(!time.is_zero());
        assert_eq!(time.total_millis(), 125_000);
    }

    proptest! {
        #[test]
        fn prop_more_available_matches_remaining(end in 0u32..10_000, total in 0u32..10_000) {
            let limits = ListLimitsReturned { start: 0, end, total };
            prop_assert_eq!(limits.more_available(), total > end);
        }
    }
}
