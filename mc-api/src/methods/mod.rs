//! Method catalog
//!
//! Only the methods the state reconciler and library sync need are modeled.

pub mod application;
pub mod audio_library;
pub mod jsonrpc;
pub mod player;
pub mod playlist;
pub mod video_library;

use serde::{Deserialize, Deserializer};

/// Accept `null` where the host documents a string
pub(crate) fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
