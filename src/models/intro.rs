use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Where a scored candidate came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntroSource {
    /// A library movie that carries attached trailers
    ItemWithTrailer,
    /// A trailer listed by a remote content provider
    ChannelTrailer,
    /// A library item that is itself a trailer
    LibraryTrailer,
}

/// One intro to play before the target item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntroResult {
    /// Play the library or channel item with this id
    Item { item_id: Uuid },
    /// Play a custom intro clip from disk
    Path { path: PathBuf },
}

impl IntroResult {
    pub fn is_custom(&self) -> bool {
        matches!(self, IntroResult::Path { .. })
    }
}
