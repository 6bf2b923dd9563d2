//! Interfaces to the services intro selection depends on
//!
//! Library storage, watch history, licensing, remote channels, rating tables,
//! configuration and the filesystem all live outside this crate. Each is
//! reached through one narrow trait so the selection logic can be exercised
//! against in-memory or mocked implementations.

use std::io;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use crate::{
    error::AppResult,
    models::{MediaItem, SelectionPolicy, UserContext},
};

/// Flattened view of the library visible to a user
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LibraryService: Send + Sync {
    /// Every item the user can see, recursively
    async fn recursive_items(&self, user: &UserContext) -> Vec<MediaItem>;
}

/// Per-user playback history
#[cfg_attr(test, mockall::automock)]
pub trait WatchHistory: Send + Sync {
    fn is_played(&self, item: &MediaItem, user: &UserContext) -> bool;
}

/// Licensing check gating remote trailer sourcing
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EntitlementService: Send + Sync {
    async fn is_entitled(&self, user: &UserContext) -> bool;
}

/// Remote content provider listing trailer media
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChannelService: Send + Sync {
    /// All trailer items visible to the user
    ///
    /// Implementations must return `AppError::Cancelled` promptly once the
    /// token is cancelled.
    async fn query_remote_trailers(
        &self,
        user: &UserContext,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<MediaItem>>;
}

/// Maps a textual content rating to a comparable ordinal
#[cfg_attr(test, mockall::automock)]
pub trait RatingService: Send + Sync {
    /// Lower is more permissive; `None` for ratings outside the known vocabulary
    fn rating_ordinal(&self, rating: &str) -> Option<i32>;
}

/// Source of the current configuration snapshot
#[cfg_attr(test, mockall::automock)]
pub trait PolicySource: Send + Sync {
    fn load_policy(&self) -> SelectionPolicy;
}

/// Recursive file listing under a directory
#[cfg_attr(test, mockall::automock)]
pub trait FileEnumerator: Send + Sync {
    fn enumerate(&self, root: &Path) -> io::Result<Vec<PathBuf>>;
}

/// PolicySource serving a fixed snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticPolicy(pub SelectionPolicy);

impl PolicySource for StaticPolicy {
    fn load_policy(&self) -> SelectionPolicy {
        self.0.clone()
    }
}
