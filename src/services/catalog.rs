//! JSON-snapshot-backed implementation of the library-side services
//!
//! Serves the library listing, watch history, entitlements, channel trailers
//! and rating table from one file loaded at startup. Suitable for a
//! standalone deployment and for tests; larger installations plug their own
//! implementations into the same traits.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{MediaItem, UserContext},
    services::{ChannelService, EntitlementService, LibraryService, RatingService, WatchHistory},
};

/// Built-in US rating table, used when the snapshot carries none
const DEFAULT_RATINGS: &[(&str, i32)] = &[
    ("G", 1),
    ("PG", 5),
    ("PG-13", 7),
    ("R", 9),
    ("NC-17", 10),
    ("TV-Y", 1),
    ("TV-Y7", 3),
    ("TV-G", 4),
    ("TV-PG", 5),
    ("TV-14", 7),
    ("TV-MA", 9),
];

/// A user entry in the snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogUser {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub entitled: bool,
    #[serde(default)]
    pub played: HashSet<Uuid>,
}

/// On-disk snapshot layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub items: Vec<MediaItem>,
    #[serde(default)]
    pub channel_trailers: Vec<MediaItem>,
    #[serde(default)]
    pub users: Vec<CatalogUser>,
    #[serde(default)]
    pub ratings: HashMap<String, i32>,
}

#[derive(Debug)]
pub struct InMemoryCatalog {
    items: Vec<MediaItem>,
    channel_trailers: Vec<MediaItem>,
    users: HashMap<Uuid, CatalogUser>,
    /// Keyed by uppercased rating
    ratings: HashMap<String, i32>,
}

impl InMemoryCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let ratings = if snapshot.ratings.is_empty() {
            DEFAULT_RATINGS
                .iter()
                .map(|(rating, level)| (rating.to_string(), *level))
                .collect()
        } else {
            snapshot
                .ratings
                .into_iter()
                .map(|(rating, level)| (rating.trim().to_uppercase(), level))
                .collect()
        };

        Self {
            items: snapshot.items,
            channel_trailers: snapshot.channel_trailers,
            users: snapshot.users.into_iter().map(|u| (u.id, u)).collect(),
            ratings,
        }
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        Ok(Self::new(snapshot))
    }

    /// Loads a snapshot file from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let catalog = Self::from_json(&json)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            items = catalog.items.len(),
            channel_trailers = catalog.channel_trailers.len(),
            users = catalog.users.len(),
            "Loaded catalog"
        );

        Ok(catalog)
    }

    pub fn item(&self, id: Uuid) -> AppResult<MediaItem> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Item {}", id)))
    }

    pub fn user(&self, id: Uuid) -> AppResult<UserContext> {
        self.users
            .get(&id)
            .map(|u| UserContext {
                id: u.id,
                name: u.name.clone(),
            })
            .ok_or_else(|| AppError::NotFound(format!("User {}", id)))
    }
}

#[async_trait::async_trait]
impl LibraryService for InMemoryCatalog {
    async fn recursive_items(&self, _user: &UserContext) -> Vec<MediaItem> {
        self.items.clone()
    }
}

impl WatchHistory for InMemoryCatalog {
    fn is_played(&self, item: &MediaItem, user: &UserContext) -> bool {
        self.users
            .get(&user.id)
            .map(|u| u.played.contains(&item.id))
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl EntitlementService for InMemoryCatalog {
    async fn is_entitled(&self, user: &UserContext) -> bool {
        self.users
            .get(&user.id)
            .map(|u| u.entitled)
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl ChannelService for InMemoryCatalog {
    async fn query_remote_trailers(
        &self,
        _user: &UserContext,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<MediaItem>> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        Ok(self.channel_trailers.clone())
    }
}

impl RatingService for InMemoryCatalog {
    fn rating_ordinal(&self, rating: &str) -> Option<i32> {
        self.ratings.get(&rating.trim().to_uppercase()).copied()
    }
}
