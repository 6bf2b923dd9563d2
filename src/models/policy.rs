use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::ItemKind;

/// Snapshot of the intro configuration, read once per selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub enable_for_movies: bool,
    pub enable_for_episodes: bool,
    /// Library movies with attached trailers
    pub enable_library_trailers: bool,
    /// Remote channel trailers and library trailer items
    pub enable_remote_trailers: bool,
    pub enable_custom_intro: bool,
    pub enable_parental_filter: bool,
    /// Whether already-played candidates stay eligible
    pub enable_watched_content: bool,
    pub custom_intro_path: Option<PathBuf>,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            enable_for_movies: true,
            enable_for_episodes: false,
            enable_library_trailers: true,
            enable_remote_trailers: true,
            enable_custom_intro: true,
            enable_parental_filter: true,
            enable_watched_content: false,
            custom_intro_path: None,
        }
    }
}

impl SelectionPolicy {
    /// Only movies and episodes get intros, each behind its own toggle
    pub fn allows_target(&self, kind: ItemKind) -> bool {
        match kind {
            ItemKind::Movie => self.enable_for_movies,
            ItemKind::Episode => self.enable_for_episodes,
            ItemKind::Trailer | ItemKind::Other => false,
        }
    }

    /// Custom intro directory, if custom intros are switched on and configured
    pub fn custom_intro_dir(&self) -> Option<&PathBuf> {
        if self.enable_custom_intro {
            self.custom_intro_path.as_ref()
        } else {
            None
        }
    }
}
