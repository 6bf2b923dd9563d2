use std::cell::OnceCell;
use std::sync::Arc;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{IntroSource, ItemKind, MediaItem, SelectionPolicy, UserContext},
    services::{ChannelService, EntitlementService, LibraryService, SimilarityScorer, WatchHistory},
};

/// A prospective intro for one selection call
///
/// Score and played state are computed on first use and cached for the rest
/// of the call.
#[derive(Debug)]
pub struct CandidateIntro<'a> {
    pub item: MediaItem,
    pub source: IntroSource,
    target: &'a MediaItem,
    score: OnceCell<u32>,
    played: OnceCell<bool>,
}

impl<'a> CandidateIntro<'a> {
    pub fn new(item: MediaItem, source: IntroSource, target: &'a MediaItem) -> Self {
        Self {
            item,
            source,
            target,
            score: OnceCell::new(),
            played: OnceCell::new(),
        }
    }

    pub fn score<R: Rng>(&self, scorer: &SimilarityScorer, rng: &mut R) -> u32 {
        *self
            .score
            .get_or_init(|| scorer.score(self.target, &self.item, rng))
    }

    pub fn is_played(&self, history: &dyn WatchHistory, user: &UserContext) -> bool {
        *self
            .played
            .get_or_init(|| history.is_played(&self.item, user))
    }

    /// Item id to hand to the player
    ///
    /// Library movies resolve to their first attached trailer, everything else
    /// plays as itself.
    pub fn playable_id(&self) -> Option<Uuid> {
        match self.source {
            IntroSource::ItemWithTrailer => self.item.trailers().first().copied(),
            IntroSource::ChannelTrailer | IntroSource::LibraryTrailer => Some(self.item.id),
        }
    }
}

/// Gathers raw candidates from the sources the policy enables
#[derive(Clone)]
pub struct CandidateCollector {
    library: Arc<dyn LibraryService>,
    entitlements: Arc<dyn EntitlementService>,
    channels: Arc<dyn ChannelService>,
}

impl CandidateCollector {
    pub fn new(
        library: Arc<dyn LibraryService>,
        entitlements: Arc<dyn EntitlementService>,
        channels: Arc<dyn ChannelService>,
    ) -> Self {
        Self {
            library,
            entitlements,
            channels,
        }
    }

    /// Collects candidates for `target`
    ///
    /// Only the remote trailer query can fail; its error (including
    /// cancellation) fails the whole collection.
    pub async fn collect<'a>(
        &self,
        target: &'a MediaItem,
        user: &UserContext,
        policy: &SelectionPolicy,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<CandidateIntro<'a>>> {
        let remote_enabled =
            policy.enable_remote_trailers && self.entitlements.is_entitled(user).await;

        if policy.enable_remote_trailers && !remote_enabled {
            tracing::debug!(user = %user.id, "User not entitled to remote trailers");
        }

        if !policy.enable_library_trailers && !remote_enabled {
            return Ok(Vec::new());
        }

        let library = self.library.recursive_items(user).await;
        let mut candidates = Vec::new();

        if policy.enable_library_trailers {
            candidates.extend(
                library
                    .iter()
                    .filter(|item| item.kind == ItemKind::Movie && !item.trailers().is_empty())
                    .cloned()
                    .map(|item| CandidateIntro::new(item, IntroSource::ItemWithTrailer, target)),
            );
        }

        if remote_enabled {
            let channel_trailers = self.channels.query_remote_trailers(user, cancel).await?;
            tracing::debug!(count = channel_trailers.len(), "Fetched channel trailers");

            candidates.extend(
                channel_trailers
                    .into_iter()
                    .map(|item| CandidateIntro::new(item, IntroSource::ChannelTrailer, target)),
            );

            candidates.extend(
                library
                    .into_iter()
                    .filter(|item| item.kind == ItemKind::Trailer)
                    .map(|item| CandidateIntro::new(item, IntroSource::LibraryTrailer, target)),
            );
        }

        tracing::debug!(
            target_id = %target.id,
            candidate_count = candidates.len(),
            "Collected intro candidates"
        );

        Ok(candidates)
    }
}
