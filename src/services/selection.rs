use std::path::PathBuf;
use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{IntroResult, MediaItem, SelectionPolicy, UserContext},
    services::{
        CandidateCollector, CandidateIntro, ChannelService, CustomIntroLoader, EntitlementService,
        FileEnumerator, LibraryService, PolicySource, RatingPolicy, RatingService,
        SimilarityScorer, WatchHistory,
    },
};

/// Maximum number of intros returned for one target
pub const MAX_INTROS: usize = 2;

/// Interchangeable intro selection strategy
#[async_trait::async_trait]
pub trait IntroProvider: Send + Sync {
    /// Picks up to `MAX_INTROS` intros to play before `target`
    ///
    /// Fails only when the remote trailer query fails or `cancel` fires.
    async fn select(
        &self,
        target: &MediaItem,
        user: &UserContext,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<IntroResult>>;

    /// Every custom intro file under the configured directory
    async fn list_all_custom_intro_files(&self) -> Vec<PathBuf>;

    /// Strategy name for logging and display
    fn name(&self) -> &'static str;
}

/// External services the engine is built from
pub struct Collaborators {
    pub library: Arc<dyn LibraryService>,
    pub history: Arc<dyn WatchHistory>,
    pub entitlements: Arc<dyn EntitlementService>,
    pub channels: Arc<dyn ChannelService>,
    pub ratings: Arc<dyn RatingService>,
    pub policy: Arc<dyn PolicySource>,
    pub files: Arc<dyn FileEnumerator>,
}

/// Default intro strategy: similarity-ranked trailers plus one custom intro
#[derive(Clone)]
pub struct SelectionEngine {
    collector: CandidateCollector,
    custom_intros: CustomIntroLoader,
    scorer: SimilarityScorer,
    ratings: RatingPolicy,
    history: Arc<dyn WatchHistory>,
    policy: Arc<dyn PolicySource>,
}

impl SelectionEngine {
    pub fn new(services: Collaborators) -> Self {
        Self {
            collector: CandidateCollector::new(
                services.library,
                services.entitlements,
                services.channels,
            ),
            custom_intros: CustomIntroLoader::new(services.files),
            scorer: SimilarityScorer::new(),
            ratings: RatingPolicy::new(services.ratings),
            history: services.history,
            policy: services.policy,
        }
    }

    /// Restricts which files count as custom intro clips
    pub fn with_video_extensions(mut self, extensions: Vec<String>) -> Self {
        self.custom_intros = self.custom_intros.with_extensions(extensions);
        self
    }

    /// `select` with a caller-supplied random source
    #[instrument(skip_all, fields(target_id = %target.id, user = %user.id))]
    pub async fn select_with_rng<R: Rng + Send>(
        &self,
        target: &MediaItem,
        user: &UserContext,
        cancel: &CancellationToken,
        rng: &mut R,
    ) -> AppResult<Vec<IntroResult>> {
        let policy = self.policy.load_policy();

        if !policy.allows_target(target.kind) {
            tracing::debug!(kind = ?target.kind, "Intros disabled for target type");
            return Ok(Vec::new());
        }

        let target_level = self.ratings.level(target.rating());

        let candidates = self.collector.collect(target, user, &policy, cancel).await?;

        let custom = self
            .custom_intros
            .pick_intros(policy.custom_intro_dir().cloned(), rng)
            .await;

        let budget = if custom.is_empty() {
            MAX_INTROS
        } else {
            MAX_INTROS - 1
        };

        let mut intros: Vec<IntroResult> = self
            .rank(&candidates, &policy, target_level, user, rng)
            .into_iter()
            .filter_map(|candidate| candidate.playable_id())
            .take(budget)
            .map(|item_id| IntroResult::Item { item_id })
            .collect();

        intros.extend(custom.into_iter().take(1));

        tracing::info!(
            candidates = candidates.len(),
            selected = intros.len(),
            "Selected intros"
        );

        Ok(intros)
    }

    /// Filters candidates by policy and orders them best first
    ///
    /// Order: score descending, unplayed before played, then a random key.
    pub fn rank<'c, 'a, R: Rng>(
        &self,
        candidates: &'c [CandidateIntro<'a>],
        policy: &SelectionPolicy,
        target_level: Option<i32>,
        user: &UserContext,
        rng: &mut R,
    ) -> Vec<&'c CandidateIntro<'a>> {
        let mut keyed: Vec<(u32, bool, u32, &'c CandidateIntro<'a>)> = candidates
            .iter()
            .filter(|candidate| self.passes_parental_filter(candidate, policy, target_level))
            .filter(|candidate| {
                policy.enable_watched_content || !candidate.is_played(self.history.as_ref(), user)
            })
            .map(|candidate| {
                let score = candidate.score(&self.scorer, rng);
                let played = candidate.is_played(self.history.as_ref(), user);
                (score, played, rng.random::<u32>(), candidate)
            })
            .collect();

        tracing::debug!(
            total = candidates.len(),
            eligible = keyed.len(),
            "Filtered intro candidates"
        );

        keyed.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });

        keyed.into_iter().map(|(_, _, _, candidate)| candidate).collect()
    }

    /// Only filters when the target itself has a level to compare against
    fn passes_parental_filter(
        &self,
        candidate: &CandidateIntro<'_>,
        policy: &SelectionPolicy,
        target_level: Option<i32>,
    ) -> bool {
        if !policy.enable_parental_filter {
            return true;
        }
        let Some(max_level) = target_level else {
            return true;
        };
        match self.ratings.level(candidate.item.rating()) {
            Some(level) => level <= max_level,
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl IntroProvider for SelectionEngine {
    async fn select(
        &self,
        target: &MediaItem,
        user: &UserContext,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<IntroResult>> {
        let mut rng = StdRng::from_os_rng();
        self.select_with_rng(target, user, cancel, &mut rng).await
    }

    async fn list_all_custom_intro_files(&self) -> Vec<PathBuf> {
        let policy = self.policy.load_policy();
        self.custom_intros
            .list_files_blocking(policy.custom_intro_path)
            .await
    }

    fn name(&self) -> &'static str {
        "Default"
    }
}
