pub mod candidates;
pub mod catalog;
pub mod collaborators;
pub mod custom_intros;
pub mod providers;
pub mod rating;
pub mod selection;
pub mod similarity;

#[cfg(test)]
pub(crate) mod testing;

pub use candidates::{CandidateCollector, CandidateIntro};
pub use catalog::InMemoryCatalog;
pub use collaborators::{
    ChannelService, EntitlementService, FileEnumerator, LibraryService, PolicySource,
    RatingService, StaticPolicy, WatchHistory,
};
#[cfg(test)]
pub use collaborators::{
    MockChannelService, MockEntitlementService, MockFileEnumerator, MockLibraryService,
    MockPolicySource, MockRatingService, MockWatchHistory,
};
pub use custom_intros::{CustomIntroLoader, WalkDirEnumerator};
pub use rating::RatingPolicy;
pub use selection::{Collaborators, IntroProvider, SelectionEngine, MAX_INTROS};
pub use similarity::SimilarityScorer;
