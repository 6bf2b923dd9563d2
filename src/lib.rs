//! Picks the trailers and custom intro clips to play before a movie or episode.
//!
//! Candidates come from library movies with attached trailers, remote channel
//! trailers and library trailer items. They are ranked by metadata similarity
//! to the item about to play, filtered by parental and watched-content policy,
//! and capped at two, with at most one slot going to a custom intro clip.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
