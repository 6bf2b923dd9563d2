use std::sync::Arc;

use crate::services::RatingService;

/// Resolves optional content ratings to comparable levels
#[derive(Clone)]
pub struct RatingPolicy {
    ratings: Arc<dyn RatingService>,
}

impl RatingPolicy {
    pub fn new(ratings: Arc<dyn RatingService>) -> Self {
        Self { ratings }
    }

    /// Level for a rating; `None` when the rating is unset or blank
    pub fn level(&self, rating: Option<&str>) -> Option<i32> {
        let rating = rating.map(str::trim).filter(|r| !r.is_empty())?;
        self.ratings.rating_ordinal(rating)
    }
}
