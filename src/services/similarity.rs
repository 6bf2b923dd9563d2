use std::collections::HashSet;

use rand::Rng;

use crate::models::{MediaItem, Person};

const RATING_MATCH_POINTS: u32 = 10;
const GENRE_POINTS: u32 = 10;
const TAG_POINTS: u32 = 10;
const KEYWORD_POINTS: u32 = 10;
const STUDIO_POINTS: u32 = 5;

/// Upper bound (exclusive) of the random jitter added to every score
pub const JITTER_CEILING: u32 = 50;

/// Credit categories, checked in order; the first match decides the points
const CREDIT_POINTS: &[(&str, u32)] = &[
    ("director", 5),
    ("actor", 3),
    ("composer", 3),
    ("gueststar", 3),
    ("writer", 2),
];
const OTHER_CREDIT_POINTS: u32 = 1;

/// Additive similarity between the item about to play and a candidate intro
///
/// Every shared attribute adds a fixed number of points. A uniform jitter in
/// `[0, JITTER_CEILING)` is added on top so repeated selections for the same
/// target do not keep surfacing the same candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Full score including one draw of random jitter
    pub fn score<R: Rng>(&self, target: &MediaItem, candidate: &MediaItem, rng: &mut R) -> u32 {
        self.base_score(target, candidate) + rng.random_range(0..JITTER_CEILING)
    }

    /// Deterministic part of the score
    pub fn base_score(&self, target: &MediaItem, candidate: &MediaItem) -> u32 {
        let mut points = 0;

        if let (Some(a), Some(b)) = (target.rating(), candidate.rating()) {
            if a.eq_ignore_ascii_case(b) {
                points += RATING_MATCH_POINTS;
            }
        }

        points += GENRE_POINTS * shared_count(&target.genres, &candidate.genres);

        if let (Some(a), Some(b)) = (&target.tags, &candidate.tags) {
            points += TAG_POINTS * shared_count(a, b);
        }

        if let (Some(a), Some(b)) = (&target.keywords, &candidate.keywords) {
            points += KEYWORD_POINTS * shared_count(a, b);
        }

        points += STUDIO_POINTS * shared_count(&target.studios, &candidate.studios);

        let candidate_people: HashSet<String> = candidate
            .people
            .iter()
            .map(|p| p.name.to_lowercase())
            .collect();

        points += target
            .people
            .iter()
            .filter(|p| candidate_people.contains(&p.name.to_lowercase()))
            .map(credit_points)
            .sum::<u32>();

        points
    }
}

/// Case-insensitive intersection size of two name lists
fn shared_count(a: &[String], b: &[String]) -> u32 {
    let b: HashSet<String> = b.iter().map(|s| s.to_lowercase()).collect();
    let shared: HashSet<String> = a
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| b.contains(s))
        .collect();
    shared.len() as u32
}

fn credit_points(person: &Person) -> u32 {
    let fields: Vec<String> = [person.kind.as_deref(), person.role.as_deref()]
        .into_iter()
        .flatten()
        .map(normalize_credit)
        .collect();

    CREDIT_POINTS
        .iter()
        .find(|(category, _)| fields.iter().any(|f| f.as_str() == *category))
        .map(|(_, points)| *points)
        .unwrap_or(OTHER_CREDIT_POINTS)
}

/// "Guest Star" and "GuestStar" both normalize to "gueststar"
fn normalize_credit(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use crate::services::testing::ZeroRng;
    use rand::{rngs::StdRng, SeedableRng};

    fn movie() -> MediaItem {
        MediaItem::new("Target", ItemKind::Movie)
    }

    #[test]
    fn test_unrelated_items_score_zero() {
        let target = movie().with_genres(&["Action"]).with_rating("R");
        let candidate = movie().with_genres(&["Comedy"]).with_rating("G");
        assert_eq!(SimilarityScorer::new().base_score(&target, &candidate), 0);
    }

    #[test]
    fn test_rating_match_is_case_insensitive() {
        let target = movie().with_rating("PG-13");
        let candidate = movie().with_rating("pg-13");
        assert_eq!(SimilarityScorer::new().base_score(&target, &candidate), 10);
    }

    #[test]
    fn test_missing_rating_never_matches() {
        let target = movie();
        let candidate = movie();
        assert_eq!(SimilarityScorer::new().base_score(&target, &candidate), 0);
    }

    #[test]
    fn test_each_shared_genre_adds_ten() {
        let scorer = SimilarityScorer::new();
        let target = movie().with_genres(&["Action", "Drama", "Thriller"]);

        let one = movie().with_genres(&["drama"]);
        let two = movie().with_genres(&["drama", "ACTION"]);

        let base_one = scorer.base_score(&target, &one);
        let base_two = scorer.base_score(&target, &two);
        assert_eq!(base_one, 10);
        assert_eq!(base_two - base_one, 10);
    }

    #[test]
    fn test_duplicate_genres_count_once() {
        let target = movie().with_genres(&["Drama", "drama"]);
        let candidate = movie().with_genres(&["DRAMA"]);
        assert_eq!(SimilarityScorer::new().base_score(&target, &candidate), 10);
    }

    #[test]
    fn test_tags_and_keywords_need_both_sides() {
        let scorer = SimilarityScorer::new();
        let target = movie().with_tags(&["space"]).with_keywords(&["alien"]);

        let without = movie();
        assert_eq!(scorer.base_score(&target, &without), 0);

        let with = movie().with_tags(&["Space"]).with_keywords(&["Alien"]);
        assert_eq!(scorer.base_score(&target, &with), 20);
    }

    #[test]
    fn test_studios_add_five() {
        let target = movie().with_studios(&["A24", "Neon"]);
        let candidate = movie().with_studios(&["a24", "neon", "Pixar"]);
        assert_eq!(SimilarityScorer::new().base_score(&target, &candidate), 10);
    }

    #[test]
    fn test_credit_points_use_target_credit() {
        let scorer = SimilarityScorer::new();
        let target = movie()
            .with_person(Person::new("Ridley Scott", "Director"))
            .with_person(Person::new("Sigourney Weaver", "Actor"))
            .with_person(Person::new("Jerry Goldsmith", "Composer"))
            .with_person(Person::new("Dan O'Bannon", "Writer"))
            .with_person(Person::new("Someone", "Producer"));

        // The candidate's own credit types are irrelevant
        let candidate = movie()
            .with_person(Person::new("ridley scott", "Producer"))
            .with_person(Person::new("SIGOURNEY WEAVER", "Director"))
            .with_person(Person::new("Jerry Goldsmith", "Actor"))
            .with_person(Person::new("Dan O'Bannon", "Actor"))
            .with_person(Person::new("Someone", "Actor"));

        assert_eq!(scorer.base_score(&target, &candidate), 5 + 3 + 3 + 2 + 1);
    }

    #[test]
    fn test_credit_matches_role_field_and_guest_star_spelling() {
        let scorer = SimilarityScorer::new();
        let by_role = Person {
            name: "Jane".to_string(),
            kind: Some("Crew".to_string()),
            role: Some("director".to_string()),
        };
        let guest = Person::new("Joe", "Guest Star");
        let target = movie().with_person(by_role).with_person(guest);
        let candidate = movie()
            .with_person(Person::new("Jane", "Actor"))
            .with_person(Person::new("Joe", "Actor"));

        assert_eq!(scorer.base_score(&target, &candidate), 5 + 3);
    }

    #[test]
    fn test_zero_rng_pins_jitter() {
        let target = movie().with_genres(&["Drama"]);
        let candidate = movie().with_genres(&["Drama"]);
        let score = SimilarityScorer::new().score(&target, &candidate, &mut ZeroRng);
        assert_eq!(score, 10);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let scorer = SimilarityScorer::new();
        let target = movie().with_genres(&["Drama"]);
        let candidate = movie().with_genres(&["Drama"]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let score = scorer.score(&target, &candidate, &mut rng);
            assert!((10..10 + JITTER_CEILING).contains(&score));
        }
    }
}
