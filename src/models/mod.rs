use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod intro;
pub mod policy;

pub use intro::{IntroResult, IntroSource};
pub use policy::SelectionPolicy;

/// Classification of a library item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Movie,
    Episode,
    Trailer,
    #[serde(other)]
    Other,
}

/// A cast or crew credit attached to a media item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub name: String,
    /// Credit type, e.g. "Director" or "Actor"
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Free-form role; some sources put the credit type here instead
    #[serde(default)]
    pub role: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind.into()),
            role: None,
        }
    }
}

/// A playable library or channel item, as handed over by the library service
///
/// Optional capabilities (tags, keywords, attached trailers) are `None` when the
/// item type does not support them, which is distinct from an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: Uuid,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub official_rating: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub studios: Vec<String>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub trailer_ids: Option<Vec<Uuid>>,
}

impl MediaItem {
    /// Creates a bare item with a fresh id and no metadata
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            official_rating: None,
            genres: Vec::new(),
            tags: None,
            keywords: None,
            studios: Vec::new(),
            people: Vec::new(),
            trailer_ids: None,
        }
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.official_rating = Some(rating.into());
        self
    }

    pub fn with_genres(mut self, genres: &[&str]) -> Self {
        self.genres = genres.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = Some(tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = Some(keywords.iter().map(|k| k.to_string()).collect());
        self
    }

    pub fn with_studios(mut self, studios: &[&str]) -> Self {
        self.studios = studios.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_person(mut self, person: Person) -> Self {
        self.people.push(person);
        self
    }

    pub fn with_trailers(mut self, trailer_ids: Vec<Uuid>) -> Self {
        self.trailer_ids = Some(trailer_ids);
        self
    }

    /// Attached trailer ids, empty when the item has none or cannot carry them
    pub fn trailers(&self) -> &[Uuid] {
        self.trailer_ids.as_deref().unwrap_or(&[])
    }

    /// Non-empty official rating, if any
    pub fn rating(&self) -> Option<&str> {
        self.official_rating
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// The viewing user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserContext {
    pub id: Uuid,
    pub name: String,
}

impl UserContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_serialization() {
        assert_eq!(serde_json::to_string(&ItemKind::Movie).unwrap(), "\"movie\"");
        let kind: ItemKind = serde_json::from_str("\"musicvideo\"").unwrap();
        assert_eq!(kind, ItemKind::Other);
    }

    #[test]
    fn test_deserialize_minimal_item() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"id":"{}","name":"Alien","kind":"movie"}}"#, id);
        let item: MediaItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item.id, id);
        assert!(item.genres.is_empty());
        assert!(item.tags.is_none());
        assert!(item.trailers().is_empty());
    }

    #[test]
    fn test_person_type_field() {
        let person: Person =
            serde_json::from_str(r#"{"name":"Ridley Scott","type":"Director"}"#).unwrap();
        assert_eq!(person.kind.as_deref(), Some("Director"));
        assert!(person.role.is_none());
    }

    #[test]
    fn test_blank_rating_is_absent() {
        let item = MediaItem::new("Alien", ItemKind::Movie).with_rating("  ");
        assert_eq!(item.rating(), None);
        let item = item.with_rating("R");
        assert_eq!(item.rating(), Some("R"));
    }
}
