//! Catalog items as returned by listing endpoints.
//!
//! Only `id` is interpreted. Every other field is carried through untouched so
//! that a saved item re-serializes exactly as the remote API produced it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a catalog item: a JSON number or a JSON string.
///
/// Equality is strict, `27205` and `"27205"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl ItemId {
    /// Parse a URL path segment.
    ///
    /// Only the canonical spelling of an integer becomes a numeric id, so
    /// `"007"`, `"+5"` and `"-0"` stay text ids.
    pub fn from_path_segment(segment: &str) -> Self {
        match segment.parse::<i64>() {
            Ok(n) if n.to_string() == segment => ItemId::Number(n),
            _ => ItemId::Text(segment.to_string()),
        }
    }

    /// The text reading of a numeric path id, for items saved with a string id of digits.
    pub fn as_text_alternative(&self) -> Option<ItemId> {
        match self {
            ItemId::Number(n) => Some(ItemId::Text(n.to_string())),
            ItemId::Text(_) => None,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        ItemId::Number(i64::from(n))
    }
}

impl From<u32> for ItemId {
    fn from(n: u32) -> Self {
        ItemId::Number(i64::from(n))
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Text(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

/// A movie or TV show record from a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl CatalogItem {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Set a pass-through field. `id` cannot be set this way.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "id" {
            self.fields.insert(key, value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields except `id`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Display title: `title` for movies, `name` for shows.
    pub fn title(&self) -> Option<&str> {
        self.str_field("title").or_else(|| self.str_field("name"))
    }

    /// `release_date` for movies, `first_air_date` for shows.
    pub fn release_date(&self) -> Option<&str> {
        self.str_field("release_date")
            .or_else(|| self.str_field("first_air_date"))
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.str_field("poster_path")
    }

    pub fn vote_average(&self) -> Option<f64> {
        self.fields.get("vote_average").and_then(Value::as_f64)
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.fields
            .get("media_type")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Record the media type unless the item already carries one.
    pub fn tag_media_type(&mut self, media_type: MediaType) {
        self.fields
            .entry("media_type")
            .or_insert_with(|| Value::String(media_type.as_str().to_string()));
    }
}
