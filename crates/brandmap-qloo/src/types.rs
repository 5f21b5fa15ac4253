use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Qloo entity types used by the brand map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Destination,
    Locality,
    Artist,
    Brand,
    Movie,
    Place,
    Demographics,
}

impl EntityType {
    #[must_use]
    pub fn urn(self) -> &'static str {
        match self {
            EntityType::Destination => "urn:entity:destination",
            EntityType::Locality => "urn:entity:locality",
            EntityType::Artist => "urn:entity:artist",
            EntityType::Brand => "urn:entity:brand",
            EntityType::Movie => "urn:entity:movie",
            EntityType::Place => "urn:entity:place",
            EntityType::Demographics => "urn:demographics",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.urn())
    }
}

/// What an insights query is conditioned on.
#[derive(Debug, Clone, Copy)]
pub enum Signal<'a> {
    /// Free-text location, e.g. a country name.
    Location(&'a str),
    /// Entity IDs of interest, e.g. a resolved location entity.
    Interests(&'a [String]),
}

/// A Qloo entity as returned by search, insights, and trending.
///
/// Only the fields the brand map reads are kept. Search results carry their
/// identifier in `entity_id` or, on older records, `id`; either may be a
/// string or a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, deserialize_with = "lenient_id")]
    pub entity_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Entity {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// The entity's identifier, preferring `entity_id` over `id`.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.entity_id
            .as_deref()
            .or(self.id.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Accepts a string or numeric identifier; any other shape is treated as
/// absent rather than rejecting the whole entity.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Inclusive date window for trending queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The `days`-long window ending on `end`.
    #[must_use]
    pub fn trailing(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    #[must_use]
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    #[must_use]
    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}
