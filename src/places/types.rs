//! Upstream and client-facing place records.

use serde::{Deserialize, Deserializer, Serialize};

/// A place as returned by the upstream search service.
///
/// Only `code`, `name` and `country_name` are read by the gateway; absent or
/// `null` values there become empty strings. Every other field is kept as raw
/// JSON, and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaceRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country_name: String,

    // Unread; any JSON shape is accepted.
    pub country_code: serde_json::Value,
    #[serde(rename = "type")]
    pub kind: serde_json::Value,
    pub index_strings: serde_json::Value,
    pub cases: serde_json::Value,
    pub coordinates: serde_json::Value,
    pub weight: serde_json::Value,
    pub state_code: serde_json::Value,
    pub country_cases: serde_json::Value,
    pub main_airport_name: serde_json::Value,
}

/// A place in the shape clients of the gateway expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub slug: String,
    pub subtitle: String,
    pub title: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
