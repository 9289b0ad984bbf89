use std::collections::BTreeMap;

use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::keys::{EventId, PublicKey};

/// A REQ/COUNT filter. Every field is optional; a missing field is
/// unconstrained. `tags` holds single-letter `#X` tag filters keyed by the
/// letter (without the `#`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub ids: Option<Vec<EventId>>,
    pub authors: Option<Vec<PublicKey>>,
    pub kinds: Option<Vec<u16>>,
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub limit: Option<u64>,
    pub tags: BTreeMap<char, Vec<String>>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authors(mut self, authors: Vec<PublicKey>) -> Self {
        self.authors = Some(authors);
        self
    }

    pub fn kinds(mut self, kinds: Vec<u16>) -> Self {
        self.kinds = Some(kinds);
        self
    }

    pub fn ids(mut self, ids: Vec<EventId>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: i64) -> Self {
        self.until = Some(until);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn tag(mut self, letter: char, values: Vec<String>) -> Self {
        self.tags.insert(letter, values);
        self
    }

    /// A copy of this filter with `until` replaced, used by the paging
    /// engine to request the next older page.
    pub fn with_until(&self, until: i64) -> Self {
        let mut next = self.clone();
        next.until = Some(until);
        next
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut len = self.tags.len();
        if self.ids.is_some() {
            len += 1;
        }
        if self.authors.is_some() {
            len += 1;
        }
        if self.kinds.is_some() {
            len += 1;
        }
        if self.since.is_some() {
            len += 1;
        }
        if self.until.is_some() {
            len += 1;
        }
        if self.limit.is_some() {
            len += 1;
        }

        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(ids) = &self.ids {
            map.serialize_entry("ids", ids)?;
        }
        if let Some(authors) = &self.authors {
            map.serialize_entry("authors", authors)?;
        }
        if let Some(kinds) = &self.kinds {
            map.serialize_entry("kinds", kinds)?;
        }
        if let Some(since) = &self.since {
            map.serialize_entry("since", since)?;
        }
        if let Some(until) = &self.until {
            map.serialize_entry("until", until)?;
        }
        if let Some(limit) = &self.limit {
            map.serialize_entry("limit", limit)?;
        }
        for (letter, values) in &self.tags {
            map.serialize_entry(&format!("#{letter}"), values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let obj = value
            .as_object()
            .ok_or_else(|| DeError::custom("filter must be a JSON object"))?;

        let mut filter = Filter::new();

        if let Some(v) = obj.get("ids") {
            filter.ids = Some(parse_hex_array(v, "ids")?);
        }
        if let Some(v) = obj.get("authors") {
            filter.authors = Some(parse_hex_array(v, "authors")?);
        }
        if let Some(v) = obj.get("kinds") {
            let arr = v.as_array().ok_or_else(|| DeError::custom("kinds must be an array"))?;
            let kinds = arr
                .iter()
                .map(|k| {
                    k.as_u64()
                        .and_then(|n| u16::try_from(n).ok())
                        .ok_or_else(|| DeError::custom("kind must fit in u16"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            filter.kinds = Some(kinds);
        }
        if let Some(v) = obj.get("since") {
            filter.since = v.as_i64();
        }
        if let Some(v) = obj.get("until") {
            filter.until = v.as_i64();
        }
        if let Some(v) = obj.get("limit") {
            filter.limit = v.as_u64();
        }
        for (key, v) in obj {
            if let Some(letter) = key.strip_prefix('#').and_then(|s| s.chars().next()) {
                if key.chars().count() == 2 {
                    let arr = v
                        .as_array()
                        .ok_or_else(|| DeError::custom(format!("{key} must be an array")))?;
                    let values = arr
                        .iter()
                        .map(|x| {
                            x.as_str()
                                .map(|s| s.to_string())
                                .ok_or_else(|| DeError::custom(format!("{key} values must be strings")))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    filter.tags.insert(letter, values);
                }
            }
        }

        Ok(filter)
    }
}

fn parse_hex_array<T, E>(v: &Value, field: &'static str) -> Result<Vec<T>, E>
where
    T: HexDecodable,
    E: DeError,
{
    let arr = v
        .as_array()
        .ok_or_else(|| DeError::custom(format!("{field} must be an array")))?;
    arr.iter()
        .map(|x| {
            let s = x
                .as_str()
                .ok_or_else(|| DeError::custom(format!("{field} elements must be strings")))?;
            T::decode_hex(s).map_err(|e| DeError::custom(format!("{field}: {e}")))
        })
        .collect()
}

trait HexDecodable: Sized {
    fn decode_hex(s: &str) -> Result<Self, crate::error::TypesError>;
}

impl HexDecodable for EventId {
    fn decode_hex(s: &str) -> Result<Self, crate::error::TypesError> {
        EventId::from_hex(s)
    }
}

impl HexDecodable for PublicKey {
    fn decode_hex(s: &str) -> Result<Self, crate::error::TypesError> {
        PublicKey::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_tag_filters() {
        let pk = PublicKey::from_hex(&"aa".repeat(32)).unwrap();
        let filter = Filter::new()
            .authors(vec![pk])
            .kinds(vec![1])
            .tag('e', vec!["dead".to_string()])
            .limit(10);
        let json = serde_json::to_string(&filter).unwrap();
        let back: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter, back);
        assert!(json.contains("\"#e\""));
    }

    #[test]
    fn missing_fields_are_unconstrained() {
        let filter: Filter = serde_json::from_str("{}").unwrap();
        assert!(filter.ids.is_none());
        assert!(filter.authors.is_none());
        assert!(filter.limit.is_none());
    }
}
