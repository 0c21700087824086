use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::errors::GameApiError;
use crate::ordered::OrderedMap;

/// One decoded entity (a user or a trophy) as an ordered string-keyed map.
///
/// Keys are kept for forward compatibility even when no typed accessor exists
/// for them. Values are never interpreted here.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Record {
    entries: OrderedMap,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the entry, or overwrites the value if the key already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.set(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Result<&str, GameApiError> {
        self.get_opt(key)
            .ok_or_else(|| GameApiError::MissingKey(key.to_string()))
    }

    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get_opt(key).is_some()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.entries.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Truthiness of a flag value: anything non-empty except the literal `false`.
pub fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "false"
}

/// User returned by `GameApiClient::fetch_verified_user()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct User {
    record: Record,
}

impl User {
    pub fn id(&self) -> Result<&str, GameApiError> {
        self.record.get("id")
    }

    pub fn username(&self) -> Result<&str, GameApiError> {
        self.record.get("username")
    }

    /// The user token of the verified session. Never sent by the API, the
    /// client injects it after decoding.
    pub fn token(&self) -> Result<&str, GameApiError> {
        self.record.get("token")
    }

    pub fn avatar_url(&self) -> Result<&str, GameApiError> {
        self.record.get("avatar_url")
    }

    /// Any other property, such as `type` or `status`.
    pub fn property(&self, key: &str) -> Result<&str, GameApiError> {
        self.record.get(key)
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl From<Record> for User {
    fn from(record: Record) -> Self {
        Self { record }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id={}, username={}}}",
            self.record.get_opt("id").unwrap_or_default(),
            self.record.get_opt("username").unwrap_or_default()
        )
    }
}

/// Trophy (achievement) of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trophy {
    record: Record,
}

impl Trophy {
    pub fn id(&self) -> Result<&str, GameApiError> {
        self.record.get("id")
    }

    pub fn title(&self) -> Result<&str, GameApiError> {
        self.record.get("title")
    }

    pub fn description(&self) -> Result<&str, GameApiError> {
        self.record.get("description")
    }

    /// Bronze, Silver, Gold or Platinum.
    pub fn difficulty(&self) -> Result<&str, GameApiError> {
        self.record.get("difficulty")
    }

    pub fn image_url(&self) -> Result<&str, GameApiError> {
        self.record.get("image_url")
    }

    /// Whether the verified user has this trophy. The API sends either
    /// `false` or the date it was achieved, see [`is_truthy`].
    pub fn is_achieved(&self) -> Result<bool, GameApiError> {
        self.record.get("achieved").map(is_truthy)
    }

    pub fn property(&self, key: &str) -> Result<&str, GameApiError> {
        self.record.get(key)
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl From<Record> for Trophy {
    fn from(record: Record) -> Self {
        Self { record }
    }
}

impl fmt::Display for Trophy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id={}, title={}}}",
            self.record.get_opt("id").unwrap_or_default(),
            self.record.get_opt("title").unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut record = Record::new();
        record.set("id", "1");
        record.set("title", "First");
        record.set("id", "2");

        let entries: Vec<_> = record.iter().collect();
        assert_eq!(entries, vec![("id", "2"), ("title", "First")]);
    }

    #[test]
    fn missing_key_is_an_error() {
        let record = Record::new();
        assert_eq!(
            record.get("id"),
            Err(GameApiError::MissingKey("id".to_string()))
        );
        assert!(!record.contains_key("id"));
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy("true"));
        assert!(is_truthy("2 weeks ago"));
        assert!(is_truthy("FALSE"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn trophy_view() {
        let mut record = Record::new();
        record.set("id", "12");
        record.set("title", "First Blood");
        record.set("achieved", "false");

        let trophy = Trophy::from(record);
        assert_eq!(trophy.id(), Ok("12"));
        assert_eq!(trophy.is_achieved(), Ok(false));
        assert!(trophy.difficulty().is_err());
        assert_eq!(trophy.to_string(), "{id=12, title=First Blood}");
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut record = Record::new();
        record.set("zeta", "1");
        record.set("alpha", "2");

        let json = serde_json::to_string(&User::from(record)).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2"}"#);
    }
}
