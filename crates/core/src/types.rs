//! Shared identifier, timestamp, and calendar-day types.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

/// Entity identifiers are short random base36 strings. Collisions are
/// possible in theory and ignored.
pub type EntityId = String;

/// All timestamps are UTC. On the wire they are epoch milliseconds.
pub type Timestamp = DateTime<Utc>;

/// A calendar day, `YYYY-MM-DD` on the wire.
pub type Day = NaiveDate;

/// Length of generated identifiers.
pub const ID_LENGTH: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh random identifier.
pub fn new_id() -> EntityId {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// The current UTC calendar day.
pub fn today() -> Day {
    Utc::now().date_naive()
}

/// Serde adapter for optional calendar days stored as strings where the
/// empty string (or a missing / null value) means "no date".
pub mod optional_day {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Day;

    pub fn serialize<S>(value: &Option<Day>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(day) => serializer.collect_str(&day.format("%Y-%m-%d")),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Day>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => Day::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(default, with = "optional_day")]
        day: Option<Day>,
    }

    #[test]
    fn new_id_is_base36_of_fixed_length() {
        let id = new_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn new_ids_differ() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn empty_string_day_is_none() {
        let h: Holder = serde_json::from_str(r#"{"day":""}"#).unwrap();
        assert_eq!(h.day, None);
    }

    #[test]
    fn missing_day_is_none() {
        let h: Holder = serde_json::from_str("{}").unwrap();
        assert_eq!(h.day, None);
    }

    #[test]
    fn day_serializes_as_iso_date() {
        let h = Holder {
            day: NaiveDate::from_ymd_opt(2026, 3, 9),
        };
        assert_eq!(serde_json::to_string(&h).unwrap(), r#"{"day":"2026-03-09"}"#);
        let none = Holder { day: None };
        assert_eq!(serde_json::to_string(&none).unwrap(), r#"{"day":""}"#);
    }

    #[test]
    fn invalid_day_is_rejected() {
        assert!(serde_json::from_str::<Holder>(r#"{"day":"09/03/2026"}"#).is_err());
    }
}
