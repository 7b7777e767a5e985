use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format used in the sheet, the CSV export and the JSON API.
///
/// Second precision, server clock, UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column order of the remote table and the CSV export.
pub const HEADER: [&str; 4] = ["timestamp", "name", "age", "favorite_genre"];

/// The fixed set of genres a record may carry
///
/// The set is closed: form submissions and sheet rows carrying anything else
/// are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    /// Science fiction
    #[serde(rename = "Sci-Fi")]
    SciFi,

    /// Animated films
    Animation,

    /// Action films
    Action,

    /// Comedies
    Comedy,
}

impl Genre {
    /// All genres, in the display order used by the select widget and the
    /// statistics panel.
    pub const ALL: [Genre; 4] = [Genre::SciFi, Genre::Animation, Genre::Action, Genre::Comedy];

    /// The display name, as stored in the sheet and shown in the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::SciFi => "Sci-Fi",
            Genre::Animation => "Animation",
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
        }
    }

    /// Parse a display name back into a genre
    ///
    /// Returns `None` for anything outside the fixed set.
    pub fn parse(s: &str) -> Option<Genre> {
        match s {
            "Sci-Fi" => Some(Genre::SciFi),
            "Animation" => Some(Genre::Animation),
            "Action" => Some(Genre::Action),
            "Comedy" => Some(Genre::Comedy),
            _ => None,
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted entry
///
/// Records are immutable once appended to the store; there is no update or
/// delete path. Duplicates (the same name resubmitted) are allowed and
/// simply accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Point in time the record was created (set by the server, not the form)
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,

    /// Free-text label, non-empty (enforced before a save is attempted)
    pub name: String,

    /// Age in years, bounded 1-120 by the input widget
    pub age: u8,

    /// One of the fixed genre set
    pub favorite_genre: Genre,
}

impl UserRecord {
    /// Create a record stamped with the current server time
    ///
    /// The timestamp is truncated to whole seconds so that a record written
    /// to the sheet and read back compares equal.
    pub fn new(name: impl Into<String>, age: u8, favorite_genre: Genre) -> Self {
        UserRecord {
            timestamp: Utc::now().trunc_subsecs(0),
            name: name.into(),
            age,
            favorite_genre,
        }
    }

    /// The timestamp in the table's `%Y-%m-%d %H:%M:%S` format
    pub fn format_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// The record as one sheet/CSV row, columns in `HEADER` order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.format_timestamp(),
            self.name.clone(),
            self.age.to_string(),
            self.favorite_genre.to_string(),
        ]
    }

    /// Parse a sheet row back into a record
    ///
    /// Returns `None` when the row is too short, the timestamp or age does
    /// not parse, or the genre is outside the fixed set. Callers reading the
    /// remote table skip such rows rather than failing the whole read.
    pub fn from_row(row: &[String]) -> Option<UserRecord> {
        if row.len() < 4 {
            return None;
        }

        let timestamp = NaiveDateTime::parse_from_str(&row[0], TIMESTAMP_FORMAT)
            .ok()?
            .and_utc();
        let age: u8 = row[2].trim().parse().ok()?;
        let favorite_genre = Genre::parse(row[3].trim())?;

        Some(UserRecord {
            timestamp,
            name: row[1].clone(),
            age,
            favorite_genre,
        })
    }
}

/// Serde helper keeping JSON timestamps in the same second-precision format
/// as the sheet and the CSV export.
mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
