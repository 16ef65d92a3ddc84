use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Genres the API accepts. Anything else is rejected as an invalid entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookType {
    Science,
    Satire,
    Drama,
    Romance,
    #[serde(rename = "Action and Adventure")]
    ActionAndAdventure,
}

impl BookType {
    pub const ALL: [BookType; 5] = [
        BookType::Science,
        BookType::Satire,
        BookType::Drama,
        BookType::Romance,
        BookType::ActionAndAdventure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookType::Science => "Science",
            BookType::Satire => "Satire",
            BookType::Drama => "Drama",
            BookType::Romance => "Romance",
            BookType::ActionAndAdventure => "Action and Adventure",
        }
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBookType(pub String);

impl FromStr for BookType {
    type Err = UnknownBookType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownBookType(s.to_string()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub book_type: BookType,
    /// Echoed exactly as submitted.
    pub creation_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date_time: Option<DateTime<Utc>>,
}

/// Creation payload. `type` stays a string here so an unknown genre can be
/// reported separately from a malformed request.
#[derive(Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(rename = "type")]
    pub book_type: String,
    pub creation_date: String,
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// True when `s` is a calendar date written exactly as `YYYY-MM-DD`.
///
/// chrono's parser accepts unpadded fields such as `2021-1-2`, so the date
/// must also format back to the same text.
pub fn is_creation_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .is_ok_and(|date| date.format(DATE_FORMAT).to_string() == s)
}

#[derive(Deserialize)]
pub struct UpdateBook {
    pub title: String,
}

/// Entry returned by the `ids` endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookId {
    pub id: Uuid,
}

#[derive(Deserialize)]
pub struct IdQuery {
    pub id: String,
}

#[derive(Deserialize)]
pub struct LatestQuery {
    pub limit: usize,
}

#[derive(Deserialize)]
pub struct TypeQuery {
    pub book_type: String,
}
