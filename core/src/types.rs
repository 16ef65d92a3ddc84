//! Domain DTOs for the Books API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently; the
//! integration suite catches any drift. `type` and `creation_date` stay plain
//! strings so the suite can submit values the server is expected to reject.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every genre the suite knows about. `get_all_books` and session teardown
/// walk this list, so a genre missing here is missed by cleanup too.
pub const BOOK_TYPES: [&str; 5] = [
    "Science",
    "Satire",
    "Drama",
    "Romance",
    "Action and Adventure",
];

/// A book as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub book_type: String,
    pub creation_date: String,
    /// Set by the server on the first update; absent before that.
    #[serde(default)]
    pub updated_date_time: Option<String>,
}

/// Request payload for creating a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(rename = "type")]
    pub book_type: String,
    pub creation_date: String,
}

/// Request payload for renaming a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBook {
    pub title: String,
}

/// An entry of the `ids` listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookRef {
    pub id: Uuid,
}

/// JSON error body sent with every non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
