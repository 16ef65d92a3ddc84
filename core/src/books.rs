//! One function per Books API operation.
//!
//! Each helper builds the minimal payload or query for its call and returns
//! the client's result untouched, so callers can assert on the status and
//! the decoded body alike. Only `remove_all_books` handles errors itself.

use uuid::Uuid;

use crate::client::{ApiClient, Transport};
use crate::error::ApiError;
use crate::http::{Body, HttpResponse};
use crate::types::{BookRef, NewBook, UpdateBook, BOOK_TYPES};

pub const MANIPULATION: &str = "manipulation";
pub const LATEST: &str = "latest";
pub const INFO: &str = "info";
pub const IDS: &str = "ids";

fn json_body<S: serde::Serialize>(payload: &S) -> Result<Body, ApiError> {
    serde_json::to_value(payload)
        .map(Body::Json)
        .map_err(|e| ApiError::Serialization(e.to_string()))
}

pub fn add_book<T: Transport>(
    client: &ApiClient<T>,
    title: &str,
    book_type: &str,
    creation_date: &str,
) -> Result<HttpResponse, ApiError> {
    let payload = NewBook {
        title: title.to_string(),
        book_type: book_type.to_string(),
        creation_date: creation_date.to_string(),
    };
    client.post(MANIPULATION, json_body(&payload)?, &[])
}

pub fn delete_book<T: Transport>(client: &ApiClient<T>, id: Uuid) -> Result<HttpResponse, ApiError> {
    let id = id.to_string();
    client.delete(MANIPULATION, &[("id", id.as_str())], &[])
}

pub fn update_book<T: Transport>(
    client: &ApiClient<T>,
    id: Uuid,
    title: &str,
) -> Result<HttpResponse, ApiError> {
    let id = id.to_string();
    let payload = UpdateBook {
        title: title.to_string(),
    };
    client.put(MANIPULATION, &[("id", id.as_str())], json_body(&payload)?, &[])
}

/// Most recently created books first, at most `limit` of them.
pub fn get_latest_books<T: Transport>(
    client: &ApiClient<T>,
    limit: usize,
) -> Result<HttpResponse, ApiError> {
    let limit = limit.to_string();
    client.get(LATEST, &[("limit", limit.as_str())], &[])
}

pub fn get_books_by_type<T: Transport>(
    client: &ApiClient<T>,
    book_type: &str,
) -> Result<HttpResponse, ApiError> {
    client.get(IDS, &[("book_type", book_type)], &[])
}

pub fn get_book_info<T: Transport>(client: &ApiClient<T>, id: Uuid) -> Result<HttpResponse, ApiError> {
    let id = id.to_string();
    client.get(INFO, &[("id", id.as_str())], &[])
}

/// Every book of every type in `BOOK_TYPES`, in type order.
pub fn get_all_books<T: Transport>(client: &ApiClient<T>) -> Result<Vec<BookRef>, ApiError> {
    let mut all = Vec::new();
    for book_type in BOOK_TYPES {
        let refs: Vec<BookRef> = get_books_by_type(client, book_type)?.json()?;
        all.extend(refs);
    }
    Ok(all)
}

/// A book that could not be removed during cleanup.
#[derive(Debug)]
pub struct CleanupFailure {
    pub id: Uuid,
    pub error: ApiError,
}

/// Outcome of `remove_all_books`.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: Vec<Uuid>,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Delete every book `get_all_books` can see.
///
/// Each deletion is attempted even if earlier ones fail; failures are logged
/// and returned in the report. Only a failure to list the books is an error.
pub fn remove_all_books<T: Transport>(client: &ApiClient<T>) -> Result<CleanupReport, ApiError> {
    let mut report = CleanupReport::default();
    for book in get_all_books(client)? {
        match delete_book(client, book.id) {
            Ok(_) => report.deleted.push(book.id),
            Err(error) => {
                tracing::error!(id = %book.id, %error, "failed to delete book");
                report.failures.push(CleanupFailure { id: book.id, error });
            }
        }
    }
    tracing::info!(
        deleted = report.deleted.len(),
        failed = report.failures.len(),
        "removed all books"
    );
    Ok(report)
}
