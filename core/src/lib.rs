//! Client, domain helpers and session fixtures for verifying the Books API.
//!
//! # Overview
//! `ApiClient` issues blocking GET/POST/PUT/DELETE calls against a base URL
//! such as `http://127.0.0.1:3000/v1/books`. The helpers in [`books`] map
//! each API operation onto one client call and hand back the raw
//! `HttpResponse`, so tests can assert on status codes and payloads. A
//! [`Session`] bundles the client with run-level setup and teardown.
//!
//! # Design
//! - Requests are built as plain `HttpRequest` values and executed by a
//!   `Transport`; production uses a pooled `ureq::Agent`.
//! - Every non-2xx status becomes `ApiError::Http` carrying the status code
//!   and the server's error message.
//! - DTOs are defined independently from the mock-server crate; the
//!   integration suite catches schema drift.

pub mod books;
pub mod client;
pub mod error;
pub mod http;
pub mod reports;
pub mod session;
pub mod settings;
pub mod telemetry;
pub mod test_data;
pub mod types;

pub use books::{CleanupFailure, CleanupReport};
pub use client::{ApiClient, Transport, UreqTransport};
pub use error::ApiError;
pub use http::{Body, HttpMethod, HttpRequest, HttpResponse};
pub use session::{Session, SessionError};
pub use settings::{ReportSettings, Settings};
pub use test_data::{load_book_cases, BookCase};
pub use types::{Book, BookRef, NewBook, UpdateBook, BOOK_TYPES};
