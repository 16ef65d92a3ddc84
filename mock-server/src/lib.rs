//! In-memory implementation of the Books API.
//!
//! Serves the `/v1/books` endpoints with the same status codes and error
//! messages as the real service, so the client suite can run against it
//! without any external process.

pub mod error;
pub mod model;

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::Method,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use error::{BooksError, ErrorBody};
pub use model::{Book, BookId, BookType, NewBook, UpdateBook};

use model::{IdQuery, LatestQuery, TypeQuery};

/// Books in creation order; the newest book is last.
pub type Store = Arc<RwLock<Vec<Book>>>;

pub fn app() -> Router {
    let store: Store = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route(
            "/v1/books/manipulation",
            post(add_book)
                .put(update_book)
                .delete(delete_book)
                .fallback(method_not_implemented),
        )
        .route(
            "/v1/books/latest",
            get(latest_books).fallback(method_not_implemented),
        )
        .route(
            "/v1/books/info",
            get(book_info).fallback(method_not_implemented),
        )
        .route(
            "/v1/books/ids",
            get(book_ids).fallback(method_not_implemented),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "books api listening");
    }
    axum::serve(listener, app()).await
}

fn parse_id(query: Result<Query<IdQuery>, QueryRejection>) -> Result<Uuid, BooksError> {
    let Query(IdQuery { id }) = query.map_err(|_| BooksError::InvalidRequest)?;
    // An id that is not a UUID cannot name any book.
    Uuid::parse_str(&id).map_err(|_| BooksError::NotFound)
}

async fn add_book(
    State(store): State<Store>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<Json<Book>, BooksError> {
    let Json(input) = payload.map_err(|_| BooksError::InvalidRequest)?;
    if !model::is_creation_date(&input.creation_date) {
        return Err(BooksError::InvalidRequest);
    }
    let book_type: BookType = input
        .book_type
        .parse()
        .map_err(|_| BooksError::InvalidEntity)?;
    let book = Book {
        id: Uuid::new_v4(),
        title: input.title,
        book_type,
        creation_date: input.creation_date,
        updated_date_time: None,
    };
    store.write().await.push(book.clone());
    tracing::info!(id = %book.id, book_type = %book.book_type, "book created");
    Ok(Json(book))
}

async fn delete_book(
    State(store): State<Store>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Book>, BooksError> {
    let id = parse_id(query)?;
    let mut books = store.write().await;
    let index = books
        .iter()
        .position(|book| book.id == id)
        .ok_or(BooksError::NotFound)?;
    let book = books.remove(index);
    tracing::info!(%id, "book deleted");
    Ok(Json(book))
}

async fn update_book(
    State(store): State<Store>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<Json<Book>, BooksError> {
    let id = parse_id(query)?;
    let Json(input) = payload.map_err(|_| BooksError::InvalidRequest)?;
    let mut books = store.write().await;
    let book = books
        .iter_mut()
        .find(|book| book.id == id)
        .ok_or(BooksError::NotFound)?;
    book.title = input.title;
    book.updated_date_time = Some(Utc::now());
    Ok(Json(book.clone()))
}

async fn latest_books(
    State(store): State<Store>,
    query: Result<Query<LatestQuery>, QueryRejection>,
) -> Result<Json<Vec<Book>>, BooksError> {
    let Query(LatestQuery { limit }) = query.map_err(|_| BooksError::InvalidRequest)?;
    let books = store.read().await;
    Ok(Json(books.iter().rev().take(limit).cloned().collect()))
}

async fn book_info(
    State(store): State<Store>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Book>, BooksError> {
    let id = parse_id(query)?;
    let books = store.read().await;
    books
        .iter()
        .find(|book| book.id == id)
        .cloned()
        .map(Json)
        .ok_or(BooksError::NotFound)
}

async fn book_ids(
    State(store): State<Store>,
    query: Result<Query<TypeQuery>, QueryRejection>,
) -> Result<Json<Vec<BookId>>, BooksError> {
    let Query(TypeQuery { book_type }) = query.map_err(|_| BooksError::InvalidRequest)?;
    let book_type: BookType = book_type.parse().map_err(|_| BooksError::InvalidEntity)?;
    let books = store.read().await;
    Ok(Json(
        books
            .iter()
            .filter(|book| book.book_type == book_type)
            .map(|book| BookId { id: book.id })
            .collect(),
    ))
}

async fn method_not_implemented(method: Method) -> BooksError {
    BooksError::MethodNotImplemented(method)
}
