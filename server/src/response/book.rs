use application::transfer::{BookDeletionDto, BookDto, BookLookupDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::{BookId, BookName, PublishDate};
use serde::Serialize;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookBody {
    id: BookId,
    name: Option<BookName>,
    publish_date: Option<PublishDate>,
}

impl From<BookDto> for BookBody {
    fn from(value: BookDto) -> Self {
        Self {
            id: BookId::new(value.id),
            name: value.name.map(BookName::new),
            publish_date: value.publish_date.map(PublishDate::new),
        }
    }
}

/// Every book endpoint answers through this type. Missing books are reported
/// in the body as text, so the status is always `200 OK`.
#[derive(Debug)]
pub enum BookResponse {
    Book(BookBody),
    Books(Vec<BookBody>),
    Message(String),
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        let body = match self {
            BookResponse::Book(book) => axum::Json(book).into_response(),
            BookResponse::Books(books) => axum::Json(books).into_response(),
            BookResponse::Message(message) => message.into_response(),
        };
        (StatusCode::OK, body).into_response()
    }
}

fn missing(id: i64) -> BookResponse {
    BookResponse::Message(format!("There is no book with id {id}"))
}

pub struct BookPresenter;

impl Exhaust<BookDto> for BookPresenter {
    type To = BookResponse;
    fn emit(&self, input: BookDto) -> Self::To {
        BookResponse::Book(BookBody::from(input))
    }
}

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = BookResponse;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        BookResponse::Books(input.into_iter().map(BookBody::from).collect())
    }
}

impl Exhaust<BookLookupDto> for BookPresenter {
    type To = BookResponse;
    fn emit(&self, input: BookLookupDto) -> Self::To {
        match input {
            BookLookupDto::Found(book) => BookResponse::Book(BookBody::from(book)),
            BookLookupDto::Missing { id } => missing(id),
        }
    }
}

impl Exhaust<BookDeletionDto> for BookPresenter {
    type To = BookResponse;
    fn emit(&self, input: BookDeletionDto) -> Self::To {
        match input {
            BookDeletionDto::Deleted { id, remaining } => BookResponse::Message(format!(
                "Book {id} has been deleted - {remaining} remaining"
            )),
            BookDeletionDto::Missing { id } => missing(id),
        }
    }
}
