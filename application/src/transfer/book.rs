use time::PrimitiveDateTime;

use kernel::prelude::entity::{Book, BookId, BookPatch, DestructBook};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDto {
    pub id: i64,
    pub name: Option<String>,
    pub publish_date: Option<PrimitiveDateTime>,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            name,
            publish_date,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.map(String::from),
            publish_date: publish_date.map(PrimitiveDateTime::from),
        }
    }
}

pub struct GetBookDto {
    pub id: BookId,
}

pub struct CreateBookDto {
    pub name: Option<String>,
    pub publish_date: Option<PrimitiveDateTime>,
}

pub struct PatchBookDto {
    pub id: BookId,
    pub patch: BookPatch,
}

pub struct DeleteBookDto {
    pub id: BookId,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BookLookupDto {
    Found(BookDto),
    Missing { id: i64 },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BookDeletionDto {
    Deleted { id: i64, remaining: i64 },
    Missing { id: i64 },
}
