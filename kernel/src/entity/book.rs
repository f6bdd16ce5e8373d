mod draft;
mod id;
mod name;
mod patch;
mod publish_date;

pub use self::{draft::*, id::*, name::*, patch::*, publish_date::*};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    name: Option<BookName>,
    publish_date: Option<PublishDate>,
}

impl Book {
    pub fn new(id: BookId, name: Option<BookName>, publish_date: Option<PublishDate>) -> Self {
        Self {
            id,
            name,
            publish_date,
        }
    }
}
