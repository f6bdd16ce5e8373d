use destructure::Destructure;
use vodca::References;

use crate::entity::{BookName, PublishDate};

/// A book that has not been saved yet, so the store has not assigned it an id.
#[derive(Debug, Clone, Default, Eq, PartialEq, References, Destructure)]
pub struct BookDraft {
    name: Option<BookName>,
    publish_date: Option<PublishDate>,
}

impl BookDraft {
    pub fn new(name: Option<BookName>, publish_date: Option<PublishDate>) -> Self {
        Self { name, publish_date }
    }
}
