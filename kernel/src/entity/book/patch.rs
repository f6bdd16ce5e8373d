use crate::entity::{Book, BookDraft, BookName, DestructBook, DestructBookDraft, PublishDate};

/// A single field assignment. Each variant replaces the whole field.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BookField {
    Name(Option<BookName>),
    PublishDate(Option<PublishDate>),
}

impl BookField {
    fn write(self, name: &mut Option<BookName>, publish_date: &mut Option<PublishDate>) {
        match self {
            BookField::Name(value) => *name = value,
            BookField::PublishDate(value) => *publish_date = value,
        }
    }
}

/// Ordered field assignments. A later assignment to the same field wins.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct BookPatch(Vec<BookField>);

impl BookPatch {
    pub fn new(fields: impl IntoIterator<Item = BookField>) -> Self {
        Self(fields.into_iter().collect())
    }

    pub fn fields(&self) -> &[BookField] {
        &self.0
    }

    /// Overwrites the mentioned fields of a saved book, keeping its id.
    pub fn apply(self, book: Book) -> Book {
        let DestructBook {
            id,
            mut name,
            mut publish_date,
        } = book.into_destruct();
        self.0
            .into_iter()
            .for_each(|field| field.write(&mut name, &mut publish_date));
        Book::new(id, name, publish_date)
    }

    /// Builds a new record from the patch alone. Fields it does not mention stay empty.
    pub fn into_draft(self) -> BookDraft {
        let DestructBookDraft {
            mut name,
            mut publish_date,
        } = BookDraft::default().into_destruct();
        self.0
            .into_iter()
            .for_each(|field| field.write(&mut name, &mut publish_date));
        BookDraft::new(name, publish_date)
    }
}

impl FromIterator<BookField> for BookPatch {
    fn from_iter<T: IntoIterator<Item = BookField>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use crate::entity::{Book, BookDraft, BookField, BookId, BookName, BookPatch, PublishDate};

    fn stored() -> Book {
        Book::new(
            BookId::new(1),
            Some(BookName::new("sorcerer's stone")),
            Some(PublishDate::new(datetime!(1997-06-26 00:00))),
        )
    }

    #[test]
    fn apply_replaces_only_mentioned_fields() {
        let patch = BookPatch::new([BookField::Name(Some(BookName::new(
            "philosopher's stone",
        )))]);
        let patched = patch.apply(stored());

        assert_eq!(patched.id(), &BookId::new(1));
        assert_eq!(patched.name(), &Some(BookName::new("philosopher's stone")));
        assert_eq!(patched.publish_date(), stored().publish_date());
    }

    #[test]
    fn apply_can_clear_a_field() {
        let patched = BookPatch::new([BookField::PublishDate(None)]).apply(stored());
        assert_eq!(patched.publish_date(), &None);
        assert_eq!(patched.name(), stored().name());
    }

    #[test]
    fn last_assignment_wins() {
        let patch = BookPatch::new([
            BookField::Name(Some(BookName::new("first"))),
            BookField::Name(Some(BookName::new("second"))),
        ]);
        assert_eq!(patch.apply(stored()).name(), &Some(BookName::new("second")));
    }

    #[test]
    fn empty_patch_keeps_book() {
        assert_eq!(BookPatch::default().apply(stored()), stored());
    }

    #[test]
    fn draft_leaves_unmentioned_fields_empty() {
        let draft = BookPatch::new([BookField::Name(Some(BookName::new("chamber of secrets")))])
            .into_draft();
        assert_eq!(
            draft,
            BookDraft::new(Some(BookName::new("chamber of secrets")), None)
        );
    }
}
