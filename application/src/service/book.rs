use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{BookDraft, BookName, PublishDate};
use kernel::KernelError;

use crate::transfer::{
    BookDeletionDto, BookDto, BookLookupDto, CreateBookDto, DeleteBookDto, GetBookDto,
    PatchBookDto,
};

#[async_trait::async_trait]
pub trait GetAllBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_all_books(&self) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let books = self.book_query().find_all(&mut connection).await?;
        connection.commit().await?;

        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> GetAllBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<BookLookupDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = dto.id;
        let found = if self.book_query().exists(&mut connection, &id).await? {
            self.book_query().find_by_id(&mut connection, &id).await?
        } else {
            None
        };
        connection.commit().await?;

        Ok(match found {
            Some(book) => BookLookupDto::Found(BookDto::from(book)),
            None => BookLookupDto::Missing { id: id.into() },
        })
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn create_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let draft = BookDraft::new(
            dto.name.map(BookName::new),
            dto.publish_date.map(PublishDate::new),
        );
        let book = self.book_modifier().create(&mut connection, &draft).await?;
        connection.commit().await?;

        tracing::info!(id = %book.id(), "book created");
        Ok(BookDto::from(book))
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait PatchBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    /// Applies the patch to the book at `dto.id`, or saves it as a new book when there is none.
    ///
    /// A new book gets the next id of the store, which is not necessarily `dto.id`.
    async fn patch_book(&self, dto: PatchBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let PatchBookDto { id, patch } = dto;
        let current = self
            .book_query()
            .find_by_id_for_update(&mut connection, &id)
            .await?;

        let book = match current {
            None => {
                let book = self
                    .book_modifier()
                    .create(&mut connection, &patch.into_draft())
                    .await?;
                tracing::info!(requested = %id, assigned = %book.id(), "book upserted by patch");
                book
            }
            Some(current) => {
                tracing::debug!(id = %id, fields = patch.fields().len(), "patching book");
                let book = patch.apply(current);
                self.book_modifier().update(&mut connection, &book).await?;
                book
            }
        };
        connection.commit().await?;

        Ok(BookDto::from(book))
    }
}

impl<T> PatchBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    async fn delete_book(
        &self,
        dto: DeleteBookDto,
    ) -> error_stack::Result<BookDeletionDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = dto.id;
        if !self.book_query().exists(&mut connection, &id).await? {
            connection.roll_back().await?;
            return Ok(BookDeletionDto::Missing { id: id.into() });
        }

        self.book_modifier().delete(&mut connection, &id).await?;
        let remaining = self.book_query().count(&mut connection).await?;
        connection.commit().await?;

        tracing::info!(id = %id, remaining, "book deleted");
        Ok(BookDeletionDto::Deleted {
            id: id.into(),
            remaining,
        })
    }
}

impl<T> DeleteBookService for T where T: DependOnBookQuery + DependOnBookModifier {}
