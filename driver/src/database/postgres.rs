use std::ops::{Deref, DerefMut};

use error_stack::Report;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::book::*;
use self::book::PgBookInternal;

mod book;

static POSTGRES_URL: &str = "POSTGRES_URL";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = Pool::connect(&url).await.convert_error()?;
        PgBookInternal::create_table(&pool).await?;
        tracing::info!("connected to postgres");
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresConnection;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresConnection(con))
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

pub struct PostgresConnection(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresConnection {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SQLSTATE codes of transactions aborted by a conflicting one.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

fn is_conflict(code: Option<&str>) -> bool {
    matches!(code, Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED))
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                Error::PoolTimedOut => KernelError::Timeout,
                Error::Database(e) if is_conflict(e.code().as_deref()) => {
                    KernelError::Concurrency
                }
                _ => KernelError::Internal,
            };
            Report::from(error).change_context(context)
        })
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::KernelError;

    use crate::database::postgres::{is_conflict, PostgresDatabase};
    use crate::error::ConvertError;

    #[test]
    fn conflict_codes() {
        assert!(is_conflict(Some("40001")));
        assert!(is_conflict(Some("40P01")));
        assert!(!is_conflict(Some("23505")));
        assert!(!is_conflict(None));
    }

    #[test]
    fn pool_timeout_is_timeout() {
        let error = Err::<(), _>(sqlx::Error::PoolTimedOut)
            .convert_error()
            .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Timeout));
    }

    #[test]
    fn missing_row_is_internal() {
        let error = Err::<(), _>(sqlx::Error::RowNotFound)
            .convert_error()
            .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Internal));
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn serialization_failure_is_concurrency() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;

        // language=postgresql
        let error = sqlx::query(
            r#"
            DO $$ BEGIN RAISE EXCEPTION 'conflict' USING ERRCODE = 'serialization_failure'; END $$
            "#,
        )
        .execute(&mut *connection)
        .await
        .convert_error()
        .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Concurrency));

        connection.roll_back().await?;
        Ok(())
    }
}
