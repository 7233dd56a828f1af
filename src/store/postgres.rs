use async_trait::async_trait;
use sqlx::PgPool;

use super::{Book, BookStore, StoreError};

/// [`BookStore`] backed by a Postgres pool. Each method is a single
/// statement; the pool is safe for concurrent checkouts by construction.
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn get_all(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, published, pages, genres, rating, isbn \
             FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn get(&self, id: i64) -> Result<Book, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, published, pages, genres, rating, isbn \
             FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::RecordNotFound)?;

        Ok(book)
    }

    async fn insert(&self, book: &mut Book) -> Result<(), StoreError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO books (title, author, published, pages, genres, rating, isbn) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.published)
        .bind(book.pages)
        .bind(&book.genres)
        .bind(book.rating)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await?;

        book.id = id;

        Ok(())
    }

    async fn update(&self, book: &Book) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE books \
             SET title = $1, author = $2, published = $3, pages = $4, \
                 genres = $5, rating = $6, isbn = $7 \
             WHERE id = $8",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.published)
        .bind(book.pages)
        .bind(&book.genres)
        .bind(book.rating)
        .bind(&book.isbn)
        .bind(book.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RecordNotFound);
        }

        Ok(())
    }
}
