use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod memory;
pub mod postgres;

/// A book record as the store owns it. Handlers hold a transient copy for the
/// duration of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published: i32,
    pub pages: i32,
    pub genres: Vec<String>,
    pub rating: f32,
    pub isbn: String,
}

/// Store failures form a closed set: either the record is missing or the
/// failure is opaque. Callers match on the kind, never on a message.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    RecordNotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::RecordNotFound,
            err => StoreError::Other(err.into()),
        }
    }
}

/// CRUD primitives for [`Book`] records. Implementations must be safe for
/// concurrent use; every method is a single independent operation.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn get(&self, id: i64) -> Result<Book, StoreError>;

    /// Inserts the book and writes the store-assigned id back into it.
    async fn insert(&self, book: &mut Book) -> Result<(), StoreError>;

    async fn update(&self, book: &Book) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
