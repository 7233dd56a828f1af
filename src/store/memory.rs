use std::sync::Mutex;

use async_trait::async_trait;

use super::{Book, BookStore, StoreError};

/// In-process [`BookStore`] with the same sentinel semantics as the Postgres
/// implementation. Used by the end-to-end tests.
#[derive(Default)]
pub struct MemoryBookStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    books: Vec<Book>,
    next_id: i64,
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn get_all(&self) -> Result<Vec<Book>, StoreError> {
        let inner = self.inner.lock().expect("poisoned");

        Ok(inner.books.clone())
    }

    async fn get(&self, id: i64) -> Result<Book, StoreError> {
        let inner = self.inner.lock().expect("poisoned");

        inner
            .books
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(StoreError::RecordNotFound)
    }

    async fn insert(&self, book: &mut Book) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("poisoned");

        inner.next_id += 1;
        book.id = inner.next_id;
        inner.books.push(book.clone());

        Ok(())
    }

    async fn update(&self, book: &Book) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("poisoned");

        let existing = inner
            .books
            .iter_mut()
            .find(|existing| existing.id == book.id)
            .ok_or(StoreError::RecordNotFound)?;

        *existing = book.clone();

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("poisoned");

        let before = inner.books.len();
        inner.books.retain(|book| book.id != id);

        if inner.books.len() == before {
            return Err(StoreError::RecordNotFound);
        }

        Ok(())
    }
}
