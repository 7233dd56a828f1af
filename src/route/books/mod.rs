use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::Book;

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;

/// Creation input: every [`Book`] field except `id`. Absent members decode to
/// their zero values, so there is no absent/zero distinction on create.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub published: i32,
    pub pages: i32,
    #[serde(deserialize_with = "genres_null_as_empty")]
    pub genres: Vec<String>,
    pub rating: f32,
    pub isbn: String,
}

impl CreateBook {
    /// Builds the entity to insert; the store assigns the id.
    pub fn into_book(self) -> Book {
        Book {
            id: 0,
            title: self.title,
            author: self.author,
            published: self.published,
            pages: self.pages,
            genres: self.genres,
            rating: self.rating,
            isbn: self.isbn,
        }
    }
}

/// Partial-update input: `Option` per field. Only present-with-value members
/// overwrite; an explicit `null` decodes to `None` and, like an absent
/// member, leaves the stored value untouched.
///
/// `genres` is the exception: a plain sequence that replaces the stored one
/// only when non-empty. A client therefore cannot clear genres through this
/// endpoint. Kept as documented behavior.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published: Option<i32>,
    pub pages: Option<i32>,
    #[serde(deserialize_with = "genres_null_as_empty")]
    pub genres: Vec<String>,
    pub rating: Option<f32>,
    pub isbn: Option<String>,
}

// An explicit `null` for a sequence decodes like an absent member: empty.
fn genres_null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let genres = Option::<Vec<String>>::deserialize(deserializer)?;

    Ok(genres.unwrap_or_default())
}

/// Applies a partial update onto a loaded book. Pure: no I/O, persistence is
/// the caller's follow-up store call.
///
/// Present fields overwrite, explicit empty string or zero included. Absent
/// fields leave the loaded value untouched.
pub fn apply_update(mut book: Book, update: &UpdateBook) -> Book {
    if let Some(title) = &update.title {
        book.title = title.clone();
    }

    if let Some(author) = &update.author {
        book.author = author.clone();
    }

    if let Some(published) = update.published {
        book.published = published;
    }

    if let Some(pages) = update.pages {
        book.pages = pages;
    }

    if !update.genres.is_empty() {
        book.genres = update.genres.clone();
    }

    if let Some(rating) = update.rating {
        book.rating = rating;
    }

    if let Some(isbn) = &update.isbn {
        book.isbn = isbn.clone();
    }

    book
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_book() -> Book {
        Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            published: 1965,
            pages: 412,
            genres: vec!["scifi".to_string()],
            rating: 4.8,
            isbn: "0441013597".to_string(),
        }
    }

    #[test]
    fn absent_fields_leave_the_book_untouched() {
        let book = apply_update(loaded_book(), &UpdateBook::default());

        assert_eq!(book, loaded_book());
    }

    #[test]
    fn present_fields_overwrite_exactly_those_fields() {
        let update = UpdateBook {
            rating: Some(4.9),
            ..Default::default()
        };

        let book = apply_update(loaded_book(), &update);

        assert_eq!(book.rating, 4.9);
        assert_eq!(
            Book {
                rating: loaded_book().rating,
                ..book
            },
            loaded_book()
        );
    }

    #[test]
    fn present_empty_string_overwrites() {
        let update = UpdateBook {
            title: Some(String::new()),
            ..Default::default()
        };

        let book = apply_update(loaded_book(), &update);

        assert_eq!(book.title, "");
    }

    #[test]
    fn empty_genres_are_left_unchanged() {
        let update = UpdateBook {
            genres: vec![],
            ..Default::default()
        };

        let book = apply_update(loaded_book(), &update);

        assert_eq!(book.genres, vec!["scifi".to_string()]);
    }

    #[test]
    fn non_empty_genres_replace_wholesale() {
        let update = UpdateBook {
            genres: vec!["classic".to_string(), "epic".to_string()],
            ..Default::default()
        };

        let book = apply_update(loaded_book(), &update);

        assert_eq!(book.genres, vec!["classic".to_string(), "epic".to_string()]);
    }

    #[test]
    fn null_genres_decode_as_empty_on_both_inputs() {
        let update: UpdateBook = serde_json::from_str(r#"{"genres":null}"#).unwrap();
        assert!(update.genres.is_empty());

        let create: CreateBook =
            serde_json::from_str(r#"{"title":"Dune","genres":null}"#).unwrap();
        assert!(create.genres.is_empty());
    }

    #[test]
    fn create_input_defaults_to_zero_values() {
        let create: CreateBook = serde_json::from_str(r#"{"title":"Dune"}"#).unwrap();

        assert_eq!(create.title, "Dune");
        assert_eq!(create.author, "");
        assert_eq!(create.pages, 0);
        assert!(create.genres.is_empty());
    }
}
