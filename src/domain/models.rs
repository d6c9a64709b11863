// Domain models shared by the remote client, the local cache and the API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shelf category a book can be filed under. Free-form labels are not
/// accepted; unknown values coming out of storage map to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fiction,
    Nonfiction,
    Textbook,
    Reference,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fiction => "fiction",
            Category::Nonfiction => "nonfiction",
            Category::Textbook => "textbook",
            Category::Reference => "reference",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fiction" => Ok(Category::Fiction),
            "nonfiction" => Ok(Category::Nonfiction),
            "textbook" => Ok(Category::Textbook),
            "reference" => Ok(Category::Reference),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// One uploaded book. `id` is unique per owner; `name` is not. The storage
/// path is persisted alongside the public URL so delete never has to derive
/// it by splitting the URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    pub file_url: String,
    pub storage_path: String,
}

/// Remote reading-position record, at most one per (owner, book).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub owner_id: Uuid,
    pub book_id: Uuid,
    pub page: i32,
    pub total_pages: i32,
    pub last_read_at: DateTime<Utc>,
}

/// Local fallback position, consulted when the remote store has no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    pub page: i32,
    pub total_pages: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for c in [
            Category::Fiction,
            Category::Nonfiction,
            Category::Textbook,
            Category::Reference,
        ] {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
        assert!("thriller".parse::<Category>().is_err());
    }

    #[test]
    fn book_row_deserialize() {
        let json = r#"{
            "id": "22809dbe-3137-4879-831e-d64a6f29b005",
            "owner_id": "b8df8f4c-5f93-4a10-812b-84ec4cee4389",
            "name": "Player's Handbook.pdf",
            "category": "reference",
            "file_url": "https://remote.example/storage/v1/object/public/books/b8df8f4c/players-handbook.pdf",
            "storage_path": "b8df8f4c/players-handbook.pdf"
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.name, "Player's Handbook.pdf");
        assert_eq!(book.category, Some(Category::Reference));
    }

    #[test]
    fn book_row_deserialize_without_category() {
        let json = r#"{
            "id": "22809dbe-3137-4879-831e-d64a6f29b005",
            "owner_id": "b8df8f4c-5f93-4a10-812b-84ec4cee4389",
            "name": "notes.pdf",
            "category": null,
            "file_url": "https://remote.example/x.pdf",
            "storage_path": "b8df8f4c/notes.pdf"
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.category, None);
    }
}
