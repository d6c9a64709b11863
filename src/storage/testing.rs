//! In-memory fakes for the storage seams, shared by service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use uuid::Uuid;

use crate::domain::models::{Book, Bookmark, ProgressRecord};
use crate::remote_client::RemoteError;
use crate::storage::{BlobStore, BookCache, BookStore, ProgressStore};

fn unavailable() -> RemoteError {
    RemoteError::Status {
        status: 503,
        message: "remote unavailable".to_string(),
    }
}

/// Fake hosted backend: book rows, progress records and blobs, with
/// per-operation failure switches.
#[derive(Default)]
pub struct InMemoryRemote {
    pub books: Mutex<Vec<Book>>,
    pub progress: Mutex<HashMap<(Uuid, Uuid), ProgressRecord>>,
    pub blobs: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_book_fetch: AtomicBool,
    pub fail_book_insert: AtomicBool,
    pub fail_blob_put: AtomicBool,
    pub fail_blob_delete: AtomicBool,
    pub fail_progress_fetch: AtomicBool,
    pub fail_progress_delete: AtomicBool,
}

impl InMemoryRemote {
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl BookStore for InMemoryRemote {
    async fn books_for_owner(&self, owner_id: Uuid) -> Result<Vec<Book>, RemoteError> {
        if self.fail_book_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let books = self.books.lock().unwrap();
        Ok(books
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_book(&self, book: &Book) -> Result<(), RemoteError> {
        if self.fail_book_insert.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.books.lock().unwrap().push(book.clone());
        Ok(())
    }

    async fn find_books_by_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> Result<Vec<Book>, RemoteError> {
        if self.fail_book_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let books = self.books.lock().unwrap();
        Ok(books
            .iter()
            .filter(|b| b.owner_id == owner_id && b.name == name)
            .cloned()
            .collect())
    }

    async fn delete_books_by_name(&self, owner_id: Uuid, name: &str) -> Result<(), RemoteError> {
        let mut books = self.books.lock().unwrap();
        books.retain(|b| !(b.owner_id == owner_id && b.name == name));
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProgressStore for InMemoryRemote {
    async fn fetch_progress(
        &self,
        owner_id: Uuid,
        book_id: Uuid,
    ) -> Result<Option<ProgressRecord>, RemoteError> {
        if self.fail_progress_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self
            .progress
            .lock()
            .unwrap()
            .get(&(owner_id, book_id))
            .cloned())
    }

    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), RemoteError> {
        self.progress
            .lock()
            .unwrap()
            .insert((record.owner_id, record.book_id), record.clone());
        Ok(())
    }

    async fn delete_progress(&self, owner_id: Uuid, book_id: Uuid) -> Result<(), RemoteError> {
        if self.fail_progress_delete.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.progress.lock().unwrap().remove(&(owner_id, book_id));
        Ok(())
    }
}

#[async_trait::async_trait]
impl BlobStore for InMemoryRemote {
    async fn put_object(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), RemoteError> {
        if self.fail_blob_put.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.blobs.lock().unwrap().insert(path.to_string(), bytes);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://remote.test/storage/v1/object/public/books/{}", path)
    }

    async fn delete_object(&self, path: &str) -> Result<(), RemoteError> {
        if self.fail_blob_delete.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        match self.blobs.lock().unwrap().remove(path) {
            Some(_) => Ok(()),
            None => Err(RemoteError::NotFound),
        }
    }
}

/// Fake local replica. Counts `put_book` calls so reconciler tests can
/// assert how many back-fills happened.
#[derive(Default)]
pub struct InMemoryCache {
    pub books: Mutex<HashMap<Uuid, Book>>,
    pub bookmarks: Mutex<HashMap<(Uuid, Uuid), Bookmark>>,
    pub fail_put: AtomicBool,
    pub put_count: AtomicUsize,
}

impl InMemoryCache {
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books.into_iter().map(|b| (b.id, b)).collect()),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl BookCache for InMemoryCache {
    async fn all_books(&self, owner_id: Uuid) -> anyhow::Result<Vec<Book>> {
        let mut books: Vec<Book> = self
            .books
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect();
        books.sort_by_key(|b| b.id);
        Ok(books)
    }

    async fn get_book(&self, book_id: Uuid) -> anyhow::Result<Option<Book>> {
        Ok(self.books.lock().unwrap().get(&book_id).cloned())
    }

    async fn put_book(&self, book: &Book) -> anyhow::Result<()> {
        self.put_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            anyhow::bail!("local replica write failed");
        }
        self.books.lock().unwrap().insert(book.id, book.clone());
        Ok(())
    }

    async fn delete_book(&self, book_id: Uuid) -> anyhow::Result<()> {
        self.books.lock().unwrap().remove(&book_id);
        self.bookmarks
            .lock()
            .unwrap()
            .retain(|(_, b), _| *b != book_id);
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.books.lock().unwrap().clear();
        self.bookmarks.lock().unwrap().clear();
        Ok(())
    }

    async fn bookmark(&self, owner_id: Uuid, book_id: Uuid) -> anyhow::Result<Option<Bookmark>> {
        Ok(self
            .bookmarks
            .lock()
            .unwrap()
            .get(&(owner_id, book_id))
            .copied())
    }

    async fn set_bookmark(
        &self,
        owner_id: Uuid,
        book_id: Uuid,
        page: i32,
        total_pages: i32,
    ) -> anyhow::Result<()> {
        self.bookmarks
            .lock()
            .unwrap()
            .insert((owner_id, book_id), Bookmark { page, total_pages });
        Ok(())
    }
}

/// Build a book for tests.
pub fn book(owner_id: Uuid, id: Uuid, name: &str) -> Book {
    Book {
        id,
        owner_id,
        name: name.to_string(),
        category: None,
        file_url: format!("https://remote.test/storage/v1/object/public/books/{owner_id}/{id}.pdf"),
        storage_path: format!("{owner_id}/{id}.pdf"),
    }
}
