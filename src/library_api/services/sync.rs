//! Load-time reconciliation of the local replica against the remote set.

use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::models::Book;
use crate::storage::{BookCache, BookStore};

pub struct SyncService<'a> {
    remote: &'a dyn BookStore,
    cache: &'a dyn BookCache,
}

impl<'a> SyncService<'a> {
    pub fn new(remote: &'a dyn BookStore, cache: &'a dyn BookCache) -> Self {
        Self { remote, cache }
    }

    /// Merge local set L with remote set R by book id and back-fill the
    /// local replica with every element of R \ L. Returns L ∪ (R \ L);
    /// deletions are never propagated remote → local here.
    ///
    /// Degrades rather than fails: an unreachable remote store means the
    /// caller gets the stale-but-available local set, and one failed
    /// back-fill write neither blocks the others nor drops the book from
    /// the result.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn reconcile(&self, owner_id: Uuid) -> Vec<Book> {
        let local = match self.cache.all_books(owner_id).await {
            Ok(books) => books,
            Err(e) => {
                tracing::warn!(error = %format!("{:?}", e), "local replica unreadable, starting from empty");
                Vec::new()
            }
        };

        let remote = match self.remote.books_for_owner(owner_id).await {
            Ok(books) => books,
            Err(e) => {
                tracing::warn!(error = %e, local_count = local.len(), "remote fetch failed, serving local replica only");
                return local;
            }
        };

        let known: HashSet<Uuid> = local.iter().map(|b| b.id).collect();
        let mut merged = local;
        for book in remote.into_iter().filter(|b| !known.contains(&b.id)) {
            if let Err(e) = self.cache.put_book(&book).await {
                tracing::warn!(book_id = %book.id, error = %format!("{:?}", e), "failed to back-fill local replica");
            }
            merged.push(book);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;

    use uuid::Uuid;

    use super::*;
    use crate::storage::testing::{InMemoryCache, InMemoryRemote, book};

    #[tokio::test]
    async fn reconcile_back_fills_missing_remote_books() {
        let owner = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let cache = InMemoryCache::with_books(vec![book(owner, a, "a.pdf")]);
        let remote =
            InMemoryRemote::with_books(vec![book(owner, a, "a.pdf"), book(owner, b, "b.pdf")]);

        let merged = SyncService::new(&remote, &cache).reconcile(owner).await;

        let ids: HashSet<Uuid> = merged.iter().map(|bk| bk.id).collect();
        assert_eq!(ids, HashSet::from([a, b]));
        assert_eq!(merged.len(), 2, "no duplicates");
        // Exactly one back-fill write, for "b".
        assert_eq!(cache.put_count.load(Ordering::SeqCst), 1);
        assert!(cache.books.lock().unwrap().contains_key(&b));
    }

    #[tokio::test]
    async fn reconcile_result_ids_are_the_union() {
        let owner = Uuid::new_v4();
        let only_local = Uuid::new_v4();
        let shared = Uuid::new_v4();
        let only_remote = Uuid::new_v4();
        let cache = InMemoryCache::with_books(vec![
            book(owner, only_local, "l.pdf"),
            book(owner, shared, "s.pdf"),
        ]);
        let remote = InMemoryRemote::with_books(vec![
            book(owner, shared, "s.pdf"),
            book(owner, only_remote, "r.pdf"),
        ]);

        let merged = SyncService::new(&remote, &cache).reconcile(owner).await;

        let ids: HashSet<Uuid> = merged.iter().map(|bk| bk.id).collect();
        assert_eq!(ids, HashSet::from([only_local, shared, only_remote]));
        assert_eq!(merged.len(), 3);
    }

    #[tokio::test]
    async fn remote_failure_degrades_to_local_set() {
        let owner = Uuid::new_v4();
        let a = Uuid::new_v4();
        let cache = InMemoryCache::with_books(vec![book(owner, a, "a.pdf")]);
        let remote = InMemoryRemote::with_books(vec![book(owner, Uuid::new_v4(), "b.pdf")]);
        remote.fail_book_fetch.store(true, Ordering::SeqCst);

        let merged = SyncService::new(&remote, &cache).reconcile(owner).await;

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, a);
        assert_eq!(cache.put_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn back_fill_write_failure_does_not_drop_the_book() {
        let owner = Uuid::new_v4();
        let b = Uuid::new_v4();
        let cache = InMemoryCache::default();
        cache.fail_put.store(true, Ordering::SeqCst);
        let remote = InMemoryRemote::with_books(vec![book(owner, b, "b.pdf")]);

        let merged = SyncService::new(&remote, &cache).reconcile(owner).await;

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, b);
    }

    #[tokio::test]
    async fn other_owners_books_stay_invisible() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let cache = InMemoryCache::default();
        let remote = InMemoryRemote::with_books(vec![book(stranger, Uuid::new_v4(), "x.pdf")]);

        let merged = SyncService::new(&remote, &cache).reconcile(owner).await;
        assert!(merged.is_empty());
    }
}
