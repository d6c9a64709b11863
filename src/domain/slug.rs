//! Storage-path construction for uploaded blobs.

use rslug::slugify;
use uuid::Uuid;

/// URL-safe slug of a display name: ASCII lowercase, word characters and
/// hyphens only. Names with nothing usable left fall back to "book".
pub fn slug_name(name: &str) -> String {
    let slug = slugify!(name);
    if slug.is_empty() {
        "book".to_string()
    } else {
        slug
    }
}

/// Bucket path for a book's PDF payload, keyed by owner and book id so two
/// books with the same display name never collide.
pub fn storage_path(owner_id: Uuid, book_id: Uuid, name: &str) -> String {
    format!("{}/{}-{}.pdf", owner_id, slug_name(name), book_id)
}
