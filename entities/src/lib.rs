pub mod bookmarks;
pub mod cached_books;

pub use bookmarks::Entity as Bookmarks;
pub use cached_books::Entity as CachedBooks;
