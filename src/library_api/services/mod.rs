pub mod books;
pub mod health;
pub mod progress;
pub mod sync;
