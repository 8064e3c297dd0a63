//! SQLite storage implementation for scraped ads.

mod model;
mod repository;

pub use model::AdDB;
pub use repository::AdRepository;
