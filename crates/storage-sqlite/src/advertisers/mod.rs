//! SQLite storage implementation for advertisers.

mod model;
mod repository;

pub use model::AdvertiserDB;
pub use repository::AdvertiserRepository;
pub(crate) use repository::upsert_scraped;
