//! SQLite storage implementation for scrape subscriptions.

mod model;
mod repository;

pub use model::SubscriptionDB;
pub use repository::SubscriptionRepository;
pub(crate) use repository::touch_last_scraped;
