pub mod connection;
pub mod listings;

pub use connection::{init_db, Database};
pub use listings::{all_listings, count_listings, get_listing_by_url, upsert_listing};
