pub mod listing;
pub mod normalize;
pub mod scoring;

pub use listing::Listing;
pub use scoring::score_listing;
