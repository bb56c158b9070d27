// BEI Listing Dashboard - Core Library
// Exposes all modules for use in the terminal dashboard, API server, and tests

pub mod aggregate;
pub mod charts;
pub mod config;
pub mod error;
pub mod filter;
pub mod listing;
pub mod logging;
pub mod repository;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use aggregate::{aggregate, format_thousands, Summary};
pub use charts::{
    board_composition, shares_column, shares_histogram, year_column, year_histogram,
    BoardShare, Bucket, Histogram, DEFAULT_SHARES_BINS, MAX_SHARES_BINS,
};
pub use config::Config;
pub use error::DashboardError;
pub use filter::{filter, Selection};
pub use listing::{Listing, RawListing};
pub use repository::ListingRepository;

/// Dashboard title shown by every surface
pub const TITLE: &str = "Dashboard Saham Bursa Efek Indonesia";
