// Library interface for brand_grid_scraper
// This allows tests and external crates to use the scraper components

pub mod browser_client;
pub mod collector;
pub mod config;
pub mod fetcher;
pub mod grid;
pub mod ledger;
pub mod metrics;
pub mod models;
