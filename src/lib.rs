pub mod error;
pub mod models;
pub mod output;
pub mod scrapers;

pub use error::{Result, ScrapeError};
