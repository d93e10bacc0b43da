//! Company-Census: a resumable job-board company crawler
//!
//! This crate walks the paginated company listing of a job board, visits every
//! company's profile page, counts the job postings tagged with a target city,
//! and appends newly discovered companies to a spreadsheet snapshot so that the
//! next run can skip what is already known.

pub mod config;
pub mod crawler;
pub mod prompt;
pub mod registry;
pub mod snapshot;

use thiserror::Error;

/// Main error type for Company-Census operations
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Selector error: {0}")]
    Extract(#[from] crawler::ExtractError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlPipeline, CrawlStats};
pub use registry::{Company, CompanyDetails, CompanyRegistry, Provenance};
pub use snapshot::{SnapshotStore, XlsxSnapshotStore};
