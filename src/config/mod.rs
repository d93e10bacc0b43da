//! Configuration module for Company-Census
//!
//! Every value has a built-in default matching the historical crawl target.
//! An optional TOML file overrides any subset of them.
//!
//! # Example
//!
//! ```no_run
//! use company_census::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("census.toml")).unwrap();
//! println!("Crawling {} listing pages", config.site.max_page);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, SiteConfig, UserAgentConfig};

pub use parser::{load_config, parse_config};
pub use validation::validate;
