//! Crawler module for the job board
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with the fixed listing-page delay
//! - Fixed-path and CSS extraction
//! - Parsers for listing, detail and city/jobs pages
//! - The crawl pipeline that feeds the company registry

mod extractor;
mod fetcher;
mod pages;
mod pipeline;
mod stats;

pub use extractor::{
    child_attr, child_text, compile_selector, descendant_text, extract_by_path, select_all,
    ExtractError, XPath,
};
pub use fetcher::{build_http_client, FetchResult, PageFetcher};
pub use pages::{count_city_jobs, parse_detail_page, parse_list_page, PageSelectors};
pub use pipeline::CrawlPipeline;
pub use stats::CrawlStats;
