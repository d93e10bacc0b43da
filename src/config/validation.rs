use crate::config::types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, SiteConfig};
use crate::crawler::XPath;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound on concurrently processed companies
const MAX_CONCURRENT_FETCHES: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the job board endpoints
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("list-url", &config.list_url)?;
    validate_http_url("base-url", &config.base_url)?;

    if config.max_page < 1 {
        return Err(ConfigError::Validation(format!(
            "max-page must be >= 1, got {}",
            config.max_page
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    if config.target_city.trim().is_empty() {
        return Err(ConfigError::Validation(
            "target-city cannot be empty".to_string(),
        ));
    }

    if config.first_card_slot < 1 || config.first_card_slot > config.last_card_slot {
        return Err(ConfigError::Validation(format!(
            "card slots must satisfy 1 <= first-card-slot <= last-card-slot, got {}..={}",
            config.first_card_slot, config.last_card_slot
        )));
    }

    Ok(())
}

/// Validates that every structural path and CSS selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    if !config.card_link.contains("{slot}") {
        return Err(ConfigError::Validation(format!(
            "card-link must contain the {{slot}} placeholder, got '{}'",
            config.card_link
        )));
    }

    let paths = [
        ("list-block", config.list_block.clone()),
        ("card-link", config.card_link.replace("{slot}", "1")),
        ("detail-block", config.detail_block.clone()),
        ("company-name", config.company_name.clone()),
        ("company-website", config.company_website.clone()),
        ("description-first", config.description_first.clone()),
        ("description-second", config.description_second.clone()),
    ];

    for (key, path) in &paths {
        path.parse::<XPath>()
            .map_err(|e| ConfigError::Validation(format!("{} is not a valid path: {}", key, e)))?;
    }

    for (key, css) in [
        ("job-card", &config.job_card),
        ("job-card-label", &config.job_card_label),
    ] {
        Selector::parse(css).map_err(|e| {
            ConfigError::Validation(format!("{} is not a valid CSS selector: {:?}", key, e))
        })?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.workbook_path.is_empty() {
        return Err(ConfigError::Validation(
            "workbook-path cannot be empty".to_string(),
        ));
    }

    if config.sole_proprietor_marker.is_empty() {
        return Err(ConfigError::Validation(
            "sole-proprietor-marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a URL parses and uses an HTTP(S) scheme
fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            key, value
        )));
    }

    Ok(())
}
