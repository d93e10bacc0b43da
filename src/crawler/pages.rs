//! Parsers for the three page shapes of the job board
//!
//! Each parser takes a fetched body and returns plain data, so no parsed
//! document is held across an `.await`.

use crate::config::{CrawlerConfig, SelectorConfig};
use crate::crawler::extractor::{
    child_attr, child_text, compile_selector, descendant_text, extract_by_path, select_all,
    ExtractError, XPath,
};
use crate::registry::CompanyDetails;
use scraper::{Html, Selector};

/// Compiled paths and selectors for listing, detail and city/jobs pages
#[derive(Debug, Clone)]
pub struct PageSelectors {
    list_block: XPath,
    card_links: Vec<(u32, XPath)>,
    detail_block: XPath,
    company_name: XPath,
    company_website: XPath,
    description_first: XPath,
    description_second: XPath,
    job_card: Selector,
    job_card_label: Selector,
}

impl PageSelectors {
    /// Compiles the configured selectors
    ///
    /// One card-link path is compiled per slot of the fixed card window.
    pub fn compile(
        selectors: &SelectorConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, ExtractError> {
        let card_links = (crawler.first_card_slot..=crawler.last_card_slot)
            .map(|slot| {
                let path = selectors.card_link.replace("{slot}", &slot.to_string());
                path.parse().map(|xpath| (slot, xpath))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            list_block: selectors.list_block.parse()?,
            card_links,
            detail_block: selectors.detail_block.parse()?,
            company_name: selectors.company_name.parse()?,
            company_website: selectors.company_website.parse()?,
            description_first: selectors.description_first.parse()?,
            description_second: selectors.description_second.parse()?,
            job_card: compile_selector(&selectors.job_card)?,
            job_card_label: compile_selector(&selectors.job_card_label)?,
        })
    }
}

/// Extracts the company links of a listing page
///
/// Scans the fixed card window; slots whose link is missing or empty are
/// skipped. Returns the raw `href` values in slot order.
pub fn parse_list_page(body: &str, selectors: &PageSelectors) -> Vec<String> {
    let document = Html::parse_document(body);

    let Some(block) = extract_by_path(&document, &selectors.list_block) else {
        tracing::debug!("Listing block {} not found", selectors.list_block);
        return Vec::new();
    };

    selectors
        .card_links
        .iter()
        .filter_map(|(slot, path)| {
            let href = child_attr(block, path, "href");
            if href.is_empty() {
                tracing::trace!("Card slot {} is empty", slot);
                None
            } else {
                Some(href)
            }
        })
        .collect()
}

/// Extracts name, website and description from a company detail page
///
/// Returns `None` when the page has no detail block at all. Individual
/// fields that are absent come back as empty strings.
pub fn parse_detail_page(body: &str, selectors: &PageSelectors) -> Option<CompanyDetails> {
    let document = Html::parse_document(body);
    let block = extract_by_path(&document, &selectors.detail_block)?;

    let description = format!(
        "{} {}",
        child_text(block, &selectors.description_first),
        child_text(block, &selectors.description_second)
    );

    Some(CompanyDetails {
        name: child_text(block, &selectors.company_name),
        website: child_attr(block, &selectors.company_website, "href"),
        description,
    })
}

/// Counts the job cards whose label mentions the target city
pub fn count_city_jobs(body: &str, selectors: &PageSelectors, target_city: &str) -> usize {
    let document = Html::parse_document(body);

    select_all(&document, &selectors.job_card)
        .filter(|card| descendant_text(*card, &selectors.job_card_label).contains(target_city))
        .count()
}
