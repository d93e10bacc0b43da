//! Crawl pipeline - listing, detail and city/jobs stages
//!
//! Each listing page goes through the same sequence:
//! 1. Fetch the listing page (after the fixed delay) and read the card window
//! 2. Fan out over the company links, a bounded number at a time
//! 3. For each company, fetch the detail page and the city/jobs page concurrently
//! 4. Register the company from the detail page, then count its target-city jobs
//! 5. Move on once every company of the page has resolved
//!
//! Fetch failures are logged and skipped at page or company granularity.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::pages::{count_city_jobs, parse_detail_page, parse_list_page, PageSelectors};
use crate::crawler::stats::{CompanyOutcome, CrawlStats};
use crate::registry::CompanyRegistry;
use crate::CensusError;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Orchestrates the three fetch stages and feeds the registry
pub struct CrawlPipeline {
    config: Arc<Config>,
    fetcher: PageFetcher,
    selectors: PageSelectors,
    base_url: Url,
}

impl CrawlPipeline {
    /// Creates a pipeline with an HTTP client built from the configuration
    pub fn new(config: Arc<Config>) -> Result<Self, CensusError> {
        let fetcher = PageFetcher::from_config(&config.user_agent, &config.crawler)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a pipeline around an existing fetcher
    ///
    /// The configuration is validated first, so built-in defaults and file
    /// overrides go through the same checks.
    pub fn with_fetcher(config: Arc<Config>, fetcher: PageFetcher) -> Result<Self, CensusError> {
        validate(&config)?;
        let selectors = PageSelectors::compile(&config.selectors, &config.crawler)?;
        let base_url = Url::parse(&config.site.base_url)?;

        Ok(Self {
            config,
            fetcher,
            selectors,
            base_url,
        })
    }

    /// Crawls listing pages `1..=max_page`, mutating `registry`
    ///
    /// Never fails: every error below the run level is logged and counted.
    pub async fn run(&self, registry: &CompanyRegistry) -> CrawlStats {
        let mut stats = CrawlStats::default();
        let start_time = std::time::Instant::now();

        for page in 1..=self.config.site.max_page {
            self.crawl_page(page, registry, &mut stats).await;
        }

        tracing::info!(
            "Crawl finished: {} listing pages in {:?}, registry holds {} companies",
            self.config.site.max_page,
            start_time.elapsed(),
            registry.len()
        );

        stats
    }

    /// Processes one listing page and all of its companies
    pub async fn crawl_page(&self, page: u32, registry: &CompanyRegistry, stats: &mut CrawlStats) {
        tracing::info!("Parsing page #{}", page);
        let list_url = format!("{}{}", self.config.site.list_url, page);

        let body = match self.fetcher.fetch_list_page(&list_url).await {
            FetchResult::Success { body, .. } => body,
            failure => {
                tracing::error!("Failed to fetch listing page {}: {}", list_url, failure);
                stats.pages_failed += 1;
                return;
            }
        };
        stats.pages_visited += 1;

        // A link repeated across card slots is crawled once per page
        let mut seen = HashSet::new();
        let links: Vec<String> = parse_list_page(&body, &self.selectors)
            .into_iter()
            .filter_map(|href| self.resolve_company_link(&href))
            .filter(|link| seen.insert(link.clone()))
            .collect();

        if links.is_empty() {
            tracing::warn!("No company cards found on {}", list_url);
            return;
        }

        let outcomes: Vec<CompanyOutcome> = stream::iter(links)
            .map(|company_url| self.crawl_company(company_url, registry))
            .buffer_unordered(self.config.crawler.max_concurrent_fetches)
            .collect()
            .await;

        let created = outcomes.iter().filter(|o| o.created).count();
        for outcome in &outcomes {
            stats.record(outcome);
        }

        tracing::info!(
            "Page #{} done: {} companies, {} new",
            page,
            outcomes.len(),
            created
        );
    }

    /// Runs the detail and city sub-fetches for one company
    ///
    /// Both fetches run concurrently; job counts are applied after the
    /// detail stage so they only ever follow a registration attempt.
    async fn crawl_company(
        &self,
        company_url: String,
        registry: &CompanyRegistry,
    ) -> CompanyOutcome {
        let mut outcome = CompanyOutcome::default();

        let (detail, city) = tokio::join!(
            self.fetcher.fetch(&company_url),
            self.fetcher.fetch(&company_url)
        );

        match detail {
            FetchResult::Success { body, .. } => {
                self.register_company(&company_url, &body, registry, &mut outcome)
            }
            failure => {
                tracing::warn!("Failed to fetch company page {}: {}", company_url, failure);
                outcome.detail_failed = true;
            }
        }

        match city {
            FetchResult::Success { body, .. } => {
                self.count_jobs(&company_url, &body, registry, &mut outcome)
            }
            failure => {
                tracing::warn!("Failed to fetch jobs of {}: {}", company_url, failure);
                outcome.city_failed = true;
            }
        }

        outcome
    }

    fn register_company(
        &self,
        company_url: &str,
        body: &str,
        registry: &CompanyRegistry,
        outcome: &mut CompanyOutcome,
    ) {
        let Some(details) = parse_detail_page(body, &self.selectors) else {
            tracing::warn!("No company block on {}", company_url);
            return;
        };

        let (company, created) = registry.get_or_create(company_url, details);
        if created {
            tracing::info!("Creating new company: {}", company.name());
            outcome.created = true;
        } else {
            tracing::info!(
                "Found same company: {} (registered as {})",
                company.name(),
                company.work_url()
            );
            outcome.collision = true;
        }
    }

    fn count_jobs(
        &self,
        company_url: &str,
        body: &str,
        registry: &CompanyRegistry,
        outcome: &mut CompanyOutcome,
    ) {
        let matches = count_city_jobs(body, &self.selectors, &self.config.crawler.target_city);

        for _ in 0..matches {
            match registry.increment_jobs(company_url) {
                Ok(_) => outcome.jobs_counted += 1,
                Err(e) => {
                    tracing::warn!("Dropping {} job(s): {}", matches, e);
                    break;
                }
            }
        }
    }

    /// Resolves a card link against the site's base URL
    fn resolve_company_link(&self, href: &str) -> Option<String> {
        match self.base_url.join(href) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::warn!("Skipping malformed company link {}: {}", href, e);
                None
            }
        }
    }
}
