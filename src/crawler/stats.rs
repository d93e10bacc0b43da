//! Counters collected during a crawl run

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Listing pages fetched successfully
    pub pages_visited: u32,

    /// Listing pages whose fetch failed
    pub pages_failed: u32,

    /// Company links found across all listing pages
    pub companies_seen: u32,

    /// Detail fetches that failed
    pub detail_fetch_failures: u32,

    /// City/jobs fetches that failed
    pub city_fetch_failures: u32,

    /// Records created this run
    pub companies_created: u32,

    /// Detail pages whose company name was already registered
    pub name_collisions: u32,

    /// Target-city jobs added to the registry
    pub jobs_counted: u32,
}

/// What happened while processing one company link
#[derive(Debug, Clone, Default)]
pub(crate) struct CompanyOutcome {
    pub detail_failed: bool,
    pub city_failed: bool,
    pub created: bool,
    pub collision: bool,
    pub jobs_counted: u32,
}

impl CrawlStats {
    pub(crate) fn record(&mut self, outcome: &CompanyOutcome) {
        self.companies_seen += 1;
        self.detail_fetch_failures += u32::from(outcome.detail_failed);
        self.city_fetch_failures += u32::from(outcome.city_failed);
        self.companies_created += u32::from(outcome.created);
        self.name_collisions += u32::from(outcome.collision);
        self.jobs_counted += outcome.jobs_counted;
    }

    /// Logs the statistics at info level
    pub fn log_summary(&self) {
        tracing::info!(
            "Listing pages: {} visited, {} failed",
            self.pages_visited,
            self.pages_failed
        );
        tracing::info!(
            "Companies: {} seen, {} created, {} name collisions",
            self.companies_seen,
            self.companies_created,
            self.name_collisions
        );
        tracing::info!(
            "Fetch failures: {} detail, {} city; {} target-city jobs counted",
            self.detail_fetch_failures,
            self.city_fetch_failures,
            self.jobs_counted
        );
    }
}
