use serde::Deserialize;

/// Main configuration structure for Company-Census
///
/// Every section falls back to its defaults, so `Config::default()` is the
/// complete configuration used when no file is given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Endpoints of the job board being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Listing URL; the page number is appended verbatim
    #[serde(rename = "list-url")]
    pub list_url: String,

    /// Host that company-relative links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Last listing page to visit (pages run 1..=max_page)
    #[serde(rename = "max-page")]
    pub max_page: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            list_url: "https://www.work.ua/ru/jobs/by-company/by-industry/it/?page=".to_string(),
            base_url: "https://www.work.ua".to_string(),
            max_page: 126,
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Delay before every listing page request (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Maximum number of companies processed concurrently for one listing page
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Substring that marks a job card as located in the target city
    #[serde(rename = "target-city")]
    pub target_city: String,

    /// First card slot scanned on a listing page (inclusive)
    #[serde(rename = "first-card-slot")]
    pub first_card_slot: u32,

    /// Last card slot scanned on a listing page (inclusive)
    #[serde(rename = "last-card-slot")]
    pub last_card_slot: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 5000,
            max_concurrent_fetches: 8,
            target_city: "Киев".to_string(),
            first_card_slot: 2,
            last_card_slot: 23,
        }
    }
}

/// Structural paths and CSS selectors for the three page shapes
///
/// Paths use the fixed-step form `tag/tag[n]/...`; absolute paths start with `/`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Content block of a listing page
    #[serde(rename = "list-block")]
    pub list_block: String,

    /// Company link inside the listing block; `{slot}` is replaced by the card slot
    #[serde(rename = "card-link")]
    pub card_link: String,

    /// Content block of a company detail page
    #[serde(rename = "detail-block")]
    pub detail_block: String,

    #[serde(rename = "company-name")]
    pub company_name: String,

    #[serde(rename = "company-website")]
    pub company_website: String,

    #[serde(rename = "description-first")]
    pub description_first: String,

    #[serde(rename = "description-second")]
    pub description_second: String,

    /// CSS selector for job cards on the city/jobs page
    #[serde(rename = "job-card")]
    pub job_card: String,

    /// CSS selector for the label inside a job card
    #[serde(rename = "job-card-label")]
    pub job_card_label: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            list_block: "/html/body/section/div/div[3]".to_string(),
            card_link: "div[{slot}]/div/div[2]/h2/a".to_string(),
            detail_block: "/html/body/section/div/div/div[1]/div[2]".to_string(),
            company_name: "div/h1".to_string(),
            company_website: "div/div/div/p/span/a".to_string(),
            description_first: "div/p[1]".to_string(),
            description_second: "div/p[2]".to_string(),
            job_card: "div.card.card-hover.card-visited.wordwrap.job-link".to_string(),
            job_card_label: "span".to_string(),
        }
    }
}

/// Snapshot output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the workbook that is read at start and extended at the end
    #[serde(rename = "workbook-path")]
    pub workbook_path: String,

    /// Companies whose name contains this marker are sole proprietors and never exported
    #[serde(rename = "sole-proprietor-marker")]
    pub sole_proprietor_marker: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            workbook_path: "companies.xlsx".to_string(),
            sole_proprietor_marker: "ФОП".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "CompanyCensus".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
