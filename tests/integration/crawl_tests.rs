//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and company pages and run the
//! full load, crawl and save cycle end-to-end.

use calamine::{open_workbook, Reader, Xlsx};
use company_census::config::Config;
use company_census::crawler::CrawlPipeline;
use company_census::registry::CompanyRegistry;
use company_census::snapshot::{SnapshotStore, XlsxSnapshotStore, COLUMN_HEADERS};
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, max_page: u32, workbook: &Path) -> Config {
    let mut config = Config::default();
    config.site.list_url = format!("{}/companies?page=", server.uri());
    config.site.base_url = server.uri();
    config.site.max_page = max_page;
    config.crawler.page_delay_ms = 0;
    config.crawler.max_concurrent_fetches = 4;
    config.output.workbook_path = workbook.display().to_string();
    config
}

/// Listing page with company links starting at card slot 2
fn list_page(links: &[String]) -> String {
    let cards: String = links
        .iter()
        .map(|link| {
            format!(
                r#"<div><div><div><img src="logo.png"></div><div><h2><a href="{}">Company</a></h2><p>IT</p></div></div></div>"#,
                link
            )
        })
        .collect();

    format!(
        r#"<html><head><title>IT companies</title></head><body><section><div>
            <div>search</div>
            <div>breadcrumbs</div>
            <div><div>Companies in IT</div>{}</div>
        </div></section></body></html>"#,
        cards
    )
}

/// Company page with the detail block and one job card per city label
fn company_page(name: &str, website: Option<&str>, job_cities: &[&str]) -> String {
    let website = website
        .map(|site| {
            format!(
                r#"<div><div><p><span><a href="{0}" rel="nofollow">{0}</a></span></p></div></div>"#,
                site
            )
        })
        .unwrap_or_default();

    let jobs: String = job_cities
        .iter()
        .map(|city| {
            format!(
                r#"<div class="card card-hover card-visited wordwrap job-link"><h2><a href="/jobs/1/">Rust developer</a></h2><div><span>{}</span></div></div>"#,
                city
            )
        })
        .collect();

    format!(
        r#"<html><body><section><div><div><div>
            <div><img src="logo.png"></div>
            <div><div>
                <h1>{}</h1>
                {}
                <p>Outsourcing and product development.</p>
                <p>Offices across the country.</p>
            </div></div>
        </div></div></div>
        <div class="jobs">{}</div>
        </section></body></html>"#,
        name, website, jobs
    )
}

async fn mount_list_page(server: &MockServer, page: &str, links: &[String]) {
    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(list_page(links)))
        .mount(server)
        .await;
}

async fn mount_company(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Writes a workbook with one sheet of previously recorded companies
fn write_snapshot(path: &Path, rows: &[[String; 5]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("01-09-2026 10.00.00").unwrap();
    for (col, header) in COLUMN_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string(i as u32 + 1, col as u16, value.as_str())
                .unwrap();
        }
    }
    workbook.save(path).unwrap();
}

fn read_sheet(path: &Path, sheet: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("Failed to open workbook");
    let range = workbook
        .worksheet_range(sheet)
        .expect("Failed to read sheet");
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_and_save() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("companies.xlsx");

    write_snapshot(
        &workbook,
        &[[
            "Initech".to_string(),
            format!("{}/c/3/", base),
            "https://initech.example".to_string(),
            "Known company".to_string(),
            "2".to_string(),
        ]],
    );

    // Page 1: three companies
    mount_list_page(
        &server,
        "1",
        &["/c/1/".to_string(), "/c/2/".to_string(), "/c/3/".to_string()],
    )
    .await;

    // Page 2: server error, skipped
    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // Page 3: a duplicate name, a sole proprietor, a broken page, no website
    mount_list_page(
        &server,
        "3",
        &[
            "/c/4/".to_string(),
            "/c/5/".to_string(),
            "/c/6/".to_string(),
            "/c/7/".to_string(),
        ],
    )
    .await;

    // Detail and city/jobs sub-fetch hit the same URL
    Mock::given(method("GET"))
        .and(path("/c/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(company_page(
            "Acme",
            Some("https://acme.example"),
            &["Киев", "Львов", "Киев, Оболонь"],
        )))
        .expect(2)
        .mount(&server)
        .await;
    mount_company(
        &server,
        "/c/2/",
        company_page("Globex", Some("https://globex.example"), &["Одесса"]),
    )
    .await;
    mount_company(
        &server,
        "/c/3/",
        company_page("Initech", Some("https://initech.example"), &["Киев"]),
    )
    .await;
    mount_company(
        &server,
        "/c/4/",
        company_page("Acme", Some("https://acme.example"), &["Киев"]),
    )
    .await;
    mount_company(
        &server,
        "/c/5/",
        company_page("ФОП Шевченко", Some("https://shevchenko.example"), &["Киев"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/c/6/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_company(&server, "/c/7/", company_page("Hooli", None, &["Киев"])).await;

    let config = create_test_config(&server, 3, &workbook);
    let store = XlsxSnapshotStore::from_config(&config.output);

    let registry = store.load().expect("Failed to load snapshot");
    assert_eq!(registry.len(), 1);

    let pipeline = CrawlPipeline::new(Arc::new(config)).expect("Failed to create pipeline");
    let stats = pipeline.run(&registry).await;

    assert_eq!(stats.pages_visited, 2);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.companies_seen, 7);
    assert_eq!(stats.companies_created, 4);
    assert_eq!(stats.name_collisions, 2);
    assert_eq!(stats.detail_fetch_failures, 1);
    assert_eq!(stats.city_fetch_failures, 1);

    // Names stay unique across the registry
    let companies = registry.all();
    let names: HashSet<&str> = companies.iter().map(|c| c.name()).collect();
    assert_eq!(names.len(), companies.len());
    assert_eq!(companies.len(), 5);

    let acme = registry.get(&format!("{}/c/1/", base)).unwrap();
    assert_eq!(acme.job_count(), 2);
    assert!(registry.get(&format!("{}/c/4/", base)).is_none());

    let initech = registry.get(&format!("{}/c/3/", base)).unwrap();
    assert!(initech.is_preexisting());
    assert_eq!(initech.job_count(), 3);

    let report = store
        .save_as_sheet(&registry, "integration run")
        .expect("Failed to save snapshot");
    assert_eq!(report.rows_written, 1);

    let rows = read_sheet(&workbook, "integration run");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "Acme");
    assert_eq!(rows[1][1], format!("{}/c/1/", base));
    assert_eq!(rows[1][2], "https://acme.example");
    assert_eq!(
        rows[1][3],
        "Outsourcing and product development. Offices across the country."
    );
    assert_eq!(rows[1][4], "2");

    // The earlier sheet is still there
    let earlier = read_sheet(&workbook, "01-09-2026 10.00.00");
    assert_eq!(earlier[1][0], "Initech");
}

#[tokio::test]
async fn test_empty_card_slots_are_not_visited() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let links: Vec<String> = (1..=10).map(|i| format!("/c/{}/", i)).collect();
    mount_list_page(&server, "1", &links).await;
    for (i, link) in links.iter().enumerate() {
        mount_company(
            &server,
            link,
            company_page(&format!("Company {}", i), Some("https://c.example"), &[]),
        )
        .await;
    }

    // An empty slot resolved against the base URL would land here
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 1, &dir.path().join("companies.xlsx"));
    let pipeline = CrawlPipeline::new(Arc::new(config)).unwrap();
    let registry = CompanyRegistry::new();
    let stats = pipeline.run(&registry).await;

    assert_eq!(stats.companies_seen, 10);
    assert_eq!(stats.companies_created, 10);
    assert_eq!(registry.len(), 10);
}

#[tokio::test]
async fn test_resume_without_new_companies_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let workbook = dir.path().join("companies.xlsx");
    write_snapshot(
        &workbook,
        &[
            [
                "Acme".to_string(),
                "https://jobs.example/c/1/".to_string(),
                "https://acme.example".to_string(),
                "Known".to_string(),
                "4".to_string(),
            ],
            [
                "Globex".to_string(),
                "https://jobs.example/c/2/".to_string(),
                "https://globex.example".to_string(),
                "Known".to_string(),
                "1".to_string(),
            ],
        ],
    );

    let store = XlsxSnapshotStore::new(&workbook, "ФОП");
    let registry = store.load().unwrap();
    assert_eq!(registry.len(), 2);

    let report = store.save(&registry).unwrap();
    assert_eq!(report.rows_written, 0);

    let rows = read_sheet(&workbook, &report.sheet_name);
    assert_eq!(rows, vec![COLUMN_HEADERS.map(String::from).to_vec()]);
}
