//! Snapshot module for persisting discovered companies
//!
//! A snapshot seeds the registry at the start of a run and receives the newly
//! discovered companies at the end. Each save adds a fresh table named after
//! the save time, so earlier runs are never overwritten.

mod traits;
mod xlsx;

pub use traits::{SaveReport, SnapshotError, SnapshotResult, SnapshotStore};
pub use xlsx::{sheet_name_for, XlsxSnapshotStore, COLUMN_HEADERS};

use crate::registry::{Company, CompanyRegistry};

/// Decides whether a company belongs in the saved table
///
/// A company is exported only if it has target-city jobs, a non-empty name
/// without the sole-proprietor marker, a website, and was discovered during
/// this run.
pub fn should_export(company: &Company, sole_proprietor_marker: &str) -> bool {
    company.job_count() > 0
        && !company.name().is_empty()
        && !company.name().contains(sole_proprietor_marker)
        && !company.website().is_empty()
        && !company.is_preexisting()
}

/// Loads the snapshot, falling back to an empty registry on failure
pub fn load_or_empty(store: &dyn SnapshotStore) -> CompanyRegistry {
    match store.load() {
        Ok(registry) => {
            tracing::info!("Loading complete: {} known companies", registry.len());
            registry
        }
        Err(e) => {
            tracing::error!("Failed to load snapshot, starting empty: {}", e);
            CompanyRegistry::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CompanyDetails;

    const MARKER: &str = "ФОП";

    fn discovered(name: &str, website: &str, jobs: u32) -> Company {
        let registry = CompanyRegistry::new();
        let url = format!("https://jobs.example/{}", name.len());
        registry.get_or_create(
            &url,
            CompanyDetails {
                name: name.to_string(),
                website: website.to_string(),
                description: "desc".to_string(),
            },
        );
        for _ in 0..jobs {
            registry.increment_jobs(&url).unwrap();
        }
        registry.get(&url).unwrap()
    }

    #[test]
    fn test_export_qualifying_company() {
        assert!(should_export(&discovered("Acme", "https://acme.example", 2), MARKER));
    }

    #[test]
    fn test_export_filters() {
        assert!(!should_export(&discovered("Acme", "https://acme.example", 0), MARKER));
        assert!(!should_export(&discovered("", "https://acme.example", 2), MARKER));
        assert!(!should_export(&discovered("ФОП Иванов", "https://ivanov.example", 2), MARKER));
        assert!(!should_export(&discovered("Acme", "", 2), MARKER));
    }

    #[test]
    fn test_export_skips_snapshot_records() {
        let company = Company::from_snapshot(
            "https://jobs.example/1",
            CompanyDetails {
                name: "Acme".to_string(),
                website: "https://acme.example".to_string(),
                description: "desc".to_string(),
            },
            7,
        );
        assert!(!should_export(&company, MARKER));
    }

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn load(&self) -> SnapshotResult<CompanyRegistry> {
            Err(SnapshotError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "missing",
            )))
        }

        fn save(&self, _registry: &CompanyRegistry) -> SnapshotResult<SaveReport> {
            unreachable!("not used")
        }
    }

    #[test]
    fn test_load_failure_starts_empty() {
        assert!(load_or_empty(&FailingStore).is_empty());
    }
}
