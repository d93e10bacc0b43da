//! Shared company aggregate
//!
//! The registry maps a company's work-site URL to its record. It is shared by
//! every concurrent fetch branch of a listing page, so each operation takes
//! the lock once and completes its read-check-write sequence under it.

mod company;

pub use company::{Company, CompanyDetails, Provenance};

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors raised by registry mutations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No company registered for {0}")]
    UnknownCompany(String),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Thread-safe mapping from work-site URL to company record
#[derive(Debug, Default)]
pub struct CompanyRegistry {
    companies: Mutex<HashMap<String, Company>>,
}

impl CompanyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its work-site URL, replacing any previous one
    ///
    /// Used when seeding the registry from a snapshot.
    pub fn seed(&self, company: Company) {
        self.lock().insert(company.work_url().to_string(), company);
    }

    /// Returns the record for a company, creating it if it is new
    ///
    /// Name-based dedup comes first: if any record already carries the same
    /// display name, whatever its key, that record is returned unchanged.
    /// Otherwise an existing record at `work_url` is returned unchanged, and
    /// only if neither exists is a `Discovered` record with zero jobs inserted.
    ///
    /// # Returns
    ///
    /// The record and whether it was created by this call
    pub fn get_or_create(&self, work_url: &str, details: CompanyDetails) -> (Company, bool) {
        let mut companies = self.lock();

        // Linear scan: names are not indexed
        if let Some(existing) = companies.values().find(|c| c.name() == details.name) {
            return (existing.clone(), false);
        }

        if let Some(existing) = companies.get(work_url) {
            return (existing.clone(), false);
        }

        let company = Company::discovered(work_url, details);
        companies.insert(work_url.to_string(), company.clone());
        (company, true)
    }

    /// Adds one job to the record at `work_url`
    ///
    /// # Returns
    ///
    /// * `Ok(u32)` - The new job count
    /// * `Err(RegistryError::UnknownCompany)` - No record exists at that URL
    pub fn increment_jobs(&self, work_url: &str) -> RegistryResult<u32> {
        self.lock()
            .get_mut(work_url)
            .map(Company::increment_jobs)
            .ok_or_else(|| RegistryError::UnknownCompany(work_url.to_string()))
    }

    /// Returns a copy of the record at `work_url`
    pub fn get(&self, work_url: &str) -> Option<Company> {
        self.lock().get(work_url).cloned()
    }

    /// Snapshot of every record, in no particular order
    pub fn all(&self) -> Vec<Company> {
        self.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Company>> {
        // Every mutation completes under the lock, so a poisoned map is still consistent
        self.companies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
