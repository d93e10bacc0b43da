/// Where a company record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Found on a detail page during this run
    Discovered,

    /// Loaded from a previous snapshot
    FromSnapshot,
}

/// Fields read from a company detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyDetails {
    pub name: String,
    pub website: String,
    pub description: String,
}

/// A company known to the registry
///
/// The work-site URL and display name are fixed at construction; the job
/// count only ever grows, and only through the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    work_url: String,
    name: String,
    website: String,
    description: String,
    job_count: u32,
    provenance: Provenance,
}

impl Company {
    /// Creates a record for a company found during this run, with no jobs counted yet
    pub fn discovered(work_url: impl Into<String>, details: CompanyDetails) -> Self {
        Self {
            work_url: work_url.into(),
            name: details.name,
            website: details.website,
            description: details.description,
            job_count: 0,
            provenance: Provenance::Discovered,
        }
    }

    /// Rebuilds a record from a snapshot row
    pub fn from_snapshot(
        work_url: impl Into<String>,
        details: CompanyDetails,
        job_count: u32,
    ) -> Self {
        Self {
            work_url: work_url.into(),
            name: details.name,
            website: details.website,
            description: details.description,
            job_count,
            provenance: Provenance::FromSnapshot,
        }
    }

    pub fn work_url(&self) -> &str {
        &self.work_url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn job_count(&self) -> u32 {
        self.job_count
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// True if the record was loaded from a previous snapshot
    pub fn is_preexisting(&self) -> bool {
        self.provenance == Provenance::FromSnapshot
    }

    pub(super) fn increment_jobs(&mut self) -> u32 {
        self.job_count = self.job_count.saturating_add(1);
        self.job_count
    }
}
