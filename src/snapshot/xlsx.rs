//! Excel workbook snapshot store
//!
//! Layout of every sheet: row 1 holds the headers, data starts on row 2 with
//! columns A-E = name, work-site URL, website, description, job count. A row
//! with any empty cell ends the sheet.
//!
//! The workbook is read with `calamine` and rewritten with `rust_xlsxwriter`:
//! saving copies the cell values of every existing sheet, then appends the
//! new sheet and makes it the active one.

use crate::config::OutputConfig;
use crate::registry::{Company, CompanyDetails, CompanyRegistry};
use crate::snapshot::should_export;
use crate::snapshot::traits::{SaveReport, SnapshotError, SnapshotResult, SnapshotStore};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{Local, NaiveDateTime};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

/// Header row written at the top of every saved sheet
pub const COLUMN_HEADERS: [&str; 5] = [
    "Company Name",
    "Work.ua",
    "Website",
    "Company Description",
    "Places",
];

/// Zero-based index of the first data row (spreadsheet row 2)
const FIRST_DATA_ROW: u32 = 1;

/// Formats the name of the sheet added at `now`
///
/// Day-month-year and time of day; sheet names may not contain `:`, so the
/// time fields are separated by `.`.
pub fn sheet_name_for(now: NaiveDateTime) -> String {
    now.format("%d-%m-%Y %H.%M.%S").to_string()
}

/// Snapshot store backed by an `.xlsx` workbook
#[derive(Debug, Clone)]
pub struct XlsxSnapshotStore {
    path: PathBuf,
    sole_proprietor_marker: String,
}

impl XlsxSnapshotStore {
    pub fn new(path: impl Into<PathBuf>, sole_proprietor_marker: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sole_proprietor_marker: sole_proprietor_marker.into(),
        }
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        Self::new(&output.workbook_path, &output.sole_proprietor_marker)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the exportable companies to a new sheet with the given name
    ///
    /// # Returns
    ///
    /// * `Ok(SaveReport)` - The workbook was written
    /// * `Err(SnapshotError)` - Existing sheets could not be read, the name is
    ///   not a valid sheet name, or the file could not be written
    pub fn save_as_sheet(
        &self,
        registry: &CompanyRegistry,
        sheet_name: &str,
    ) -> SnapshotResult<SaveReport> {
        let existing = if self.path.exists() {
            self.read_sheets()?
        } else {
            tracing::info!("Creating new workbook {}", self.path.display());
            Vec::new()
        };

        let mut workbook = Workbook::new();

        for (name, range) in &existing {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name)?;
            copy_range(worksheet, range)?;
        }

        let mut companies: Vec<Company> = registry
            .all()
            .into_iter()
            .filter(|company| should_export(company, &self.sole_proprietor_marker))
            .collect();
        companies.sort_by(|a, b| a.name().cmp(b.name()));

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet_name)
            .map_err(|source| SnapshotError::InvalidSheetName {
                name: sheet_name.to_string(),
                source,
            })?;

        for (col, header) in COLUMN_HEADERS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        for (i, company) in companies.iter().enumerate() {
            let row = FIRST_DATA_ROW + i as u32;
            worksheet.write_string(row, 0, company.name())?;
            worksheet.write_string(row, 1, company.work_url())?;
            worksheet.write_string(row, 2, company.website())?;
            worksheet.write_string(row, 3, company.description())?;
            worksheet.write_number(row, 4, f64::from(company.job_count()))?;
        }
        worksheet.set_active(true);

        workbook.save(&self.path)?;

        tracing::info!(
            "Saved {} companies to sheet '{}' of {}",
            companies.len(),
            sheet_name,
            self.path.display()
        );

        Ok(SaveReport {
            sheet_name: sheet_name.to_string(),
            rows_written: companies.len(),
        })
    }

    /// Reads every sheet of the workbook, in workbook order
    fn read_sheets(&self) -> SnapshotResult<Vec<(String, Range<Data>)>> {
        let mut workbook: Xlsx<_> =
            open_workbook(&self.path).map_err(|source| SnapshotError::Open {
                path: self.path.display().to_string(),
                source,
            })?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|source| SnapshotError::Read {
                    sheet: name.clone(),
                    source,
                })?;
            sheets.push((name, range));
        }
        Ok(sheets)
    }
}

impl SnapshotStore for XlsxSnapshotStore {
    fn load(&self) -> SnapshotResult<CompanyRegistry> {
        tracing::info!("Loading companies from {}", self.path.display());
        let registry = CompanyRegistry::new();

        for (sheet, range) in self.read_sheets()? {
            let loaded = load_sheet(&sheet, &range, &registry);
            tracing::debug!("Sheet '{}': {} companies", sheet, loaded);
        }

        Ok(registry)
    }

    fn save(&self, registry: &CompanyRegistry) -> SnapshotResult<SaveReport> {
        self.save_as_sheet(registry, &sheet_name_for(Local::now().naive_local()))
    }
}

/// Seeds `registry` from one sheet and returns the number of rows read
///
/// Scanning stops at the first row with an empty required cell.
fn load_sheet(sheet: &str, range: &Range<Data>, registry: &CompanyRegistry) -> usize {
    let mut loaded = 0;

    for row in FIRST_DATA_ROW.. {
        let [name, work_url, website, description, jobs]: [String; 5] =
            std::array::from_fn(|col| cell_text(range, row, col as u32));

        if [&name, &work_url, &website, &description, &jobs]
            .iter()
            .any(|field| field.is_empty())
        {
            break;
        }

        let job_count = jobs.parse::<u32>().unwrap_or_else(|_| {
            tracing::warn!(
                "Sheet '{}' cell E{}: '{}' is not a job count, using 0",
                sheet,
                row + 1,
                jobs
            );
            0
        });

        registry.seed(Company::from_snapshot(
            work_url,
            CompanyDetails {
                name,
                website,
                description,
            },
            job_count,
        ));
        loaded += 1;
    }

    loaded
}

/// Cell value as written; only a truly empty cell reads as `""`
fn cell_text(range: &Range<Data>, row: u32, col: u32) -> String {
    range
        .get_value((row, col))
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Copies cell values of a read sheet into a sheet being written
fn copy_range(worksheet: &mut Worksheet, range: &Range<Data>) -> Result<(), XlsxError> {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));

    for (row, col, value) in range.used_cells() {
        let row = first_row + row as u32;
        let col = (first_col as usize + col) as u16;

        match value {
            Data::String(s) => worksheet.write_string(row, col, s)?,
            Data::Float(f) => worksheet.write_number(row, col, *f)?,
            Data::Int(i) => worksheet.write_number(row, col, *i as f64)?,
            Data::Bool(b) => worksheet.write_boolean(row, col, *b)?,
            Data::Empty | Data::Error(_) => continue,
            other => worksheet.write_string(row, col, other.to_string())?,
        };
    }

    Ok(())
}
