use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::types::{parse_numeric, ExamType, Offering, OfferingTable};

pub const COL_INSTITUTE: &str = "Institute";
pub const COL_PROGRAM: &str = "Academic Program Name";
pub const COL_EXAM_TYPE: &str = "Type of Exam";
pub const COL_CLOSING_RANK: &str = "Closing Rank";
pub const COL_FEE: &str = "Fee Structure";
pub const COL_AVERAGE_PACKAGE: &str = "Average Package";
pub const COL_SEAT_TYPE: &str = "Seat Type";

/// What happened while loading, row by row. Nothing here is fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_loaded: usize,
    pub unknown_exam_type: usize,
    pub malformed_rows: usize,
    pub absent_closing_rank: usize,
    pub absent_fee: usize,
    pub absent_average_package: usize,
    /// Numeric cells outside their valid range, loaded as absent
    pub out_of_range_values: usize,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.unknown_exam_type + self.malformed_rows
    }
}

#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: OfferingTable,
    pub report: LoadReport,
}

struct ColumnIndex {
    institute: usize,
    program: usize,
    exam_type: usize,
    closing_rank: usize,
    fee: usize,
    average_package: usize,
    seat_type: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .with_context(|| format!("Missing required column '{}'", name))
        };

        Ok(Self {
            institute: find(COL_INSTITUTE)?,
            program: find(COL_PROGRAM)?,
            exam_type: find(COL_EXAM_TYPE)?,
            closing_rank: find(COL_CLOSING_RANK)?,
            fee: find(COL_FEE)?,
            average_package: find(COL_AVERAGE_PACKAGE)?,
            seat_type: find(COL_SEAT_TYPE)?,
        })
    }
}

fn valid_rank(v: f64) -> bool {
    v > 0.0
}

fn valid_amount(v: f64) -> bool {
    v >= 0.0
}

/// Load the offerings table from a CSV file on disk.
pub fn load_offerings(path: &Path) -> Result<LoadedTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open offerings file at {}", path.display()))?;
    read_offerings(file)
        .with_context(|| format!("Failed to load offerings from {}", path.display()))
}

/// Read offerings from any CSV source.
///
/// Headers are required and matched by name. Rows the CSV reader cannot
/// decode, and rows with an unrecognized exam type, are skipped and counted.
/// A closing rank must be positive and fee and package non-negative; other
/// values are loaded as absent.
pub fn read_offerings<R: Read>(reader: R) -> Result<LoadedTable> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut rows = Vec::new();
    let mut report = LoadReport::default();

    for record in csv_reader.records() {
        report.rows_read += 1;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::debug!("Skipping malformed CSV row: {}", e);
                report.malformed_rows += 1;
                continue;
            }
        };

        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let Some(exam_type) = ExamType::parse(cell(columns.exam_type)) else {
            report.unknown_exam_type += 1;
            continue;
        };

        let mut bounded = |idx: usize, valid: fn(f64) -> bool| match parse_numeric(cell(idx)) {
            Some(v) if !valid(v) => {
                report.out_of_range_values += 1;
                None
            }
            v => v,
        };
        let closing_rank = bounded(columns.closing_rank, valid_rank);
        let fee = bounded(columns.fee, valid_amount);
        let average_package = bounded(columns.average_package, valid_amount);

        let offering = Offering {
            institute: cell(columns.institute).trim().to_string(),
            program: cell(columns.program).trim().to_string(),
            exam_type,
            closing_rank,
            fee,
            average_package,
            seat_category: cell(columns.seat_type).trim().to_string(),
        };

        if offering.closing_rank.is_none() {
            report.absent_closing_rank += 1;
        }
        if offering.fee.is_none() {
            report.absent_fee += 1;
        }
        if offering.average_package.is_none() {
            report.absent_average_package += 1;
        }

        rows.push(offering);
    }

    report.rows_loaded = rows.len();

    Ok(LoadedTable {
        table: OfferingTable::new(rows),
        report,
    })
}
