// ── Opt-in CSV export ──
//
// The export payload is opaque to the backend contract, but the console
// can still read it back to confirm it agrees with the report on screen.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{OptInFilters, Totals};

const OPT_IN_COLUMNS: &[&str] = &["opt_ins", "daily_opt_ins", "optins", "opt_in_count"];
const OFFSET_COLUMNS: &[&str] = &["estimated_offset", "offset", "daily_estimated_offset"];

/// A downloaded export, tagged with the filters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub filters: OptInFilters,
    pub bytes: Bytes,
}

impl ExportFile {
    pub fn new(filters: OptInFilters, bytes: Bytes) -> Self {
        Self {
            filename: filters.export_filename(),
            filters,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sum the opt-in and offset columns of the CSV.
    ///
    /// Columns are found by header name, ignoring case and treating `-`
    /// and spaces as `_`. A trailing `total` row is skipped. An empty
    /// payload reads as zero.
    pub fn totals(&self) -> Result<Totals, CoreError> {
        if self.bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Totals::ZERO);
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(&self.bytes[..]);

        let headers = reader.headers().map_err(csv_error)?.clone();
        let opt_col = find_column(&headers, OPT_IN_COLUMNS)
            .ok_or_else(|| export_error("no opt-ins column in export"))?;
        let offset_col = find_column(&headers, OFFSET_COLUMNS)
            .ok_or_else(|| export_error("no estimated offset column in export"))?;

        let mut totals = Totals::ZERO;
        let mut rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            if is_total_row(&record) {
                continue;
            }
            let line = record.position().map_or(0, csv::Position::line);
            let opt_ins = cell(&record, opt_col)
                .map(|v| v.parse::<u64>())
                .transpose()
                .map_err(|e| export_error(format!("line {line}: bad opt-ins value: {e}")))?
                .unwrap_or(0);
            let offset = cell(&record, offset_col)
                .map(|v| v.parse::<f64>())
                .transpose()
                .map_err(|e| export_error(format!("line {line}: bad offset value: {e}")))?
                .unwrap_or(0.0);
            totals.add(opt_ins, offset);
            rows += 1;
        }

        debug!(filename = %self.filename, rows, "parsed export totals");
        Ok(totals)
    }

    /// Write the payload as `dir/{filename}` and return the path.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes).map_err(|e| {
            export_error(format!("cannot write {}: {e}", path.display()))
        })?;
        Ok(path)
    }
}

fn normalize_header(h: &str) -> String {
    h.trim()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
        .collect()
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .map(normalize_header)
        .position(|h| names.contains(&h.as_str()))
}

/// Non-empty cell value; blanks count as zero.
fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).filter(|v| !v.is_empty())
}

fn is_total_row(record: &StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|v| v.eq_ignore_ascii_case("total") || v.eq_ignore_ascii_case("totals"))
}

fn export_error(message: impl Into<String>) -> CoreError {
    CoreError::Export {
        message: message.into(),
    }
}

fn csv_error(err: csv::Error) -> CoreError {
    export_error(format!("malformed CSV: {err}"))
}
