// ── Monthly opt-in summary ──
//
// Domain form of `MonthlySummaryResponse`. The conversion is the trust
// boundary: once a `MonthlySummary` exists, its daily grid covers every
// day of the month exactly once, ascending, and its totals agree with
// the grid.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use tracing::debug;

use offsetcf_api::{DailyOptInData, MonthlySummaryResponse};

use super::month::Month;
use crate::error::CoreError;

/// Allowed drift between reported and summed offsets.
pub const OFFSET_TOLERANCE: f64 = 1e-6;

/// Currency shown before any summary has loaded.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Opt-in count and estimated offset, summed over some set of days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub opt_ins: u64,
    pub estimated_offset: f64,
}

impl Totals {
    pub const ZERO: Self = Self {
        opt_ins: 0,
        estimated_offset: 0.0,
    };

    /// Exact on counts, [`OFFSET_TOLERANCE`] on offsets.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.opt_ins == other.opt_ins
            && (self.estimated_offset - other.estimated_offset).abs() <= OFFSET_TOLERANCE
    }

    pub(crate) fn add(&mut self, opt_ins: u64, estimated_offset: f64) {
        self.opt_ins = self.opt_ins.saturating_add(opt_ins);
        self.estimated_offset += estimated_offset;
    }
}

/// One day of the calendar grid. Zero-activity days are explicit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyOptIns {
    pub day: NaiveDate,
    pub opt_ins: u64,
    pub estimated_offset: f64,
}

impl DailyOptIns {
    pub fn zero(day: NaiveDate) -> Self {
        Self {
            day,
            opt_ins: 0,
            estimated_offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub store: String,
    pub month: Month,
    pub currency: String,
    pub totals: Totals,
    pub daily: Vec<DailyOptIns>,
}

impl MonthlySummary {
    /// A month with no recorded activity.
    pub fn empty(store: impl Into<String>, month: Month, currency: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            month,
            currency: currency.into(),
            totals: Totals::ZERO,
            daily: month.days().map(DailyOptIns::zero).collect(),
        }
    }

    pub fn has_activity(&self) -> bool {
        self.totals.opt_ins > 0
    }

    /// Sum of the daily grid (equal to `totals` within tolerance).
    pub fn daily_sum(&self) -> Totals {
        self.daily.iter().fold(Totals::ZERO, |mut acc, d| {
            acc.add(d.opt_ins, d.estimated_offset);
            acc
        })
    }
}

impl TryFrom<MonthlySummaryResponse> for MonthlySummary {
    type Error = CoreError;

    fn try_from(resp: MonthlySummaryResponse) -> Result<Self, Self::Error> {
        let month: Month = resp.month.parse().map_err(|_| invalid(format!(
            "unparseable month '{}'",
            resp.month
        )))?;

        let mut by_day: BTreeMap<NaiveDate, DailyOptIns> = BTreeMap::new();
        for entry in &resp.daily {
            let record = parse_daily(entry, month)?;
            if by_day.insert(record.day, record).is_some() {
                return Err(invalid(format!("duplicate day {}", record.day)));
            }
        }

        let reported = Totals {
            opt_ins: resp.totals.opt_ins,
            estimated_offset: resp.totals.estimated_offset,
        };
        if !reported.estimated_offset.is_finite() || reported.estimated_offset < 0.0 {
            return Err(invalid(format!(
                "total estimated_offset {} is not a non-negative number",
                reported.estimated_offset
            )));
        }

        let daily: Vec<DailyOptIns> = month
            .days()
            .map(|day| by_day.get(&day).copied().unwrap_or_else(|| DailyOptIns::zero(day)))
            .collect();

        let filled = daily.len().saturating_sub(by_day.len());
        if filled > 0 && !by_day.is_empty() {
            debug!(month = %month, filled, "filled missing days with zero records");
        }

        let currency = match resp.currency.trim() {
            "" => DEFAULT_CURRENCY.to_owned(),
            c => c.to_owned(),
        };

        let summary = Self {
            store: resp.store,
            month,
            currency,
            totals: reported,
            daily,
        };

        let summed = summary.daily_sum();
        if !summed.approx_eq(&reported) {
            return Err(invalid(format!(
                "totals ({} opt-ins, {:.6} offset) do not match daily sum ({} opt-ins, {:.6} offset)",
                reported.opt_ins,
                reported.estimated_offset,
                summed.opt_ins,
                summed.estimated_offset
            )));
        }

        Ok(summary)
    }
}

fn invalid(reason: String) -> CoreError {
    CoreError::InvalidSummary { reason }
}

/// Accepts plain dates and RFC 3339 timestamps; rejects days outside `month`.
fn parse_daily(entry: &DailyOptInData, month: Month) -> Result<DailyOptIns, CoreError> {
    let day = NaiveDate::parse_from_str(&entry.day, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(&entry.day).map(|dt| dt.date_naive()))
        .map_err(|_| invalid(format!("unparseable day '{}'", entry.day)))?;

    if !month.contains(day) {
        return Err(invalid(format!("day {day} is outside {month}")));
    }
    if !entry.estimated_offset.is_finite() || entry.estimated_offset < 0.0 {
        return Err(invalid(format!(
            "estimated_offset {} on {day} is not a non-negative number",
            entry.estimated_offset
        )));
    }

    Ok(DailyOptIns {
        day,
        opt_ins: entry.opt_ins,
        estimated_offset: entry.estimated_offset,
    })
}
