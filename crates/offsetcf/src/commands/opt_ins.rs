//! Opt-in summary and CSV export.
//!
//! Both commands go through a [`ReportingView`]: the summary is applied
//! first, and the export is always taken from the key of the loaded
//! report.

use std::sync::Arc;

use tabled::Tabled;

use offsetcf_core::{
    Console, DailyOptIns, Month, MonthlySummary, OptInFilters, Report, ReportState,
    ReportingView, Totals,
};

use crate::cli::{GlobalOpts, OptInsArgs, OptInsCommand, OutputFormat, ReportArgs};
use crate::config::Profile;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    day: String,
    #[tabled(rename = "Opt-ins")]
    opt_ins: u64,
    #[tabled(rename = "Est. offset")]
    offset: String,
}

impl From<&DailyOptIns> for DayRow {
    fn from(d: &DailyOptIns) -> Self {
        Self {
            day: d.day.to_string(),
            opt_ins: d.opt_ins,
            offset: format!("{:.2}", d.estimated_offset),
        }
    }
}

/// Filters from flags, falling back to the profile's store. The month
/// defaults to the current one unless `--all-time` is given.
fn filters_from(args: ReportArgs, profile: &Profile) -> Result<OptInFilters, CliError> {
    let store = args.store.or_else(|| profile.store_id.clone());
    let month = if args.all_time {
        None
    } else {
        Some(match args.month {
            Some(raw) => raw.trim().parse::<Month>()?,
            None => Month::current(),
        })
    };
    Ok(OptInFilters::default().with_store(store).with_month(month))
}

fn format_totals(totals: &Totals, currency: &str) -> (String, String) {
    (
        totals.opt_ins.to_string(),
        format!("{:.2} {currency}", totals.estimated_offset),
    )
}

fn summary_detail(summary: &MonthlySummary, daily: bool) -> String {
    let (opt_ins, offset) = format_totals(&summary.totals, &summary.currency);
    let mut out = output::detail_lines(&[
        ("Store", summary.store.clone()),
        ("Month", summary.month.to_string()),
        ("Opt-ins", opt_ins),
        ("Est. offset", offset),
    ]);
    if daily {
        if summary.has_activity() {
            let rows: Vec<DayRow> = summary.daily.iter().map(DayRow::from).collect();
            out.push_str("\n\n");
            out.push_str(&output::render_table(&rows));
        } else {
            out.push_str("\n\nNo opt-ins recorded for this month.");
        }
    }
    out
}

/// Apply `filters` and wait for the result.
async fn load(
    view: &ReportingView<Console>,
    filters: OptInFilters,
    global: &GlobalOpts,
) -> Result<Arc<Report>, CliError> {
    let spinner = output::spinner(&format!("Loading opt-ins for {filters}"), global.quiet);
    let outcome = view.set_filters(filters).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    tracing::debug!(?outcome, "summary applied");
    match view.state() {
        ReportState::Loaded(report) => Ok(report),
        ReportState::Error { error, .. } => Err(CliError::from(&*error)),
        ReportState::Idle | ReportState::Loading { .. } => Err(CliError::ApiError {
            status: None,
            message: format!("summary request ended without a result ({outcome:?})"),
        }),
    }
}

pub async fn handle(
    console: &Console,
    args: OptInsArgs,
    profile: &Profile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OptInsCommand::Summary { report, daily } => {
            let filters = filters_from(report, profile)?;
            let view = console.reporting_view(filters.clone());
            let report = load(&view, filters, global).await?;
            let summary = &report.summary;

            let out = match global.output {
                OutputFormat::Table => summary_detail(summary, daily),
                OutputFormat::Plain => format!(
                    "{}\t{:.2}",
                    summary.totals.opt_ins, summary.totals.estimated_offset
                ),
                _ => output::render_single(&global.output, summary, |_| String::new(), |_| {
                    String::new()
                }),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OptInsCommand::Export {
            report,
            out,
            verify,
        } => {
            let filters = filters_from(report, profile)?;
            let view = console.reporting_view(filters.clone());
            let report = load(&view, filters, global).await?;

            let export = view.export().await?;
            if verify && !report.matches_export(&export)? {
                let (s_opt, s_off) = format_totals(&report.totals(), &report.summary.currency);
                let (e_opt, e_off) = format_totals(&export.totals()?, &report.summary.currency);
                return Err(CliError::ExportMismatch {
                    filename: export.filename.clone(),
                    summary: format!("{s_opt} opt-ins, {s_off}"),
                    export: format!("{e_opt} opt-ins, {e_off}"),
                });
            }

            let path = export.save_in(&out)?;
            output::print_output(&path.display().to_string(), global.quiet);
            output::success(
                &format!("Exported {} ({} bytes)", export.filename, export.len()),
                global.quiet,
            );
            if export.is_empty() {
                tracing::warn!(filename = %export.filename, "export is empty");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(store: Option<&str>, month: Option<&str>, all_time: bool) -> ReportArgs {
        ReportArgs {
            store: store.map(str::to_owned),
            month: month.map(str::to_owned),
            all_time,
        }
    }

    #[test]
    fn flag_store_wins_over_profile() {
        let profile = Profile {
            store_id: Some("s-profile".into()),
            ..Profile::default()
        };
        let f = filters_from(args(Some("s-flag"), Some("2024-01"), false), &profile).unwrap();
        assert_eq!(f.store_id(), Some("s-flag"));
        assert_eq!(f.month_param().as_deref(), Some("2024-01"));

        let f = filters_from(args(None, Some("2024-01"), false), &profile).unwrap();
        assert_eq!(f.store_id(), Some("s-profile"));
    }

    #[test]
    fn all_time_sends_no_month() {
        let f = filters_from(args(Some("s-1"), None, true), &Profile::default()).unwrap();
        assert_eq!(f.month(), None);
        assert_eq!(f.export_filename(), "opt-ins-all-time.csv");
    }

    #[test]
    fn month_defaults_to_current() {
        let f = filters_from(args(Some("s-1"), None, false), &Profile::default()).unwrap();
        assert_eq!(f.month(), Some(Month::current()));
    }

    #[test]
    fn bad_month_is_a_usage_error() {
        let err = filters_from(args(Some("s-1"), Some("2024-13"), false), &Profile::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }

    #[test]
    fn quiet_month_says_so_in_daily_view() {
        let summary = MonthlySummary::empty("s-1", "2024-02".parse().unwrap(), "USD");
        let text = summary_detail(&summary, true);
        assert!(text.contains("No opt-ins recorded"));
        assert!(text.contains("0.00 USD"));
    }
}
