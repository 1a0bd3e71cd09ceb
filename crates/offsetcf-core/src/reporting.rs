// ── Reporting view model ──
//
// Owns the filter state for the opt-in report, fetches the monthly
// summary through a `SummarySource`, and publishes the result on a
// `watch` channel. Every fetch carries a generation number; only the
// newest generation may commit, and starting a fetch cancels the one
// before it.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::export::ExportFile;
use crate::model::{DEFAULT_CURRENCY, DailyOptIns, MonthlySummary, OptInFilters, Totals};

// ── Source trait ─────────────────────────────────────────────────────

/// Where summaries and exports come from.
///
/// Both operations take the same filter key. Implementations reject a
/// missing store before doing any I/O.
pub trait SummarySource: Send + Sync {
    fn monthly_summary(
        &self,
        filters: &OptInFilters,
    ) -> impl Future<Output = Result<MonthlySummary, CoreError>> + Send;

    fn export(
        &self,
        filters: &OptInFilters,
    ) -> impl Future<Output = Result<ExportFile, CoreError>> + Send;
}

impl<T: SummarySource> SummarySource for Arc<T> {
    fn monthly_summary(
        &self,
        filters: &OptInFilters,
    ) -> impl Future<Output = Result<MonthlySummary, CoreError>> + Send {
        (**self).monthly_summary(filters)
    }

    fn export(
        &self,
        filters: &OptInFilters,
    ) -> impl Future<Output = Result<ExportFile, CoreError>> + Send {
        (**self).export(filters)
    }
}

// ── State ────────────────────────────────────────────────────────────

/// A loaded summary together with the key that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub filters: OptInFilters,
    pub summary: MonthlySummary,
    pub generation: u64,
}

impl Report {
    pub fn totals(&self) -> Totals {
        self.summary.totals
    }

    /// Whether `export` was produced from this report's key and its rows
    /// add up to the same totals.
    pub fn matches_export(&self, export: &ExportFile) -> Result<bool, CoreError> {
        if export.filters != self.filters {
            return Ok(false);
        }
        Ok(export.totals()?.approx_eq(&self.summary.totals))
    }
}

#[derive(Debug, Clone, Default)]
pub enum ReportState {
    #[default]
    Idle,
    Loading {
        filters: OptInFilters,
        generation: u64,
    },
    Loaded(Arc<Report>),
    Error {
        filters: OptInFilters,
        message: String,
        error: Arc<CoreError>,
    },
}

impl ReportState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Filters the state was produced from (`None` while idle).
    pub fn filters(&self) -> Option<&OptInFilters> {
        match self {
            Self::Idle => None,
            Self::Loading { filters, .. } | Self::Error { filters, .. } => Some(filters),
            Self::Loaded(report) => Some(&report.filters),
        }
    }
}

/// What happened to one apply request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The fetch completed and its report is now current.
    Applied,
    /// The same key is already loaded.
    Unchanged,
    /// The same key is already being fetched.
    Deduplicated,
    /// A newer request replaced this one; its result was dropped.
    Superseded,
    /// The fetch failed and the view is in the error state.
    Failed,
}

// ── View ─────────────────────────────────────────────────────────────

struct InFlight {
    generation: u64,
    filters: OptInFilters,
    cancel: CancellationToken,
}

struct ViewInner {
    filters: OptInFilters,
    generation: u64,
    in_flight: Option<InFlight>,
}

struct Ticket {
    generation: u64,
    filters: OptInFilters,
    cancel: CancellationToken,
    /// State before this fetch went `Loading`.
    previous: ReportState,
}

/// Releases the in-flight slot when an apply future is dropped before it
/// commits, so the key can be applied again.
struct PendingFetch<'a> {
    inner: &'a Mutex<ViewInner>,
    state: &'a watch::Sender<ReportState>,
    generation: u64,
    previous: Option<ReportState>,
}

impl PendingFetch<'_> {
    fn disarm(&mut self) {
        self.previous = None;
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.generation != self.generation {
            return;
        }
        inner.in_flight = None;
        debug!(generation = self.generation, "summary fetch dropped before completion");
        // A superseded `Loading` has no fetch behind it any more.
        let restored = if previous.is_loading() {
            ReportState::Idle
        } else {
            previous
        };
        self.state.send_replace(restored);
    }
}

pub struct ReportingView<S> {
    source: S,
    state: watch::Sender<ReportState>,
    inner: Mutex<ViewInner>,
}

impl<S: SummarySource> ReportingView<S> {
    /// Idle view holding `filters`; nothing is fetched until applied.
    pub fn new(source: S, filters: OptInFilters) -> Self {
        let (state, _) = watch::channel(ReportState::Idle);
        Self {
            source,
            state,
            inner: Mutex::new(ViewInner {
                filters,
                generation: 0,
                in_flight: None,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // ── Applying filters ─────────────────────────────────────────────

    /// Make `filters` the current key and fetch its summary.
    ///
    /// Returns without fetching when that key is already loaded or
    /// already in flight.
    pub async fn set_filters(&self, filters: OptInFilters) -> ApplyOutcome {
        let ticket = {
            let mut inner = self.lock();
            if inner.in_flight.as_ref().is_some_and(|f| f.filters == filters) {
                debug!(%filters, "fetch already in flight");
                return ApplyOutcome::Deduplicated;
            }
            let loaded = matches!(
                &*self.state.borrow(),
                ReportState::Loaded(report) if report.filters == filters
            );
            if loaded && inner.in_flight.is_none() {
                return ApplyOutcome::Unchanged;
            }
            self.begin(&mut inner, filters)
        };
        self.run(ticket).await
    }

    /// Fetch the current key again, e.g. after a failure.
    pub async fn reapply(&self) -> ApplyOutcome {
        let ticket = {
            let mut inner = self.lock();
            if inner.in_flight.is_some() {
                return ApplyOutcome::Deduplicated;
            }
            let filters = inner.filters.clone();
            self.begin(&mut inner, filters)
        };
        self.run(ticket).await
    }

    fn begin(&self, inner: &mut ViewInner, filters: OptInFilters) -> Ticket {
        inner.generation += 1;
        let generation = inner.generation;
        let cancel = CancellationToken::new();

        let previous = inner.in_flight.replace(InFlight {
            generation,
            filters: filters.clone(),
            cancel: cancel.clone(),
        });
        if let Some(previous) = previous {
            debug!(
                superseded = previous.generation,
                generation, "cancelling older summary fetch"
            );
            previous.cancel.cancel();
        }

        inner.filters = filters.clone();
        let previous = self.state.send_replace(ReportState::Loading {
            filters: filters.clone(),
            generation,
        });

        Ticket {
            generation,
            filters,
            cancel,
            previous,
        }
    }

    async fn run(&self, mut ticket: Ticket) -> ApplyOutcome {
        if let Err(e) = ticket.filters.scoped_store().map(|_| ()) {
            return self.commit(ticket, Err(e));
        }

        let mut pending = PendingFetch {
            inner: &self.inner,
            state: &self.state,
            generation: ticket.generation,
            previous: Some(std::mem::take(&mut ticket.previous)),
        };

        let result = tokio::select! {
            biased;
            () = ticket.cancel.cancelled() => {
                pending.disarm();
                debug!(generation = ticket.generation, "summary fetch cancelled");
                return ApplyOutcome::Superseded;
            }
            result = self.source.monthly_summary(&ticket.filters) => result,
        };
        pending.disarm();
        self.commit(ticket, result)
    }

    fn commit(&self, ticket: Ticket, result: Result<MonthlySummary, CoreError>) -> ApplyOutcome {
        let mut inner = self.lock();
        if inner.generation != ticket.generation {
            info!(
                stale = ticket.generation,
                current = inner.generation,
                "discarding stale summary"
            );
            return ApplyOutcome::Superseded;
        }
        inner.in_flight = None;

        match result {
            Ok(summary) => {
                info!(
                    filters = %ticket.filters,
                    opt_ins = summary.totals.opt_ins,
                    "report loaded"
                );
                self.state.send_replace(ReportState::Loaded(Arc::new(Report {
                    filters: ticket.filters,
                    summary,
                    generation: ticket.generation,
                })));
                ApplyOutcome::Applied
            }
            Err(error) => {
                warn!(filters = %ticket.filters, error = %error, "report failed");
                self.state.send_replace(ReportState::Error {
                    filters: ticket.filters,
                    message: error.to_string(),
                    error: Arc::new(error),
                });
                ApplyOutcome::Failed
            }
        }
    }

    // ── Reading state ────────────────────────────────────────────────

    pub fn state(&self) -> ReportState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReportState> {
        self.state.subscribe()
    }

    /// The current key, including one that is still loading.
    pub fn filters(&self) -> OptInFilters {
        self.lock().filters.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn report(&self) -> Option<Arc<Report>> {
        match &*self.state.borrow() {
            ReportState::Loaded(report) => Some(Arc::clone(report)),
            _ => None,
        }
    }

    /// Totals of the loaded report; zero otherwise.
    pub fn totals(&self) -> Totals {
        self.report().map_or(Totals::ZERO, |r| r.summary.totals)
    }

    /// Daily rows of the loaded report; empty otherwise.
    pub fn daily(&self) -> Vec<DailyOptIns> {
        self.report()
            .map(|r| r.summary.daily.clone())
            .unwrap_or_default()
    }

    pub fn currency(&self) -> String {
        self.report()
            .map_or_else(|| DEFAULT_CURRENCY.to_owned(), |r| r.summary.currency.clone())
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Export the loaded report's key. Edited-but-unapplied filters are
    /// never used.
    pub async fn export(&self) -> Result<ExportFile, CoreError> {
        let report = self.report().ok_or(CoreError::NoReportLoaded)?;
        debug!(filters = %report.filters, "exporting loaded report");
        self.source.export(&report.filters).await
    }

    fn lock(&self) -> MutexGuard<'_, ViewInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
