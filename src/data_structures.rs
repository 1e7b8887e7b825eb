use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tickerscope::api::{AnalysisReport, StockAnalyzer};
use tickerscope::models::FetchRequest;
use tokio::sync::Mutex;

// --- Report Cache ---

#[derive(Clone, Debug)]
pub struct CachedReport {
    pub report: Arc<AnalysisReport>,
    pub fetched_at: Instant,
}

/// Per-selection lock held while a report is being fetched.
pub type FlightLock = Arc<Mutex<()>>;

/// Finished analyses keyed by the exact selection that produced them.
///
/// `inflight` holds one lock per selection being analyzed, so concurrent
/// misses for the same selection wait for the first fetch instead of
/// repeating it.
#[derive(Debug)]
pub struct ReportCache {
    entries: HashMap<FetchRequest, CachedReport>,
    inflight: HashMap<FetchRequest, FlightLock>,
    ttl: Duration,
}

impl ReportCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            inflight: HashMap::new(),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, request: &FetchRequest) -> Option<Arc<AnalysisReport>> {
        self.get_at(request, Instant::now())
    }

    pub fn insert(&mut self, report: Arc<AnalysisReport>) {
        self.insert_at(report, Instant::now());
    }

    /// The lock shared by every caller loading `request`.
    pub fn flight(&mut self, request: &FetchRequest) -> FlightLock {
        self.inflight
            .entry(request.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops every entry older than the TTL, returning how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn get_at(&self, request: &FetchRequest, now: Instant) -> Option<Arc<AnalysisReport>> {
        self.entries
            .get(request)
            .filter(|cached| now.saturating_duration_since(cached.fetched_at) < self.ttl)
            .map(|cached| cached.report.clone())
    }

    fn insert_at(&mut self, report: Arc<AnalysisReport>, now: Instant) {
        self.inflight.remove(&report.request);
        if self.ttl.is_zero() {
            return;
        }
        self.entries.insert(
            report.request.clone(),
            CachedReport {
                report,
                fetched_at: now,
            },
        );
    }

    fn purge_expired_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, cached| now.saturating_duration_since(cached.fetched_at) < ttl);
        // Locks left behind by failed loads that nobody is waiting on
        self.inflight.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - self.entries.len()
    }
}

// --- Type Aliases for Shared State ---

pub type SharedReportCache = Arc<Mutex<ReportCache>>;
pub type SharedAnalyzer = Arc<StockAnalyzer>;
