use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_runs: AtomicU64,
    ingest_pages: AtomicU64,
    ingest_fetched: AtomicU64,
    ingest_kept: AtomicU64,
    ingest_errors: AtomicU64,
    queries: AtomicU64,
    queries_rejected: AtomicU64,
}

impl Metrics {
    pub fn record_ingest(&self, pages: usize, fetched: usize, kept: usize) {
        self.ingest_runs.fetch_add(1, Ordering::Relaxed);
        self.ingest_pages.fetch_add(pages as u64, Ordering::Relaxed);
        self.ingest_fetched.fetch_add(fetched as u64, Ordering::Relaxed);
        self.ingest_kept.fetch_add(kept as u64, Ordering::Relaxed);
    }

    pub fn record_ingest_error(&self) {
        self.ingest_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_query_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ingest_runs(&self) -> u64 {
        self.ingest_runs.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let runs = self.ingest_runs.load(Ordering::Relaxed);
        let pages = self.ingest_pages.load(Ordering::Relaxed);
        let fetched = self.ingest_fetched.load(Ordering::Relaxed);
        let kept = self.ingest_kept.load(Ordering::Relaxed);
        let errors = self.ingest_errors.load(Ordering::Relaxed);
        let queries = self.queries.load(Ordering::Relaxed);
        let rejected = self.queries_rejected.load(Ordering::Relaxed);

        format!(
            "# TYPE events_ingest_runs_total counter\n\
events_ingest_runs_total {}\n\
# TYPE events_ingest_pages_total counter\n\
events_ingest_pages_total {}\n\
# TYPE events_ingest_fetched_total counter\n\
events_ingest_fetched_total {}\n\
# TYPE events_ingest_kept_total counter\n\
events_ingest_kept_total {}\n\
# TYPE events_ingest_errors_total counter\n\
events_ingest_errors_total {}\n\
# TYPE events_queries_total counter\n\
events_queries_total {}\n\
# TYPE events_queries_rejected_total counter\n\
events_queries_rejected_total {}\n",
            runs, pages, fetched, kept, errors, queries, rejected
        )
    }
}
