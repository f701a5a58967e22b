// src/metrics.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct Metrics {
    pub events_created: AtomicU64,
    pub events_listed: AtomicU64,
    pub quotes_total: AtomicU64,
    pub quotes_no_sale: AtomicU64,
    pub request_errors: AtomicU64,

    // ultra-cheap latency "histogram" for the pricing scan (ns buckets)
    pub quote_lat_b0: AtomicU64,
    pub quote_lat_b1: AtomicU64,
    pub quote_lat_b2: AtomicU64,
    pub quote_lat_b3: AtomicU64,
    pub quote_lat_b4: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc_event_created(&self) {
        self.events_created.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_events_listed(&self) {
        self.events_listed.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_quote(&self) {
        self.quotes_total.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_no_sale(&self) {
        self.quotes_no_sale.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_request_error(&self) {
        self.request_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_quote(&self, dur: Duration) {
        let ns = dur.as_nanos() as u64;
        // buckets: <1us, <10us, <100us, <1ms, >=1ms
        if ns < 1_000 {
            self.quote_lat_b0.fetch_add(1, Ordering::Relaxed);
        } else if ns < 10_000 {
            self.quote_lat_b1.fetch_add(1, Ordering::Relaxed);
        } else if ns < 100_000 {
            self.quote_lat_b2.fetch_add(1, Ordering::Relaxed);
        } else if ns < 1_000_000 {
            self.quote_lat_b3.fetch_add(1, Ordering::Relaxed);
        } else {
            self.quote_lat_b4.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn prometheus_text(&self) -> String {
        // NOTE: totals can stay Relaxed; prom scrape consistency isn't transactional anyway.
        let created = self.events_created.load(Ordering::Relaxed);
        let listed = self.events_listed.load(Ordering::Relaxed);
        let quotes = self.quotes_total.load(Ordering::Relaxed);
        let no_sale = self.quotes_no_sale.load(Ordering::Relaxed);
        let errs = self.request_errors.load(Ordering::Relaxed);

        let b0 = self.quote_lat_b0.load(Ordering::Relaxed);
        let b1 = self.quote_lat_b1.load(Ordering::Relaxed);
        let b2 = self.quote_lat_b2.load(Ordering::Relaxed);
        let b3 = self.quote_lat_b3.load(Ordering::Relaxed);
        let b4 = self.quote_lat_b4.load(Ordering::Relaxed);

        format!(
            "\
# TYPE boxoffice_events_created_total counter
boxoffice_events_created_total {created}
# TYPE boxoffice_events_listed_total counter
boxoffice_events_listed_total {listed}
# TYPE boxoffice_quotes_total counter
boxoffice_quotes_total {quotes}
# TYPE boxoffice_quotes_no_sale_total counter
boxoffice_quotes_no_sale_total {no_sale}
# TYPE boxoffice_request_errors_total counter
boxoffice_request_errors_total {errs}
# TYPE boxoffice_quote_latency_bucket counter
boxoffice_quote_latency_bucket{{le=\"1000\"}} {b0}
boxoffice_quote_latency_bucket{{le=\"10000\"}} {b1}
boxoffice_quote_latency_bucket{{le=\"100000\"}} {b2}
boxoffice_quote_latency_bucket{{le=\"1000000\"}} {b3}
boxoffice_quote_latency_bucket{{le=\"+Inf\"}} {b4}
"
        )
    }
}
