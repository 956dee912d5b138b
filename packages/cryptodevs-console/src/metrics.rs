//! Prometheus metrics (lock-free atomics, zero allocation on hot path).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    // --- Actions ---
    pub action_total: AtomicU64,
    pub action_success: AtomicU64,
    pub action_error: AtomicU64,
    pub action_refused: AtomicU64,

    // --- Latency (μs, updated via CAS) ---
    pub action_duration_us_sum: AtomicU64,
    pub action_duration_us_max: AtomicU64,

    // --- Chain reads ---
    pub read_total: AtomicU64,
    pub read_errors: AtomicU64,
    pub wrong_network: AtomicU64,
    pub poll_ticks: AtomicU64,

    // --- Metadata ---
    pub metadata_requests: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            action_total: AtomicU64::new(0),
            action_success: AtomicU64::new(0),
            action_error: AtomicU64::new(0),
            action_refused: AtomicU64::new(0),
            action_duration_us_sum: AtomicU64::new(0),
            action_duration_us_max: AtomicU64::new(0),
            read_total: AtomicU64::new(0),
            read_errors: AtomicU64::new(0),
            wrong_network: AtomicU64::new(0),
            poll_ticks: AtomicU64::new(0),
            metadata_requests: AtomicU64::new(0),
        }
    }

    pub fn record_action_duration(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.action_duration_us_sum.fetch_add(us, Ordering::Relaxed);
        // CAS loop for max tracking
        let mut cur = self.action_duration_us_max.load(Ordering::Relaxed);
        while us > cur {
            match self.action_duration_us_max.compare_exchange_weak(
                cur,
                us,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => cur = actual,
            }
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self, tokens_minted: Option<u64>, max_supply: u64) -> String {
        let action_total = self.action_total.load(Ordering::Relaxed);
        let action_success = self.action_success.load(Ordering::Relaxed);
        let action_error = self.action_error.load(Ordering::Relaxed);
        let action_refused = self.action_refused.load(Ordering::Relaxed);
        let dur_sum = self.action_duration_us_sum.load(Ordering::Relaxed);
        let dur_max = self.action_duration_us_max.swap(0, Ordering::Relaxed);
        let read_total = self.read_total.load(Ordering::Relaxed);
        let read_errors = self.read_errors.load(Ordering::Relaxed);
        let wrong_network = self.wrong_network.load(Ordering::Relaxed);
        let poll_ticks = self.poll_ticks.load(Ordering::Relaxed);
        let metadata_requests = self.metadata_requests.load(Ordering::Relaxed);

        // Convert μs to seconds for Prometheus conventions
        let dur_sum_s = dur_sum as f64 / 1_000_000.0;
        let dur_max_s = dur_max as f64 / 1_000_000.0;

        let mut out = format!(
            "\
# HELP console_action_total Contract actions requested.\n\
# TYPE console_action_total counter\n\
console_action_total {action_total}\n\
# HELP console_action_success_total Actions confirmed on-chain.\n\
# TYPE console_action_success_total counter\n\
console_action_success_total {action_success}\n\
# HELP console_action_error_total Actions that failed.\n\
# TYPE console_action_error_total counter\n\
console_action_error_total {action_error}\n\
# HELP console_action_refused_total Actions refused while another was in flight.\n\
# TYPE console_action_refused_total counter\n\
console_action_refused_total {action_refused}\n\
# HELP console_action_duration_seconds_sum Total action time (seconds).\n\
# TYPE console_action_duration_seconds_sum counter\n\
console_action_duration_seconds_sum {dur_sum_s:.6}\n\
# HELP console_action_duration_seconds_max Max action time since last scrape (seconds).\n\
# TYPE console_action_duration_seconds_max gauge\n\
console_action_duration_seconds_max {dur_max_s:.6}\n\
# HELP console_read_total Contract view calls.\n\
# TYPE console_read_total counter\n\
console_read_total {read_total}\n\
# HELP console_read_errors_total Failed contract view calls.\n\
# TYPE console_read_errors_total counter\n\
console_read_errors_total {read_errors}\n\
# HELP console_wrong_network_total Operations refused by the network guard.\n\
# TYPE console_wrong_network_total counter\n\
console_wrong_network_total {wrong_network}\n\
# HELP console_poll_ticks_total Poller ticks.\n\
# TYPE console_poll_ticks_total counter\n\
console_poll_ticks_total {poll_ticks}\n\
# HELP console_metadata_requests_total Token metadata requests served.\n\
# TYPE console_metadata_requests_total counter\n\
console_metadata_requests_total {metadata_requests}\n\
# HELP console_max_supply Collection size.\n\
# TYPE console_max_supply gauge\n\
console_max_supply {max_supply}\n"
        );
        if let Some(minted) = tokens_minted {
            out.push_str(&format!(
                "\
# HELP console_tokens_minted Tokens minted, as last read from the contract.\n\
# TYPE console_tokens_minted gauge\n\
console_tokens_minted {minted}\n"
            ));
        }
        out
    }
}
