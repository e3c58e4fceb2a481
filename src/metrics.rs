// Prometheus metrics definitions for the Blotto backend.

use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Combinations in the game currently held by the server.
    pub static ref CURRENT_GAME_COMBOS: IntGauge =
        IntGauge::new("blotto_current_game_combos", "Combinations in the current game").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Games created through /new_game.
    pub static ref NEW_GAMES_TOTAL: IntCounter =
        IntCounter::new("blotto_new_games_total", "Games created").unwrap();

    /// Completed solver runs.
    pub static ref SOLVES_TOTAL: IntCounter =
        IntCounter::new("blotto_solves_total", "Completed solver runs").unwrap();

    /// Solver runs that failed to produce a result.
    pub static ref SOLVE_ERRORS_TOTAL: IntCounter =
        IntCounter::new("blotto_solve_errors_total", "Solver runs that failed").unwrap();

    /// Total API requests, by method/endpoint/status.
    pub static ref API_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("blotto_api_requests_total", "Total API requests"),
        &["method", "endpoint", "status"],
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Wall time of one solver run in seconds.
    pub static ref SOLVE_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("blotto_solve_duration_seconds", "Solver run time in seconds")
            .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0, 120.0]),
    )
    .unwrap();
}

static REGISTER: Once = Once::new();

/// Register all metrics with the custom registry. Safe to call more than once.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(CURRENT_GAME_COMBOS.clone()),
            Box::new(NEW_GAMES_TOTAL.clone()),
            Box::new(SOLVES_TOTAL.clone()),
            Box::new(SOLVE_ERRORS_TOTAL.clone()),
            Box::new(API_REQUESTS_TOTAL.clone()),
            Box::new(SOLVE_DURATION_SECONDS.clone()),
        ];

        for c in collectors {
            if let Err(e) = REGISTRY.register(c) {
                tracing::warn!("Failed to register metric: {e}");
            }
        }
    });
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {e}");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
