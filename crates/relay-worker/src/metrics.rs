use prometheus::{IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry};

/// The worker's process-wide Prometheus metrics, registered once at boot
/// and shared (by clone, all fields are cheap handles) across every
/// wallet's [`crate::TickerWorker`].
#[derive(Clone)]
pub struct WorkerMetrics {
    pub ticks_total: IntCounter,
    pub tick_errors_total: IntCounterVec,
    pub latest_block: IntGauge,
    pub submitted_tx_block_age: IntGaugeVec,
}

impl WorkerMetrics {
    pub fn register(registry: &Registry) -> Self {
        let ticks_total =
            IntCounter::new("meta_transaction_processor_ticks_total", "Number of ticks run across all wallets.")
                .expect("metric name and help are static and valid");
        let tick_errors_total = IntCounterVec::new(
            Opts::new("meta_transaction_processor_tick_errors_total", "Number of ticks that returned an error."),
            &["wallet_index"],
        )
        .expect("metric name and help are static and valid");
        let latest_block =
            IntGauge::new("meta_transaction_processor_latest_block", "Most recently observed chain head.")
                .expect("metric name and help are static and valid");
        let submitted_tx_block_age = IntGaugeVec::new(
            Opts::new(
                "meta_transaction_processor_submitted_tx_block_age",
                "Blocks elapsed since the active request was last (re-)broadcast.",
            ),
            &["wallet_index"],
        )
        .expect("metric name and help are static and valid");

        registry.register(Box::new(ticks_total.clone())).ok();
        registry.register(Box::new(tick_errors_total.clone())).ok();
        registry.register(Box::new(latest_block.clone())).ok();
        registry.register(Box::new(submitted_tx_block_age.clone())).ok();

        Self { ticks_total, tick_errors_total, latest_block, submitted_tx_block_age }
    }
}
