pub mod metrics;
pub mod sink;

pub use metrics::CounterState;
pub use sink::{MetricsEvent, MetricsSink, TreeLevel, metrics_report, metrics_reset_all};
