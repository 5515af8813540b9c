//! Observability: run telemetry events and the sink abstraction.
//!
//! The executor never talks to a metrics backend directly; everything
//! flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EventReport, MetricsRecorder, PassCounters};
pub use sink::{MetricsEvent, MetricsSink, PassKind};
