//! Metrics sink boundary.
//!
//! Codec logic never counts anything itself. All instrumentation flows
//! through `MetricsEvent` and `MetricsSink`; a process installs at most
//! one sink, once, and everything before that lands in a no-op.

use crate::strategy::Strategy;
use std::sync::OnceLock;

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    EncodeCompleted {
        message: &'a str,
        strategy: Strategy,
        bytes: usize,
    },
    DecodeCompleted {
        message: &'a str,
        strategy: Strategy,
        bytes: usize,
    },
    ModelFrozen {
        messages: usize,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent<'_>);
}

///
/// NopSink
///

pub struct NopSink;

impl MetricsSink for NopSink {
    fn record(&self, _: MetricsEvent<'_>) {}
}

static SINK: OnceLock<Box<dyn MetricsSink>> = OnceLock::new();
static NOP: NopSink = NopSink;

/// Install the process-wide sink. Only the first call wins; the return
/// value says whether this call was the one that installed it.
pub fn set_sink(sink: Box<dyn MetricsSink>) -> bool {
    SINK.set(sink).is_ok()
}

#[must_use]
pub fn sink() -> &'static dyn MetricsSink {
    SINK.get().map_or(&NOP, Box::as_ref)
}

///
/// TESTS
///
