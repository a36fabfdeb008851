//! Metric names and recording helpers for the combine pipeline

use std::time::Instant;

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};

pub const COMBINE_REQUEST_DURATION: &str = "combine.request.duration";
pub const COMBINE_REQUEST_COUNT: &str = "combine.request.count";
pub const COMBINE_STEP_DURATION: &str = "combine.step.duration";

/// Instruments recorded by the combine pipeline
///
/// Backed by the global meter provider, so recording is a no-op until an
/// exporter is configured.
#[derive(Clone)]
pub struct PipelineMetrics {
    request_duration: Histogram<f64>,
    request_count: Counter<u64>,
    step_duration: Histogram<f64>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        let meter = global::meter("overdub");

        Self {
            request_duration: meter
                .f64_histogram(COMBINE_REQUEST_DURATION)
                .with_unit("s")
                .with_description("End-to-end duration of combine requests")
                .build(),
            request_count: meter
                .u64_counter(COMBINE_REQUEST_COUNT)
                .with_description("Combine requests by outcome")
                .build(),
            step_duration: meter
                .f64_histogram(COMBINE_STEP_DURATION)
                .with_unit("s")
                .with_description("Duration of individual pipeline steps")
                .build(),
        }
    }

    /// Record a finished request; `outcome` is `ok`, `invalid_input` or `internal_error`
    pub fn record_request(&self, start: Instant, outcome: &'static str) {
        let attributes = [KeyValue::new("outcome", outcome)];
        self.request_duration.record(start.elapsed().as_secs_f64(), &attributes);
        self.request_count.add(1, &attributes);
    }

    /// Record how long one pipeline step took
    pub fn record_step(&self, start: Instant, step: &'static str) {
        self.step_duration
            .record(start.elapsed().as_secs_f64(), &[KeyValue::new("step", step)]);
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}
