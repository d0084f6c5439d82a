//! Prometheus metrics for chatbot-service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Registry and collectors, installed together so they never disagree.
struct Metrics {
    registry: Registry,
    api_responses: IntCounterVec,
    provider_latency: HistogramVec,
    provider_errors: IntCounterVec,
    retrieval_documents: IntCounterVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Initialize all metrics. Later calls are no-ops.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if METRICS.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    // Envelope outcomes by code (200 / 400 / 500)
    let api_responses = IntCounterVec::new(
        Opts::new("api_responses_total", "API envelopes returned, by envelope code"),
        &["code"],
    )?;

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "llm_provider_latency_seconds",
            "LLM provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "model"],
    )?;

    let provider_errors = IntCounterVec::new(
        Opts::new("llm_provider_errors_total", "Total LLM provider errors"),
        &["provider", "error_type"],
    )?;

    let retrieval_documents = IntCounterVec::new(
        Opts::new(
            "retrieval_documents_total",
            "Documents returned by vector store retrievals",
        ),
        &["store"],
    )?;

    registry.register(Box::new(api_responses.clone()))?;
    registry.register(Box::new(provider_latency.clone()))?;
    registry.register(Box::new(provider_errors.clone()))?;
    registry.register(Box::new(retrieval_documents.clone()))?;

    // A concurrent initializer may have won; its collectors are kept.
    if METRICS
        .set(Metrics {
            registry,
            api_responses,
            provider_latency,
            provider_errors,
            retrieval_documents,
        })
        .is_ok()
    {
        tracing::info!("Prometheus metrics initialized");
    }
    Ok(())
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match METRICS.get() {
        Some(m) => &m.registry,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

// Helper functions for recording metrics

pub fn record_envelope(code: u16) {
    if let Some(m) = METRICS.get() {
        let code = code.to_string();
        m.api_responses.with_label_values(&[code.as_str()]).inc();
    }
}

pub fn record_provider_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(m) = METRICS.get() {
        m.provider_latency
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(m) = METRICS.get() {
        m.provider_errors.with_label_values(&[provider, error_type]).inc();
    }
}

pub fn record_retrieval(store: &str, documents: usize) {
    if let Some(m) = METRICS.get() {
        m.retrieval_documents
            .with_label_values(&[store])
            .inc_by(documents as u64);
    }
}
