//! Prometheus counters exposed on `/metrics`.
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Result of one `/generate` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Invalid,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Invalid => "invalid",
            Self::Error => "error",
        }
    }
}

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    generate_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let generate_total = IntCounterVec::new(
            Opts::new("ordermail_generate_total", "Email generation requests by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(generate_total.clone()))?;
        Ok(Self {
            registry,
            generate_total,
        })
    }

    pub fn record(&self, outcome: Outcome) {
        self.generate_total.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
