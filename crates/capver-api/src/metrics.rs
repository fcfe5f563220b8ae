//! Prometheus counters for registry lookups.
use prometheus::core::Collector;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Kind of lookup being counted
#[derive(Debug, Clone, Copy)]
pub enum LookupKind {
    Version,
    Capver,
}

impl LookupKind {
    fn label(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Capver => "capver",
        }
    }
}

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    lookups: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let lookups = IntCounterVec::new(
            Opts::new("capver_lookups_total", "Registry lookups by kind and result"),
            &["kind", "result"],
        )?;
        registry.register(Box::new(lookups.clone()))?;
        Ok(Self { registry, lookups })
    }

    pub fn record_lookup(&self, kind: LookupKind, known: bool) {
        let result = if known { "known" } else { "unknown" };
        self.lookups.with_label_values(&[kind.label(), result]).inc();
    }

    /// Current count for a label pair; reading never creates a series.
    pub fn lookup_count(&self, kind: LookupKind, known: bool) -> u64 {
        let result = if known { "known" } else { "unknown" };
        let has_label = |metric: &prometheus::proto::Metric, name: &str, value: &str| {
            metric
                .get_label()
                .iter()
                .any(|l| l.get_name() == name && l.get_value() == value)
        };

        self.lookups
            .collect()
            .iter()
            .flat_map(|family| family.get_metric())
            .find(|m| has_label(*m, "kind", kind.label()) && has_label(*m, "result", result))
            .map(|m| m.get_counter().get_value() as u64)
            .unwrap_or(0)
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
