use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::scoring::Category;

/// Prometheus collectors for this process, owned by `AppState`.
pub struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    token_exchanges_total: IntCounterVec,
    scores_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )?;

        let token_exchanges_total = IntCounterVec::new(
            Opts::new(
                "oauth_token_exchanges_total",
                "Authorization code exchanges by outcome",
            ),
            &["outcome"],
        )?;

        let scores_total = IntCounterVec::new(
            Opts::new(
                "bone_strength_scores_total",
                "Bone strength results rendered by category",
            ),
            &["category"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(token_exchanges_total.clone()))?;
        registry.register(Box::new(scores_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            token_exchanges_total,
            scores_total,
        })
    }

    pub fn observe_request(&self, method: &str, path: &str, status: &str, seconds: f64) {
        let labels = [method, path, status];
        self.http_requests_total.with_label_values(&labels).inc();
        self.http_request_duration_seconds
            .with_label_values(&labels)
            .observe(seconds);
    }

    pub fn record_token_exchange(&self, outcome: &str) {
        self.token_exchanges_total
            .with_label_values(&[outcome])
            .inc();
    }

    pub fn record_score(&self, category: Category) {
        self.scores_total
            .with_label_values(&[category.label()])
            .inc();
    }

    /// Text exposition format for `/metrics`.
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_recorded_samples() {
        let metrics = Metrics::new().unwrap();
        metrics.record_token_exchange("success");
        metrics.record_score(Category::Superhuman);
        metrics.observe_request("GET", "/", "200", 0.01);

        let output = metrics.render().unwrap();
        assert!(output.contains("oauth_token_exchanges_total{outcome=\"success\"} 1"));
        assert!(output.contains("bone_strength_scores_total{category=\"superhuman\"} 1"));
        assert!(output.contains("http_requests_total{method=\"GET\",path=\"/\",status=\"200\"} 1"));
    }
}
