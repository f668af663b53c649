use std::task::{Context, Poll};
use std::time::Instant;

use http::{Request, Response};
use prometheus::{HistogramVec, IntCounterVec, Opts, Registry};
use tower::{Layer, Service};

/// Process-wide counters/histograms for the admin gRPC surface, grounded
/// on the original per-RPC logging-and-metrics interceptor: one
/// request-count and one latency histogram, both labeled by method and
/// outcome.
#[derive(Clone)]
pub struct AdminMetrics {
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
}

impl AdminMetrics {
    pub fn register(registry: &Registry) -> Self {
        let requests_total = IntCounterVec::new(
            Opts::new("meta_transaction_processor_grpc_requests_total", "Admin gRPC requests by method and status."),
            &["method", "status"],
        )
        .expect("metric name and help are static and valid");
        let request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "meta_transaction_processor_grpc_request_duration_seconds",
                "Admin gRPC request latency by method.",
            ),
            &["method"],
        )
        .expect("metric name and help are static and valid");

        registry.register(Box::new(requests_total.clone())).ok();
        registry.register(Box::new(request_duration_seconds.clone())).ok();

        Self { requests_total, request_duration_seconds }
    }
}

/// A [`tower::Layer`] that times every unary call and records a status
/// label from the `grpc-status` response header, logging non-OK outcomes.
#[derive(Clone)]
pub struct GrpcMetricsLayer {
    metrics: AdminMetrics,
}

impl GrpcMetricsLayer {
    pub fn new(metrics: AdminMetrics) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for GrpcMetricsLayer {
    type Service = GrpcMetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GrpcMetricsService { inner, metrics: self.metrics.clone() }
    }
}

#[derive(Clone)]
pub struct GrpcMetricsService<S> {
    inner: S,
    metrics: AdminMetrics,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for GrpcMetricsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let method = request.uri().path().to_string();
        let metrics = self.metrics.clone();
        let start = Instant::now();
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let result = inner.call(request).await;
            let elapsed = start.elapsed().as_secs_f64();
            metrics.request_duration_seconds.with_label_values(&[&method]).observe(elapsed);

            match &result {
                Ok(response) => {
                    let status = response
                        .headers()
                        .get("grpc-status")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("0");
                    metrics.requests_total.with_label_values(&[&method, status]).inc();
                    if status != "0" {
                        tracing::warn!(method = %method, grpc_status = %status, "admin rpc returned non-ok status");
                    }
                }
                Err(error) => {
                    metrics.requests_total.with_label_values(&[&method, "transport_error"]).inc();
                    tracing::error!(method = %method, %error, "admin rpc transport error");
                }
            }
            result
        })
    }
}
