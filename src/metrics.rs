use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("gateway_requests_total", "Total number of proxy requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "gateway_rate_limited_total",
        "Requests rejected by the daily quota"
    )
    .unwrap();
    pub static ref UPSTREAM_FAILURES_TOTAL: Counter = register_counter!(
        "gateway_upstream_failures_total",
        "Upstream transport failures"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "gateway_request_latency_seconds",
        "Proxied request latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge = register_gauge!(
        "gateway_tracked_clients",
        "Clients with recorded usage in the current window"
    )
    .unwrap();
}
