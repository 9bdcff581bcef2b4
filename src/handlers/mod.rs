mod health;
mod messages;
mod metrics;
mod usage;

pub use health::health_handler;
pub use messages::messages_handler;
pub use metrics::metrics_handler;
pub use usage::usage_handler;
