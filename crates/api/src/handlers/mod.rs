pub mod health;
pub mod metrics;
pub mod probe_health;

pub use health::{health_check, not_found};
pub use metrics::get_metrics;
pub use probe_health::get_probe_health;
