pub mod dns;
pub mod metrics;
