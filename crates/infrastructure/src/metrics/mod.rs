pub mod exposition;
pub mod registry;

pub use registry::MetricRegistry;
