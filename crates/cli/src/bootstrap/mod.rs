mod config;
mod logging;

pub use config::load_config;
pub use logging::{init_fallback_logging, init_logging, validate_log_level, verbosity_filter};
