pub mod get_probe_health;
pub mod run_probe;

pub use get_probe_health::{GetProbeHealthUseCase, ProbeHealth, ProbeHealthReport};
pub use run_probe::RunProbeUseCase;
