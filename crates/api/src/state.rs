use dns_sidecar_application::ports::MetricsPort;
use dns_sidecar_application::services::Lifecycle;
use dns_sidecar_application::use_cases::GetProbeHealthUseCase;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<dyn MetricsPort>,
    pub lifecycle: Arc<Lifecycle>,
    pub probe_health: Arc<GetProbeHealthUseCase>,
}
