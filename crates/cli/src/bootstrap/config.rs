use super::logging::validate_log_level;
use crate::SidecarError;
use dns_sidecar_domain::{CliOverrides, Config};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> Result<Config, SidecarError> {
    let config = Config::load(path, overrides)?;
    validate_log_level(&config.logging)?;
    Ok(config)
}
