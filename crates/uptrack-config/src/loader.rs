//! Endpoints file loading.

use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{EndpointRecord, EndpointSpec};

/// Load and validate the endpoints file at `path`.
///
/// The file is a YAML sequence of endpoint records. Every record must
/// validate; the first bad one fails the whole load. An empty sequence is
/// valid and yields no endpoints.
pub fn load_endpoints(path: &Path) -> ConfigResult<Vec<EndpointSpec>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Read(format!("{}: {e}", path.display())))?;
    let records: Vec<EndpointRecord> = serde_yaml::from_str(&raw)
        .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
    let endpoints = records
        .into_iter()
        .map(EndpointSpec::try_from)
        .collect::<ConfigResult<Vec<_>>>()?;
    debug!(count = endpoints.len(), path = %path.display(), "endpoints file loaded");
    Ok(endpoints)
}
