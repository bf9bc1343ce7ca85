//! uptrack-config: endpoint descriptors for the uptrack monitor.
//!
//! The endpoints file is a YAML sequence of records, one per probe target:
//!
//! ```yaml
//! - url: https://svc.test/health
//! - url: https://svc.test:8443/admin/health
//!   method: head
//! - url: https://api.example.com/status
//!   headers:
//!     authorization: Bearer token
//!   body: '{"ping": true}'
//! ```
//!
//! Records are promoted to validated [`EndpointSpec`]s at load time, which
//! also derives the per-host aggregation key from the URL authority.
//! Validation is strict: an unreadable file, a malformed record, or an
//! unusable URL fails the whole load with a [`ConfigError`]. A load either
//! yields every endpoint or none.

pub mod error;
pub mod loader;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_endpoints;
pub use types::{EndpointRecord, EndpointSpec, HttpMethod};
