//! Endpoint descriptor types.
//!
//! An endpoint enters the system as a raw [`EndpointRecord`] straight out of
//! the YAML file and is promoted to a validated [`EndpointSpec`] before any
//! probing happens. The validated form carries the derived aggregation host
//! so the monitor never re-parses URLs at probe time.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

// ── Http method ────────────────────────────────────────────────────

/// Request method for a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl HttpMethod {
    /// Canonical uppercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ConfigError;

    /// Parses case-insensitively; the endpoints file may say `get` or `GET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "head" => Ok(HttpMethod::Head),
            "options" => Ok(HttpMethod::Options),
            "patch" => Ok(HttpMethod::Patch),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

// ── Endpoint descriptors ───────────────────────────────────────────

/// One entry of the endpoints file, exactly as written.
///
/// Unknown fields are rejected at parse time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointRecord {
    pub url: String,
    pub method: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

/// A validated probe target.
///
/// `host` is derived from the URL authority once, at load time, and is the
/// key all availability counters aggregate under. Two descriptors whose URLs
/// share a host (port and path notwithstanding) share one counter.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    url: Url,
    host: String,
    method: HttpMethod,
    headers: HashMap<String, String>,
    body: Option<String>,
}

impl EndpointSpec {
    /// Shorthand for a bare GET of `url`.
    pub fn get(url: &str) -> ConfigResult<Self> {
        EndpointRecord {
            url: url.to_string(),
            method: None,
            headers: HashMap::new(),
            body: None,
        }
        .try_into()
    }

    /// Replace the request method.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Add one request header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Full probe URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Aggregation key: the URL's host, without port.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Request method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Extra request headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Optional request body.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl TryFrom<EndpointRecord> for EndpointSpec {
    type Error = ConfigError;

    fn try_from(record: EndpointRecord) -> Result<Self, Self::Error> {
        if record.url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        let url = Url::parse(&record.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {e}", record.url)))?;
        let host = url
            .host_str()
            .ok_or_else(|| ConfigError::MissingHost(record.url.clone()))?
            .to_string();
        let method = match record.method.as_deref() {
            Some(raw) => raw.parse()?,
            None => HttpMethod::default(),
        };
        Ok(Self {
            url,
            host,
            method,
            headers: record.headers,
            body: record.body,
        })
    }
}
