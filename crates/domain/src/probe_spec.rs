//! Probe specification and its `--probe` string form.
//!
//! ```text
//! NAME,SERVER,QUERY_NAME,INTERVAL_SECONDS[,TYPE][,key=value]...
//! ```
//!
//! Keyed options: `expect=ok|nxdomain`, `transport=auto|udp|tcp`,
//! `timeout_ms=N`. The canonical form produced by `Display` always carries
//! `TYPE` and only the options that differ from their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::{DomainError, ExpectedOutcome, RecordType, TransportMode};

const MAX_NAME_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProbeSpec {
    pub name: String,
    pub server: SocketAddr,
    /// Always fully qualified (trailing dot).
    pub query_name: String,
    pub query_type: RecordType,
    pub interval: Duration,
    pub timeout: Duration,
    pub expected: ExpectedOutcome,
    pub transport: TransportMode,
}

impl ProbeSpec {
    pub fn new(
        name: &str,
        server: SocketAddr,
        query_name: &str,
        interval: Duration,
    ) -> Result<Self, DomainError> {
        validate_probe_name(name)?;
        if interval.is_zero() {
            return Err(DomainError::invalid_spec(name, "invalid interval: must be positive"));
        }
        let query_name = normalize_query_name(query_name)?;

        Ok(Self {
            name: name.to_string(),
            server,
            query_name,
            query_type: RecordType::default(),
            interval,
            timeout: default_timeout(interval),
            expected: ExpectedOutcome::from_probe_name(name),
            transport: TransportMode::default(),
        })
    }

    pub fn with_query_type(mut self, query_type: RecordType) -> Self {
        self.query_type = query_type;
        self
    }

    pub fn with_expected(mut self, expected: ExpectedOutcome) -> Self {
        self.expected = expected;
        self
    }

    pub fn with_transport(mut self, transport: TransportMode) -> Self {
        self.transport = transport;
        self
    }

    /// Per-query deadline, never longer than the interval.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.min(self.interval);
        self
    }

    fn has_default_timeout(&self) -> bool {
        self.timeout == default_timeout(self.interval)
    }
}

fn default_timeout(interval: Duration) -> Duration {
    interval / 2
}

pub fn validate_probe_name(name: &str) -> Result<(), DomainError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DomainError::invalid_spec(
            name,
            "label must be of format [A-Za-z_][A-Za-z0-9_]*",
        ))
    }
}

/// Appends the root dot and checks label lengths and characters.
pub fn normalize_query_name(name: &str) -> Result<String, DomainError> {
    if name.is_empty() {
        return Err(DomainError::InvalidDomainName("empty name".to_string()));
    }
    if name == "." {
        return Ok(name.to_string());
    }

    let fqdn = if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    };

    if fqdn.len() - 1 > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidDomainName(format!(
            "'{}' is longer than {} characters",
            name, MAX_NAME_LENGTH
        )));
    }

    for label in fqdn[..fqdn.len() - 1].split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' has an empty or oversized label",
                name
            )));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' contains invalid characters",
                name
            )));
        }
    }

    Ok(fqdn)
}

impl FromStr for ProbeSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() < 4 {
            return Err(DomainError::invalid_spec(
                s,
                "invalid format to --probe, expected NAME,SERVER,QUERY_NAME,INTERVAL_SECONDS[,TYPE]",
            ));
        }

        let name = fields[0];
        validate_probe_name(name).map_err(|_| {
            DomainError::invalid_spec(s, "label must be of format [A-Za-z_][A-Za-z0-9_]*")
        })?;

        let server: SocketAddr = fields[1].parse().map_err(|_| {
            DomainError::invalid_spec(s, format!("invalid server address '{}'", fields[1]))
        })?;

        let interval_secs: u64 = fields[3].parse().map_err(|_| {
            DomainError::invalid_spec(s, format!("invalid interval '{}': invalid syntax", fields[3]))
        })?;
        if interval_secs == 0 {
            return Err(DomainError::invalid_spec(s, "invalid interval: must be positive"));
        }

        let mut spec = ProbeSpec::new(name, server, fields[2], Duration::from_secs(interval_secs))
            .map_err(|e| DomainError::invalid_spec(s, e.to_string()))?;

        let mut seen_type = false;
        let mut seen_keys: Vec<&str> = Vec::new();
        let mut explicit_timeout = None;

        for field in &fields[4..] {
            match field.split_once('=') {
                None => {
                    if seen_type || !seen_keys.is_empty() {
                        return Err(DomainError::invalid_spec(s, "invalid format to --probe"));
                    }
                    spec.query_type = field.parse().map_err(|e: String| {
                        DomainError::invalid_spec(s, e)
                    })?;
                    seen_type = true;
                }
                Some((key, value)) => {
                    if seen_keys.contains(&key) {
                        return Err(DomainError::invalid_spec(
                            s,
                            format!("invalid option: '{}' given twice", key),
                        ));
                    }
                    seen_keys.push(key);

                    match key {
                        "expect" => {
                            spec.expected = value
                                .parse()
                                .map_err(|e: DomainError| DomainError::invalid_spec(s, e.to_string()))?;
                        }
                        "transport" => {
                            spec.transport = value
                                .parse()
                                .map_err(|e: DomainError| DomainError::invalid_spec(s, e.to_string()))?;
                        }
                        "timeout_ms" => {
                            let ms: u64 = value.parse().ok().filter(|ms| *ms > 0).ok_or_else(|| {
                                DomainError::invalid_spec(
                                    s,
                                    format!("invalid option: timeout_ms '{}'", value),
                                )
                            })?;
                            explicit_timeout = Some(Duration::from_millis(ms));
                        }
                        other => {
                            return Err(DomainError::invalid_spec(
                                s,
                                format!("invalid option: unknown key '{}'", other),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(timeout) = explicit_timeout {
            spec = spec.with_timeout(timeout);
        }

        Ok(spec)
    }
}

impl fmt::Display for ProbeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.name,
            self.server,
            self.query_name,
            self.interval.as_secs(),
            self.query_type
        )?;

        if self.expected != ExpectedOutcome::from_probe_name(&self.name) {
            write!(f, ",expect={}", self.expected)?;
        }
        if self.transport != TransportMode::default() {
            write!(f, ",transport={}", self.transport)?;
        }
        if !self.has_default_timeout() {
            write!(f, ",timeout_ms={}", self.timeout.as_millis())?;
        }
        Ok(())
    }
}

impl TryFrom<String> for ProbeSpec {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProbeSpec> for String {
    fn from(spec: ProbeSpec) -> Self {
        spec.to_string()
    }
}
