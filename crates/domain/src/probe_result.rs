use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Outcome of a single probe query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProbeResult {
    Ok,
    NxDomain,
    ServFail,
    Timeout,
    Error,
}

impl ProbeResult {
    pub const ALL: [ProbeResult; 5] = [
        ProbeResult::Ok,
        ProbeResult::NxDomain,
        ProbeResult::ServFail,
        ProbeResult::Timeout,
        ProbeResult::Error,
    ];

    /// Label value used in `probe_dns_total{result=...}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeResult::Ok => "ok",
            ProbeResult::NxDomain => "nxdomain",
            ProbeResult::ServFail => "servfail",
            ProbeResult::Timeout => "timeout",
            ProbeResult::Error => "error",
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result a probe considers healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpectedOutcome {
    #[default]
    Ok,
    NxDomain,
}

impl ExpectedOutcome {
    const NXDOMAIN_PREFIX: &'static str = "nxdomain";

    /// Legacy naming convention: probes called `nxdomain*` expect NXDOMAIN.
    pub fn from_probe_name(name: &str) -> Self {
        if name.starts_with(Self::NXDOMAIN_PREFIX) {
            ExpectedOutcome::NxDomain
        } else {
            ExpectedOutcome::Ok
        }
    }

    pub fn matches(&self, result: ProbeResult) -> bool {
        matches!(
            (self, result),
            (ExpectedOutcome::Ok, ProbeResult::Ok)
                | (ExpectedOutcome::NxDomain, ProbeResult::NxDomain)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedOutcome::Ok => "ok",
            ExpectedOutcome::NxDomain => "nxdomain",
        }
    }
}

impl fmt::Display for ExpectedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpectedOutcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ok" => Ok(ExpectedOutcome::Ok),
            "nxdomain" => Ok(ExpectedOutcome::NxDomain),
            other => Err(DomainError::ConfigError(format!(
                "expected outcome must be 'ok' or 'nxdomain', got '{}'",
                other
            ))),
        }
    }
}
