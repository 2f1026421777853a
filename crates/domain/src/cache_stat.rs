use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::probe_spec::normalize_query_name;
use crate::DomainError;

/// Well-known CHAOS-class pseudo names answered by dnsmasq-style caches.
const KNOWN_STATS: &[(&str, &str)] = &[
    ("cachesize", "cachesize.bind."),
    ("hits", "hits.bind."),
    ("misses", "misses.bind."),
    ("evictions", "evictions.bind."),
    ("insertions", "insertions.bind."),
    ("auth_answers", "auth.bind."),
    ("servers", "servers.bind."),
];

const DEFAULT_STATS: &[&str] = &[
    "cachesize",
    "hits",
    "misses",
    "evictions",
    "insertions",
    "auth_answers",
];

/// One cache statistic: the gauge suffix and the CHAOS TXT name to ask for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheStat {
    name: String,
    query_name: String,
}

impl CacheStat {
    pub fn new(name: &str, query_name: &str) -> Result<Self, DomainError> {
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid_name {
            return Err(DomainError::InvalidCacheStat(format!(
                "'{}' must match [a-z0-9_]+",
                name
            )));
        }

        let query_name = normalize_query_name(query_name)
            .map_err(|e| DomainError::InvalidCacheStat(e.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            query_name,
        })
    }

    pub fn known(name: &str) -> Option<Self> {
        KNOWN_STATS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(name, query)| Self {
                name: name.to_string(),
                query_name: query.to_string(),
            })
    }

    pub fn defaults() -> Vec<Self> {
        DEFAULT_STATS.iter().filter_map(|name| Self::known(name)).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query_name(&self) -> &str {
        &self.query_name
    }

    /// Gauge published for this statistic, e.g. `dns_cache_hits`.
    pub fn metric_name(&self) -> String {
        format!("dns_cache_{}", self.name)
    }

    fn is_known_mapping(&self) -> bool {
        KNOWN_STATS
            .iter()
            .any(|(name, query)| *name == self.name && *query == self.query_name)
    }
}

impl FromStr for CacheStat {
    type Err = DomainError;

    /// Accepts a known stat name (`hits`) or a custom `name=query.name.` pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, query)) => Self::new(name.trim(), query.trim()),
            None => Self::known(s.trim()).ok_or_else(|| {
                DomainError::InvalidCacheStat(format!("unknown cache statistic '{}'", s))
            }),
        }
    }
}

impl fmt::Display for CacheStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known_mapping() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}={}", self.name, self.query_name)
        }
    }
}

impl TryFrom<String> for CacheStat {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CacheStat> for String {
    fn from(stat: CacheStat) -> Self {
        stat.to_string()
    }
}
