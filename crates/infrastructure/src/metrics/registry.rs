//! Process-wide metric registry.
//!
//! A flat `name -> family` map behind a read-mostly lock. Each family owns
//! its samples as `label values -> AtomicU64`: counters add to the cell,
//! gauges store the bit pattern of an `f64`. Updating an existing sample only
//! takes the shared lock; the exclusive lock is needed to create a family or
//! a new label combination.

use crate::metrics::exposition::{self, FamilySnapshot};
use dns_sidecar_application::ports::{MetricKind, MetricsPort};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

struct Family {
    kind: MetricKind,
    help: Option<String>,
    label_keys: Vec<String>,
    samples: BTreeMap<Vec<String>, AtomicU64>,
}

impl Family {
    fn new(kind: MetricKind, label_keys: Vec<String>) -> Self {
        Self {
            kind,
            help: None,
            label_keys,
            samples: BTreeMap::new(),
        }
    }

    /// Panics when a caller disagrees with the family's declared shape.
    fn check(&self, name: &str, kind: MetricKind, keys: &[&str]) {
        assert!(
            self.kind == kind,
            "metric {} is a {}, used as a {}",
            name,
            self.kind,
            kind
        );
        assert!(
            self.label_keys.iter().map(String::as_str).eq(keys.iter().copied()),
            "metric {} has label keys {:?}, got {:?}",
            name,
            self.label_keys,
            keys
        );
    }
}

#[derive(Default)]
pub struct MetricRegistry {
    families: RwLock<BTreeMap<String, Family>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_cell<R>(
        &self,
        name: &str,
        kind: MetricKind,
        labels: &[(&str, &str)],
        op: impl Fn(&AtomicU64) -> R,
    ) -> R {
        assert!(!name.is_empty(), "metric name must not be empty");
        let keys: Vec<&str> = labels.iter().map(|(k, _)| *k).collect();
        let values: Vec<String> = labels.iter().map(|(_, v)| v.to_string()).collect();

        {
            let families = self.families.read().unwrap_or_else(|e| e.into_inner());
            if let Some(family) = families.get(name) {
                family.check(name, kind, &keys);
                if let Some(cell) = family.samples.get(&values) {
                    return op(cell);
                }
            }
        }

        let mut families = self.families.write().unwrap_or_else(|e| e.into_inner());
        let family = families.entry(name.to_string()).or_insert_with(|| {
            Family::new(kind, keys.iter().map(|k| k.to_string()).collect())
        });
        family.check(name, kind, &keys);
        let cell = family
            .samples
            .entry(values)
            .or_insert_with(|| AtomicU64::new(0));
        op(cell)
    }

    fn read_cell(&self, name: &str, kind: MetricKind, labels: &[(&str, &str)]) -> Option<u64> {
        let families = self.families.read().unwrap_or_else(|e| e.into_inner());
        let family = families.get(name).filter(|f| f.kind == kind)?;
        let values: Vec<String> = labels.iter().map(|(_, v)| v.to_string()).collect();
        family
            .samples
            .get(&values)
            .map(|cell| cell.load(Ordering::Acquire))
    }

    /// Copies every non-empty family under the shared lock.
    fn copy_families(&self) -> Vec<FamilySnapshot> {
        let families = self.families.read().unwrap_or_else(|e| e.into_inner());
        families
            .iter()
            .filter(|(_, family)| !family.samples.is_empty())
            .map(|(name, family)| FamilySnapshot {
                name: name.clone(),
                kind: family.kind,
                help: family.help.clone(),
                label_keys: family.label_keys.clone(),
                samples: family
                    .samples
                    .iter()
                    .map(|(values, cell)| (values.clone(), cell.load(Ordering::Acquire)))
                    .collect(),
            })
            .collect()
    }

    pub fn family_count(&self) -> usize {
        self.families
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl MetricsPort for MetricRegistry {
    fn describe(&self, name: &str, kind: MetricKind, help: &str, label_keys: &[&str]) {
        let mut families = self.families.write().unwrap_or_else(|e| e.into_inner());
        let family = families.entry(name.to_string()).or_insert_with(|| {
            Family::new(kind, label_keys.iter().map(|k| k.to_string()).collect())
        });
        family.check(name, kind, label_keys);
        family.help = Some(help.to_string());
    }

    fn counter_add(&self, name: &str, labels: &[(&str, &str)], delta: u64) {
        self.with_cell(name, MetricKind::Counter, labels, |cell| {
            cell.fetch_add(delta, Ordering::AcqRel);
        });
    }

    fn gauge_set(&self, name: &str, labels: &[(&str, &str)], value: f64) {
        self.with_cell(name, MetricKind::Gauge, labels, |cell| {
            cell.store(value.to_bits(), Ordering::Release);
        });
    }

    fn counter_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<u64> {
        self.read_cell(name, MetricKind::Counter, labels)
    }

    fn gauge_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        self.read_cell(name, MetricKind::Gauge, labels)
            .map(f64::from_bits)
    }

    fn snapshot(&self) -> Vec<u8> {
        let families = self.copy_families();
        exposition::render(&families).into_bytes()
    }
}
