//! Historical volume/freshness catalog kept per written table.

use std::collections::HashMap;

use crate::context::QueryContext;

/// Number of trailing samples the freshness check looks at.
pub const VOLUME_SAMPLE_WINDOW: usize = 3;

/// A single volume observation for a table write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSample {
    pub volume: i64,
    /// Query end time, formatted; absent when the context carried no time.
    pub recorded_at: Option<String>,
}

/// Append-only history of a table's written volumes plus its most recent
/// rendered detail.
#[derive(Debug, Clone, Default)]
pub struct CatalogEntry {
    samples: Vec<VolumeSample>,
    last_detail: Option<String>,
}

impl CatalogEntry {
    fn record(&mut self, context: &QueryContext) {
        self.samples.push(VolumeSample {
            volume: context.volume(),
            recorded_at: context.formatted_time(),
        });
        self.last_detail = Some(context.to_html());
    }

    pub fn samples(&self) -> &[VolumeSample] {
        &self.samples
    }

    /// The trailing [`VOLUME_SAMPLE_WINDOW`] samples.
    pub fn recent_samples(&self) -> &[VolumeSample] {
        let start = self.samples.len().saturating_sub(VOLUME_SAMPLE_WINDOW);
        &self.samples[start..]
    }

    /// The most recent rendered detail blob.
    pub fn last_detail(&self) -> Option<&str> {
        self.last_detail.as_deref()
    }

    /// Whether the most recent volume dropped below half the median of the
    /// trailing sample window.
    pub fn is_anomalous(&self) -> bool {
        let recent = self.recent_samples();
        let Some(last) = recent.last() else {
            return false;
        };
        (last.volume as f64) < median(recent.iter().map(|sample| sample.volume)) / 2.0
    }
}

/// Median volume, averaging the middle pair for even counts.
fn median(volumes: impl Iterator<Item = i64>) -> f64 {
    let mut sorted: Vec<i64> = volumes.collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    }
}

/// Volume/freshness histories keyed by node identifier, owned by the engine.
///
/// An entry is created the first time its table is written as a target,
/// migrated when the table is renamed and deleted when it is dropped.
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write to `node`, creating its entry on first use.
    pub fn record(&mut self, node: &str, context: &QueryContext) {
        self.entries.entry(node.to_string()).or_default().record(context);
    }

    pub fn get(&self, node: &str) -> Option<&CatalogEntry> {
        self.entries.get(node)
    }

    pub fn contains(&self, node: &str) -> bool {
        self.entries.contains_key(node)
    }

    pub fn remove(&mut self, node: &str) {
        self.entries.remove(node);
    }

    /// Move an entry to a renamed node, overwriting any entry already there.
    pub fn rename(&mut self, old: &str, new: &str) {
        if let Some(entry) = self.entries.remove(old) {
            self.entries.insert(new.to_string(), entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
