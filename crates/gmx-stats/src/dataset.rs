//! Accumulates parsed blocks into per-key value series.

use indexmap::IndexMap;

use crate::parse::{self, StatsBlock};

/// Ragged, insertion-ordered view of one run's counter history.
///
/// Each key maps to the series of values it took across successive blocks.
/// Keys keep the order of their first appearance, so the column order of a
/// pivoted table matches the simulator's own dump order. Series lengths may
/// differ when a counter appears only in some blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatDataset {
    series: IndexMap<String, Vec<String>>,
}

impl StatDataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a whole report and folds every complete block.
    pub fn from_report(report: &str) -> Self {
        let mut dataset = Self::new();
        for block in parse::blocks(report) {
            dataset.fold_block(&block);
        }
        dataset
    }

    /// Folds one block into the dataset, appending each value to its key's
    /// series and registering unseen keys at the end of the order.
    pub fn fold_block(&mut self, block: &StatsBlock<'_>) {
        for (key, value) in &block.entries {
            self.append(key, value);
        }
    }

    /// Appends a single observation for `key`.
    pub fn append(&mut self, key: &str, value: &str) {
        match self.series.get_mut(key) {
            Some(values) => values.push(value.to_string()),
            None => {
                self.series
                    .insert(key.to_string(), vec![value.to_string()]);
            }
        }
    }

    /// Keys in first-appearance order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// The value series recorded for `key`, if any.
    pub fn series(&self, key: &str) -> Option<&[String]> {
        self.series.get(key).map(Vec::as_slice)
    }

    /// Length of the longest series.
    pub fn max_len(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether no observation has been recorded at all.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterates over `(key, series)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.series
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}
