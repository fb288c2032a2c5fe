use super::domain::CommissionResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub recorded_at: DateTime<Utc>,
    pub result: CommissionResult,
}

/// Newest-first log of past calculations, bounded by `capacity`.
#[derive(Debug, Clone)]
pub struct CalculationHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl CalculationHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, result: CommissionResult, recorded_at: DateTime<Utc>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(HistoryEntry {
            recorded_at,
            result,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for CalculationHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}
