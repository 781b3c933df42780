//! Append-only in-memory analysis store

use parking_lot::Mutex;

use crate::models::{AnalysisRecord, NewAnalysis};

/// Process-wide analysis log.
///
/// Ids are assigned under the same lock as the push, so they stay unique and
/// strictly increasing no matter how many requests append at once. The log
/// is volatile and has no capacity bound.
#[derive(Debug, Default)]
pub struct AnalysisStore {
    records: Mutex<Vec<AnalysisRecord>>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, assigning `id = count_before_append + 1`
    pub fn append(&self, new: NewAnalysis) -> AnalysisRecord {
        let mut records = self.records.lock();
        let record = AnalysisRecord {
            id: records.len() as u64 + 1,
            timestamp: new.timestamp,
            details: new.details,
        };
        records.push(record.clone());
        drop(records);

        tracing::debug!(id = record.id, kind = %record.kind(), "Analysis stored");
        record
    }

    /// Snapshot of every record, oldest first
    pub fn all(&self) -> Vec<AnalysisRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
