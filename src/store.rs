//! Record storage contract.
//!
//! The tracker hands finished records back to its caller; whoever persists
//! them implements [`RecordStore`]. Stores keep records in insertion order.
//! On restart, [`Tracker::resume_from_store`](crate::Tracker::resume_from_store)
//! reads the last record to continue the counters.

use log::debug;

use crate::error::Result;
use crate::record::LogRecord;

/// Durable (or not) sink for log records.
pub trait RecordStore {
    /// Append records, preserving their order.
    fn append(&mut self, records: &[LogRecord]) -> Result<()>;

    /// All stored records, oldest first.
    fn load_all(&self) -> Result<Vec<LogRecord>>;

    /// Most recently appended record.
    fn last(&self) -> Result<Option<LogRecord>> {
        Ok(self.load_all()?.pop())
    }

    /// Number of stored records.
    fn count(&self) -> Result<usize> {
        Ok(self.load_all()?.len())
    }

    /// Remove every record (start of a new session).
    fn clear(&mut self) -> Result<()>;
}

/// Vec-backed store, for tests and for callers that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Vec<LogRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }
}

impl RecordStore for MemoryRecordStore {
    fn append(&mut self, records: &[LogRecord]) -> Result<()> {
        debug!("[RecordStore] Appending {} records in memory", records.len());
        self.records.extend_from_slice(records);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<LogRecord>> {
        Ok(self.records.clone())
    }

    fn last(&self) -> Result<Option<LogRecord>> {
        Ok(self.records.last().cloned())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }

    fn clear(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}
