//! In-memory contact store, shipped for tests and local development.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::contacts::{ContactFilter, ContactRecord, ContactStore};

/// A contact store backed by a plain Vec. Applies the same `ContactFilter`
/// rules the Postgres store expresses in SQL.
#[derive(Clone, Default)]
pub struct MemoryContactStore {
    records: Arc<Mutex<Vec<ContactRecord>>>,
    /// When set, every search returns this error. Lets tests exercise the
    /// resolver's remote-search fallback.
    fail: Arc<Mutex<bool>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ContactRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn insert(&self, record: ContactRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn set_failing(&self, failing: bool) {
        *self.fail.lock().unwrap() = failing;
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn search(
        &self,
        location_id: &str,
        filter: &ContactFilter,
        limit: u32,
    ) -> Result<Vec<ContactRecord>> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("contact store unavailable");
        }

        let records = self.records.lock().unwrap();
        let mut matched: Vec<ContactRecord> = records
            .iter()
            .filter(|r| r.location_id == location_id && r.sync_status == "active")
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        if matches!(filter, ContactFilter::Recent) {
            matched.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        }

        matched.truncate(limit as usize);
        Ok(matched)
    }
}
