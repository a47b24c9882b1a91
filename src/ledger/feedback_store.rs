//! In-Memory Feedback Store
//!
//! Keeps feedback records in submission order. Record ids are assigned
//! sequentially starting at 1.

use super::{FeedbackStore, StoreError};
use crate::FeedbackRecord;
use tokio::sync::RwLock;

/// Feedback store backed by a vector
#[derive(Default)]
pub struct InMemoryFeedbackStore {
    /// Stored records; a record's id is its position plus one
    records: RwLock<Vec<FeedbackRecord>>,
}

impl InMemoryFeedbackStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored record by id
    ///
    /// # Returns
    /// `None` for ids that were never assigned
    pub async fn get(&self, id: i64) -> Option<FeedbackRecord> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        let records = self.records.read().await;
        records.get(index).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl FeedbackStore for InMemoryFeedbackStore {
    async fn store_feedback(&self, record: FeedbackRecord) -> Result<i64, StoreError> {
        // Acquire write lock so id assignment and insertion happen together
        let mut records = self.records.write().await;
        records.push(record);
        i64::try_from(records.len())
            .map_err(|_| StoreError::Unavailable("feedback id space exhausted".to_string()))
    }
}
