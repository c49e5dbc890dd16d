use crate::errors::StorageError;
use crate::models::AttendanceRecord;
use crate::storage::RecordStorage;
use tracing::{error, info};

pub struct AttendanceStore<S> {
    storage: S,
    record: AttendanceRecord,
    /// Set by mutations, cleared once the record has been written.
    dirty: bool,
}

impl<S: RecordStorage> AttendanceStore<S> {
    /// Loads the record, falling back to an empty one when storage is
    /// missing or unreadable. Malformed content is left in place until the
    /// next write replaces it.
    pub async fn load(mut storage: S) -> Self {
        let record = match storage.read().await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(record) => record,
                Err(err) => {
                    error!("failed to parse attendance record: {err}");
                    AttendanceRecord::default()
                }
            },
            Ok(None) => {
                info!("no attendance record found, creating an empty one");
                if let Err(err) = storage.write(b"{}").await {
                    error!("failed to create attendance record: {err}");
                }
                AttendanceRecord::default()
            }
            Err(err) => {
                error!("failed to read attendance record: {err}");
                AttendanceRecord::default()
            }
        };

        Self {
            storage,
            record,
            dirty: false,
        }
    }

    pub fn record(&self) -> &AttendanceRecord {
        &self.record
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn get(&self, key: &str) -> bool {
        self.record.get(key)
    }

    /// Flips the flag for `key` and writes the whole record. A failed write
    /// is logged; the in-memory flag still changes.
    pub async fn toggle(&mut self, key: &str) -> bool {
        let on_site = !self.get(key);
        self.record.days.insert(key.to_string(), on_site);
        self.dirty = true;
        self.persist().await;
        on_site
    }

    pub async fn set(&mut self, key: &str, on_site: bool) {
        self.record.days.insert(key.to_string(), on_site);
        self.dirty = true;
        self.persist().await;
    }

    pub async fn flush(&mut self) -> Result<(), StorageError> {
        let payload = serde_json::to_vec_pretty(&self.record)?;
        self.storage.write(&payload).await?;
        self.dirty = false;
        Ok(())
    }

    /// Writes only when a mutation has not reached storage yet, so content
    /// that failed to parse at load survives until the next change.
    pub async fn flush_if_dirty(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        self.flush().await
    }

    async fn persist(&mut self) {
        if let Err(err) = self.flush().await {
            error!("failed to persist attendance record: {err}");
        }
    }
}

/// Every `true` flag in the record, regardless of month.
pub fn total_on_site(record: &AttendanceRecord) -> usize {
    record.days.values().filter(|on_site| **on_site).count()
}
