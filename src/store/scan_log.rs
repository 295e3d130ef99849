//! Append-ordered scan log
//!
//! The store owns the in-memory collection (newest first) and its persisted
//! copy. `add_scan` holds the store lock across the whole
//! serialize-and-save cycle, so concurrent callers in one process cannot
//! lose each other's records, and the in-memory log only changes once the
//! backend has confirmed the write.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::config::StorageConfig;
use crate::store::{FileBackend, LogBackend, LogFilter, ScanDraft, ScanRecord, ScanStatistics};
use crate::{Result, ScanError};

/// Identifiers are milliseconds since the epoch times this factor, leaving
/// room for inserts that land in the same millisecond
const ID_SUBDIVISIONS: u64 = 1000;

#[derive(Debug, Default)]
struct LogState {
    records: Vec<ScanRecord>,
    /// Largest numeric id handed out or loaded; never decreases
    last_id: u64,
}

/// Persistent, newest-first collection of scan records
pub struct ScanLogStore {
    backend: Box<dyn LogBackend>,
    state: Mutex<LogState>,
}

impl std::fmt::Debug for ScanLogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanLogStore")
            .field("records", &self.state.lock().records.len())
            .finish_non_exhaustive()
    }
}

impl ScanLogStore {
    /// Empty store over `backend`; call [`ScanLogStore::load_logs`] to hydrate
    pub fn new(backend: impl LogBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            state: Mutex::new(LogState::default()),
        }
    }

    /// File-backed store at the configured path, already hydrated
    pub fn open(config: &StorageConfig) -> Self {
        let store = Self::new(FileBackend::new(&config.log_path));
        store.load_logs();
        store
    }

    /// Replace the in-memory log with the persisted one
    ///
    /// Missing, unreadable or corrupt storage leaves an empty log; this never
    /// fails. Returns the number of records loaded.
    pub fn load_logs(&self) -> usize {
        let records = match self.backend.load() {
            Ok(Some(json)) => match serde_json::from_str::<Vec<ScanRecord>>(&json) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("Scan log is corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Scan log could not be read, starting empty: {}", e);
                Vec::new()
            }
        };

        let mut state = self.state.lock();
        let loaded_max = records.iter().filter_map(|r| r.id.parse::<u64>().ok()).max();
        state.last_id = state.last_id.max(loaded_max.unwrap_or(0));
        state.records = records;

        tracing::info!("Loaded {} scan records", state.records.len());
        state.records.len()
    }

    /// Assign an id, prepend the record and persist the whole log
    ///
    /// Returns the stored record once the backend confirms the write. On
    /// failure the in-memory log is left exactly as it was. Drafts holding
    /// NaN or infinite values are rejected before anything is written.
    pub fn add_scan(&self, draft: ScanDraft) -> Result<ScanRecord> {
        draft.validate()?;
        let mut state = self.state.lock();

        let id = next_id(state.last_id, Utc::now())
            .ok_or_else(|| ScanError::invalid_parameter("last scan id", state.last_id))?;
        let record = draft.into_record(id.to_string());
        state.records.insert(0, record.clone());

        let persisted = serde_json::to_string(&state.records)
            .map_err(|e| ScanError::serialization("encoding scan log", e))
            .and_then(|json| self.backend.save(&json));

        if let Err(e) = persisted {
            state.records.remove(0);
            tracing::warn!("Failed to persist scan {}: {}", record.id, e);
            return Err(e);
        }

        state.last_id = id;
        tracing::debug!("Stored scan {} ({} total)", record.id, state.records.len());
        Ok(record)
    }

    /// All records, newest first
    pub fn get_logs(&self) -> Vec<ScanRecord> {
        self.state.lock().records.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    /// Records from the last `days` days up to now, newest first
    pub fn get_recent_logs(&self, days: u32) -> Vec<ScanRecord> {
        self.get_recent_logs_at(days, Utc::now())
    }

    /// Records with `now - days <= timestamp <= now`, newest first
    ///
    /// `days = 0` keeps only records stamped exactly `now`.
    pub fn get_recent_logs_at(&self, days: u32, now: DateTime<Utc>) -> Vec<ScanRecord> {
        // Windows reaching past the representable range cover everything
        let cutoff = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.state
            .lock()
            .records
            .iter()
            .filter(|r| r.timestamp >= cutoff && r.timestamp <= now)
            .cloned()
            .collect()
    }

    /// Records matching a viewer filter preset
    pub fn filtered(&self, filter: LogFilter) -> Vec<ScanRecord> {
        match filter.days() {
            Some(days) => self.get_recent_logs(days),
            None => self.get_logs(),
        }
    }

    /// Aggregates over `records`; `None` when there are none
    pub fn get_statistics(records: &[ScanRecord]) -> Option<ScanStatistics> {
        if records.is_empty() {
            return None;
        }

        let safe_count = records
            .iter()
            .filter(|r| r.interpretation.safe_for_drinking)
            .count();
        let clarity_sum: f64 = records.iter().map(|r| r.quality_metrics.clarity).sum();

        Some(ScanStatistics {
            total_scans: records.len(),
            safe_count,
            average_clarity: clarity_sum / records.len() as f64,
        })
    }

    /// Delete every record, in memory and in the backend
    pub fn clear_all(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.backend.clear()?;
        let removed = state.records.len();
        state.records.clear();
        tracing::info!("Cleared {} scan records", removed);
        Ok(())
    }
}

/// Timestamp-derived id, strictly greater than `last`
///
/// Inserts within the same millisecond (or after a clock step backwards)
/// take the next free sub-millisecond slot. `None` once `last` is `u64::MAX`.
fn next_id(last: u64, now: DateTime<Utc>) -> Option<u64> {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let successor = last.checked_add(1)?;
    Some(millis.saturating_mul(ID_SUBDIVISIONS).max(successor))
}
