//! Scan log persistence module
//!
//! This module owns the durable, newest-first collection of scan records:
//! record types, storage backends, time-window filtering and statistics.

pub mod backend;
pub mod record;
pub mod scan_log;

pub use backend::{FileBackend, LogBackend, MemoryBackend};
pub use record::{GeoLocation, LogFilter, ScanDraft, ScanRecord, ScanStatistics};
pub use scan_log::ScanLogStore;
