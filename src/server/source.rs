use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::config::ReloadPolicy;
use crate::offerings::{load_offerings, LoadedTable, OfferingTable};

struct Snapshot {
    table: Arc<OfferingTable>,
    loaded_at: Instant,
}

/// Shared handle to the offerings table.
///
/// Requests get an immutable `Arc` snapshot. A reload builds a new table and
/// swaps the `Arc`; snapshots already handed out are never mutated.
pub struct TableSource {
    path: Option<PathBuf>,
    policy: ReloadPolicy,
    current: RwLock<Snapshot>,
}

impl TableSource {
    /// Load the table from `path` now and re-read it according to `policy`.
    pub fn load(path: &Path, policy: ReloadPolicy) -> Result<Self> {
        let table = load_and_report(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            policy,
            current: RwLock::new(Snapshot {
                table: Arc::new(table),
                loaded_at: Instant::now(),
            }),
        })
    }

    /// A source that always serves the given table.
    pub fn fixed(table: OfferingTable) -> Self {
        Self {
            path: None,
            policy: ReloadPolicy::Startup,
            current: RwLock::new(Snapshot {
                table: Arc::new(table),
                loaded_at: Instant::now(),
            }),
        }
    }

    /// Current table, re-reading the file first if the policy says it is
    /// stale. Blocking; call from a blocking context.
    pub fn snapshot(&self) -> Result<Arc<OfferingTable>> {
        let (table, age) = {
            let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
            (guard.table.clone(), guard.loaded_at.elapsed())
        };

        let Some(path) = self.path.as_deref() else {
            return Ok(table);
        };
        if !self.policy.is_stale(age) {
            return Ok(table);
        }

        // Reload under the write lock. Another request may have reloaded
        // while this one waited, so check staleness again.
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        if !self.policy.is_stale(guard.loaded_at.elapsed()) {
            return Ok(guard.table.clone());
        }

        let fresh = Arc::new(load_and_report(path)?);
        *guard = Snapshot {
            table: fresh.clone(),
            loaded_at: Instant::now(),
        };
        Ok(fresh)
    }

    /// Row count of the cached table, without reloading.
    pub fn cached_len(&self) -> usize {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .table
            .len()
    }

    pub fn policy(&self) -> ReloadPolicy {
        self.policy
    }
}

fn load_and_report(path: &Path) -> Result<OfferingTable> {
    let LoadedTable { table, report } = load_offerings(path)?;

    log::debug!(
        "Loaded {} offerings from {} ({} rows read)",
        report.rows_loaded,
        path.display(),
        report.rows_read
    );
    if report.skipped() > 0 {
        log::warn!(
            "Skipped {} rows from {} ({} unknown exam type, {} malformed)",
            report.skipped(),
            path.display(),
            report.unknown_exam_type,
            report.malformed_rows
        );
    }
    if report.out_of_range_values > 0 {
        log::warn!(
            "Ignored {} out-of-range values in {}",
            report.out_of_range_values,
            path.display()
        );
    }
    if report.absent_closing_rank + report.absent_fee + report.absent_average_package > 0 {
        log::debug!(
            "Absent values: closing rank {}, fee {}, average package {}",
            report.absent_closing_rank,
            report.absent_fee,
            report.absent_average_package
        );
    }

    Ok(table)
}
