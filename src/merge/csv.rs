//! CSV reference table merge
//!
//! Reconciles an installed table (*existing*) with a freshly generated one
//! (*desired*) without discarding user data.
//!
//! ## Strategy
//!
//! 1. Index both tables by normalized key (see [`crate::table`]).
//! 2. Split keys into **custom** (existing only), **common** and **fresh**
//!    (desired only).
//! 3. Custom rows are kept verbatim.
//! 4. A common row whose non-key fields all match after trim + uppercase is
//!    taken from the desired table, which absorbs template fixes. If any
//!    non-key field differs, the existing row is kept: the tool never
//!    overwrites something the user appears to have customized.
//! 5. Fresh rows are added.
//! 6. Output is custom, then common, then fresh rows, each group sorted by
//!    normalized key so repeated runs produce identical files.
//!
//! ## Example
//!
//! ```
//! use bmad_provisioner::merge::merge_rows;
//! use bmad_provisioner::table::{Row, RowCollection};
//!
//! let existing = RowCollection::new(
//!     ["name", "role", "region"],
//!     vec![Row::new(["alice", "admin", "US"]), Row::new(["bob", "user", "UK"])],
//! );
//! let desired = RowCollection::new(
//!     ["name", "role", "region"],
//!     vec![Row::new(["alice", "admin", "US"]), Row::new(["carol", "user", "CA"])],
//! );
//!
//! let result = merge_rows(Some(&existing), &desired, 0);
//! assert_eq!((result.new_rows, result.updated_rows, result.custom_rows), (1, 1, 1));
//! assert_eq!(result.total_rows(), 3);
//! ```

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::{MergeResult, RowOutcome};
use crate::error::Result;
use crate::status::ChangeType;
use crate::table::{build_key_index, normalize_value, Row, RowCollection};

/// Key column used when a table does not configure one
pub const DEFAULT_KEY_COLUMN: usize = 0;

/// Merge `desired` into `existing` without touching disk.
///
/// `existing` is `None` when no table is installed yet. When neither side
/// provides a header and there is nothing installed, the desired rows are
/// returned as-is and all counted as new.
pub fn merge_rows(
    existing: Option<&RowCollection>,
    desired: &RowCollection,
    key_column: usize,
) -> MergeResult {
    let header_source = if desired.has_header() {
        Some(desired)
    } else {
        existing.filter(|e| e.has_header())
    };

    let header_source = match header_source {
        Some(source) => source,
        None if existing.map_or(true, RowCollection::is_empty) => {
            return passthrough(desired, key_column);
        }
        None => desired,
    };

    let empty = RowCollection::empty();
    let existing = existing.unwrap_or(&empty);

    let existing_index = build_key_index(existing.rows(), key_column);
    let desired_index = build_key_index(desired.rows(), key_column);

    let mut custom = Vec::new();
    let mut common = Vec::new();
    let mut fresh = Vec::new();

    // BTreeMap iteration is key-ordered, so each group comes out sorted.
    for (key, existing_row) in &existing_index {
        match desired_index.get(key) {
            None => custom.push((key, *existing_row, ChangeType::Extra)),
            Some(desired_row) => {
                let (row, change_type) = if has_user_modifications(existing_row, desired_row, key_column) {
                    (*existing_row, ChangeType::Conflicting)
                } else if existing_row == desired_row {
                    (*desired_row, ChangeType::UpToDate)
                } else {
                    (*desired_row, ChangeType::Outdated)
                };
                common.push((key, row, change_type));
            }
        }
    }
    for (key, desired_row) in &desired_index {
        if !existing_index.contains_key(key) {
            fresh.push((key, *desired_row, ChangeType::Missing));
        }
    }

    let preserved_rows = common
        .iter()
        .filter(|(_, _, change)| *change == ChangeType::Conflicting)
        .count();
    let updated_rows = common.len() - preserved_rows;
    let custom_rows = custom.len();
    let new_rows = fresh.len();
    let dropped_rows = existing.len() - existing_index.len();

    let mut rows = Vec::with_capacity(custom_rows + common.len() + new_rows);
    let mut outcomes = Vec::with_capacity(rows.capacity());
    for (key, row, change_type) in custom.into_iter().chain(common).chain(fresh) {
        rows.push(row.clone());
        outcomes.push(RowOutcome {
            key: key.clone(),
            change_type,
        });
    }

    debug!(
        "Merged table: {} custom, {} preserved, {} updated, {} new, {} dropped",
        custom_rows, preserved_rows, updated_rows, new_rows, dropped_rows
    );

    MergeResult {
        merged: header_source.with_rows(rows),
        new_rows,
        updated_rows,
        preserved_rows,
        custom_rows,
        dropped_rows,
        outcomes,
    }
}

/// Nothing to reconcile against: the desired table goes through unchanged.
fn passthrough(desired: &RowCollection, key_column: usize) -> MergeResult {
    let outcomes = desired
        .rows()
        .iter()
        .map(|row| RowOutcome {
            key: row.key(key_column).unwrap_or_default(),
            change_type: ChangeType::Missing,
        })
        .collect();

    MergeResult {
        merged: desired.clone(),
        new_rows: desired.len(),
        updated_rows: 0,
        preserved_rows: 0,
        custom_rows: 0,
        dropped_rows: 0,
        outcomes,
    }
}

/// A common row counts as user-modified when any non-key field differs
/// after normalization. Rows of different widths always count as modified.
fn has_user_modifications(existing: &Row, desired: &Row, key_column: usize) -> bool {
    if existing.len() != desired.len() {
        return true;
    }

    existing
        .fields()
        .iter()
        .zip(desired.fields())
        .enumerate()
        .filter(|(i, _)| *i != key_column)
        .any(|(_, (old, new))| normalize_value(old) != normalize_value(new))
}

/// A merge computed against the table on disk, not yet written
#[derive(Debug, Clone)]
pub struct TablePlan {
    pub path: PathBuf,
    /// The table installed at `path`, if any
    pub existing: Option<RowCollection>,
    pub result: MergeResult,
}

impl TablePlan {
    /// Whether a table was installed at `path`
    pub fn existed(&self) -> bool {
        self.existing.is_some()
    }

    /// Whether writing the merge would replace the installed header
    pub fn header_changed(&self) -> bool {
        self.existing
            .as_ref()
            .is_some_and(|existing| existing.header() != self.result.merged.header())
    }

    /// Table-level classification of the planned merge.
    ///
    /// - `Missing` when nothing is installed.
    /// - `Conflicting` when writing would drop installed rows that have a
    ///   blank key or are shadowed by a later duplicate.
    /// - `Outdated` when the template would add or correct rows, or change
    ///   the header.
    /// - `UpToDate` otherwise. Custom rows and preserved user edits never
    ///   make a table outdated.
    pub fn change_type(&self) -> ChangeType {
        if !self.existed() {
            ChangeType::Missing
        } else if self.result.dropped_rows > 0 {
            ChangeType::Conflicting
        } else if self.result.has_changes() || self.header_changed() {
            ChangeType::Outdated
        } else {
            ChangeType::UpToDate
        }
    }
}

/// Read the table at `path` and compute its merge with `desired`.
///
/// A missing file is an empty existing table.
pub fn plan_table_file(path: &Path, desired: &RowCollection, key_column: usize) -> Result<TablePlan> {
    let existing = RowCollection::load(path)?;
    let result = merge_rows(existing.as_ref(), desired, key_column);

    Ok(TablePlan {
        path: path.to_path_buf(),
        existing,
        result,
    })
}

/// Merge `desired` into the table at `path` and write the result back.
///
/// The merged table fully replaces the file. The write happens once, after
/// the whole table has been assembled; if it fails the previous content
/// stays in place and the error is returned.
pub fn merge_table_file(path: &Path, desired: &RowCollection, key_column: usize) -> Result<MergeResult> {
    let plan = plan_table_file(path, desired, key_column)?;
    if plan.result.dropped_rows > 0 {
        warn!(
            "{}: dropping {} rows with a blank or duplicate key",
            path.display(),
            plan.result.dropped_rows
        );
    }
    plan.result.merged.store(path)?;

    let result = plan.result;
    info!(
        "{}: {} new, {} updated, {} preserved, {} custom ({} total)",
        path.display(),
        result.new_rows,
        result.updated_rows,
        result.preserved_rows,
        result.custom_rows,
        result.total_rows()
    );

    Ok(result)
}
