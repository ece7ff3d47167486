//! Merge operations for installed reference data
//!
//! Re-provisioning regenerates every reference table from the template. This
//! module reconciles the regenerated table with the one already on disk so
//! that rows a user added or edited survive.
//!
//! ## Supported Formats
//!
//! - CSV (csv.rs) - Keyed reference tables under a leader's `data/` directory
//!
//! ## Common Types
//!
//! [`MergeResult`] and [`RowOutcome`] are shared by the pure merge and the
//! file-backed variants.

pub mod csv;

pub use self::csv::{merge_rows, merge_table_file, plan_table_file, TablePlan, DEFAULT_KEY_COLUMN};

use serde::Serialize;

use crate::status::ChangeType;
use crate::table::RowCollection;

/// Per-row decision taken by the merge.
///
/// Row outcomes reuse the file-level vocabulary:
///
/// | Partition | Outcome |
/// |---|---|
/// | key only in the existing table | `Extra` (kept as custom) |
/// | key only in the desired table | `Missing` (added as new) |
/// | common key, identical | `UpToDate` (desired row emitted) |
/// | common key, equal after normalization but not byte-identical | `Outdated` (desired row emitted) |
/// | common key, a non-key field differs | `Conflicting` (existing row kept) |
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowOutcome {
    /// Normalized key of the row
    pub key: String,
    pub change_type: ChangeType,
}

/// Result of merging a desired table into an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// The reconciled table
    pub merged: RowCollection,
    /// Rows only in the desired table
    pub new_rows: usize,
    /// Common rows replaced by their desired version
    pub updated_rows: usize,
    /// Common rows kept because they carry user edits
    pub preserved_rows: usize,
    /// Rows only in the existing table
    pub custom_rows: usize,
    /// Existing rows left out of the merge: blank key, too short to carry
    /// the key, or shadowed by a later row with the same key
    pub dropped_rows: usize,
    /// One entry per merged row, in output order
    pub outcomes: Vec<RowOutcome>,
}

impl MergeResult {
    /// Number of rows in the merged table.
    ///
    /// Always equals `new_rows + updated_rows + preserved_rows + custom_rows`.
    pub fn total_rows(&self) -> usize {
        self.merged.len()
    }

    /// True when the merge kept anything that came from the user
    pub fn kept_user_data(&self) -> bool {
        self.custom_rows > 0 || self.preserved_rows > 0
    }

    /// True when writing the merged table would change its content
    pub fn has_changes(&self) -> bool {
        self.outcomes.iter().any(|o| o.change_type.needs_action())
    }
}
