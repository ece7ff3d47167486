//! # BMAD Provisioner Library
//!
//! Declarative provisioning of "leader + specialists" skills. A skills
//! manifest declares the desired state; this library compares it with what
//! is installed under a project root and reconciles reference data without
//! destroying user edits. It backs the `bmad-provisioner` command-line tool
//! but has no dependency on it.
//!
//! ## Quick Example
//!
//! ```
//! use bmad_provisioner::merge::merge_rows;
//! use bmad_provisioner::table::{Row, RowCollection};
//!
//! let installed = RowCollection::new(
//!     ["test_type", "priority"],
//!     vec![Row::new(["unit", "LOW"]), Row::new(["fuzz", "HIGH"])],
//! );
//! let template = RowCollection::new(
//!     ["test_type", "priority"],
//!     vec![Row::new(["unit", "HIGH"]), Row::new(["e2e", "HIGH"])],
//! );
//!
//! let result = merge_rows(Some(&installed), &template, 0);
//!
//! // "fuzz" is user-only, "unit" was edited by the user, "e2e" is new
//! assert_eq!(result.custom_rows, 1);
//! assert_eq!(result.preserved_rows, 1);
//! assert_eq!(result.new_rows, 1);
//! assert_eq!(result.merged.rows()[1], Row::new(["unit", "LOW"]));
//! ```
//!
//! ## Core Concepts
//!
//! - **Reference tables (`table`)**: rows, keys and the keyed index, plus
//!   CSV load and all-or-nothing store.
//! - **Merge engine (`merge`)**: reconciles an installed table with a
//!   regenerated one. User-only rows and user edits always survive.
//! - **Change classification (`status`)**: the `Missing` / `Outdated` /
//!   `UpToDate` / `Conflicting` / `Extra` vocabulary shared by files and rows.
//! - **Desired state (`manifest`, `catalog`, `generator`)**: the typed
//!   manifest, injected per-domain reference data, and the in-process
//!   generator that turns a leader into reference tables.
//! - **Installed state (`layout`)**: where things live under a project root.
//! - **Analysis (`analyzer`, `report`)**: per-artifact classification and
//!   the recommendations derived from it.
//! - **Provisioning (`provision`)**: applies every generated table through
//!   the merge engine, one table at a time.
//!
//! ## Execution Flow
//!
//! 1. Parse and validate the manifest (`manifest::from_file`,
//!    `Manifest::validate`).
//! 2. Generate the desired state (`analyzer::DesiredState::generate`).
//! 3. Analyze the installation (`analyzer::GapAnalyzer::analyze`), which
//!    yields a `report::GapAnalysisReport`.
//! 4. Provision reference data (`provision::Provisioner::provision`).

pub mod analyzer;
pub mod catalog;
pub mod defaults;
pub mod error;
pub mod generator;
pub mod layout;
pub mod manifest;
pub mod merge;
pub mod output;
pub mod provision;
pub mod report;
pub mod status;
pub mod suggestions;
pub mod table;

#[cfg(test)]
mod merge_proptest;
