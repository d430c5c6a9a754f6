//! # Sync report
//!
//! Module dedicated to the synchronization report.

use super::SyncPatch;

/// The synchronization report.
///
/// A report is just a struct containing the patch that was applied
/// during a successful synchronization pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "derive", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncReport {
    /// The patch applied to both stores.
    pub patch: SyncPatch,
}
