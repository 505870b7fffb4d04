//! Startup reconciliation of built-in prompts
//!
//! The bundled definition file is the single source of truth for built-in
//! records. Every run throws the old built-in set away and re-reads the
//! file; user-authored rows are never touched.

use std::path::PathBuf;

use serde::Serialize;

use crate::db::Db;
use crate::errors::Result;
use crate::transfer::{read_entries, PromptEntry};

/// What a reconciliation pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Built-in rows deleted before reloading
    pub removed: usize,
    /// Entries found in the bundled file
    pub attempted: usize,
    /// Entries that were saved successfully
    pub saved: usize,
}

pub struct Reconciler {
    source: PathBuf,
}

impl Reconciler {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self { source: source.into() }
    }

    /// Replace every built-in prompt with the contents of the bundled file.
    ///
    /// A missing or unreadable file leaves the store with no built-in
    /// prompts. Only a failure of the bulk delete is returned as an error.
    pub fn reconcile_builtin(&self, db: &Db) -> Result<ReconcileReport> {
        let mut report = ReconcileReport {
            removed: db.delete_builtin()?,
            ..Default::default()
        };

        let Some(entries) = self.load_entries() else {
            return Ok(report);
        };

        for entry in entries {
            report.attempted += 1;
            let mut prompt = entry.into_prompt(true);
            if db.save(&mut prompt).is_ok() {
                report.saved += 1;
            }
        }

        tracing::info!(
            source = %self.source.display(),
            removed = report.removed,
            attempted = report.attempted,
            saved = report.saved,
            "reconciled built-in prompts"
        );
        Ok(report)
    }

    fn load_entries(&self) -> Option<Vec<PromptEntry>> {
        if !self.source.exists() {
            tracing::debug!(source = %self.source.display(), "no bundled prompt file");
            return None;
        }
        match read_entries(&self.source) {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(
                    source = %self.source.display(),
                    error = %e,
                    "ignoring unreadable bundled prompt file"
                );
                None
            },
        }
    }
}
