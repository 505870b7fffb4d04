//! JSON prompt files: the bundled definition file, import files and export files
//!
//! All three share one entry shape. Export always writes every field;
//! readers tolerate any of them being absent.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::db::prompts::DEFAULT_CATEGORY;
use crate::db::{serialize_for_export, Db, ExportRecord, Prompt, PromptFilter};
use crate::errors::Result;

/// One prompt as it appears in a JSON file.
///
/// An `is_builtin` key, as written by export, is ignored: whoever reads the
/// file decides the flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromptEntry {
    pub uuid: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl PromptEntry {
    /// Build an unsaved record, filling gaps with defaults.
    ///
    /// A missing uuid stays empty so that `Db::save` generates one.
    pub fn into_prompt(self, is_builtin: bool) -> Prompt {
        Prompt {
            id: None,
            uuid: self.uuid.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            category: self.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            is_builtin,
        }
    }
}

/// Counts reported back to the user after an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub attempted: usize,
    pub saved: usize,
}

/// Read and parse a whole prompt file. Nothing is written on failure.
pub fn read_entries(path: &Path) -> Result<Vec<PromptEntry>> {
    let raw = fs::read_to_string(path)?;
    let entries = serde_json::from_str(&raw)?;
    Ok(entries)
}

/// Write records as 4-space indented UTF-8 JSON, non-ASCII text kept as is
pub fn write_records(path: &Path, records: &[ExportRecord]) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    buf.push(b'\n');
    fs::write(path, buf)?;
    Ok(())
}

/// Export the prompts selected by `filter` to `path`, returning how many were written
pub fn export_to_file(db: &Db, filter: PromptFilter, path: &Path) -> Result<usize> {
    let prompts = db.filter(filter)?;
    let records = serialize_for_export(&prompts);
    write_records(path, &records)?;
    tracing::info!(path = %path.display(), %filter, count = records.len(), "exported prompts");
    Ok(records.len())
}

/// Import a user prompt file.
///
/// The file is parsed in full before anything is saved. Every imported
/// record is user-authored regardless of what the file says. Individual save
/// failures are counted, not fatal.
pub fn import_from_file(db: &Db, path: &Path) -> Result<ImportReport> {
    let entries = read_entries(path).inspect_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "rejected import file");
    })?;

    let mut report = ImportReport::default();
    for entry in entries {
        report.attempted += 1;
        let mut prompt = entry.into_prompt(false);
        if db.save(&mut prompt).is_ok() {
            report.saved += 1;
        }
    }

    tracing::info!(
        path = %path.display(),
        attempted = report.attempted,
        saved = report.saved,
        "imported prompts"
    );
    Ok(report)
}
