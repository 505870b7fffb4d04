use std::fmt;
use std::str::FromStr;

use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Db;
use crate::errors::{Result, VaultError};

/// Category given to prompts that don't name one
pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Surrogate key, `None` until the record has been inserted
    pub id: Option<i64>,
    /// Stable identifier used as the merge key; empty means "generate on save"
    #[serde(default)]
    pub uuid: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_builtin: bool,
}

impl Prompt {
    /// A user-authored prompt in the default category, not yet persisted
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            uuid: String::new(),
            title: title.into(),
            content: content.into(),
            category: DEFAULT_CATEGORY.to_string(),
            is_builtin: false,
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn builtin(mut self, is_builtin: bool) -> Self {
        self.is_builtin = is_builtin;
        self
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            uuid: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            category: row.get(4)?,
            is_builtin: row.get(5)?,
        })
    }
}

/// What `save` did with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// Which partition of the table to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptFilter {
    #[default]
    All,
    #[serde(rename = "builtin")]
    BuiltinOnly,
    #[serde(rename = "user")]
    UserOnly,
}

impl FromStr for PromptFilter {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PromptFilter::All),
            "builtin" | "built-in" => Ok(PromptFilter::BuiltinOnly),
            "user" | "custom" => Ok(PromptFilter::UserOnly),
            other => Err(VaultError::ValidationError(format!(
                "Unknown filter '{}' (expected all, builtin, or user)",
                other
            ))),
        }
    }
}

impl fmt::Display for PromptFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptFilter::All => "all",
            PromptFilter::BuiltinOnly => "builtin",
            PromptFilter::UserOnly => "user",
        };
        f.write_str(name)
    }
}

/// Portable projection of a prompt. The numeric key is storage-local and
/// deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub uuid: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_builtin: bool,
}

impl From<&Prompt> for ExportRecord {
    fn from(p: &Prompt) -> Self {
        Self {
            uuid: p.uuid.clone(),
            title: p.title.clone(),
            content: p.content.clone(),
            category: p.category.clone(),
            is_builtin: p.is_builtin,
        }
    }
}

pub fn serialize_for_export(prompts: &[Prompt]) -> Vec<ExportRecord> {
    prompts.iter().map(ExportRecord::from).collect()
}

/// Turn a keyword into a LIKE pattern that matches it as a literal substring
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Db {
    /// Insert or update a prompt, keyed by its stable identifier.
    ///
    /// A missing identifier is generated first. When a row with the same
    /// identifier exists, its fields are overwritten in place and its numeric
    /// key is kept, whatever `prompt.id` said. The assigned key and identifier
    /// are written back into `prompt`.
    pub fn save(&self, prompt: &mut Prompt) -> Result<SaveOutcome> {
        self.save_inner(prompt).inspect_err(|e| {
            tracing::error!(uuid = %prompt.uuid, error = %e, "failed to save prompt");
        })
    }

    fn save_inner(&self, prompt: &mut Prompt) -> Result<SaveOutcome> {
        if prompt.uuid.is_empty() {
            prompt.uuid = Uuid::new_v4().to_string();
        }
        if prompt.category.trim().is_empty() {
            prompt.category = DEFAULT_CATEGORY.to_string();
        }

        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM prompts WHERE uuid = ?1",
                params![prompt.uuid],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = match existing {
            Some(id) => {
                self.conn.execute(
                    "UPDATE prompts SET title = ?1, content = ?2, category = ?3, is_builtin = ?4
                     WHERE id = ?5",
                    params![prompt.title, prompt.content, prompt.category, prompt.is_builtin, id],
                )?;
                prompt.id = Some(id);
                SaveOutcome::Updated
            },
            None => {
                self.conn.execute(
                    "INSERT INTO prompts (uuid, title, content, category, is_builtin)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![prompt.uuid, prompt.title, prompt.content, prompt.category, prompt.is_builtin],
                )?;
                prompt.id = Some(self.conn.last_insert_rowid());
                SaveOutcome::Inserted
            },
        };

        tracing::debug!(id = ?prompt.id, uuid = %prompt.uuid, ?outcome, "saved prompt");
        Ok(outcome)
    }

    /// Every prompt, in insertion order
    pub fn get_all(&self) -> Result<Vec<Prompt>> {
        self.query_prompts(
            "SELECT id, uuid, title, content, category, is_builtin FROM prompts ORDER BY id",
            [],
        )
    }

    pub fn get_by_key(&self, id: i64) -> Result<Option<Prompt>> {
        let prompt = self
            .conn
            .query_row(
                "SELECT id, uuid, title, content, category, is_builtin FROM prompts WHERE id = ?1",
                params![id],
                Prompt::from_row,
            )
            .optional()?;
        Ok(prompt)
    }

    pub fn get_by_uuid(&self, uuid: &str) -> Result<Option<Prompt>> {
        let prompt = self
            .conn
            .query_row(
                "SELECT id, uuid, title, content, category, is_builtin FROM prompts WHERE uuid = ?1",
                params![uuid],
                Prompt::from_row,
            )
            .optional()?;
        Ok(prompt)
    }

    /// Remove the row with numeric key `id`, built-in or not.
    ///
    /// Returns `Ok(false)` when no such row existed.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM prompts WHERE id = ?1", params![id])
            .inspect_err(|e| tracing::error!(id, error = %e, "failed to delete prompt"))?;
        tracing::debug!(id, removed, "deleted prompt");
        Ok(removed > 0)
    }

    /// Overwrite title, content and category of the row matched by `prompt.id`.
    ///
    /// The built-in flag and stable identifier are left alone. Returns
    /// `Ok(false)` when the record has no key or the key doesn't exist.
    pub fn update(&self, prompt: &Prompt) -> Result<bool> {
        let Some(id) = prompt.id else {
            return Ok(false);
        };
        let changed = self
            .conn
            .execute(
                "UPDATE prompts SET title = ?1, content = ?2, category = ?3 WHERE id = ?4",
                params![prompt.title, prompt.content, prompt.category, id],
            )
            .inspect_err(|e| tracing::error!(id, error = %e, "failed to update prompt"))?;
        tracing::debug!(id, changed, "updated prompt");
        Ok(changed > 0)
    }

    /// Prompts whose title or content contains `keyword`.
    ///
    /// Matching follows SQLite's LIKE (ASCII case-insensitive). An empty
    /// keyword matches everything.
    pub fn search(&self, keyword: &str) -> Result<Vec<Prompt>> {
        self.query_prompts(
            r"SELECT id, uuid, title, content, category, is_builtin FROM prompts
              WHERE title LIKE ?1 ESCAPE '\' OR content LIKE ?1 ESCAPE '\'
              ORDER BY id",
            params![like_pattern(keyword)],
        )
    }

    pub fn filter(&self, filter: PromptFilter) -> Result<Vec<Prompt>> {
        let builtin = match filter {
            PromptFilter::All => return self.get_all(),
            PromptFilter::BuiltinOnly => true,
            PromptFilter::UserOnly => false,
        };
        self.query_prompts(
            "SELECT id, uuid, title, content, category, is_builtin FROM prompts
             WHERE is_builtin = ?1 ORDER BY id",
            params![builtin],
        )
    }

    /// Bulk-remove every built-in prompt. Only the reconciler should call this.
    pub fn delete_builtin(&self) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM prompts WHERE is_builtin = 1", [])
            .inspect_err(|e| tracing::error!(error = %e, "failed to clear built-in prompts"))?;
        Ok(removed)
    }

    fn query_prompts<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Prompt>> {
        let mut stmt = self.conn.prepare(sql)?;
        let prompts = stmt
            .query_map(params, Prompt::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(prompts)
    }
}
