//! Row index for a displayed list of prompts
//!
//! A client showing prompts in a list gets selections back as row numbers.
//! [`PromptListing`] turns those into numeric keys, so the record itself is
//! always re-read from the store and a list refresh can't hand back the
//! wrong prompt.

use std::collections::HashMap;

use serde::Serialize;

use crate::db::Prompt;

/// One visible row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub row: usize,
    pub id: i64,
    pub title: String,
    pub category: String,
    pub is_builtin: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PromptListing {
    rows: Vec<ListingRow>,
    by_key: HashMap<i64, usize>,
}

impl PromptListing {
    /// Index `prompts` in display order. Unsaved records are skipped.
    pub fn from_prompts(prompts: &[Prompt]) -> Self {
        let mut listing = Self::default();
        listing.rebuild(prompts);
        listing
    }

    /// Replace the index after the displayed list changed
    pub fn rebuild(&mut self, prompts: &[Prompt]) {
        self.rows.clear();
        self.by_key.clear();
        for prompt in prompts {
            let Some(id) = prompt.id else { continue };
            let row = self.rows.len();
            self.by_key.insert(id, row);
            self.rows.push(ListingRow {
                row,
                id,
                title: prompt.title.clone(),
                category: prompt.category.clone(),
                is_builtin: prompt.is_builtin,
            });
        }
    }

    pub fn key_at(&self, row: usize) -> Option<i64> {
        self.rows.get(row).map(|r| r.id)
    }

    pub fn row_of(&self, id: i64) -> Option<usize> {
        self.by_key.get(&id).copied()
    }

    pub fn rows(&self) -> &[ListingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
