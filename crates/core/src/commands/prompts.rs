use std::path::Path;

use serde_json::{json, Value};

use crate::db::prompts::DEFAULT_CATEGORY;
use crate::db::{Db, Prompt, PromptFilter};
use crate::errors::{Result, VaultError};
use crate::listing::PromptListing;
use crate::reconcile::Reconciler;
use crate::transfer;

fn invalid(command: &str, reason: impl Into<String>) -> VaultError {
    VaultError::InvalidArgs {
        command: command.to_string(),
        reason:  reason.into(),
    }
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

fn required_str<'a>(command: &str, args: &'a Value, key: &str) -> Result<&'a str> {
    optional_str(args, key).ok_or_else(|| invalid(command, format!("missing '{}'", key)))
}

fn required_id(command: &str, args: &Value) -> Result<i64> {
    args.get("id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| invalid(command, "missing integer 'id'"))
}

fn filter_arg(args: &Value) -> Result<PromptFilter> {
    optional_str(args, "filter").map_or(Ok(PromptFilter::All), str::parse)
}

/// Trimmed title and content, both required to be non-empty
fn validated_text(command: &str, args: &Value) -> Result<(String, String)> {
    let title = required_str(command, args, "title")?.trim();
    let content = required_str(command, args, "content")?.trim();
    if title.is_empty() || content.is_empty() {
        return Err(VaultError::ValidationError(
            "Title and content must not be empty".into(),
        ));
    }
    Ok((title.to_string(), content.to_string()))
}

fn category_arg(args: &Value) -> Option<String> {
    optional_str(args, "category")
        .map(str::trim)
        .map(|c| if c.is_empty() { DEFAULT_CATEGORY } else { c })
        .map(String::from)
}

fn existing(db: &Db, id: i64) -> Result<Prompt> {
    db.get_by_key(id)?.ok_or(VaultError::NotFound(id))
}

pub fn list(db: &Db, args: Value) -> Result<Value> {
    let filter = filter_arg(&args)?;
    let prompts = db.filter(filter)?;
    let listing = PromptListing::from_prompts(&prompts);
    Ok(json!({ "filter": filter, "rows": listing.rows(), "prompts": prompts }))
}

/// Fetch one prompt by numeric key, or by display row within a filtered list
pub fn get(db: &Db, args: Value) -> Result<Value> {
    let id = match args.get("row").and_then(|v| v.as_u64()) {
        Some(row) => {
            let prompts = db.filter(filter_arg(&args)?)?;
            let listing = PromptListing::from_prompts(&prompts);
            let row = usize::try_from(row).map_err(|_| invalid("prompts.get", "row out of range"))?;
            listing
                .key_at(row)
                .ok_or_else(|| invalid("prompts.get", format!("no prompt at row {}", row)))?
        },
        None => required_id("prompts.get", &args)?,
    };
    Ok(json!(existing(db, id)?))
}

/// Create a user prompt, or overwrite the one sharing its `uuid`
pub fn save(db: &Db, args: Value) -> Result<Value> {
    let (title, content) = validated_text("prompts.save", &args)?;
    let mut prompt = Prompt::new(title, content)
        .with_category(category_arg(&args).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()));
    if let Some(uuid) = optional_str(&args, "uuid").map(str::trim).filter(|u| !u.is_empty()) {
        if let Some(target) = db.get_by_uuid(uuid)? {
            if target.is_builtin {
                return Err(VaultError::BuiltinProtected(target.id.unwrap_or_default()));
            }
        }
        prompt = prompt.with_uuid(uuid);
    }

    let outcome = db.save(&mut prompt)?;
    Ok(json!({ "outcome": outcome, "prompt": prompt }))
}

/// Edit title, content and (optionally) category of an existing prompt.
///
/// Built-in prompts are rebuilt from the bundled file on every start, so an
/// edit to one is saved as a new user prompt and the original stays as is.
pub fn update(db: &Db, args: Value) -> Result<Value> {
    let id = required_id("prompts.update", &args)?;
    let (title, content) = validated_text("prompts.update", &args)?;

    let current = existing(db, id)?;
    let category = category_arg(&args).unwrap_or_else(|| current.category.clone());

    if current.is_builtin {
        let mut copy = Prompt::new(title, content).with_category(category);
        db.save(&mut copy)?;
        tracing::debug!(source = id, copy = ?copy.id, "saved edit of built-in prompt as a user copy");
        return Ok(json!({ "success": true, "forked_from": id, "prompt": copy }));
    }

    let prompt = Prompt {
        title,
        content,
        category,
        ..current
    };
    if !db.update(&prompt)? {
        return Err(VaultError::NotFound(id));
    }
    Ok(json!({ "success": true, "prompt": prompt }))
}

/// Delete a user prompt. Built-in prompts are owned by the reconciler.
pub fn delete(db: &Db, args: Value) -> Result<Value> {
    let id = required_id("prompts.delete", &args)?;
    let prompt = existing(db, id)?;
    if prompt.is_builtin {
        return Err(VaultError::BuiltinProtected(id));
    }

    let removed = db.delete(id)?;
    Ok(json!({ "success": removed }))
}

pub fn search(db: &Db, args: Value) -> Result<Value> {
    let keyword = optional_str(&args, "keyword").unwrap_or_default();
    let prompts = db.search(keyword)?;
    Ok(json!({ "keyword": keyword, "prompts": prompts }))
}

pub fn export(db: &Db, args: Value) -> Result<Value> {
    let path = required_str("prompts.export", &args, "path")?;
    let filter = filter_arg(&args)?;
    let count = transfer::export_to_file(db, filter, Path::new(path))?;
    Ok(json!({ "path": path, "filter": filter, "count": count }))
}

pub fn import(db: &Db, args: Value) -> Result<Value> {
    let path = required_str("prompts.import", &args, "path")?;
    let report = transfer::import_from_file(db, Path::new(path))?;
    Ok(json!({ "path": path, "attempted": report.attempted, "saved": report.saved }))
}

pub fn reconcile(db: &Db, args: Value) -> Result<Value> {
    let path = required_str("prompts.reconcile", &args, "path")?;
    let report = Reconciler::new(path).reconcile_builtin(db)?;
    Ok(json!(report))
}
