//! Integration tests for command dispatch and handlers

use std::fs;
use std::path::Path;

use prompt_vault_core as vault;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

use vault::commands::dispatch;
use vault::{Config, Db};

const BUNDLED: &str = r#"[
    {"uuid": "builtin-translate", "title": "Translate", "content": "Translate the following text", "category": "writing"},
    {"uuid": "builtin-review", "title": "Code review", "content": "Review this diff for bugs"}
]"#;

/// Fresh config in a temp dir with the standard bundled file in place
fn setup() -> (TempDir, Config) {
    let dir = tempdir().unwrap();
    let config = Config::new(dir.path().join("data").join("prompts.db"), dir.path().join("builtin_prompts.json"));
    fs::write(&config.builtin_path, BUNDLED).unwrap();
    (dir, config)
}

fn titles(value: &Value) -> Vec<String> {
    value["prompts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect()
}

fn call(db: &Db, command: &str, args: Value) -> Value {
    dispatch(db, command, args).unwrap()
}

#[test]
fn test_every_listed_command_is_dispatchable() {
    let (_dir, config) = setup();
    let db = vault::open(&config).unwrap();
    for name in vault::commands::list_commands() {
        let result = dispatch(&db, &name, json!({}));
        assert!(!matches!(result, Err(vault::VaultError::CommandNotFound(_))), "{name}");
    }
}

#[test]
fn test_command_not_found() {
    let (_dir, config) = setup();
    let db = vault::open(&config).unwrap();
    assert!(dispatch(&db, "nonexistent_command", json!({})).is_err());
}

#[test]
fn test_startup_loads_builtin_prompts() {
    let (_dir, config) = setup();
    let db = vault::open(&config).unwrap();

    let builtin = call(&db, "prompts.list", json!({"filter": "builtin"}));
    assert_eq!(titles(&builtin), vec!["Translate", "Code review"]);
    assert_eq!(builtin["prompts"][1]["category"], "general");
    assert!(titles(&call(&db, "prompts.list", json!({"filter": "user"}))).is_empty());
}

#[test]
fn test_concrete_save_scenario() {
    let dir = tempdir().unwrap();
    let config = Config::new(dir.path().join("prompts.db"), dir.path().join("none.json"));
    let db = vault::open(&config).unwrap();

    let first = call(
        &db,
        "prompts.save",
        json!({"uuid": "u1", "title": "Greet", "content": "Hello", "category": "general"}),
    );
    assert_eq!(first["prompt"]["id"], 1);
    assert_eq!(titles(&call(&db, "prompts.list", json!({}))).len(), 1);

    let second = call(
        &db,
        "prompts.save",
        json!({"uuid": "u1", "title": "Greet v2", "content": "Hi", "category": "general"}),
    );
    assert_eq!(second["prompt"]["id"], 1);

    let all = call(&db, "prompts.list", json!({}));
    assert_eq!(all["prompts"].as_array().unwrap().len(), 1);
    assert_eq!(all["prompts"][0]["content"], "Hi");
    assert_eq!(all["prompts"][0]["id"], 1);
}

#[test]
fn test_user_prompts_survive_restarts() {
    let (_dir, config) = setup();

    let db = vault::open(&config).unwrap();
    let saved = call(&db, "prompts.save", json!({"title": "Mine", "content": "My own prompt"}));
    let id = saved["prompt"]["id"].as_i64().unwrap();
    db.close().unwrap();

    for _ in 0..2 {
        let db = vault::open(&config).unwrap();
        let got = call(&db, "prompts.get", json!({"id": id}));
        assert_eq!(got["title"], "Mine");
        assert_eq!(got["is_builtin"], false);
        assert_eq!(titles(&call(&db, "prompts.list", json!({"filter": "builtin"}))).len(), 2);
        db.close().unwrap();
    }
}

#[test]
fn test_builtin_cannot_be_deleted_through_commands() {
    let (_dir, config) = setup();
    let db = vault::open(&config).unwrap();

    let builtin = call(&db, "prompts.list", json!({"filter": "builtin"}));
    let id = builtin["prompts"][0]["id"].clone();

    let err = dispatch(&db, "prompts.delete", json!({"id": id})).unwrap_err();
    assert_eq!(err.category(), "builtin");
    assert_eq!(titles(&call(&db, "prompts.list", json!({"filter": "builtin"}))).len(), 2);
}

#[test]
fn test_search_across_builtin_and_user() {
    let (_dir, config) = setup();
    let db = vault::open(&config).unwrap();
    call(&db, "prompts.save", json!({"title": "Bug hunt", "content": "Find the review comments"}));

    let hits = call(&db, "prompts.search", json!({"keyword": "review"}));
    assert_eq!(titles(&hits), vec!["Code review", "Bug hunt"]);

    let everything = call(&db, "prompts.search", json!({"keyword": ""}));
    assert_eq!(titles(&everything).len(), 3);
}

#[test]
fn test_export_then_import_into_fresh_store() {
    let (dir, config) = setup();
    let export_path = dir.path().join("export.json");

    let db = vault::open(&config).unwrap();
    call(&db, "prompts.save", json!({"title": "Mine", "content": "Mine", "category": "personal"}));
    let exported = call(&db, "prompts.export", json!({"path": export_path}));
    assert_eq!(exported["count"], 3);
    db.close().unwrap();

    let fresh = Config::new(dir.path().join("fresh.db"), dir.path().join("no-builtin.json"));
    let db = vault::open(&fresh).unwrap();
    let imported = call(&db, "prompts.import", json!({"path": export_path}));
    assert_eq!(imported["attempted"], 3);
    assert_eq!(imported["saved"], 3);

    let user = call(&db, "prompts.list", json!({"filter": "user"}));
    assert_eq!(titles(&user), vec!["Translate", "Code review", "Mine"]);
    assert!(titles(&call(&db, "prompts.list", json!({"filter": "builtin"}))).is_empty());
}

#[test]
fn test_import_of_broken_file_reports_error() {
    let (dir, config) = setup();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let db = vault::open(&config).unwrap();
    let err = dispatch(&db, "prompts.import", json!({"path": path})).unwrap_err();
    assert_eq!(err.category(), "serialization");
    assert_eq!(titles(&call(&db, "prompts.list", json!({"filter": "user"}))).len(), 0);
}

#[test]
fn test_reconcile_command_picks_up_new_bundle() {
    let (dir, config) = setup();
    let db = vault::open(&config).unwrap();

    let next = dir.path().join("next.json");
    fs::write(&next, r#"[{"uuid": "builtin-new", "title": "New", "content": "Shipped later"}]"#).unwrap();
    let report = call(&db, "prompts.reconcile", json!({"path": next}));
    assert_eq!(report["removed"], 2);
    assert_eq!(report["saved"], 1);

    assert_eq!(titles(&call(&db, "prompts.list", json!({"filter": "builtin"}))), vec!["New"]);
}

#[test]
fn test_open_creates_database_directory() {
    let (_dir, config) = setup();
    assert!(!Path::new(&config.database_path).exists());
    let db = vault::open(&config).unwrap();
    assert!(config.database_path.exists());
    db.close().unwrap();
}

#[test]
fn test_editing_builtin_keeps_user_text_across_restart() {
    let (_dir, config) = setup();

    let db = vault::open(&config).unwrap();
    let builtin = call(&db, "prompts.list", json!({"filter": "builtin"}));
    let id = builtin["prompts"][0]["id"].clone();

    let edited = call(&db, "prompts.update", json!({"id": id, "title": "My edit", "content": "My wording"}));
    assert_eq!(edited["forked_from"], id);
    assert_eq!(edited["prompt"]["is_builtin"], false);
    db.close().unwrap();

    let db = vault::open(&config).unwrap();
    assert_eq!(titles(&call(&db, "prompts.list", json!({"filter": "builtin"}))), vec!["Translate", "Code review"]);
    assert_eq!(titles(&call(&db, "prompts.list", json!({"filter": "user"}))), vec!["My edit"]);
}

#[test]
fn test_save_cannot_take_over_builtin_uuid() {
    let (_dir, config) = setup();
    let db = vault::open(&config).unwrap();

    let err = dispatch(
        &db,
        "prompts.save",
        json!({"uuid": "builtin-translate", "title": "Hijack", "content": "Mine now"}),
    )
    .unwrap_err();
    assert_eq!(err.category(), "builtin");

    let builtin = call(&db, "prompts.list", json!({"filter": "builtin"}));
    assert_eq!(titles(&builtin), vec!["Translate", "Code review"]);
    let id = builtin["prompts"][0]["id"].clone();
    let err = dispatch(&db, "prompts.delete", json!({"id": id})).unwrap_err();
    assert_eq!(err.category(), "builtin");
    assert_eq!(titles(&call(&db, "prompts.list", json!({"filter": "builtin"}))).len(), 2);
}
