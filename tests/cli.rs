//! End-to-end tests for the `rb` binary.

use assert_cmd::Command;
use recipebox::storage::{KeyValueStore, LEGACY_BACKUP_KEY, LEGACY_RECIPES_KEY, SqliteKvStore};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn rb(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rb").unwrap();
    cmd.env_remove("RB_DB")
        .env_remove("RB_TEST_DB")
        .env_remove("RECIPEBOX_DB")
        .env_remove("RUST_LOG")
        .arg("--db")
        .arg(db)
        .arg("--json");
    cmd
}

fn run_json(db: &Path, args: &[&str]) -> Value {
    let output = rb(db).args(args).assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn add(db: &Path, args: &[&str]) -> Value {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    run_json(db, &full)
}

#[test]
fn add_then_list_and_show() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data").join("recipes.db");

    let added = add(
        &db,
        &[
            "Pancakes",
            "--prep",
            "10",
            "--cook",
            "15",
            "--servings",
            "2",
            "-i",
            "200 g Mehl",
            "-i",
            "2 Eier",
            "--step",
            "Mix",
        ],
    );
    assert_eq!(added["totalTime"], 25);
    assert_eq!(added["defaultServings"], 2);
    assert_eq!(added["ingredients"][0]["unit"], "g");
    assert!(!added["ingredients"][0]["id"].as_str().unwrap().is_empty());
    let id = added["id"].as_str().unwrap().to_string();

    let listed = run_json(&db, &["list"]);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["recipes"][0]["id"], id.as_str());

    let scaled = run_json(&db, &["show", &id, "--servings", "4"]);
    assert_eq!(scaled["servings"], 4);
    assert_eq!(scaled["ingredients"][0]["amount"], 400.0);
}

#[test]
fn list_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");

    add(&db, &["Slow Stew", "-c", "soup", "--cook", "120", "-i", "Tomato"]);
    add(&db, &["Quick Salad", "-c", "salad", "--prep", "10", "-i", "Tomato", "-i", "Basil"]);
    add(&db, &["Fruit Bowl", "-c", "dessert", "--prep", "5", "-i", "Pineapple"]);

    let quick = run_json(&db, &["list", "--max-time", "30", "--sort", "quick"]);
    let names: Vec<&str> = quick["recipes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Fruit Bowl", "Quick Salad"]);

    let tomato = run_json(&db, &["list", "-i", "tomato", "-i", "basil"]);
    assert_eq!(tomato["count"], 1);
    assert_eq!(tomato["recipes"][0]["name"], "Quick Salad");

    let literal = run_json(&db, &["list", "-i", "("]);
    assert_eq!(literal["count"], 0);

    let soups = run_json(&db, &["list", "-c", "soup"]);
    assert_eq!(soups["count"], 1);
}

#[test]
fn update_recomputes_total_time() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");

    let added = add(&db, &["Bread", "--prep", "20", "--cook", "40"]);
    let id = added["id"].as_str().unwrap();

    let updated = run_json(&db, &["update", id, "--prep", "5"]);
    assert_eq!(updated["totalTime"], 45);
    assert_eq!(updated["cookTime"], 40);

    let renamed = run_json(&db, &["update", id, "--name", "Sourdough"]);
    assert_eq!(renamed["totalTime"], 45);
    assert_eq!(renamed["name"], "Sourdough");
}

#[test]
fn delete_and_not_found() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");

    let added = add(&db, &["Toast"]);
    let id = added["id"].as_str().unwrap();

    let deleted = run_json(&db, &["delete", id]);
    assert_eq!(deleted["deleted"], true);

    let output = rb(&db)
        .args(["--quiet", "delete", id])
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();
    let err: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(err["error"]["code"], "RECIPE_NOT_FOUND");

    rb(&db).args(["show", "missing"]).assert().code(3);
}

#[test]
fn invalid_filters_exit_with_validation_code() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");

    rb(&db).args(["list", "-c", "pizza"]).assert().code(4);
    rb(&db).args(["list", "--sort", "popular"]).assert().code(4);
    rb(&db).args(["add", "Nothing", "--servings", "0"]).assert().code(4);
}

#[test]
fn seed_share_and_stats() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");
    add(&db, &["Replaced"]);

    let seed = dir.path().join("seed.json");
    std::fs::write(
        &seed,
        r#"[{"id":"r1","name":"Soup","description":"Warm","category":"soup","prepTime":5,
            "cookTime":10,"totalTime":15,"servings":2,"defaultServings":2,"difficulty":"easy",
            "ingredients":[{"id":"x","name":"Tomato","amount":2,"unit":"Stück"}],
            "steps":["Cook"],"tags":[],"isFavorite":false,"rating":4,"reviewCount":1,
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z",
            "userId":"u","isPublic":false}]"#,
    )
    .unwrap();

    let seeded = run_json(&db, &["seed", seed.to_str().unwrap()]);
    assert_eq!(seeded["seeded"], 1);

    let listed = run_json(&db, &["list"]);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["recipes"][0]["id"], "r1");

    let shared = run_json(&db, &["share", "r1"]);
    let text = shared["text"].as_str().unwrap();
    assert!(text.starts_with("🍽️ Soup"));
    assert!(text.contains("• 2 Stück Tomato"));
    assert!(text.ends_with("Guten Appetit! 🍴"));

    let stats = run_json(&db, &["stats", "5", "4", "5", "3"]);
    assert_eq!(stats["count"], 4);
    assert_eq!(stats["average"], 4.3);
    assert_eq!(stats["distribution"]["5"], 2);
    assert_eq!(stats["recipes"], 1);
}

#[test]
fn suggest_never_repeats() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");
    for name in ["A", "B", "C"] {
        add(&db, &[name]);
    }

    let picked = run_json(&db, &["suggest", "-n", "10"]);
    assert_eq!(picked["count"], 3);
}

#[test]
fn whoami_is_stable() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");

    let first = run_json(&db, &["whoami"]);
    let second = run_json(&db, &["whoami"]);
    assert_eq!(first["temporary"], false);
    assert_eq!(first["user_id"], second["user_id"]);
}

#[tokio::test]
async fn legacy_collection_is_migrated_on_first_read() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");

    {
        let storage = SqliteKvStore::open(&db).unwrap();
        let legacy = r#"[{"id":"old","name":"Legacy Soup","description":"","category":"soup",
            "prepTime":1,"cookTime":2,"totalTime":3,"servings":1,"defaultServings":1,
            "difficulty":"easy","ingredients":[],"steps":[],"tags":[],"isFavorite":false,
            "rating":0,"reviewCount":0,"createdAt":"2023-05-01T10:00:00.000Z",
            "updatedAt":"2023-05-01T10:00:00.000Z","userId":"u","isPublic":false}]"#;
        storage.set(LEGACY_RECIPES_KEY, legacy).await.unwrap();
    }

    let listed = run_json(&db, &["list"]);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["recipes"][0]["name"], "Legacy Soup");

    let storage = SqliteKvStore::open(&db).unwrap();
    assert!(storage.get(LEGACY_RECIPES_KEY).await.unwrap().is_none());
    assert!(storage.get("recipe_old").await.unwrap().is_some());
}

#[tokio::test]
async fn partially_bad_legacy_collection_keeps_good_records() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");

    let record = |id: &str, prep: &str| {
        format!(
            r#"{{"id":"{id}","name":"Dish {id}","description":"","category":"soup",
            "prepTime":{prep},"cookTime":2,"totalTime":3,"servings":1,"defaultServings":1,
            "difficulty":"easy","ingredients":[],"steps":[],"tags":[],
            "createdAt":"2023-05-01T10:00:00Z","updatedAt":"2023-05-01T10:00:00Z",
            "userId":"u"}}"#
        )
    };
    {
        let storage = SqliteKvStore::open(&db).unwrap();
        let legacy = format!(
            "[{},{},{}]",
            record("a", "1"),
            record("b", "1"),
            record("c", "null")
        );
        storage.set(LEGACY_RECIPES_KEY, &legacy).await.unwrap();
    }

    let listed = run_json(&db, &["--quiet", "list", "--sort", "name"]);
    assert_eq!(listed["count"], 2);

    let storage = SqliteKvStore::open(&db).unwrap();
    let backup = storage.get(LEGACY_BACKUP_KEY).await.unwrap().unwrap();
    assert!(backup.contains(r#""id":"c""#));
}

#[test]
fn version_and_completions() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("recipes.db");

    let version = run_json(&db, &["version"]);
    assert_eq!(version["name"], "recipebox");
    assert_eq!(version["record_key_prefix"], "recipe_");

    let script = rb(&db)
        .args(["completions", "bash"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8(script).unwrap().contains("_rb()"));
}
