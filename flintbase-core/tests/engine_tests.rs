// Facade-level integration tests for Flintbase Core
use std::collections::HashMap;

use flintbase_core::StorageEngine;
use tempfile::TempDir;

fn create_engine() -> (TempDir, StorageEngine) {
    let temp_dir = TempDir::new().unwrap();
    let mut engine = StorageEngine::new(temp_dir.path().join("test.fdb"));
    engine.create_database().unwrap();
    (temp_dir, engine)
}

fn filters(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_full_engine_walkthrough() {
    let (_temp, mut engine) = create_engine();

    // Key/value operations
    engine.write_data("key1", "value1").unwrap();
    engine.write_data("key2", "value2").unwrap();
    assert_eq!(engine.read_data("key1").unwrap(), "value1");
    assert_eq!(engine.read_data("key2").unwrap(), "value2");
    assert!(engine.read_data("key3").is_err());

    // Document model
    engine
        .write_document("users", r#"{"name": "Alice", "age": 30}"#)
        .unwrap();
    engine
        .write_document("users", r#"{"name": "Bob", "age": 25}"#)
        .unwrap();

    let results = engine
        .query_documents("users", &filters(&[("name", "Alice")]))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0], r#"{"name": "Alice", "age": 30}"#);

    // Schema management
    let schema = r#"{"type": "object", "properties": {"name": {"type": "string"}}}"#;
    engine.create_schema(schema).unwrap();
    engine.update_schema(schema).unwrap();

    // Indexing
    engine.create_index("name").unwrap();
    engine.drop_index("name").unwrap();

    // Transactions
    engine.begin_transaction().unwrap();
    engine.write_data("tx_key", "tx_value").unwrap();
    engine.commit_transaction().unwrap();
    assert_eq!(engine.read_data("tx_key").unwrap(), "tx_value");

    engine.begin_transaction().unwrap();
    engine.write_data("rollback_key", "rollback_value").unwrap();
    engine.rollback_transaction().unwrap();
    assert!(engine.read_data("rollback_key").is_err());

    engine.delete_database().unwrap();
}

#[test]
fn test_round_trip_outside_transaction() {
    let (_temp, mut engine) = create_engine();

    for i in 0..50 {
        let key = format!("key{}", i);
        let value = format!("value{}", i);
        engine.write_data(&key, &value).unwrap();
        assert_eq!(engine.read_data(&key).unwrap(), value);
    }
}

#[test]
fn test_overwrite_outside_transaction() {
    let (_temp, mut engine) = create_engine();

    engine.write_data("key1", "old").unwrap();
    engine.write_data("key1", "new").unwrap();

    assert_eq!(engine.read_data("key1").unwrap(), "new");
}

#[test]
fn test_query_with_number_filter() {
    let (_temp, mut engine) = create_engine();

    engine
        .write_document("users", r#"{"name": "Alice", "age": 30}"#)
        .unwrap();
    engine
        .write_document("users", r#"{"name": "Bob", "age": 25}"#)
        .unwrap();

    // Numeric field compared through its canonical textual form
    let results = engine
        .query_documents("users", &filters(&[("age", "25")]))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0], r#"{"name": "Bob", "age": 25}"#);
}

#[test]
fn test_query_with_multiple_filters() {
    let (_temp, mut engine) = create_engine();

    engine
        .write_document("users", r#"{"name": "Alice", "age": 30}"#)
        .unwrap();
    engine
        .write_document("users", r#"{"name": "Alice", "age": 31}"#)
        .unwrap();

    let results = engine
        .query_documents("users", &filters(&[("name", "Alice"), ("age", "31")]))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0], r#"{"name": "Alice", "age": 31}"#);
}

#[test]
fn test_query_empty_filters_returns_all() {
    let (_temp, mut engine) = create_engine();

    engine.write_document("users", r#"{"name": "Alice"}"#).unwrap();
    engine.write_document("users", r#"{"name": "Bob"}"#).unwrap();

    let results = engine.query_documents("users", &HashMap::new()).unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn test_query_preserves_insertion_order() {
    let (_temp, mut engine) = create_engine();

    for i in 0..10 {
        engine
            .write_document("events", &format!(r#"{{"seq": {}}}"#, i))
            .unwrap();
    }

    let results = engine.query_documents("events", &HashMap::new()).unwrap();
    assert_eq!(results.len(), 10);
    assert_eq!(results[0], r#"{"seq": 0}"#);
    assert_eq!(results[9], r#"{"seq": 9}"#);
}

#[test]
fn test_malformed_blob_does_not_abort_query() {
    let (_temp, mut engine) = create_engine();

    engine.write_document("users", r#"{"name": "Alice"}"#).unwrap();
    engine.write_document("users", "{broken").unwrap();
    engine.write_document("users", r#"{"name": "Bob"}"#).unwrap();

    let results = engine
        .query_documents("users", &HashMap::new())
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(engine.last_error().is_some());
}

#[test]
fn test_collections_are_independent() {
    let (_temp, mut engine) = create_engine();

    engine.write_document("users", r#"{"name": "Alice"}"#).unwrap();
    engine.write_document("posts", r#"{"title": "Hello"}"#).unwrap();

    let users = engine.query_documents("users", &HashMap::new()).unwrap();
    let posts = engine.query_documents("posts", &HashMap::new()).unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(posts.len(), 1);
    assert_eq!(
        engine.list_collections(),
        vec!["posts".to_string(), "users".to_string()]
    );
}

#[test]
fn test_engine_without_database_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut engine = StorageEngine::new(temp_dir.path().join("never_created.fdb"));

    // Fully usable in memory before create_database
    engine.write_data("key1", "value1").unwrap();
    assert_eq!(engine.read_data("key1").unwrap(), "value1");

    engine.begin_transaction().unwrap();
    engine.write_data("key1", "value2").unwrap();
    engine.rollback_transaction().unwrap();
    assert_eq!(engine.read_data("key1").unwrap(), "value1");

    assert!(!engine.path().exists());
}

#[test]
fn test_create_database_twice_is_harmless() {
    let (_temp, mut engine) = create_engine();

    engine.write_data("key1", "value1").unwrap();
    engine.create_database().unwrap();

    assert_eq!(engine.read_data("key1").unwrap(), "value1");
}

#[test]
fn test_delete_database_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut engine = StorageEngine::new(temp_dir.path().join("absent.fdb"));

    engine.write_data("key1", "value1").unwrap();
    engine.delete_database().unwrap();

    assert!(engine.read_data("key1").is_err());
}
