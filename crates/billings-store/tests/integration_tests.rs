//! Integration tests for billings-store
//!
//! These tests verify the append/read cycle against real files.

use billings_domain::traits::TransactionStore;
use billings_domain::{Transaction, TransactionType};
use billings_store::JsonlStore;
use chrono::Utc;
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

fn transaction(shop: &str, kind: TransactionType) -> Transaction {
    Transaction {
        date: Utc::now(),
        app: "Bank".to_string(),
        shop: shop.to_string(),
        raw_text: format!("Card payment at {shop}"),
        amount: Decimal::new(4250, 2),
        category: "Groceries".to_string(),
        kind,
    }
}

fn temp_store() -> (JsonlStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = JsonlStore::new(dir.path().join("transactions.jsonl"));
    (store, dir)
}

fn shops(store: &JsonlStore) -> Vec<String> {
    store
        .list_all()
        .unwrap()
        .iter()
        .map(|record| record["shop"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_missing_store_reads_empty() {
    let (store, _dir) = temp_store();
    let records = store.list_all();
    assert!(records.is_ok(), "Missing file is not an error");
    assert!(records.unwrap().is_empty());
}

#[test]
fn test_append_and_read_fields() {
    let (store, _dir) = temp_store();

    store
        .append(&transaction("Groceries Inc", TransactionType::Expense))
        .unwrap();

    let records = store.list_all().unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["schemaVersion"], 1);
    assert_eq!(record["app"], "Bank");
    assert_eq!(record["shop"], "Groceries Inc");
    assert_eq!(record["rawText"], "Card payment at Groceries Inc");
    assert_eq!(record["amount"].as_f64(), Some(42.5));
    assert_eq!(record["category"], "Groceries");
    assert_eq!(record["type"], "expense");
    assert!(record["date"].is_string());
}

#[test]
fn test_list_all_is_newest_first() {
    let (store, _dir) = temp_store();

    for shop in ["first", "second", "third"] {
        store
            .append(&transaction(shop, TransactionType::Expense))
            .unwrap();
    }

    assert_eq!(shops(&store), vec!["third", "second", "first"]);
}

#[test]
fn test_list_all_is_idempotent() {
    let (store, _dir) = temp_store();
    store
        .append(&transaction("a", TransactionType::Income))
        .unwrap();
    store
        .append(&transaction("b", TransactionType::Expense))
        .unwrap();

    let first = store.list_all().unwrap();
    let second = store.list_all().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_append_does_not_rewrite_existing_lines() {
    let (store, _dir) = temp_store();
    store
        .append(&transaction("a", TransactionType::Expense))
        .unwrap();
    let before = std::fs::read_to_string(store.path()).unwrap();

    store
        .append(&transaction("b", TransactionType::Expense))
        .unwrap();
    let after = std::fs::read_to_string(store.path()).unwrap();

    assert!(after.starts_with(&before));
    assert_eq!(after.lines().count(), 2);
}

#[test]
fn test_truncated_line_is_skipped() {
    let (store, _dir) = temp_store();
    store
        .append(&transaction("before", TransactionType::Expense))
        .unwrap();

    // Simulate a torn write in the middle of the file
    {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(store.path())
            .unwrap();
        file.write_all(b"{\"shop\":\"torn\",\"amou\n").unwrap();
    }

    store
        .append(&transaction("after", TransactionType::Expense))
        .unwrap();

    assert_eq!(shops(&store), vec!["after", "before"]);
}

#[test]
fn test_append_after_torn_tail_starts_new_line() {
    let (store, _dir) = temp_store();
    store
        .append(&transaction("before", TransactionType::Expense))
        .unwrap();

    // Crash mid-write: the last line has no terminator
    {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(store.path())
            .unwrap();
        file.write_all(b"{\"shop\":\"torn\",\"amou").unwrap();
    }

    store
        .append(&transaction("after", TransactionType::Expense))
        .unwrap();

    assert_eq!(shops(&store), vec!["after", "before"]);
    let contents = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.ends_with('\n'));
}

#[test]
fn test_blank_and_foreign_lines_are_tolerated() {
    let (store, _dir) = temp_store();
    std::fs::write(
        store.path(),
        "\n{\"shop\":\"legacy\",\"note\":\"no version\"}\r\n   \n42\nnot json\n",
    )
    .unwrap();
    store
        .append(&transaction("new", TransactionType::Income))
        .unwrap();

    let records = store.list_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["shop"], "new");
    assert_eq!(records[1]["shop"], "legacy");
    assert_eq!(records[1]["note"], "no version");
}

#[test]
fn test_records_read_back_as_transactions() {
    let (store, _dir) = temp_store();
    let original = transaction("Groceries Inc", TransactionType::Expense);
    store.append(&original).unwrap();

    let records = store.list_all().unwrap();
    let parsed = Transaction::from_record(&records[0]).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn test_append_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let store = JsonlStore::new(dir.path().join("nested").join("data").join("tx.jsonl"));

    store
        .append(&transaction("x", TransactionType::Expense))
        .unwrap();
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn test_unwritable_store_fails_the_append() {
    let dir = TempDir::new().unwrap();
    // A directory where the file should be
    let store = JsonlStore::new(dir.path());

    let result = store.append(&transaction("x", TransactionType::Expense));
    assert!(result.is_err());
}

#[test]
fn test_concurrent_appends_do_not_interleave() {
    let (store, _dir) = temp_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..25 {
                    let shop = format!("worker-{worker}-{i}-{}", "x".repeat(512));
                    store
                        .append(&transaction(&shop, TransactionType::Expense))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let contents = std::fs::read_to_string(store.path()).unwrap();
    assert_eq!(contents.lines().count(), 200);
    for line in contents.lines() {
        assert!(serde_json::from_str::<serde_json::Value>(line).is_ok());
    }
    assert_eq!(store.list_all().unwrap().len(), 200);
}
