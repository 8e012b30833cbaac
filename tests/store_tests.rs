// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use spendbook::models::{Category, CategoryKind, Expense};
use spendbook::storage::{MemoryStorage, SqliteStorage, Storage, StorageError};
use spendbook::store::{self, CORRUPT_KEY, ExpenseStore, Outcome, STORAGE_KEY};
use spendbook::{db, views};
use tempfile::tempdir;

fn expense(id: &str, description: &str, amount: i64, date: &str, kind: CategoryKind) -> Expense {
    Expense {
        id: id.to_string(),
        description: description.to_string(),
        amount: Decimal::from(amount),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        category: Category::from(kind),
    }
}

fn seeded() -> ExpenseStore<MemoryStorage> {
    let mut s = ExpenseStore::load(MemoryStorage::new());
    for (i, d) in ["Rent", "Bus", "Cinema"].iter().enumerate() {
        let r = s.add(expense(
            &format!("e{}", i),
            d,
            10 * (i as i64 + 1),
            "2024-10-01",
            CategoryKind::Others,
        ));
        assert!(r.persisted());
    }
    s
}

struct BrokenStorage;

impl Storage for BrokenStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }
}

#[test]
fn add_appends_once_and_persists() {
    let mut s = seeded();
    let before = s.len();
    let r = s.add(expense("new", "Lunch", 12, "2024-10-02", CategoryKind::Food));
    assert_eq!(r.outcome, Outcome::Applied);

    let reloaded = store::load_expenses(s.storage());
    assert_eq!(reloaded.len(), before + 1);
    assert_eq!(reloaded.iter().filter(|e| e.id == "new").count(), 1);
    assert_eq!(reloaded.last().unwrap().id, "new");
}

#[test]
fn update_replaces_in_place() {
    let mut s = seeded();
    let before = s.expenses().to_vec();
    let mut changed = before[1].clone();
    changed.description = "X".into();

    let r = s.update(changed.clone());
    assert!(r.persisted());
    assert_eq!(s.expenses()[1], changed);
    assert_eq!(s.expenses()[0], before[0]);
    assert_eq!(s.expenses()[2], before[2]);
    assert_eq!(store::load_expenses(s.storage())[1].description, "X");
}

#[test]
fn update_unknown_id_is_not_found_and_changes_nothing() {
    let mut s = seeded();
    let before = s.expenses().to_vec();
    let r = s.update(expense("ghost", "Ghost", 1, "2024-10-01", CategoryKind::Food));
    assert_eq!(r.outcome, Outcome::NotFound);
    assert!(!r.applied());
    assert_eq!(s.expenses(), before.as_slice());
}

#[test]
fn delete_removes_exactly_one() {
    let mut s = seeded();
    let r = s.delete("e1");
    assert!(r.persisted());
    let ids: Vec<&str> = s.expenses().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e0", "e2"]);

    let r = s.delete("e1");
    assert_eq!(r.outcome, Outcome::NotFound);
    assert_eq!(s.len(), 2);
    assert_eq!(store::load_expenses(s.storage()).len(), 2);
}

#[test]
fn failed_write_keeps_change_in_memory() {
    let mut s = ExpenseStore::load(BrokenStorage);
    let r = s.add(expense("1", "Groceries", 50, "2024-10-05", CategoryKind::Food));
    assert!(r.applied());
    assert!(!r.persisted());
    assert!(matches!(r.warning, Some(StorageError::Unavailable(_))));
    assert_eq!(s.len(), 1);
    assert_eq!(s.get("1").unwrap().description, "Groceries");
}

#[test]
fn absent_or_malformed_data_loads_empty() {
    assert!(ExpenseStore::load(MemoryStorage::new()).is_empty());
    for raw in ["", "not json", "{\"expenses\": \"oops\"}", "[{\"id\": 3}]"] {
        let s = ExpenseStore::load(MemoryStorage::with_item(STORAGE_KEY, raw));
        assert!(s.is_empty(), "expected empty for {:?}", raw);
    }
}

const MIXED: &str = r#"[
    {"id":"a","description":"Lunch","amount":12,"date":"2024-10-05","category":"Food"},
    {"id":"b","description":null,"amount":4,"date":"2024-10-05","category":"Food"},
    {"id":"c","description":"Bus","amount":3,"date":"someday","category":"Transport"},
    {"id":"d","description":"Gift","amount":20,"date":"2024-10-06","category":5}
]"#;

#[test]
fn null_description_reads_as_empty() {
    let raw = r#"[{"id":"a","description":null,"amount":1,"date":"2024-01-01","category":"Food"}]"#;
    let s = ExpenseStore::load(MemoryStorage::with_item(STORAGE_KEY, raw));
    assert_eq!(s.len(), 1);
    assert_eq!(s.get("a").unwrap().description, "");
}

#[test]
fn non_string_category_reads_as_unknown() {
    let raw = r#"[{"id":"a","description":"Gift","amount":1,"date":"2024-01-01","category":5}]"#;
    let s = ExpenseStore::load(MemoryStorage::with_item(STORAGE_KEY, raw));
    assert_eq!(s.get("a").unwrap().category, Category::default());
}

#[test]
fn one_bad_record_does_not_hide_the_rest() {
    let decoded = store::decode_lenient(MIXED).unwrap();
    assert_eq!(decoded.skipped, 1);

    let s = ExpenseStore::load(MemoryStorage::with_item(STORAGE_KEY, MIXED));
    let ids: Vec<&str> = s.expenses().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "d"]);
}

#[test]
fn valid_records_survive_load_then_mutation() {
    let mut s = ExpenseStore::load(MemoryStorage::with_item(STORAGE_KEY, MIXED));
    let r = s.add(expense("e", "Tea", 2, "2024-10-07", CategoryKind::Food));
    assert!(r.persisted());

    let reloaded = store::load_expenses(s.storage());
    let ids: Vec<&str> = reloaded.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "d", "e"]);
    // the document as it was before the rewrite, unreadable record included
    assert_eq!(s.storage().get_item(CORRUPT_KEY).unwrap().unwrap(), MIXED);
}

#[test]
fn unreadable_document_is_kept_before_first_save() {
    let mut s = ExpenseStore::load(MemoryStorage::with_item(STORAGE_KEY, "not json"));
    assert!(s.is_empty());
    // loading alone writes nothing
    assert!(s.storage().get_item(CORRUPT_KEY).unwrap().is_none());

    let _ = s.add(expense("1", "Tea", 2, "2024-10-07", CategoryKind::Food));
    assert_eq!(s.storage().get_item(CORRUPT_KEY).unwrap().unwrap(), "not json");
    assert_eq!(store::load_expenses(s.storage()).len(), 1);
}

#[test]
fn clean_document_leaves_no_backup() {
    let mut s = seeded();
    let _ = s.delete("e0");
    assert!(s.storage().get_item(CORRUPT_KEY).unwrap().is_none());
}

#[test]
fn persisted_layout_is_versioned_envelope() {
    let mut s = ExpenseStore::load(MemoryStorage::new());
    let mut e = expense("1", "Groceries", 50, "2024-10-05", CategoryKind::Food);
    let _ = s.add(e.clone());
    e.id = "2".into();
    e.amount = "12.5".parse().unwrap();
    let _ = s.add(e);

    let raw = s.storage().get_item(STORAGE_KEY).unwrap().unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["version"], json!(1));
    assert_eq!(
        v["expenses"][0],
        json!({
            "id": "1",
            "description": "Groceries",
            "amount": 50,
            "date": "2024-10-05",
            "category": {"value": "Food", "label": "Food"}
        })
    );
    assert_eq!(v["expenses"][1]["amount"], json!(12.5));
}

#[test]
fn reads_legacy_unversioned_array() {
    let raw = r#"[
        {"id":"a","description":"Lunch","amount":12.5,"date":"2024-10-05","category":"Food"},
        {"id":"b","description":"Bus","amount":"3","date":"2024-10-05T18:30:00.000Z",
         "category":{"value":"Transport","label":"Transport"}}
    ]"#;
    let s = ExpenseStore::load(MemoryStorage::with_item(STORAGE_KEY, raw));
    assert_eq!(s.len(), 2);
    assert_eq!(s.expenses()[0].category, Category::from(CategoryKind::Food));
    assert_eq!(s.expenses()[1].date, NaiveDate::from_ymd_opt(2024, 10, 5).unwrap());
    assert_eq!(views::total(s.expenses()), "15.5".parse::<Decimal>().unwrap());
}

#[test]
fn reads_newer_version_best_effort() {
    let raw = r#"{"version":7,"expenses":[
        {"id":"a","description":"Tea","amount":2,"date":"2024-01-01","category":"Food"}]}"#;
    let s = ExpenseStore::load(MemoryStorage::with_item(STORAGE_KEY, raw));
    assert_eq!(s.len(), 1);
}

#[test]
fn mutation_rewrites_legacy_data_in_new_format() {
    let raw = r#"[{"id":"a","description":"Lunch","amount":12,"date":"2024-10-05","category":"Food"}]"#;
    let mut s = ExpenseStore::load(MemoryStorage::with_item(STORAGE_KEY, raw));
    assert!(s.delete("missing").outcome == Outcome::NotFound);
    // not-found writes nothing
    assert_eq!(s.storage().get_item(STORAGE_KEY).unwrap().unwrap(), raw);

    let _ = s.add(expense("b", "Bus", 3, "2024-10-06", CategoryKind::Transport));
    let v: serde_json::Value =
        serde_json::from_str(&s.storage().get_item(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(v["version"], json!(1));
    assert_eq!(v["expenses"][0]["category"], json!({"value": "Food", "label": "Food"}));
}

#[test]
fn sqlite_storage_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("book.sqlite");
    let path = db::resolve_path(Some(path.as_path())).unwrap();

    {
        let conn = db::open_or_init(&path).unwrap();
        let mut s = ExpenseStore::load(SqliteStorage::new(conn));
        assert!(s.add(expense("1", "Groceries", 50, "2024-10-05", CategoryKind::Food)).persisted());
        assert!(s.add(expense("2", "Movie Tickets", 75, "2024-10-06", CategoryKind::Entertainment)).persisted());
        assert!(s.update(expense("2", "Movie", 70, "2024-10-06", CategoryKind::Entertainment)).persisted());
    }

    let conn = db::open_or_init(&path).unwrap();
    let s = ExpenseStore::load(SqliteStorage::new(conn));
    assert_eq!(s.len(), 2);
    assert_eq!(s.get("2").unwrap().description, "Movie");
    assert_eq!(views::total(s.expenses()), Decimal::from(120));
}

#[test]
fn end_to_end_scenario() {
    let mut s = ExpenseStore::load(MemoryStorage::new());
    let _ = s.add(expense("1", "Groceries", 50, "2024-10-05", CategoryKind::Food));
    let _ = s.add(expense("2", "Movie Tickets", 75, "2024-10-06", CategoryKind::Entertainment));

    let items = s.expenses();
    assert_eq!(views::total(items), Decimal::from(125));

    let groups = views::group_by_category(items);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["Food"], Decimal::from(50));
    assert_eq!(groups["Entertainment"], Decimal::from(75));

    let hits = views::filter_list(items, "movie", None, None, None);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "2");
}
