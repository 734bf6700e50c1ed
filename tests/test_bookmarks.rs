mod common;

use common::{recipe, store_with, FailingStore, MockApi, ReadOnlyStore};
use forkify::{BookmarkSet, FileStore, ForkifyError, KeyValueStore, MemoryStore, Store};
use std::sync::Arc;

#[tokio::test]
async fn test_loaded_recipe_reflects_bookmark_membership() {
    let mut store = store_with(MockApi::with_recipes(&["a", "b"]), 10);

    store.load_recipe("a").await.unwrap();
    assert!(!store.recipe().unwrap().bookmarked);

    let current = store.recipe().unwrap().clone();
    store.add_bookmark(current).unwrap();
    assert!(store.recipe().unwrap().bookmarked);

    store.load_recipe("b").await.unwrap();
    assert!(!store.recipe().unwrap().bookmarked);

    store.load_recipe("a").await.unwrap();
    assert!(store.recipe().unwrap().bookmarked);
}

#[tokio::test]
async fn test_load_unknown_recipe_fails_and_keeps_current() {
    let mut store = store_with(MockApi::with_recipes(&["a"]), 10);
    store.load_recipe("a").await.unwrap();

    let result = store.load_recipe("missing").await;
    assert!(matches!(result, Err(ForkifyError::Api { status: 400, .. })));
    assert_eq!(store.recipe().unwrap().id, "a");
}

#[test]
fn test_add_then_delete_restores_set() {
    let mut store = store_with(MockApi::default(), 10);
    store.add_bookmark(recipe("a", 4)).unwrap();
    let before = store.bookmarks().clone();

    store.add_bookmark(recipe("b", 2)).unwrap();
    store.delete_bookmark("b").unwrap();

    assert_eq!(store.bookmarks(), &before);
}

#[test]
fn test_adding_twice_keeps_one_entry() {
    let mut store = store_with(MockApi::default(), 10);
    store.add_bookmark(recipe("a", 4)).unwrap();
    store.add_bookmark(recipe("a", 4)).unwrap();

    assert_eq!(store.bookmarks().len(), 1);
}

#[test]
fn test_deleting_unknown_id_is_noop() {
    let mut store = store_with(MockApi::default(), 10);
    store.add_bookmark(recipe("a", 4)).unwrap();
    store.delete_bookmark("zzz").unwrap();
    assert_eq!(store.bookmarks().len(), 1);
}

#[test]
fn test_bookmarks_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(MockApi::default());

    let mut first = Store::new(api.clone(), Box::new(FileStore::new(dir.path())), 10);
    first.add_bookmark(recipe("b", 4)).unwrap();
    first.add_bookmark(recipe("a", 2)).unwrap();

    let mut second = Store::new(api, Box::new(FileStore::new(dir.path())), 10);
    assert_eq!(second.restore_bookmarks().unwrap(), 2);
    let ids: Vec<&str> = second.bookmarks().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(second.bookmarks().as_slice()[1].servings, 2);
}

#[test]
fn test_persisted_format_is_id_map() {
    let mut storage = MemoryStore::new();
    let mut set = BookmarkSet::new();
    set.insert(recipe("x", 1));
    storage
        .set("bookmarks", &serde_json::to_string(&set).unwrap())
        .unwrap();

    let mut store = Store::new(Arc::new(MockApi::default()), Box::new(storage), 10);
    store.restore_bookmarks().unwrap();
    store.add_bookmark(recipe("y", 1)).unwrap();

    let json = serde_json::to_value(store.bookmarks()).unwrap();
    assert_eq!(json["x"]["id"], "x");
    assert_eq!(json["y"]["servings"], 1);
}

#[test]
fn test_corrupt_storage_is_ignored() {
    let mut storage = MemoryStore::new();
    storage.set("bookmarks", "not json").unwrap();

    let mut store = Store::new(Arc::new(MockApi::default()), Box::new(storage), 10);
    assert_eq!(store.restore_bookmarks().unwrap(), 0);
    assert!(store.bookmarks().is_empty());
}

#[test]
fn test_failed_write_leaves_set_unchanged() {
    let mut store = Store::new(Arc::new(MockApi::default()), Box::new(FailingStore), 10);

    let result = store.add_bookmark(recipe("a", 4));
    assert!(matches!(result, Err(ForkifyError::Storage(_))));
    assert!(store.bookmarks().is_empty());
}

#[tokio::test]
async fn test_clear_bookmarks() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(MockApi::with_recipes(&["a"]));
    let mut store = Store::new(api.clone(), Box::new(FileStore::new(dir.path())), 10);

    store.load_recipe("a").await.unwrap();
    let current = store.recipe().unwrap().clone();
    store.add_bookmark(current).unwrap();
    store.clear_bookmarks().unwrap();

    assert!(store.bookmarks().is_empty());
    assert!(!store.recipe().unwrap().bookmarked);

    let mut fresh = Store::new(api, Box::new(FileStore::new(dir.path())), 10);
    assert_eq!(fresh.restore_bookmarks().unwrap(), 0);
}

#[tokio::test]
async fn test_delete_syncs_current_recipe_flag() {
    let mut store = store_with(MockApi::with_recipes(&["a"]), 10);
    store.load_recipe("a").await.unwrap();
    let current = store.recipe().unwrap().clone();
    store.add_bookmark(current).unwrap();

    store.delete_bookmark("a").unwrap();
    assert!(!store.recipe().unwrap().bookmarked);
}

#[tokio::test]
async fn test_failed_delete_write_leaves_set_unchanged() {
    let mut saved = BookmarkSet::new();
    saved.insert(recipe("a", 4));
    let storage = ReadOnlyStore::with("bookmarks", &serde_json::to_string(&saved).unwrap());

    let mut store = Store::new(Arc::new(MockApi::with_recipes(&["a"])), Box::new(storage), 10);
    assert_eq!(store.restore_bookmarks().unwrap(), 1);
    store.load_recipe("a").await.unwrap();
    assert!(store.recipe().unwrap().bookmarked);

    let result = store.delete_bookmark("a");

    assert!(matches!(result, Err(ForkifyError::Storage(_))));
    assert!(store.bookmarks().contains("a"));
    assert!(store.recipe().unwrap().bookmarked);
}
