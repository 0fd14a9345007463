use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inkrypt_core::crypto::{encrypt, SymmetricKey};
use inkrypt_core::storage::{ChangeFeed, RecordStore, SqliteStore, StoredEntry, StoredTemplate};
use inkrypt_core::{DecryptedEntry, DecryptedTemplate, JournalRepository, Result};

/// Delegates to an in-memory store and counts every call that reads or
/// writes records.
struct CountingStore {
    inner: SqliteStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: SqliteStore::in_memory().expect("store should open"),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl RecordStore for CountingStore {
    fn insert_entry(&self, entry: &StoredEntry) -> Result<i64> {
        self.tick();
        self.inner.insert_entry(entry)
    }
    fn update_entry(&self, entry: &StoredEntry) -> Result<()> {
        self.tick();
        self.inner.update_entry(entry)
    }
    fn delete_entry(&self, id: i64) -> Result<bool> {
        self.tick();
        self.inner.delete_entry(id)
    }
    fn get_entry(&self, id: i64) -> Result<Option<StoredEntry>> {
        self.tick();
        self.inner.get_entry(id)
    }
    fn list_entries(&self) -> Result<Vec<StoredEntry>> {
        self.tick();
        self.inner.list_entries()
    }
    fn search_entries(&self, query: &str) -> Result<Vec<StoredEntry>> {
        self.tick();
        self.inner.search_entries(query)
    }
    fn subscribe_entries(&self) -> ChangeFeed {
        self.inner.subscribe_entries()
    }
    fn insert_template(&self, template: &StoredTemplate) -> Result<i64> {
        self.tick();
        self.inner.insert_template(template)
    }
    fn update_template(&self, template: &StoredTemplate) -> Result<()> {
        self.tick();
        self.inner.update_template(template)
    }
    fn delete_template(&self, id: i64) -> Result<bool> {
        self.tick();
        self.inner.delete_template(id)
    }
    fn get_template(&self, id: i64) -> Result<Option<StoredTemplate>> {
        self.tick();
        self.inner.get_template(id)
    }
    fn list_templates(&self) -> Result<Vec<StoredTemplate>> {
        self.tick();
        self.inner.list_templates()
    }
    fn subscribe_templates(&self) -> ChangeFeed {
        self.inner.subscribe_templates()
    }
    fn clear_all(&self) -> Result<()> {
        self.tick();
        self.inner.clear_all()
    }
}

fn setup() -> (Arc<SqliteStore>, Arc<SymmetricKey>, JournalRepository<SqliteStore>) {
    let store = Arc::new(SqliteStore::in_memory().expect("store should open"));
    let key = Arc::new(SymmetricKey::generate());
    let repo = JournalRepository::new(Arc::clone(&store), Arc::clone(&key));
    (store, key, repo)
}

#[tokio::test]
async fn test_corrupted_title_excluded_from_stream() {
    let (store, _key, repo) = setup();
    let good = repo
        .insert_entry(&DecryptedEntry::new("good", "fine"))
        .expect("insert should succeed");
    let bad = repo
        .insert_entry(&DecryptedEntry::new("bad", "soon broken"))
        .expect("insert should succeed");

    let mut stored = store
        .get_entry(bad)
        .expect("get should succeed")
        .expect("row should exist");
    stored.title = "corrupted".to_string();
    store.update_entry(&stored).expect("update should succeed");

    let mut stream = repo.entries_stream();
    let snapshot = stream
        .next()
        .await
        .expect("stream should emit")
        .expect("snapshot should decrypt");
    let ids: Vec<_> = snapshot.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![good]);

    assert!(repo.get_entry(bad).expect("get should succeed").is_none());
}

#[test]
fn test_corrupted_tags_degrade_to_empty() {
    let (store, _key, repo) = setup();
    let id = repo
        .insert_entry(&DecryptedEntry::new("t", "c").with_tags(["x", "y"]).with_voice_note("/v.enc"))
        .expect("insert should succeed");

    let mut stored = store
        .get_entry(id)
        .expect("get should succeed")
        .expect("row should exist");
    stored.tags = "not a blob".to_string();
    stored.voice_note_path = encrypt("/v.enc", &SymmetricKey::generate()).expect("encrypt");
    store.update_entry(&stored).expect("update should succeed");

    let entry = repo
        .get_entry(id)
        .expect("get should succeed")
        .expect("entry should still be readable");
    assert_eq!(entry.title, "t");
    assert!(entry.tags.is_empty());
    assert!(entry.voice_note_path.is_none());
}

#[test]
fn test_corrupted_template_is_skipped() {
    let (store, _key, repo) = setup();
    repo.insert_template(&DecryptedTemplate::new("keep", "k"))
        .expect("insert should succeed");
    let broken = repo
        .insert_template(&DecryptedTemplate::new("break", "b"))
        .expect("insert should succeed");

    store
        .update_template(&StoredTemplate {
            id: broken,
            name: "garbage".to_string(),
            content: "garbage".to_string(),
        })
        .expect("update should succeed");

    let names: Vec<_> = repo
        .all_templates()
        .expect("list should succeed")
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["keep"]);
}

#[test]
fn test_blank_search_does_not_touch_store() {
    let store = Arc::new(CountingStore::new());
    let repo = JournalRepository::new(Arc::clone(&store), Arc::new(SymmetricKey::generate()));
    repo.insert_entry(&DecryptedEntry::new("t", "c"))
        .expect("insert should succeed");
    let before = store.calls();

    assert!(repo.search_entries("").expect("search").is_empty());
    assert!(repo.search_entries("   ").expect("search").is_empty());
    assert_eq!(store.calls(), before);

    assert_eq!(repo.search_entries("t").expect("search").len(), 1);
    assert_eq!(store.calls(), before + 1);
}

#[test]
fn test_repository_over_trait_object() {
    let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::in_memory().expect("store should open"));
    let repo = JournalRepository::new(store, Arc::new(SymmetricKey::generate()));

    let id = repo
        .insert_entry(&DecryptedEntry::new("dyn", "works"))
        .expect("insert should succeed");
    assert_eq!(
        repo.get_entry(id).expect("get").expect("exists").content,
        "works"
    );
}

#[tokio::test]
async fn test_stream_reflects_latest_write() {
    let (_store, _key, repo) = setup();
    let mut stream = repo.entries_stream();
    assert!(stream.next().await.expect("emit").expect("decrypt").is_empty());

    let id = repo
        .insert_entry(&DecryptedEntry::new("a", "1"))
        .expect("insert should succeed");
    let mut entry = repo.get_entry(id).expect("get").expect("exists");
    entry.title = "a, edited".to_string();
    repo.update_entry(&entry).expect("update should succeed");

    let latest = stream.next().await.expect("emit").expect("decrypt");
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].title, "a, edited");
}

#[tokio::test]
async fn test_templates_stream_sorted() {
    let (_store, _key, repo) = setup();
    repo.insert_template(&DecryptedTemplate::new("b", "2"))
        .expect("insert should succeed");
    repo.insert_template(&DecryptedTemplate::new("a", "1"))
        .expect("insert should succeed");

    let mut stream = repo.templates_stream();
    let names: Vec<_> = stream
        .next()
        .await
        .expect("emit")
        .expect("decrypt")
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}
