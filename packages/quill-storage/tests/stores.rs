use std::sync::Arc;

use quill_domain::Filters;
use quill_storage::{
	HistoryStore, KeyValueStore, MemoryStore, SEARCH_HISTORY_KEY, SavedSearchStore,
	StarredResults, kv,
};
use quill_testkit::{FailingStore, FlakyStore, TestStoreDir};

#[test]
fn instances_over_one_store_see_each_other() {
	let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
	let left = HistoryStore::new(store.clone(), 10);
	let right = HistoryStore::new(store, 10);

	left.add("dragon");
	right.add("castle");
	left.add("keep");

	assert_eq!(
		right.list(),
		vec!["keep".to_string(), "castle".to_string(), "dragon".to_string()]
	);
}

#[test]
fn failed_write_keeps_memory_until_store_recovers() {
	quill_testkit::init_tracing();

	let store = Arc::new(FlakyStore::new());
	let history = HistoryStore::new(store.clone(), 10);

	store.set_fail_writes(true);
	history.add("dragon");

	assert_eq!(history.list(), vec!["dragon".to_string()]);
	assert_eq!(store.inner().get(SEARCH_HISTORY_KEY).expect("get failed"), None);

	store.set_fail_writes(false);
	history.add("castle");

	let persisted: Option<Vec<String>> =
		kv::read_json(store.inner(), SEARCH_HISTORY_KEY).expect("read failed");

	assert_eq!(persisted, Some(vec!["castle".to_string(), "dragon".to_string()]));
}

#[test]
fn unreadable_store_is_never_overwritten() {
	let store = Arc::new(FlakyStore::new());

	store.inner().set(SEARCH_HISTORY_KEY, "[\"old-1\",\"old-2\"]").expect("seed failed");
	store.set_fail_reads(true);

	let history = HistoryStore::new(store.clone(), 10);

	assert!(history.list().is_empty());

	history.add("pending");

	assert_eq!(history.list(), vec!["pending".to_string()]);

	let untouched: Option<Vec<String>> =
		kv::read_json(store.inner(), SEARCH_HISTORY_KEY).expect("read failed");

	assert_eq!(untouched, Some(vec!["old-1".to_string(), "old-2".to_string()]));

	store.set_fail_reads(false);
	history.add("fresh");

	let persisted: Option<Vec<String>> =
		kv::read_json(store.inner(), SEARCH_HISTORY_KEY).expect("read failed");

	assert_eq!(
		persisted,
		Some(vec!["fresh".to_string(), "old-1".to_string(), "old-2".to_string()])
	);
}

#[test]
fn malformed_document_is_replaced_on_next_write() {
	let store = Arc::new(MemoryStore::new());

	store.set(SEARCH_HISTORY_KEY, "{not json").expect("seed failed");

	let history = HistoryStore::new(store.clone(), 10);

	assert!(history.list().is_empty());

	history.add("dragon");

	let persisted: Option<Vec<String>> =
		kv::read_json(store.as_ref(), SEARCH_HISTORY_KEY).expect("read failed");

	assert_eq!(persisted, Some(vec!["dragon".to_string()]));
}

#[test]
fn offline_store_still_serves_the_session() {
	let store: Arc<dyn KeyValueStore> = Arc::new(FailingStore);
	let saved = SavedSearchStore::new(store.clone());
	let starred = StarredResults::new(store);
	let search = saved.save("Dragons", "dragon", &Filters::default(), None).expect("save failed");

	assert_eq!(saved.list(), vec![search.clone()]);
	assert_eq!(saved.rename(search.id, "Wyrms").expect("rename failed").name, "Wyrms");
	assert!(starred.toggle("dragon-1"));
	assert!(starred.is_starred("dragon-1"));
}

#[test]
fn file_store_survives_reopen() {
	let dir = TestStoreDir::new().expect("temp dir failed");
	let filters = Filters::default().with_entity_type("document");
	let saved = {
		let store: Arc<dyn KeyValueStore> = Arc::new(dir.open().expect("open failed"));

		SavedSearchStore::new(store)
			.save("Castle scenes", "castle", &filters, Some(7))
			.expect("save failed")
	};
	let reopened = SavedSearchStore::new(Arc::new(dir.open().expect("reopen failed")));

	assert_eq!(reopened.get(saved.id), Some(saved));

	dir.cleanup().expect("cleanup failed");
}

#[test]
fn open_store_follows_storage_config() {
	let dir = TestStoreDir::new().expect("temp dir failed");
	let memory = kv::open_store(&quill_config::Storage { path: None }).expect("open failed");
	let file = kv::open_store(&quill_config::Storage { path: Some(dir.path().to_path_buf()) })
		.expect("open failed");

	memory.set("probe", "1").expect("set failed");
	file.set("probe", "2").expect("set failed");

	assert!(dir.path().join("probe.json").exists());
	assert_eq!(memory.get("probe").expect("get failed").as_deref(), Some("1"));
}
