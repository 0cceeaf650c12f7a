use std::{sync::Arc, time::Instant};

use quill_config::Config;
use quill_domain::{Filters, NavigationContext};
use quill_service::{Error, LoadMoreOutcome, NavigationBridge, SearchSession};
use quill_storage::{KeyValueStore, MemoryStore, kv, navigation_context_key};
use quill_testkit::{FailingStore, ScriptedBackend, corpus};

const SESSION_ID: &str = "session-nav";
const CONTENT: &str = "The castle keep stood over the castle town.";

fn backend() -> Arc<ScriptedBackend> {
	Arc::new(ScriptedBackend::new().with_corpus("castle keep", corpus("castle", 30)))
}

fn session(backend: &Arc<ScriptedBackend>, store: Arc<dyn KeyValueStore>) -> SearchSession {
	SearchSession::with_backend(&Config::default(), store, backend.clone(), SESSION_ID)
}

#[tokio::test]
async fn activate_arrive_resume_round_trip() {
	let backend = backend();
	let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
	let source = session(&backend, store.clone());

	source.search("castle keep", Filters::default()).await.expect("search failed");

	let target =
		source.activate("castle-3", "/docs/castle-3?tab=notes", 480.0).expect("activate failed");
	let search_id = source.snapshot().search_id.expect("search id missing");

	assert_eq!(target.search_id, search_id);
	assert!(target.route.starts_with("/docs/castle-3?tab=notes&context=search&searchId="));
	assert!(target.route.ends_with("&highlight=castle%2Ckeep"));
	assert_eq!(
		kv::read_json::<NavigationContext>(store.as_ref(), &navigation_context_key(SESSION_ID))
			.expect("read failed"),
		Some(target.context.clone())
	);

	let destination = session(&backend, store.clone());
	let arrival = destination.arrive(&target.route, CONTENT, Instant::now()).expect("no arrival");

	assert!(arrival.show_banner);
	assert_eq!(arrival.context.as_ref(), Some(&target.context));
	assert_eq!(arrival.navigator.total_matches(), 3);
	assert_eq!(arrival.initial_scroll.map(|scroll| scroll.start), Some(4));
	assert_eq!(
		arrival.marked_content,
		"The <mark>castle</mark> <mark>keep</mark> stood over the <mark>castle</mark> town."
	);

	let returned = session(&backend, store);

	assert_eq!(returned.resume(), Some(480.0));

	let snapshot = returned.snapshot();

	assert_eq!(snapshot.query.as_deref(), Some("castle keep"));
	assert_eq!(snapshot.results.len(), 20);
	assert_eq!(snapshot.offset, 20);
	assert!(snapshot.has_more);
	assert_eq!(snapshot.search_id.as_deref(), Some(search_id.as_str()));
	assert_eq!(returned.load_more().await, LoadMoreOutcome::Appended { added: 10 });
	assert_eq!(backend.search_calls().last().map(|call| call.offset), Some(20));
}

#[tokio::test]
async fn capture_then_restore_is_deep_equal() {
	let backend = backend();
	let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
	let session = session(&backend, store.clone());

	session
		.search("castle keep", Filters::default().with_project("atlas"))
		.await
		.expect("search failed");

	let target = session.activate("castle-0", "/docs/castle-0", 12.0).expect("activate failed");
	let bridge = NavigationBridge::new(store, SESSION_ID, &Config::default().highlight);

	assert_eq!(bridge.restore(), Some(target.context.clone()));
	assert_eq!(bridge.restore(), Some(target.context));

	session.dismiss_context();

	assert_eq!(bridge.restore(), None);
	assert_eq!(session.resume(), None);
}

#[tokio::test]
async fn resume_with_active_search_keeps_state() {
	let backend = backend();
	let session = session(&backend, Arc::new(MemoryStore::new()));

	session.search("castle keep", Filters::default()).await.expect("search failed");
	session.load_more().await;
	session.activate("castle-25", "/docs/castle-25", 2_400.0).expect("activate failed");

	assert_eq!(session.resume(), Some(2_400.0));
	assert_eq!(session.snapshot().results.len(), 30);
	assert_eq!(backend.search_calls().len(), 2);
}

#[tokio::test]
async fn unreachable_store_still_navigates_within_session() {
	let backend = backend();
	let session = session(&backend, Arc::new(FailingStore));

	session.search("castle keep", Filters::default()).await.expect("search failed");

	let target = session.activate("castle-1", "/docs/castle-1", 64.0).expect("activate failed");
	let arrival = session.arrive(&target.route, CONTENT, Instant::now()).expect("no arrival");

	assert!(arrival.show_banner);
	assert_eq!(session.resume(), Some(64.0));
	assert_eq!(session.history(), vec!["castle keep".to_string()]);
}

#[tokio::test]
async fn activation_requires_a_listed_result() {
	let backend = backend();
	let session = session(&backend, Arc::new(MemoryStore::new()));

	assert!(matches!(
		session.activate("castle-1", "/docs/castle-1", 0.0),
		Err(Error::InvalidRequest { .. })
	));

	session.search("castle keep", Filters::default()).await.expect("search failed");

	assert!(matches!(
		session.activate("castle-29", "/docs/castle-29", 0.0),
		Err(Error::NotFound { .. })
	));
}

#[tokio::test]
async fn cold_navigation_has_no_arrival() {
	let backend = backend();
	let session = session(&backend, Arc::new(MemoryStore::new()));

	assert!(session.arrive("/docs/castle-1", CONTENT, Instant::now()).is_none());
	assert!(
		session.arrive("/docs/castle-1?context=feed&searchId=x", CONTENT, Instant::now()).is_none()
	);

	let arrival = session
		.arrive("/docs/castle-1?context=search&searchId=x&highlight=town", CONTENT, Instant::now())
		.expect("no arrival");

	assert!(!arrival.show_banner);
	assert_eq!(arrival.navigator.total_matches(), 1);
}
