use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use quill_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml() -> String {
	SAMPLE_CONFIG_TEMPLATE_TOML.to_string()
}

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let table = root
		.as_table_mut()
		.expect("Template config must be a table.")
		.get_mut(section)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{section}]."));

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("quill_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn validation_message(payload: String) -> String {
	let err = quill_config::parse(&payload).expect_err("Expected validation error.");

	match err {
		Error::Validation { message } => message,
		other => panic!("Unexpected error: {other}"),
	}
}

#[test]
fn loads_template_and_normalizes() {
	let path = write_temp_config(sample_toml());
	let result = quill_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Template config must load.");

	assert_eq!(cfg.backend.api_base, "https://api.quill.test/v1");
	assert!(cfg.backend.api_key.is_none(), "Blank api_key must normalize to None.");
	assert_eq!(cfg.session.page_size, 20);
	assert_eq!(cfg.suggestions.min_chars, 2);
	assert_eq!(cfg.storage.path, Some(PathBuf::from("/var/lib/quill/kv")));
}

#[test]
fn empty_document_uses_defaults() {
	let cfg = quill_config::parse("").expect("Empty config must be valid.");

	assert_eq!(cfg.session.page_size, 20);
	assert_eq!(cfg.session.max_query_chars, 500);
	assert_eq!(cfg.suggestions.debounce_ms, 500);
	assert_eq!(cfg.history.max_entries, 10);
	assert_eq!(cfg.highlight.emphasis_ms, 1_500);
	assert_eq!(cfg.backend.search_path, "/search");
	assert!(cfg.storage.path.is_none());
}

#[test]
fn default_config_is_valid() {
	quill_config::validate(&Config::default()).expect("Default config must validate.");
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("quill_config_test_missing.toml");
	let err = quill_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
	assert!(err.to_string().contains("quill_config_test_missing.toml"));
}

#[test]
fn page_size_must_be_positive() {
	let message = validation_message(sample_toml_with("session", "page_size", Value::Integer(0)));

	assert_eq!(message, "session.page_size must be greater than zero.");
}

#[test]
fn page_size_is_capped() {
	let message =
		validation_message(sample_toml_with("session", "page_size", Value::Integer(101)));

	assert_eq!(message, "session.page_size must be 100 or less.");
}

#[test]
fn history_cap_must_be_positive() {
	let message =
		validation_message(sample_toml_with("history", "max_entries", Value::Integer(0)));

	assert_eq!(message, "history.max_entries must be greater than zero.");
}

#[test]
fn api_base_requires_http_scheme() {
	let message = validation_message(sample_toml_with(
		"backend",
		"api_base",
		Value::String("ftp://api.quill.test".to_string()),
	));

	assert_eq!(message, "backend.api_base must start with http:// or https://.");
}

#[test]
fn paths_must_be_absolute() {
	let message = validation_message(sample_toml_with(
		"backend",
		"suggestions_path",
		Value::String("suggest".to_string()),
	));

	assert_eq!(message, "backend.suggestions_path must start with '/'.");
}

#[test]
fn markers_must_be_non_empty() {
	let message = validation_message(sample_toml_with(
		"highlight",
		"marker_close",
		Value::String(String::new()),
	));

	assert_eq!(message, "highlight.marker_close must be non-empty.");
}

#[test]
fn header_values_must_be_strings() {
	let payload =
		format!("{}\n", sample_toml()).replace("x-client = \"quill-web\"", "x-client = 7");
	let message = validation_message(payload);

	assert_eq!(message, "backend.default_headers.x-client must be a string.");
}
