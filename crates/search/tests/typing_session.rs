//! End-to-end typing sessions against an in-memory catalogue.
//!
//! The catalogue backend answers prefix queries with a latency that shrinks
//! as the query grows, so earlier keystrokes always finish last.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use typeahead_search::{
	CancelSignal, DispatchOutcome, ExecuteError, SearchConfig, SearchExecutor, SearchOrchestrator, SearchPhase, async_trait,
};

const CATALOGUE: &[&str] = &["rust", "rustc", "rustdoc", "rustfmt", "rustup", "ruby", "python"];

#[derive(Debug, PartialEq, Eq)]
struct Unavailable;

#[derive(Default)]
struct Catalogue {
	calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SearchExecutor for Catalogue {
	type Payload = Vec<&'static str>;
	type Error = Unavailable;

	async fn execute(&self, query: &str, signal: CancelSignal) -> Result<Self::Payload, ExecuteError<Self::Error>> {
		self.calls.lock().unwrap().push(query.to_owned());
		if query == "offline" {
			return Err(ExecuteError::Failed(Unavailable));
		}
		let latency = Duration::from_millis(400u64.saturating_sub(query.len() as u64 * 50));
		signal.run_until_cancelled(tokio::time::sleep(latency)).await?;
		Ok(CATALOGUE.iter().copied().filter(|name| name.starts_with(query)).collect())
	}
}

fn keystrokes(orch: &SearchOrchestrator<Catalogue>, text: &str) -> Vec<String> {
	let mut typed = String::new();
	let mut prefixes = Vec::new();
	for ch in text.chars() {
		typed.push(ch);
		orch.set_query(&typed);
		prefixes.push(typed.clone());
	}
	prefixes
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn slow_typing_only_surfaces_the_final_prefix() {
	let successes = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&successes);
	let orch = SearchOrchestrator::builder()
		.config(SearchConfig::default().with_debounce_delay_ms(100))
		.executor(Catalogue::default())
		.on_search_success(move |results: &Vec<&'static str>, query: &str| {
			sink.lock().unwrap().push((query.to_owned(), results.len()));
		})
		.build()
		.unwrap();

	let mut typed = String::new();
	for ch in "rustf".chars() {
		typed.push(ch);
		orch.set_query(&typed);
		tokio::time::sleep(Duration::from_millis(150)).await;
	}
	tokio::time::sleep(Duration::from_secs(1)).await;

	assert_eq!(*successes.lock().unwrap(), vec![("rustf".to_owned(), 1)]);
	assert_eq!(orch.results().as_deref(), Some(&vec!["rustfmt"]));
	assert_eq!(orch.phase(), SearchPhase::Idle);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn burst_of_keystrokes_dispatches_once() {
	let catalogue = Catalogue::default();
	let calls = Arc::clone(&catalogue.calls);
	let orch = SearchOrchestrator::new(catalogue, SearchConfig::default());

	let prefixes = keystrokes(&orch, "RUSTUP");
	assert_eq!(prefixes.len(), 6);
	assert_eq!(orch.query(), "rustup");
	assert_eq!(orch.phase(), SearchPhase::Debouncing);

	tokio::time::sleep(Duration::from_secs(2)).await;

	let snapshot = orch.snapshot();
	assert_eq!(snapshot.query, "rustup");
	assert!(!snapshot.loading);
	assert_eq!(snapshot.results.as_deref(), Some(&vec!["rustup"]));
	assert_eq!(*calls.lock().unwrap(), vec!["rustup".to_owned()]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failure_then_recovery_through_manual_search() {
	let errors = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&errors);
	let orch = SearchOrchestrator::new(Catalogue::default(), SearchConfig::default());
	orch.set_on_search_error(move |error: &Unavailable, query: &str| {
		sink.lock().unwrap().push(format!("{query}:{error:?}"));
	});

	orch.set_query("rust");
	assert_eq!(orch.search().await, DispatchOutcome::Published);
	orch.set_query("offline");
	assert_eq!(orch.search().await, DispatchOutcome::Failed);

	assert_eq!(*errors.lock().unwrap(), vec!["offline:Unavailable".to_owned()]);
	assert_eq!(orch.results().map(|r| r.len()), Some(5));
	assert_eq!(orch.error().as_deref(), Some(&Unavailable));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn config_loaded_from_toml_drives_gating() {
	let config = SearchConfig::from_toml_str("min_chars = 5\ndebounce_delay_ms = 50\n").unwrap();
	let orch = SearchOrchestrator::new(Catalogue::default(), config);

	orch.set_query("rust");
	tokio::time::sleep(Duration::from_millis(200)).await;
	assert!(orch.results().is_none());

	orch.set_query("rustc");
	tokio::time::sleep(Duration::from_millis(500)).await;
	assert_eq!(orch.results().as_deref(), Some(&vec!["rustc"]));
}
