//! Search orchestration with debounce, supersession and stale-result guards.
//!
//! # Request identity
//!
//! Every dispatch gets a request id from a generation clock and, when
//! cancellation is enabled, a fresh [`CancelHandle`]. At most one request is
//! tracked as in flight. A completion is published only when all of these
//! hold at settle time:
//!
//! * the request is still the tracked one (it was not superseded),
//! * its signal has not fired,
//! * its captured query equals the live `current_query`.
//!
//! A request that fails any check is dropped without touching `results`,
//! `error` or callbacks. A request only retires its own tracking, so a late
//! completion never clears `loading` for a newer dispatch.
//!
//! # Locking
//!
//! State lives behind one mutex that is never held across an await or while
//! callbacks run. Callback invocations are queued as notices under the lock
//! and delivered after it is released, so callbacks may call back into the
//! orchestrator.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, trace};
use typeahead_worker::{CancelHandle, CancelSignal, Debouncer, GenerationClock, TaskClass, spawn};

use crate::callbacks::{Notice, SearchCallbacks};
use crate::completion::{DispatchOutcome, SearchCompletion};
use crate::config::SearchConfig;
use crate::error::BuildError;
use crate::executor::{ExecuteError, SearchExecutor};
use crate::policy::{Gate, InputProcessor, QueryPolicy};
use crate::state::{SearchPhase, SearchSnapshot, SearchState};

type Payload<X> = <X as SearchExecutor>::Payload;
type Failure<X> = <X as SearchExecutor>::Error;
type Notices<X> = Vec<Notice<Payload<X>, Failure<X>>>;

/// Drives searches for a stream of query edits.
///
/// Dropping the orchestrator disarms the debounce timer and signals the
/// in-flight request without invoking callbacks.
pub struct SearchOrchestrator<X: SearchExecutor> {
	shared: Arc<Shared<X>>,
}

struct Shared<X: SearchExecutor> {
	executor: Arc<X>,
	config: SearchConfig,
	policy: QueryPolicy,
	core: Mutex<Core<X::Payload, X::Error>>,
	callbacks: Mutex<SearchCallbacks<X::Payload, X::Error>>,
	snapshots: watch::Sender<SearchSnapshot<X::Payload, X::Error>>,
}

struct Core<P, E> {
	state: SearchState<P, E>,
	in_flight: Option<InFlight>,
	debounce: Debouncer,
	requests: GenerationClock,
}

struct InFlight {
	id: u64,
	query: String,
	cancel: Option<CancelHandle>,
}

impl<P, E> Core<P, E> {
	fn new() -> Self {
		Self {
			state: SearchState::default(),
			in_flight: None,
			debounce: Debouncer::new(),
			requests: GenerationClock::new(),
		}
	}

	/// Stops tracking the in-flight request, signalling it when `signal` is set.
	fn retire_in_flight(&mut self, signal: bool) -> Option<InFlight> {
		let in_flight = self.in_flight.take()?;
		if signal && let Some(cancel) = &in_flight.cancel {
			cancel.cancel();
		}
		Some(in_flight)
	}

	fn is_tracked(&self, id: u64) -> bool {
		self.in_flight.as_ref().is_some_and(|f| f.id == id)
	}

	fn phase(&self) -> SearchPhase {
		if self.debounce.is_armed() {
			SearchPhase::Debouncing
		} else if self.in_flight.is_some() {
			SearchPhase::Dispatching
		} else {
			SearchPhase::Idle
		}
	}
}

impl<X: SearchExecutor> Shared<X> {
	fn commit(&self, core: &Core<X::Payload, X::Error>) {
		self.snapshots.send_replace(core.state.snapshot());
	}

	fn emit(&self, notices: Notices<X>) {
		if notices.is_empty() {
			return;
		}
		let callbacks = self.callbacks.lock().clone();
		for notice in notices {
			callbacks.deliver(notice);
		}
	}

	fn set_query(self: &Arc<Self>, raw: &str) {
		let normalized = self.policy.normalize(raw);
		let mut notices = Vec::new();
		{
			let mut core = self.core.lock();
			core.state.current_query = normalized.clone();
			if self.policy.meets_min_chars(&normalized) {
				let weak = Arc::downgrade(self);
				core.debounce.arm(self.config.debounce_delay(), move |generation| {
					if let Some(shared) = weak.upgrade() {
						shared.fire_debounced(generation, normalized);
					}
				});
			} else {
				core.debounce.disarm();
				self.cancel_locked(&mut core, &mut notices);
			}
			self.commit(&core);
		}
		self.emit(notices);
	}

	fn fire_debounced(self: &Arc<Self>, generation: u64, query: String) {
		let mut notices = Vec::new();
		{
			let mut core = self.core.lock();
			if !core.debounce.claim(generation) {
				trace!(generation, "debounce.superseded");
				return;
			}
			self.begin_dispatch(&mut core, query, &mut notices);
			self.commit(&core);
		}
		self.emit(notices);
	}

	fn search(self: &Arc<Self>) -> SearchCompletion {
		let mut notices = Vec::new();
		let completion = {
			let mut core = self.core.lock();
			let query = core.state.current_query.clone();
			let completion = self.begin_dispatch(&mut core, query, &mut notices);
			self.commit(&core);
			completion
		};
		self.emit(notices);
		completion
	}

	fn begin_dispatch(self: &Arc<Self>, core: &mut Core<X::Payload, X::Error>, query: String, notices: &mut Notices<X>) -> SearchCompletion {
		if let Gate::Skip(reason) = self.policy.gate(&query, &core.state.previous_query) {
			trace!(query = %query, ?reason, "search.skip");
			return SearchCompletion::ready(DispatchOutcome::Skipped(reason));
		}

		core.debounce.disarm();
		core.state.loading = true;
		core.state.error = None;
		core.state.previous_query = query.clone();
		notices.push(Notice::Start);

		let cancellation = self.config.enable_cancellation;
		if let Some(superseded) = core.retire_in_flight(cancellation) {
			debug!(request = superseded.id, query = %superseded.query, "search.supersede");
			if cancellation {
				notices.push(Notice::Canceled(superseded.query));
			}
		}

		let id = core.requests.next();
		let cancel = cancellation.then(CancelHandle::new);
		let signal = cancel.as_ref().map_or_else(CancelSignal::never, CancelHandle::signal);
		core.in_flight = Some(InFlight {
			id,
			query: query.clone(),
			cancel,
		});
		debug!(request = id, query = %query, "search.dispatch");

		let executor = Arc::clone(&self.executor);
		let guard = RequestGuard {
			shared: Arc::downgrade(self),
			id,
			settled: false,
		};
		SearchCompletion::running(spawn(TaskClass::Request, async move {
			let result = executor.execute(&query, signal.clone()).await;
			guard.settle(query, &signal, result)
		}))
	}

	fn settle(&self, id: u64, query: String, signal: &CancelSignal, result: Result<X::Payload, ExecuteError<X::Error>>) -> DispatchOutcome {
		let mut notices = Vec::new();
		let outcome = {
			let mut core = self.core.lock();
			let tracked = core.is_tracked(id);
			let current = tracked && !signal.is_cancelled() && core.state.current_query == query;
			let outcome = match result {
				Ok(payload) if current => {
					let payload = Arc::new(payload);
					core.state.results = Some(Arc::clone(&payload));
					core.state.error = None;
					notices.push(Notice::Success(payload, query.clone()));
					DispatchOutcome::Published
				}
				Err(ExecuteError::Failed(error)) if current => {
					let error = Arc::new(error);
					core.state.error = Some(Arc::clone(&error));
					notices.push(Notice::Error(error, query.clone()));
					DispatchOutcome::Failed
				}
				Err(ExecuteError::Cancelled) => DispatchOutcome::Cancelled,
				_ if signal.is_cancelled() => DispatchOutcome::Cancelled,
				_ => DispatchOutcome::Stale,
			};
			if tracked {
				core.in_flight = None;
				core.state.loading = false;
			}
			self.commit(&core);
			outcome
		};

		match outcome {
			DispatchOutcome::Published => debug!(request = id, query = %query, "search.published"),
			DispatchOutcome::Failed => debug!(request = id, query = %query, "search.failed"),
			DispatchOutcome::Stale => debug!(request = id, query = %query, "search.stale"),
			_ => trace!(request = id, query = %query, ?outcome, "search.settle"),
		}
		self.emit(notices);
		outcome
	}

	/// Returns true when a request was cancelled.
	fn cancel_locked(&self, core: &mut Core<X::Payload, X::Error>, notices: &mut Notices<X>) -> bool {
		if !self.config.enable_cancellation {
			return false;
		}
		let Some(cancelled) = core.retire_in_flight(true) else {
			return false;
		};
		core.state.loading = false;
		debug!(request = cancelled.id, query = %cancelled.query, "search.cancel");
		notices.push(Notice::Canceled(core.state.current_query.clone()));
		true
	}
}

/// Owned by a request task; retires the request's tracking if the task ends
/// without settling (executor panic or task abort).
struct RequestGuard<X: SearchExecutor> {
	shared: Weak<Shared<X>>,
	id: u64,
	settled: bool,
}

impl<X: SearchExecutor> RequestGuard<X> {
	fn settle(mut self, query: String, signal: &CancelSignal, result: Result<X::Payload, ExecuteError<X::Error>>) -> DispatchOutcome {
		self.settled = true;
		match self.shared.upgrade() {
			Some(shared) => shared.settle(self.id, query, signal, result),
			None => DispatchOutcome::Abandoned,
		}
	}
}

impl<X: SearchExecutor> Drop for RequestGuard<X> {
	fn drop(&mut self) {
		if self.settled {
			return;
		}
		let Some(shared) = self.shared.upgrade() else {
			return;
		};
		let mut core = shared.core.lock();
		if core.is_tracked(self.id) {
			core.in_flight = None;
			core.state.loading = false;
			shared.commit(&core);
		}
		debug!(request = self.id, "search.abandoned");
	}
}

impl<X: SearchExecutor> SearchOrchestrator<X> {
	/// Creates an orchestrator with no callbacks and no input processor.
	pub fn new(executor: X, config: SearchConfig) -> Self {
		Self::from_parts(executor, config, None, SearchCallbacks::default())
	}

	pub fn builder() -> SearchOrchestratorBuilder<X> {
		SearchOrchestratorBuilder::new()
	}

	fn from_parts(executor: X, config: SearchConfig, processor: Option<InputProcessor>, callbacks: SearchCallbacks<X::Payload, X::Error>) -> Self {
		let (snapshots, _) = watch::channel(SearchSnapshot::default());
		Self {
			shared: Arc::new(Shared {
				executor: Arc::new(executor),
				policy: QueryPolicy::new(&config, processor),
				config,
				core: Mutex::new(Core::new()),
				callbacks: Mutex::new(callbacks),
				snapshots,
			}),
		}
	}

	/// Records a raw input edit and schedules a debounced dispatch for it.
	///
	/// Input shorter than `min_chars` after normalization drops the pending
	/// dispatch and cancels the in-flight request instead.
	pub fn set_query(&self, raw: &str) {
		self.shared.set_query(raw);
	}

	/// Dispatches the current query now, bypassing the debounce timer.
	///
	/// State changes happen before this returns; the completion resolves when
	/// the dispatch settles or is superseded.
	pub fn search(&self) -> SearchCompletion {
		self.shared.search()
	}

	/// Cancels the in-flight request, if any.
	///
	/// No-op when cancellation is disabled. A scheduled debounced dispatch is
	/// left armed.
	pub fn cancel(&self) {
		let mut notices = Vec::new();
		{
			let mut core = self.shared.core.lock();
			if self.shared.cancel_locked(&mut core, &mut notices) {
				self.shared.commit(&core);
			}
		}
		self.shared.emit(notices);
	}

	/// Cancels, disarms the debounce timer and clears all state. Callbacks are kept.
	pub fn reset(&self) {
		self.cancel();
		let mut core = self.shared.core.lock();
		core.debounce.disarm();
		core.retire_in_flight(false);
		core.state = SearchState::default();
		debug!("search.reset");
		self.shared.commit(&core);
	}

	pub fn query(&self) -> String {
		self.shared.core.lock().state.current_query.clone()
	}

	pub fn loading(&self) -> bool {
		self.shared.core.lock().state.loading
	}

	pub fn results(&self) -> Option<Arc<X::Payload>> {
		self.shared.core.lock().state.results.clone()
	}

	pub fn error(&self) -> Option<Arc<X::Error>> {
		self.shared.core.lock().state.error.clone()
	}

	pub fn snapshot(&self) -> SearchSnapshot<X::Payload, X::Error> {
		self.shared.core.lock().state.snapshot()
	}

	/// Returns a receiver updated after every state change.
	pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot<X::Payload, X::Error>> {
		self.shared.snapshots.subscribe()
	}

	/// A pending debounce reports [`SearchPhase::Debouncing`] even while an
	/// older request is still in flight.
	pub fn phase(&self) -> SearchPhase {
		self.shared.core.lock().phase()
	}

	pub fn config(&self) -> &SearchConfig {
		&self.shared.config
	}

	/// Replaces every callback slot at once.
	pub fn set_callbacks(&self, callbacks: SearchCallbacks<X::Payload, X::Error>) {
		*self.shared.callbacks.lock() = callbacks;
	}

	pub fn set_on_search_start(&self, f: impl Fn() + Send + Sync + 'static) {
		self.shared.callbacks.lock().on_search_start = Some(Arc::new(f));
	}

	pub fn set_on_search_success(&self, f: impl Fn(&X::Payload, &str) + Send + Sync + 'static) {
		self.shared.callbacks.lock().on_search_success = Some(Arc::new(f));
	}

	pub fn set_on_search_error(&self, f: impl Fn(&X::Error, &str) + Send + Sync + 'static) {
		self.shared.callbacks.lock().on_search_error = Some(Arc::new(f));
	}

	pub fn set_on_search_canceled(&self, f: impl Fn(&str) + Send + Sync + 'static) {
		self.shared.callbacks.lock().on_search_canceled = Some(Arc::new(f));
	}
}

impl<X: SearchExecutor> Drop for SearchOrchestrator<X> {
	fn drop(&mut self) {
		let mut core = self.shared.core.lock();
		core.debounce.disarm();
		if let Some(in_flight) = core.retire_in_flight(true) {
			debug!(request = in_flight.id, query = %in_flight.query, "search.teardown");
		}
	}
}

/// Builder for [`SearchOrchestrator`].
pub struct SearchOrchestratorBuilder<X: SearchExecutor> {
	executor: Option<X>,
	config: SearchConfig,
	processor: Option<InputProcessor>,
	callbacks: SearchCallbacks<X::Payload, X::Error>,
}

impl<X: SearchExecutor> Default for SearchOrchestratorBuilder<X> {
	fn default() -> Self {
		Self::new()
	}
}

impl<X: SearchExecutor> SearchOrchestratorBuilder<X> {
	pub fn new() -> Self {
		Self {
			executor: None,
			config: SearchConfig::default(),
			processor: None,
			callbacks: SearchCallbacks::default(),
		}
	}

	pub fn executor(mut self, executor: X) -> Self {
		self.executor = Some(executor);
		self
	}

	pub fn config(mut self, config: SearchConfig) -> Self {
		self.config = config;
		self
	}

	/// Final transform applied after trimming and case-folding.
	pub fn input_processor(mut self, f: impl Fn(String) -> String + Send + Sync + 'static) -> Self {
		self.processor = Some(Arc::new(f));
		self
	}

	pub fn on_search_start(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
		self.callbacks.on_search_start = Some(Arc::new(f));
		self
	}

	pub fn on_search_success(mut self, f: impl Fn(&X::Payload, &str) + Send + Sync + 'static) -> Self {
		self.callbacks.on_search_success = Some(Arc::new(f));
		self
	}

	pub fn on_search_error(mut self, f: impl Fn(&X::Error, &str) + Send + Sync + 'static) -> Self {
		self.callbacks.on_search_error = Some(Arc::new(f));
		self
	}

	pub fn on_search_canceled(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
		self.callbacks.on_search_canceled = Some(Arc::new(f));
		self
	}

	/// Fails when no executor was supplied.
	pub fn build(self) -> Result<SearchOrchestrator<X>, BuildError> {
		let executor = self.executor.ok_or(BuildError::MissingExecutor)?;
		Ok(SearchOrchestrator::from_parts(executor, self.config, self.processor, self.callbacks))
	}
}
