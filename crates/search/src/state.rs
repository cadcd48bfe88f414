//! Orchestrator state and the snapshots handed to observers.

use std::fmt;
use std::sync::Arc;

/// Coarse lifecycle of an orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
	/// Nothing scheduled and nothing in flight.
	Idle,
	/// A debounced dispatch is scheduled.
	Debouncing,
	/// A dispatched request is outstanding.
	Dispatching,
}

/// Mutable state record. Only the orchestrator writes to it.
pub(crate) struct SearchState<P, E> {
	pub current_query: String,
	pub previous_query: String,
	pub results: Option<Arc<P>>,
	pub error: Option<Arc<E>>,
	pub loading: bool,
}

impl<P, E> Default for SearchState<P, E> {
	fn default() -> Self {
		Self {
			current_query: String::new(),
			previous_query: String::new(),
			results: None,
			error: None,
			loading: false,
		}
	}
}

impl<P, E> SearchState<P, E> {
	pub fn snapshot(&self) -> SearchSnapshot<P, E> {
		SearchSnapshot {
			query: self.current_query.clone(),
			loading: self.loading,
			results: self.results.clone(),
			error: self.error.clone(),
		}
	}
}

/// Point-in-time view of the observable state.
pub struct SearchSnapshot<P, E> {
	pub query: String,
	pub loading: bool,
	pub results: Option<Arc<P>>,
	pub error: Option<Arc<E>>,
}

impl<P, E> Default for SearchSnapshot<P, E> {
	fn default() -> Self {
		SearchState::default().snapshot()
	}
}

impl<P, E> Clone for SearchSnapshot<P, E> {
	fn clone(&self) -> Self {
		Self {
			query: self.query.clone(),
			loading: self.loading,
			results: self.results.clone(),
			error: self.error.clone(),
		}
	}
}

impl<P: fmt::Debug, E: fmt::Debug> fmt::Debug for SearchSnapshot<P, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SearchSnapshot")
			.field("query", &self.query)
			.field("loading", &self.loading)
			.field("results", &self.results)
			.field("error", &self.error)
			.finish()
	}
}

impl<P: PartialEq, E: PartialEq> PartialEq for SearchSnapshot<P, E> {
	fn eq(&self, other: &Self) -> bool {
		self.query == other.query && self.loading == other.loading && self.results == other.results && self.error == other.error
	}
}
