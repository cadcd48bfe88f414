//! Replaceable observer callbacks.

use std::sync::Arc;

pub type StartCallback = Arc<dyn Fn() + Send + Sync>;
pub type SuccessCallback<P> = Arc<dyn Fn(&P, &str) + Send + Sync>;
pub type ErrorCallback<E> = Arc<dyn Fn(&E, &str) + Send + Sync>;
pub type CanceledCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Callback slots. Empty slots are skipped.
pub struct SearchCallbacks<P, E> {
	pub on_search_start: Option<StartCallback>,
	pub on_search_success: Option<SuccessCallback<P>>,
	pub on_search_error: Option<ErrorCallback<E>>,
	pub on_search_canceled: Option<CanceledCallback>,
}

impl<P, E> Default for SearchCallbacks<P, E> {
	fn default() -> Self {
		Self {
			on_search_start: None,
			on_search_success: None,
			on_search_error: None,
			on_search_canceled: None,
		}
	}
}

impl<P, E> Clone for SearchCallbacks<P, E> {
	fn clone(&self) -> Self {
		Self {
			on_search_start: self.on_search_start.clone(),
			on_search_success: self.on_search_success.clone(),
			on_search_error: self.on_search_error.clone(),
			on_search_canceled: self.on_search_canceled.clone(),
		}
	}
}

/// Callback invocation queued while the state lock is held.
pub(crate) enum Notice<P, E> {
	Start,
	Success(Arc<P>, String),
	Error(Arc<E>, String),
	Canceled(String),
}

impl<P, E> SearchCallbacks<P, E> {
	pub(crate) fn deliver(&self, notice: Notice<P, E>) {
		match notice {
			Notice::Start => {
				if let Some(cb) = &self.on_search_start {
					cb();
				}
			}
			Notice::Success(results, query) => {
				if let Some(cb) = &self.on_search_success {
					cb(&*results, query.as_str());
				}
			}
			Notice::Error(error, query) => {
				if let Some(cb) = &self.on_search_error {
					cb(&*error, query.as_str());
				}
			}
			Notice::Canceled(query) => {
				if let Some(cb) = &self.on_search_canceled {
					cb(query.as_str());
				}
			}
		}
	}
}
