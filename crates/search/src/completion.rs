use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::policy::SkipReason;

/// How one dispatch attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
	/// The gate rejected the query; nothing was dispatched.
	Skipped(SkipReason),
	/// Results were published to state and `on_search_success`.
	Published,
	/// The error was published to state and `on_search_error`.
	Failed,
	/// The request finished but was no longer current; its result was dropped.
	Stale,
	/// The request was cancelled before it finished.
	Cancelled,
	/// The request task panicked, was aborted, or its orchestrator was dropped.
	Abandoned,
}

/// Resolves when a dispatch started by [`search`](crate::SearchOrchestrator::search)
/// settles or is superseded.
///
/// Dropping the completion does not affect the request.
#[derive(Debug)]
pub struct SearchCompletion {
	inner: Inner,
}

#[derive(Debug)]
enum Inner {
	Ready(Option<DispatchOutcome>),
	Running(JoinHandle<DispatchOutcome>),
}

impl SearchCompletion {
	pub(crate) fn ready(outcome: DispatchOutcome) -> Self {
		Self {
			inner: Inner::Ready(Some(outcome)),
		}
	}

	pub(crate) fn running(handle: JoinHandle<DispatchOutcome>) -> Self {
		Self {
			inner: Inner::Running(handle),
		}
	}
}

impl Future for SearchCompletion {
	type Output = DispatchOutcome;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match &mut self.get_mut().inner {
			Inner::Ready(outcome) => Poll::Ready(outcome.take().unwrap_or(DispatchOutcome::Abandoned)),
			Inner::Running(handle) => Pin::new(handle).poll(cx).map(|joined| joined.unwrap_or(DispatchOutcome::Abandoned)),
		}
	}
}
