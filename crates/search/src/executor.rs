//! The contract the orchestrator consumes from search transports.

use std::future::Future;

use async_trait::async_trait;
use typeahead_worker::{CancelSignal, Cancelled};

/// Failure of one executor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteError<E> {
	/// The call observed its cancellation signal and gave up.
	Cancelled,
	/// The call failed for any other reason. The error is passed through untouched.
	Failed(E),
}

impl<E> From<Cancelled> for ExecuteError<E> {
	fn from(_: Cancelled) -> Self {
		Self::Cancelled
	}
}

/// Performs one search.
///
/// Implementations must watch `signal` and return [`ExecuteError::Cancelled`]
/// promptly once it fires; [`CancelSignal::run_until_cancelled`] does this for
/// a single future.
#[async_trait]
pub trait SearchExecutor: Send + Sync + 'static {
	type Payload: Send + Sync + 'static;
	type Error: Send + Sync + 'static;

	async fn execute(&self, query: &str, signal: CancelSignal) -> Result<Self::Payload, ExecuteError<Self::Error>>;
}

/// Executor backed by a closure. See [`executor_fn`].
#[derive(Debug, Clone)]
pub struct FnExecutor<F>(F);

/// Wraps `f(query, signal)` as a [`SearchExecutor`].
pub fn executor_fn<F>(f: F) -> FnExecutor<F> {
	FnExecutor(f)
}

#[async_trait]
impl<F, Fut, P, E> SearchExecutor for FnExecutor<F>
where
	F: Fn(String, CancelSignal) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<P, ExecuteError<E>>> + Send + 'static,
	P: Send + Sync + 'static,
	E: Send + Sync + 'static,
{
	type Payload = P;
	type Error = E;

	async fn execute(&self, query: &str, signal: CancelSignal) -> Result<P, ExecuteError<E>> {
		(self.0)(query.to_owned(), signal).await
	}
}
