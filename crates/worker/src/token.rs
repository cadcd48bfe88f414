use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock for timer arms and dispatched requests.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

/// Marker returned when cancellable work was interrupted by its signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Owning side of a cancellation pair.
///
/// Exactly one handle exists per cancellable unit of work; the work itself
/// only ever sees the [`CancelSignal`] obtained from [`CancelHandle::signal`].
#[derive(Debug, Default)]
pub struct CancelHandle {
	token: CancellationToken,
}

impl CancelHandle {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a read-only signal observing this handle.
	pub fn signal(&self) -> CancelSignal {
		CancelSignal {
			token: self.token.clone(),
		}
	}

	/// Requests cancellation. Idempotent.
	pub fn cancel(&self) {
		self.token.cancel();
	}

	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}
}

/// Observable cancellation state handed to cancellable work.
#[derive(Debug, Clone)]
pub struct CancelSignal {
	token: CancellationToken,
}

impl CancelSignal {
	/// Returns a signal that never fires.
	pub fn never() -> Self {
		Self {
			token: CancellationToken::new(),
		}
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.token.cancelled().await;
	}

	/// Drives `fut` until it completes or the signal fires, whichever is first.
	///
	/// An already-fired signal wins without polling `fut`.
	pub async fn run_until_cancelled<F>(&self, fut: F) -> Result<F::Output, Cancelled>
	where
		F: Future,
	{
		tokio::select! {
			biased;
			_ = self.token.cancelled() => Err(Cancelled),
			output = fut => Ok(output),
		}
	}
}
