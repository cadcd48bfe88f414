use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::token::GenerationClock;
use crate::{TaskClass, spawn};

/// Re-armable trailing-edge timer.
///
/// Each [`arm`](Self::arm) replaces the previously scheduled callback, so only
/// the last arm within a quiet period fires. The fire callback receives the
/// generation it was armed with; owners that share the debouncer behind a lock
/// must [`claim`](Self::claim) that generation before acting, which closes the
/// window where a timer elapses concurrently with a re-arm.
#[derive(Debug, Default)]
pub struct Debouncer {
	clock: GenerationClock,
	armed: Option<Armed>,
}

#[derive(Debug)]
struct Armed {
	generation: u64,
	cancel: CancellationToken,
}

impl Debouncer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Schedules `fire` after `delay`, replacing any pending callback.
	///
	/// Returns the generation passed to `fire`.
	pub fn arm<F>(&mut self, delay: Duration, fire: F) -> u64
	where
		F: FnOnce(u64) + Send + 'static,
	{
		self.cancel_pending();
		let generation = self.clock.next();
		let cancel = CancellationToken::new();
		self.armed = Some(Armed {
			generation,
			cancel: cancel.clone(),
		});

		tracing::trace!(generation, delay_ms = delay.as_millis() as u64, "debounce.arm");
		spawn(TaskClass::Timer, async move {
			tokio::select! {
				biased;
				_ = cancel.cancelled() => {}
				_ = tokio::time::sleep(delay) => {
					tracing::trace!(generation, "debounce.fire");
					fire(generation);
				}
			}
		});
		generation
	}

	/// Drops the pending callback, if any. Returns whether one was armed.
	pub fn disarm(&mut self) -> bool {
		let was_armed = self.cancel_pending();
		if was_armed {
			tracing::trace!("debounce.disarm");
		}
		was_armed
	}

	/// Returns true while a callback is scheduled and not yet claimed.
	pub fn is_armed(&self) -> bool {
		self.armed.is_some()
	}

	/// Consumes the pending arm if `generation` is still the current one.
	///
	/// Returns false for a superseded or already claimed generation.
	pub fn claim(&mut self, generation: u64) -> bool {
		match &self.armed {
			Some(armed) if armed.generation == generation => {
				self.armed = None;
				true
			}
			_ => false,
		}
	}

	fn cancel_pending(&mut self) -> bool {
		match self.armed.take() {
			Some(armed) => {
				armed.cancel.cancel();
				true
			}
			None => false,
		}
	}
}

impl Drop for Debouncer {
	fn drop(&mut self) {
		self.cancel_pending();
	}
}
