//! Runtime primitives shared by the search orchestrator.
//!
//! Tasks are spawned through [`spawn`] with a [`TaskClass`] tag so traces can
//! tell timer wakeups apart from executor calls. Cancellation is modelled with
//! an owned [`CancelHandle`] whose read-only [`CancelSignal`] is handed to
//! whoever performs the cancellable work, and [`Debouncer`] provides a
//! re-armable trailing-edge timer.

mod class;
mod debounce;
mod spawn;
mod token;

pub use class::TaskClass;
pub use debounce::Debouncer;
pub use spawn::spawn;
pub use token::{CancelHandle, CancelSignal, Cancelled, GenerationClock};
