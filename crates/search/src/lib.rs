//! Request orchestration for search-as-you-type interfaces.
//!
//! [`SearchOrchestrator`] turns a stream of raw input edits into searches:
//! it normalizes and gates each edit, debounces, dispatches through an
//! injected [`SearchExecutor`], cancels superseded requests and drops any
//! completion that is no longer current. Observers read state through
//! accessors, [`subscribe`](SearchOrchestrator::subscribe) snapshots or the
//! callback slots.

mod callbacks;
mod completion;
mod config;
mod error;
mod executor;
mod orchestrator;
mod policy;
mod state;

pub use async_trait::async_trait;
pub use callbacks::{CanceledCallback, ErrorCallback, SearchCallbacks, StartCallback, SuccessCallback};
pub use completion::{DispatchOutcome, SearchCompletion};
pub use config::{DEFAULT_DEBOUNCE_DELAY_MS, DEFAULT_MIN_CHARS, SearchConfig};
pub use error::{BuildError, ConfigError};
pub use executor::{ExecuteError, FnExecutor, SearchExecutor, executor_fn};
pub use orchestrator::{SearchOrchestrator, SearchOrchestratorBuilder};
pub use policy::{Gate, InputProcessor, QueryPolicy, SkipReason};
pub use state::{SearchPhase, SearchSnapshot};
pub use typeahead_worker::{CancelSignal, Cancelled};
