use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("typeahead-worker-global")
			.build()
			.expect("failed to build typeahead-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task tagged with a task class.
///
/// Uses the ambient tokio runtime when there is one, otherwise a lazily built
/// single-worker runtime owned by this crate.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spawn_outside_runtime_uses_global_runtime() {
		let handle = spawn(TaskClass::Request, async { 7 });
		let value = std::thread::spawn(move || {
			tokio::runtime::Builder::new_current_thread()
				.build()
				.unwrap()
				.block_on(handle)
				.unwrap()
		})
		.join()
		.unwrap();
		assert_eq!(value, 7);
	}

	#[tokio::test]
	async fn spawn_inside_runtime_uses_current_handle() {
		let handle = spawn(TaskClass::Timer, async { "ok" });
		assert_eq!(handle.await.unwrap(), "ok");
	}
}
