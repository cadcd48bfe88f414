/// Execution classes used to tag spawned tasks in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Debounce timer waiting for input to settle.
	Timer,
	/// Executor call for one dispatched query.
	Request,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Timer => "timer",
			Self::Request => "request",
		}
	}
}
