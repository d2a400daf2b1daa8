//! End-of-test cleanup hooks.

use std::panic::{self, AssertUnwindSafe};

use parking_lot::Mutex;
use tracing::debug;

type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Accepts callbacks to run once when the owning test ends.
pub trait Cleanup {
	fn cleanup(&self, f: Callback);
}

impl<C: Cleanup + ?Sized> Cleanup for &C {
	fn cleanup(&self, f: Callback) {
		(**self).cleanup(f);
	}
}

/// Guard running registered callbacks in reverse order of registration.
///
/// Callbacks run exactly once, on [`Scope::finish`] or on drop. A panicking
/// callback does not prevent the rest from running; the first panic is
/// resumed once all of them are done, unless the thread is already
/// unwinding.
///
/// ```ignore
/// let scope = Scope::named("parses_header");
/// let p: Ref<Header> = placeholders::make(&scope);
/// // ...
/// drop(scope); // `p` is no longer a placeholder
/// ```
#[derive(Default)]
pub struct Scope {
	name: Option<String>,
	callbacks: Mutex<Vec<Callback>>,
}

impl Scope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Scope whose name shows up in log events.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			callbacks: Mutex::default(),
		}
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Number of callbacks still waiting to run.
	pub fn pending(&self) -> usize {
		self.callbacks.lock().len()
	}

	/// Runs the registered callbacks now.
	pub fn finish(self) {
		drop(self);
	}

	fn run(&mut self) {
		let callbacks = std::mem::take(self.callbacks.get_mut());
		if callbacks.is_empty() {
			return;
		}
		debug!(scope = self.name.as_deref().unwrap_or("<anonymous>"), count = callbacks.len(), "running cleanups");

		let mut first_panic = None;
		for callback in callbacks.into_iter().rev() {
			if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(callback)) {
				first_panic.get_or_insert(payload);
			}
		}
		if let Some(payload) = first_panic
			&& !std::thread::panicking()
		{
			panic::resume_unwind(payload);
		}
	}
}

impl Cleanup for Scope {
	fn cleanup(&self, f: Callback) {
		self.callbacks.lock().push(f);
	}
}

impl Drop for Scope {
	fn drop(&mut self) {
		self.run();
	}
}
