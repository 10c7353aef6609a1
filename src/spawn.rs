//! Executor seam for work the session resolver starts from provider callbacks.
//!
//! Identity-change callbacks are synchronous, but the profile lookup they trigger is not.
//! The resolver hands those futures to a [`Spawner`] so the library never assumes a
//! particular runtime. [`TokioSpawner`] covers the common case; [`DeferredSpawner`] queues
//! tasks for the caller to drive, which suits single-threaded event loops and lets tests
//! resolve lookups in any order.

// self
use crate::_prelude::*;

/// Boxed task handed to a [`Spawner`].
pub type SpawnedTask = Pin<Box<dyn Future<Output = ()> + 'static + Send>>;

/// Runs detached tasks to completion.
pub trait Spawner
where
	Self: Send + Sync,
{
	/// Schedules `task`; must not block the caller.
	fn spawn(&self, task: SpawnedTask);
}

/// Spawns onto the ambient Tokio runtime.
#[cfg(feature = "tokio")]
#[derive(Clone, Debug, Default)]
pub struct TokioSpawner {
	handle: Option<tokio::runtime::Handle>,
}
#[cfg(feature = "tokio")]
impl TokioSpawner {
	/// Spawns onto an explicit runtime handle instead of the ambient one.
	pub fn with_handle(handle: tokio::runtime::Handle) -> Self {
		Self { handle: Some(handle) }
	}
}
#[cfg(feature = "tokio")]
impl Spawner for TokioSpawner {
	fn spawn(&self, task: SpawnedTask) {
		match &self.handle {
			Some(handle) => drop(handle.spawn(task)),
			None => drop(tokio::spawn(task)),
		}
	}
}

/// FIFO queue of tasks that only run when the caller drives them.
#[derive(Clone, Default)]
pub struct DeferredSpawner(Arc<Mutex<VecDeque<SpawnedTask>>>);
impl DeferredSpawner {
	/// Number of queued tasks.
	pub fn pending(&self) -> usize {
		self.0.lock().len()
	}

	/// Removes the oldest queued task.
	pub fn take_next(&self) -> Option<SpawnedTask> {
		self.0.lock().pop_front()
	}

	/// Removes the newest queued task.
	pub fn take_latest(&self) -> Option<SpawnedTask> {
		self.0.lock().pop_back()
	}

	/// Runs queued tasks oldest first until the queue is empty, including tasks queued while
	/// draining.
	pub async fn run_all(&self) {
		while let Some(task) = self.take_next() {
			task.await;
		}
	}
}
impl Spawner for DeferredSpawner {
	fn spawn(&self, task: SpawnedTask) {
		self.0.lock().push_back(task);
	}
}
impl Debug for DeferredSpawner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DeferredSpawner").field("pending", &self.pending()).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[tokio::test]
	async fn deferred_tasks_run_only_when_driven() {
		let spawner = DeferredSpawner::default();
		let hits = Arc::new(AtomicUsize::new(0));

		for _ in 0..3 {
			let hits = hits.clone();

			spawner.spawn(Box::pin(async move {
				hits.fetch_add(1, Ordering::SeqCst);
			}));
		}

		assert_eq!(spawner.pending(), 3);
		assert_eq!(hits.load(Ordering::SeqCst), 0);

		spawner.take_latest().expect("A task should be queued.").await;

		assert_eq!(hits.load(Ordering::SeqCst), 1);

		spawner.run_all().await;

		assert_eq!(spawner.pending(), 0);
		assert_eq!(hits.load(Ordering::SeqCst), 3);
	}

	#[cfg(feature = "tokio")]
	#[tokio::test]
	async fn tokio_spawner_runs_on_ambient_and_explicit_handles() {
		let (tx, rx) = std::sync::mpsc::channel();

		TokioSpawner::default().spawn(Box::pin(async move {
			let _ = tx.send(7_u8);
		}));

		let value = tokio::task::spawn_blocking(move || rx.recv())
			.await
			.expect("Blocking receiver task should join.")
			.expect("Spawned task should send a value.");

		assert_eq!(value, 7);

		let (tx, rx) = std::sync::mpsc::channel();

		TokioSpawner::with_handle(tokio::runtime::Handle::current()).spawn(Box::pin(async move {
			let _ = tx.send(8_u8);
		}));

		let value = tokio::task::spawn_blocking(move || rx.recv())
			.await
			.expect("Blocking receiver task should join.")
			.expect("Spawned task should send a value.");

		assert_eq!(value, 8);
	}
}
