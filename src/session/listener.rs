//! Session listener registry with ordered, re-entrancy-safe delivery.

// self
use crate::{_prelude::*, session::Session};

/// Callback invoked with every published session change.
pub type SessionListener = Arc<dyn Fn(&Session) + Send + Sync>;

#[derive(Default)]
struct RegistryState {
	listeners: BTreeMap<u64, SessionListener>,
	next_id: u64,
	queue: VecDeque<Session>,
	dispatching: bool,
}

/// Fan-out of session changes to registered listeners.
///
/// Changes are queued in publish order and delivered by whichever caller finds the queue
/// idle, so a listener that triggers another change (for example by signing out) only
/// enqueues it; delivery never nests or reorders.
#[derive(Clone, Default)]
pub(crate) struct ListenerRegistry(Arc<Mutex<RegistryState>>);
impl ListenerRegistry {
	pub(crate) fn register(&self, listener: SessionListener) -> SessionSubscription {
		let mut state = self.0.lock();
		let id = state.next_id;

		state.next_id += 1;
		state.listeners.insert(id, listener);

		SessionSubscription { id, registry: Arc::downgrade(&self.0) }
	}

	/// Queues `session`; returns `true` when the caller must [`drain`](Self::drain).
	pub(crate) fn enqueue(&self, session: Session) -> bool {
		let mut state = self.0.lock();

		state.queue.push_back(session);

		if state.dispatching {
			false
		} else {
			state.dispatching = true;

			true
		}
	}

	pub(crate) fn drain(&self) {
		let mut guard = DispatchGuard { state: &self.0, armed: true };

		loop {
			let (session, listeners) = {
				let mut state = self.0.lock();

				match state.queue.pop_front() {
					Some(session) =>
						(session, state.listeners.values().cloned().collect::<Vec<_>>()),
					None => {
						state.dispatching = false;
						guard.armed = false;

						return;
					},
				}
			};

			for listener in listeners {
				listener(&session);
			}
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.0.lock().listeners.len()
	}
}

/// Releases the dispatch flag if a listener unwinds mid-delivery.
struct DispatchGuard<'a> {
	state: &'a Mutex<RegistryState>,
	armed: bool,
}
impl Drop for DispatchGuard<'_> {
	fn drop(&mut self) {
		if self.armed {
			self.state.lock().dispatching = false;
		}
	}
}

/// Registration handle returned by [`crate::session::SessionResolver::subscribe`].
///
/// Dropping the handle unsubscribes; keep it alive for as long as updates are wanted.
#[must_use = "dropping the subscription unsubscribes the listener"]
pub struct SessionSubscription {
	id: u64,
	registry: Weak<Mutex<RegistryState>>,
}
impl SessionSubscription {
	/// Stops delivery to this listener.
	pub fn unsubscribe(self) {
		drop(self);
	}
}
impl Drop for SessionSubscription {
	fn drop(&mut self) {
		if let Some(registry) = self.registry.upgrade() {
			registry.lock().listeners.remove(&self.id);
		}
	}
}
impl Debug for SessionSubscription {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionSubscription").field("id", &self.id).finish()
	}
}
