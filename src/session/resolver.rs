//! Session resolver: reconciles identity events with profile lookups into one [`Session`].
//!
//! The provider's identity callback is the only writer. `None` moves the session to
//! `Anonymous` synchronously; `Some(identity)` moves it to `Authenticated { Pending }`
//! synchronously and hands exactly one profile lookup to the [`Spawner`]. A lookup result is
//! applied only if its user id still matches the current identity; otherwise it is dropped,
//! so a slow lookup for a superseded identity can never attach its profile to a newer one.
//! Missing documents and store failures leave the profile `Pending`. At most one lookup per
//! user id is in flight; a refresh requested meanwhile is folded into that lookup and re-issued
//! once if it comes back empty.

// self
use crate::{
	_prelude::*,
	auth::{Identity, Password, Profile, UserId},
	error::AuthError,
	gate::AccessDecision,
	obs::{self, OpKind, OpOutcome, OpSpan},
	provider::{IdentityProvider, IdentitySubscription},
	session::{
		ListenerRegistry, ProfileState, ResolverMetrics, Session, SessionSubscription,
	},
	spawn::Spawner,
	store::{ProfileStore, StoreError},
};

/// Result of a successful [`SessionResolver::sign_up`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignUpOutcome {
	/// Identity created by the provider.
	pub identity: Identity,
	/// Non-fatal problem the caller should surface, if any.
	pub warning: Option<SignUpWarning>,
}

/// Degraded-but-usable states after account creation.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SignUpWarning {
	/// The account exists but its profile document could not be written; the session stays
	/// pending until the profile is repaired.
	#[error("Account was created but the profile could not be saved: {error}")]
	ProfileNotCreated {
		/// Store failure that prevented the write.
		error: StoreError,
	},
}

#[derive(Default)]
struct ResolverState {
	session: Session,
	in_flight: Option<UserId>,
	recheck_on_miss: bool,
}

struct ResolverInner {
	identity: Arc<dyn IdentityProvider>,
	profiles: Arc<dyn ProfileStore>,
	spawner: Arc<dyn Spawner>,
	state: RwLock<ResolverState>,
	listeners: ListenerRegistry,
	auth_guard: AsyncMutex<()>,
	subscription: Mutex<Option<IdentitySubscription>>,
	metrics: ResolverMetrics,
}
impl ResolverInner {
	fn on_identity_change(self: &Arc<Self>, event: Option<Identity>) {
		let (lookup, dispatch) = {
			let mut state = self.state.write();
			let (next, lookup) = match event {
				Some(identity) => {
					let lookup = if state.in_flight.as_ref() == Some(&identity.id) {
						None
					} else {
						state.in_flight = Some(identity.id.clone());
						state.recheck_on_miss = false;

						Some(identity.id.clone())
					};

					(Session::pending(identity), lookup)
				},
				None => {
					state.in_flight = None;
					state.recheck_on_miss = false;

					(Session::Anonymous, None)
				},
			};

			(lookup, self.transition(&mut state, next))
		};

		if dispatch {
			self.listeners.drain();
		}
		if let Some(id) = lookup {
			self.issue_lookup(id);
		}
	}

	fn issue_lookup(self: &Arc<Self>, id: UserId) {
		let weak = Arc::downgrade(self);
		let profiles = self.profiles.clone();
		let span = OpSpan::new(OpKind::ProfileLookup, "resolve_profile");

		self.metrics.record_issued();
		obs::record_op_outcome(OpKind::ProfileLookup, OpOutcome::Attempt);
		self.spawner.spawn(Box::pin(span.instrument(async move {
			let result = profiles.get(&id).await;

			if let Some(inner) = weak.upgrade() {
				inner.apply_lookup(id, result);
			}
		})));
	}

	fn apply_lookup(self: &Arc<Self>, id: UserId, result: Result<Option<Profile>, StoreError>) {
		let (dispatch, recheck) = {
			let mut state = self.state.write();
			let recheck = if state.in_flight.as_ref() == Some(&id) {
				state.in_flight = None;

				mem::take(&mut state.recheck_on_miss)
			} else {
				false
			};

			let identity = match state.session.identity() {
				Some(identity) if identity.id == id => identity.clone(),
				_ => {
					self.metrics.record_discarded();
					obs::stale_lookup_discarded(&id);
					obs::record_op_outcome(OpKind::ProfileLookup, OpOutcome::Discarded);

					return;
				},
			};

			match result {
				Ok(Some(profile)) => {
					self.metrics.record_applied();
					obs::record_op_outcome(OpKind::ProfileLookup, OpOutcome::Success);

					let dispatch = self.transition(
						&mut state,
						Session::Authenticated { identity, profile: ProfileState::Loaded(profile) },
					);

					(dispatch, false)
				},
				Ok(None) => {
					self.metrics.record_missing();
					obs::record_op_outcome(OpKind::ProfileLookup, OpOutcome::Success);

					if recheck {
						state.in_flight = Some(id.clone());
					}

					(false, recheck)
				},
				Err(e) => {
					self.metrics.record_failed();
					obs::profile_lookup_failed(&id, &e);
					obs::record_op_outcome(OpKind::ProfileLookup, OpOutcome::Failure);

					(false, false)
				},
			}
		};

		if dispatch {
			self.listeners.drain();
		}
		if recheck {
			self.issue_lookup(id);
		}
	}

	/// Stores `next` and queues it for listeners unless nothing changed.
	fn transition(&self, state: &mut ResolverState, next: Session) -> bool {
		if state.session == next {
			return false;
		}

		state.session = next.clone();

		self.listeners.enqueue(next)
	}

	/// Requests a fresh lookup if `id` is still current and its profile is still pending.
	///
	/// While a lookup for `id` is in flight no second one is issued; the running lookup is
	/// re-issued once instead if it finds no profile.
	fn refresh_if_pending(self: &Arc<Self>, id: &UserId) -> bool {
		let (pending, issue) = {
			let mut state = self.state.write();
			let pending = matches!(
				&state.session,
				Session::Authenticated { identity, profile: ProfileState::Pending }
					if &identity.id == id
			);
			let issue = if !pending {
				false
			} else if state.in_flight.as_ref() == Some(id) {
				state.recheck_on_miss = true;

				false
			} else {
				state.in_flight = Some(id.clone());
				state.recheck_on_miss = false;

				true
			};

			(pending, issue)
		};

		if issue {
			self.issue_lookup(id.clone());
		}

		pending
	}
}

/// Owns the application's single [`Session`] and the auth operations that drive it.
///
/// Create one at application start with [`SessionResolver::start`], pass clones to the
/// screens that need it, and call [`SessionResolver::shutdown`] at exit. Dropping the last
/// clone also unsubscribes from the provider.
#[derive(Clone)]
pub struct SessionResolver {
	inner: Arc<ResolverInner>,
}
impl SessionResolver {
	/// Subscribes to `identity` and begins resolving the session.
	///
	/// Providers deliver their current state on subscription, so the session may already
	/// have left `Unknown` when this returns.
	pub fn start(
		identity: Arc<dyn IdentityProvider>,
		profiles: Arc<dyn ProfileStore>,
		spawner: Arc<dyn Spawner>,
	) -> Self {
		let inner = Arc::new(ResolverInner {
			identity,
			profiles,
			spawner,
			state: RwLock::new(ResolverState::default()),
			listeners: ListenerRegistry::default(),
			auth_guard: AsyncMutex::new(()),
			subscription: Mutex::new(None),
			metrics: ResolverMetrics::default(),
		});
		let weak = Arc::downgrade(&inner);
		let subscription = inner.identity.subscribe(Arc::new(move |event| {
			if let Some(inner) = weak.upgrade() {
				inner.on_identity_change(event);
			}
		}));

		*inner.subscription.lock() = Some(subscription);

		Self { inner }
	}

	/// Unsubscribes from the provider. The last session stays readable.
	pub fn shutdown(&self) {
		let subscription = self.inner.subscription.lock().take();

		if let Some(subscription) = subscription {
			subscription.cancel();
		}
	}

	/// Returns `true` until [`shutdown`](Self::shutdown) is called.
	pub fn is_running(&self) -> bool {
		self.inner.subscription.lock().is_some()
	}

	/// Snapshot of the latest session.
	pub fn current_session(&self) -> Session {
		self.inner.state.read().session.clone()
	}

	/// Access decisions for the latest session.
	pub fn access(&self) -> AccessDecision {
		AccessDecision::from_session(&self.inner.state.read().session)
	}

	/// Registers `listener` for every subsequent session change.
	///
	/// The listener is not called with the current value; read
	/// [`current_session`](Self::current_session) for that.
	pub fn subscribe(
		&self,
		listener: impl 'static + Fn(&Session) + Send + Sync,
	) -> SessionSubscription {
		self.inner.listeners.register(Arc::new(listener))
	}

	/// Number of registered session listeners.
	pub fn listener_count(&self) -> usize {
		self.inner.listeners.len()
	}

	/// Profile lookup counters.
	pub fn metrics(&self) -> &ResolverMetrics {
		&self.inner.metrics
	}

	/// Re-fetches the current identity's profile when it is still pending.
	///
	/// Returns `false` when there is no authenticated identity or the profile already loaded.
	pub fn refresh_profile(&self) -> bool {
		let id = match self.inner.state.read().session.identity() {
			Some(identity) => identity.id.clone(),
			None => return false,
		};

		self.inner.refresh_if_pending(&id)
	}

	/// Signs in with email + password.
	///
	/// Only the provider call happens here; the session changes through the identity stream.
	pub async fn sign_in(&self, email: &str, password: &Password) -> Result<(), AuthError> {
		const KIND: OpKind = OpKind::SignIn;

		let span = OpSpan::new(KIND, "sign_in");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let email = required("email", email)?;

				if password.is_empty() {
					return Err(AuthError::MissingField { field: "password" });
				}

				let _serial = self.inner.auth_guard.lock().await;

				self.inner.identity.sign_in_with_password(email, password).await.map(|_| ())
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Creates an account and its non-privileged profile.
	///
	/// Provider failures return [`AuthError`]. A profile write failure after the account
	/// exists is reported as [`SignUpWarning::ProfileNotCreated`] instead of an error.
	pub async fn sign_up(
		&self,
		email: &str,
		password: &Password,
		display_name: &str,
	) -> Result<SignUpOutcome, AuthError> {
		const KIND: OpKind = OpKind::SignUp;

		let span = OpSpan::new(KIND, "sign_up");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let display_name = required("name", display_name)?;
				let email = required("email", email)?;

				if password.is_empty() {
					return Err(AuthError::MissingField { field: "password" });
				}

				let _serial = self.inner.auth_guard.lock().await;
				let identity = self.inner.identity.create_account(email, password).await?;
				let profile = Profile::new(display_name, identity.email.clone());
				let warning = match self.inner.profiles.set(&identity.id, profile).await {
					Ok(()) => {
						self.inner.refresh_if_pending(&identity.id);

						None
					},
					Err(error) => {
						obs::profile_write_failed(&identity.id, &error);

						Some(SignUpWarning::ProfileNotCreated { error })
					},
				};

				Ok(SignUpOutcome { identity, warning })
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Signs out; a no-op when the session is already anonymous.
	pub async fn sign_out(&self) -> Result<(), AuthError> {
		const KIND: OpKind = OpKind::SignOut;

		if self.current_session().is_anonymous() {
			return Ok(());
		}

		let span = OpSpan::new(KIND, "sign_out");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _serial = self.inner.auth_guard.lock().await;

				if self.current_session().is_anonymous() {
					return Ok(());
				}

				self.inner.identity.sign_out().await
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}
impl Debug for SessionResolver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionResolver")
			.field("session", &self.current_session())
			.field("listeners", &self.listener_count())
			.field("running", &self.is_running())
			.finish()
	}
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AuthError> {
	let trimmed = value.trim();

	if trimmed.is_empty() { Err(AuthError::MissingField { field }) } else { Ok(trimmed) }
}
