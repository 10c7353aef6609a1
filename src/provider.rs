//! Identity provider contract and the in-memory implementation.
//!
//! The provider authenticates email/password credentials and pushes identity transitions
//! to subscribers. Each event fully supersedes the previous one: `Some(identity)` when a
//! principal is signed in or restored, `None` on sign-out or invalidation. Providers deliver
//! the current state to a new subscriber as its first event.

pub mod memory;

pub use memory::MemoryIdentityProvider;

// self
use crate::{
	_prelude::*,
	auth::{Identity, Password},
	error::AuthError,
};

/// Boxed future returned by provider calls.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AuthError>> + 'a + Send>>;

/// Callback receiving identity transitions, in provider emission order.
pub type IdentityListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Authentication backend consumed by the session resolver.
pub trait IdentityProvider
where
	Self: Send + Sync,
{
	/// Registers `listener`; dropping or cancelling the returned handle unsubscribes it.
	fn subscribe(&self, listener: IdentityListener) -> IdentitySubscription;

	/// Authenticates an existing account.
	fn sign_in_with_password<'a>(
		&'a self,
		email: &'a str,
		password: &'a Password,
	) -> ProviderFuture<'a, Identity>;

	/// Creates an account and signs it in.
	fn create_account<'a>(
		&'a self,
		email: &'a str,
		password: &'a Password,
	) -> ProviderFuture<'a, Identity>;

	/// Ends the current provider session.
	fn sign_out(&self) -> ProviderFuture<'_, ()>;
}

/// Handle for a provider subscription; unsubscribes on [`cancel`](Self::cancel) or drop.
pub struct IdentitySubscription {
	cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}
impl IdentitySubscription {
	/// Wraps the provider-specific teardown closure.
	pub fn new(cancel: impl 'static + FnOnce() + Send + Sync) -> Self {
		Self { cancel: Some(Box::new(cancel)) }
	}

	/// Unsubscribes immediately.
	pub fn cancel(mut self) {
		self.run_cancel();
	}

	fn run_cancel(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}
impl Drop for IdentitySubscription {
	fn drop(&mut self) {
		self.run_cancel();
	}
}
impl Debug for IdentitySubscription {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IdentitySubscription").field("active", &self.cancel.is_some()).finish()
	}
}
