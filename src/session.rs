//! Reactive session state and the resolver that maintains it.
//!
//! A [`Session`] is `Unknown` until the identity provider's first event arrives, after which
//! it is always either `Anonymous` or `Authenticated`; it never returns to `Unknown`.
//! Screens read snapshots through [`SessionResolver::current_session`] or register with
//! [`SessionResolver::subscribe`], and feed them to [`crate::gate::AccessDecision`].

pub mod listener;
pub mod metrics;
pub mod resolver;

pub use listener::*;
pub use metrics::ResolverMetrics;
pub use resolver::*;

// self
use crate::{
	_prelude::*,
	auth::{Identity, Profile},
};

/// Profile half of an authenticated session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileState {
	/// Lookup in flight, failed, or the document does not exist yet.
	Pending,
	/// Profile fetched for the current identity.
	Loaded(Profile),
}
impl ProfileState {
	/// Loaded profile, if any.
	pub fn profile(&self) -> Option<&Profile> {
		match self {
			ProfileState::Pending => None,
			ProfileState::Loaded(profile) => Some(profile),
		}
	}
}

/// The single reactive value observed by the application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
	/// No verdict from the identity provider yet. Never equivalent to `Anonymous`.
	#[default]
	Unknown,
	/// No signed-in identity.
	Anonymous,
	/// Signed-in identity; the profile may still be pending.
	Authenticated {
		/// Current identity.
		identity: Identity,
		/// Profile resolution state for `identity`.
		profile: ProfileState,
	},
}
impl Session {
	/// Authenticated session whose profile has not loaded yet.
	pub fn pending(identity: Identity) -> Self {
		Self::Authenticated { identity, profile: ProfileState::Pending }
	}

	/// Current identity, if any.
	pub fn identity(&self) -> Option<&Identity> {
		match self {
			Session::Authenticated { identity, .. } => Some(identity),
			_ => None,
		}
	}

	/// Loaded profile, if any.
	pub fn profile(&self) -> Option<&Profile> {
		match self {
			Session::Authenticated { profile, .. } => profile.profile(),
			_ => None,
		}
	}

	/// Returns `true` while the first provider event is outstanding.
	pub fn is_unknown(&self) -> bool {
		matches!(self, Session::Unknown)
	}

	/// Returns `true` when no identity is signed in.
	pub fn is_anonymous(&self) -> bool {
		matches!(self, Session::Anonymous)
	}

	/// Returns `true` when authenticated and the profile is still pending.
	pub fn is_profile_pending(&self) -> bool {
		matches!(self, Session::Authenticated { profile: ProfileState::Pending, .. })
	}
}
