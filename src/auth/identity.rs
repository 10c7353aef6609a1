//! Authenticated principal issued by the identity provider.

// self
use crate::{_prelude::*, auth::UserId};

/// A successfully authenticated principal.
///
/// Identities are created when the provider confirms a sign-in or restores a persisted
/// session, and they disappear on sign-out. Only the session resolver holds the current one;
/// screens observe clones through session snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
	/// Stable provider-assigned identifier; also keys the profile document.
	pub id: UserId,
	/// Email the principal authenticated with.
	pub email: String,
}
impl Identity {
	/// Creates an identity for the provided id + email pair.
	pub fn new(id: UserId, email: impl Into<String>) -> Self {
		Self { id, email: email.into() }
	}
}
impl Display for Identity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} <{}>", self.id, self.email)
	}
}
