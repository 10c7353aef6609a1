//! Application-level user profile stored alongside each identity.

// self
use crate::_prelude::*;

/// Per-user profile document, keyed by the owning identity's id.
///
/// Field names follow the stored document layout (`nama`, `email`, `isAdmin`,
/// `createdAt`). The admin flag has no public setter: it is a trust-boundary field flipped
/// only by a privileged backend process, so client code can read it but never grant it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	/// Display name entered at registration.
	#[serde(rename = "nama")]
	pub display_name: String,
	/// Contact email, usually the identity's email.
	pub email: String,
	#[serde(rename = "isAdmin", default)]
	is_admin: bool,
	/// Creation instant, set once when the profile is written.
	#[serde(rename = "createdAt")]
	pub created_at: OffsetDateTime,
}
impl Profile {
	/// Creates a non-privileged profile stamped with the current clock.
	pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
		Self::with_created_at(display_name, email, OffsetDateTime::now_utc())
	}

	/// Creates a non-privileged profile with an explicit creation instant.
	pub fn with_created_at(
		display_name: impl Into<String>,
		email: impl Into<String>,
		created_at: OffsetDateTime,
	) -> Self {
		Self { display_name: display_name.into(), email: email.into(), is_admin: false, created_at }
	}

	/// Returns `true` if the backend has granted administrator rights.
	pub fn is_admin(&self) -> bool {
		self.is_admin
	}

	pub(crate) fn set_admin(&mut self, is_admin: bool) {
		self.is_admin = is_admin;
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn new_profiles_are_never_admin() {
		let profile = Profile::new("Siti", "siti@example.com");

		assert!(!profile.is_admin());
	}

	#[test]
	fn document_layout_uses_stored_field_names() {
		let created_at = macros::datetime!(2025-01-01 00:00 UTC);
		let profile = Profile::with_created_at("Budi", "budi@example.com", created_at);
		let value = serde_json::to_value(&profile).expect("Profile should serialize to JSON.");

		assert_eq!(value["nama"], "Budi");
		assert_eq!(value["isAdmin"], false);
		assert!(value.get("createdAt").is_some());
	}

	#[test]
	fn missing_admin_flag_defaults_to_false() {
		let created_at = macros::datetime!(2025-01-01 00:00 UTC);
		let profile = Profile::with_created_at("Budi", "budi@example.com", created_at);
		let mut value = serde_json::to_value(&profile).expect("Profile should serialize to JSON.");

		value.as_object_mut().expect("Profile JSON should be an object.").remove("isAdmin");

		let decoded: Profile =
			serde_json::from_value(value).expect("Profile without isAdmin should deserialize.");

		assert!(!decoded.is_admin());
	}

	#[test]
	fn stored_admin_flag_is_honored() {
		let created_at = macros::datetime!(2025-01-01 00:00 UTC);
		let mut profile = Profile::with_created_at("Admin", "admin@example.com", created_at);

		profile.set_admin(true);

		let json = serde_json::to_string(&profile).expect("Profile should serialize.");
		let decoded: Profile = serde_json::from_str(&json).expect("Profile should deserialize.");

		assert!(decoded.is_admin());
	}
}
