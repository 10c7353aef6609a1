//! Password wrapper that keeps credentials out of logs.

// self
use crate::_prelude::*;

/// Redacted password wrapper; callers must never log the exposed value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);
impl Password {
	/// Wraps a new password string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner password value.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the password is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Character count, used by strength checks.
	pub fn char_len(&self) -> usize {
		self.0.chars().count()
	}
}
impl From<&str> for Password {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl Debug for Password {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Password").field(&"<redacted>").finish()
	}
}
impl Display for Password {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn password_formatters_redact() {
		let password = Password::new("hunter22");

		assert_eq!(format!("{password:?}"), "Password(\"<redacted>\")");
		assert_eq!(format!("{password}"), "<redacted>");
		assert_eq!(password.expose(), "hunter22");
	}
}
