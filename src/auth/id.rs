//! Strongly typed document identifiers for users and reports.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (user, report).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (user, report).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (user, report).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { UserId, "Stable identifier the identity provider assigns to a user.", "User" }
def_id! { ReportId, "Document identifier of a report or alert.", "Report" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(UserId::new(" uid-123").is_err(), "Leading whitespace must be rejected.");
		assert!(UserId::new("uid-123 ").is_err(), "Trailing whitespace must be rejected.");

		let user = UserId::new("uid-123").expect("User fixture should be considered valid.");

		assert_eq!(user.as_ref(), "uid-123");
		assert!(ReportId::new("").is_err());
		assert!(ReportId::new("with space").is_err());
	}

	#[test]
	fn deserialization_enforces_validation() {
		let user: UserId =
			serde_json::from_str("\"u1\"").expect("User id should deserialize successfully.");

		assert_eq!(user.as_ref(), "u1");
		assert!(serde_json::from_str::<UserId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<UserId>("\"\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		ReportId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);
		let err = ReportId::new(&too_long).expect_err("Overlong id must be rejected.");

		assert_eq!(err, IdentifierError::TooLong { kind: "Report", max: IDENTIFIER_MAX_LEN });
	}

	#[test]
	fn borrow_supports_str_lookup() {
		let map: HashMap<UserId, u8> = HashMap::from_iter([(
			UserId::new("u1").expect("User used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("u1"), Some(&7));
		assert_eq!(format!("{:?}", UserId::new("u1").expect("Valid id.")), "User(u1)");
	}
}
