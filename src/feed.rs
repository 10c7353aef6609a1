//! Feed slot content: the admin review queue or the emergency phone directory.

// self
use crate::{
	_prelude::*,
	gate::{AccessDecision, FeedView},
	report::{Report, ReportDesk},
	session::Session,
};

/// Entry in the emergency phone directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
	/// Service name.
	pub name: &'static str,
	/// Dialable number.
	pub number: &'static str,
}

/// Emergency services shown to every non-privileged session.
pub const EMERGENCY_CONTACTS: &[EmergencyContact] = &[
	EmergencyContact { name: "Nomor Darurat Terpadu", number: "112" },
	EmergencyContact { name: "Ambulans", number: "118" },
	EmergencyContact { name: "Pemadam Kebakaran", number: "113" },
	EmergencyContact { name: "Polisi", number: "110" },
	EmergencyContact { name: "SAR / Basarnas", number: "115" },
	EmergencyContact { name: "BPBD Kota Bandung", number: "0227307761" },
];

/// Rendered feed slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedContent {
	/// Incoming reports for administrators, newest first.
	Reports(Vec<Report>),
	/// Static emergency directory.
	EmergencyContacts(&'static [EmergencyContact]),
}
impl FeedContent {
	/// Loads the variant selected by `decision`.
	///
	/// The directory never touches storage, so non-privileged sessions always succeed.
	pub async fn load(
		decision: &AccessDecision,
		desk: &ReportDesk,
		session: &Session,
	) -> Result<Self> {
		match decision.feed_view {
			FeedView::Admin => Ok(Self::Reports(desk.incoming(session).await?)),
			FeedView::EmergencyContacts => Ok(Self::EmergencyContacts(EMERGENCY_CONTACTS)),
		}
	}

	/// Returns the view this content renders.
	pub fn view(&self) -> FeedView {
		match self {
			Self::Reports(_) => FeedView::Admin,
			Self::EmergencyContacts(_) => FeedView::EmergencyContacts,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::MemoryStore;

	#[test]
	fn directory_lists_national_numbers_first() {
		assert_eq!(EMERGENCY_CONTACTS.len(), 6);
		assert_eq!(EMERGENCY_CONTACTS[0].number, "112");
		assert_eq!(EMERGENCY_CONTACTS[5].name, "BPBD Kota Bandung");
	}

	#[tokio::test]
	async fn non_privileged_sessions_get_the_directory() {
		let desk = ReportDesk::new(Arc::new(MemoryStore::default()));

		for session in [Session::Unknown, Session::Anonymous] {
			let decision = AccessDecision::from_session(&session);
			let content = FeedContent::load(&decision, &desk, &session)
				.await
				.expect("Directory should always load.");

			assert_eq!(content, FeedContent::EmergencyContacts(EMERGENCY_CONTACTS));
			assert_eq!(content.view(), FeedView::EmergencyContacts);
		}
	}
}
