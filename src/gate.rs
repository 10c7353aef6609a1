//! Access gate: pure, total derivation of screen decisions from a [`Session`].
//!
//! Every privileged decision keys off [`AccessDecision::is_privileged`], which only turns
//! true for an authenticated session whose profile has loaded with the admin flag set.
//! `Unknown` and `Pending` both fail closed. Login prompts key off `Anonymous` alone so a
//! cold start (`Unknown`) renders a neutral loading state instead of flashing the prompt.

// self
use crate::{
	_prelude::*,
	session::{ProfileState, Session},
};

/// Reporter tag written on reports submitted without an identity email.
pub const ANONYMOUS_REPORTER: &str = "anonim";

/// Logical collection a submitted report lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTarget {
	/// Escalated alerts, written directly by administrators.
	Alerts,
	/// Citizen reports awaiting review.
	Laporan,
}
impl ReportTarget {
	/// Returns the stored collection name.
	pub const fn as_str(self) -> &'static str {
		match self {
			ReportTarget::Alerts => "alerts",
			ReportTarget::Laporan => "laporan",
		}
	}
}
impl Display for ReportTarget {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Which variant the feed slot renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedView {
	/// Incoming citizen reports with escalation controls.
	Admin,
	/// Static emergency phone directory.
	EmergencyContacts,
}
impl FeedView {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			FeedView::Admin => "admin",
			FeedView::EmergencyContacts => "emergency-contacts",
		}
	}
}

/// What an authenticated-only screen should render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateView {
	/// Session still resolving; show a neutral spinner.
	Loading,
	/// No identity; show the login affordance.
	LoginPrompt,
	/// Identity present; show the action's primary UI.
	Content,
}

/// Decision set derived from a single session snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessDecision {
	/// Whether the report form may be submitted.
	pub can_submit_report: bool,
	/// Whether administrator behavior is unlocked.
	pub is_privileged: bool,
	/// Collection that a submitted report is written to.
	pub report_target: ReportTarget,
	/// Feed slot variant.
	pub feed_view: FeedView,
	/// Whether authenticated-only screens must show a login affordance.
	pub requires_login_prompt: bool,
	/// Tri-state rendering decision for authenticated-only screens.
	pub gate_view: GateView,
}
impl AccessDecision {
	/// Derives the decision set for `session`.
	pub fn from_session(session: &Session) -> Self {
		let (authenticated, is_privileged, gate_view) = match session {
			Session::Unknown => (false, false, GateView::Loading),
			Session::Anonymous => (false, false, GateView::LoginPrompt),
			Session::Authenticated { profile: ProfileState::Pending, .. } =>
				(true, false, GateView::Content),
			Session::Authenticated { profile: ProfileState::Loaded(profile), .. } =>
				(true, profile.is_admin(), GateView::Content),
		};
		let (report_target, feed_view) = if is_privileged {
			(ReportTarget::Alerts, FeedView::Admin)
		} else {
			(ReportTarget::Laporan, FeedView::EmergencyContacts)
		};

		Self {
			can_submit_report: authenticated,
			is_privileged,
			report_target,
			feed_view,
			requires_login_prompt: matches!(session, Session::Anonymous),
			gate_view,
		}
	}
}
impl From<&Session> for AccessDecision {
	fn from(session: &Session) -> Self {
		Self::from_session(session)
	}
}

/// Tag identifying who submitted a report: the identity's email, or [`ANONYMOUS_REPORTER`].
pub fn reporter_tag(session: &Session) -> String {
	match session.identity() {
		Some(identity) if !identity.email.is_empty() => identity.email.clone(),
		_ => ANONYMOUS_REPORTER.to_owned(),
	}
}
