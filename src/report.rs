//! Incident reports: submission, the admin review queue, and escalation to alerts.
//!
//! Where a report lands is decided by the access gate, not by the caller: privileged
//! sessions write straight into `alerts`, everyone else into `laporan`. Reviewing and
//! escalating require a privileged session.

// self
use crate::{
	_prelude::*,
	auth::ReportId,
	gate::{self, AccessDecision, ReportTarget},
	obs::{self, OpKind, OpOutcome, OpSpan},
	session::Session,
	store::ReportStore,
};

/// Longest accepted report body, in characters.
pub const MAX_REPORT_CHARS: usize = 2_000;

/// Report document as stored in either collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
	/// Document identifier.
	pub id: ReportId,
	/// Free-form description.
	#[serde(rename = "teks")]
	pub text: String,
	/// Submission instant.
	#[serde(rename = "waktu")]
	pub submitted_at: OffsetDateTime,
	/// Reporter tag (email or the anonymous sentinel).
	#[serde(rename = "pelapor")]
	pub reporter: String,
}
impl Report {
	/// Materializes a stored report from a draft and its generated id.
	pub fn from_draft(id: ReportId, draft: ReportDraft) -> Self {
		Self { id, text: draft.text, submitted_at: draft.submitted_at, reporter: draft.reporter }
	}
}

/// Report contents before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDraft {
	/// Free-form description.
	#[serde(rename = "teks")]
	pub text: String,
	/// Submission instant.
	#[serde(rename = "waktu")]
	pub submitted_at: OffsetDateTime,
	/// Reporter tag.
	#[serde(rename = "pelapor")]
	pub reporter: String,
}

/// Where a submitted report was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
	/// Generated document id.
	pub id: ReportId,
	/// Collection the report landed in.
	pub target: ReportTarget,
}
impl Submission {
	/// Returns `true` when the submission went out as an alert.
	pub fn is_alert(&self) -> bool {
		matches!(self.target, ReportTarget::Alerts)
	}
}

/// Session-aware front for a [`ReportStore`].
#[derive(Clone)]
pub struct ReportDesk {
	store: Arc<dyn ReportStore>,
}
impl ReportDesk {
	/// Wraps the provided store.
	pub fn new(store: Arc<dyn ReportStore>) -> Self {
		Self { store }
	}

	/// Submits `text` on behalf of `session`.
	pub async fn submit(&self, session: &Session, text: &str) -> Result<Submission> {
		const KIND: OpKind = OpKind::SubmitReport;

		let span = OpSpan::new(KIND, "submit");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let decision = AccessDecision::from_session(session);

				if !decision.can_submit_report {
					return Err(Error::LoginRequired);
				}

				let text = validate_text(text)?;
				let draft = ReportDraft {
					text,
					submitted_at: OffsetDateTime::now_utc(),
					reporter: gate::reporter_tag(session),
				};
				let id = self.store.add(decision.report_target, draft).await?;

				Ok(Submission { id, target: decision.report_target })
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Citizen reports awaiting review, newest first. Privileged sessions only.
	pub async fn incoming(&self, session: &Session) -> Result<Vec<Report>> {
		require_privileged(session, "review")?;

		Ok(self.store.list(ReportTarget::Laporan).await?)
	}

	/// Promotes a citizen report to an alert and removes the original.
	///
	/// The alert keeps the report's text and reporter and is stamped with the escalation
	/// time. Returns the new alert id.
	pub async fn escalate(&self, session: &Session, id: &ReportId) -> Result<ReportId> {
		const KIND: OpKind = OpKind::EscalateReport;

		let span = OpSpan::new(KIND, "escalate");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				require_privileged(session, "escalate")?;

				let report = self
					.store
					.get(ReportTarget::Laporan, id)
					.await?
					.ok_or_else(|| Error::ReportNotFound { id: id.clone() })?;
				let alert = ReportDraft {
					text: report.text,
					submitted_at: OffsetDateTime::now_utc(),
					reporter: report.reporter,
				};
				let alert_id = self.store.add(ReportTarget::Alerts, alert).await?;

				self.store.remove(ReportTarget::Laporan, id).await?;

				Ok(alert_id)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Alerts strictly newer than `instant`, oldest first.
	pub async fn alerts_since(&self, instant: OffsetDateTime) -> Result<Vec<Report>> {
		let mut alerts: Vec<_> = self
			.store
			.list(ReportTarget::Alerts)
			.await?
			.into_iter()
			.filter(|alert| alert.submitted_at > instant)
			.collect();

		alerts.reverse();

		Ok(alerts)
	}
}
impl Debug for ReportDesk {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReportDesk(..)")
	}
}

fn require_privileged(session: &Session, action: &'static str) -> Result<()> {
	if AccessDecision::from_session(session).is_privileged {
		Ok(())
	} else {
		Err(Error::Forbidden { action })
	}
}

fn validate_text(text: &str) -> Result<String> {
	let trimmed = text.trim();

	if trimmed.is_empty() {
		return Err(Error::InvalidReport { reason: "report text cannot be empty".into() });
	}
	if trimmed.chars().count() > MAX_REPORT_CHARS {
		return Err(Error::InvalidReport {
			reason: format!("report text exceeds {MAX_REPORT_CHARS} characters"),
		});
	}

	Ok(trimmed.to_owned())
}
