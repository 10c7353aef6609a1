//! Storage contracts and built-in backends for profile and report documents.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::{Profile, ReportId, UserId},
	gate::ReportTarget,
	report::{Report, ReportDraft},
};

const DOCUMENT_ID_LEN: usize = 20;

/// Boxed future returned by every store operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key-value-by-id profile documents, one per user.
pub trait ProfileStore
where
	Self: Send + Sync,
{
	/// Fetches the profile for `id`; `Ok(None)` means the document does not exist yet.
	fn get<'a>(&'a self, id: &'a UserId) -> StoreFuture<'a, Option<Profile>>;

	/// Creates or replaces the profile for `id`.
	fn set<'a>(&'a self, id: &'a UserId, profile: Profile) -> StoreFuture<'a, ()>;
}

/// Report collections (`laporan` for citizen reports, `alerts` for escalated alerts).
pub trait ReportStore
where
	Self: Send + Sync,
{
	/// Appends a report to `target`, returning the generated document id.
	fn add(&self, target: ReportTarget, draft: ReportDraft) -> StoreFuture<'_, ReportId>;

	/// Fetches a single report from `target`.
	fn get<'a>(&'a self, target: ReportTarget, id: &'a ReportId) -> StoreFuture<'a, Option<Report>>;

	/// Lists every report in `target`, newest first.
	fn list(&self, target: ReportTarget) -> StoreFuture<'_, Vec<Report>>;

	/// Deletes a report, returning `true` when a document was removed.
	fn remove<'a>(&'a self, target: ReportTarget, id: &'a ReportId) -> StoreFuture<'a, bool>;
}

/// Error type produced by [`ProfileStore`] and [`ReportStore`] implementations.
///
/// During session resolution these are recovered locally: the session stays pending and
/// the failure is logged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Stored document does not match the expected shape.
	#[error("Malformed document `{id}`: {message}.")]
	Malformed {
		/// Document identifier.
		id: String,
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure (unreachable, IO, permissions).
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// In-process document set shared by the memory and file backends.
#[derive(Clone, Debug, Default)]
pub(crate) struct Documents {
	profiles: HashMap<UserId, Profile>,
	laporan: Vec<Report>,
	alerts: Vec<Report>,
}
impl Documents {
	pub(crate) fn profile(&self, id: &UserId) -> Option<Profile> {
		self.profiles.get(id).cloned()
	}

	pub(crate) fn profile_count(&self) -> usize {
		self.profiles.len()
	}

	pub(crate) fn set_profile(&mut self, id: UserId, profile: Profile) {
		self.profiles.insert(id, profile);
	}

	pub(crate) fn promote_admin(&mut self, id: &UserId) -> bool {
		match self.profiles.get_mut(id) {
			Some(profile) => {
				profile.set_admin(true);

				true
			},
			None => false,
		}
	}

	pub(crate) fn add_report(&mut self, target: ReportTarget, draft: ReportDraft) -> ReportId {
		let id = generate_document_id();

		self.collection_mut(target).push(Report::from_draft(id.clone(), draft));

		id
	}

	pub(crate) fn report(&self, target: ReportTarget, id: &ReportId) -> Option<Report> {
		self.collection(target).iter().find(|report| &report.id == id).cloned()
	}

	pub(crate) fn reports(&self, target: ReportTarget) -> Vec<Report> {
		let mut reports = self.collection(target).to_vec();

		reports.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

		reports
	}

	pub(crate) fn remove_report(&mut self, target: ReportTarget, id: &ReportId) -> bool {
		let collection = self.collection_mut(target);
		let before = collection.len();

		collection.retain(|report| &report.id != id);

		collection.len() != before
	}

	pub(crate) fn into_snapshot(self) -> DocumentSnapshot {
		let mut profiles: Vec<_> = self.profiles.into_iter().collect();

		profiles.sort_by(|(a, _), (b, _)| a.cmp(b));

		DocumentSnapshot { profiles, laporan: self.laporan, alerts: self.alerts }
	}

	fn collection(&self, target: ReportTarget) -> &Vec<Report> {
		match target {
			ReportTarget::Laporan => &self.laporan,
			ReportTarget::Alerts => &self.alerts,
		}
	}

	fn collection_mut(&mut self, target: ReportTarget) -> &mut Vec<Report> {
		match target {
			ReportTarget::Laporan => &mut self.laporan,
			ReportTarget::Alerts => &mut self.alerts,
		}
	}
}
impl From<DocumentSnapshot> for Documents {
	fn from(snapshot: DocumentSnapshot) -> Self {
		Self {
			profiles: snapshot.profiles.into_iter().collect(),
			laporan: snapshot.laporan,
			alerts: snapshot.alerts,
		}
	}
}

/// Serialized layout of [`Documents`] used by the file backend.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct DocumentSnapshot {
	#[serde(default)]
	profiles: Vec<(UserId, Profile)>,
	#[serde(default)]
	laporan: Vec<Report>,
	#[serde(default)]
	alerts: Vec<Report>,
}

pub(crate) fn generate_document_id() -> ReportId {
	let raw: String =
		rand::rng().sample_iter(Alphanumeric).take(DOCUMENT_ID_LEN).map(char::from).collect();

	ReportId::new(raw).expect("Alphanumeric document ids are always valid identifiers.")
}
