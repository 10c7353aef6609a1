//! Thread-safe in-memory document store for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{Profile, ReportId, UserId},
	gate::ReportTarget,
	report::{Report, ReportDraft},
	store::{Documents, ProfileStore, ReportStore, StoreFuture},
};

type DocumentMap = Arc<RwLock<Documents>>;

/// Keeps profiles and report collections in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(DocumentMap);
impl MemoryStore {
	/// Flips the admin flag on an existing profile.
	///
	/// Stands in for the privileged backend process; client-facing code never calls this.
	/// Returns `false` when no profile exists for `id`.
	pub fn promote_admin(&self, id: &UserId) -> bool {
		self.0.write().promote_admin(id)
	}

	/// Number of stored profiles.
	pub fn profile_count(&self) -> usize {
		self.0.read().profile_count()
	}
}
impl ProfileStore for MemoryStore {
	fn get<'a>(&'a self, id: &'a UserId) -> StoreFuture<'a, Option<Profile>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().profile(id)) })
	}

	fn set<'a>(&'a self, id: &'a UserId, profile: Profile) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().set_profile(id.to_owned(), profile);

			Ok(())
		})
	}
}
impl ReportStore for MemoryStore {
	fn add(&self, target: ReportTarget, draft: ReportDraft) -> StoreFuture<'_, ReportId> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().add_report(target, draft)) })
	}

	fn get<'a>(
		&'a self,
		target: ReportTarget,
		id: &'a ReportId,
	) -> StoreFuture<'a, Option<Report>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().report(target, id)) })
	}

	fn list(&self, target: ReportTarget) -> StoreFuture<'_, Vec<Report>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().reports(target)) })
	}

	fn remove<'a>(&'a self, target: ReportTarget, id: &'a ReportId) -> StoreFuture<'a, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.write().remove_report(target, id)) })
	}
}
