//! File-backed document store for single-device deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{Profile, ReportId, UserId},
	gate::ReportTarget,
	report::{Report, ReportDraft},
	store::{DocumentSnapshot, Documents, ProfileStore, ReportStore, StoreError, StoreFuture},
};

/// Persists profiles and report collections to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Documents>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let documents = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(documents)) })
	}

	/// Flips the admin flag on an existing profile and persists the change.
	///
	/// Operator tooling only; mirrors the privileged backend process.
	pub fn promote_admin(&self, id: &UserId) -> Result<bool, StoreError> {
		self.commit(|documents| {
			let promoted = documents.promote_admin(id);

			(promoted, promoted)
		})
	}

	/// Location of the backing JSON file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Documents, StoreError> {
		if !path.exists() {
			return Ok(Documents::default());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(Documents::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let snapshot: DocumentSnapshot =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(snapshot.into())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	/// Applies `apply` to a copy of the documents and swaps it in only once it is on disk.
	///
	/// `apply` returns its value and whether anything changed; unchanged copies are not written.
	fn commit<T>(
		&self,
		apply: impl FnOnce(&mut Documents) -> (T, bool),
	) -> Result<T, StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();
		let (value, changed) = apply(&mut next);

		if changed {
			self.persist_locked(&next)?;

			*guard = next;
		}

		Ok(value)
	}

	fn persist_locked(&self, contents: &Documents) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let snapshot = contents.clone().into_snapshot();
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl ProfileStore for FileStore {
	fn get<'a>(&'a self, id: &'a UserId) -> StoreFuture<'a, Option<Profile>> {
		Box::pin(async move { Ok(self.inner.read().profile(id)) })
	}

	fn set<'a>(&'a self, id: &'a UserId, profile: Profile) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.commit(|documents| (documents.set_profile(id.to_owned(), profile), true))
		})
	}
}
impl ReportStore for FileStore {
	fn add(&self, target: ReportTarget, draft: ReportDraft) -> StoreFuture<'_, ReportId> {
		Box::pin(async move {
			self.commit(|documents| (documents.add_report(target, draft), true))
		})
	}

	fn get<'a>(
		&'a self,
		target: ReportTarget,
		id: &'a ReportId,
	) -> StoreFuture<'a, Option<Report>> {
		Box::pin(async move { Ok(self.inner.read().report(target, id)) })
	}

	fn list(&self, target: ReportTarget) -> StoreFuture<'_, Vec<Report>> {
		Box::pin(async move { Ok(self.inner.read().reports(target)) })
	}

	fn remove<'a>(&'a self, target: ReportTarget, id: &'a ReportId) -> StoreFuture<'a, bool> {
		Box::pin(async move {
			self.commit(|documents| {
				let removed = documents.remove_report(target, id);

				(removed, removed)
			})
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"siaga_file_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn profiles_and_reports_survive_reopen() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let user = UserId::new("u-file").expect("Failed to build user fixture.");
		let draft = ReportDraft {
			text: "Banjir di Jl. Pasteur".into(),
			submitted_at: OffsetDateTime::now_utc(),
			reporter: "warga@example.com".into(),
		};

		rt.block_on(ProfileStore::set(&store, &user, Profile::new("Warga", "warga@example.com")))
			.expect("Failed to save profile fixture to file store.");

		let report_id = rt
			.block_on(ReportStore::add(&store, ReportTarget::Laporan, draft))
			.expect("Failed to save report fixture to file store.");

		assert!(store.promote_admin(&user).expect("Promotion should persist."));
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let profile = rt
			.block_on(ProfileStore::get(&reopened, &user))
			.expect("Failed to fetch profile from file store.")
			.expect("File store lost profile after reopen.");
		let report = rt
			.block_on(ReportStore::get(&reopened, ReportTarget::Laporan, &report_id))
			.expect("Failed to fetch report from file store.")
			.expect("File store lost report after reopen.");

		assert!(profile.is_admin());
		assert_eq!(report.text, "Banjir di Jl. Pasteur");

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn failed_write_leaves_documents_untouched() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let existing = UserId::new("u-kept").expect("Failed to build user fixture.");
		let added = UserId::new("u-lost").expect("Failed to build user fixture.");
		let draft = ReportDraft {
			text: "Longsor di Lembang".into(),
			submitted_at: OffsetDateTime::now_utc(),
			reporter: "warga@example.com".into(),
		};

		let profile = Profile::new("Warga", "warga@example.com");

		rt.block_on(ProfileStore::set(&store, &existing, profile))
			.expect("Failed to save profile fixture to file store.");

		let blocker = path.with_extension("tmp");

		fs::create_dir(&blocker).expect("Failed to block the temporary snapshot path.");

		assert!(
			rt.block_on(ProfileStore::set(&store, &added, Profile::new("Lain", "lain@example.com")))
				.is_err()
		);
		assert!(rt.block_on(ReportStore::add(&store, ReportTarget::Alerts, draft)).is_err());
		assert!(store.promote_admin(&existing).is_err());
		assert!(
			rt.block_on(ProfileStore::get(&store, &added))
				.expect("Failed to fetch profile from file store.")
				.is_none()
		);
		assert!(
			rt.block_on(ReportStore::list(&store, ReportTarget::Alerts))
				.expect("Failed to list reports from file store.")
				.is_empty()
		);
		assert!(
			!rt.block_on(ProfileStore::get(&store, &existing))
				.expect("Failed to fetch profile from file store.")
				.expect("Existing profile should survive failed writes.")
				.is_admin()
		);

		fs::remove_dir(&blocker).expect("Failed to remove the blocking directory.");

		assert!(store.promote_admin(&existing).expect("Promotion should persist once unblocked."));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_reports_serialization_error() {
		let path = temp_path();

		fs::write(&path, b"{not json").expect("Failed to write corrupt snapshot fixture.");

		let err = FileStore::open(&path).expect_err("Corrupt snapshot must fail to open.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
