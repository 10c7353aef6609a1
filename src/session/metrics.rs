//! Counters describing the resolver's profile lookups.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for profile lookups issued by the resolver.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
	issued: AtomicU64,
	applied: AtomicU64,
	missing: AtomicU64,
	failed: AtomicU64,
	discarded: AtomicU64,
}
impl ResolverMetrics {
	/// Lookups handed to the spawner.
	pub fn issued(&self) -> u64 {
		self.issued.load(Ordering::Relaxed)
	}

	/// Lookups whose profile was applied to the session.
	pub fn applied(&self) -> u64 {
		self.applied.load(Ordering::Relaxed)
	}

	/// Lookups that found no profile document.
	pub fn missing(&self) -> u64 {
		self.missing.load(Ordering::Relaxed)
	}

	/// Lookups that failed at the store.
	pub fn failed(&self) -> u64 {
		self.failed.load(Ordering::Relaxed)
	}

	/// Lookups dropped because a newer identity was current when they resolved.
	pub fn discarded(&self) -> u64 {
		self.discarded.load(Ordering::Relaxed)
	}

	pub(crate) fn record_issued(&self) {
		self.issued.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_applied(&self) {
		self.applied.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_missing(&self) {
		self.missing.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failed(&self) {
		self.failed.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_discarded(&self) {
		self.discarded.fetch_add(1, Ordering::Relaxed);
	}
}
