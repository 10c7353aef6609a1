//! Optional observability helpers for session and reporting operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `siaga.op` with the `op` and `stage`
//!   fields, plus `warn`/`debug` events for recovered profile lookup failures and discarded
//!   stale lookups.
//! - Enable `metrics` to increment the `siaga_op_total` counter for every
//!   attempt/success/failure/discard, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Email/password sign-in.
	SignIn,
	/// Account + profile creation.
	SignUp,
	/// Sign-out.
	SignOut,
	/// Profile fetch issued by the session resolver.
	ProfileLookup,
	/// Report submission.
	SubmitReport,
	/// Report-to-alert escalation.
	EscalateReport,
	/// Open-data history fetch.
	FetchHistory,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::SignIn => "sign_in",
			OpKind::SignUp => "sign_up",
			OpKind::SignOut => "sign_out",
			OpKind::ProfileLookup => "profile_lookup",
			OpKind::SubmitReport => "submit_report",
			OpKind::EscalateReport => "escalate_report",
			OpKind::FetchHistory => "fetch_history",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller (or recovered locally).
	Failure,
	/// Result dropped because a newer identity superseded it.
	Discarded,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
			OpOutcome::Discarded => "discarded",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the terminal outcome of `result` for `kind`.
pub(crate) fn record_result<T, E>(kind: OpKind, result: &Result<T, E>) {
	match result {
		Ok(_) => record_op_outcome(kind, OpOutcome::Success),
		Err(_) => record_op_outcome(kind, OpOutcome::Failure),
	}
}
