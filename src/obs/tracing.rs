// self
use crate::{_prelude::*, auth::UserId, obs::OpKind, store::StoreError};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by session and reporting operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("siaga.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a profile lookup failure that the resolver recovered from by staying pending.
pub fn profile_lookup_failed(user: &UserId, error: &StoreError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(user = %user, error = %error, "profile lookup failed; session stays pending");
	#[cfg(not(feature = "tracing"))]
	let _ = (user, error);
}

/// Logs a lookup result dropped because another identity became current.
pub fn stale_lookup_discarded(user: &UserId) {
	#[cfg(feature = "tracing")]
	tracing::debug!(user = %user, "discarding profile lookup for superseded identity");
	#[cfg(not(feature = "tracing"))]
	let _ = user;
}

/// Logs a profile write that failed after the account was created.
pub fn profile_write_failed(user: &UserId, error: &StoreError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(user = %user, error = %error, "account created without a profile document");
	#[cfg(not(feature = "tracing"))]
	let _ = (user, error);
}
