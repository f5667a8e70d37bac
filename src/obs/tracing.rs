// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span wrapper used around session calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("lettings_client.call", kind = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
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

/// Emits a warn-level event when the session ends and the user is sent to the login route.
pub(crate) fn session_expired(reason: &str, login_route: &str) {
	#[cfg(feature = "tracing")]
	tracing::warn!(reason, login_route, "session ended; credentials cleared");
	#[cfg(not(feature = "tracing"))]
	let _ = (reason, login_route);
}

/// Emits a debug-level event when a caller adopts another caller's refresh result.
pub(crate) fn refresh_joined(generation: u64) {
	#[cfg(feature = "tracing")]
	tracing::debug!(generation, "joined in-flight token refresh");
	#[cfg(not(feature = "tracing"))]
	let _ = generation;
}

/// Emits a warn-level event for best-effort cleanup that failed.
pub(crate) fn cleanup_failed(stage: &'static str, error: &dyn StdError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(stage, error = %error, "credential cleanup failed");
	#[cfg(not(feature = "tracing"))]
	let _ = (stage, error);
}
