//! Single-flight refresh gate.
//!
//! Callers snapshot [`RefreshGate::generation`] before reading the stored token. When that
//! token turns out to be stale they call [`RefreshGate::run`] with the snapshot. The first caller
//! through the async mutex leads: it runs the refresh and publishes the outcome under a new
//! generation. Everyone queued behind it finds the generation moved past their snapshot and
//! adopts the published outcome instead of refreshing again.

// std
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Result of one refresh attempt, shared with every queued caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
	/// A new access token is stored and should be used for replays.
	Refreshed(TokenSecret),
	/// The attempt failed; queued callers are rejected with this reason.
	Failed {
		/// Human-readable cause.
		reason: String,
	},
	/// No refresh token was stored, so nothing was sent and the session was left alone.
	Unavailable,
}

/// How a caller left the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatePass {
	/// This caller performed the refresh.
	Led(RefreshOutcome),
	/// This caller waited and adopted the outcome of another caller's refresh.
	Joined(RefreshOutcome),
}
impl GatePass {
	/// Returns the outcome regardless of who produced it.
	pub fn into_outcome(self) -> RefreshOutcome {
		match self {
			Self::Led(outcome) | Self::Joined(outcome) => outcome,
		}
	}
}

#[derive(Debug, Default)]
struct Published {
	generation: u64,
	latest: Option<RefreshOutcome>,
}

/// Serializes refresh attempts so at most one is in flight per session.
#[derive(Debug, Default)]
pub struct RefreshGate {
	queue: AsyncMutex<()>,
	refreshing: AtomicBool,
	waiting: AtomicUsize,
	published: Mutex<Published>,
}
impl RefreshGate {
	/// Number of refresh attempts completed so far.
	pub fn generation(&self) -> u64 {
		self.published.lock().generation
	}

	/// Returns `true` while the leader's refresh call is running.
	pub fn is_refreshing(&self) -> bool {
		self.refreshing.load(Ordering::Acquire)
	}

	/// Callers currently parked behind the gate, the leader included.
	pub fn waiting(&self) -> usize {
		self.waiting.load(Ordering::Acquire)
	}

	/// Runs `refresh` unless an attempt completed after `observed` was read, in which case
	/// that attempt's outcome is returned.
	pub async fn run<F, Fut>(&self, observed: u64, refresh: F) -> GatePass
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = RefreshOutcome>,
	{
		let _waiting = Counted::enter(&self.waiting);
		let _turn = self.queue.lock().await;

		if let Some(outcome) = self.published_since(observed) {
			return GatePass::Joined(outcome);
		}

		let outcome = {
			let _flag = Raised::raise(&self.refreshing);

			refresh().await
		};
		{
			let mut published = self.published.lock();

			published.generation += 1;
			published.latest = Some(outcome.clone());
		}

		GatePass::Led(outcome)
	}

	fn published_since(&self, observed: u64) -> Option<RefreshOutcome> {
		let published = self.published.lock();

		if published.generation == observed { None } else { published.latest.clone() }
	}
}

/// Keeps the `refreshing` flag up for the guard's lifetime, so it drops on every exit path.
struct Raised<'a>(&'a AtomicBool);
impl<'a> Raised<'a> {
	fn raise(flag: &'a AtomicBool) -> Self {
		flag.store(true, Ordering::Release);

		Self(flag)
	}
}
impl Drop for Raised<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

struct Counted<'a>(&'a AtomicUsize);
impl<'a> Counted<'a> {
	fn enter(counter: &'a AtomicUsize) -> Self {
		counter.fetch_add(1, Ordering::AcqRel);

		Self(counter)
	}
}
impl Drop for Counted<'_> {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::AcqRel);
	}
}
