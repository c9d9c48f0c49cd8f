//! Request lifecycle: the caller-observable state of insight requests.
//!
//! `Idle -> Loading -> Success | Failed`, re-entering `Loading` on every new
//! invocation. A newer invocation supersedes an older one without cancelling it:
//! each invocation carries a generation number, and a settlement is applied only
//! if its generation is still the latest one started.

use super::{InsightOrchestrator, InsightResult, ObjectName};
use crate::error::InsightError;
use parking_lot::Mutex;
use tracing::debug;

/// Observable state of the most recent invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Loading { object_name: ObjectName },
    Success { result: InsightResult },
    Failed { message: String },
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }
}

/// Handle for one started invocation, used to settle it.
#[derive(Debug)]
pub struct RequestTicket {
    generation: u64,
    object_name: ObjectName,
}

impl RequestTicket {
    pub fn object_name(&self) -> &ObjectName {
        &self.object_name
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to one call of [`LifecycleController::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; state untouched and no model call made.
    Ignored,
    /// Settlement was applied to the observable state.
    Applied,
    /// A newer invocation started first; the settlement was discarded.
    Superseded,
}

struct Inner {
    state: RequestState,
    generation: u64,
}

/// Single writer of [`RequestState`] for one caller session.
pub struct LifecycleController {
    inner: Mutex<Inner>,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: RequestState::Idle,
                generation: 0,
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RequestState {
        self.inner.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().state.is_loading()
    }

    /// Enter `Loading` for `raw`, superseding any in-flight invocation.
    ///
    /// Returns `None`, leaving the state alone, when `raw` is blank.
    pub fn begin(&self, raw: &str) -> Option<RequestTicket> {
        let object_name = ObjectName::parse(raw)?;
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = RequestState::Loading {
            object_name: object_name.clone(),
        };
        debug!(object = %object_name, generation = inner.generation, "Insight request started");
        Some(RequestTicket {
            generation: inner.generation,
            object_name,
        })
    }

    /// Apply the outcome of `ticket` unless a newer invocation has started.
    ///
    /// Returns whether the state changed.
    pub fn settle(
        &self,
        ticket: RequestTicket,
        outcome: Result<InsightResult, InsightError>,
    ) -> bool {
        let mut inner = self.inner.lock();
        if ticket.generation != inner.generation {
            debug!(
                object = %ticket.object_name,
                generation = ticket.generation,
                latest = inner.generation,
                "Discarding stale insight result"
            );
            return false;
        }
        inner.state = match outcome {
            Ok(result) => RequestState::Success { result },
            Err(err) => RequestState::Failed {
                message: err.to_string(),
            },
        };
        true
    }

    /// Run one full invocation: begin, orchestrate, settle.
    pub async fn submit(&self, orchestrator: &InsightOrchestrator, raw: &str) -> SubmitOutcome {
        let Some(ticket) = self.begin(raw) else {
            return SubmitOutcome::Ignored;
        };
        let outcome = orchestrator.get_insights(ticket.object_name()).await;
        if self.settle(ticket, outcome) {
            SubmitOutcome::Applied
        } else {
            SubmitOutcome::Superseded
        }
    }
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new()
    }
}
