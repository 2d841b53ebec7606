// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-slot correlation between a mediated send and its terminal event.
//
// `bind` claims the one process-wide slot and returns a `PendingCorrelation`
// (the request context, holding a one-shot sender) plus the receiver the
// caller awaits. The context is consumed by `resolve`; dropping it
// unresolved also releases the slot and the caller sees a closed channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use smsgate_core::error::{Result, SmsGateError};
use smsgate_core::types::{ComposeResult, DispatchOutcome, RequestId};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

type Slot = Arc<Mutex<Option<RequestId>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<RequestId>> {
    // The guarded value is a plain id; a panic elsewhere cannot leave it torn.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds at most one outstanding mediated request.
#[derive(Debug, Clone, Default)]
pub struct ResultCorrelator {
    slot: Slot,
}

impl ResultCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `request`.
    ///
    /// Fails with [`SmsGateError::RequestInFlight`] while another request is
    /// unresolved; the pending one is left untouched.
    pub fn bind(
        &self,
        request: RequestId,
    ) -> Result<(PendingCorrelation, oneshot::Receiver<DispatchOutcome>)> {
        let mut slot = lock(&self.slot);
        if let Some(current) = *slot {
            warn!(%request, pending = %current, "rejecting bind: slot occupied");
            return Err(SmsGateError::RequestInFlight);
        }
        *slot = Some(request);
        drop(slot);

        let (tx, rx) = oneshot::channel();
        debug!(%request, "correlation bound");
        let pending = PendingCorrelation {
            request,
            started_at: Utc::now(),
            sink: Some(tx),
            slot: Arc::clone(&self.slot),
        };
        Ok((pending, rx))
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Id of the request currently holding the slot.
    pub fn pending_request(&self) -> Option<RequestId> {
        *lock(&self.slot)
    }
}

/// Request context for one mediated send. Resolved exactly once.
pub struct PendingCorrelation {
    request: RequestId,
    started_at: DateTime<Utc>,
    sink: Option<oneshot::Sender<DispatchOutcome>>,
    slot: Slot,
}

impl PendingCorrelation {
    pub fn request_id(&self) -> RequestId {
        self.request
    }

    /// Deliver `outcome` to the waiting caller and clear the slot.
    pub fn resolve(mut self, outcome: DispatchOutcome) {
        self.release();
        let Some(sink) = self.sink.take() else {
            return;
        };

        let waited_ms = (Utc::now() - self.started_at).num_milliseconds();
        match &outcome {
            Ok(_) => info!(request = %self.request, waited_ms, "mediated send resolved"),
            Err(e) => info!(request = %self.request, waited_ms, code = e.code(), "mediated send resolved"),
        }
        if sink.send(outcome).is_err() {
            warn!(request = %self.request, "caller stopped waiting before the terminal event");
        }
    }

    /// Map a composer terminal event to its outcome and resolve.
    pub fn finish(self, event: ComposeResult) {
        debug!(request = %self.request, ?event, "composer finished");
        self.resolve(event.into_outcome());
    }

    fn release(&self) {
        let mut slot = lock(&self.slot);
        if *slot == Some(self.request) {
            *slot = None;
        }
    }
}

impl Drop for PendingCorrelation {
    fn drop(&mut self) {
        if self.sink.is_some() {
            warn!(request = %self.request, "pending correlation dropped without a terminal event");
        }
        self.release();
    }
}

impl std::fmt::Debug for PendingCorrelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCorrelation")
            .field("request", &self.request)
            .field("started_at", &self.started_at)
            .field("sink", &self.sink.as_ref().map(|_| "<oneshot::Sender>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_delivers_and_clears() {
        let correlator = ResultCorrelator::new();
        let id = RequestId::new();
        let (pending, rx) = correlator.bind(id).unwrap();
        assert_eq!(correlator.pending_request(), Some(id));

        pending.resolve(Ok("SMS sent successfully".into()));
        assert!(!correlator.is_pending());
        assert_eq!(rx.await.unwrap().unwrap(), "SMS sent successfully");
    }

    #[tokio::test]
    async fn second_bind_rejected_while_pending() {
        let correlator = ResultCorrelator::new();
        let first = RequestId::new();
        let (pending, rx) = correlator.bind(first).unwrap();

        let err = correlator.bind(RequestId::new()).unwrap_err();
        assert!(matches!(err, SmsGateError::RequestInFlight));
        // The first binding survives the rejected attempt.
        assert_eq!(correlator.pending_request(), Some(first));

        pending.finish(ComposeResult::Cancelled);
        assert!(matches!(rx.await.unwrap(), Err(SmsGateError::Cancelled)));
    }

    #[test]
    fn slot_reusable_after_resolve() {
        let correlator = ResultCorrelator::new();
        let (pending, _rx) = correlator.bind(RequestId::new()).unwrap();
        pending.finish(ComposeResult::Sent);
        assert!(correlator.bind(RequestId::new()).is_ok());
    }

    #[tokio::test]
    async fn dropping_unresolved_releases_slot() {
        let correlator = ResultCorrelator::new();
        let (pending, rx) = correlator.bind(RequestId::new()).unwrap();
        drop(pending);
        assert!(!correlator.is_pending());
        assert!(rx.await.is_err());
    }

    #[test]
    fn resolved_context_leaves_newer_binding_alone() {
        let correlator = ResultCorrelator::new();
        let (first, _rx1) = correlator.bind(RequestId::new()).unwrap();
        first.resolve(Err(SmsGateError::SendFailed));

        let newer = RequestId::new();
        let (_second, _rx2) = correlator.bind(newer).unwrap();
        assert_eq!(correlator.pending_request(), Some(newer));
    }

    #[test]
    fn resolve_after_caller_gone_is_harmless() {
        let correlator = ResultCorrelator::new();
        let (pending, rx) = correlator.bind(RequestId::new()).unwrap();
        drop(rx);
        pending.finish(ComposeResult::Sent);
        assert!(!correlator.is_pending());
    }
}
