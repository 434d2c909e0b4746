//! Session controller: owns the query lifecycle state machine.
//!
//! ```text
//!  Idle ──query──▶ Pending ──well-formed──▶ Success ──query──▶ Pending ...
//!                    │  ▲
//!                    │  └──query (cancels the in-flight request)
//!                    └──malformed / transport / timeout──▶ Error ──query──▶ Pending
//! ```
//!
//! State is published through a `watch` channel so renderers only ever see
//! whole snapshots. Each request runs on its own tokio task and settles the
//! state at most once; a request that is no longer the pending one is dropped.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use realty_core::session::{AnalysisResult, Query, QueryHandler, RequestId, SessionState};
use realty_core::{RealtyError, Result, parse_payload};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::analyze_api_client::AnalysisService;

struct InFlight {
    request_id: RequestId,
    work: AbortHandle,
}

struct ControllerInner {
    service: Arc<dyn AnalysisService>,
    timeout: Duration,
    state_tx: watch::Sender<SessionState>,
    in_flight: Mutex<Option<InFlight>>,
}

/// Owns the session state and drives one request per submitted query.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<ControllerInner>,
}

impl SessionController {
    /// Creates a controller in the `Idle` state.
    ///
    /// # Arguments
    ///
    /// * `service` - The analysis backend
    /// * `timeout` - Upper bound for one request, after which it fails
    pub fn new(service: Arc<dyn AnalysisService>, timeout: Duration) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            inner: Arc::new(ControllerInner {
                service,
                timeout,
                state_tx,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Returns a read-only view that is notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.inner.state_tx.borrow().clone()
    }

    /// Starts analyzing `query` and moves to `Pending`.
    ///
    /// Valid from every state. A request still in flight is aborted and its
    /// response, should one still arrive, is discarded. Must be called from
    /// within a tokio runtime.
    pub fn submit(&self, query: Query) -> RequestId {
        let request_id = RequestId::new();
        let mut in_flight = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = in_flight.take() {
            warn!(
                superseded = %previous.request_id,
                by = %request_id,
                "cancelling in-flight analysis request"
            );
            previous.work.abort();
        }

        info!(%request_id, %query, "submitting analysis request");
        self.inner.state_tx.send_replace(SessionState::Pending {
            request_id,
            query: query.clone(),
        });

        let work = tokio::spawn({
            let inner = Arc::clone(&self.inner);
            async move { inner.execute(&query).await }
        });
        let abort = work.abort_handle();

        // Every request settles once, even when the service panics.
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match work.await {
                Ok(outcome) => inner.settle(request_id, outcome),
                Err(err) if err.is_cancelled() => {
                    debug!(%request_id, "analysis request cancelled");
                }
                Err(err) => inner.settle(
                    request_id,
                    Err(RealtyError::transport(format!("Analysis request aborted: {err}"))),
                ),
            }
        });
        *in_flight = Some(InFlight {
            request_id,
            work: abort,
        });

        request_id
    }

    /// Waits until `request_id` is no longer the pending request.
    ///
    /// Returns the state at that moment: its outcome, or the `Pending` state of
    /// the query that replaced it.
    pub async fn wait_settled(&self, request_id: RequestId) -> SessionState {
        let mut rx = self.subscribe();
        match rx.wait_for(|state| !state.is_pending_for(request_id)).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.snapshot(),
        }
    }

    /// Submits `query` and waits for its outcome.
    pub async fn analyze(&self, query: Query) -> SessionState {
        let request_id = self.submit(query);
        self.wait_settled(request_id).await
    }
}

impl QueryHandler for SessionController {
    fn handle_query(&self, query: Query) -> RequestId {
        self.submit(query)
    }
}

impl ControllerInner {
    async fn execute(&self, query: &Query) -> Result<AnalysisResult> {
        let body = tokio::time::timeout(self.timeout, self.service.analyze(query))
            .await
            .map_err(|_| RealtyError::Timeout {
                after: self.timeout,
            })??;
        parse_payload(&body)
    }

    /// Applies the outcome of `request_id` if it is still the pending request.
    fn settle(&self, request_id: RequestId, outcome: Result<AnalysisResult>) {
        let next = match outcome {
            Ok(result) => SessionState::Success(Arc::new(result)),
            Err(err) => {
                warn!(%request_id, error = %err, "analysis request failed");
                SessionState::Error(err.user_message())
            }
        };
        let label = next.label();

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let applied = self.state_tx.send_if_modified(|state| {
            if state.is_pending_for(request_id) {
                *state = next;
                true
            } else {
                false
            }
        });

        if applied {
            info!(%request_id, state = label, "analysis request settled");
            if in_flight
                .as_ref()
                .is_some_and(|current| current.request_id == request_id)
            {
                *in_flight = None;
            }
        } else {
            debug!(%request_id, "discarding response of superseded request");
        }
    }
}
