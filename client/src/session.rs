//! Advisory session: local estimate plus reconciled server advice

use shared::{
    AdvisorySnapshot, AdvisoryUnavailable, Observation, Prescription, Reconciler, Resolution,
    ResponseOrdering,
};
use tokio::sync::Mutex;

use crate::client::AdvisoryClient;

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    /// Local estimate computed before the request went out
    pub local: Prescription,
    /// What happened to the server response
    pub resolution: Resolution,
    /// Panel state after the response was applied
    pub snapshot: AdvisorySnapshot,
}

/// One advisory panel's worth of state, shareable across tasks
pub struct AdvisorySession {
    client: AdvisoryClient,
    state: Mutex<Reconciler>,
}

impl AdvisorySession {
    pub fn new(client: AdvisoryClient, ordering: ResponseOrdering) -> Self {
        Self {
            client,
            state: Mutex::new(Reconciler::new(ordering)),
        }
    }

    /// Submit an observation and wait for the server's answer
    pub async fn submit(&self, observation: Observation) -> SessionUpdate {
        self.submit_with(observation, |_| {}).await
    }

    /// Submit an observation, handing the local estimate to `on_local`
    /// before the remote request is sent.
    ///
    /// Transport failures never propagate: they leave the local estimate in
    /// place and show up as an unavailable notice in the snapshot.
    pub async fn submit_with<F>(&self, observation: Observation, on_local: F) -> SessionUpdate
    where
        F: FnOnce(Prescription),
    {
        let (local, ticket) = {
            let mut state = self.state.lock().await;
            (state.observe(&observation), state.begin_request())
        };
        on_local(local);

        tracing::debug!(
            sequence = ticket.sequence,
            depth_mm = local.depth_mm,
            "local estimate ready"
        );

        let result = self.client.fetch_advice(&observation).await.map_err(|err| {
            tracing::warn!(sequence = ticket.sequence, error = %err, "server advice unavailable");
            AdvisoryUnavailable::new(err.to_string())
        });

        let mut state = self.state.lock().await;
        let resolution = state.complete(ticket, result);

        match resolution {
            Resolution::Applied => {
                if state.server() != Some(local) {
                    tracing::debug!(
                        sequence = ticket.sequence,
                        "server advice differs from local estimate"
                    );
                }
            }
            Resolution::Stale => {
                tracing::debug!(sequence = ticket.sequence, "discarded stale server advice");
            }
            Resolution::Unavailable => {}
        }

        SessionUpdate {
            local,
            resolution,
            snapshot: state.snapshot(),
        }
    }

    /// Current panel state
    pub async fn snapshot(&self) -> AdvisorySnapshot {
        self.state.lock().await.snapshot()
    }
}
