//! Local/server advisory reconciliation
//!
//! The UI shows an instant local estimate and, once it arrives, the
//! authoritative server prescription for the same observation. This module
//! holds that display state without doing any I/O: callers compute locally
//! through [`Reconciler::observe`], take a [`RequestTicket`] before sending
//! the remote request, and hand the outcome back to [`Reconciler::complete`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::irrigation::{prescribe, NormalizedObservation, Observation, Prescription};

/// How late remote responses are treated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Whatever resolves last is displayed, even if an older request
    #[default]
    LastResponseWins,
    /// Responses to anything but the most recent request are dropped
    DiscardStale,
}

/// Handle for one in-flight remote request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket {
    pub sequence: u64,
}

/// The remote advisory could not be obtained
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("advisory unavailable: {reason}")]
pub struct AdvisoryUnavailable {
    pub reason: String,
}

impl AdvisoryUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Non-fatal message shown next to the estimates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisoryNotice {
    Unavailable { reason: String },
}

/// What [`Reconciler::complete`] did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Server prescription is now displayed
    Applied,
    /// Response belonged to a superseded request and was dropped
    Stale,
    /// Request failed; the local estimate stays in place
    Unavailable,
}

/// Reconciliation state behind the advisory panel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reconciler {
    ordering: ResponseOrdering,
    last_issued: u64,
    in_flight: usize,
    local: Option<Prescription>,
    server: Option<Prescription>,
    notice: Option<AdvisoryNotice>,
    /// Last observation passed to `observe`
    current: Option<NormalizedObservation>,
    /// No observation change since `server` was applied
    server_current: bool,
}

impl Reconciler {
    pub fn new(ordering: ResponseOrdering) -> Self {
        Self {
            ordering,
            ..Self::default()
        }
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    /// Recompute the local estimate. Never touches the server value, but a
    /// changed observation stops it being displayed until the next response
    /// is applied.
    pub fn observe(&mut self, observation: &Observation) -> Prescription {
        let normalized = observation.normalize();
        if self.current != Some(normalized) {
            self.current = Some(normalized);
            self.server_current = false;
        }

        let estimate = prescribe(&normalized);
        self.local = Some(estimate);
        estimate
    }

    /// Register a new remote request
    pub fn begin_request(&mut self) -> RequestTicket {
        self.last_issued += 1;
        self.in_flight += 1;
        RequestTicket {
            sequence: self.last_issued,
        }
    }

    /// Apply the outcome of a remote request
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<Prescription, AdvisoryUnavailable>,
    ) -> Resolution {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.ordering == ResponseOrdering::DiscardStale && ticket.sequence < self.last_issued {
            return Resolution::Stale;
        }

        match result {
            Ok(prescription) => {
                self.server = Some(prescription);
                self.server_current = true;
                self.notice = None;
                Resolution::Applied
            }
            Err(err) => {
                self.server = None;
                self.notice = Some(AdvisoryNotice::Unavailable { reason: err.reason });
                Resolution::Unavailable
            }
        }
    }

    /// Prescription to headline: the last applied server value unless the
    /// observation has changed since, the local estimate otherwise
    pub fn displayed(&self) -> Option<Prescription> {
        if self.server_is_current() {
            self.server
        } else {
            self.local
        }
    }

    /// Whether the stored server value was applied after the last
    /// observation change
    pub fn server_is_current(&self) -> bool {
        self.server.is_some() && self.server_current
    }

    pub fn local(&self) -> Option<Prescription> {
        self.local
    }

    pub fn server(&self) -> Option<Prescription> {
        self.server
    }

    pub fn notice(&self) -> Option<&AdvisoryNotice> {
        self.notice.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Serializable view for the UI
    pub fn snapshot(&self) -> AdvisorySnapshot {
        AdvisorySnapshot {
            local: self.local,
            server: self.server,
            server_current: self.server_is_current(),
            displayed: self.displayed(),
            loading: self.is_loading(),
            notice: self.notice.clone(),
        }
    }
}

/// Point-in-time view of the advisory panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorySnapshot {
    pub local: Option<Prescription>,
    pub server: Option<Prescription>,
    /// `server` answers the observation behind `local`
    #[serde(default)]
    pub server_current: bool,
    pub displayed: Option<Prescription>,
    pub loading: bool,
    pub notice: Option<AdvisoryNotice>,
}
