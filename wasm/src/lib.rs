//! WebAssembly module for the Farm Advisory Platform
//!
//! Provides client-side computation for:
//! - Instant local irrigation estimates
//! - Local/server advisory reconciliation state for the UI panel

use shared::{AdviceForm, AdviceResponse};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::irrigation::*;
pub use shared::reconcile::*;

fn to_json<T: serde::Serialize>(value: &T) -> String {
    // Plain structs of numbers and strings always serialize
    serde_json::to_string(value).unwrap_or_default()
}

fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// Observation from the raw `<input>`/`<select>` values
fn form_observation(
    soil_type: &str,
    moisture: &str,
    forecast: &str,
    area: &str,
    crop_stage: &str,
) -> Observation {
    AdviceForm {
        soil_type: Some(soil_type.to_string()),
        moisture: Some(moisture.to_string()),
        forecast: Some(forecast.to_string()),
        area: Some(area.to_string()),
        crop_stage: Some(crop_stage.to_string()),
    }
    .into_observation()
}

/// Compute the local estimate from raw form values.
///
/// Returns the prescription as camelCase JSON.
#[wasm_bindgen]
pub fn compute_irrigation(
    soil_type: &str,
    moisture: &str,
    forecast: &str,
    area: &str,
    crop_stage: &str,
) -> String {
    let observation = form_observation(soil_type, moisture, forecast, area, crop_stage);
    to_json(&advise(&observation))
}

/// Compute the local estimate from a camelCase observation object (JSON)
#[wasm_bindgen]
pub fn advise_json(observation_json: &str) -> Result<String, JsValue> {
    let observation: Observation = serde_json::from_str(observation_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid observation JSON: {}", e)))?;
    Ok(to_json(&advise(&observation)))
}

/// Advisory panel state driven by the UI.
///
/// The UI calls `update_local` on every form change, `begin_remote` before
/// posting to the server, then either `accept_server` with the response
/// body or `mark_unavailable` when the request fails.
#[wasm_bindgen]
pub struct AdvisoryPanel {
    inner: Reconciler,
}

#[wasm_bindgen]
impl AdvisoryPanel {
    /// `discard_stale` drops responses to superseded requests
    #[wasm_bindgen(constructor)]
    pub fn new(discard_stale: bool) -> AdvisoryPanel {
        let ordering = if discard_stale {
            ResponseOrdering::DiscardStale
        } else {
            ResponseOrdering::LastResponseWins
        };
        AdvisoryPanel {
            inner: Reconciler::new(ordering),
        }
    }

    /// Recompute the local estimate from raw form values; returns it as JSON
    pub fn update_local(
        &mut self,
        soil_type: &str,
        moisture: &str,
        forecast: &str,
        area: &str,
        crop_stage: &str,
    ) -> String {
        let observation = form_observation(soil_type, moisture, forecast, area, crop_stage);
        to_json(&self.inner.observe(&observation))
    }

    /// Register a remote request; returns its sequence number
    pub fn begin_remote(&mut self) -> u64 {
        self.inner.begin_request().sequence
    }

    /// Apply a server response body (`depth_mm`, `liters_per_ha`, ...).
    ///
    /// A body that does not decode is treated as an unavailable advisory.
    /// Returns true when the server value is now displayed.
    pub fn accept_server(&mut self, sequence: u64, response_json: &str) -> bool {
        let ticket = RequestTicket { sequence };
        let result = serde_json::from_str::<AdviceResponse>(response_json)
            .map(Into::into)
            .map_err(|e| AdvisoryUnavailable::new(format!("unreadable server response: {}", e)));

        let resolution = self.inner.complete(ticket, result);
        if resolution == Resolution::Unavailable {
            warn("Failed to fetch advisory from server");
        }
        resolution == Resolution::Applied
    }

    /// Record a failed remote request; the local estimate stays visible
    pub fn mark_unavailable(&mut self, sequence: u64, reason: &str) {
        let ticket = RequestTicket { sequence };
        let resolution = self.inner.complete(ticket, Err(AdvisoryUnavailable::new(reason)));
        if resolution == Resolution::Unavailable {
            warn(&format!("Advisory unavailable: {}", reason));
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    /// Current panel state as JSON
    pub fn snapshot(&self) -> String {
        to_json(&self.inner.snapshot())
    }
}
