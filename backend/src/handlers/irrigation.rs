//! HTTP handlers for irrigation advisory endpoints
//!
//! These are the authoritative surface for the advisory engine. The browser
//! shows its own local estimate first and replaces it with whatever these
//! handlers return.

use axum::{extract::rejection::JsonRejection, Json};
use shared::{prescribe, AdviceResponse, Observation, Prescription};

use crate::error::AppResult;
use crate::extract::AdviceFormBody;

/// Form endpoint posted by the advisory UI
pub async fn irrigation_advice(AdviceFormBody(form): AdviceFormBody) -> Json<AdviceResponse> {
    let prescription = compute(&form.into_observation());
    Json(prescription.into())
}

/// JSON endpoint taking an observation and returning a prescription
pub async fn advise_observation(
    payload: Result<Json<Observation>, JsonRejection>,
) -> AppResult<Json<Prescription>> {
    let Json(observation) = payload?;
    Ok(Json(compute(&observation)))
}

fn compute(observation: &Observation) -> Prescription {
    let normalized = observation.normalize();
    let prescription = prescribe(&normalized);

    tracing::info!(
        soil_type = ?normalized.soil_type,
        moisture_percent = normalized.moisture_percent,
        forecast = ?normalized.forecast,
        area_hectares = normalized.area_hectares,
        crop_stage = ?normalized.crop_stage,
        depth_mm = prescription.depth_mm,
        total_liters = prescription.total_liters,
        interval_days = prescription.interval_days,
        "irrigation advice computed"
    );

    prescription
}
