//! Irrigation advisory engine
//!
//! Converts farm observations (soil, moisture, forecast, crop stage, area)
//! into an irrigation prescription. The same rules back the instant local
//! estimate in the browser and the authoritative server endpoint, so every
//! constant lives here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::validation::{normalize_area, normalize_moisture};

// ============================================================================
// Constants
// ============================================================================

/// Base depth for sandy soil (mm)
pub const SANDY_BASE_MM: f64 = 35.0;
/// Base depth for loam soil, also the fallback for unknown soils (mm)
pub const LOAM_BASE_MM: f64 = 25.0;
/// Base depth for clay soil (mm)
pub const CLAY_BASE_MM: f64 = 18.0;

/// Moisture at or above which the depth is reduced (%)
pub const WET_SOIL_THRESHOLD: f64 = 70.0;
/// Moisture at or below which the depth is increased (%)
pub const DRY_SOIL_THRESHOLD: f64 = 30.0;
/// Depth adjustment applied at either moisture threshold (mm)
pub const MOISTURE_ADJUSTMENT_MM: f64 = 10.0;

/// Depth removed when rain is forecast (mm)
pub const RAINY_ADJUSTMENT_MM: f64 = 8.0;
/// Depth added when a dry spell is forecast (mm)
pub const DRY_ADJUSTMENT_MM: f64 = 6.0;

/// Smallest depth ever prescribed (mm)
pub const MIN_DEPTH_MM: u32 = 8;

/// 1 mm of water over 1 hectare
pub const LITERS_PER_MM_HECTARE: u64 = 10_000;

pub const DEFAULT_INTERVAL_DAYS: u8 = 4;
pub const SHORT_INTERVAL_DAYS: u8 = 2;
pub const LONG_INTERVAL_DAYS: u8 = 6;

// ============================================================================
// Categorical inputs
// ============================================================================

/// Soil texture class
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SoilType {
    Sandy,
    #[default]
    Loam,
    Clay,
}

impl SoilType {
    /// Parse a UI label; anything unrecognized is treated as loam
    pub fn parse_lenient(label: &str) -> Self {
        match label {
            "Sandy" => SoilType::Sandy,
            "Clay" => SoilType::Clay,
            _ => SoilType::Loam,
        }
    }

    pub fn base_depth_mm(&self) -> f64 {
        match self {
            SoilType::Sandy => SANDY_BASE_MM,
            SoilType::Loam => LOAM_BASE_MM,
            SoilType::Clay => CLAY_BASE_MM,
        }
    }
}

/// Short-range weather outlook
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Forecast {
    Dry,
    #[default]
    Normal,
    Rainy,
}

impl Forecast {
    /// Parse a UI label; anything unrecognized behaves as a normal outlook
    pub fn parse_lenient(label: &str) -> Self {
        match label {
            "Dry" => Forecast::Dry,
            "Rainy" => Forecast::Rainy,
            _ => Forecast::Normal,
        }
    }

    pub fn depth_adjustment_mm(&self) -> f64 {
        match self {
            Forecast::Dry => DRY_ADJUSTMENT_MM,
            Forecast::Normal => 0.0,
            Forecast::Rainy => -RAINY_ADJUSTMENT_MM,
        }
    }
}

/// Crop growth stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum CropStage {
    Seeding,
    #[default]
    Vegetative,
    Flowering,
    Maturity,
}

impl CropStage {
    /// Parse a UI label; unknown stages get the neutral 1.0 multiplier
    pub fn parse_lenient(label: &str) -> Self {
        match label {
            "Seeding" => CropStage::Seeding,
            "Flowering" => CropStage::Flowering,
            "Maturity" => CropStage::Maturity,
            _ => CropStage::Vegetative,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            CropStage::Seeding => 0.8,
            CropStage::Vegetative => 1.0,
            CropStage::Flowering => 1.2,
            CropStage::Maturity => 0.6,
        }
    }
}

// ============================================================================
// Observation
// ============================================================================

/// A single raw input value as it arrives from a form or request body.
///
/// Numbers and numeric strings are both accepted; any other JSON value is
/// kept so it can be normalized instead of rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    /// The value as a label, if it is a string
    pub fn as_label(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Farm observation gathered at submission time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture_percent: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_hectares: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_stage: Option<FieldValue>,
}

impl Observation {
    pub fn new(
        soil_type: impl Into<FieldValue>,
        moisture_percent: impl Into<FieldValue>,
        forecast: impl Into<FieldValue>,
        area_hectares: impl Into<FieldValue>,
        crop_stage: impl Into<FieldValue>,
    ) -> Self {
        Self {
            soil_type: Some(soil_type.into()),
            moisture_percent: Some(moisture_percent.into()),
            forecast: Some(forecast.into()),
            area_hectares: Some(area_hectares.into()),
            crop_stage: Some(crop_stage.into()),
        }
    }

    /// Resolve every field to a safe, typed value.
    ///
    /// This is the only place parsing and clamping happen; the formula in
    /// [`prescribe`] only ever sees normalized input.
    pub fn normalize(&self) -> NormalizedObservation {
        fn label(field: &Option<FieldValue>) -> &str {
            field
                .as_ref()
                .and_then(FieldValue::as_label)
                .unwrap_or_default()
        }

        NormalizedObservation {
            soil_type: SoilType::parse_lenient(label(&self.soil_type)),
            moisture_percent: normalize_moisture(self.moisture_percent.as_ref()),
            forecast: Forecast::parse_lenient(label(&self.forecast)),
            area_hectares: normalize_area(self.area_hectares.as_ref()),
            crop_stage: CropStage::parse_lenient(label(&self.crop_stage)),
        }
    }
}

/// Observation after normalization: every field in range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedObservation {
    pub soil_type: SoilType,
    /// Always within [0, 100]
    pub moisture_percent: f64,
    pub forecast: Forecast,
    /// Always finite and > 0
    pub area_hectares: f64,
    pub crop_stage: CropStage,
}

impl Default for NormalizedObservation {
    fn default() -> Self {
        Self {
            soil_type: SoilType::Loam,
            moisture_percent: crate::validation::DEFAULT_MOISTURE_PERCENT,
            forecast: Forecast::Normal,
            area_hectares: crate::validation::DEFAULT_AREA_HECTARES,
            crop_stage: CropStage::Vegetative,
        }
    }
}

// ============================================================================
// Prescription
// ============================================================================

/// Irrigation prescription
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    /// Depth per irrigation event (mm), never below [`MIN_DEPTH_MM`]
    pub depth_mm: u32,
    pub liters_per_hectare: u64,
    pub total_liters: u64,
    pub interval_days: u8,
}

/// Compute the prescription for a raw observation
pub fn advise(observation: &Observation) -> Prescription {
    prescribe(&observation.normalize())
}

/// Compute the prescription for an already-normalized observation
pub fn prescribe(obs: &NormalizedObservation) -> Prescription {
    let mut depth = obs.soil_type.base_depth_mm();

    if obs.moisture_percent >= WET_SOIL_THRESHOLD {
        depth -= MOISTURE_ADJUSTMENT_MM;
    } else if obs.moisture_percent <= DRY_SOIL_THRESHOLD {
        depth += MOISTURE_ADJUSTMENT_MM;
    }
    depth += obs.forecast.depth_adjustment_mm();

    let scaled = (depth * obs.crop_stage.multiplier()).round();
    let depth_mm = if scaled > f64::from(MIN_DEPTH_MM) {
        scaled as u32
    } else {
        MIN_DEPTH_MM
    };

    let liters_per_hectare = u64::from(depth_mm) * LITERS_PER_MM_HECTARE;
    // `as` saturates for absurdly large areas
    let total_liters = (liters_per_hectare as f64 * obs.area_hectares).round() as u64;

    Prescription {
        depth_mm,
        liters_per_hectare,
        total_liters,
        interval_days: interval_days(obs),
    }
}

/// Days between irrigation events.
///
/// The short-interval check runs first and the long-interval check second,
/// so the long interval wins if both ever fire. Thresholds here are strict,
/// unlike the inclusive thresholds of the depth adjustment.
pub fn interval_days(obs: &NormalizedObservation) -> u8 {
    let mut interval = DEFAULT_INTERVAL_DAYS;
    if obs.moisture_percent < DRY_SOIL_THRESHOLD || obs.forecast == Forecast::Dry {
        interval = SHORT_INTERVAL_DAYS;
    }
    if obs.moisture_percent > WET_SOIL_THRESHOLD || obs.forecast == Forecast::Rainy {
        interval = LONG_INTERVAL_DAYS;
    }
    interval
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(soil: &str, moisture: f64, forecast: &str, area: f64, stage: &str) -> Observation {
        Observation::new(soil, moisture, forecast, area, stage)
    }

    #[test]
    fn test_base_depth_by_soil() {
        for (soil, expected) in [("Sandy", 35), ("Loam", 25), ("Clay", 18)] {
            let p = advise(&obs(soil, 50.0, "Normal", 1.0, "Vegetative"));
            assert_eq!(p.depth_mm, expected, "soil {}", soil);
            assert_eq!(p.interval_days, DEFAULT_INTERVAL_DAYS);
        }
    }

    #[test]
    fn test_sandy_dry_flowering_scenario() {
        let p = advise(&obs("Sandy", 25.0, "Dry", 2.0, "Flowering"));
        assert_eq!(
            p,
            Prescription {
                depth_mm: 61,
                liters_per_hectare: 610_000,
                total_liters: 1_220_000,
                interval_days: 2,
            }
        );
    }

    #[test]
    fn test_clay_wet_rainy_maturity_floors_at_minimum() {
        let p = advise(&obs("Clay", 80.0, "Rainy", 1.0, "Maturity"));
        assert_eq!(p.depth_mm, MIN_DEPTH_MM);
        assert_eq!(p.liters_per_hectare, 80_000);
        assert_eq!(p.total_liters, 80_000);
        assert_eq!(p.interval_days, 6);
    }

    #[test]
    fn test_moisture_boundaries_are_inclusive_for_depth() {
        // 30 and 70 adjust the depth but not the interval
        let low = advise(&obs("Loam", 30.0, "Normal", 1.0, "Vegetative"));
        assert_eq!(low.depth_mm, 35);
        assert_eq!(low.interval_days, 4);

        let high = advise(&obs("Loam", 70.0, "Normal", 1.0, "Vegetative"));
        assert_eq!(high.depth_mm, 15);
        assert_eq!(high.interval_days, 4);
    }

    #[test]
    fn test_moisture_just_past_boundaries_changes_interval() {
        assert_eq!(
            advise(&obs("Loam", 29.5, "Normal", 1.0, "Vegetative")).interval_days,
            2
        );
        assert_eq!(
            advise(&obs("Loam", 70.5, "Normal", 1.0, "Vegetative")).interval_days,
            6
        );
    }

    #[test]
    fn test_long_interval_wins_when_both_fire() {
        // Low moisture triggers the short interval, rain overrides it
        let p = advise(&obs("Sandy", 10.0, "Rainy", 1.0, "Vegetative"));
        assert_eq!(p.interval_days, 6);
        // 35 + 10 - 8
        assert_eq!(p.depth_mm, 37);
    }

    #[test]
    fn test_forecast_and_moisture_both_apply() {
        // 25 - 10 + 6
        let p = advise(&obs("Loam", 90.0, "Dry", 1.0, "Vegetative"));
        assert_eq!(p.depth_mm, 21);
        assert_eq!(p.interval_days, 6);
    }

    #[test]
    fn test_stage_multipliers() {
        let depth = |stage| advise(&obs("Loam", 50.0, "Normal", 1.0, stage)).depth_mm;
        assert_eq!(depth("Seeding"), 20);
        assert_eq!(depth("Vegetative"), 25);
        assert_eq!(depth("Flowering"), 30);
        assert_eq!(depth("Maturity"), 15);
        assert_eq!(depth("Dormant"), 25);
    }

    #[test]
    fn test_fractional_area_rounds_total() {
        let p = advise(&obs("Loam", 50.0, "Normal", 0.3, "Vegetative"));
        assert_eq!(p.liters_per_hectare, 250_000);
        assert_eq!(p.total_liters, 75_000);
    }

    #[test]
    fn test_unknown_inputs_match_neutral_defaults() {
        let messy = Observation::new("Unknown", "abc", "Foggy", -5, "Dormant");
        let neutral = obs("Loam", 50.0, "Normal", 1.0, "Vegetative");
        assert_eq!(advise(&messy), advise(&neutral));
        assert_eq!(messy.normalize(), NormalizedObservation::default());
    }

    #[test]
    fn test_empty_observation_uses_defaults() {
        let p = advise(&Observation::default());
        assert_eq!(p.depth_mm, 25);
        assert_eq!(p.total_liters, 250_000);
        assert_eq!(p.interval_days, 4);
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_eq!(SoilType::parse_lenient("sandy"), SoilType::Loam);
        assert_eq!(Forecast::parse_lenient("RAINY"), Forecast::Normal);
        assert_eq!(CropStage::parse_lenient("maturity"), CropStage::Vegetative);
    }

    #[test]
    fn test_observation_deserializes_mixed_json() {
        let json = r#"{
            "soilType": "Clay",
            "moisturePercent": "65",
            "forecast": 3,
            "areaHectares": true,
            "cropStage": null
        }"#;
        let observation: Observation = serde_json::from_str(json).unwrap();
        let normalized = observation.normalize();

        assert_eq!(normalized.soil_type, SoilType::Clay);
        assert_eq!(normalized.moisture_percent, 65.0);
        assert_eq!(normalized.forecast, Forecast::Normal);
        assert_eq!(normalized.area_hectares, 1.0);
        assert_eq!(normalized.crop_stage, CropStage::Vegetative);
    }

    #[test]
    fn test_prescription_serializes_camel_case() {
        let p = advise(&obs("Clay", 80.0, "Rainy", 1.0, "Maturity"));
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["depthMm"], 8);
        assert_eq!(json["litersPerHectare"], 80_000);
        assert_eq!(json["totalLiters"], 80_000);
        assert_eq!(json["intervalDays"], 6);
    }
}
