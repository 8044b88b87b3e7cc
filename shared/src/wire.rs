//! Wire shapes for the `/irrigation_advice` form endpoint
//!
//! The browser posts snake_case form fields and reads back a snake_case JSON
//! body; both map one-to-one onto [`Observation`] and [`Prescription`].

use serde::{Deserialize, Serialize};

use crate::irrigation::{FieldValue, Observation, Prescription};

/// Form fields as posted by the advisory UI. Every field is raw text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdviceForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_stage: Option<String>,
}

impl AdviceForm {
    /// Set a field by its form name. Unknown names are ignored and reported
    /// back as `false`.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "soil_type" => &mut self.soil_type,
            "moisture" => &mut self.moisture,
            "forecast" => &mut self.forecast,
            "area" => &mut self.area,
            "crop_stage" => &mut self.crop_stage,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Encode an observation the way the UI fills its `FormData`
    pub fn from_observation(observation: &Observation) -> Self {
        fn encode(field: &Option<FieldValue>) -> Option<String> {
            match field.as_ref()? {
                FieldValue::Number(n) => Some(n.to_string()),
                FieldValue::Text(s) => Some(s.clone()),
                FieldValue::Other(v) => Some(v.to_string()),
            }
        }

        Self {
            soil_type: encode(&observation.soil_type),
            moisture: encode(&observation.moisture_percent),
            forecast: encode(&observation.forecast),
            area: encode(&observation.area_hectares),
            crop_stage: encode(&observation.crop_stage),
        }
    }

    pub fn into_observation(self) -> Observation {
        Observation {
            soil_type: self.soil_type.map(FieldValue::Text),
            moisture_percent: self.moisture.map(FieldValue::Text),
            forecast: self.forecast.map(FieldValue::Text),
            area_hectares: self.area.map(FieldValue::Text),
            crop_stage: self.crop_stage.map(FieldValue::Text),
        }
    }
}

/// JSON body returned by the form endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdviceResponse {
    pub depth_mm: u32,
    pub liters_per_ha: u64,
    pub total_liters: u64,
    pub interval_days: u8,
}

impl From<Prescription> for AdviceResponse {
    fn from(p: Prescription) -> Self {
        Self {
            depth_mm: p.depth_mm,
            liters_per_ha: p.liters_per_hectare,
            total_liters: p.total_liters,
            interval_days: p.interval_days,
        }
    }
}

impl From<AdviceResponse> for Prescription {
    fn from(r: AdviceResponse) -> Self {
        Self {
            depth_mm: r.depth_mm,
            liters_per_hectare: r.liters_per_ha,
            total_liters: r.total_liters,
            interval_days: r.interval_days,
        }
    }
}
