//! Site parameters returned by the simulation.
//!
//! Every numeric field is optional. An absent value disables the feature it
//! drives (no snow volume, no central trunk, no solar glyphs, ...) rather
//! than acting as a zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[default]
    Summer,
    Winter,
}

impl Season {
    pub const ALL: [Season; 2] = [Season::Summer, Season::Winter];

    /// Wire name sent to the simulation.
    pub fn key(self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Winter => "Winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForestType {
    #[default]
    Deciduous,
    Coniferous,
    None,
}

impl ForestType {
    pub const ALL: [ForestType; 3] = [
        ForestType::Deciduous,
        ForestType::Coniferous,
        ForestType::None,
    ];

    /// Wire name sent to the simulation.
    pub fn key(self) -> &'static str {
        match self {
            ForestType::Deciduous => "deciduous",
            ForestType::Coniferous => "coniferous",
            ForestType::None => "none",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ForestType::Deciduous => "Deciduous",
            ForestType::Coniferous => "Coniferous",
            ForestType::None => "No forest",
        }
    }

    /// Whether this forest type ever produces tree geometry.
    pub fn has_trees(self) -> bool {
        !matches!(self, ForestType::None)
    }
}

/// The `parameters` block of a simulation response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub season: Season,
    pub forest_type: ForestType,
    /// Canopy plan-area fraction.
    #[serde(rename = "A_can", default)]
    pub a_can: Option<f32>,
    /// Trunk plan-area fraction.
    #[serde(rename = "A_trunk_plan", default)]
    pub a_trunk_plan: Option<f32>,
    /// Trunk vertical (convective) area.
    #[serde(rename = "A_trunk_vert", default)]
    pub a_trunk_vert: Option<f32>,
    /// Snow plan-area fraction.
    #[serde(rename = "A_snow", default)]
    pub a_snow: Option<f32>,
    /// Bare-soil plan-area fraction.
    #[serde(rename = "A_soil", default)]
    pub a_soil: Option<f32>,
    /// Leaf-area index.
    #[serde(rename = "LAI", default)]
    pub lai: Option<f32>,
    /// Canopy height in metres; zero means no vegetation.
    #[serde(rename = "H_canopy", default)]
    pub h_canopy: Option<f32>,
    /// Snow depth in metres.
    #[serde(rename = "Hsnow", default)]
    pub h_snow: Option<f32>,
    /// Canopy albedo. Only used as a foliage-color hint.
    #[serde(default)]
    pub alpha_can: Option<f32>,
    /// Air temperature in K, the reference for the color ramp.
    #[serde(rename = "T_atm", default)]
    pub t_atm: Option<f32>,
    /// Deep-soil boundary temperature in K.
    #[serde(rename = "T_deep", default)]
    pub t_deep: Option<f32>,
    /// Incoming shortwave radiation in W m-2.
    #[serde(rename = "Q_solar", default)]
    pub q_solar: Option<f32>,
    /// Wind speed in m s-1.
    #[serde(default)]
    pub u: Option<f32>,
}

/// Read an optional fraction/height as a plain value, absent meaning zero.
/// Only use this for gating ("is the feature enabled?"), never for display.
pub fn enabled_value(value: Option<f32>) -> f32 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

impl SimulationParameters {
    pub fn new(season: Season, forest_type: ForestType) -> Self {
        Self {
            season,
            forest_type,
            ..Default::default()
        }
    }

    /// Canopy height, zero when absent.
    pub fn canopy_height(&self) -> f32 {
        enabled_value(self.h_canopy).max(0.0)
    }

    /// Leaf-area index, zero when absent.
    pub fn leaf_area_index(&self) -> f32 {
        enabled_value(self.lai).max(0.0)
    }

    /// True when trees may be generated at all: a forest type with trees and a
    /// positive canopy height.
    pub fn has_vegetation(&self) -> bool {
        self.forest_type.has_trees() && self.canopy_height() > 0.0
    }

    /// True when the snow volume should exist.
    pub fn has_snow(&self) -> bool {
        enabled_value(self.a_snow) > 0.0 && enabled_value(self.h_snow) > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_parameter_block() {
        let json = r#"{
            "season": "winter", "forest_type": "coniferous", "Q_solar": 120.5,
            "alpha_can": 0.07, "A_can": 0.55, "LAI": 4.1, "H_canopy": 14.2,
            "A_trunk_plan": 0.03, "A_trunk_vert": 0.06, "A_snow": 0.8,
            "Hsnow": 0.4, "A_soil": 0.17, "T_atm": 265.0, "T_deep": 271.0, "u": 1.8
        }"#;
        let p: SimulationParameters = serde_json::from_str(json).unwrap();
        assert_eq!(p.season, Season::Winter);
        assert_eq!(p.forest_type, ForestType::Coniferous);
        assert_eq!(p.a_can, Some(0.55));
        assert_eq!(p.h_snow, Some(0.4));
        assert_eq!(p.u, Some(1.8));
        assert!(p.has_snow());
        assert!(p.has_vegetation());
    }

    #[test]
    fn test_missing_numeric_fields_are_absent() {
        let json = r#"{"season": "summer", "forest_type": "none"}"#;
        let p: SimulationParameters = serde_json::from_str(json).unwrap();
        assert!(p.a_can.is_none());
        assert!(p.q_solar.is_none());
        assert_eq!(p.canopy_height(), 0.0);
        assert!(!p.has_vegetation());
        assert!(!p.has_snow());
    }

    #[test]
    fn test_null_fields_are_absent() {
        let json = r#"{"season": "summer", "forest_type": "deciduous", "Hsnow": null}"#;
        let p: SimulationParameters = serde_json::from_str(json).unwrap();
        assert!(p.h_snow.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let json = r#"{"season": "summer", "forest_type": "deciduous", "K_can": 0.1}"#;
        assert!(serde_json::from_str::<SimulationParameters>(json).is_ok());
    }

    #[test]
    fn test_none_forest_never_has_vegetation() {
        let mut p = SimulationParameters::new(Season::Summer, ForestType::None);
        p.h_canopy = Some(15.0);
        assert!(!p.has_vegetation());
    }

    #[test]
    fn test_snow_requires_area_and_depth() {
        let mut p = SimulationParameters::new(Season::Winter, ForestType::Deciduous);
        p.a_snow = Some(0.6);
        assert!(!p.has_snow(), "no depth means no snow");
        p.h_snow = Some(0.0);
        assert!(!p.has_snow());
        p.h_snow = Some(0.3);
        assert!(p.has_snow());
        p.a_snow = Some(0.0);
        assert!(!p.has_snow());
    }

    #[test]
    fn test_enabled_value_rejects_non_finite() {
        assert_eq!(enabled_value(None), 0.0);
        assert_eq!(enabled_value(Some(f32::NAN)), 0.0);
        assert_eq!(enabled_value(Some(0.4)), 0.4);
    }

    #[test]
    fn test_wire_keys_round_trip_through_serde() {
        for season in Season::ALL {
            let s = serde_json::to_string(&season).unwrap();
            assert_eq!(s, format!("\"{}\"", season.key()));
        }
        for forest in ForestType::ALL {
            let s = serde_json::to_string(&forest).unwrap();
            assert_eq!(s, format!("\"{}\"", forest.key()));
        }
    }
}
