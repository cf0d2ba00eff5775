//! Text readouts of the latest simulation record.
//!
//! Absent data reads `—`; after a failed cycle every value reads `Error` so
//! the two cases never look alike.

use bevy::prelude::*;

use crate::config::{ABSENT_MARKER, ERROR_MARKER};
use crate::parameters::SimulationParameters;
use crate::records::{Component, FluxRecord, TemperatureRecord};
use crate::response::ScenarioData;

/// One `label: value` line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutLine {
    pub label: &'static str,
    pub value: String,
}

impl ReadoutLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }

    pub fn text(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

const AIR_LABEL: &str = "Air";

const PARAMETER_LABELS: [&str; 15] = [
    "Season",
    "Forest",
    "Canopy cover",
    "Trunk plan area",
    "Trunk side area",
    "Snow cover",
    "Soil cover",
    "LAI",
    "Canopy height",
    "Snow depth",
    "Canopy albedo",
    "Air temperature",
    "Deep soil",
    "Solar",
    "Wind",
];

const NET_LABELS: [&str; 4] = ["Canopy net", "Trunk net", "Snow net", "Soil net"];

/// All readout lines, grouped the way the panel shows them.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Readouts {
    pub temperatures: Vec<ReadoutLine>,
    pub parameters: Vec<ReadoutLine>,
    pub net_fluxes: Vec<ReadoutLine>,
}

impl Default for Readouts {
    fn default() -> Self {
        Self::filled(ABSENT_MARKER)
    }
}

fn fmt_opt(value: Option<f32>, format: impl Fn(f32) -> String) -> String {
    match value {
        Some(v) if v.is_finite() => format(v),
        _ => ABSENT_MARKER.to_string(),
    }
}

fn kelvin(v: f32) -> String {
    format!("{v:.1} K")
}

fn percent(v: f32) -> String {
    format!("{:.0} %", v * 100.0)
}

fn temperature_lines(t: &TemperatureRecord) -> Vec<ReadoutLine> {
    let mut lines: Vec<ReadoutLine> = Component::ALL
        .iter()
        .map(|&c| ReadoutLine::new(c.label(), fmt_opt(t.get(c), kelvin)))
        .collect();
    lines.push(ReadoutLine::new(AIR_LABEL, fmt_opt(t.air, kelvin)));
    lines
}

fn parameter_lines(p: &SimulationParameters) -> Vec<ReadoutLine> {
    let values = [
        p.season.label().to_string(),
        p.forest_type.label().to_string(),
        fmt_opt(p.a_can, percent),
        fmt_opt(p.a_trunk_plan, |v| format!("{v:.3}")),
        fmt_opt(p.a_trunk_vert, |v| format!("{v:.3}")),
        fmt_opt(p.a_snow, percent),
        fmt_opt(p.a_soil, percent),
        fmt_opt(p.lai, |v| format!("{v:.2}")),
        fmt_opt(p.h_canopy, |v| format!("{v:.1} m")),
        fmt_opt(p.h_snow, |v| format!("{v:.2} m")),
        fmt_opt(p.alpha_can, |v| format!("{v:.2}")),
        fmt_opt(p.t_atm, kelvin),
        fmt_opt(p.t_deep, kelvin),
        fmt_opt(p.q_solar, |v| format!("{v:.0} W/m²")),
        fmt_opt(p.u, |v| format!("{v:.1} m/s")),
    ];
    PARAMETER_LABELS
        .iter()
        .zip(values)
        .map(|(&label, value)| ReadoutLine::new(label, value))
        .collect()
}

fn net_lines(f: &FluxRecord) -> Vec<ReadoutLine> {
    Component::ALL
        .iter()
        .zip(NET_LABELS)
        .map(|(&c, label)| ReadoutLine::new(label, fmt_opt(f.net(c), |v| format!("{v:+.1} W/m²"))))
        .collect()
}

impl Readouts {
    pub fn from_data(data: &ScenarioData) -> Self {
        Self {
            temperatures: temperature_lines(&data.temperatures),
            parameters: parameter_lines(&data.parameters),
            net_fluxes: net_lines(&data.fluxes),
        }
    }

    /// Every line with the error marker in place of its value.
    pub fn error() -> Self {
        Self::filled(ERROR_MARKER)
    }

    fn filled(marker: &str) -> Self {
        let fill = |labels: &[&'static str]| -> Vec<ReadoutLine> {
            labels
                .iter()
                .map(|&label| ReadoutLine::new(label, marker))
                .collect()
        };
        let mut temperature_labels: Vec<&'static str> =
            Component::ALL.iter().map(|c| c.label()).collect();
        temperature_labels.push(AIR_LABEL);
        Self {
            temperatures: fill(&temperature_labels),
            parameters: fill(&PARAMETER_LABELS),
            net_fluxes: fill(&NET_LABELS),
        }
    }

    /// All lines in display order.
    pub fn lines(&self) -> impl Iterator<Item = &ReadoutLine> {
        self.temperatures
            .iter()
            .chain(&self.parameters)
            .chain(&self.net_fluxes)
    }

    /// Value shown for `label`, if such a line exists.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines()
            .find(|line| line.label == label)
            .map(|line| line.value.as_str())
    }

    pub fn is_error(&self) -> bool {
        self.lines().all(|line| line.value == ERROR_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{ForestType, Season};

    fn sample() -> ScenarioData {
        let mut parameters = SimulationParameters::new(Season::Summer, ForestType::Coniferous);
        parameters.a_can = Some(0.7);
        parameters.h_canopy = Some(15.0);
        parameters.q_solar = Some(600.0);
        ScenarioData {
            parameters,
            temperatures: TemperatureRecord {
                canopy: Some(305.0),
                trunk: Some(300.0),
                snow: None,
                soil: Some(299.0),
                air: Some(298.0),
            },
            fluxes: FluxRecord::default().with(Component::Canopy, "net", -2.5),
        }
    }

    #[test]
    fn test_temperature_lines() {
        let r = Readouts::from_data(&sample());
        let texts: Vec<String> = r.temperatures.iter().map(|l| l.text()).collect();
        assert!(texts.contains(&"Canopy: 305.0 K".to_string()), "{texts:?}");
        assert!(texts.contains(&"Snow: —".to_string()), "{texts:?}");
        assert_eq!(r.value("Air"), Some("298.0 K"));
    }

    #[test]
    fn test_parameter_lines() {
        let r = Readouts::from_data(&sample());
        assert_eq!(r.value("Forest"), Some("Coniferous"));
        assert_eq!(r.value("Canopy cover"), Some("70 %"));
        assert_eq!(r.value("Canopy height"), Some("15.0 m"));
        assert_eq!(r.value("Solar"), Some("600 W/m²"));
        assert_eq!(r.value("Snow depth"), Some(ABSENT_MARKER));
    }

    #[test]
    fn test_net_flux_lines() {
        let r = Readouts::from_data(&sample());
        assert_eq!(r.value("Canopy net"), Some("-2.5 W/m²"));
        assert_eq!(r.value("Soil net"), Some(ABSENT_MARKER));
    }

    #[test]
    fn test_error_keeps_labels_and_replaces_values() {
        let ok = Readouts::from_data(&sample());
        let err = Readouts::error();
        assert!(err.is_error());
        assert!(!ok.is_error());
        let ok_labels: Vec<_> = ok.lines().map(|l| l.label).collect();
        let err_labels: Vec<_> = err.lines().map(|l| l.label).collect();
        assert_eq!(ok_labels, err_labels);
    }

    #[test]
    fn test_default_is_absent_not_error() {
        let r = Readouts::default();
        assert!(!r.is_error());
        assert!(r.lines().all(|l| l.value == ABSENT_MARKER));
    }
}
