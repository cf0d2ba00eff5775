//! Temperature and flux records keyed by energy-balance component.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A node of the four-node energy balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    Canopy,
    Trunk,
    Snow,
    Soil,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::Canopy,
        Component::Trunk,
        Component::Snow,
        Component::Soil,
    ];

    /// Key used in the simulation's JSON records.
    pub fn key(self) -> &'static str {
        match self {
            Component::Canopy => "canopy",
            Component::Trunk => "trunk",
            Component::Snow => "snow",
            Component::Soil => "soil",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Component::Canopy => "Canopy",
            Component::Trunk => "Trunk",
            Component::Snow => "Snow",
            Component::Soil => "Soil",
        }
    }
}

/// Solved component temperatures in K. A `None` entry means the component
/// does not exist in this scenario and is left uncolored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    #[serde(default)]
    pub canopy: Option<f32>,
    #[serde(default)]
    pub trunk: Option<f32>,
    #[serde(default)]
    pub snow: Option<f32>,
    #[serde(default)]
    pub soil: Option<f32>,
    /// Air temperature echoed by the simulation.
    #[serde(default)]
    pub air: Option<f32>,
}

impl TemperatureRecord {
    pub fn get(&self, component: Component) -> Option<f32> {
        let value = match component {
            Component::Canopy => self.canopy,
            Component::Trunk => self.trunk,
            Component::Snow => self.snow,
            Component::Soil => self.soil,
        };
        value.filter(|v| v.is_finite())
    }
}

/// Name of the per-component balance term that is reported but never drawn.
pub const NET_TERM: &str = "net";

/// Averaged flux terms per component, in W m-2.
///
/// The key set is open: the mapper reads the terms it knows and ignores the
/// rest, so new terms from the simulation are harmless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FluxRecord(pub BTreeMap<String, BTreeMap<String, f32>>);

impl FluxRecord {
    /// Look up one term. Returns `None` when the component or term is absent
    /// or the value is not finite.
    pub fn get(&self, component: Component, term: &str) -> Option<f32> {
        self.0
            .get(component.key())
            .and_then(|terms| terms.get(term))
            .copied()
            .filter(|v| v.is_finite())
    }

    /// Whether the simulation reported anything for this component.
    pub fn has_component(&self, component: Component) -> bool {
        self.0
            .get(component.key())
            .is_some_and(|terms| !terms.is_empty())
    }

    /// The component's net balance, if reported.
    pub fn net(&self, component: Component) -> Option<f32> {
        self.get(component, NET_TERM)
    }

    /// Insert a term, creating the component entry when needed.
    pub fn insert(&mut self, component: Component, term: &str, value: f32) {
        self.0
            .entry(component.key().to_string())
            .or_default()
            .insert(term.to_string(), value);
    }

    /// Builder-style variant of [`FluxRecord::insert`].
    pub fn with(mut self, component: Component, term: &str, value: f32) -> Self {
        self.insert(component, term, value);
        self
    }
}
