//! Simulation data model, clients and the scenario controller.
//!
//! Everything here is renderer-agnostic: the rendering crate listens for
//! [`ScenarioApplied`] and the UI crate writes [`ScenarioControls`] and sends
//! [`RequestScenario`].

use std::sync::Arc;

use bevy::prelude::*;

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod parameters;
pub mod readouts;
pub mod records;
pub mod response;

pub use client::{
    client_from_config, ActiveClient, HttpClient, ReplayClient, ResponseInbox, ScenarioOutcome,
    ScriptedClient, SimulationClient,
};
pub use config::ScenarioConfig;
pub use controller::{
    poll_scenario_response, RequestScenario, ScenarioApplied, ScenarioControls,
    ScenarioController, ScenarioNotice, ScenarioPhase, StandConfig,
};
pub use error::ScenarioError;
pub use parameters::{ForestType, Season, SimulationParameters};
pub use readouts::{ReadoutLine, Readouts};
pub use records::{Component, FluxRecord, TemperatureRecord};
pub use response::{ScenarioData, SimulationRequest};

/// Ordering contract for systems that consume scenario results.
///
/// ```text
/// Dispatch  →  Collect  →  (rendering rebuild)
/// ```
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScenarioSet {
    /// Turns `RequestScenario` events into a request.
    Dispatch,
    /// Polls the inbox and emits `ScenarioApplied`.
    Collect,
}

pub struct ScenarioPlugin {
    client: Arc<dyn SimulationClient>,
    sample_on_startup: bool,
}

impl ScenarioPlugin {
    pub fn new(client: impl SimulationClient) -> Self {
        Self {
            client: Arc::new(client),
            sample_on_startup: true,
        }
    }

    /// Use the client described by `config` (replay file or HTTP endpoint).
    pub fn from_config(config: &ScenarioConfig) -> Self {
        Self {
            client: client_from_config(config),
            sample_on_startup: true,
        }
    }

    /// Do not request a sample when the app starts.
    pub fn without_startup_sample(mut self) -> Self {
        self.sample_on_startup = false;
        self
    }
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        info!("Scenario client: {}", self.client.describe());

        app.init_resource::<ScenarioControls>()
            .init_resource::<ScenarioController>()
            .init_resource::<ResponseInbox>()
            .init_resource::<Readouts>()
            .init_resource::<ScenarioNotice>()
            .insert_resource(ActiveClient(self.client.clone()))
            .add_event::<RequestScenario>()
            .add_event::<ScenarioApplied>()
            .configure_sets(Update, (ScenarioSet::Dispatch, ScenarioSet::Collect).chain())
            .add_systems(
                Update,
                (
                    controller::dispatch_scenario_request.in_set(ScenarioSet::Dispatch),
                    controller::poll_scenario_response.in_set(ScenarioSet::Collect),
                ),
            );

        if self.sample_on_startup {
            app.add_systems(Startup, request_initial_sample);
        }
    }
}

fn request_initial_sample(mut requests: EventWriter<RequestScenario>) {
    requests.send(RequestScenario);
}
