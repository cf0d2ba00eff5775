//! The sample-and-rebuild cycle.
//!
//! ```text
//! Idle ──trigger──▶ Loading ──ok──▶ Idle
//!   ▲                  │
//!   └──trigger── Error ◀──failure
//! ```
//!
//! The controller is the only reader of [`ScenarioControls`]. It turns the
//! live selection into a [`SimulationRequest`] when a cycle starts and into a
//! [`StandConfig`] when the result is applied, so the builder and mapper only
//! ever see explicit values.

use bevy::prelude::*;

use crate::client::{ActiveClient, ResponseInbox, ScenarioOutcome};
use crate::config::{
    DEFAULT_TREE_COUNT, DEFAULT_TREE_SPACING, MAX_TREE_COUNT, MAX_TREE_SPACING, MIN_TREE_COUNT,
    MIN_TREE_SPACING,
};
use crate::error::ScenarioError;
use crate::parameters::{ForestType, Season};
use crate::readouts::Readouts;
use crate::response::{ScenarioData, SimulationRequest};

// =============================================================================
// Controls and stand configuration
// =============================================================================

/// Live user selection. Written by the UI, read only by the controller.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ScenarioControls {
    pub season: Season,
    pub forest_type: ForestType,
    pub tree_count: u32,
    pub tree_spacing: f32,
}

impl Default for ScenarioControls {
    fn default() -> Self {
        Self {
            season: Season::default(),
            forest_type: ForestType::default(),
            tree_count: DEFAULT_TREE_COUNT,
            tree_spacing: DEFAULT_TREE_SPACING,
        }
    }
}

impl ScenarioControls {
    pub fn request(&self) -> SimulationRequest {
        SimulationRequest {
            season: self.season,
            forest_type: self.forest_type,
        }
    }

    pub fn stand(&self) -> StandConfig {
        StandConfig::new(self.tree_count, self.tree_spacing)
    }
}

/// Secondary-stand layout passed to the column builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandConfig {
    /// Number of additional trees, at least one.
    pub tree_count: u32,
    /// Grid cell size in scene units.
    pub spacing: f32,
}

impl StandConfig {
    /// Clamp a raw selection into the supported ranges.
    pub fn new(tree_count: u32, spacing: f32) -> Self {
        let spacing = if spacing.is_finite() {
            spacing.clamp(MIN_TREE_SPACING, MAX_TREE_SPACING)
        } else {
            DEFAULT_TREE_SPACING
        };
        Self {
            tree_count: tree_count.clamp(MIN_TREE_COUNT, MAX_TREE_COUNT),
            spacing,
        }
    }
}

impl Default for StandConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TREE_COUNT, DEFAULT_TREE_SPACING)
    }
}

// =============================================================================
// State machine
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenarioPhase {
    #[default]
    Idle,
    Loading,
    Error,
}

/// Result of feeding an outcome to the controller.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The response should be applied to the scene.
    Applied(ScenarioApplied),
    /// The cycle failed; the scene stays as it was.
    Failed(ScenarioError),
    /// No cycle was in flight.
    Ignored,
}

#[derive(Resource, Debug, Default)]
pub struct ScenarioController {
    phase: ScenarioPhase,
    completed_cycles: u64,
}

impl ScenarioController {
    pub fn phase(&self) -> ScenarioPhase {
        self.phase
    }

    /// Whether a new cycle may start.
    pub fn can_trigger(&self) -> bool {
        self.phase != ScenarioPhase::Loading
    }

    /// Number of cycles that ended, successfully or not.
    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    /// Start a cycle. Returns `None` while a request is already in flight.
    pub fn begin(&mut self, controls: &ScenarioControls) -> Option<SimulationRequest> {
        if !self.can_trigger() {
            return None;
        }
        self.phase = ScenarioPhase::Loading;
        Some(controls.request())
    }

    /// Finish the in-flight cycle with `outcome`. The stand layout is taken
    /// from the controls as they are now.
    pub fn complete(&mut self, outcome: ScenarioOutcome, controls: &ScenarioControls) -> CycleOutcome {
        if self.phase != ScenarioPhase::Loading {
            return CycleOutcome::Ignored;
        }
        self.completed_cycles += 1;
        match outcome {
            Ok(data) => {
                self.phase = ScenarioPhase::Idle;
                CycleOutcome::Applied(ScenarioApplied {
                    data,
                    stand: controls.stand(),
                })
            }
            Err(e) => {
                self.phase = ScenarioPhase::Error;
                CycleOutcome::Failed(e)
            }
        }
    }
}

// =============================================================================
// Events and resources
// =============================================================================

/// Ask for a new simulation sample. Ignored while one is loading.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RequestScenario;

/// A complete response ready to be turned into a scene.
#[derive(Event, Debug, Clone)]
pub struct ScenarioApplied {
    pub data: ScenarioData,
    pub stand: StandConfig,
}

/// User-visible error notice from the last failed cycle.
#[derive(Resource, Debug, Default)]
pub struct ScenarioNotice {
    pub message: Option<String>,
}

impl ScenarioNotice {
    pub fn dismiss(&mut self) {
        self.message = None;
    }
}

// =============================================================================
// Systems
// =============================================================================

/// Start a cycle when requested. Several requests in one frame count as one.
pub fn dispatch_scenario_request(
    mut requests: EventReader<RequestScenario>,
    controls: Res<ScenarioControls>,
    mut controller: ResMut<ScenarioController>,
    client: Res<ActiveClient>,
    inbox: Res<ResponseInbox>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let Some(request) = controller.begin(&controls) else {
        debug!("Simulation request ignored: a sample is already loading");
        return;
    };
    info!(
        "Requesting simulation ({}, {}) via {}",
        request.season.key(),
        request.forest_type.key(),
        client.0.describe()
    );
    client.0.dispatch(request, inbox.clone());
}

/// Collect a finished request and either publish it or flag the failure.
pub fn poll_scenario_response(
    inbox: Res<ResponseInbox>,
    controls: Res<ScenarioControls>,
    mut controller: ResMut<ScenarioController>,
    mut readouts: ResMut<Readouts>,
    mut notice: ResMut<ScenarioNotice>,
    mut applied: EventWriter<ScenarioApplied>,
) {
    let Some(outcome) = inbox.take() else {
        return;
    };

    match controller.complete(outcome, &controls) {
        CycleOutcome::Applied(event) => {
            *readouts = Readouts::from_data(&event.data);
            notice.dismiss();
            applied.send(event);
        }
        CycleOutcome::Failed(e) => {
            error!("Simulation request failed: {}", e);
            *readouts = Readouts::error();
            notice.message = Some(e.to_string());
        }
        CycleOutcome::Ignored => {
            warn!("Discarding simulation response that arrived with no request in flight");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::SimulationParameters;

    fn data() -> ScenarioData {
        ScenarioData {
            parameters: SimulationParameters::new(Season::Winter, ForestType::Coniferous),
            temperatures: Default::default(),
            fluxes: Default::default(),
        }
    }

    #[test]
    fn test_stand_config_clamps() {
        assert_eq!(StandConfig::new(0, 1.0), StandConfig { tree_count: 1, spacing: 5.0 });
        assert_eq!(StandConfig::new(99, 50.0), StandConfig { tree_count: 25, spacing: 20.0 });
        assert_eq!(StandConfig::new(4, f32::NAN).spacing, DEFAULT_TREE_SPACING);
    }

    #[test]
    fn test_begin_refuses_while_loading() {
        let mut c = ScenarioController::default();
        let controls = ScenarioControls {
            season: Season::Winter,
            forest_type: ForestType::None,
            ..Default::default()
        };
        let req = c.begin(&controls).unwrap();
        assert_eq!(req.season, Season::Winter);
        assert_eq!(req.forest_type, ForestType::None);
        assert_eq!(c.phase(), ScenarioPhase::Loading);
        assert!(c.begin(&controls).is_none());
        assert_eq!(c.phase(), ScenarioPhase::Loading);
    }

    #[test]
    fn test_success_returns_to_idle_with_current_stand() {
        let mut c = ScenarioController::default();
        let mut controls = ScenarioControls::default();
        c.begin(&controls);
        controls.tree_count = 16;
        match c.complete(Ok(data()), &controls) {
            CycleOutcome::Applied(event) => assert_eq!(event.stand.tree_count, 16),
            other => panic!("expected Applied, got {other:?}"),
        }
        assert_eq!(c.phase(), ScenarioPhase::Idle);
        assert_eq!(c.completed_cycles(), 1);
    }

    #[test]
    fn test_failure_enters_error_and_allows_retry() {
        let mut c = ScenarioController::default();
        let controls = ScenarioControls::default();
        c.begin(&controls);
        let outcome = c.complete(Err(ScenarioError::Transport("refused".into())), &controls);
        assert!(matches!(outcome, CycleOutcome::Failed(_)));
        assert_eq!(c.phase(), ScenarioPhase::Error);
        assert!(c.can_trigger());
        assert!(c.begin(&controls).is_some());
    }

    #[test]
    fn test_outcome_without_request_is_ignored() {
        let mut c = ScenarioController::default();
        let outcome = c.complete(Ok(data()), &ScenarioControls::default());
        assert!(matches!(outcome, CycleOutcome::Ignored));
        assert_eq!(c.phase(), ScenarioPhase::Idle);
        assert_eq!(c.completed_cycles(), 0);
    }
}
