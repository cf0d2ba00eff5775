use bevy::prelude::*;

/// Simulation endpoint used when `CANOPY_FLUX_ENDPOINT` is not set.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/run_simulation";

/// Environment variable overriding the simulation endpoint.
pub const ENDPOINT_ENV: &str = "CANOPY_FLUX_ENDPOINT";
/// Environment variable naming a saved response JSON served instead of the network.
pub const REPLAY_ENV: &str = "CANOPY_FLUX_REPLAY";
/// Environment variable fixing the scene RNG seed.
pub const SEED_ENV: &str = "CANOPY_FLUX_SEED";

pub const MIN_TREE_COUNT: u32 = 1;
pub const MAX_TREE_COUNT: u32 = 25;
pub const DEFAULT_TREE_COUNT: u32 = 9;

pub const MIN_TREE_SPACING: f32 = 5.0;
pub const MAX_TREE_SPACING: f32 = 20.0;
pub const DEFAULT_TREE_SPACING: f32 = 10.0;

/// Flux terms whose magnitude is at or below this many W m-2 are not drawn.
pub const FLUX_DRAW_THRESHOLD: f32 = 1.0;

/// Readout marker for data that is legitimately absent.
pub const ABSENT_MARKER: &str = "—";
/// Readout marker written over every value after a failed cycle.
pub const ERROR_MARKER: &str = "Error";

/// Runtime configuration, read once at start-up.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    /// URL of the simulation endpoint.
    pub endpoint: String,
    /// When set, responses are read from this file instead of the network.
    pub replay_path: Option<String>,
    /// Fixed seed for scene generation; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            replay_path: None,
            seed: None,
        }
    }
}

impl ScenarioConfig {
    /// Build the configuration from the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// In the browser only the endpoint is configurable, via `?endpoint=`.
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        let endpoint = crate::client::query_endpoint();
        Self::from_lookup(move |key| {
            if key == ENDPOINT_ENV {
                endpoint.clone()
            } else {
                None
            }
        })
    }

    /// Build the configuration from an arbitrary key lookup. Blank values are
    /// treated as unset; an unparsable seed is ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = non_blank(ENDPOINT_ENV).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let replay_path = non_blank(REPLAY_ENV);
        let seed = non_blank(SEED_ENV).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                warn!("Ignoring {}='{}': {}", SEED_ENV, raw, e);
                None
            }
        });

        Self {
            endpoint,
            replay_path,
            seed,
        }
    }
}
