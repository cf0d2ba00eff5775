//! Seedable RNG resource for scene generation.
//!
//! Tree shapes, stand layout and solar glyph jitter all draw from this one
//! generator. With `CANOPY_FLUX_SEED` set, a given sequence of simulation
//! results always produces the same scenes.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Resource)]
pub struct SceneRng(pub ChaCha8Rng);

impl SceneRng {
    /// Seeded generator, or one drawn from OS entropy when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(ChaCha8Rng::seed_from_u64(seed)),
            None => Self(ChaCha8Rng::from_entropy()),
        }
    }
}
