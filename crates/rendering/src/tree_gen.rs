//! Procedural tree generator.
//!
//! Maps the site's biological parameters to one tree: a tapered trunk plus a
//! crown that is either a single cone (coniferous) or a cluster of sphere
//! blobs (deciduous). Every random draw comes from the injected generator, so
//! a seeded `ChaCha8Rng` reproduces the same tree.
//!
//! Callers must only ask for trees when
//! [`SimulationParameters::has_vegetation`] holds.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use scenario::{ForestType, Season, SimulationParameters};

use crate::color_ramps::ABSENT_GRAY;
use crate::shapes::{Part, Shape};

// =============================================================================
// Constants
// =============================================================================

pub const BARK: Color = Color::srgb(0.40, 0.26, 0.13);

pub const SIENNA: Color = Color::srgb(0.63, 0.32, 0.18);
pub const LIGHT_GREEN: Color = Color::srgb(0.42, 0.66, 0.25);
pub const MID_GREEN: Color = Color::srgb(0.24, 0.50, 0.17);
pub const CONIFER_WINTER: Color = Color::srgb(0.09, 0.27, 0.15);
pub const CONIFER_SUMMER: Color = Color::srgb(0.15, 0.40, 0.20);

/// Albedo above which (together with a dense canopy) summer leaves read light.
const BRIGHT_ALBEDO: f32 = 0.17;
const DENSE_LAI: f32 = 3.0;
/// Below this LAI a deciduous crown is drawn sparse, as in winter.
const SPARSE_LAI: f32 = 0.6;

const MIN_BLOBS: u32 = 3;
const MAX_BLOBS: u32 = 40;

/// Polar flattening: blobs crowd toward the crown's equator.
const POLAR_SQUASH: f32 = 0.7;

/// Where the cone's base sits, as a fraction of trunk height.
const CONE_BASE_FRACTION: f32 = 0.6;

const MIN_CONE_RESOLUTION: f32 = 8.0;
const MAX_CONE_RESOLUTION: f32 = 24.0;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrownKind {
    Cone,
    Blobs,
}

/// A generated tree. Parts are in local space with the origin at the base of
/// the trunk; `scale` is applied by the parent transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeUnit {
    pub crown: CrownKind,
    pub scale: Vec3,
    pub parts: Vec<Part>,
}

impl TreeUnit {
    pub fn trunk(&self) -> &Part {
        &self.parts[0]
    }

    pub fn crown_parts(&self) -> &[Part] {
        &self.parts[1..]
    }
}

// =============================================================================
// Pure helpers
// =============================================================================

/// Foliage color for the site's forest type, season and canopy properties.
pub fn foliage_color(params: &SimulationParameters) -> Color {
    match (params.forest_type, params.season) {
        (ForestType::Deciduous, Season::Winter) => SIENNA,
        (ForestType::Deciduous, Season::Summer) => {
            let bright = params.alpha_can.is_some_and(|a| a > BRIGHT_ALBEDO)
                && params.lai.is_some_and(|lai| lai > DENSE_LAI);
            if bright {
                LIGHT_GREEN
            } else {
                MID_GREEN
            }
        }
        (ForestType::Coniferous, Season::Winter) => CONIFER_WINTER,
        (ForestType::Coniferous, Season::Summer) => CONIFER_SUMMER,
        (ForestType::None, _) => ABSENT_GRAY,
    }
}

/// Whether a deciduous crown should be drawn thin.
fn sparse_crown(params: &SimulationParameters) -> bool {
    params.season == Season::Winter || params.leaf_area_index() < SPARSE_LAI
}

/// Number of crown blobs for a deciduous tree.
pub fn blob_count(params: &SimulationParameters) -> u32 {
    let lai = params.leaf_area_index();
    let raw = if sparse_crown(params) {
        3.0 + lai * 1.5
    } else {
        6.0 + lai * 4.0
    };
    (raw.round() as u32).clamp(MIN_BLOBS, MAX_BLOBS)
}

/// Cone tessellation grows with how slender the cone is.
pub fn cone_resolution(height: f32, radius: f32) -> u32 {
    let aspect = height / radius.max(1e-3);
    (8.0 + aspect * 2.0)
        .round()
        .clamp(MIN_CONE_RESOLUTION, MAX_CONE_RESOLUTION) as u32
}

// =============================================================================
// Generator
// =============================================================================

/// Generate one tree. `size_scale` multiplies the per-axis jitter.
pub fn generate_tree<R: Rng + ?Sized>(
    params: &SimulationParameters,
    size_scale: f32,
    rng: &mut R,
) -> TreeUnit {
    let h = params.canopy_height();
    let lai = params.leaf_area_index();

    let trunk_height = h * rng.gen_range(0.35..0.5);
    let crown_height = h * rng.gen_range(0.5..0.7);
    let crown_radius = h * rng.gen_range(0.18..0.28);

    let radius_bottom = 0.025 * h * (lai.max(0.1) / 4.0 + 0.1).sqrt();
    let radius_top = radius_bottom * rng.gen_range(0.5..0.75);

    let mut parts = Vec::with_capacity(1 + MAX_BLOBS as usize);
    parts.push(Part::standing(
        Shape::Frustum {
            radius_bottom,
            radius_top,
            height: trunk_height,
        },
        Vec3::ZERO,
        BARK,
    ));

    let foliage = foliage_color(params);
    let crown = if params.forest_type == ForestType::Coniferous {
        let radius = radius_bottom * rng.gen_range(5.0..8.0);
        let height = crown_height * rng.gen_range(1.1..1.4);
        parts.push(Part::standing(
            Shape::Cone {
                radius,
                height,
                resolution: cone_resolution(height, radius),
            },
            Vec3::Y * (trunk_height * CONE_BASE_FRACTION),
            foliage,
        ));
        CrownKind::Cone
    } else {
        let sparse = sparse_crown(params);
        let center_y = trunk_height + crown_height * 0.4;
        for _ in 0..blob_count(params) {
            let azimuth = rng.gen_range(0.0..TAU);
            let cos_polar = (1.0 - 2.0 * rng.gen::<f32>()) * POLAR_SQUASH;
            let sin_polar = (1.0 - cos_polar * cos_polar).sqrt();
            let reach = if sparse {
                rng.gen_range(0.5..1.0)
            } else {
                rng.gen_range(0.3..1.0)
            };
            let blob_radius = crown_radius
                * if sparse {
                    rng.gen_range(0.15..0.25)
                } else {
                    rng.gen_range(0.25..0.4)
                };

            let x = crown_radius * reach * sin_polar * azimuth.cos();
            let z = crown_radius * reach * sin_polar * azimuth.sin();
            let y = (center_y + crown_height * 0.5 * reach * cos_polar).max(trunk_height);

            parts.push(Part {
                shape: Shape::Sphere {
                    radius: blob_radius,
                },
                translation: Vec3::new(x, y, z),
                color: foliage,
            });
        }
        CrownKind::Blobs
    };

    let scale = Vec3::new(
        rng.gen_range(0.9..1.1),
        rng.gen_range(0.9..1.1),
        rng.gen_range(0.9..1.1),
    ) * size_scale;

    TreeUnit {
        crown,
        scale,
        parts,
    }
}
