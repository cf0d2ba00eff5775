//! Column/stand builder.
//!
//! Turns one simulation result into a full [`ColumnScene`]: ground, snow
//! volume, central trunk, the primary stand whose density follows the canopy
//! fraction, and the user-sized secondary stand laid out on a grid. The
//! builder never fails; features whose inputs are absent or zero are simply
//! left out.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use rand::Rng;

use scenario::parameters::enabled_value;
use scenario::{Component, ScenarioData, SimulationParameters, StandConfig};

use crate::color_ramps::color_for;
use crate::shapes::{Part, Shape};
use crate::tree_gen::{generate_tree, TreeUnit};

// =============================================================================
// Constants
// =============================================================================

/// Full side length of the ground plane.
pub const GROUND_SIZE: f32 = 40.0;
/// Side of a snow volume covering the whole non-canopy area.
pub const SNOW_MAX_SIDE: f32 = 19.0;
const AREA_EPSILON: f32 = 1e-6;

const TRUNK_MIN_RADIUS: f32 = 0.1;
const TRUNK_MAX_RADIUS: f32 = 2.0;

/// Primary trees per unit of canopy fraction.
const TREES_PER_CANOPY: f32 = 30.0;
/// Primary ring radius per sqrt(canopy fraction).
const RING_RADIUS_SCALE: f32 = 5.0;
/// Angular jitter of ring positions, as a fraction of one slot.
const RING_JITTER: f32 = 0.35;
/// Products within this many ulps of an integer count as that integer.
const COUNT_ULPS: f32 = 4.0;

/// Camera focus height when there is no canopy to look at.
pub const FALLBACK_VIEW_HEIGHT: f32 = 5.0;

// =============================================================================
// Scene description
// =============================================================================

/// A generated tree placed in the column.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTree {
    pub position: Vec3,
    pub unit: TreeUnit,
}

/// Everything the scene needs for one simulation result.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScene {
    pub ground: Part,
    pub snow: Option<Part>,
    pub trunk: Option<Part>,
    pub primary_stand: Vec<PlacedTree>,
    pub secondary_stand: Vec<PlacedTree>,
    pub view_target: Vec3,
}

impl ColumnScene {
    pub fn tree_count(&self) -> usize {
        self.primary_stand.len() + self.secondary_stand.len()
    }
}

// =============================================================================
// Pure helpers
// =============================================================================

/// Side of the snow volume: its share of the ground not under canopy.
pub fn snow_side(a_snow: f32, a_soil: f32) -> f32 {
    SNOW_MAX_SIDE * (a_snow / (a_snow + a_soil + AREA_EPSILON)).max(0.0).sqrt()
}

/// Radius of the central trunk for a trunk plan-area fraction.
pub fn trunk_radius(a_trunk_plan: f32) -> f32 {
    (a_trunk_plan * 100.0 / PI)
        .max(0.0)
        .sqrt()
        .clamp(TRUNK_MIN_RADIUS, TRUNK_MAX_RADIUS)
}

/// Primary stand size for a canopy fraction.
pub fn primary_tree_count(a_can: f32) -> usize {
    let raw = a_can * TREES_PER_CANOPY;
    let nearest = raw.round();
    let count = if (raw - nearest).abs() <= nearest.abs() * COUNT_ULPS * f32::EPSILON {
        nearest
    } else {
        raw.floor()
    };
    (count.max(0.0) as usize).max(1)
}

/// Cell centers for `count` trees on a centered square grid with the middle
/// cell left free for the central trunk.
pub fn secondary_positions(count: u32, spacing: f32) -> Vec<Vec3> {
    let count = count.max(1) as usize;
    let mut side = (count as f32).sqrt().ceil() as usize;
    // An odd grid loses its center cell; grow it if that leaves too few.
    if side % 2 == 1 && side * side < count + 1 {
        side += 1;
    }

    let half = (side as f32 - 1.0) * 0.5;
    let center = (side % 2 == 1).then_some(side / 2);

    let mut positions = Vec::with_capacity(count);
    'rows: for row in 0..side {
        for col in 0..side {
            if center == Some(row) && center == Some(col) {
                continue;
            }
            positions.push(Vec3::new(
                (col as f32 - half) * spacing,
                0.0,
                (row as f32 - half) * spacing,
            ));
            if positions.len() == count {
                break 'rows;
            }
        }
    }
    positions
}

/// Camera focus for the column.
pub fn view_target(params: &SimulationParameters) -> Vec3 {
    let h = params.canopy_height();
    if h > 0.0 {
        Vec3::new(0.0, h * 0.5, 0.0)
    } else {
        Vec3::new(0.0, FALLBACK_VIEW_HEIGHT, 0.0)
    }
}

/// Ground plane colored by the soil temperature.
pub fn ground_part(data: &ScenarioData) -> Part {
    Part::standing(
        Shape::Plane {
            size: Vec2::splat(GROUND_SIZE),
        },
        Vec3::ZERO,
        surface_color(data, Component::Soil),
    )
}

fn surface_color(data: &ScenarioData, component: Component) -> Color {
    color_for(data.temperatures.get(component), data.parameters.t_atm)
}

// =============================================================================
// Builder
// =============================================================================

/// Build the column for `data`, sizing the secondary stand from `stand`.
pub fn build_column<R: Rng + ?Sized>(
    data: &ScenarioData,
    stand: &StandConfig,
    rng: &mut R,
) -> ColumnScene {
    let params = &data.parameters;
    let h = params.canopy_height();
    let a_can = enabled_value(params.a_can);
    let a_trunk = enabled_value(params.a_trunk_plan);

    let snow = params.has_snow().then(|| {
        let depth = enabled_value(params.h_snow);
        let side = snow_side(enabled_value(params.a_snow), enabled_value(params.a_soil));
        Part::standing(
            Shape::Cuboid {
                size: Vec3::new(side, depth, side),
            },
            Vec3::ZERO,
            surface_color(data, Component::Snow),
        )
    });

    let trunk = (params.has_vegetation() && a_trunk > 0.0).then(|| {
        Part::standing(
            Shape::Cylinder {
                radius: trunk_radius(a_trunk),
                height: h,
            },
            Vec3::ZERO,
            surface_color(data, Component::Trunk),
        )
    });

    let mut primary_stand = Vec::new();
    if params.has_vegetation() && a_can > 0.0 {
        let n = primary_tree_count(a_can);
        let slot = TAU / n as f32;
        let max_radius = RING_RADIUS_SCALE * a_can.sqrt();
        for i in 0..n {
            let angle = i as f32 * slot + rng.gen_range(-RING_JITTER..RING_JITTER) * slot;
            let radius = rng.gen_range(0.0..=max_radius);
            let position = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
            primary_stand.push(PlacedTree {
                position,
                unit: generate_tree(params, 1.0, rng),
            });
        }
    }

    let mut secondary_stand = Vec::new();
    if params.has_vegetation() {
        for position in secondary_positions(stand.tree_count, stand.spacing) {
            let size_scale = rng.gen_range(0.9..1.1);
            secondary_stand.push(PlacedTree {
                position,
                unit: generate_tree(params, size_scale, rng),
            });
        }
    }

    ColumnScene {
        ground: ground_part(data),
        snow,
        trunk,
        primary_stand,
        secondary_stand,
        view_target: view_target(params),
    }
}
