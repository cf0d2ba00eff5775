//! Scene slots and the rebuild system.
//!
//! The 3D scene is an arena of named slots. Every applied simulation result
//! clears every slot except the ground and refills them from a freshly built
//! [`ColumnScene`] and [`GlyphSet`]. The ground plane is spawned once and
//! only recolored afterwards.
//!
//! Glyph visibility is driven by [`CategoryFilter`] alone and is reapplied
//! whenever the filter changes, without touching any geometry.

use bevy::prelude::*;

use scenario::{ScenarioApplied, ScenarioConfig, ScenarioSet};

use crate::camera::OrbitCamera;
use crate::column::{build_column, ColumnScene, PlacedTree};
use crate::flux_glyphs::{glyph_visible, map_fluxes, CategoryFilter, FluxCategory, Glyph, GlyphSet};
use crate::scene_rng::SceneRng;
use crate::shapes::{Part, Shape};

// =============================================================================
// Components
// =============================================================================

/// The slot an entity belongs to. Only slot roots carry this.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSlot {
    Ground,
    Snow,
    Trunk,
    Stand,
    SecondaryStand,
    Glyphs,
}

/// Root entity of one arrow glyph.
#[derive(Component, Debug, Clone, Copy)]
pub struct FluxGlyph {
    pub category: FluxCategory,
}

// =============================================================================
// Resources
// =============================================================================

/// What the last rebuild produced.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct SceneSummary {
    pub rebuilds: u32,
    pub trees: usize,
    pub glyphs: usize,
    pub has_snow: bool,
    pub has_trunk: bool,
}

// =============================================================================
// Spawning helpers
// =============================================================================

fn material_for(materials: &mut Assets<StandardMaterial>, color: Color) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: color,
        perceptual_roughness: 0.85,
        ..default()
    })
}

fn part_bundle(
    part: &Part,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> (Mesh3d, MeshMaterial3d<StandardMaterial>, Transform) {
    (
        Mesh3d(meshes.add(part.shape.mesh())),
        MeshMaterial3d(material_for(materials, part.color)),
        Transform::from_translation(part.translation),
    )
}

fn spawn_part(
    commands: &mut Commands,
    slot: SceneSlot,
    part: &Part,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((part_bundle(part, meshes, materials), slot));
}

fn spawn_tree(
    commands: &mut Commands,
    slot: SceneSlot,
    tree: &PlacedTree,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands
        .spawn((
            Transform::from_translation(tree.position).with_scale(tree.unit.scale),
            Visibility::default(),
            slot,
        ))
        .with_children(|parent| {
            for part in &tree.unit.parts {
                parent.spawn(part_bundle(part, meshes, materials));
            }
        });
}

fn spawn_glyph(
    commands: &mut Commands,
    glyph: &Glyph,
    visible: bool,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let material = materials.add(StandardMaterial {
        base_color: glyph.color,
        unlit: true,
        ..default()
    });
    let shaft = Shape::Cylinder {
        radius: glyph.shaft_radius(),
        height: glyph.shaft_length,
    };
    let head = Shape::Cone {
        radius: glyph.head_radius,
        height: glyph.head_length,
        resolution: 12,
    };
    let visibility = if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };

    commands
        .spawn((
            Transform::from_translation(glyph.origin)
                .with_rotation(Quat::from_rotation_arc(Vec3::Y, glyph.direction)),
            visibility,
            SceneSlot::Glyphs,
            FluxGlyph {
                category: glyph.category,
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(shaft.mesh())),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(0.0, glyph.shaft_length * 0.5, 0.0),
            ));
            parent.spawn((
                Mesh3d(meshes.add(head.mesh())),
                MeshMaterial3d(material),
                Transform::from_xyz(0.0, glyph.shaft_length + glyph.head_length * 0.5, 0.0),
            ));
        });
}

// =============================================================================
// Systems
// =============================================================================

/// Rebuild every slot from the latest applied result. Several results in one
/// frame collapse to the newest.
#[allow(clippy::too_many_arguments)]
pub fn rebuild_scene(
    mut commands: Commands,
    mut applied: EventReader<ScenarioApplied>,
    slots: Query<(Entity, &SceneSlot)>,
    ground: Query<&MeshMaterial3d<StandardMaterial>, With<SceneSlot>>,
    filter: Res<CategoryFilter>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rng: ResMut<SceneRng>,
    mut orbit: ResMut<OrbitCamera>,
    mut summary: ResMut<SceneSummary>,
) {
    let Some(event) = applied.read().last() else {
        return;
    };

    let column: ColumnScene = build_column(&event.data, &event.stand, &mut rng.0);
    let glyphs: GlyphSet = map_fluxes(&event.data.fluxes, &event.data.parameters, &mut rng.0);

    let mut ground_entity = None;
    for (entity, slot) in &slots {
        if *slot == SceneSlot::Ground {
            ground_entity = Some(entity);
        } else {
            commands.entity(entity).despawn_recursive();
        }
    }

    let mut recolored = false;
    if let Some(handle) = ground_entity.and_then(|entity| ground.get(entity).ok()) {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.base_color = column.ground.color;
            recolored = true;
        }
    }
    if !recolored {
        spawn_part(
            &mut commands,
            SceneSlot::Ground,
            &column.ground,
            &mut meshes,
            &mut materials,
        );
    }

    if let Some(snow) = &column.snow {
        spawn_part(&mut commands, SceneSlot::Snow, snow, &mut meshes, &mut materials);
    }
    if let Some(trunk) = &column.trunk {
        spawn_part(&mut commands, SceneSlot::Trunk, trunk, &mut meshes, &mut materials);
    }
    for tree in &column.primary_stand {
        spawn_tree(&mut commands, SceneSlot::Stand, tree, &mut meshes, &mut materials);
    }
    for tree in &column.secondary_stand {
        spawn_tree(
            &mut commands,
            SceneSlot::SecondaryStand,
            tree,
            &mut meshes,
            &mut materials,
        );
    }
    for glyph in &glyphs.glyphs {
        let visible = glyph_visible(&filter, glyph.category);
        spawn_glyph(&mut commands, glyph, visible, &mut meshes, &mut materials);
    }

    orbit.focus = column.view_target;

    summary.rebuilds += 1;
    summary.trees = column.tree_count();
    summary.glyphs = glyphs.len();
    summary.has_snow = column.snow.is_some();
    summary.has_trunk = column.trunk.is_some();

    info!(
        "Scene rebuilt: {} trees, {} glyphs, snow: {}, trunk: {}",
        summary.trees, summary.glyphs, summary.has_snow, summary.has_trunk
    );
}

/// Show or hide glyphs after the category filter changed.
pub fn apply_category_filter(
    filter: Res<CategoryFilter>,
    mut glyphs: Query<(&FluxGlyph, &mut Visibility)>,
) {
    for (glyph, mut visibility) in &mut glyphs {
        *visibility = if glyph_visible(&filter, glyph.category) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

// =============================================================================
// Plugin
// =============================================================================

/// Scene slots, rebuild and filter systems. Needs no window or renderer, only
/// mesh and material asset storage.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        let seed = app
            .world()
            .get_resource::<ScenarioConfig>()
            .and_then(|config| config.seed);
        if let Some(seed) = seed {
            info!("Scene RNG seeded with {}", seed);
        }

        app.insert_resource(SceneRng::new(seed))
            .init_resource::<CategoryFilter>()
            .init_resource::<SceneSummary>()
            .init_resource::<OrbitCamera>()
            .add_systems(
                Update,
                (
                    rebuild_scene.after(ScenarioSet::Collect),
                    apply_category_filter
                        .after(rebuild_scene)
                        .run_if(resource_changed::<CategoryFilter>),
                ),
            );
    }
}
