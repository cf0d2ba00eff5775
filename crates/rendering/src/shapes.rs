//! Renderer-independent description of scene primitives.
//!
//! The generators produce [`Part`]s; only the scene sync system turns them
//! into meshes. This keeps geometry construction testable without a render
//! world.

use bevy::prelude::*;

/// Sphere tessellation used for crown blobs.
const SPHERE_SECTORS: u32 = 12;
const SPHERE_STACKS: u32 = 8;
/// Angular resolution for trunks and arrow shafts.
const ROUND_RESOLUTION: u32 = 12;

/// A primitive, centered on its own origin the way Bevy's primitives are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Horizontal plane of the given full extent.
    Plane { size: Vec2 },
    Cuboid { size: Vec3 },
    Cylinder { radius: f32, height: f32 },
    /// Tapered cylinder.
    Frustum {
        radius_bottom: f32,
        radius_top: f32,
        height: f32,
    },
    Cone {
        radius: f32,
        height: f32,
        resolution: u32,
    },
    Sphere { radius: f32 },
}

impl Shape {
    /// Vertical extent of the primitive.
    pub fn height(&self) -> f32 {
        match *self {
            Shape::Plane { .. } => 0.0,
            Shape::Cuboid { size } => size.y,
            Shape::Cylinder { height, .. }
            | Shape::Frustum { height, .. }
            | Shape::Cone { height, .. } => height,
            Shape::Sphere { radius } => 2.0 * radius,
        }
    }

    pub fn mesh(&self) -> Mesh {
        match *self {
            Shape::Plane { size } => Plane3d::new(Vec3::Y, size * 0.5).into(),
            Shape::Cuboid { size } => Cuboid::from_size(size).into(),
            Shape::Cylinder { radius, height } => Cylinder::new(radius, height)
                .mesh()
                .resolution(ROUND_RESOLUTION)
                .build(),
            Shape::Frustum {
                radius_bottom,
                radius_top,
                height,
            } => ConicalFrustum {
                radius_top,
                radius_bottom,
                height,
            }
            .mesh()
            .resolution(ROUND_RESOLUTION)
            .build(),
            Shape::Cone {
                radius,
                height,
                resolution,
            } => Cone { radius, height }.mesh().resolution(resolution).build(),
            Shape::Sphere { radius } => Sphere::new(radius)
                .mesh()
                .uv(SPHERE_SECTORS, SPHERE_STACKS),
        }
    }
}

/// One colored primitive placed relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    pub shape: Shape,
    /// Center of the primitive.
    pub translation: Vec3,
    pub color: Color,
}

impl Part {
    /// Place `shape` so that its bottom sits at `base`.
    pub fn standing(shape: Shape, base: Vec3, color: Color) -> Self {
        Self {
            shape,
            translation: base + Vec3::Y * (shape.height() * 0.5),
            color,
        }
    }

    /// Height of the part's lowest point.
    pub fn bottom(&self) -> f32 {
        self.translation.y - self.shape.height() * 0.5
    }

    pub fn top(&self) -> f32 {
        self.translation.y + self.shape.height() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standing_part_rests_on_base() {
        let shape = Shape::Cylinder {
            radius: 0.5,
            height: 4.0,
        };
        let part = Part::standing(shape, Vec3::new(1.0, 2.0, 3.0), Color::WHITE);
        assert_eq!(part.translation, Vec3::new(1.0, 4.0, 3.0));
        assert!((part.bottom() - 2.0).abs() < 1e-6);
        assert!((part.top() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_plane_is_flat() {
        let part = Part::standing(
            Shape::Plane {
                size: Vec2::splat(40.0),
            },
            Vec3::ZERO,
            Color::WHITE,
        );
        assert_eq!(part.translation, Vec3::ZERO);
    }

    #[test]
    fn test_meshes_have_vertices() {
        let shapes = [
            Shape::Plane { size: Vec2::ONE },
            Shape::Cuboid { size: Vec3::ONE },
            Shape::Cylinder {
                radius: 1.0,
                height: 1.0,
            },
            Shape::Frustum {
                radius_bottom: 1.0,
                radius_top: 0.5,
                height: 2.0,
            },
            Shape::Cone {
                radius: 1.0,
                height: 3.0,
                resolution: 10,
            },
            Shape::Sphere { radius: 1.0 },
        ];
        for shape in shapes {
            assert!(shape.mesh().count_vertices() > 0, "{shape:?}");
        }
    }
}
