//! Bounding spheres and sphere-vs-sphere classification
//!
//! Coarse collision between the player volume and falling entities is done
//! entirely with spheres. A negative radius is meaningless, so every sphere
//! built through this module clamps its radius to zero.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A bounding sphere in world or model space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Scale about the origin: both the center and the radius are multiplied.
    pub fn scaled(&self, scale: f32) -> Self {
        Self::new(self.center * scale, self.radius * scale)
    }

    /// Move the sphere by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.center + offset, self.radius)
    }

    /// Multiply only the radius, leaving the center in place
    pub fn inflated(&self, factor: f32) -> Self {
        Self::new(self.center, self.radius * factor)
    }
}

/// How two spheres relate spatially
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SphereRelation {
    /// Disjoint (centers further apart than the sum of radii)
    Outside,
    /// Touching or partially overlapping
    Intersecting,
    /// The first sphere lies entirely within the second
    Inside,
    /// The first sphere entirely encloses the second
    Contains,
}

impl SphereRelation {
    /// Anything other than `Outside` counts as a hit
    #[inline]
    pub fn is_hit(self) -> bool {
        self != SphereRelation::Outside
    }
}

/// Classify `a` relative to `b`.
///
/// Comparisons are done on squared distances so the tangent case
/// (distance == sum of radii) lands on `Intersecting`.
pub fn sphere_relation(a: &Sphere, b: &Sphere) -> SphereRelation {
    let ra = a.radius.max(0.0);
    let rb = b.radius.max(0.0);
    let dist_sq = a.center.distance_squared(b.center);

    let sum = ra + rb;
    if dist_sq > sum * sum {
        return SphereRelation::Outside;
    }

    let diff = ra - rb;
    if dist_sq <= diff * diff {
        if ra < rb {
            return SphereRelation::Inside;
        }
        if ra > rb {
            return SphereRelation::Contains;
        }
    }

    SphereRelation::Intersecting
}

/// True unless the spheres are disjoint (boundary inclusive)
#[inline]
pub fn spheres_collide(a: &Sphere, b: &Sphere) -> bool {
    sphere_relation(a, b).is_hit()
}
