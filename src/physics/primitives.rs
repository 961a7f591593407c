//! Stateless intersection tests.
//!
//! Each test returns `None` for "no collision". Degenerate geometry (zero
//! distance between centers, zero-length directions) is reported as no
//! collision rather than producing NaN normals.

use glam::Vec3;

/// Tolerance for parallel-ray and face-matching checks in [`ray_to_box`].
pub const RAY_EPSILON: f32 = 1e-6;

/// Result of an overlap test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal. See each test for its direction.
    pub normal: Vec3,
    /// Overlap distance, always positive for a reported contact.
    pub penetration: f32,
    pub point: Vec3,
}

/// Result of a ray test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Sphere vs sphere. Hit iff `0 < distance < ra + rb`.
///
/// The normal points from A toward B and the contact point sits on A's
/// surface. Coincident centers are not a collision.
pub fn sphere_to_sphere(pos_a: Vec3, radius_a: f32, pos_b: Vec3, radius_b: f32) -> Option<Contact> {
    let diff = pos_b - pos_a;
    let dist = diff.length();
    let reach = radius_a + radius_b;
    if dist <= 0.0 || dist >= reach {
        return None;
    }
    let normal = diff / dist;
    Some(Contact {
        normal,
        penetration: reach - dist,
        point: pos_a + normal * radius_a,
    })
}

/// Sphere vs axis-aligned box given by its center and half extents.
///
/// The sphere center is clamped into the box to find the closest point; hit
/// iff `0 < distance(center, closest) < radius`. The normal points from the
/// closest point toward the sphere center (box -> sphere) and the contact
/// point is the closest point. A center inside the box is not a collision.
pub fn sphere_to_box(
    center: Vec3,
    radius: f32,
    box_center: Vec3,
    half_extents: Vec3,
) -> Option<Contact> {
    let closest = center.clamp(box_center - half_extents, box_center + half_extents);
    let diff = center - closest;
    let dist = diff.length();
    if dist <= 0.0 || dist >= radius {
        return None;
    }
    Some(Contact {
        normal: diff / dist,
        penetration: radius - dist,
        point: closest,
    })
}

/// Ray vs sphere via the quadratic discriminant.
///
/// Returns the smaller non-negative root, so a ray starting inside the
/// sphere reports the exit distance. The direction need not be normalized;
/// distances are then in units of `dir`.
pub fn ray_to_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let a = dir.dot(dir);
    if a <= 0.0 {
        return None;
    }
    let oc = origin - center;
    let b = 2.0 * oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Ray vs axis-aligned box (slab method).
///
/// A ray parallel to a slab is rejected when its origin lies outside that
/// slab. The reported distance is the entry distance, or the exit distance
/// when the origin is inside the box. The face normal is picked by comparing
/// the hit point against the faces in X, Y, Z order; the first face within
/// [`RAY_EPSILON`] wins, so edges and corners resolve to the earliest axis.
pub fn ray_to_box(origin: Vec3, dir: Vec3, box_min: Vec3, box_max: Vec3) -> Option<RayHit> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (box_min[axis], box_max[axis]);

        if d.abs() < RAY_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (lo - o) * inv;
        let mut t2 = (hi - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    // Every axis parallel: only a zero direction gets here.
    if !t_min.is_finite() {
        return None;
    }
    let t = if t_min >= 0.0 { t_min } else { t_max };
    if t < 0.0 {
        return None;
    }

    let point = origin + dir * t;
    Some(RayHit {
        distance: t,
        point,
        normal: box_face_normal(point, box_min, box_max),
    })
}

/// Outward normal of the face `point` lies on, tested X then Y then Z.
pub fn box_face_normal(point: Vec3, box_min: Vec3, box_max: Vec3) -> Vec3 {
    const AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];
    for (axis, unit) in AXES.iter().enumerate() {
        if (point[axis] - box_min[axis]).abs() < RAY_EPSILON {
            return -*unit;
        }
        if (point[axis] - box_max[axis]).abs() < RAY_EPSILON {
            return *unit;
        }
    }
    Vec3::ZERO
}
