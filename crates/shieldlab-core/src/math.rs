//! Scalar and vector helpers shared by the simulation and the compositor.
//!
//! These follow shading-language semantics (`mix`, `smoothstep`, `reflect`,
//! `refract`) so the field formulas read the same on the CPU.

use glam::DVec3;

/// Linear interpolation from `a` to `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Hermite step between two edges. Reversed edges (`edge0 > edge1`) produce
/// a falling step.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fractional part, always in [0, 1).
pub fn fract(x: f64) -> f64 {
    x - x.floor()
}

/// Mirror `incident` about the surface `normal`.
pub fn reflect(incident: DVec3, normal: DVec3) -> DVec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// Bend `incident` through a surface with refraction ratio `eta`.
/// Returns zero on total internal reflection.
pub fn refract(incident: DVec3, normal: DVec3, eta: f64) -> DVec3 {
    let n_dot_i = normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - n_dot_i * n_dot_i);
    if k < 0.0 {
        DVec3::ZERO
    } else {
        eta * incident - (eta * n_dot_i + k.sqrt()) * normal
    }
}

/// Great-circle distance (radians) between two unit vectors.
pub fn angular_distance(a: DVec3, b: DVec3) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}
