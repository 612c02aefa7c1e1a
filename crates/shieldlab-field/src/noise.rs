//! Hash-based value noise and fractal sums.

use glam::DVec3;

use shieldlab_core::math::{fract, lerp};

/// Pseudo-random value in [0, 1) for a lattice point.
pub fn hash13(p: DVec3) -> f64 {
    let mut p = DVec3::new(fract(p.x * 0.1031), fract(p.y * 0.1031), fract(p.z * 0.1031));
    let d = p.dot(DVec3::new(p.y, p.z, p.x) + 33.33);
    p += d;
    fract((p.x + p.y) * p.z)
}

/// Trilinear value noise with smoothstep fade, in [0, 1].
pub fn noise3(p: DVec3) -> f64 {
    let i = p.floor();
    let f = p - i;
    let f = f * f * (3.0 - 2.0 * f);

    let n000 = hash13(i);
    let n100 = hash13(i + DVec3::new(1.0, 0.0, 0.0));
    let n010 = hash13(i + DVec3::new(0.0, 1.0, 0.0));
    let n110 = hash13(i + DVec3::new(1.0, 1.0, 0.0));
    let n001 = hash13(i + DVec3::new(0.0, 0.0, 1.0));
    let n101 = hash13(i + DVec3::new(1.0, 0.0, 1.0));
    let n011 = hash13(i + DVec3::new(0.0, 1.0, 1.0));
    let n111 = hash13(i + DVec3::new(1.0, 1.0, 1.0));

    let nx00 = lerp(n000, n100, f.x);
    let nx10 = lerp(n010, n110, f.x);
    let nx01 = lerp(n001, n101, f.x);
    let nx11 = lerp(n011, n111, f.x);
    let nxy0 = lerp(nx00, nx10, f.y);
    let nxy1 = lerp(nx01, nx11, f.y);
    lerp(nxy0, nxy1, f.z)
}

/// Five-octave fractal noise. Peaks just under 1.2.
pub fn fbm(mut p: DVec3) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 0.55;
    for _ in 0..5 {
        value += amplitude * noise3(p);
        p *= 2.02;
        amplitude *= 0.55;
    }
    value
}
