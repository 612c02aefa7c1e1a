//! Environment lookups for the shield's reflection and refraction terms.

use glam::DVec3;

use shieldlab_core::math::smoothstep;
use shieldlab_core::types::Rgb;

use crate::noise::hash13;

/// Source of background radiance for a world direction.
///
/// Samplers are shared across the worker threads that evaluate a frame, so
/// they must be immutable once built.
pub trait EnvironmentSampler: Send + Sync {
    /// Linear RGB seen along `dir`. `dir` need not be normalized and may be
    /// zero (a refraction ray lost to total internal reflection).
    fn sample(&self, dir: DVec3) -> DVec3;
}

/// A flat background, mostly for tests.
#[derive(Debug, Clone, Copy)]
pub struct UniformEnvironment(pub DVec3);

impl EnvironmentSampler for UniformEnvironment {
    fn sample(&self, _dir: DVec3) -> DVec3 {
        self.0
    }
}

/// Deep-space backdrop: a faint navy gradient sprinkled with hashed stars.
#[derive(Debug, Clone)]
pub struct StarfieldEnvironment {
    pub zenith: DVec3,
    pub horizon: DVec3,
    pub nadir: DVec3,
    pub star_color: DVec3,
    /// Angular grid resolution the stars are hashed on.
    pub star_density: f64,
    /// Fraction of grid cells holding a star.
    pub star_fraction: f64,
}

impl Default for StarfieldEnvironment {
    fn default() -> Self {
        Self {
            zenith: Rgb::from_u32(0x050615).to_vec3(),
            horizon: Rgb::from_u32(0x03040d).to_vec3(),
            nadir: Rgb::from_u32(0x000002).to_vec3(),
            star_color: Rgb::from_u32(0xf5faff).to_vec3(),
            star_density: 180.0,
            star_fraction: 0.012,
        }
    }
}

impl EnvironmentSampler for StarfieldEnvironment {
    fn sample(&self, dir: DVec3) -> DVec3 {
        let Some(d) = dir.try_normalize() else {
            return self.nadir;
        };

        let sky = if d.y >= 0.0 {
            self.horizon.lerp(self.zenith, d.y)
        } else {
            self.horizon.lerp(self.nadir, -d.y)
        };

        let cell = (d * self.star_density).floor();
        let h = hash13(cell);
        let star = smoothstep(1.0 - self.star_fraction, 1.0, h);
        sky + self.star_color * star * 0.6
    }
}
