//! Preset base patterns and the surface parameterization they are drawn in.

use std::f64::consts::{PI, TAU};

use glam::{DVec2, DVec3};

use shieldlab_core::enums::Preset;
use shieldlab_core::math::{fract, lerp, smoothstep};

use crate::noise::fbm;

/// Sphere texture coordinates for a unit normal.
///
/// `u` runs once around the equator starting at -X, `v` runs from the south
/// pole (0) to the north pole (1).
pub fn sphere_uv(n: DVec3) -> DVec2 {
    let phi = n.z.atan2(-n.x).rem_euclid(TAU);
    let theta = n.y.clamp(-1.0, 1.0).acos();
    DVec2::new(phi / TAU, 1.0 - theta / PI)
}

fn hex_dist(p: DVec2) -> f64 {
    let p = p.abs();
    p.dot(DVec2::new(1.0, 1.732_050_8).normalize()).max(p.x)
}

/// Hex cell intensity: bright edges over a softer cell fill.
pub fn hex_grid(uv: DVec2, scale: f64) -> f64 {
    let mut p = uv * scale;
    // offset every other row
    p.y *= 1.154_700_5;
    let row = DVec2::new((p.x + 0.5 * p.y.floor()).floor(), p.y.floor());
    let mut f = p - DVec2::new(row.x - 0.5 * row.y.floor(), row.y);
    f -= 0.5;
    let d = hex_dist(f);
    let edge = smoothstep(0.48, 0.44, d);
    let fill = smoothstep(0.52, 0.40, d);
    lerp(fill, edge, 0.6)
}

/// Triangular lattice lines at 0, 60 and 120 degrees.
pub fn tri_grid(uv: DVec2, scale: f64) -> f64 {
    let w = 0.05;
    let (c, s) = (0.5, 0.866_025);
    let d1 = (fract(uv.y * scale) - 0.5).abs();
    let uv2 = DVec2::new(uv.x * c - uv.y * s, uv.x * s + uv.y * c);
    let d2 = (fract(uv2.y * scale) - 0.5).abs();
    let uv3 = DVec2::new(uv.x * c + uv.y * s, -uv.x * s + uv.y * c);
    let d3 = (fract(uv3.y * scale) - 0.5).abs();

    let d = d1.min(d2).min(d3);
    smoothstep(w, w * 0.4, d)
}

/// Inputs a preset pattern may react to.
#[derive(Debug, Clone, Copy)]
pub struct PatternContext {
    pub normal: DVec3,
    pub uv: DVec2,
    pub time: f64,
    pub fresnel: f64,
    /// Clamped hotspot sum.
    pub hot: f64,
    /// Clamped ring sum.
    pub ring: f64,
    pub density: f64,
}

/// Per-preset intensities. Exactly one is non-zero for a given preset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PresetField {
    pub hex: f64,
    pub field_lines: f64,
    pub hard_edge: f64,
    pub plasma: f64,
    pub tri: f64,
}

impl PresetField {
    /// Weighted contribution to the shared field term.
    pub fn weighted(&self) -> f64 {
        self.hex * 0.55
            + self.field_lines * 0.70
            + self.hard_edge * 0.45
            + self.plasma * 0.60
            + self.tri * 0.55
    }
}

/// Evaluate the selected preset's base pattern.
pub fn preset_field(preset: Preset, ctx: &PatternContext) -> PresetField {
    let n = ctx.normal;
    let t = ctx.time;
    let mut out = PresetField::default();

    match preset {
        Preset::None => {}
        Preset::HexCells => {
            let h = hex_grid(ctx.uv, ctx.density);
            out.hex = h * (0.35 + 1.25 * ctx.hot + 0.85 * ctx.ring);
        }
        Preset::MagneticField => {
            let a = n.z.atan2(n.x);
            let l = n.y;
            let w = fbm(n * 8.0 + DVec3::new(0.0, t * 0.6, 0.0)) * 0.35;
            let lines_a = (a * 14.0 + t * 1.2 + w).sin();
            let lines_l = (l * 18.0 - t * 1.1 + w).sin();
            out.field_lines = smoothstep(0.65, 0.98, (lines_a * lines_l).abs())
                * (0.35 + 1.35 * ctx.ring + 0.6 * ctx.hot);
        }
        Preset::HardLight => {
            out.hard_edge = smoothstep(0.25, 0.85, ctx.fresnel) * 1.3;
        }
        Preset::Plasma => {
            let p1 = fbm(n * 3.0 + DVec3::splat(t * 0.2));
            let p2 = fbm(n * 6.0 - DVec3::splat(t * 0.3));
            let mix_p = (p1 * 10.0 + p2 * 5.0 + t).sin();
            out.plasma = smoothstep(0.4, 0.6, mix_p) * (0.5 + 0.5 * (t + n.y * 10.0).sin());
        }
        Preset::Geodesic => {
            let g = tri_grid(ctx.uv, ctx.density);
            out.tri = g * (0.45 + 1.15 * ctx.hot + 0.75 * ctx.ring);
        }
    }

    out
}
