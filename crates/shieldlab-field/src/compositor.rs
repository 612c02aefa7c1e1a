//! The shield field compositor.
//!
//! For one surface point this layers, in order: fresnel rim, flow noise,
//! overload pulse, impact rings/hotspots/crackle with weapon overlays, the
//! preset base pattern, EMP and overload tints, then resolves opacity and
//! color. The order matters: later stages read the clamped sums of earlier
//! ones.

use std::sync::Arc;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use shieldlab_core::config::ShieldConfig;
use shieldlab_core::constants::*;
use shieldlab_core::enums::Preset;
use shieldlab_core::math::{angular_distance, lerp, reflect, refract, smoothstep};
use shieldlab_core::state::FieldSample;
use shieldlab_core::types::Impact;

use crate::environment::EnvironmentSampler;
use crate::noise::fbm;
use crate::patterns::{preset_field, sphere_uv, PatternContext};

const EMP_BASE_TINT: DVec3 = DVec3::new(0.75, 0.9, 1.0);
const EMP_RIM_TINT: DVec3 = DVec3::new(0.95, 0.98, 1.0);
const OVERLOAD_BASE_TINT: DVec3 = DVec3::new(0.75, 0.22, 0.25);
const OVERLOAD_RIM_TINT: DVec3 = DVec3::new(1.0, 0.35, 0.35);
const EMP_GLASS_TINT: DVec3 = DVec3::new(0.88, 0.93, 1.0);
const REFRACTION_ETA: f64 = 0.92;

/// A point on the shield surface and the direction it is seen from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    /// Outward unit normal in the shield frame.
    pub normal: DVec3,
    /// Unit vector from the point toward the viewer.
    pub view_dir: DVec3,
}

impl SurfacePoint {
    /// Normalizes both vectors. A degenerate normal falls back to +Y, a
    /// degenerate view direction to the normal.
    pub fn new(normal: DVec3, view_dir: DVec3) -> Self {
        let normal = normal.try_normalize().unwrap_or(DVec3::Y);
        let view_dir = view_dir.try_normalize().unwrap_or(normal);
        Self { normal, view_dir }
    }

    /// The point seen straight on, with no fresnel rim.
    pub fn head_on(normal: DVec3) -> Self {
        Self::new(normal, normal)
    }
}

/// Shading parameters resolved from the shield config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub preset: Preset,
    pub base_color: DVec3,
    pub rim_color: DVec3,
    pub opacity: f64,
    pub fresnel_power: f64,
    pub fresnel_intensity: f64,
    pub noise_scale: f64,
    pub noise_speed: f64,
    pub noise_intensity: f64,
    pub hex_density: f64,
    pub ripple_strength: f64,
    pub ripple_speed: f64,
    pub ripple_decay: f64,
}

impl FieldParams {
    pub fn from_config(config: &ShieldConfig) -> Self {
        let opacity = if config.tight_bubble {
            (config.opacity + TIGHT_BUBBLE_OPACITY_BONUS)
                .clamp(OPACITY_MIN, TIGHT_BUBBLE_OPACITY_MAX)
        } else {
            config.opacity
        };
        Self {
            preset: config.preset,
            base_color: config.base_color.to_vec3(),
            rim_color: config.rim_color.to_vec3(),
            opacity,
            fresnel_power: config.fresnel_power,
            fresnel_intensity: config.fresnel_intensity,
            noise_scale: config.noise_scale,
            noise_speed: config.noise_speed,
            noise_intensity: config.noise_intensity,
            hex_density: config.hex_density,
            ripple_strength: config.ripple_strength,
            ripple_speed: config.ripple_speed,
            ripple_decay: config.ripple_decay,
        }
    }
}

impl Default for FieldParams {
    fn default() -> Self {
        Self::from_config(&ShieldConfig::default())
    }
}

/// Global shield condition as the field sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    /// Sample time (seconds, same clock as impact timestamps).
    pub time: f64,
    pub energy: f64,
    /// Overload level in [0, 1].
    pub overload: f64,
    /// EMP flicker level in [0, 1].
    pub emp: f64,
}

/// Contribution of a single impact at one point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImpactField {
    pub ring: f64,
    pub hot: f64,
    pub crack: f64,
}

/// Impact terms summed over the ledger. Ring, hot and crack are scaled and
/// clamped; the overlays are raw sums.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImpactTerms {
    pub ring: f64,
    pub hot: f64,
    pub crack: f64,
    pub laser_shimmer: f64,
    pub ion_streak: f64,
    pub emp_scan: f64,
}

impl ImpactTerms {
    /// Combined brightness of everything impact-driven.
    pub fn glow(&self) -> f64 {
        1.1 * self.hot
            + 1.2 * self.ring
            + 1.3 * self.crack
            + 0.85 * self.ion_streak
            + 0.55 * self.laser_shimmer
    }
}

/// Ring, hotspot and crackle of one impact at normal `n`.
pub fn impact_field(n: DVec3, impact: &Impact, time: f64, params: &FieldParams) -> ImpactField {
    let dt = (time - impact.timestamp).max(0.0);
    let ip = impact.direction.try_normalize().unwrap_or(DVec3::Y);
    let d = angular_distance(n, ip);
    let strength = impact.strength;

    // traveling shockwave ring
    let radius = dt * params.ripple_speed;
    let width = lerp(0.015, 0.06, strength.clamp(0.0, 1.0));
    let ring_core = (-((d - radius) / width).powi(2)).exp();
    let ring = ring_core * (-dt * params.ripple_decay).exp() * strength;

    // localized hotspot: wider and faster-fading for strong hits
    let h = (-d * lerp(10.0, 25.0, 1.0 - strength)).exp();
    let hot = h * (-dt * lerp(1.2, 2.8, strength)).exp() * strength;

    let crack_mask = smoothstep(0.25, 1.0, impact.type_code())
        * smoothstep(0.0, 0.5, dt)
        * (-dt * 4.0).exp();
    let crack = if crack_mask > 0.0 && hot > 0.0 {
        let n1 = fbm(n * 40.0 + DVec3::new(0.0, 0.0, time * 3.0));
        let n2 = fbm(n * 65.0 + DVec3::new(0.0, time * 5.0, 0.0));
        crack_mask * hot * smoothstep(0.78, 0.95, n1) * smoothstep(0.65, 0.9, n2)
    } else {
        0.0
    };

    ImpactField { ring, hot, crack }
}

/// Sum every impact's field and weapon overlay at one point.
pub fn accumulate_impacts(
    n: DVec3,
    uv: DVec2,
    impacts: &[Impact],
    time: f64,
    params: &FieldParams,
) -> ImpactTerms {
    let mut terms = ImpactTerms::default();

    for impact in impacts {
        let field = impact_field(n, impact, time, params);
        terms.ring += field.ring;
        terms.hot += field.hot;
        terms.crack += field.crack;

        let kind = impact.type_code();

        // laser: fast shimmer over the hotspot
        terms.laser_shimmer += (1.0 - smoothstep(0.0, 0.25, kind))
            * field.hot
            * (0.5 + 0.5 * (time * 28.0 + n.dot(DVec3::new(9.0, 7.0, 11.0))).sin());

        // ion: streaks crawling around the strike
        let ion_mask = smoothstep(4.5, 5.1, kind);
        if ion_mask > 0.0 {
            let a = n.z.atan2(n.x);
            let l = n.y;
            let lines = (a * 18.0 + time * 6.0 + fbm(n * 12.0 + DVec3::splat(time)) * 2.0).sin()
                * (l * 22.0 - time * 5.0).sin();
            terms.ion_streak += ion_mask * field.hot * smoothstep(0.55, 0.95, lines.abs());
        }

        // emp: global scanline shimmer
        let emp_mask = smoothstep(3.7, 4.4, kind);
        terms.emp_scan += emp_mask * (0.5 + 0.5 * (uv.y * 90.0 + time * 18.0).sin());
    }

    terms.ring = (terms.ring * params.ripple_strength).clamp(0.0, FIELD_SUM_CEILING);
    terms.hot = (terms.hot * HOTSPOT_GAIN).clamp(0.0, FIELD_SUM_CEILING);
    terms.crack = (terms.crack * CRACKLE_GAIN).clamp(0.0, CRACKLE_SUM_CEILING);
    terms
}

/// Global overload throb. Exactly zero unless the shield is overloaded.
pub fn overload_pulse(overload: f64, time: f64) -> f64 {
    if overload > 0.0 {
        (0.6 + 0.4 * (time * 8.0).sin()) * overload
    } else {
        0.0
    }
}

/// Grazing-angle rim brightening.
pub fn fresnel(point: &SurfacePoint, params: &FieldParams) -> f64 {
    let ndv = point.normal.dot(point.view_dir).clamp(0.0, 1.0);
    (1.0 - ndv).powf(params.fresnel_power) * params.fresnel_intensity
}

/// Slow advected noise lifting the whole surface.
pub fn flow_boost(n: DVec3, time: f64, params: &FieldParams) -> f64 {
    let s = params.noise_speed;
    let flow_p = n * params.noise_scale + DVec3::new(time * s, -time * s * 0.7, time * s * 0.4);
    let n_flow = fbm(flow_p) * 2.0 - 1.0;
    let flow = 0.5 + 0.5 * n_flow;
    params.noise_intensity * (0.25 + 0.75 * flow)
}

/// Shade one surface point.
pub fn compose(
    point: &SurfacePoint,
    impacts: &[Impact],
    params: &FieldParams,
    state: &FieldState,
    env: &dyn EnvironmentSampler,
) -> FieldSample {
    let n = point.normal;
    let v = point.view_dir;
    let t = state.time;

    // 1-3: rim, flow, overload
    let fres = fresnel(point, params);
    let flow = flow_boost(n, t, params);
    let pulse = overload_pulse(state.overload, t);

    // 4: impacts
    let uv = sphere_uv(n);
    let terms = accumulate_impacts(n, uv, impacts, t, params);

    // 5: preset pattern, reacting to nearby impact activity
    let preset = preset_field(
        params.preset,
        &PatternContext {
            normal: n,
            uv,
            time: t,
            fresnel: fres,
            hot: terms.hot,
            ring: terms.ring,
            density: params.hex_density,
        },
    );

    let env_r = env.sample(reflect(-v, n));
    let env_t = env.sample(refract(-v, n, REFRACTION_ETA));

    let energy = state.energy.clamp(0.0, 1.0);
    let low = 1.0 - energy;

    // 6: tints
    let mut base = params.base_color;
    let mut rim = params.rim_color;

    let emp = (state.emp + 0.35 * terms.emp_scan).clamp(0.0, 1.0);
    let emp_flicker = emp * (0.45 + 0.55 * (t * 42.0 + n.dot(DVec3::new(3.0, 5.0, 7.0))).sin());
    base = base.lerp(EMP_BASE_TINT, 0.25 * emp);
    rim = rim.lerp(EMP_RIM_TINT, 0.35 * emp);

    if state.overload > 0.0 {
        base = base.lerp(OVERLOAD_BASE_TINT, 0.20 * pulse);
        rim = rim.lerp(OVERLOAD_RIM_TINT, 0.25 * pulse);
    }

    let impact_glow = terms.glow();
    let field = flow * (0.30 + 0.70 * fres) + preset.weighted();

    let mut instability = low * (0.10 + 0.25 * fbm(n * 12.0 + DVec3::splat(t * 0.6)));
    if state.overload > 0.0 {
        instability += pulse * (0.35 + 0.65 * fbm(n * 22.0 + DVec3::splat(t * 2.0)));
    }

    // 7: opacity
    let opacity = (params.opacity
        + 0.12 * fres
        + 0.18 * impact_glow
        + 0.06 * field
        + 0.10 * instability
        + 0.12 * emp_flicker)
        .clamp(OPACITY_MIN, OPACITY_MAX);

    // 8: color
    let refr_tint = env_t.lerp(env_r, 0.35);
    let mut col = refr_tint.lerp(base, 0.55);
    col += base * (0.16 + 0.55 * field);
    col += rim * fres * (0.65 + 0.8 * impact_glow);
    col += rim * impact_glow * 1.35;
    col = col.lerp(col * EMP_GLASS_TINT, 0.30 * emp);

    if params.preset == Preset::HardLight {
        col = col.lerp(refr_tint, 0.35);
        col += DVec3::splat(0.18 + 0.25 * preset.hard_edge + 0.35 * terms.crack);
    }

    FieldSample {
        color: col.clamp(DVec3::ZERO, DVec3::splat(COLOR_CEILING)),
        opacity,
    }
}

/// Everything needed to shade one frame, frozen at a single instant.
///
/// Owns its copy of the impacts so any number of threads can sample it while
/// the simulation moves on.
#[derive(Clone)]
pub struct FieldFrame {
    impacts: Arc<[Impact]>,
    params: FieldParams,
    state: FieldState,
    env: Arc<dyn EnvironmentSampler>,
}

impl FieldFrame {
    pub fn new(
        impacts: impl Into<Arc<[Impact]>>,
        params: FieldParams,
        state: FieldState,
        env: Arc<dyn EnvironmentSampler>,
    ) -> Self {
        Self {
            impacts: impacts.into(),
            params,
            state,
            env,
        }
    }

    pub fn sample(&self, point: &SurfacePoint) -> FieldSample {
        compose(point, &self.impacts, &self.params, &self.state, self.env.as_ref())
    }

    /// Impact terms alone at a normal, without the rest of the composite.
    pub fn impact_terms(&self, normal: DVec3) -> ImpactTerms {
        let n = normal.try_normalize().unwrap_or(DVec3::Y);
        accumulate_impacts(n, sphere_uv(n), &self.impacts, self.state.time, &self.params)
    }

    pub fn impacts(&self) -> &[Impact] {
        &self.impacts
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }
}
