//! Transient visuals spawned by weapon fire: beams, projectiles, spark
//! bursts, plasma splashes, EMP waves and ion arcs.
//!
//! Positions are world units relative to the shield center. Randomness is
//! drawn from the caller's RNG at spawn time; ion arcs carry their own seeded
//! RNG for the per-tick wobble.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use shieldlab_core::constants::*;
use shieldlab_core::enums::WeaponKind;
use shieldlab_core::math::{lerp, smoothstep};
use shieldlab_core::types::Rgb;

use crate::effects::UpdateFn;
use crate::weapons::WeaponSpec;

const SPARK_COLOR: u32 = 0xb6f7ff;
const EMP_WAVE_COLOR: u32 = 0xb6f7ff;
const ION_ARC_COLOR: u32 = 0x66ffcc;
const PLASMA_SPLASH_COLOR: u32 = 0xff7a3c;
const EMP_WAVE_START_RADIUS: f64 = 0.2;

/// Straight segment from the muzzle to the strike.
#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    pub weapon: WeaponKind,
    pub start: DVec3,
    pub end: DVec3,
    pub color: Rgb,
    pub thickness: f64,
    pub life: f64,
    pub peak_opacity: f64,
    pub opacity: f64,
}

impl Beam {
    pub(crate) fn update(&mut self, age: f64) {
        self.opacity = self.peak_opacity * (1.0 - age / self.life);
    }
}

/// Faint streak a kinetic slug leaves from the muzzle to its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trail {
    pub start: DVec3,
    pub end: DVec3,
    pub thickness: f64,
    pub opacity: f64,
}

/// A shell in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub weapon: WeaponKind,
    pub start: DVec3,
    pub end: DVec3,
    /// Flight time; zero or less lands on the first update.
    pub travel: f64,
    pub position: DVec3,
    pub color: Rgb,
    pub radius: f64,
    pub trail: Option<Trail>,
    /// Whether the shell has reached the shield.
    pub arrived: bool,
    /// Set on the update that lands the shell, cleared by whoever handles
    /// the arrival.
    pub pending_arrival: bool,
}

impl Projectile {
    /// Flight progress in [0, 1] at `age`.
    pub fn progress(&self, age: f64) -> f64 {
        if self.travel <= 0.0 {
            1.0
        } else {
            (age / self.travel).clamp(0.0, 1.0)
        }
    }

    pub(crate) fn update(&mut self, age: f64) {
        let t = self.progress(age);
        self.position = self.start.lerp(self.end, smoothstep(0.0, 1.0, t));

        if self.weapon == WeaponKind::Kinetic {
            self.trail = Some(Trail {
                start: self.start,
                end: self.position,
                thickness: 0.015,
                opacity: 0.35,
            });
        }

        if t >= 1.0 && !self.arrived {
            self.arrived = true;
            self.pending_arrival = true;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Burst of damped particles at a strike point.
#[derive(Debug, Clone, PartialEq)]
pub struct SparkBurst {
    pub particles: Vec<Particle>,
    pub color: Rgb,
    pub life: f64,
    pub opacity: f64,
}

impl SparkBurst {
    pub(crate) fn update(&mut self, age: f64, dt: f64) {
        self.opacity = 0.9 * (1.0 - age / self.life);
        for particle in &mut self.particles {
            particle.position += particle.velocity * dt * SPARK_SPEED_SCALE;
            particle.velocity *= SPARK_DAMPING;
        }
    }
}

/// Expanding sphere from the shield center after an EMP hit.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpWave {
    pub origin: DVec3,
    pub max_radius: f64,
    pub radius: f64,
    pub color: Rgb,
    pub opacity: f64,
}

impl EmpWave {
    pub(crate) fn update(&mut self, age: f64) {
        let t = age / EMP_WAVE_LIFE;
        self.radius = lerp(EMP_WAVE_START_RADIUS, self.max_radius, smoothstep(0.0, 1.0, t));
        self.opacity = 0.35 * (1.0 - t);
    }
}

/// Jittering polyline from an ion strike to a ship emitter, hugging the
/// shield surface.
#[derive(Debug, Clone)]
pub struct IonArc {
    pub points: Vec<DVec3>,
    pub color: Rgb,
    pub life: f64,
    pub opacity: f64,
    rng: ChaCha8Rng,
}

impl IonArc {
    pub(crate) fn update(&mut self, age: f64) {
        self.opacity = 0.95 * (1.0 - age / self.life);
        let segments = (self.points.len().max(2) - 1) as f64;
        for (i, point) in self.points.iter_mut().enumerate() {
            let t = i as f64 / segments;
            let wobble = (age * 30.0 + i as f64 * 2.2).sin()
                * (0.012 + 0.025 * (1.0 - (0.5 - t).abs() * 1.6));
            let jolt = DVec3::new(
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
            );
            *point += jolt * wobble * 0.2;
        }
    }
}

/// Glow left where a plasma shell lands.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaSplash {
    pub position: DVec3,
    pub color: Rgb,
    pub scale: f64,
    pub opacity: f64,
}

impl PlasmaSplash {
    pub(crate) fn update(&mut self, age: f64) {
        let a = age / PLASMA_SPLASH_LIFE;
        self.opacity = 0.95 * (1.0 - a);
        self.scale = lerp(1.2, 2.0, a);
    }
}

/// Payload of every transient effect.
#[derive(Debug, Clone)]
pub enum Visual {
    Beam(Beam),
    Projectile(Projectile),
    SparkBurst(SparkBurst),
    EmpWave(EmpWave),
    IonArc(IonArc),
    PlasmaSplash(PlasmaSplash),
}

impl Visual {
    pub fn update(&mut self, age: f64, dt: f64) {
        match self {
            Visual::Beam(beam) => beam.update(age),
            Visual::Projectile(projectile) => projectile.update(age),
            Visual::SparkBurst(burst) => burst.update(age, dt),
            Visual::EmpWave(wave) => wave.update(age),
            Visual::IonArc(arc) => arc.update(age),
            Visual::PlasmaSplash(splash) => splash.update(age),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Visual::Beam(_) => "beam",
            Visual::Projectile(_) => "projectile",
            Visual::SparkBurst(_) => "spark_burst",
            Visual::EmpWave(_) => "emp_wave",
            Visual::IonArc(_) => "ion_arc",
            Visual::PlasmaSplash(_) => "plasma_splash",
        }
    }
}

/// A visual ready to hand to the scheduler.
pub struct FxSpawn {
    pub visual: Visual,
    pub life: f64,
}

impl FxSpawn {
    /// The scheduler callback shared by every visual.
    pub fn animator() -> UpdateFn<Visual> {
        Box::new(|visual: &mut Visual, age: f64, dt: f64| visual.update(age, dt))
    }
}

fn random_unit<R: Rng>(rng: &mut R) -> DVec3 {
    DVec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    )
    .try_normalize()
    .unwrap_or(DVec3::Y)
}

pub fn beam(spec: &WeaponSpec, start: DVec3, end: DVec3) -> FxSpawn {
    FxSpawn {
        visual: Visual::Beam(Beam {
            weapon: spec.kind,
            start,
            end,
            color: spec.color,
            thickness: spec.beam_thickness,
            life: spec.beam_life,
            peak_opacity: spec.beam_peak_opacity,
            opacity: 0.9,
        }),
        life: spec.beam_life,
    }
}

pub fn projectile(spec: &WeaponSpec, start: DVec3, end: DVec3) -> FxSpawn {
    let travel = spec.travel.travel_secs();
    FxSpawn {
        visual: Visual::Projectile(Projectile {
            weapon: spec.kind,
            start,
            end,
            travel,
            position: start,
            color: spec.color,
            radius: spec.projectile_radius,
            trail: None,
            arrived: false,
            pending_arrival: false,
        }),
        life: PROJECTILE_MIN_LIFE.max(travel + PROJECTILE_LINGER),
    }
}

pub fn spark_burst<R: Rng>(spec: &WeaponSpec, at: DVec3, rng: &mut R) -> FxSpawn {
    let count = (18.0 + 30.0 * spec.spark * (0.6 + rng.gen::<f64>() * 0.6)).floor() as usize;
    let spread = 0.22 + 0.1 * spec.spark;
    let life = 0.28 + 0.1 * spec.spark;

    let particles = (0..count)
        .map(|_| {
            let velocity = random_unit(rng) * spread * (0.25 + rng.gen::<f64>());
            Particle {
                position: at,
                velocity,
            }
        })
        .collect();

    FxSpawn {
        visual: Visual::SparkBurst(SparkBurst {
            particles,
            color: Rgb::from_u32(SPARK_COLOR),
            life,
            opacity: 0.9,
        }),
        life,
    }
}

pub fn plasma_splash(at: DVec3) -> FxSpawn {
    FxSpawn {
        visual: Visual::PlasmaSplash(PlasmaSplash {
            position: at,
            color: Rgb::from_u32(PLASMA_SPLASH_COLOR),
            scale: 1.25,
            opacity: 0.95,
        }),
        life: PLASMA_SPLASH_LIFE,
    }
}

pub fn emp_wave(shield_radius: f64) -> FxSpawn {
    FxSpawn {
        visual: Visual::EmpWave(EmpWave {
            origin: DVec3::ZERO,
            max_radius: shield_radius * EMP_WAVE_REACH,
            radius: EMP_WAVE_START_RADIUS,
            color: Rgb::from_u32(EMP_WAVE_COLOR),
            opacity: 0.35,
        }),
        life: EMP_WAVE_LIFE,
    }
}

/// Arcs from `at` to the nearest emitters, up to three. Empty without
/// emitters.
pub fn ion_arcs<R: Rng>(
    at: DVec3,
    emitters: &[DVec3],
    shield_radius: f64,
    rng: &mut R,
) -> Vec<FxSpawn> {
    let mut nearest: Vec<DVec3> = emitters.to_vec();
    nearest.sort_by(|a, b| a.distance(at).total_cmp(&b.distance(at)));
    nearest.truncate(ION_ARC_MAX_TARGETS);

    nearest
        .into_iter()
        .enumerate()
        .map(|(idx, target)| {
            let points = (0..=ION_ARC_SEGMENTS)
                .map(|i| {
                    let t = i as f64 / ION_ARC_SEGMENTS as f64;
                    let along = at.lerp(target, t);
                    let from_center = along.try_normalize().unwrap_or(DVec3::Y);
                    let on_surface = from_center * shield_radius * 1.001;
                    let jitter = random_unit(rng) * 0.07 * (1.0 - (0.5 - t).abs() * 1.7);
                    on_surface + jitter
                })
                .collect();
            let life = 0.25 + idx as f64 * 0.05;
            FxSpawn {
                visual: Visual::IonArc(IonArc {
                    points,
                    color: Rgb::from_u32(ION_ARC_COLOR),
                    life,
                    opacity: 0.95,
                    rng: ChaCha8Rng::seed_from_u64(rng.gen()),
                }),
                life,
            }
        })
        .collect()
}
