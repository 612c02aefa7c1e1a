//! Shield lab engine.
//!
//! `ShieldLab` owns the impact ledger, the defense state and the transient
//! effects, applies fire events, advances the simulation and produces
//! `ShieldSnapshot`s. It also hands out settled `FieldFrame`s for shading.
//! Completely headless, enabling deterministic testing.

use std::sync::Arc;

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use shieldlab_core::config::ShieldConfig;
use shieldlab_core::constants::*;
use shieldlab_core::enums::{Preset, TravelBehavior, WeaponKind};
use shieldlab_core::events::{FireReport, ShieldEvent};
use shieldlab_core::state::{FieldSample, ShieldSnapshot};
use shieldlab_core::types::SimTime;
use shieldlab_field::compositor::{compose, FieldFrame, FieldParams, FieldState, SurfacePoint};
use shieldlab_field::environment::{EnvironmentSampler, StarfieldEnvironment};

use crate::defense::ShieldDefenseState;
use crate::effects::EffectScheduler;
use crate::fx::{self, FxSpawn, Visual};
use crate::ledger::ImpactLedger;
use crate::weapons::{weapon_spec, WeaponSpec};

/// Configuration for starting a new lab.
#[derive(Debug, Clone)]
pub struct LabConfig {
    /// RNG seed for the transient visuals. Same seed = same run.
    pub seed: u64,
    pub shield: ShieldConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            shield: ShieldConfig::default(),
        }
    }
}

/// A projectile that landed during the last scheduler pass.
#[derive(Debug, Clone, Copy)]
struct Arrival {
    weapon: WeaponKind,
    point: DVec3,
}

fn take_arrival(visual: &mut Visual, arrivals: &mut Vec<Arrival>) {
    if let Visual::Projectile(projectile) = visual {
        if std::mem::take(&mut projectile.pending_arrival) {
            arrivals.push(Arrival {
                weapon: projectile.weapon,
                point: projectile.end,
            });
        }
    }
}

/// The lab engine. Owns all simulation state.
pub struct ShieldLab {
    config: ShieldConfig,
    params: FieldParams,
    time: SimTime,
    ledger: ImpactLedger,
    defense: ShieldDefenseState,
    effects: EffectScheduler<Visual>,
    rng: ChaCha8Rng,
    env: Arc<dyn EnvironmentSampler>,
    emitters: Vec<DVec3>,
    flash: f64,
    overloaded: bool,
    events: Vec<ShieldEvent>,
    arrivals: Vec<Arrival>,
}

impl ShieldLab {
    /// Create a fully charged lab with the given config.
    pub fn new(config: LabConfig) -> Self {
        let LabConfig { seed, shield } = config;
        Self {
            params: FieldParams::from_config(&shield),
            defense: ShieldDefenseState::new(shield.overload_threshold),
            config: shield,
            time: SimTime::default(),
            ledger: ImpactLedger::new(),
            effects: EffectScheduler::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            env: Arc::new(StarfieldEnvironment::default()),
            emitters: Vec::new(),
            flash: 0.0,
            overloaded: false,
            events: Vec::new(),
            arrivals: Vec::new(),
        }
    }

    /// Fire one shot at the shield.
    ///
    /// The defense state and the ledger are updated before this returns;
    /// only the projectile's flight and the arrival visuals play out over
    /// later ticks.
    pub fn fire(
        &mut self,
        weapon: WeaponKind,
        base_damage: f64,
        target_direction: DVec3,
    ) -> FireReport {
        let spec = weapon_spec(weapon);
        let outcome = self.defense.apply_fire(&spec, base_damage);

        let now = self.time.elapsed_secs;
        let impact = self
            .ledger
            .record(target_direction, now, outcome.impact_strength, weapon);
        self.flash = 1.0;

        let target = impact.direction * self.config.radius;
        let muzzle = self.config.muzzle_position;
        match spec.travel {
            TravelBehavior::Beam => {
                self.spawn_fx(fx::beam(&spec, muzzle, target));
                self.spawn_arrival_fx(&spec, target);
            }
            TravelBehavior::Projectile { .. } => {
                self.spawn_fx(fx::projectile(&spec, muzzle, target));
            }
        }

        tracing::debug!(
            target: "shieldlab::sim",
            weapon = weapon.name(),
            strength = outcome.impact_strength,
            energy = self.defense.energy(),
            overheat = self.defense.overheat(),
            "shield.fired"
        );
        self.events.push(ShieldEvent::Fired {
            weapon,
            impact_strength: outcome.impact_strength,
            energy_after: self.defense.energy(),
        });
        self.sync_overload_flag();

        FireReport {
            weapon,
            impact_strength: outcome.impact_strength,
            energy_after: self.defense.energy(),
            overheat_after: self.defense.overheat(),
            impact_direction: impact.direction,
            travel: spec.travel,
        }
    }

    /// Fire using a numeric weapon code (0 laser .. 5 ion).
    ///
    /// # Panics
    /// Panics on a code outside 0..=5.
    pub fn fire_code(&mut self, code: u8, base_damage: f64, target_direction: DVec3) -> FireReport {
        let Some(weapon) = WeaponKind::from_code(code) else {
            panic!("unknown weapon code {code}, expected 0..=5");
        };
        self.fire(weapon, base_damage, target_direction)
    }

    /// Fire with the configured base damage.
    pub fn fire_default(&mut self, weapon: WeaponKind, target_direction: DVec3) -> FireReport {
        self.fire(weapon, self.config.base_damage, target_direction)
    }

    /// Advance the simulation by `dt` seconds and return the resulting
    /// snapshot.
    ///
    /// Order: clock and flash, defense state, effects, then projectile
    /// arrivals.
    ///
    /// # Panics
    /// Panics if `dt` is negative or not finite.
    pub fn tick(&mut self, dt: f64) -> ShieldSnapshot {
        assert!(
            dt.is_finite() && dt >= 0.0,
            "tick dt must be finite and non-negative, got {dt}"
        );

        self.time.advance(dt);
        self.flash = (self.flash - dt * FLASH_DECAY_RATE).max(0.0);

        self.defense.advance(dt, self.config.recovery_rate);
        self.sync_overload_flag();

        let arrivals = &mut self.arrivals;
        self.effects
            .tick_with(self.time.elapsed_secs, dt, |visual| take_arrival(visual, arrivals));
        self.land_projectiles();

        self.build_snapshot()
    }

    /// Shade one surface point at `time` against the current ledger and
    /// defense state. Side-effect free.
    ///
    /// # Panics
    /// Panics if `time` is not finite.
    pub fn sample_field(&self, point: &SurfacePoint, time: f64) -> FieldSample {
        assert!(time.is_finite(), "sample time must be finite, got {time}");
        compose(
            point,
            self.ledger.as_slice(),
            &self.params,
            &self.field_state(time),
            self.env.as_ref(),
        )
    }

    /// Freeze the current ledger and state into a frame that can be shaded
    /// from any thread.
    ///
    /// # Panics
    /// Panics if `time` is not finite.
    pub fn field_frame(&self, time: f64) -> FieldFrame {
        assert!(time.is_finite(), "sample time must be finite, got {time}");
        FieldFrame::new(
            self.ledger.snapshot(),
            self.params,
            self.field_state(time),
            Arc::clone(&self.env),
        )
    }

    /// Fully charge and cool the shield, forget every impact and retire
    /// every transient. The clock keeps running.
    pub fn reset(&mut self) {
        self.defense.reset();
        self.ledger.clear();
        self.effects.clear_all();
        self.arrivals.clear();
        self.flash = 0.0;
        self.overloaded = false;
        self.events.push(ShieldEvent::Reset);
        tracing::info!(
            target: "shieldlab::sim",
            elapsed = self.time.elapsed_secs,
            "shield.reset"
        );
    }

    /// Select a base pattern by index. Unknown indices select no pattern.
    pub fn set_preset(&mut self, index: u32) {
        let preset = match Preset::from_index(index) {
            Some(preset) => preset,
            None => {
                tracing::warn!(
                    target: "shieldlab::sim",
                    index,
                    "shield.preset.unknown"
                );
                Preset::None
            }
        };
        self.configure(|config| config.preset = preset);
        self.events.push(ShieldEvent::PresetChanged { preset });
        tracing::info!(
            target: "shieldlab::sim",
            preset = ?preset,
            "shield.preset.changed"
        );
    }

    /// Edit the configuration in place. Shading parameters and the overload
    /// threshold pick up the change immediately.
    pub fn configure(&mut self, edit: impl FnOnce(&mut ShieldConfig)) {
        edit(&mut self.config);
        self.params = FieldParams::from_config(&self.config);
        self.defense
            .set_overload_threshold(self.config.overload_threshold);
    }

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: ShieldConfig) {
        self.configure(|current| *current = config);
    }

    /// Ship emitter positions ion arcs can jump to, relative to the shield
    /// center.
    pub fn set_emitters(&mut self, emitters: Vec<DVec3>) {
        self.emitters = emitters;
    }

    /// Swap the background the field reflects and refracts.
    pub fn set_environment(&mut self, env: Arc<dyn EnvironmentSampler>) {
        self.env = env;
    }

    pub fn config(&self) -> &ShieldConfig {
        &self.config
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn defense(&self) -> &ShieldDefenseState {
        &self.defense
    }

    pub fn ledger(&self) -> &ImpactLedger {
        &self.ledger
    }

    pub fn effects(&self) -> &EffectScheduler<Visual> {
        &self.effects
    }

    pub fn flash(&self) -> f64 {
        self.flash
    }

    /// Outer halo shell opacity: brighter with a strong rim and a drained
    /// shield.
    pub fn halo_opacity(&self) -> f64 {
        HALO_OPACITY_BASE
            + HALO_FRESNEL_GAIN * self.config.fresnel_intensity
            + HALO_LOW_ENERGY_GAIN * (1.0 - self.defense.energy())
    }

    fn field_state(&self, time: f64) -> FieldState {
        FieldState {
            time,
            energy: self.defense.energy(),
            overload: self.defense.overload(),
            emp: self.defense.emp_level(),
        }
    }

    fn spawn_fx(&mut self, spawn: FxSpawn) {
        self.effects.spawn(
            spawn.visual,
            self.time.elapsed_secs,
            spawn.life,
            Some(FxSpawn::animator()),
        );
    }

    /// Sparks plus the weapon-specific extras at a strike point.
    fn spawn_arrival_fx(&mut self, spec: &WeaponSpec, point: DVec3) {
        let sparks = fx::spark_burst(spec, point, &mut self.rng);
        self.spawn_fx(sparks);

        match spec.kind {
            WeaponKind::Emp => self.spawn_fx(fx::emp_wave(self.config.radius)),
            WeaponKind::Ion => {
                let arcs = fx::ion_arcs(point, &self.emitters, self.config.radius, &mut self.rng);
                for arc in arcs {
                    self.spawn_fx(arc);
                }
            }
            _ => {}
        }
    }

    /// Spawn arrival visuals for every shell that landed this tick, including
    /// shells retired on the same pass.
    fn land_projectiles(&mut self) {
        let arrivals = &mut self.arrivals;
        self.effects.for_each_mut(|visual| take_arrival(visual, arrivals));

        let mut landed = std::mem::take(&mut self.arrivals);
        for arrival in landed.drain(..) {
            let spec = weapon_spec(arrival.weapon);
            self.spawn_arrival_fx(&spec, arrival.point);
            if arrival.weapon == WeaponKind::Plasma {
                self.spawn_fx(fx::plasma_splash(arrival.point));
            }
        }
        self.arrivals = landed;
    }

    fn sync_overload_flag(&mut self) {
        let overloaded = self.defense.is_overloaded();
        if overloaded == self.overloaded {
            return;
        }
        self.overloaded = overloaded;

        if overloaded {
            tracing::info!(
                target: "shieldlab::sim",
                overheat = self.defense.overheat(),
                "shield.overload.entered"
            );
            self.events.push(ShieldEvent::OverloadEntered {
                overheat: self.defense.overheat(),
            });
        } else {
            tracing::info!(
                target: "shieldlab::sim",
                energy = self.defense.energy(),
                "shield.overload.cleared"
            );
            self.events.push(ShieldEvent::OverloadCleared {
                energy: self.defense.energy(),
            });
        }
    }

    fn build_snapshot(&mut self) -> ShieldSnapshot {
        let energy = self.defense.energy();
        ShieldSnapshot {
            time: self.time,
            energy,
            energy_percent: (energy * 100.0).round() as u32,
            overheat: self.defense.overheat(),
            overload: self.defense.overload(),
            overloaded: self.overloaded,
            emp_charge: self.defense.emp_charge(),
            preset: self.config.preset,
            impact_count: self.ledger.len(),
            active_effects: self.effects.len(),
            flash: self.flash,
            halo_opacity: self.halo_opacity(),
            events: std::mem::take(&mut self.events),
        }
    }
}
