//! Bounded-lifetime transient effects.
//!
//! Each effect is an entity in a private hecs world carrying its clock, its
//! payload and optionally a per-tick update callback. Effects are retired and
//! despawned once their age reaches their duration.

use std::marker::PhantomData;

use hecs::{Entity, World};

use shieldlab_core::enums::EffectPhase;

/// Per-tick callback: `(payload, age, dt)`.
pub type UpdateFn<P> = Box<dyn FnMut(&mut P, f64, f64) + Send + Sync>;

/// Spawn time, lifetime and lifecycle phase of one effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectClock {
    pub spawned_at: f64,
    pub duration: f64,
    pub phase: EffectPhase,
}

impl EffectClock {
    pub fn new(spawned_at: f64, duration: f64) -> Self {
        Self {
            spawned_at,
            duration,
            phase: EffectPhase::Spawned,
        }
    }

    pub fn age(&self, now: f64) -> f64 {
        now - self.spawned_at
    }
}

struct EffectUpdate<P>(UpdateFn<P>);

/// Registry of live effects with payload type `P`.
pub struct EffectScheduler<P: Send + Sync + 'static> {
    world: World,
    despawn_buffer: Vec<Entity>,
    _payload: PhantomData<fn() -> P>,
}

impl<P: Send + Sync + 'static> Default for EffectScheduler<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Send + Sync + 'static> EffectScheduler<P> {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            despawn_buffer: Vec::new(),
            _payload: PhantomData,
        }
    }

    /// Register an effect. It is active immediately.
    pub fn spawn(
        &mut self,
        payload: P,
        now: f64,
        duration: f64,
        update: Option<UpdateFn<P>>,
    ) -> Entity {
        let mut clock = EffectClock::new(now, duration);
        clock.phase = EffectPhase::Active;
        match update {
            Some(update) => self.world.spawn((clock, payload, EffectUpdate(update))),
            None => self.world.spawn((clock, payload)),
        }
    }

    /// Run every update callback, then retire effects whose age reached
    /// their duration.
    pub fn tick(&mut self, now: f64, dt: f64) {
        self.tick_with(now, dt, |_| {});
    }

    /// Like `tick`, but hands each retiring payload to `on_retire` after its
    /// final update and before it is despawned.
    pub fn tick_with(&mut self, now: f64, dt: f64, mut on_retire: impl FnMut(&mut P)) {
        self.despawn_buffer.clear();

        for (entity, (clock, payload, update)) in self
            .world
            .query_mut::<(&mut EffectClock, &mut P, Option<&mut EffectUpdate<P>>)>()
        {
            let age = clock.age(now);
            if let Some(update) = update {
                (update.0)(payload, age, dt);
            }
            if age >= clock.duration {
                clock.phase = EffectPhase::Retired;
                on_retire(payload);
                self.despawn_buffer.push(entity);
            }
        }

        for entity in self.despawn_buffer.drain(..) {
            let _ = self.world.despawn(entity);
        }
    }

    /// Retire everything without running further updates.
    pub fn clear_all(&mut self) {
        self.world.clear();
    }

    /// Lifecycle phase of an effect. Despawned effects report `Retired`.
    pub fn phase(&self, entity: Entity) -> EffectPhase {
        self.world
            .get::<&EffectClock>(entity)
            .map(|clock| clock.phase)
            .unwrap_or(EffectPhase::Retired)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read-only pass over every live payload.
    pub fn for_each(&self, mut f: impl FnMut(&P)) {
        for (_entity, payload) in self.world.query::<&P>().iter() {
            f(payload);
        }
    }

    /// Mutable pass over every live payload.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut P)) {
        for (_entity, payload) in self.world.query_mut::<&mut P>() {
            f(payload);
        }
    }
}
