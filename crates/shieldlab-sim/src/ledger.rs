//! Bounded, time-ordered record of recent strikes.

use std::sync::Arc;

use glam::DVec3;

use shieldlab_core::constants::{IMPACT_STRENGTH_CEILING, MAX_IMPACTS};
use shieldlab_core::enums::WeaponKind;
use shieldlab_core::types::Impact;

/// The last `capacity` impacts, oldest first.
#[derive(Debug, Clone)]
pub struct ImpactLedger {
    impacts: Vec<Impact>,
    capacity: usize,
}

impl Default for ImpactLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ImpactLedger {
    pub fn new() -> Self {
        Self::with_capacity(MAX_IMPACTS)
    }

    /// A ledger holding at most `capacity` impacts (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            impacts: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a strike, evicting the oldest past capacity.
    ///
    /// The direction is normalized (a zero vector becomes +Y) and the strength
    /// clamped to [0, 2]. Returns the impact as stored.
    pub fn record(
        &mut self,
        direction: DVec3,
        timestamp: f64,
        strength: f64,
        weapon: WeaponKind,
    ) -> Impact {
        let strength = if strength.is_nan() {
            0.0
        } else {
            strength.clamp(0.0, IMPACT_STRENGTH_CEILING)
        };
        let impact = Impact {
            direction: direction.try_normalize().unwrap_or(DVec3::Y),
            timestamp,
            strength,
            weapon,
        };

        self.impacts.push(impact);
        if self.impacts.len() > self.capacity {
            self.impacts.remove(0);
        }
        impact
    }

    pub fn clear(&mut self) {
        self.impacts.clear();
    }

    /// Owned copy of the current impacts, safe to send to other threads.
    pub fn snapshot(&self) -> Arc<[Impact]> {
        self.impacts.iter().copied().collect()
    }

    pub fn as_slice(&self) -> &[Impact] {
        &self.impacts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Impact> {
        self.impacts.iter()
    }

    /// Most recent impact, if any.
    pub fn latest(&self) -> Option<&Impact> {
        self.impacts.last()
    }

    pub fn len(&self) -> usize {
        self.impacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impacts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
