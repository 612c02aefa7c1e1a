//! Tunable shield configuration and its JSON loading.
//!
//! Every knob the lab exposes lives in [`ShieldConfig`]. Values are plain
//! numbers; they are clamped where they are used, never validated here.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::Preset;
use crate::types::Rgb;

/// Environment variable naming a JSON config file to load at startup.
pub const CONFIG_PATH_ENV: &str = "SHIELDLAB_CONFIG_PATH";

/// All shield tunables, with the lab's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    /// Base pattern drawn across the surface.
    pub preset: Preset,
    pub base_color: Rgb,
    pub rim_color: Rgb,
    /// Opacity before fresnel, impacts and instability are layered on.
    pub opacity: f64,

    // --- Fresnel ---
    pub fresnel_power: f64,
    pub fresnel_intensity: f64,

    // --- Flow noise ---
    pub noise_scale: f64,
    pub noise_speed: f64,
    pub noise_intensity: f64,

    /// Cell density shared by the hex and geodesic grids.
    pub hex_density: f64,

    // --- Ripples ---
    pub ripple_strength: f64,
    /// Ring expansion rate (radians of arc per second).
    pub ripple_speed: f64,
    pub ripple_decay: f64,

    // --- Energy model ---
    /// Overheat at which overload starts.
    pub overload_threshold: f64,
    /// Recovery rate driving energy regain and cooling.
    pub recovery_rate: f64,

    // --- Firing ---
    /// Damage of one shot before the weapon multiplier.
    pub base_damage: f64,
    /// Shots per second for automatic firing drivers.
    pub fire_rate: f64,

    // --- Geometry ---
    /// Shield radius in world units.
    pub radius: f64,
    /// Pull the bubble in tight around the hull (slightly more opaque).
    pub tight_bubble: bool,
    /// Muzzle position relative to the shield center (world units).
    pub muzzle_position: DVec3,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            preset: Preset::None,
            base_color: Rgb::from_u32(0x2b8cff),
            rim_color: Rgb::from_u32(0xb6f7ff),
            opacity: 0.28,
            fresnel_power: 3.4,
            fresnel_intensity: 1.25,
            noise_scale: 2.25,
            noise_speed: 0.65,
            noise_intensity: 0.75,
            hex_density: 14.0,
            ripple_strength: 1.15,
            ripple_speed: 2.8,
            ripple_decay: 2.15,
            overload_threshold: 1.25,
            recovery_rate: 0.28,
            base_damage: 1.0,
            fire_rate: 6.0,
            radius: 8.5,
            tight_bubble: false,
            muzzle_position: DVec3::new(-7.6, 3.05, 6.05),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse shield config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read shield config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShieldConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load the config named by `SHIELDLAB_CONFIG_PATH`, falling back to the
/// builtin defaults when the variable is unset or the file cannot be used.
///
/// Returns the config together with the path it came from, if any.
pub fn load_config_from_env() -> (ShieldConfig, Option<PathBuf>) {
    let Some(path) = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from) else {
        tracing::info!(target: "shieldlab::config", "shield_config.loaded=builtin");
        return (ShieldConfig::default(), None);
    };

    match ShieldConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!(
                target: "shieldlab::config",
                path = %path.display(),
                "shield_config.loaded=file"
            );
            (config, Some(path))
        }
        Err(err) => {
            tracing::warn!(
                target: "shieldlab::config",
                path = %path.display(),
                error = %err,
                "shield_config.load_failed"
            );
            (ShieldConfig::default(), None)
        }
    }
}
