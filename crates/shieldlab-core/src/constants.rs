//! Simulation constants and tuning parameters.

/// Nominal frame rate used by headless drivers (Hz).
pub const FRAME_RATE: u32 = 60;

/// Seconds per frame at the nominal frame rate.
pub const FRAME_DT: f64 = 1.0 / FRAME_RATE as f64;

// --- Impact ledger ---

/// Number of impacts the shield remembers at once.
pub const MAX_IMPACTS: usize = 8;

/// Upper bound of a recorded impact's strength.
pub const IMPACT_STRENGTH_CEILING: f64 = 2.0;

// --- Energy model ---

/// Energy regained per second per unit of recovery rate.
pub const ENERGY_RECOVERY_SCALE: f64 = 0.08;

/// Cooling factor at zero energy. Full energy adds `COOLING_ENERGY_GAIN`.
pub const COOLING_BASE: f64 = 0.45;

/// Extra cooling factor contributed by a fully charged shield.
pub const COOLING_ENERGY_GAIN: f64 = 0.55;

/// Overheat shed per second per unit of cooling.
pub const COOLING_SCALE: f64 = 0.55;

/// EMP charge shed per second.
pub const EMP_DECAY_RATE: f64 = 0.85;

/// Overheat above the threshold needed to reach full overload.
pub const OVERLOAD_SPAN: f64 = 1.0;

/// Energy drained per second at full overload.
pub const OVERLOAD_ENERGY_DRAIN: f64 = 0.04;

/// Fixed EMP charge added by every EMP hit.
pub const EMP_CHARGE_BUMP: f64 = 0.85;

/// Ceiling of the accumulated EMP charge.
pub const EMP_CHARGE_MAX: f64 = 1.2;

/// Overheat margin above the threshold before the HUD reports overload.
pub const OVERLOAD_HUD_MARGIN: f64 = 0.02;

// --- Weapon model ---

/// Energy drained per unit of weapon damage.
pub const ENERGY_DRAIN_PER_DAMAGE: f64 = 0.035;

/// Default heat contribution per unit of damage.
pub const HEAT_RATE_DEFAULT: f64 = 0.18;

/// Laser heat contribution per unit of damage.
pub const HEAT_RATE_LASER: f64 = 0.12;

/// EMP heat contribution per unit of damage.
pub const HEAT_RATE_EMP: f64 = 0.22;

/// Extra railgun heat per unit of damage, on top of the base rate.
pub const HEAT_SURCHARGE_RAILGUN: f64 = 0.25;

/// Extra plasma heat per unit of damage, on top of the base rate.
pub const HEAT_SURCHARGE_PLASMA: f64 = 0.18;

/// Impact strength per unit of damage.
pub const IMPACT_STRENGTH_PER_DAMAGE: f64 = 0.55;

/// Weakest impact a hit can record.
pub const IMPACT_STRENGTH_MIN: f64 = 0.15;

/// Strongest impact a single hit can record.
pub const IMPACT_STRENGTH_MAX: f64 = 1.6;

// --- Field compositor ---

/// Ceiling of the summed ring and hotspot terms.
pub const FIELD_SUM_CEILING: f64 = 2.0;

/// Ceiling of the summed crackle term.
pub const CRACKLE_SUM_CEILING: f64 = 2.0;

/// Hotspot gain applied to the summed hotspot term.
pub const HOTSPOT_GAIN: f64 = 1.4;

/// Crackle gain applied to the summed crackle term.
pub const CRACKLE_GAIN: f64 = 1.8;

/// Final opacity floor.
pub const OPACITY_MIN: f64 = 0.02;

/// Final opacity ceiling.
pub const OPACITY_MAX: f64 = 0.96;

/// Per-channel ceiling of the final color.
pub const COLOR_CEILING: f64 = 6.0;

/// Base opacity bump for the tight-bubble mode.
pub const TIGHT_BUBBLE_OPACITY_BONUS: f64 = 0.03;

/// Base opacity ceiling in tight-bubble mode.
pub const TIGHT_BUBBLE_OPACITY_MAX: f64 = 0.9;

// --- Flash / halo ---

/// Impact flash decay per second.
pub const FLASH_DECAY_RATE: f64 = 5.0;

/// Halo shell opacity floor.
pub const HALO_OPACITY_BASE: f64 = 0.028;

/// Halo opacity per unit of fresnel intensity.
pub const HALO_FRESNEL_GAIN: f64 = 0.028;

/// Halo opacity added as the shield drains to zero energy.
pub const HALO_LOW_ENERGY_GAIN: f64 = 0.04;

// --- Transient visuals ---

/// Particle velocity scale applied each spark update.
pub const SPARK_SPEED_SCALE: f64 = 3.5;

/// Per-update particle velocity damping.
pub const SPARK_DAMPING: f64 = 0.92;

/// EMP wave lifetime (seconds).
pub const EMP_WAVE_LIFE: f64 = 0.9;

/// EMP wave reach as a multiple of the shield radius.
pub const EMP_WAVE_REACH: f64 = 1.45;

/// Plasma splash lifetime (seconds).
pub const PLASMA_SPLASH_LIFE: f64 = 0.45;

/// Segments per ion arc polyline.
pub const ION_ARC_SEGMENTS: usize = 14;

/// Maximum number of emitters an ion hit arcs to.
pub const ION_ARC_MAX_TARGETS: usize = 3;

/// Minimum lifetime of a projectile effect (seconds).
pub const PROJECTILE_MIN_LIFE: f64 = 0.2;

/// Projectile lifetime beyond its travel time (seconds).
pub const PROJECTILE_LINGER: f64 = 0.15;
