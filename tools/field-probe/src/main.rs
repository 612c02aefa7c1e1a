//! field-probe: headless driver for the shield lab.
//!
//! Usage:
//!   field-probe run --shots laser,railgun --ticks 120
//!   field-probe render --output shield.ppm --size 512 --preset 1 --shots plasma,ion

use std::path::{Path, PathBuf};
use std::process;

use glam::DVec3;
use rayon::prelude::*;

use shieldlab_core::config::{load_config_from_env, ShieldConfig};
use shieldlab_core::constants::FRAME_DT;
use shieldlab_core::enums::WeaponKind;
use shieldlab_core::types::Rgb;
use shieldlab_field::compositor::{FieldFrame, SurfacePoint};
use shieldlab_field::environment::{EnvironmentSampler, StarfieldEnvironment};
use shieldlab_sim::{LabConfig, ShieldLab};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "render" => cmd_render(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "field-probe: shield lab simulation and field probe\n\
         \n\
         Commands:\n\
         \n\
         run       Fire a shot list and print one JSON snapshot per tick\n\
         \n\
           --shots <list>     Comma-separated weapons (laser, plasma, kinetic, railgun, emp, ion)\n\
           --ticks <N>        Ticks to simulate at 60 Hz (default: 120)\n\
           --config <path>    Shield config JSON (default: $SHIELDLAB_CONFIG_PATH or builtin)\n\
           --seed <N>         RNG seed for transient visuals (default: 42)\n\
         \n\
         render    Shade the shield seen head-on into a binary PPM image\n\
         \n\
           --output <path>    Output .ppm file path\n\
           --size <N>         Image width and height in pixels (default: 256)\n\
           --preset <P>       Base pattern index 0..5 (default: from config)\n\
           --shots <list>     Weapons fired before the frame is taken\n\
           --at <secs>        Seconds after the last shot to sample (default: 0.15)\n\
           --config <path>    Shield config JSON\n\
           --seed <N>         RNG seed\n\
         \n\
         Examples:\n\
         \n\
           field-probe run --shots laser,railgun,emp --ticks 180\n\
           field-probe render --output shield.ppm --size 512 --preset 1 --shots kinetic,ion\n"
    );
}

fn parse_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].as_str());
        }
    }
    None
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match parse_value(args, flag) {
        Some(text) => match text.parse::<T>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Error: {flag} expects a number, got {text:?}");
                process::exit(1);
            }
        },
        None => default,
    }
}

fn parse_shots(args: &[String]) -> Vec<WeaponKind> {
    let Some(list) = parse_value(args, "--shots") else {
        return Vec::new();
    };
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match WeaponKind::from_name(name) {
            Some(weapon) => weapon,
            None => {
                eprintln!("Error: unknown weapon {name:?}");
                process::exit(1);
            }
        })
        .collect()
}

fn load_config(args: &[String]) -> ShieldConfig {
    match parse_value(args, "--config") {
        Some(path) => match ShieldConfig::from_file(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        None => load_config_from_env().0,
    }
}

fn build_lab(args: &[String]) -> ShieldLab {
    let config = LabConfig {
        seed: parse_number(args, "--seed", 42u64),
        shield: load_config(args),
    };
    let mut lab = ShieldLab::new(config);
    // Hull emitters for ion arcs, spread around the lower hemisphere.
    lab.set_emitters(vec![
        DVec3::new(5.5, -3.0, 4.5),
        DVec3::new(-5.5, -3.0, 4.5),
        DVec3::new(0.0, -4.0, -6.0),
        DVec3::new(0.0, -2.5, 7.0),
    ]);
    lab
}

/// Strike direction for the `index`th shot: a golden-angle spiral around
/// the side facing the viewer.
fn shot_direction(index: usize) -> DVec3 {
    let angle = index as f64 * 2.399_963;
    let spread = 0.25 + 0.08 * (index % 5) as f64;
    DVec3::new(spread * angle.cos(), spread * angle.sin(), 1.0).normalize()
}

/// Seconds between shots at the configured fire rate.
fn shot_interval(lab: &ShieldLab) -> f64 {
    1.0 / lab.config().fire_rate.max(0.1)
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let shots = parse_shots(args);
    let ticks: u64 = parse_number(args, "--ticks", 120);
    let mut lab = build_lab(args);
    let interval = shot_interval(&lab);

    tracing::info!(
        target: "shieldlab::probe",
        shots = shots.len(),
        ticks,
        "probe.run.start"
    );

    let mut next_shot = 0;
    for _ in 0..ticks {
        while next_shot < shots.len() && next_shot as f64 * interval <= lab.time().elapsed_secs {
            lab.fire_default(shots[next_shot], shot_direction(next_shot));
            next_shot += 1;
        }
        let snapshot = lab.tick(FRAME_DT);
        match serde_json::to_string(&snapshot) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                eprintln!("Error encoding snapshot: {e}");
                process::exit(1);
            }
        }
    }
}

// --- Render command ---

fn cmd_render(args: &[String]) {
    let output = match parse_value(args, "--output") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --output <path> is required");
            process::exit(1);
        }
    };
    let size: usize = parse_number(args, "--size", 256);
    if size == 0 {
        eprintln!("Error: --size must be at least 1");
        process::exit(1);
    }
    let settle: f64 = parse_number(args, "--at", 0.15);

    let shots = parse_shots(args);
    let mut lab = build_lab(args);
    if let Some(preset) = parse_value(args, "--preset") {
        match preset.parse::<u32>() {
            Ok(index) => lab.set_preset(index),
            Err(_) => {
                eprintln!("Error: --preset expects an index 0..5, got {preset:?}");
                process::exit(1);
            }
        }
    }

    let interval = shot_interval(&lab);
    for (i, weapon) in shots.iter().enumerate() {
        lab.fire_default(*weapon, shot_direction(i));
        advance(&mut lab, interval);
    }
    advance(&mut lab, settle.max(0.0));

    let time = lab.time().elapsed_secs;
    let frame = lab.field_frame(time);
    let backdrop = StarfieldEnvironment::default();

    tracing::info!(
        target: "shieldlab::probe",
        size,
        time,
        impacts = frame.impacts().len(),
        "probe.render.start"
    );

    let rows: Vec<Vec<u8>> = (0..size)
        .into_par_iter()
        .map(|row| render_row(&frame, &backdrop, row, size))
        .collect();

    let mut ppm = format!("P6\n{size} {size}\n255\n").into_bytes();
    for row in rows {
        ppm.extend_from_slice(&row);
    }

    match std::fs::write(&output, &ppm) {
        Ok(()) => eprintln!("Done! Output: {} ({} bytes)", output.display(), ppm.len()),
        Err(e) => {
            eprintln!("Error writing {}: {e}", output.display());
            process::exit(1);
        }
    }
}

fn advance(lab: &mut ShieldLab, secs: f64) {
    let steps = (secs / FRAME_DT).round() as u64;
    for _ in 0..steps {
        lab.tick(FRAME_DT);
    }
}

/// One scanline of the shield disc over the star backdrop, 8-bit RGB.
fn render_row(
    frame: &FieldFrame,
    backdrop: &dyn EnvironmentSampler,
    row: usize,
    size: usize,
) -> Vec<u8> {
    let scale = 2.0 / size as f64;
    let y = 1.0 - (row as f64 + 0.5) * scale;
    let mut pixels = Vec::with_capacity(size * 3);

    for col in 0..size {
        let x = (col as f64 + 0.5) * scale - 1.0;
        let behind = backdrop.sample(DVec3::new(x * 0.5, y * 0.5, -1.0));
        let r2 = x * x + y * y;

        let color = if r2 <= 1.0 {
            let normal = DVec3::new(x, y, (1.0 - r2).sqrt());
            let sample = frame.sample(&SurfacePoint::new(normal, DVec3::Z));
            sample.color * sample.opacity + behind * (1.0 - sample.opacity)
        } else {
            behind
        };

        pixels.extend_from_slice(&Rgb::from_vec3(tone_map(color)).to_bytes());
    }
    pixels
}

/// Reinhard tone curve.
fn tone_map(color: DVec3) -> DVec3 {
    color / (DVec3::ONE + color)
}
