#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::config::{ConfigError, ShieldConfig};
    use crate::enums::*;
    use crate::events::{FireReport, ShieldEvent};
    use crate::math::{angular_distance, lerp, reflect, refract, smoothstep};
    use crate::state::{FieldSample, ShieldSnapshot};
    use crate::types::{Impact, Rgb, SimTime};

    #[test]
    fn test_weapon_codes_match_table_order() {
        for (i, weapon) in WeaponKind::ALL.iter().enumerate() {
            assert_eq!(weapon.code() as usize, i);
            assert_eq!(WeaponKind::from_code(i as u8), Some(*weapon));
        }
        assert_eq!(WeaponKind::from_code(6), None);
    }

    #[test]
    fn test_weapon_names() {
        assert_eq!(WeaponKind::from_name("railgun"), Some(WeaponKind::Railgun));
        assert_eq!(WeaponKind::from_name("emp"), Some(WeaponKind::Emp));
        assert_eq!(WeaponKind::from_name("flamethrower"), None);
        for weapon in WeaponKind::ALL {
            assert_eq!(WeaponKind::from_name(weapon.name()), Some(weapon));
        }
    }

    #[test]
    fn test_weapon_kind_serde() {
        let json = serde_json::to_string(&WeaponKind::Railgun).unwrap();
        assert_eq!(json, "\"railgun\"");
        let back: WeaponKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, WeaponKind::Railgun);
    }

    #[test]
    fn test_preset_index_lookup() {
        assert_eq!(Preset::from_index(0), Some(Preset::None));
        assert_eq!(Preset::from_index(3), Some(Preset::HardLight));
        assert_eq!(Preset::from_index(5), Some(Preset::Geodesic));
        assert_eq!(Preset::from_index(6), None);
        assert_eq!(Preset::Plasma.index(), 4);
    }

    #[test]
    fn test_travel_behavior() {
        assert!(TravelBehavior::Beam.is_beam());
        assert_eq!(TravelBehavior::Beam.travel_secs(), 0.0);
        let p = TravelBehavior::Projectile { travel_secs: 0.55 };
        assert!(!p.is_beam());
        assert_eq!(p.travel_secs(), 0.55);

        let json = serde_json::to_string(&p).unwrap();
        let back: TravelBehavior = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    // ---- Colors ----

    #[test]
    fn test_rgb_hex_parse() {
        let c = Rgb::from_hex("#2b8cff").unwrap();
        assert!((c.r - 0x2b as f64 / 255.0).abs() < 1e-12);
        assert!((c.g - 0x8c as f64 / 255.0).abs() < 1e-12);
        assert_eq!(c.b, 1.0);
        assert_eq!(c.to_string(), "#2b8cff");

        assert_eq!(Rgb::from_hex("b6f7ff").unwrap(), Rgb::from_u32(0xb6f7ff));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#zzzzzz").is_err());
        assert!(Rgb::from_hex("#+fffff").is_err());
        assert!(Rgb::from_hex("-00000").is_err());
    }

    #[test]
    fn test_rgb_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::from_u32(0x66ffcc)).unwrap();
        assert_eq!(json, "\"#66ffcc\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::from_u32(0x66ffcc));
        assert!(serde_json::from_str::<Rgb>("\"teal\"").is_err());
    }

    // ---- Math ----

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
        // Reversed edges fall instead of rise.
        assert_eq!(smoothstep(0.48, 0.44, 0.40), 1.0);
        assert_eq!(smoothstep(0.48, 0.44, 0.50), 0.0);
        assert_eq!(lerp(0.015, 0.06, 1.0), 0.06);
    }

    #[test]
    fn test_angular_distance_is_great_circle() {
        assert!(angular_distance(DVec3::Y, DVec3::Y).abs() < 1e-12);
        let quarter = angular_distance(DVec3::Y, DVec3::X);
        assert!((quarter - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        let half = angular_distance(DVec3::Y, -DVec3::Y);
        assert!((half - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_reflect_and_refract() {
        let r = reflect(DVec3::new(1.0, -1.0, 0.0), DVec3::Y);
        assert_eq!(r, DVec3::new(1.0, 1.0, 0.0));

        // Head-on rays pass straight through.
        let t = refract(-DVec3::Z, DVec3::Z, 0.92);
        assert!((t - (-DVec3::Z)).length() < 1e-12);

        // Total internal reflection yields zero.
        let grazing = DVec3::new(1.0, -0.01, 0.0).normalize();
        assert_eq!(refract(grazing, DVec3::Y, 1.5), DVec3::ZERO);
    }

    // ---- Config ----

    #[test]
    fn test_config_defaults() {
        let config = ShieldConfig::default();
        assert_eq!(config.preset, Preset::None);
        assert_eq!(config.overload_threshold, 1.25);
        assert_eq!(config.recovery_rate, 0.28);
        assert_eq!(config.ripple_speed, 2.8);
        assert_eq!(config.base_color, Rgb::from_u32(0x2b8cff));
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = ShieldConfig::from_json_str(
            r##"{ "preset": "hex_cells", "rim_color": "#ff0000", "recovery_rate": 0.5 }"##,
        )
        .unwrap();
        assert_eq!(config.preset, Preset::HexCells);
        assert_eq!(config.rim_color, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(config.recovery_rate, 0.5);
        assert_eq!(config.ripple_decay, ShieldConfig::default().ripple_decay);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = ShieldConfig::default();
        config.preset = Preset::Geodesic;
        config.tight_bubble = true;
        let json = config.to_json_string().unwrap();
        let back = ShieldConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_config_errors() {
        let err = ShieldConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err =
            ShieldConfig::from_file(std::path::Path::new("/nonexistent/shield.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("shield.json"));
    }

    // ---- Wire types ----

    #[test]
    fn test_snapshot_serde() {
        let snap = ShieldSnapshot {
            time: SimTime {
                tick: 3,
                elapsed_secs: 0.05,
            },
            energy: 0.9,
            energy_percent: 90,
            preset: Preset::MagneticField,
            events: vec![
                ShieldEvent::Fired {
                    weapon: WeaponKind::Ion,
                    impact_strength: 0.52,
                    energy_after: 0.9,
                },
                ShieldEvent::OverloadEntered { overheat: 1.3 },
                ShieldEvent::Reset,
            ],
            ..Default::default()
        };
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"type\":\"Fired\""));
        let back: ShieldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.events, snap.events);
        assert_eq!(back.energy_percent, 90);
    }

    #[test]
    fn test_fire_report_and_impact_serde() {
        let report = FireReport {
            weapon: WeaponKind::Plasma,
            impact_strength: 0.495,
            energy_after: 0.9685,
            overheat_after: 0.324,
            impact_direction: DVec3::Z,
            travel: TravelBehavior::Projectile { travel_secs: 0.55 },
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: FireReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);

        let impact = Impact {
            direction: DVec3::X,
            timestamp: 1.5,
            strength: 1.2,
            weapon: WeaponKind::Kinetic,
        };
        assert_eq!(impact.type_code(), 2.0);
        let sample = FieldSample {
            color: DVec3::new(0.2, 0.4, 1.0),
            opacity: 0.3,
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(serde_json::from_str::<FieldSample>(&json).unwrap(), sample);
    }
}
