//! Data-driven effect balance
//!
//! Every magic number of the widget lives here. Two presets exist: `default`
//! (the full effect set with flying effects, shake and heightened mode) and
//! `classic` (the toned-down first version: a fixed particle burst, a click lockout
//! and a batch clear). Custom tunings can be loaded from JSON; missing fields
//! fall back to the default preset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hex_to_rgb;

/// Errors from loading or validating a tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Most particles one click may spawn
pub const MAX_PARTICLES_PER_CLICK: u32 = 1000;

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Named tuning presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TuningPreset {
    #[default]
    Default,
    Classic,
}

impl TuningPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TuningPreset::Default => "default",
            TuningPreset::Classic => "classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" | "full" => Some(TuningPreset::Default),
            "classic" | "original" => Some(TuningPreset::Classic),
            _ => None,
        }
    }

    pub fn tuning(&self) -> Tuning {
        match self {
            TuningPreset::Default => Tuning::default(),
            TuningPreset::Classic => Tuning::classic(),
        }
    }
}

/// Spawn distribution of one flying-effect kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectTuning {
    /// Probability of this kind being picked on a click (0-1)
    pub chance: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub life_min: f32,
    pub life_max: f32,
    pub size_min: f32,
    pub size_max: f32,
}

impl EffectTuning {
    fn validate(&self, field: &'static str) -> Result<(), TuningError> {
        if !(0.0..=1.0).contains(&self.chance) {
            return Err(invalid(field, format!("chance {} outside 0..=1", self.chance)));
        }
        if self.speed_min < 0.0 || self.speed_min > self.speed_max {
            return Err(invalid(field, "speed range is empty or negative"));
        }
        if self.life_min <= 0.0 || self.life_min > self.life_max {
            return Err(invalid(field, "life range must be positive and ordered"));
        }
        if self.size_min <= 0.0 || self.size_min > self.size_max {
            return Err(invalid(field, "size range must be positive and ordered"));
        }
        Ok(())
    }
}

/// Click sound envelope parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneTuning {
    /// Frequency of the first click (Hz)
    pub base_hz: f32,
    /// Added per click (Hz)
    pub step_hz: f32,
    /// Ceiling for the starting frequency (Hz)
    pub max_hz: f32,
    /// Frequency the sweep ends on (Hz)
    pub sweep_hz: f32,
    pub duration_ms: u32,
    /// Starting gain (before volume settings)
    pub gain: f32,
}

/// Complete widget tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Particles ===
    /// Particles spawned by the first click
    pub min_particles: u32,
    /// One extra particle per this many clicks
    pub particles_growth_every: u64,
    pub max_extra_particles: u32,
    pub particle_speed_min: f32,
    pub particle_speed_max: f32,
    pub particle_life: f32,
    pub particle_size: f32,
    /// Life lost per tick
    pub particle_decay: f32,
    /// Size multiplier per tick
    pub particle_shrink: f32,
    /// Added to vertical velocity per tick (particles only)
    pub gravity: f32,

    // === Flying effects ===
    pub star: EffectTuning,
    pub comet: EffectTuning,
    pub lightning: EffectTuning,
    pub effect_decay: f32,
    pub effect_shrink: f32,
    /// Chance multiplier once heightened mode is active
    pub heightened_effect_boost: f32,

    // === Shared physics ===
    /// Position advances by `velocity * velocity_scale` per tick
    pub velocity_scale: f32,
    /// Entities further than this outside the viewport are culled
    pub cull_margin: f32,
    /// Hard cap on live entities
    pub max_entities: usize,

    // === Button ===
    pub scale_pop: f32,
    pub scale_reset_ms: u32,
    pub rotation_step_deg: f32,
    pub heightened_rotation_step_deg: f32,
    pub glow_reset_ms: u32,
    pub shake_per_click: f32,
    pub shake_max: f32,
    pub shake_clear_ms: u32,
    pub heightened_threshold: u64,

    // === Sound ===
    pub tone: ToneTuning,

    // === Click pacing ===
    /// Ignore clicks for this long after an accepted one
    pub lockout_ms: Option<u32>,
    /// Clear every live entity this long after the last accepted click
    pub clear_batch_ms: Option<u32>,

    // === Content ===
    pub phrases: Vec<String>,
    /// `#RRGGBB` colors for particles and the button gradient
    pub palette: Vec<String>,
}

const PHRASES: [&str; 15] = [
    "BOOM!",
    "POW!",
    "ZAP!",
    "WOW!",
    "AMAZING!",
    "INCREDIBLE!",
    "FANTASTIC!",
    "EPIC!",
    "LEGENDARY!",
    "MIND-BLOWING!",
    "AWESOME!",
    "SPECTACULAR!",
    "PHENOMENAL!",
    "EXTRAORDINARY!",
    "MAGNIFICENT!",
];

const PALETTE: [&str; 15] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9", "#F8C471", "#82E0AA", "#F1948A", "#85C1E9", "#D7BDE2",
];

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_particles: 15,
            particles_growth_every: 10,
            max_extra_particles: 15,
            particle_speed_min: 20.0,
            particle_speed_max: 60.0,
            particle_life: 1.0,
            particle_size: 12.0,
            particle_decay: 0.03, // ~34 ticks
            particle_shrink: 0.97,
            gravity: 0.5,

            star: EffectTuning {
                chance: 0.3,
                speed_min: 5.0,
                speed_max: 20.0,
                life_min: 1.5,
                life_max: 2.5,
                size_min: 18.0,
                size_max: 30.0,
            },
            comet: EffectTuning {
                chance: 0.2,
                speed_min: 40.0,
                speed_max: 80.0,
                life_min: 1.0,
                life_max: 1.6,
                size_min: 10.0,
                size_max: 16.0,
            },
            lightning: EffectTuning {
                chance: 0.1,
                speed_min: 0.0,
                speed_max: 2.0,
                life_min: 0.4,
                life_max: 0.7,
                size_min: 40.0,
                size_max: 80.0,
            },
            effect_decay: 0.02,
            effect_shrink: 0.99,
            heightened_effect_boost: 1.5,

            velocity_scale: 0.1,
            cull_margin: 50.0,
            max_entities: 400,

            scale_pop: 1.3,
            scale_reset_ms: 150,
            rotation_step_deg: 360.0,
            heightened_rotation_step_deg: 720.0,
            glow_reset_ms: 300,
            shake_per_click: 0.5,
            shake_max: 12.0,
            shake_clear_ms: 80,
            heightened_threshold: 50,

            tone: ToneTuning {
                base_hz: 200.0,
                step_hz: 50.0,
                max_hz: 2000.0,
                sweep_hz: 800.0,
                duration_ms: 100,
                gain: 0.3,
            },

            lockout_ms: None,
            clear_batch_ms: None,

            phrases: PHRASES.iter().map(|s| s.to_string()).collect(),
            palette: PALETTE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Tuning {
    /// The first-version fixed-burst button: 15 particles, no flying effects,
    /// one-second lockout and batch clear
    pub fn classic() -> Self {
        let no_effect = EffectTuning {
            chance: 0.0,
            ..Self::default().star
        };
        Self {
            max_extra_particles: 0,
            particle_speed_min: 0.0,
            particle_speed_max: 14.0,
            particle_decay: 0.016, // ~1 second at 16ms ticks
            particle_shrink: 1.0,
            star: no_effect,
            comet: EffectTuning {
                chance: 0.0,
                ..Self::default().comet
            },
            lightning: EffectTuning {
                chance: 0.0,
                ..Self::default().lightning
            },
            heightened_rotation_step_deg: 360.0,
            shake_per_click: 5.0,
            shake_max: 5.0,
            lockout_ms: Some(1000),
            clear_batch_ms: Some(1000),
            ..Self::default()
        }
    }

    /// Parse and validate a tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Tuning for a new mount: `json` when present and valid, else the preset.
    /// A rejected override is logged, never fatal.
    pub fn load_or_preset(json: Option<&str>, preset: TuningPreset) -> Self {
        let Some(json) = json.map(str::trim).filter(|j| !j.is_empty()) else {
            return preset.tuning();
        };
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Using custom tuning");
                tuning
            }
            Err(e) => {
                log::warn!("{}; falling back to {} tuning", e, preset.as_str());
                preset.tuning()
            }
        }
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.particles_growth_every == 0 {
            return Err(invalid("particles_growth_every", "must be at least 1"));
        }
        if self.min_particles.saturating_add(self.max_extra_particles) > MAX_PARTICLES_PER_CLICK {
            return Err(invalid(
                "max_extra_particles",
                format!("a click may spawn at most {MAX_PARTICLES_PER_CLICK} particles"),
            ));
        }
        if self.particle_speed_min < 0.0 || self.particle_speed_min > self.particle_speed_max {
            return Err(invalid("particle_speed_min", "speed range is empty or negative"));
        }
        if self.particle_life <= 0.0 {
            return Err(invalid("particle_life", "must be positive"));
        }
        if self.particle_size <= 0.0 {
            return Err(invalid("particle_size", "must be positive"));
        }
        if self.particle_decay <= 0.0 {
            return Err(invalid("particle_decay", "must be positive"));
        }
        if self.effect_decay <= 0.0 {
            return Err(invalid("effect_decay", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.particle_shrink) || self.particle_shrink == 0.0 {
            return Err(invalid("particle_shrink", "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.effect_shrink) || self.effect_shrink == 0.0 {
            return Err(invalid("effect_shrink", "must be in (0, 1]"));
        }
        self.star.validate("star")?;
        self.comet.validate("comet")?;
        self.lightning.validate("lightning")?;
        if self.total_effect_chance() > 1.0 + f32::EPSILON {
            return Err(invalid("star", "effect chances add up to more than 1"));
        }
        if self.heightened_effect_boost < 0.0 {
            return Err(invalid("heightened_effect_boost", "must not be negative"));
        }
        if self.velocity_scale < 0.0 {
            return Err(invalid("velocity_scale", "must not be negative"));
        }
        if self.cull_margin < 0.0 {
            return Err(invalid("cull_margin", "must not be negative"));
        }
        if self.max_entities == 0 {
            return Err(invalid("max_entities", "must be at least 1"));
        }
        if self.heightened_threshold == 0 {
            return Err(invalid("heightened_threshold", "must be at least 1"));
        }
        if self.tone.base_hz <= 0.0 || self.tone.sweep_hz <= 0.0 || self.tone.max_hz <= 0.0 {
            return Err(invalid("tone", "frequencies must be positive"));
        }
        if self.phrases.is_empty() {
            return Err(invalid("phrases", "need at least one phrase"));
        }
        if self.palette.is_empty() {
            return Err(invalid("palette", "need at least one color"));
        }
        if let Some(bad) = self.palette.iter().find(|c| hex_to_rgb(c).is_none()) {
            return Err(invalid("palette", format!("`{bad}` is not a #RRGGBB color")));
        }
        Ok(())
    }

    /// Sum of the three flying-effect chances
    pub fn total_effect_chance(&self) -> f32 {
        self.star.chance + self.comet.chance + self.lightning.chance
    }

    /// Particle batch size for the given (already incremented) click count
    pub fn particle_batch(&self, click_count: u64) -> u32 {
        let extra = (click_count / self.particles_growth_every).min(self.max_extra_particles as u64);
        self.min_particles.saturating_add(extra as u32)
    }

    /// Screen shake magnitude for the given click count
    pub fn shake_magnitude(&self, click_count: u64) -> f32 {
        (click_count as f32 * self.shake_per_click).min(self.shake_max)
    }

    /// Palette as RGB triples (invalid entries are skipped)
    pub fn palette_rgb(&self) -> Vec<[f32; 3]> {
        self.palette.iter().filter_map(|c| hex_to_rgb(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        Tuning::default().validate().unwrap();
        Tuning::classic().validate().unwrap();
    }

    #[test]
    fn test_particle_batch_scales_mildly() {
        let tuning = Tuning::default();
        assert_eq!(tuning.particle_batch(1), 15);
        assert_eq!(tuning.particle_batch(9), 15);
        assert_eq!(tuning.particle_batch(10), 16);
        assert_eq!(tuning.particle_batch(55), 20);
        // Capped
        assert_eq!(tuning.particle_batch(10_000), 30);

        let classic = Tuning::classic();
        assert_eq!(classic.particle_batch(1), 15);
        assert_eq!(classic.particle_batch(500), 15);
    }

    #[test]
    fn test_shake_magnitude_capped() {
        let tuning = Tuning::default();
        assert_eq!(tuning.shake_magnitude(0), 0.0);
        assert_eq!(tuning.shake_magnitude(4), 2.0);
        assert_eq!(tuning.shake_magnitude(1000), tuning.shake_max);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "min_particles": 3, "lockout_ms": 250 }"#).unwrap();
        assert_eq!(tuning.min_particles, 3);
        assert_eq!(tuning.lockout_ms, Some(250));
        assert_eq!(tuning.heightened_threshold, 50);
        assert_eq!(tuning.phrases.len(), 15);
    }

    #[test]
    fn test_json_roundtrip() {
        let classic = Tuning::classic();
        let json = serde_json::to_string(&classic).unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), classic);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "particle_decay": 0.0 }"#),
            Err(TuningError::Invalid { field: "particle_decay", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r##"{ "palette": ["#12345"] }"##),
            Err(TuningError::Invalid { field: "palette", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "phrases": [] }"#),
            Err(TuningError::Invalid { field: "phrases", .. })
        ));

        let mut greedy = Tuning::default();
        greedy.star.chance = 0.9;
        assert!(greedy.validate().is_err());
    }

    #[test]
    fn test_particle_budget_bounded() {
        assert!(matches!(
            Tuning::from_json(r#"{ "min_particles": 4294967295, "max_extra_particles": 5 }"#),
            Err(TuningError::Invalid { field: "max_extra_particles", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "min_particles": 990, "max_extra_particles": 11 }"#),
            Err(TuningError::Invalid { .. })
        ));
        assert!(Tuning::from_json(r#"{ "min_particles": 990, "max_extra_particles": 10 }"#).is_ok());

        // Unvalidated extremes saturate instead of wrapping
        let mut extreme = Tuning::default();
        extreme.min_particles = u32::MAX;
        extreme.max_extra_particles = u32::MAX;
        extreme.particles_growth_every = 1;
        assert_eq!(extreme.particle_batch(u64::MAX), u32::MAX);
    }

    #[test]
    fn test_load_or_preset() {
        let custom = Tuning::load_or_preset(Some(r#"{ "min_particles": 4 }"#), TuningPreset::Classic);
        assert_eq!(custom.min_particles, 4);

        let fallback = Tuning::load_or_preset(Some("{ broken"), TuningPreset::Classic);
        assert_eq!(fallback, Tuning::classic());

        let invalid = Tuning::load_or_preset(Some(r#"{ "phrases": [] }"#), TuningPreset::Default);
        assert_eq!(invalid, Tuning::default());

        assert_eq!(Tuning::load_or_preset(None, TuningPreset::Classic), Tuning::classic());
        assert_eq!(Tuning::load_or_preset(Some("  \n"), TuningPreset::Default), Tuning::default());
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(TuningPreset::from_str("Classic"), Some(TuningPreset::Classic));
        assert_eq!(TuningPreset::from_str("default"), Some(TuningPreset::Default));
        assert_eq!(TuningPreset::from_str("turbo"), None);
        assert_eq!(TuningPreset::Classic.tuning(), Tuning::classic());
    }
}
