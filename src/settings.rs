//! Player preferences
//!
//! Nothing is stored between visits; the browser build reads overrides from
//! the page query string (`?quality=low&muted=1`).

use serde::{Deserialize, Serialize};

use crate::tuning::TuningPreset;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live entities for this preset
    pub fn max_entities(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 250,
            QualityPreset::High => 1000,
        }
    }

    /// Circle tessellation for particles
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 10,
            QualityPreset::High => 16,
        }
    }
}

/// Widget settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Which tuning preset the widget mounts with
    pub preset: TuningPreset,
    /// Seed for the effect RNG (None = time based)
    pub seed: Option<u64>,

    // === Visual Effects ===
    /// Screen shake on click
    pub screen_shake: bool,
    /// Particle bursts
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            preset: TuningPreset::Default,
            seed: None,

            screen_shake: true,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective entity cap
    pub fn max_entities(&self) -> usize {
        self.quality.max_entities()
    }

    /// Volume applied to click sounds
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Apply `key=value` pairs from a URL query string.
    ///
    /// Unknown keys and unparsable values are logged and skipped.
    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "1"));
            if !self.apply_pair(key, value) {
                log::warn!("Ignoring query setting `{}={}`", key, value);
            }
        }
    }

    fn apply_pair(&mut self, key: &str, value: &str) -> bool {
        match key {
            "quality" => QualityPreset::from_str(value).map(|q| self.quality = q).is_some(),
            "preset" => TuningPreset::from_str(value).map(|p| self.preset = p).is_some(),
            "seed" => value.parse().map(|s| self.seed = Some(s)).is_ok(),
            "muted" => parse_flag(value).map(|b| self.muted = b).is_some(),
            "shake" => parse_flag(value).map(|b| self.screen_shake = b).is_some(),
            "particles" => parse_flag(value).map(|b| self.particles = b).is_some(),
            "reduced_motion" => parse_flag(value).map(|b| self.reduced_motion = b).is_some(),
            "volume" => value
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| self.master_volume = v.clamp(0.0, 1.0))
                .is_some(),
            _ => false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_apply_query() {
        let mut settings = Settings::default();
        settings.apply_query("?quality=low&preset=classic&seed=42&muted&volume=3.5");
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.preset, TuningPreset::Classic);
        assert_eq!(settings.seed, Some(42));
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.max_entities(), 60);
    }

    #[test]
    fn test_apply_query_ignores_garbage() {
        let mut settings = Settings::default();
        settings.apply_query("quality=ultra&seed=abc&bogus=1&&reduced_motion=maybe");
        assert_eq!(settings, Settings::default());
    }
}
