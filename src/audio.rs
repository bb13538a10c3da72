//! Click sounds
//!
//! Each click asks for one short percussive tone: an oscillator whose pitch
//! climbs with the click count and sweeps upward while the gain falls off
//! exponentially. The envelope math is plain Rust; playback goes through
//! [`AudioSink`], backed by the Web Audio API in the browser build.

use serde::{Deserialize, Serialize};

use crate::tuning::ToneTuning;

/// Gain the envelope decays to (exponential ramps cannot reach zero)
pub const ENVELOPE_FLOOR: f32 = 0.01;

/// A single synthesized tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneRequest {
    pub start_hz: f32,
    pub end_hz: f32,
    pub start_gain: f32,
    pub end_gain: f32,
    pub duration_ms: u32,
}

impl ToneRequest {
    /// Tone for the `click_count`-th click (1-based); the first click plays
    /// the base frequency
    pub fn for_click(tone: &ToneTuning, click_count: u64) -> Self {
        let steps = click_count.saturating_sub(1) as f32;
        let start_hz = (tone.base_hz + steps * tone.step_hz).min(tone.max_hz);
        Self {
            start_hz,
            end_hz: tone.sweep_hz,
            start_gain: tone.gain,
            end_gain: ENVELOPE_FLOOR,
            duration_ms: tone.duration_ms,
        }
    }

    /// The tone as heard at `volume`; both gain endpoints are scaled so the
    /// envelope still decays. None when silent.
    pub fn at_volume(&self, volume: f32) -> Option<Self> {
        if !(volume > 0.0) {
            return None;
        }
        Some(Self {
            start_gain: self.start_gain * volume,
            end_gain: (self.end_gain * volume).min(self.start_gain * volume),
            ..*self
        })
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// Oscillator frequency `t_ms` into the tone (exponential ramp)
    pub fn frequency_at(&self, t_ms: f32) -> f32 {
        exp_ramp(self.start_hz, self.end_hz, self.progress(t_ms))
    }

    /// Gain `t_ms` into the tone (exponential ramp)
    pub fn gain_at(&self, t_ms: f32) -> f32 {
        exp_ramp(self.start_gain, self.end_gain, self.progress(t_ms))
    }

    fn progress(&self, t_ms: f32) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (t_ms / self.duration_ms as f32).clamp(0.0, 1.0)
    }
}

fn exp_ramp(from: f32, to: f32, t: f32) -> f32 {
    if from <= 0.0 || to <= 0.0 {
        return from + (to - from) * t;
    }
    from * (to / from).powf(t)
}

/// Anything that can play a tone. Best effort: failures are swallowed.
pub trait AudioSink {
    fn play_tone(&self, tone: &ToneRequest);
}

/// Sink for environments without audio
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_tone(&self, tone: &ToneRequest) {
        log::trace!("(silent) tone {:.0} Hz -> {:.0} Hz", tone.start_hz, tone.end_hz);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, ToneRequest};

    /// Web Audio backend
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        /// Open an audio context playing at `volume` (see `Settings::effective_volume`)
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context; clicks stay silent then
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }

    impl AudioSink for AudioManager {
        fn play_tone(&self, tone: &ToneRequest) {
            let Some(tone) = tone.at_volume(self.volume) else {
                return;
            };
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some((osc, gain)) = self.create_osc(ctx, tone.start_hz, OscillatorType::Sine)
            else {
                return;
            };
            let t = ctx.current_time();
            let end = t + tone.duration_secs();

            osc.frequency().set_value_at_time(tone.start_hz, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.end_hz, end)
                .ok();

            gain.gain().set_value_at_time(tone.start_gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(tone.end_gain, end)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(end).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::tuning::Tuning;

    #[test]
    fn test_pitch_rises_with_clicks() {
        let tone = Tuning::default().tone;
        let first = ToneRequest::for_click(&tone, 1);
        let fifth = ToneRequest::for_click(&tone, 5);
        assert_eq!(first.start_hz, 200.0);
        assert_eq!(fifth.start_hz, 400.0);
        assert_eq!(first.end_hz, 800.0);
        assert_eq!(first.duration_ms, 100);
    }

    #[test]
    fn test_pitch_capped() {
        let tone = Tuning::default().tone;
        let loud = ToneRequest::for_click(&tone, 10_000);
        assert_eq!(loud.start_hz, tone.max_hz);
    }

    #[test]
    fn test_envelope_endpoints() {
        let tone = ToneRequest::for_click(&Tuning::default().tone, 1);
        assert!((tone.gain_at(0.0) - 0.3).abs() < 1e-6);
        assert!((tone.gain_at(100.0) - ENVELOPE_FLOOR).abs() < 1e-6);
        assert!((tone.gain_at(500.0) - ENVELOPE_FLOOR).abs() < 1e-6);
        assert!((tone.frequency_at(0.0) - 200.0).abs() < 1e-3);
        assert!((tone.frequency_at(100.0) - 800.0).abs() < 1e-2);

        // Sweep is monotonic upward, gain monotonic downward
        let mut last_hz = 0.0;
        let mut last_gain = f32::MAX;
        for t in (0..=100).step_by(10) {
            let hz = tone.frequency_at(t as f32);
            let gain = tone.gain_at(t as f32);
            assert!(hz >= last_hz);
            assert!(gain <= last_gain);
            last_hz = hz;
            last_gain = gain;
        }
    }

    #[test]
    fn test_quiet_tone_still_decays() {
        let mut settings = Settings::default();
        settings.apply_query("volume=0.02");
        let tone = ToneRequest::for_click(&Tuning::default().tone, 1)
            .at_volume(settings.effective_volume())
            .unwrap();

        assert!((tone.start_gain - 0.3 * 0.02 * 1.0).abs() < 1e-6);
        assert!(tone.end_gain < tone.start_gain);
        assert!(tone.gain_at(100.0) < tone.gain_at(0.0));
        assert_eq!(tone.start_hz, 200.0);
    }

    #[test]
    fn test_silent_tone_is_dropped() {
        let tone = ToneRequest::for_click(&Tuning::default().tone, 3);
        assert!(tone.at_volume(0.0).is_none());
        assert!(tone.at_volume(f32::NAN).is_none());

        let mut muted = Settings::default();
        muted.apply_query("muted=1");
        assert!(tone.at_volume(muted.effective_volume()).is_none());
        assert_eq!(tone.at_volume(1.0), Some(tone));
    }
}
