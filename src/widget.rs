//! The mounted click widget
//!
//! Owns the simulation state, the RNG and the one-shot scheduler, and ties
//! them to a mount/teardown lifecycle. The host calls [`ClickWidget::click`]
//! for pointer clicks and [`ClickWidget::tick`] every [`TICK_MS`]; once torn
//! down both do nothing.

use glam::Vec2;

use crate::audio::AudioSink;
use crate::consts::TICK_MS;
use crate::settings::Settings;
use crate::sim::{
    ClickOptions, ClickOutcome, RandomSource, Scheduler, SimRng, TickReport, Viewport,
    WidgetState, apply_task, handle_click, tick,
};
use crate::tuning::Tuning;

pub struct ClickWidget {
    state: WidgetState,
    tuning: Tuning,
    settings: Settings,
    options: ClickOptions,
    rng: Box<dyn RandomSource>,
    scheduler: Scheduler,
    mounted: bool,
    ticks: u64,
}

impl ClickWidget {
    /// Mount a widget with a seeded PCG RNG
    pub fn new(tuning: Tuning, settings: Settings, viewport: Viewport, seed: u64) -> Self {
        log::info!(
            "Mounting click widget ({}x{}, seed {})",
            viewport.width,
            viewport.height,
            seed
        );
        Self::with_rng(tuning, settings, viewport, Box::new(SimRng::new(seed)))
    }

    /// Mount a widget drawing from any random source
    pub fn with_rng(
        tuning: Tuning,
        settings: Settings,
        viewport: Viewport,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let options = ClickOptions::from_settings(&settings);
        Self {
            state: WidgetState::new(viewport),
            tuning,
            settings,
            options,
            rng,
            scheduler: Scheduler::new(),
            mounted: true,
            ticks: 0,
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Ticks run since mounting
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Milliseconds of widget time since mounting
    pub fn elapsed_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Swap preferences (takes effect from the next click)
    pub fn set_settings(&mut self, settings: Settings) {
        self.options = ClickOptions::from_settings(&settings);
        self.settings = settings;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.state.viewport = Viewport::new(width, height);
        }
    }

    /// Pointer click at viewport coordinates; plays the click tone on `audio`
    pub fn click(&mut self, x: f32, y: f32, audio: &dyn AudioSink) -> ClickOutcome {
        if !self.mounted {
            log::warn!("Click after teardown ignored");
            return ClickOutcome::default();
        }

        let outcome = handle_click(
            &mut self.state,
            &mut self.scheduler,
            &self.tuning,
            &self.options,
            self.rng.as_mut(),
            Vec2::new(x, y),
        );
        if let Some(tone) = &outcome.tone {
            audio.play_tone(tone);
        }
        outcome
    }

    /// One animation tick: advance entities, then fire due one-shot tasks.
    /// Returns None once torn down.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.mounted {
            return None;
        }

        let report = tick(&mut self.state, &self.tuning);
        for task in self.scheduler.advance(TICK_MS) {
            apply_task(&mut self.state, task);
        }
        self.ticks += 1;
        Some(report)
    }

    /// Stop ticking, cancel pending tasks and drop every entity
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.scheduler.cancel_all();
        self.state.field.clear();
        log::info!(
            "Click widget torn down after {} clicks, {} ticks",
            self.state.display.click_count(),
            self.ticks
        );
    }
}
