//! Pointer click handling
//!
//! A click bumps the counter, requests a tone, bursts particles at the
//! pointer, maybe launches one flying effect somewhere on screen, and kicks
//! off the transient button animations. Nothing in here can fail.

use glam::Vec2;

use super::entity::EntityKind;
use super::rng::RandomSource;
use super::state::WidgetState;
use super::timers::{Scheduler, TaskKind};
use crate::audio::ToneRequest;
use crate::polar_offset;
use crate::settings::Settings;
use crate::tuning::{EffectTuning, Tuning};

/// Per-user switches that shape a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOptions {
    pub shake: bool,
    pub particles: bool,
    pub max_entities: usize,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ClickOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            shake: settings.effective_screen_shake(),
            particles: settings.particles,
            max_entities: settings.max_entities(),
        }
    }
}

/// What a click did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClickOutcome {
    /// False when the click landed during a lockout and was ignored
    pub accepted: bool,
    pub click_count: u64,
    pub tone: Option<ToneRequest>,
    pub particles_spawned: u32,
    pub effect: Option<EntityKind>,
    /// True only on the click that switched heightened mode on
    pub entered_heightened: bool,
    /// Entities dropped to respect the cap
    pub evicted: usize,
}

/// Handle one pointer click at `pos` (viewport pixels)
pub fn handle_click(
    state: &mut WidgetState,
    scheduler: &mut Scheduler,
    tuning: &Tuning,
    options: &ClickOptions,
    rng: &mut dyn RandomSource,
    pos: Vec2,
) -> ClickOutcome {
    if state.display.locked {
        return ClickOutcome {
            click_count: state.display.click_count(),
            ..Default::default()
        };
    }

    let count = state.display.register_click();
    let tone = ToneRequest::for_click(&tuning.tone, count);

    let particles_spawned = if options.particles {
        spawn_particles(state, tuning, rng, pos, count)
    } else {
        0
    };
    let effect = spawn_flying_effect(state, tuning, rng);
    let evicted = state
        .field
        .enforce_cap(tuning.max_entities.min(options.max_entities));

    let display = &mut state.display;
    if !tuning.phrases.is_empty() {
        display.label = tuning.phrases[rng.index(tuning.phrases.len())].clone();
    }

    display.scale = tuning.scale_pop;
    scheduler.schedule(TaskKind::ResetScale, tuning.scale_reset_ms);

    display.rotation_deg += if display.heightened() {
        tuning.heightened_rotation_step_deg
    } else {
        tuning.rotation_step_deg
    };

    display.glow = 1.0;
    scheduler.schedule(TaskKind::ResetGlow, tuning.glow_reset_ms);

    let magnitude = tuning.shake_magnitude(count);
    if options.shake && magnitude > 0.0 {
        let offset = Vec2::new(
            rng.range(-magnitude, magnitude),
            rng.range(-magnitude, magnitude),
        );
        display.shake = Some(offset);
        scheduler.schedule(TaskKind::ClearShake, tuning.shake_clear_ms);
    }

    let entered_heightened = count >= tuning.heightened_threshold && display.enter_heightened();
    if entered_heightened {
        log::info!("Heightened mode unlocked at click {}", count);
    }

    if let Some(ms) = tuning.lockout_ms {
        display.locked = true;
        scheduler.schedule(TaskKind::Unlock, ms);
    }
    if let Some(ms) = tuning.clear_batch_ms {
        scheduler.schedule(TaskKind::ClearBatch, ms);
    }

    log::debug!(
        "Click {} at ({:.0}, {:.0}): {} particles, effect {:?}",
        count,
        pos.x,
        pos.y,
        particles_spawned,
        effect
    );

    ClickOutcome {
        accepted: true,
        click_count: count,
        tone: Some(tone),
        particles_spawned,
        effect,
        entered_heightened,
        evicted,
    }
}

/// Burst of particles flying outward from `pos`
fn spawn_particles(
    state: &mut WidgetState,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
    pos: Vec2,
    count: u64,
) -> u32 {
    let palette = tuning.palette_rgb();
    let batch = tuning.particle_batch(count);

    for _ in 0..batch {
        let angle = rng.angle();
        let speed = rng.range(tuning.particle_speed_min, tuning.particle_speed_max);
        let color = if palette.is_empty() {
            [1.0; 3]
        } else {
            palette[rng.index(palette.len())]
        };
        let kind = EntityKind::PARTICLES[rng.index(EntityKind::PARTICLES.len())];

        state.field.spawn(
            kind,
            pos,
            polar_offset(speed, angle),
            color,
            tuning.particle_size,
            tuning.particle_life,
        );
    }

    batch
}

/// Roll for at most one flying effect at a random viewport position
fn spawn_flying_effect(
    state: &mut WidgetState,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) -> Option<EntityKind> {
    let kind = pick_effect_kind(tuning, state.display.heightened(), rng.unit())?;
    let ranges = effect_tuning(tuning, kind);

    let pos = state.viewport.random_point(rng);
    let angle = rng.angle();
    let speed = rng.range(ranges.speed_min, ranges.speed_max);
    let life = rng.range(ranges.life_min, ranges.life_max);
    let size = rng.range(ranges.size_min, ranges.size_max);

    state.field.spawn(
        kind,
        pos,
        polar_offset(speed, angle),
        kind.effect_color(),
        size,
        life,
    );
    Some(kind)
}

fn effect_tuning(tuning: &Tuning, kind: EntityKind) -> &EffectTuning {
    match kind {
        EntityKind::Comet => &tuning.comet,
        EntityKind::Lightning => &tuning.lightning,
        _ => &tuning.star,
    }
}

/// Map a unit roll onto the cumulative effect chances
pub fn pick_effect_kind(tuning: &Tuning, heightened: bool, roll: f32) -> Option<EntityKind> {
    let total = tuning.total_effect_chance();
    if total <= 0.0 {
        return None;
    }

    let mut boost = if heightened {
        tuning.heightened_effect_boost
    } else {
        1.0
    };
    if total * boost > 1.0 {
        boost = 1.0 / total;
    }

    let mut threshold = 0.0;
    for (kind, effect) in [
        (EntityKind::Star, &tuning.star),
        (EntityKind::Comet, &tuning.comet),
        (EntityKind::Lightning, &tuning.lightning),
    ] {
        threshold += effect.chance * boost;
        if roll < threshold {
            return Some(kind);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRandom, SimRng};
    use crate::sim::state::Viewport;
    use crate::sim::tick::tick;
    use proptest::prelude::*;

    fn click_at(
        state: &mut WidgetState,
        scheduler: &mut Scheduler,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
        pos: Vec2,
    ) -> ClickOutcome {
        handle_click(state, scheduler, tuning, &ClickOptions::default(), rng, pos)
    }

    #[test]
    fn test_first_click_spawns_minimum_batch() {
        let mut tuning = Tuning::default();
        // No flying effect, so only the burst is live
        tuning.star.chance = 0.0;
        tuning.comet.chance = 0.0;
        tuning.lightning.chance = 0.0;

        let mut state = WidgetState::default();
        let mut scheduler = Scheduler::new();
        let mut rng = SimRng::new(1);
        let click = Vec2::new(50.0, 50.0);

        let outcome = click_at(&mut state, &mut scheduler, &tuning, &mut rng, click);
        assert!(outcome.accepted);
        assert_eq!(outcome.click_count, 1);
        assert_eq!(outcome.particles_spawned, tuning.min_particles);
        assert_eq!(state.field.particle_count(), tuning.min_particles as usize);
        assert!(state
            .field
            .entities
            .iter()
            .all(|e| e.pos == click && e.life > 0.0 && e.kind.is_particle()));

        for _ in 0..40 {
            tick(&mut state, &tuning);
        }
        assert_eq!(state.field.particle_count(), 0);
    }

    #[test]
    fn test_heightened_at_fiftieth_click() {
        let tuning = Tuning::default();
        let mut state = WidgetState::default();
        let mut scheduler = Scheduler::new();
        let mut rng = SimRng::new(99);

        for i in 1..50 {
            let outcome = click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::ZERO);
            assert_eq!(outcome.click_count, i);
            assert!(!outcome.entered_heightened);
        }
        assert!(!state.display.heightened());

        let outcome = click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::ZERO);
        assert!(outcome.entered_heightened);
        assert!(state.display.heightened());

        let outcome = click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::ZERO);
        assert!(!outcome.entered_heightened);
        assert!(state.display.heightened());
    }

    #[test]
    fn test_display_mutations() {
        let tuning = Tuning::default();
        let mut state = WidgetState::default();
        let mut scheduler = Scheduler::new();
        let mut rng = SimRng::new(5);

        for _ in 0..4 {
            click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::ZERO);
        }
        assert!(tuning.phrases.contains(&state.display.label));
        assert_eq!(state.display.scale, tuning.scale_pop);
        assert_eq!(state.display.glow, 1.0);
        assert_eq!(state.display.rotation_deg, 4.0 * 360.0);

        let shake = state.display.shake.expect("shake after a click");
        let m = tuning.shake_magnitude(4);
        assert!(shake.x.abs() <= m && shake.y.abs() <= m);

        assert!(scheduler.is_pending(TaskKind::ResetScale));
        assert!(scheduler.is_pending(TaskKind::ResetGlow));
        assert!(scheduler.is_pending(TaskKind::ClearShake));
        assert!(!scheduler.is_pending(TaskKind::Unlock));
    }

    #[test]
    fn test_heightened_rotation_step() {
        let mut tuning = Tuning::default();
        tuning.heightened_threshold = 1;
        let mut state = WidgetState::default();
        let mut scheduler = Scheduler::new();
        let mut rng = SimRng::new(5);

        click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::ZERO);
        assert_eq!(state.display.rotation_deg, 360.0);
        click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::ZERO);
        assert_eq!(state.display.rotation_deg, 360.0 + 720.0);
    }

    #[test]
    fn test_options_disable_shake_and_particles() {
        let tuning = Tuning::default();
        let mut state = WidgetState::default();
        let mut scheduler = Scheduler::new();
        let mut rng = SimRng::new(3);
        let options = ClickOptions {
            shake: false,
            particles: false,
            max_entities: 100,
        };

        let outcome = handle_click(
            &mut state,
            &mut scheduler,
            &tuning,
            &options,
            &mut rng,
            Vec2::ZERO,
        );
        assert_eq!(outcome.particles_spawned, 0);
        assert_eq!(state.field.particle_count(), 0);
        assert_eq!(state.display.shake, None);
        assert!(!scheduler.is_pending(TaskKind::ClearShake));
        // The counter still moves
        assert_eq!(state.display.click_count(), 1);
    }

    #[test]
    fn test_entity_cap_evicts_oldest() {
        let tuning = Tuning::default();
        let mut state = WidgetState::default();
        let mut scheduler = Scheduler::new();
        let mut rng = SimRng::new(8);
        let options = ClickOptions {
            max_entities: 20,
            ..Default::default()
        };

        handle_click(&mut state, &mut scheduler, &tuning, &options, &mut rng, Vec2::ZERO);
        let outcome =
            handle_click(&mut state, &mut scheduler, &tuning, &options, &mut rng, Vec2::ZERO);
        assert!(state.field.len() <= 20);
        assert!(outcome.evicted > 0);
        let first_id = state.field.entities[0].id;
        assert!(first_id > 0);
    }

    #[test]
    fn test_lockout_rejects_clicks() {
        let tuning = Tuning::classic();
        let mut state = WidgetState::default();
        let mut scheduler = Scheduler::new();
        let mut rng = SimRng::new(11);

        let first = click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::ZERO);
        assert!(first.accepted);
        let before = state.clone();

        let second = click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::ZERO);
        assert!(!second.accepted);
        assert_eq!(second.click_count, 1);
        assert_eq!(second.tone, None);
        assert_eq!(state, before);
        assert!(scheduler.is_pending(TaskKind::Unlock));
        assert!(scheduler.is_pending(TaskKind::ClearBatch));
    }

    #[test]
    fn test_pick_effect_kind() {
        let tuning = Tuning::default();
        // star 0.3, comet 0.2, lightning 0.1
        assert_eq!(pick_effect_kind(&tuning, false, 0.0), Some(EntityKind::Star));
        assert_eq!(pick_effect_kind(&tuning, false, 0.35), Some(EntityKind::Comet));
        assert_eq!(pick_effect_kind(&tuning, false, 0.55), Some(EntityKind::Lightning));
        assert_eq!(pick_effect_kind(&tuning, false, 0.65), None);
        // Boosted x1.5: lightning now covers up to 0.9
        assert_eq!(pick_effect_kind(&tuning, true, 0.85), Some(EntityKind::Lightning));
        assert_eq!(pick_effect_kind(&tuning, true, 0.95), None);

        assert_eq!(pick_effect_kind(&Tuning::classic(), true, 0.0), None);
    }

    #[test]
    fn test_flying_effect_spawns_in_viewport() {
        let tuning = Tuning::default();
        let mut state = WidgetState::new(Viewport::new(300.0, 200.0));
        let mut scheduler = Scheduler::new();
        // Every roll is 0.1: star picked, all ranges at their 10% point
        let mut rng = ScriptedRandom::constant(0.1);

        let outcome = click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::ZERO);
        assert_eq!(outcome.effect, Some(EntityKind::Star));
        let star = state
            .field
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::Star)
            .expect("star spawned");
        assert!((star.pos.x - 30.0).abs() < 1e-3);
        assert!((star.pos.y - 20.0).abs() < 1e-3);
        assert!((star.life - 1.6).abs() < 1e-4);
        assert_eq!(star.color, EntityKind::Star.effect_color());
    }

    #[test]
    fn test_same_seed_same_state() {
        let tuning = Tuning::default();
        let run = |seed: u64| {
            let mut state = WidgetState::default();
            let mut scheduler = Scheduler::new();
            let mut rng = SimRng::new(seed);
            for i in 0..10 {
                let pos = Vec2::new(10.0 * i as f32, 100.0);
                click_at(&mut state, &mut scheduler, &tuning, &mut rng, pos);
                tick(&mut state, &tuning);
            }
            state
        };
        assert_eq!(run(2024), run(2024));
    }

    proptest! {
        #[test]
        fn prop_counter_increments_by_one(seed in any::<u64>(), clicks in 1usize..80) {
            let tuning = Tuning::default();
            let mut state = WidgetState::default();
            let mut scheduler = Scheduler::new();
            let mut rng = SimRng::new(seed);
            let mut heightened_flips = 0;

            for i in 0..clicks {
                let before = state.display.click_count();
                let was_heightened = state.display.heightened();
                let outcome = click_at(&mut state, &mut scheduler, &tuning, &mut rng, Vec2::new(40.0, 40.0));
                prop_assert_eq!(state.display.click_count(), before + 1);
                prop_assert_eq!(outcome.click_count, i as u64 + 1);
                if outcome.entered_heightened {
                    heightened_flips += 1;
                    prop_assert_eq!(outcome.click_count, tuning.heightened_threshold);
                }
                prop_assert!(!was_heightened || state.display.heightened());

                // Ticks never touch the counter
                tick(&mut state, &tuning);
                prop_assert_eq!(state.display.click_count(), before + 1);
            }
            prop_assert!(heightened_flips <= 1);
            prop_assert_eq!(state.display.heightened(), clicks as u64 >= tuning.heightened_threshold);
        }
    }
}
