//! Deterministic simulation module
//!
//! All widget logic lives here. This module must be pure and deterministic:
//! - Fixed tick period only
//! - Randomness only through `RandomSource`
//! - Stable iteration order (spawn order, ids increasing)
//! - No rendering or platform dependencies

pub mod click;
pub mod entity;
pub mod rng;
pub mod state;
pub mod tick;
pub mod timers;

pub use click::{ClickOptions, ClickOutcome, handle_click, pick_effect_kind};
pub use entity::{AnimatedEntity, EntityKind, Physics};
pub use rng::{RandomSource, ScriptedRandom, SimRng};
pub use state::{ButtonDisplayState, EffectField, Viewport, WidgetState};
pub use tick::{TickReport, tick};
pub use timers::{Scheduler, TaskKind, apply_task};
