//! Fixed-period animation tick
//!
//! Advances every live entity one step and culls the expired and the
//! escaped. No randomness here: the outcome depends only on prior state.

use super::entity::Physics;
use super::state::WidgetState;
use crate::tuning::Tuning;

/// What one tick removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Culled for running out of life
    pub expired: usize,
    /// Culled for leaving the viewport margin (takes precedence over expiry)
    pub escaped: usize,
}

impl TickReport {
    pub fn removed(&self) -> usize {
        self.expired + self.escaped
    }
}

/// Advance the entity field by one tick
pub fn tick(state: &mut WidgetState, tuning: &Tuning) -> TickReport {
    let mut report = TickReport::default();
    if state.field.is_empty() {
        return report;
    }

    let physics = Physics::from(tuning);
    let viewport = state.viewport;
    let margin = tuning.cull_margin;

    state.field.entities.retain_mut(|entity| {
        entity.step(&physics);
        if !viewport.contains_with_margin(entity.pos, margin) {
            report.escaped += 1;
            false
        } else if !entity.is_alive() {
            report.expired += 1;
            false
        } else {
            true
        }
    });

    report
}
