//! Animated entities: particles and flying effects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Visual treatment of an entity; also picks its physics family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    // Particles (click burst, affected by gravity)
    Explosion,
    Trail,
    Sparkle,
    // Flying effects (free-floating, no gravity)
    Lightning,
    Star,
    Comet,
}

impl EntityKind {
    pub const PARTICLES: [EntityKind; 3] =
        [EntityKind::Explosion, EntityKind::Trail, EntityKind::Sparkle];

    pub fn is_particle(&self) -> bool {
        matches!(
            self,
            EntityKind::Explosion | EntityKind::Trail | EntityKind::Sparkle
        )
    }

    /// Fixed color of a flying effect (particles use their palette color)
    pub fn effect_color(&self) -> [f32; 3] {
        match self {
            EntityKind::Lightning => [0.75, 0.85, 1.0],
            EntityKind::Star => [1.0, 0.92, 0.35],
            EntityKind::Comet => [1.0, 0.55, 0.2],
            _ => [1.0, 1.0, 1.0],
        }
    }
}

/// Per-tick physics constants, resolved from the tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub velocity_scale: f32,
    pub gravity: f32,
    pub particle_decay: f32,
    pub particle_shrink: f32,
    pub effect_decay: f32,
    pub effect_shrink: f32,
}

impl From<&Tuning> for Physics {
    fn from(tuning: &Tuning) -> Self {
        Self {
            velocity_scale: tuning.velocity_scale,
            gravity: tuning.gravity,
            particle_decay: tuning.particle_decay,
            particle_shrink: tuning.particle_shrink,
            effect_decay: tuning.effect_decay,
            effect_shrink: tuning.effect_shrink,
        }
    }
}

impl Physics {
    pub fn decay_for(&self, kind: EntityKind) -> f32 {
        if kind.is_particle() {
            self.particle_decay
        } else {
            self.effect_decay
        }
    }

    pub fn shrink_for(&self, kind: EntityKind) -> f32 {
        if kind.is_particle() {
            self.particle_shrink
        } else {
            self.effect_shrink
        }
    }
}

/// A single animated visual element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedEntity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 3],
    pub size: f32,
    /// Remaining life; removed once it reaches zero
    pub life: f32,
}

impl AnimatedEntity {
    /// Advance one tick. Does not cull.
    pub fn step(&mut self, physics: &Physics) {
        self.pos += self.vel * physics.velocity_scale;
        if self.kind.is_particle() {
            self.vel.y += physics.gravity;
        }
        self.life -= physics.decay_for(self.kind);
        self.size *= physics.shrink_for(self.kind);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Opacity for rendering (remaining life, clamped)
    pub fn opacity(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }
}
