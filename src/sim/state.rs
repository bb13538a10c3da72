//! Widget state and core simulation types
//!
//! Everything the renderer reads lives here. The click counter and the
//! heightened flag are private so nothing can rewind them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{AnimatedEntity, EntityKind};
use super::rng::RandomSource;
use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, INITIAL_LABEL};

/// Size of the rendering surface in pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether `pos` lies inside the viewport grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }

    /// Uniformly random point inside the viewport
    pub fn random_point(&self, rng: &mut dyn RandomSource) -> Vec2 {
        let x = rng.range(0.0, self.width);
        let y = rng.range(0.0, self.height);
        Vec2::new(x, y)
    }
}

/// Everything about the button itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonDisplayState {
    click_count: u64,
    heightened: bool,
    pub label: String,
    /// 1.0 = resting size
    pub scale: f32,
    /// Cumulative degrees, never normalized
    pub rotation_deg: f32,
    /// 0-1
    pub glow: f32,
    /// Offset applied to the whole scene while shaking
    pub shake: Option<Vec2>,
    /// Clicks are ignored while set (click lockout)
    pub locked: bool,
}

impl Default for ButtonDisplayState {
    fn default() -> Self {
        Self {
            click_count: 0,
            heightened: false,
            label: INITIAL_LABEL.to_string(),
            scale: 1.0,
            rotation_deg: 0.0,
            glow: 0.0,
            shake: None,
            locked: false,
        }
    }
}

impl ButtonDisplayState {
    pub fn click_count(&self) -> u64 {
        self.click_count
    }

    pub fn heightened(&self) -> bool {
        self.heightened
    }

    /// Count one click and return the new total
    pub fn register_click(&mut self) -> u64 {
        self.click_count = self.click_count.saturating_add(1);
        self.click_count
    }

    /// Turn heightened mode on. Returns true only on the transition.
    pub fn enter_heightened(&mut self) -> bool {
        let entered = !self.heightened;
        self.heightened = true;
        entered
    }

    /// Palette indices of the button gradient (`count`, `count + 1`)
    pub fn gradient_indices(&self, palette_len: usize) -> (usize, usize) {
        if palette_len == 0 {
            return (0, 0);
        }
        let base = (self.click_count % palette_len as u64) as usize;
        (base, (base + 1) % palette_len)
    }
}

/// The live entity set plus its id allocator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectField {
    /// Live entities in spawn order (ids strictly increasing)
    pub entities: Vec<AnimatedEntity>,
    next_id: u32,
}

impl EffectField {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Add an entity and return its id
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        vel: Vec2,
        color: [f32; 3],
        size: f32,
        life: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(AnimatedEntity {
            id,
            kind,
            pos,
            vel,
            color,
            size,
            life,
        });
        id
    }

    /// Drop the oldest entities until at most `cap` remain. Returns how many went.
    pub fn enforce_cap(&mut self, cap: usize) -> usize {
        let excess = self.entities.len().saturating_sub(cap);
        if excess > 0 {
            self.entities.drain(..excess);
        }
        excess
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn particle_count(&self) -> usize {
        self.entities.iter().filter(|e| e.kind.is_particle()).count()
    }

    pub fn effect_count(&self) -> usize {
        self.entities.len() - self.particle_count()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

/// Complete widget state (deterministic given seed and inputs)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetState {
    pub display: ButtonDisplayState,
    pub field: EffectField,
    pub viewport: Viewport,
}

impl WidgetState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }
}
