//! Scene building: widget state in, triangle list out
//!
//! Pure function of state; all coordinates are viewport pixels. The GPU
//! pipeline maps them to clip space.

use glam::Vec2;
use std::f32::consts::TAU;

use super::shapes::{circle, gradient_disk, polyline, ring, star, tapered_line};
use super::vertex::{Vertex, colors, rgba};
use crate::consts::BUTTON_RADIUS;
use crate::sim::{AnimatedEntity, EntityKind, RandomSource, Viewport, WidgetState};

/// Rendering knobs that do not live in the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStyle {
    /// Triangles per particle circle
    pub circle_segments: u32,
    /// Seconds since mount, drives ambient motion only
    pub time_secs: f32,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            circle_segments: 10,
            time_secs: 0.0,
        }
    }
}

/// Number of decorative dots orbiting the button
const ORBIT_DOTS: u32 = 8;

/// Faint dot twinkling behind the button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropDot {
    /// Position as a fraction of the viewport
    pub at: Vec2,
    pub delay_secs: f32,
    pub period_secs: f32,
}

impl BackdropDot {
    const RADIUS: f32 = 4.0;
    const ALPHA: f32 = 0.2;

    /// Opacity at `time_secs`; steady until the delay passes, then pulses
    /// between half and full strength
    pub fn alpha(&self, time_secs: f32) -> f32 {
        let t = time_secs - self.delay_secs;
        if t <= 0.0 || self.period_secs <= 0.0 {
            return Self::ALPHA;
        }
        let pulse = 0.75 + 0.25 * (TAU * t / self.period_secs).cos();
        Self::ALPHA * pulse
    }
}

/// Static backdrop, scattered once per mount
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Backdrop {
    pub dots: Vec<BackdropDot>,
}

impl Backdrop {
    pub const DOTS: usize = 20;

    pub fn scatter(rng: &mut dyn RandomSource) -> Self {
        let dots = (0..Self::DOTS)
            .map(|_| BackdropDot {
                at: Vec2::new(rng.unit(), rng.unit()),
                delay_secs: rng.range(0.0, 3.0),
                period_secs: rng.range(2.0, 4.0),
            })
            .collect();
        Self { dots }
    }
}

/// Build every vertex for one frame
pub fn build_scene(
    state: &WidgetState,
    backdrop: &Backdrop,
    palette: &[[f32; 3]],
    style: &SceneStyle,
) -> Vec<Vertex> {
    let shake = state.display.shake.unwrap_or(Vec2::ZERO);
    let mut vertices = Vec::with_capacity(1024 + state.field.len() * 32);

    push_backdrop(&mut vertices, backdrop, &state.viewport, style, shake);
    push_button(&mut vertices, state, palette, style, shake);
    for entity in &state.field.entities {
        push_entity(&mut vertices, entity, style, shake);
    }

    vertices
}

fn push_backdrop(
    out: &mut Vec<Vertex>,
    backdrop: &Backdrop,
    viewport: &Viewport,
    style: &SceneStyle,
    shake: Vec2,
) {
    let size = Vec2::new(viewport.width, viewport.height);
    for dot in &backdrop.dots {
        let color = [1.0, 1.0, 1.0, dot.alpha(style.time_secs)];
        out.extend(circle(dot.at * size + shake, BackdropDot::RADIUS, color, 6));
    }
}

fn push_button(
    out: &mut Vec<Vertex>,
    state: &WidgetState,
    palette: &[[f32; 3]],
    style: &SceneStyle,
    shake: Vec2,
) {
    let display = &state.display;
    let center = state.viewport.center() + shake;
    let radius = BUTTON_RADIUS * display.scale;
    let segments = style.circle_segments * 4;

    let (a, b) = display.gradient_indices(palette.len());
    let base = palette.get(a).copied().unwrap_or([1.0; 3]);
    let next = palette.get(b).copied().unwrap_or([1.0; 3]);
    let alpha = if display.locked { 0.75 } else { 1.0 };

    // Glow halo grows with intensity
    let glow_width = 20.0 + display.glow * 30.0;
    out.extend(ring(
        center,
        radius,
        radius + glow_width,
        rgba(base, 0.25 + 0.5 * display.glow),
        0.0,
        segments,
    ));

    if display.heightened() {
        let pulse = 0.5 + 0.5 * (style.time_secs * 6.0).sin();
        out.extend(ring(
            center,
            radius + glow_width,
            radius + glow_width + 6.0 + 4.0 * pulse,
            colors::HALO,
            0.0,
            segments,
        ));
    }

    out.extend(gradient_disk(
        center,
        radius,
        rgba(base, alpha),
        rgba(next, alpha),
        display.rotation_deg.to_radians(),
        segments,
    ));

    // Click counter badge at the top-right edge
    let badge = center + Vec2::new(radius * 0.75, -radius * 0.75);
    out.extend(circle(badge, 13.0, colors::BADGE_RIM, style.circle_segments));
    out.extend(circle(badge, 11.0, colors::BADGE, style.circle_segments));

    // Ambient dots bobbing around the button
    let orbit = radius + glow_width + 24.0;
    for i in 0..ORBIT_DOTS {
        let theta = i as f32 * TAU / ORBIT_DOTS as f32;
        let bob = (style.time_secs * 3.0 + i as f32 * 0.6).sin() * 4.0;
        let pos = center + Vec2::new(theta.cos(), theta.sin()) * orbit + Vec2::new(0.0, bob);
        out.extend(circle(pos, 2.0, colors::ORBIT_DOT, 6));
    }
}

fn push_entity(out: &mut Vec<Vertex>, entity: &AnimatedEntity, style: &SceneStyle, shake: Vec2) {
    let pos = entity.pos + shake;
    let color = rgba(entity.color, entity.opacity());
    let faded = rgba(entity.color, 0.0);
    let heading = entity.vel.normalize_or_zero();

    match entity.kind {
        EntityKind::Explosion => {
            let halo = rgba(entity.color, entity.opacity() * 0.3);
            out.extend(circle(pos, entity.size * 0.9, halo, style.circle_segments));
            out.extend(circle(pos, entity.size / 2.0, color, style.circle_segments));
        }
        EntityKind::Trail => {
            let tail = pos - heading * entity.size * 1.5;
            out.extend(tapered_line(pos, tail, entity.size * 0.6, 0.5, color, faded));
            out.extend(circle(pos, entity.size * 0.3, color, style.circle_segments));
        }
        EntityKind::Sparkle => {
            out.extend(star(pos, entity.size * 0.6, entity.size * 0.15, 4, 0.0, color));
        }
        EntityKind::Star => {
            let spin = entity.life * 2.0;
            out.extend(star(pos, entity.size / 2.0, entity.size / 5.0, 5, spin, color));
        }
        EntityKind::Comet => {
            let tail = pos - heading * entity.size * 4.0;
            out.extend(tapered_line(pos, tail, entity.size, 0.5, color, faded));
            out.extend(circle(pos, entity.size / 2.0, color, style.circle_segments));
        }
        EntityKind::Lightning => {
            out.extend(polyline(&lightning_bolt(pos, entity.size), 3.0, color));
        }
    }
}

/// Zig-zag from `top` downward over `length` pixels
fn lightning_bolt(top: Vec2, length: f32) -> Vec<Vec2> {
    const KINKS: usize = 5;
    let step = length / KINKS as f32;
    let swing = length * 0.15;
    (0..=KINKS)
        .map(|i| {
            let x = match i % 2 {
                _ if i == 0 || i == KINKS => 0.0,
                1 => swing,
                _ => -swing,
            };
            top + Vec2::new(x, step * i as f32)
        })
        .collect()
}
