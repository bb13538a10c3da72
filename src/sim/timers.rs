//! One-shot delayed tasks
//!
//! Transient effects (scale pop, glow pulse, shake, click lockout) undo
//! themselves after a delay. The scheduler keeps its own millisecond clock,
//! advanced by the widget on every tick, so pending tasks die with the widget
//! instead of firing against torn-down state.

use super::state::WidgetState;

/// Deferred state changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Button scale back to 1.0
    ResetScale,
    /// Glow back to 0
    ResetGlow,
    /// Remove the shake offset
    ClearShake,
    /// Accept clicks again
    Unlock,
    /// Drop every live entity
    ClearBatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTask {
    kind: TaskKind,
    due_ms: u64,
}

/// Pending one-shot tasks keyed by kind (one per kind at most)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scheduler {
    now_ms: u64,
    pending: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds elapsed since creation
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `kind` after `delay_ms`, replacing any pending task of that kind
    pub fn schedule(&mut self, kind: TaskKind, delay_ms: u32) {
        self.cancel(kind);
        self.pending.push(ScheduledTask {
            kind,
            due_ms: self.now_ms + delay_ms as u64,
        });
    }

    /// Returns true if a pending task was dropped
    pub fn cancel(&mut self, kind: TaskKind) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.kind != kind);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward and return the tasks that came due, earliest first
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<TaskKind> {
        self.now_ms += elapsed_ms as u64;
        let now = self.now_ms;

        let mut due: Vec<ScheduledTask> = Vec::new();
        self.pending.retain(|t| {
            if t.due_ms <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| t.due_ms);
        due.into_iter().map(|t| t.kind).collect()
    }
}

/// Apply a fired task to the widget state
pub fn apply_task(state: &mut WidgetState, task: TaskKind) {
    match task {
        TaskKind::ResetScale => state.display.scale = 1.0,
        TaskKind::ResetGlow => state.display.glow = 0.0,
        TaskKind::ClearShake => state.display.shake = None,
        TaskKind::Unlock => state.display.locked = false,
        TaskKind::ClearBatch => state.field.clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_fires_when_due() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TaskKind::ResetGlow, 300);
        scheduler.schedule(TaskKind::ResetScale, 150);

        assert!(scheduler.advance(149).is_empty());
        assert_eq!(scheduler.advance(1), vec![TaskKind::ResetScale]);
        assert_eq!(scheduler.advance(200), vec![TaskKind::ResetGlow]);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.now_ms(), 350);
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TaskKind::ResetGlow, 30);
        scheduler.schedule(TaskKind::ClearShake, 10);
        scheduler.schedule(TaskKind::ResetScale, 20);
        assert_eq!(
            scheduler.advance(100),
            vec![TaskKind::ClearShake, TaskKind::ResetScale, TaskKind::ResetGlow]
        );
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TaskKind::ResetScale, 150);
        scheduler.advance(100);
        scheduler.schedule(TaskKind::ResetScale, 150);
        assert_eq!(scheduler.len(), 1);

        assert!(scheduler.advance(100).is_empty());
        assert_eq!(scheduler.advance(50), vec![TaskKind::ResetScale]);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TaskKind::Unlock, 10);
        scheduler.schedule(TaskKind::ClearBatch, 10);
        assert!(scheduler.cancel(TaskKind::Unlock));
        assert!(!scheduler.cancel(TaskKind::Unlock));
        assert!(scheduler.is_pending(TaskKind::ClearBatch));

        scheduler.cancel_all();
        assert!(scheduler.advance(1_000).is_empty());
    }

    #[test]
    fn test_apply_task() {
        let mut state = WidgetState::default();
        state.display.scale = 1.3;
        state.display.glow = 1.0;
        state.display.shake = Some(Vec2::new(2.0, -1.0));
        state.display.locked = true;

        for task in [
            TaskKind::ResetScale,
            TaskKind::ResetGlow,
            TaskKind::ClearShake,
            TaskKind::Unlock,
        ] {
            apply_task(&mut state, task);
        }
        assert_eq!(state.display.scale, 1.0);
        assert_eq!(state.display.glow, 0.0);
        assert_eq!(state.display.shake, None);
        assert!(!state.display.locked);
    }
}
