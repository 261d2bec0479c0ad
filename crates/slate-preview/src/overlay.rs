//! Preview overlay state.
//!
//! The overlay shadows authored items with simulation-only position and
//! visibility, keyed by item id. Reading a pose falls back to the authored
//! attributes when no overlay entry exists; writing always goes into the
//! overlay, never back into the scene.

use slate_core::{FracPoint, Item, ItemId};
use std::collections::HashMap;

/// The pose a preview frame renders an item at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPose {
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    pub visible: bool,
}

impl OverlayPose {
    pub fn of_item(item: &Item) -> Self {
        Self { cx: item.cx, cy: item.cy, width: item.width, visible: true }
    }
}

/// A fixed-duration position animation. Advanced explicitly by the host's
/// frame callback; when it completes the pose equals `to` exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: FracPoint,
    pub to: FracPoint,
    pub duration_ms: f32,
    elapsed_ms: f32,
}

impl Transition {
    pub fn new(from: FracPoint, to: FracPoint, duration_ms: f32) -> Self {
        Self { from, to, duration_ms, elapsed_ms: 0.0 }
    }

    /// Advance by `dt_ms`. Returns true once the transition has finished.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn position(&self) -> FracPoint {
        if self.is_done() {
            return self.to;
        }
        if self.elapsed_ms <= 0.0 {
            return self.from;
        }
        let t = self.elapsed_ms / self.duration_ms;
        FracPoint::new(
            self.from.x + (self.to.x - self.from.x) * t,
            self.from.y + (self.to.y - self.from.y) * t,
        )
    }
}

/// One item's simulation state.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    pub cx: f32,
    pub cy: f32,
    pub visible: bool,
    /// Set when a draggable was accepted with no authored final position.
    pub completed: bool,
    pub transition: Option<Transition>,
}

/// Simulation-only state for the whole scene, keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    entries: HashMap<ItemId, OverlayEntry>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ItemId) -> Option<&OverlayEntry> {
        self.entries.get(&id)
    }

    /// The entry for `item`, seeded from its authored pose on first touch.
    pub fn entry_mut(&mut self, item: &Item) -> &mut OverlayEntry {
        self.entries.entry(item.id).or_insert_with(|| OverlayEntry {
            cx: item.cx,
            cy: item.cy,
            visible: true,
            completed: false,
            transition: None,
        })
    }

    /// The pose to render `item` at this frame.
    pub fn pose_of(&self, item: &Item) -> OverlayPose {
        match self.entries.get(&item.id) {
            Some(entry) => OverlayPose {
                cx: entry.cx,
                cy: entry.cy,
                width: item.width,
                visible: entry.visible,
            },
            None => OverlayPose::of_item(item),
        }
    }

    /// Advance every running transition. Finished transitions land their
    /// entry exactly on the target and are dropped.
    pub fn tick(&mut self, dt_ms: f32) {
        for entry in self.entries.values_mut() {
            if let Some(transition) = &mut entry.transition {
                let done = transition.advance(dt_ms);
                let p = transition.position();
                entry.cx = p.x;
                entry.cy = p.y;
                if done {
                    entry.transition = None;
                }
            }
        }
    }

    /// Forget all simulation state (leaving preview).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
