//! Drag-drop acceptance preview.
//!
//! Active while the author test-runs a drag-drop scene. Dragging a
//! draggable tracks its center in the overlay only; release runs the
//! acceptance test against every target. Tapping a tappable surfaces its
//! authored message. Authored data is never written.

use crate::overlay::{Overlay, OverlayPose, Transition};
use slate_core::{FracPoint, Item, ItemId, PxPoint, PxRect, Role, Scene, Viewport};

/// Fixed duration for snap-to-placement and return-home animations.
pub const DROP_ANIMATION_MS: f32 = 300.0;

/// What a release decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Accepted by `target`; the overlay is animating to the authored
    /// final position and the item stays visible.
    Accepted { target: ItemId },
    /// Accepted by `target` with no authored final position; the item is
    /// marked completed and hidden.
    Completed { target: ItemId },
    /// Released outside any accepting target; the overlay is animating
    /// back to the exact pre-drag coordinates.
    Rejected,
}

struct ActiveDrag {
    id: ItemId,
    grab_dx: f32,
    grab_dy: f32,
    /// Pose at pointer-down; a rejected drop returns here exactly.
    origin: FracPoint,
}

pub struct DragDropPreview {
    overlay: Overlay,
    active: Option<ActiveDrag>,
}

impl Default for DragDropPreview {
    fn default() -> Self {
        Self::new()
    }
}

/// Strict interior test — a center resting exactly on the edge is a miss.
fn strictly_inside(rect: PxRect, p: PxPoint) -> bool {
    p.x > rect.x && p.x < rect.x + rect.width && p.y > rect.y && p.y < rect.y + rect.height
}

impl DragDropPreview {
    pub fn new() -> Self {
        Self { overlay: Overlay::new(), active: None }
    }

    /// The pose to render `item` at this frame.
    pub fn pose_of(&self, item: &Item) -> OverlayPose {
        self.overlay.pose_of(item)
    }

    /// Advance running snap/return animations.
    pub fn tick(&mut self, dt_ms: f32) {
        self.overlay.tick(dt_ms);
    }

    /// Leaving preview: drop all simulation state.
    pub fn reset(&mut self) {
        self.overlay.clear();
        self.active = None;
    }

    /// An item's pixel rectangle at its current preview pose.
    fn pose_rect(&self, item: &Item, viewport: &Viewport) -> PxRect {
        let pose = self.overlay.pose_of(item);
        let w = viewport.frac_width_to_px(pose.width);
        let h = w * item.aspect;
        let c = viewport.to_px(FracPoint::new(pose.cx, pose.cy));
        PxRect { x: c.x - w / 2.0, y: c.y - h / 2.0, width: w, height: h }
    }

    /// Topmost visible item under the pointer, at preview poses.
    fn hit(&self, scene: &Scene, viewport: &Viewport, p: PxPoint) -> Option<ItemId> {
        scene
            .iter_front_to_back()
            .filter(|item| self.overlay.pose_of(item).visible)
            .find(|item| self.pose_rect(item, viewport).contains(p))
            .map(|item| item.id)
    }

    /// Press: a tappable surfaces its message (no position change); a
    /// draggable starts overlay-only tracking. Anything else is inert.
    pub fn pointer_down(&mut self, scene: &Scene, viewport: &Viewport, p: PxPoint) -> Option<String> {
        let item = self.hit(scene, viewport, p).and_then(|id| scene.get(id))?;
        match &item.role {
            Role::Tappable { message } => Some(message.clone()),
            Role::Draggable { .. } => {
                let pose = self.overlay.pose_of(item);
                let center = viewport.to_px(FracPoint::new(pose.cx, pose.cy));
                let entry = self.overlay.entry_mut(item);
                entry.transition = None;
                self.active = Some(ActiveDrag {
                    id: item.id,
                    grab_dx: p.x - center.x,
                    grab_dy: p.y - center.y,
                    origin: FracPoint::new(pose.cx, pose.cy),
                });
                None
            }
            _ => None,
        }
    }

    /// Track the active drag in the overlay.
    pub fn pointer_move(&mut self, scene: &Scene, viewport: &Viewport, p: PxPoint) {
        let Some(active) = &self.active else {
            return;
        };
        let Some(item) = scene.get(active.id) else {
            return;
        };
        let frac =
            viewport.to_frac(PxPoint::new(p.x - active.grab_dx, p.y - active.grab_dy));
        let entry = self.overlay.entry_mut(item);
        entry.cx = frac.x;
        entry.cy = frac.y;
    }

    /// Release: run the acceptance test. Returns `None` when no drag was
    /// active.
    pub fn pointer_up(&mut self, scene: &Scene, viewport: &Viewport) -> Option<DropOutcome> {
        let active = self.active.take()?;
        let item = scene.get(active.id)?;
        let Role::Draggable { accepting_target, placement } = &item.role else {
            return None;
        };

        let pose = self.overlay.pose_of(item);
        let center = viewport.to_px(FracPoint::new(pose.cx, pose.cy));

        // Topmost target whose rectangle holds the center and whose
        // accept-list names this draggable.
        let accepted_by = scene
            .iter_front_to_back()
            .filter(|t| matches!(t.role, Role::Target))
            .filter(|t| strictly_inside(viewport.item_rect(t), center))
            .find(|t| *accepting_target == Some(t.id))
            .map(|t| t.id);

        let outcome = match accepted_by {
            Some(target) => match placement.for_target(target) {
                Some(settle) => {
                    let entry = self.overlay.entry_mut(item);
                    entry.transition = Some(Transition::new(
                        FracPoint::new(pose.cx, pose.cy),
                        settle,
                        DROP_ANIMATION_MS,
                    ));
                    DropOutcome::Accepted { target }
                }
                None => {
                    let entry = self.overlay.entry_mut(item);
                    entry.completed = true;
                    entry.visible = false;
                    DropOutcome::Completed { target }
                }
            },
            None => {
                let entry = self.overlay.entry_mut(item);
                entry.transition = Some(Transition::new(
                    FracPoint::new(pose.cx, pose.cy),
                    active.origin,
                    DROP_ANIMATION_MS,
                ));
                DropOutcome::Rejected
            }
        };
        log::trace!("preview drop: {outcome:?}");
        Some(outcome)
    }
}
