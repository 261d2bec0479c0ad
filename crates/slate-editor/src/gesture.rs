//! The gesture finite state machine.
//!
//! One engine instance owns one explicit `GestureState`; transitions happen
//! only inside pointer callbacks, so every mutation is synchronous and atomic
//! relative to its event. A gesture is pinned to the pointer that started
//! it: events from any other pointer are ignored while it runs, and a second
//! pointer-down is dropped.
//!
//! The first mutating move of a gesture pushes exactly one history snapshot;
//! dense move streams add nothing further. Pointer-up and pointer-cancel
//! reset identically without rolling back committed moves.

use crate::hit::{self, HitZone};
use crate::input::{Modifiers, PointerEvent};
use slate_core::{History, MAX_WIDTH_FRAC, MIN_WIDTH_FRAC, PxPoint, Scene, Viewport};

/// Rotation snap increment with the snap modifier held: 15°.
pub const ROTATION_SNAP_RAD: f32 = std::f32::consts::PI / 12.0;

/// The in-flight interaction. "Selected" is `Idle` plus `scene.selected`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Dragging {
        pointer: u64,
        /// Pointer offset from the item's pixel center at gesture start.
        grab_dx: f32,
        grab_dy: f32,
        /// Whether the snapshot for this gesture has been pushed.
        moved: bool,
    },
    Resizing {
        pointer: u64,
        moved: bool,
    },
    Rotating {
        pointer: u64,
        start_angle: f32,
        start_rotation: f32,
        moved: bool,
    },
}

pub struct GestureEngine {
    state: GestureState,
    /// Whether live drags clamp the item center to the canvas (per-mode).
    pub clamp_drag_to_canvas: bool,
}

fn angle_from(center: PxPoint, p: PxPoint) -> f32 {
    (p.y - center.y).atan2(p.x - center.x)
}

impl GestureEngine {
    pub fn new(clamp_drag_to_canvas: bool) -> Self {
        Self { state: GestureState::Idle, clamp_drag_to_canvas }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, GestureState::Idle)
    }

    /// Feed one normalized pointer event through the state machine.
    pub fn handle(
        &mut self,
        scene: &mut Scene,
        viewport: &Viewport,
        history: &mut History,
        event: PointerEvent,
    ) {
        match event {
            PointerEvent::Down { pointer, x, y, .. } => {
                self.on_down(scene, viewport, pointer, PxPoint::new(x, y));
            }
            PointerEvent::Move { pointer, x, y, modifiers } => {
                self.on_move(scene, viewport, history, pointer, PxPoint::new(x, y), modifiers);
            }
            PointerEvent::Up { pointer, .. } | PointerEvent::Cancel { pointer } => {
                self.on_end(pointer);
            }
        }
    }

    fn on_down(&mut self, scene: &mut Scene, viewport: &Viewport, pointer: u64, p: PxPoint) {
        if !self.is_idle() {
            // Secondary pointer while a gesture runs: dropped.
            log::trace!("gesture: ignoring pointer {pointer} down mid-gesture");
            return;
        }

        // A press on the already-selected item starts a gesture, classified
        // by handle zone. Handles are hit-testable on the selection only.
        if let Some(selected) = scene.selected
            && let Some(item) = scene.get(selected)
            && let Some(zone) = hit::selected_zone(item, viewport, p)
        {
            let center = viewport.item_center_px(item);
            self.state = match zone {
                HitZone::RotateHandle => GestureState::Rotating {
                    pointer,
                    start_angle: angle_from(center, p),
                    start_rotation: item.rotation,
                    moved: false,
                },
                HitZone::ResizeHandle => GestureState::Resizing { pointer, moved: false },
                HitZone::Body => GestureState::Dragging {
                    pointer,
                    grab_dx: p.x - center.x,
                    grab_dy: p.y - center.y,
                    moved: false,
                },
            };
            return;
        }

        // A press on an unselected item only selects it; the press is
        // consumed and no gesture starts until the next one.
        match hit::hit_test(scene, viewport, p) {
            Some(id) => scene.select(id),
            None => scene.deselect(),
        }
    }

    fn on_move(
        &mut self,
        scene: &mut Scene,
        viewport: &Viewport,
        history: &mut History,
        pointer: u64,
        p: PxPoint,
        modifiers: Modifiers,
    ) {
        let Some(selected) = scene.selected else {
            return;
        };
        let clamp = self.clamp_drag_to_canvas;

        match &mut self.state {
            GestureState::Idle => {}

            GestureState::Dragging { pointer: owner, grab_dx, grab_dy, moved } => {
                if *owner != pointer {
                    return;
                }
                if !*moved {
                    history.push(scene);
                    *moved = true;
                }
                let center = PxPoint::new(p.x - *grab_dx, p.y - *grab_dy);
                let mut frac = viewport.to_frac(center);
                if clamp {
                    frac = frac.clamped();
                }
                if let Some(item) = scene.get_mut(selected) {
                    item.cx = frac.x;
                    item.cy = frac.y;
                }
            }

            GestureState::Resizing { pointer: owner, moved } => {
                if *owner != pointer {
                    return;
                }
                if !*moved {
                    history.push(scene);
                    *moved = true;
                }
                let Some(item) = scene.get(selected) else {
                    return;
                };
                let center = viewport.item_center_px(item);
                let width_px = 2.0 * (p.x - center.x).abs();
                let width = viewport
                    .px_width_to_frac(width_px)
                    .clamp(MIN_WIDTH_FRAC, MAX_WIDTH_FRAC);
                if let Some(item) = scene.get_mut(selected) {
                    item.width = width;
                }
            }

            GestureState::Rotating { pointer: owner, start_angle, start_rotation, moved } => {
                if *owner != pointer {
                    return;
                }
                if !*moved {
                    history.push(scene);
                    *moved = true;
                }
                let Some(item) = scene.get(selected) else {
                    return;
                };
                let center = viewport.item_center_px(item);
                let mut rotation = *start_rotation + angle_from(center, p) - *start_angle;
                if modifiers.shift {
                    rotation = (rotation / ROTATION_SNAP_RAD).round() * ROTATION_SNAP_RAD;
                }
                if let Some(item) = scene.get_mut(selected) {
                    item.rotation = rotation;
                }
            }
        }
    }

    /// Up and cancel reset identically; committed moves stay committed.
    fn on_end(&mut self, pointer: u64) {
        let owner = match self.state {
            GestureState::Idle => return,
            GestureState::Dragging { pointer, .. }
            | GestureState::Resizing { pointer, .. }
            | GestureState::Rotating { pointer, .. } => pointer,
        };
        if owner == pointer {
            self.state = GestureState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use slate_core::{ItemContent, ItemId};

    const VP: Viewport = Viewport { width: 1000.0, height: 1000.0 };

    fn scene_with(name: &str, cx: f32, cy: f32, width: f32) -> Scene {
        let mut scene = Scene::new();
        scene.append(slate_core::Item {
            id: ItemId::intern(name),
            content: ItemContent::Markup("<svg/>".into()),
            cx,
            cy,
            width,
            aspect: 1.0,
            rotation: 0.0,
            role: Default::default(),
            tag: None,
        });
        scene
    }

    fn down(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Down { pointer: 1, x, y, modifiers: Modifiers::NONE }
    }

    fn mv(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Move { pointer: 1, x, y, modifiers: Modifiers::NONE }
    }

    fn mv_shift(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Move {
            pointer: 1,
            x,
            y,
            modifiers: Modifiers { shift: true, ..Modifiers::NONE },
        }
    }

    fn up(x: f32, y: f32) -> PointerEvent {
        PointerEvent::Up { pointer: 1, x, y }
    }

    #[test]
    fn press_on_unselected_item_only_selects() {
        let mut scene = scene_with("a", 0.5, 0.5, 0.2);
        let mut history = History::default();
        let mut engine = GestureEngine::new(false);

        engine.handle(&mut scene, &VP, &mut history, down(500.0, 500.0));
        assert_eq!(scene.selected, Some(ItemId::intern("a")));
        assert!(engine.is_idle(), "selection press must not start a drag");

        // Moving after the selecting press does nothing
        engine.handle(&mut scene, &VP, &mut history, mv(600.0, 600.0));
        assert_eq!(scene.get(ItemId::intern("a")).unwrap().cx, 0.5);
        assert!(history.is_empty());
    }

    #[test]
    fn drag_keeps_grab_offset_and_snapshots_once() {
        let mut scene = scene_with("a", 0.5, 0.5, 0.2);
        scene.select(ItemId::intern("a"));
        let mut history = History::default();
        let mut engine = GestureEngine::new(false);

        // Grab 40px right of center
        engine.handle(&mut scene, &VP, &mut history, down(540.0, 500.0));
        for step in 1..=10 {
            engine.handle(&mut scene, &VP, &mut history, mv(540.0 + step as f32 * 10.0, 500.0));
        }
        engine.handle(&mut scene, &VP, &mut history, up(640.0, 500.0));

        let item = scene.get(ItemId::intern("a")).unwrap();
        // Center followed pointer − offset: 640 − 40 = 600px → 0.6
        assert!((item.cx - 0.6).abs() < 1e-6);
        assert_eq!(history.len(), 1, "dense move stream pushes one snapshot");
    }

    #[test]
    fn unclamped_drag_may_leave_canvas() {
        let mut scene = scene_with("a", 0.5, 0.5, 0.2);
        scene.select(ItemId::intern("a"));
        let mut history = History::default();
        let mut engine = GestureEngine::new(false);

        engine.handle(&mut scene, &VP, &mut history, down(500.0, 500.0));
        engine.handle(&mut scene, &VP, &mut history, mv(-300.0, 500.0));
        assert!(scene.get(ItemId::intern("a")).unwrap().cx < 0.0);
    }

    #[test]
    fn clamped_drag_stays_on_canvas() {
        let mut scene = scene_with("a", 0.5, 0.5, 0.2);
        scene.select(ItemId::intern("a"));
        let mut history = History::default();
        let mut engine = GestureEngine::new(true);

        engine.handle(&mut scene, &VP, &mut history, down(500.0, 500.0));
        engine.handle(&mut scene, &VP, &mut history, mv(-300.0, 1800.0));
        let item = scene.get(ItemId::intern("a")).unwrap();
        assert_eq!((item.cx, item.cy), (0.0, 1.0));
    }

    #[test]
    fn resize_is_symmetric_and_clamped() {
        let mut scene = scene_with("a", 0.5, 0.5, 0.2);
        scene.select(ItemId::intern("a"));
        let mut history = History::default();
        let mut engine = GestureEngine::new(false);

        // Press the resize handle at the right-edge midpoint (600, 500)
        engine.handle(&mut scene, &VP, &mut history, down(600.0, 500.0));
        engine.handle(&mut scene, &VP, &mut history, mv(700.0, 500.0));
        assert!((scene.get(ItemId::intern("a")).unwrap().width - 0.4).abs() < 1e-6);

        // Absurd displacement clamps to the maximum
        engine.handle(&mut scene, &VP, &mut history, mv(99_000.0, 500.0));
        assert_eq!(scene.get(ItemId::intern("a")).unwrap().width, MAX_WIDTH_FRAC);

        // Collapsing through the center clamps to the minimum
        engine.handle(&mut scene, &VP, &mut history, mv(501.0, 500.0));
        assert_eq!(scene.get(ItemId::intern("a")).unwrap().width, MIN_WIDTH_FRAC);

        assert_eq!(history.len(), 1);
    }

    #[test]
    fn rotation_snaps_to_fifteen_degrees_with_shift() {
        let mut scene = scene_with("a", 0.5, 0.5, 0.2);
        scene.select(ItemId::intern("a"));
        let mut history = History::default();
        let mut engine = GestureEngine::new(false);

        // Press the rotate handle above the top edge
        let handle_y = 400.0 - crate::hit::ROTATE_HANDLE_OFFSET_PX;
        engine.handle(&mut scene, &VP, &mut history, down(500.0, handle_y));
        // Sweep to an arbitrary angle with the snap modifier held
        engine.handle(&mut scene, &VP, &mut history, mv_shift(617.0, 441.0));

        let rotation = scene.get(ItemId::intern("a")).unwrap().rotation;
        let steps = rotation / ROTATION_SNAP_RAD;
        assert!(
            (steps - steps.round()).abs() < 1e-4,
            "rotation {rotation} is not a multiple of 15°"
        );
    }

    #[test]
    fn cancel_resets_like_up_without_rollback() {
        let mut scene = scene_with("a", 0.5, 0.5, 0.2);
        scene.select(ItemId::intern("a"));
        let mut history = History::default();
        let mut engine = GestureEngine::new(false);

        engine.handle(&mut scene, &VP, &mut history, down(500.0, 500.0));
        engine.handle(&mut scene, &VP, &mut history, mv(700.0, 500.0));
        engine.handle(&mut scene, &VP, &mut history, PointerEvent::Cancel { pointer: 1 });

        assert!(engine.is_idle());
        // The committed move stays
        assert!((scene.get(ItemId::intern("a")).unwrap().cx - 0.7).abs() < 1e-6);
    }

    #[test]
    fn secondary_pointer_is_ignored_mid_gesture() {
        let mut scene = scene_with("a", 0.5, 0.5, 0.2);
        scene.select(ItemId::intern("a"));
        let mut history = History::default();
        let mut engine = GestureEngine::new(false);

        engine.handle(&mut scene, &VP, &mut history, down(500.0, 500.0));
        // A second pointer presses and moves elsewhere
        engine.handle(
            &mut scene,
            &VP,
            &mut history,
            PointerEvent::Down { pointer: 2, x: 100.0, y: 100.0, modifiers: Modifiers::NONE },
        );
        engine.handle(
            &mut scene,
            &VP,
            &mut history,
            PointerEvent::Move { pointer: 2, x: 100.0, y: 100.0, modifiers: Modifiers::NONE },
        );
        // Second pointer's release must not end the first pointer's gesture
        engine.handle(&mut scene, &VP, &mut history, PointerEvent::Up { pointer: 2, x: 0.0, y: 0.0 });
        assert!(!engine.is_idle());

        let item = scene.get(ItemId::intern("a")).unwrap();
        assert_eq!((item.cx, item.cy), (0.5, 0.5));

        engine.handle(&mut scene, &VP, &mut history, mv(600.0, 500.0));
        assert!((scene.get(ItemId::intern("a")).unwrap().cx - 0.6).abs() < 1e-6);
    }

    #[test]
    fn gesture_on_unselected_item_does_not_start() {
        let mut scene = scene_with("a", 0.2, 0.2, 0.2);
        scene.append(slate_core::Item {
            id: ItemId::intern("b"),
            content: ItemContent::Markup("<svg/>".into()),
            cx: 0.8,
            cy: 0.8,
            width: 0.2,
            aspect: 1.0,
            rotation: 0.0,
            role: Default::default(),
            tag: None,
        });
        scene.select(ItemId::intern("a"));
        let mut history = History::default();
        let mut engine = GestureEngine::new(false);

        // Press lands on b's body, but b is not selected: selection moves, no drag
        engine.handle(&mut scene, &VP, &mut history, down(800.0, 800.0));
        assert_eq!(scene.selected, Some(ItemId::intern("b")));
        assert!(engine.is_idle());
    }
}
