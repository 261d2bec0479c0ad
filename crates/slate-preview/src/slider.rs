//! Slider-driven interpolation.
//!
//! One external scalar `t ∈ [0, 1]` drives every tagged item at once. Each
//! frame's pose is a pure function of `(t, item)`: moveable items lerp from
//! their authored center to a margin-constrained extreme along their path,
//! resizeable items scale their width. Untagged items keep their authored
//! pose. Nothing is written back to the scene.

use crate::overlay::OverlayPose;
use slate_core::{Item, ItemId, MotionPath, Scene, SliderTag};
use std::collections::HashMap;

/// Bounds for the travel margin: half the item's width, clamped to
/// [2%, 50%] of canvas width.
pub const MARGIN_MIN_FRAC: f32 = 0.02;
pub const MARGIN_MAX_FRAC: f32 = 0.5;

/// Width scale endpoints: 0.2× at `t = 0`, 2.0× at `t = 1`.
pub const RESIZE_SCALE_MIN: f32 = 0.2;
pub const RESIZE_SCALE_SPAN: f32 = 1.8;

/// Lerp with exact endpoints, so `t = 0` is the authored pose and `t = 1`
/// is the extreme, bit for bit.
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + (b - a) * t
    }
}

/// The pose of one item at slider value `t`. Pure.
pub fn pose_at(item: &Item, t: f32) -> OverlayPose {
    match item.tag {
        None => OverlayPose::of_item(item),
        Some(SliderTag::Moveable { path }) => {
            let margin = (item.width / 2.0).clamp(MARGIN_MIN_FRAC, MARGIN_MAX_FRAC);
            let (ex, ey) = match path {
                MotionPath::Horizontal => (1.0 - margin, item.cy),
                MotionPath::Vertical => (item.cx, 1.0 - margin),
                MotionPath::DiagonalDown => (1.0 - margin, 1.0 - margin),
                MotionPath::DiagonalUp => (margin, 1.0 - margin),
            };
            OverlayPose {
                cx: lerp(item.cx, ex, t),
                cy: lerp(item.cy, ey, t),
                width: item.width,
                visible: true,
            }
        }
        Some(SliderTag::Resizeable) => OverlayPose {
            cx: item.cx,
            cy: item.cy,
            width: item.width * (RESIZE_SCALE_MIN + RESIZE_SCALE_SPAN * t),
            visible: true,
        },
    }
}

/// The slider preview: holds the clamped control value and evaluates the
/// whole scene against it.
pub struct SliderPreview {
    t: f32,
}

impl SliderPreview {
    pub fn new(start: f32) -> Self {
        Self { t: start.clamp(0.0, 1.0) }
    }

    pub fn t(&self) -> f32 {
        self.t
    }

    pub fn set_t(&mut self, t: f32) {
        self.t = t.clamp(0.0, 1.0);
    }

    pub fn pose_of(&self, item: &Item) -> OverlayPose {
        pose_at(item, self.t)
    }

    /// Every item's pose for the current frame, keyed by id.
    pub fn poses(&self, scene: &Scene) -> HashMap<ItemId, OverlayPose> {
        scene.items.iter().map(|item| (item.id, self.pose_of(item))).collect()
    }
}
