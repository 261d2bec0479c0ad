//! Hit testing: point → item / handle-zone lookup.
//!
//! Body tests walk items front-to-back (reverse render order, last painted
//! checked first) and are rotation-aware: the point is carried into the
//! item's local frame before the box test. Handle zones exist only on the
//! currently selected item.

use slate_core::{Item, ItemId, PxPoint, Scene, Viewport};

/// Distance from the top edge of the item box to the rotate handle center,
/// in device pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f32 = 28.0;
/// Hit radius of the rotate handle.
pub const ROTATE_HANDLE_RADIUS_PX: f32 = 12.0;
/// Hit radius of the resize handle at the right-edge midpoint.
pub const RESIZE_HANDLE_RADIUS_PX: f32 = 10.0;

/// What part of the selected item a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    RotateHandle,
    ResizeHandle,
    Body,
}

/// The pointer position in the item's local frame: origin at the item
/// center, axes unrotated.
fn to_local(item: &Item, viewport: &Viewport, p: PxPoint) -> (f32, f32) {
    let c = viewport.item_center_px(item);
    let dx = p.x - c.x;
    let dy = p.y - c.y;
    let (sin, cos) = (-item.rotation).sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}

fn body_contains(item: &Item, viewport: &Viewport, p: PxPoint) -> bool {
    let rect = viewport.item_rect(item);
    let (lx, ly) = to_local(item, viewport, p);
    lx.abs() <= rect.width / 2.0 && ly.abs() <= rect.height / 2.0
}

/// Topmost item whose body contains the point.
pub fn hit_test(scene: &Scene, viewport: &Viewport, p: PxPoint) -> Option<ItemId> {
    scene
        .iter_front_to_back()
        .find(|item| body_contains(item, viewport, p))
        .map(|item| item.id)
}

/// Classify a press on the selected item, handle zones first:
/// rotate > resize > body. `None` when the press misses all three.
pub fn selected_zone(item: &Item, viewport: &Viewport, p: PxPoint) -> Option<HitZone> {
    let rect = viewport.item_rect(item);
    let (lx, ly) = to_local(item, viewport, p);

    let rotate_dy = ly + rect.height / 2.0 + ROTATE_HANDLE_OFFSET_PX;
    if (lx * lx + rotate_dy * rotate_dy).sqrt() <= ROTATE_HANDLE_RADIUS_PX {
        return Some(HitZone::RotateHandle);
    }

    let resize_dx = lx - rect.width / 2.0;
    if (resize_dx * resize_dx + ly * ly).sqrt() <= RESIZE_HANDLE_RADIUS_PX {
        return Some(HitZone::ResizeHandle);
    }

    if lx.abs() <= rect.width / 2.0 && ly.abs() <= rect.height / 2.0 {
        return Some(HitZone::Body);
    }
    None
}
