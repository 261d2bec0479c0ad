//! Z-order operations over the scene's ordered item sequence.
//!
//! Each operation repositions exactly one element. Boundary cases (already
//! frontmost/backmost) report `false` so callers can skip the history
//! snapshot — a no-op must not create an undo step.

use crate::id::ItemId;
use crate::scene::Scene;
use serde::{Deserialize, Serialize};

/// The four reorder operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZShift {
    ForwardOne,
    BackwardOne,
    ToFront,
    ToBack,
}

/// Whether applying `shift` to the item at `index` would change anything.
pub fn would_change(len: usize, index: usize, shift: ZShift) -> bool {
    match shift {
        ZShift::ForwardOne | ZShift::ToFront => index + 1 < len,
        ZShift::BackwardOne | ZShift::ToBack => index > 0,
    }
}

/// Reposition `id` within the scene's item sequence. Returns whether the
/// order changed.
pub fn apply(scene: &mut Scene, id: ItemId, shift: ZShift) -> bool {
    let Some(index) = scene.index_of(id) else {
        return false;
    };
    if !would_change(scene.items.len(), index, shift) {
        return false;
    }
    match shift {
        ZShift::ForwardOne => scene.items.swap(index, index + 1),
        ZShift::BackwardOne => scene.items.swap(index, index - 1),
        ZShift::ToFront => {
            let item = scene.items.remove(index);
            scene.items.push(item);
        }
        ZShift::ToBack => {
            let item = scene.items.remove(index);
            scene.items.insert(0, item);
        }
    }
    true
}
