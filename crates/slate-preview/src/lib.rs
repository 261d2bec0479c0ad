//! Non-destructive preview/simulation.
//!
//! Two mutually exclusive runtime modes over one authored scene: drag-drop
//! acceptance testing and slider-driven interpolation. Both write only to
//! overlay state keyed by item id — the authored scene is read, never
//! mutated, so leaving preview discards nothing.

pub mod dragdrop;
pub mod overlay;
pub mod slider;

pub use dragdrop::{DragDropPreview, DropOutcome};
pub use overlay::{Overlay, OverlayPose, Transition};
pub use slider::SliderPreview;
