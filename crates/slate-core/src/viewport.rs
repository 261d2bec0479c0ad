//! Viewport abstraction: fractional item attributes ↔ device pixels.
//!
//! Fractions are the source of truth; every pixel value here is derived and
//! recomputed on demand, so a canvas resize only needs to update the
//! viewport itself.

use crate::model::{FracPoint, Item};
use serde::{Deserialize, Serialize};

/// The canvas pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

/// A point in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxPoint {
    pub x: f32,
    pub y: f32,
}

impl PxPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PxRect {
    pub fn contains(&self, p: PxPoint) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> PxPoint {
        PxPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Resize notification from the host. Fractions are untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn to_px(&self, p: FracPoint) -> PxPoint {
        PxPoint::new(p.x * self.width, p.y * self.height)
    }

    pub fn to_frac(&self, p: PxPoint) -> FracPoint {
        FracPoint::new(p.x / self.width, p.y / self.height)
    }

    /// A width fraction in device pixels.
    pub fn frac_width_to_px(&self, frac: f32) -> f32 {
        frac * self.width
    }

    /// A horizontal pixel span as a width fraction.
    pub fn px_width_to_frac(&self, px: f32) -> f32 {
        px / self.width
    }

    /// The item's center in device pixels.
    pub fn item_center_px(&self, item: &Item) -> PxPoint {
        self.to_px(item.center())
    }

    /// The item's unrotated pixel bounding box: `width` of canvas width,
    /// height from the item's aspect ratio, centered on (cx, cy).
    pub fn item_rect(&self, item: &Item) -> PxRect {
        let w = self.frac_width_to_px(item.width);
        let h = w * item.aspect;
        let c = self.item_center_px(item);
        PxRect { x: c.x - w / 2.0, y: c.y - h / 2.0, width: w, height: h }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemContent;
    use crate::ItemId;
    use pretty_assertions::assert_eq;

    fn item_at(cx: f32, cy: f32, width: f32, aspect: f32) -> Item {
        Item {
            id: ItemId::fresh("t"),
            content: ItemContent::Markup("<svg/>".into()),
            cx,
            cy,
            width,
            aspect,
            rotation: 0.0,
            role: Default::default(),
            tag: None,
        }
    }

    #[test]
    fn point_conversion_roundtrip() {
        let vp = Viewport::new(1000.0, 500.0);
        let frac = FracPoint::new(0.3, 0.8);
        let px = vp.to_px(frac);
        assert_eq!(px, PxPoint::new(300.0, 400.0));
        let back = vp.to_frac(px);
        assert!((back.x - frac.x).abs() < 1e-6);
        assert!((back.y - frac.y).abs() < 1e-6);
    }

    #[test]
    fn item_rect_uses_aspect_for_height() {
        let vp = Viewport::new(1000.0, 500.0);
        let item = item_at(0.5, 0.5, 0.2, 0.5);
        let rect = vp.item_rect(&item);
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 100.0);
        assert_eq!(rect.center(), PxPoint::new(500.0, 250.0));
    }

    #[test]
    fn resize_rescales_derived_pixels() {
        let mut vp = Viewport::new(1000.0, 500.0);
        let item = item_at(0.25, 0.5, 0.1, 1.0);
        assert_eq!(vp.item_center_px(&item), PxPoint::new(250.0, 250.0));

        vp.resize(400.0, 200.0);
        assert_eq!(vp.item_center_px(&item), PxPoint::new(100.0, 100.0));
        assert_eq!(vp.frac_width_to_px(item.width), 40.0);
    }

    #[test]
    fn rect_containment() {
        let rect = PxRect { x: 10.0, y: 10.0, width: 20.0, height: 10.0 };
        assert!(rect.contains(PxPoint::new(10.0, 10.0)));
        assert!(rect.contains(PxPoint::new(30.0, 20.0)));
        assert!(!rect.contains(PxPoint::new(30.1, 20.0)));
    }
}
