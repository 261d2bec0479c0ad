//! Core data model for Slate scenes.
//!
//! A scene is an ordered list of `Item`s — pasted vector markup or raster
//! references positioned in fractional canvas coordinates. The mode-specific
//! authoring blocks (drag-drop roles, slider tags) are enums, so role fields
//! exist only on the variant they belong to and the moveable/resizeable
//! exclusivity holds by construction.

use crate::id::ItemId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

// ─── Geometry constants ──────────────────────────────────────────────────

/// Lower bound for interactively resized widths, as a fraction of canvas width.
pub const MIN_WIDTH_FRAC: f32 = 0.05;
/// Upper bound for interactively resized widths, as a fraction of canvas width.
pub const MAX_WIDTH_FRAC: f32 = 2.0;
/// Center offset applied to a duplicated item, in fraction space.
pub const DUPLICATE_OFFSET_FRAC: f32 = 0.03;
/// Default width fraction for freshly pasted items.
pub const PASTE_WIDTH_FRAC: f32 = 0.25;

// ─── Color ───────────────────────────────────────────────────────────────

/// RGBA color, each channel in [0.0, 1.0]. Serialized as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. The `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let expanded: String = match hex.len() {
            // #RGB → #RRGGBB
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            _ => return None,
        };
        let chan = |i: usize| -> Option<f32> {
            let byte = u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok()?;
            Some(f32::from(byte) / 255.0)
        };
        Some(Color {
            r: chan(0)?,
            g: chan(2)?,
            b: chan(4)?,
            a: if expanded.len() == 8 { chan(6)? } else { 1.0 },
        })
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if (self.a - 1.0).abs() < f32::EPSILON {
            format!("#{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s:?}")))
    }
}

// ─── Item content ────────────────────────────────────────────────────────

/// Discriminant for what an item holds, used by the document contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    VectorMarkup,
    RasterReference,
}

/// An embeddable raster reference: a self-contained `src` (data URL) plus
/// the decoded natural size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterRef {
    pub src: String,
    pub natural_width: u32,
    pub natural_height: u32,
}

/// What an item actually holds: sanitized, namespaced SVG markup, or a
/// raster reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content")]
pub enum ItemContent {
    #[serde(rename = "vector-markup")]
    Markup(String),
    #[serde(rename = "raster-reference")]
    Raster(RasterRef),
}

impl ItemContent {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemContent::Markup(_) => ItemKind::VectorMarkup,
            ItemContent::Raster(_) => ItemKind::RasterReference,
        }
    }
}

// ─── Drag-drop roles ─────────────────────────────────────────────────────

/// A position in fraction space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FracPoint {
    pub x: f32,
    pub y: f32,
}

impl FracPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp both axes to the canvas.
    pub fn clamped(self) -> Self {
        Self { x: self.x.clamp(0.0, 1.0), y: self.y.clamp(0.0, 1.0) }
    }
}

/// Where an accepted draggable settles after a successful drop.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalPlacement {
    /// No authored placement: the item completes and hides.
    #[default]
    None,
    /// One placement regardless of which target accepted.
    Single(FracPoint),
    /// A placement per accepting target.
    PerTarget(HashMap<ItemId, FracPoint>),
}

impl FinalPlacement {
    /// The placement to use for a drop on `target`, if one is authored.
    pub fn for_target(&self, target: ItemId) -> Option<FracPoint> {
        match self {
            FinalPlacement::None => None,
            FinalPlacement::Single(p) => Some(*p),
            FinalPlacement::PerTarget(map) => map.get(&target).copied(),
        }
    }

    /// Clamp every authored placement to the canvas.
    pub fn clamp_all(&mut self) {
        match self {
            FinalPlacement::None => {}
            FinalPlacement::Single(p) => *p = p.clamped(),
            FinalPlacement::PerTarget(map) => {
                for p in map.values_mut() {
                    *p = p.clamped();
                }
            }
        }
    }
}

/// Drag-drop authoring role. Role-specific fields live on their variant only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "kebab-case")]
pub enum Role {
    #[default]
    None,
    Draggable {
        /// The target that accepts this item, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accepting_target: Option<ItemId>,
        #[serde(default, skip_serializing_if = "placement_is_none")]
        placement: FinalPlacement,
    },
    Target,
    Tappable {
        message: String,
    },
}

fn placement_is_none(p: &FinalPlacement) -> bool {
    matches!(p, FinalPlacement::None)
}

// ─── Slider tags ─────────────────────────────────────────────────────────

/// Canonical movement paths for slider-driven items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionPath {
    Horizontal,
    Vertical,
    /// Toward the bottom-right corner (↘).
    DiagonalDown,
    /// Toward the bottom-left corner (↙).
    DiagonalUp,
}

/// Slider authoring tag. One `Option<SliderTag>` per item keeps
/// moveable/resizeable mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "kebab-case")]
pub enum SliderTag {
    Moveable { path: MotionPath },
    Resizeable,
}

// ─── Item ────────────────────────────────────────────────────────────────

/// One positionable object in a scene.
///
/// `cx`/`cy` are the center as a fraction of canvas width/height; `width` is
/// a fraction of canvas width; `aspect` is the height/width ratio of the
/// rendered box (from the SVG viewBox or the raster natural size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(flatten)]
    pub content: ItemContent,
    pub cx: f32,
    pub cy: f32,
    pub width: f32,
    #[serde(default = "default_aspect")]
    pub aspect: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default, skip_serializing_if = "role_is_none")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<SliderTag>,
}

fn default_aspect() -> f32 {
    1.0
}

fn role_is_none(role: &Role) -> bool {
    matches!(role, Role::None)
}

impl Item {
    /// Build a vector-markup item centered on the canvas at the paste size.
    pub fn markup(markup: String, aspect: f32) -> Self {
        Self {
            id: ItemId::fresh("markup"),
            content: ItemContent::Markup(markup),
            cx: 0.5,
            cy: 0.5,
            width: PASTE_WIDTH_FRAC,
            aspect,
            rotation: 0.0,
            role: Role::None,
            tag: None,
        }
    }

    /// Build a raster-reference item centered on the canvas at the paste size.
    pub fn raster(raster: RasterRef) -> Self {
        let aspect = if raster.natural_width == 0 {
            1.0
        } else {
            raster.natural_height as f32 / raster.natural_width as f32
        };
        Self {
            id: ItemId::fresh("image"),
            content: ItemContent::Raster(raster),
            cx: 0.5,
            cy: 0.5,
            width: PASTE_WIDTH_FRAC,
            aspect,
            rotation: 0.0,
            role: Role::None,
            tag: None,
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.content.kind()
    }

    pub fn center(&self) -> FracPoint {
        FracPoint::new(self.cx, self.cy)
    }

    /// Replace the slider tag. Setting one variant clears the other.
    pub fn set_tag(&mut self, tag: Option<SliderTag>) {
        self.tag = tag;
    }

    /// Replace the drag-drop role, dropping the old role's fields with it.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#3A6EA5").unwrap();
        assert_eq!(c.to_hex(), "#3A6EA5");

        let short = Color::from_hex("fff").unwrap();
        assert_eq!(short.to_hex(), "#FFFFFF");

        let alpha = Color::from_hex("#00000080").unwrap();
        assert!((alpha.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(alpha.to_hex(), "#00000080");
    }

    #[test]
    fn color_rejects_garbage() {
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("notacolor"), None);
    }

    #[test]
    fn raster_item_aspect_from_natural_size() {
        let item = Item::raster(RasterRef {
            src: "data:image/png;base64,AAAA".into(),
            natural_width: 200,
            natural_height: 100,
        });
        assert!((item.aspect - 0.5).abs() < 1e-6);
        assert_eq!(item.kind(), ItemKind::RasterReference);
    }

    #[test]
    fn setting_tag_replaces_previous() {
        let mut item = Item::markup("<svg/>".into(), 1.0);
        item.set_tag(Some(SliderTag::Moveable { path: MotionPath::Horizontal }));
        item.set_tag(Some(SliderTag::Resizeable));
        assert_eq!(item.tag, Some(SliderTag::Resizeable));
    }

    #[test]
    fn placement_lookup_prefers_keyed_entry() {
        let t1 = ItemId::intern("bin_a");
        let t2 = ItemId::intern("bin_b");
        let mut map = HashMap::new();
        map.insert(t1, FracPoint::new(0.2, 0.3));
        let placement = FinalPlacement::PerTarget(map);

        assert_eq!(placement.for_target(t1), Some(FracPoint::new(0.2, 0.3)));
        assert_eq!(placement.for_target(t2), None);
    }

    #[test]
    fn item_json_roundtrip() {
        let item = Item {
            id: ItemId::intern("star"),
            content: ItemContent::Markup("<svg viewBox=\"0 0 10 10\"/>".into()),
            cx: 0.25,
            cy: 0.75,
            width: 0.4,
            aspect: 1.0,
            rotation: 0.5,
            role: Role::Tappable { message: "well done".into() },
            tag: None,
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
