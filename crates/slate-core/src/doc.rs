//! The content document contract.
//!
//! Each authoring mode serializes its scene (plus mode-specific fields) to a
//! mode-tagged JSON document. Saving validates first and a failing document
//! never leaves the engine; loading is lenient — malformed or legacy input is
//! coerced where possible and otherwise replaced by a generated default.
//! Persistence itself lives behind the `SaveSink` seam.

use crate::model::{FinalPlacement, Role};
use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// The three authoring modes sharing the canvas engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Compose,
    DragDrop,
    Slider,
}

/// A saved/loaded content document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Document {
    Compose {
        scene: Scene,
    },
    DragDrop {
        scene: Scene,
        /// Author-facing prompt shown above the canvas.
        #[serde(default)]
        prompt: String,
    },
    Slider {
        scene: Scene,
        /// Initial slider value, in [0, 1].
        #[serde(default)]
        start: f32,
    },
}

/// One field-path-qualified validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocIssue {
    /// e.g. `scene.items[3].width`
    pub path: String,
    pub message: String,
}

impl DocIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum DocError {
    #[error("document failed validation ({} issue(s))", .0.len())]
    Invalid(Vec<DocIssue>),
    #[error("document serialization failed")]
    Serialize(#[from] serde_json::Error),
    #[error("save sink rejected document: {0}")]
    Sink(String),
}

/// External persistence seam. Database, schema storage and auth live on the
/// far side of this trait.
pub trait SaveSink {
    fn save(&mut self, json: &str) -> Result<(), String>;
}

impl Document {
    pub fn mode(&self) -> Mode {
        match self {
            Document::Compose { .. } => Mode::Compose,
            Document::DragDrop { .. } => Mode::DragDrop,
            Document::Slider { .. } => Mode::Slider,
        }
    }

    pub fn scene(&self) -> &Scene {
        match self {
            Document::Compose { scene }
            | Document::DragDrop { scene, .. }
            | Document::Slider { scene, .. } => scene,
        }
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        match self {
            Document::Compose { scene }
            | Document::DragDrop { scene, .. }
            | Document::Slider { scene, .. } => scene,
        }
    }

    /// The generated default: empty scene, white background.
    pub fn default_for(mode: Mode) -> Self {
        match mode {
            Mode::Compose => Document::Compose { scene: Scene::new() },
            Mode::DragDrop => Document::DragDrop { scene: Scene::new(), prompt: String::new() },
            Mode::Slider => Document::Slider { scene: Scene::new(), start: 0.0 },
        }
    }

    /// Parse a (possibly legacy or malformed) document. Coercible problems
    /// are fixed in place; anything else falls back to the default for
    /// `mode`. Never errors.
    pub fn load_or_default(json: &str, mode: Mode) -> Self {
        let mut doc = match serde_json::from_str::<Document>(json) {
            Ok(doc) if doc.mode() == mode => doc,
            Ok(doc) => {
                log::warn!(
                    "document mode mismatch (wanted {mode:?}, got {:?}); using default",
                    doc.mode()
                );
                return Self::default_for(mode);
            }
            Err(err) => {
                log::warn!("document parse failed ({err}); using default");
                return Self::default_for(mode);
            }
        };
        doc.sanitize();
        doc
    }

    /// Validate, then serialize. A document with issues never serializes.
    pub fn export(&self) -> Result<String, DocError> {
        let issues = self.validate();
        if !issues.is_empty() {
            return Err(DocError::Invalid(issues));
        }
        Ok(serde_json::to_string(self)?)
    }

    /// Validate, serialize, and hand the JSON to the injected sink.
    pub fn save_into(&self, sink: &mut dyn SaveSink) -> Result<(), DocError> {
        let json = self.export()?;
        sink.save(&json).map_err(DocError::Sink)
    }

    /// Structural and per-mode validation. Empty result means saveable.
    pub fn validate(&self) -> Vec<DocIssue> {
        let mut issues = Vec::new();
        let mode = self.mode();
        let scene = self.scene();

        let bg = scene.background;
        for (ch, v) in [("r", bg.r), ("g", bg.g), ("b", bg.b), ("a", bg.a)] {
            if !(0.0..=1.0).contains(&v) {
                issues.push(DocIssue::new(
                    format!("scene.background.{ch}"),
                    format!("channel out of range: {v}"),
                ));
            }
        }

        let target_ids: HashSet<_> = scene
            .items
            .iter()
            .filter(|item| matches!(item.role, Role::Target))
            .map(|item| item.id)
            .collect();

        let mut seen = HashSet::new();
        for (i, item) in scene.items.iter().enumerate() {
            let at = |field: &str| format!("scene.items[{i}].{field}");

            if !seen.insert(item.id) {
                issues.push(DocIssue::new(at("id"), format!("duplicate id {:?}", item.id.as_str())));
            }
            if !item.width.is_finite() || item.width <= 0.0 {
                issues.push(DocIssue::new(at("width"), format!("must be finite and positive, got {}", item.width)));
            }
            if !item.aspect.is_finite() || item.aspect <= 0.0 {
                issues.push(DocIssue::new(at("aspect"), format!("must be finite and positive, got {}", item.aspect)));
            }
            if !item.cx.is_finite() || !item.cy.is_finite() {
                issues.push(DocIssue::new(at("cx"), "center must be finite"));
            }
            if !item.rotation.is_finite() {
                issues.push(DocIssue::new(at("rotation"), "must be finite"));
            }

            match mode {
                Mode::Compose => {
                    if !matches!(item.role, Role::None) {
                        issues.push(DocIssue::new(at("role"), "roles are not allowed in compose documents"));
                    }
                    if item.tag.is_some() {
                        issues.push(DocIssue::new(at("tag"), "slider tags are not allowed in compose documents"));
                    }
                }
                Mode::DragDrop => {
                    if item.tag.is_some() {
                        issues.push(DocIssue::new(at("tag"), "slider tags are not allowed in drag-drop documents"));
                    }
                    match &item.role {
                        Role::Draggable { accepting_target, placement } => {
                            if let Some(target) = accepting_target
                                && !target_ids.contains(target)
                            {
                                issues.push(DocIssue::new(
                                    at("role.accepting_target"),
                                    format!("references {:?}, which is not a target item", target.as_str()),
                                ));
                            }
                            validate_placement(placement, &target_ids, &at("role.placement"), &mut issues);
                        }
                        Role::Tappable { message } if message.is_empty() => {
                            issues.push(DocIssue::new(at("role.message"), "tappable message must not be empty"));
                        }
                        _ => {}
                    }
                }
                Mode::Slider => {
                    if !matches!(item.role, Role::None) {
                        issues.push(DocIssue::new(at("role"), "roles are not allowed in slider documents"));
                    }
                }
            }
        }

        if let Document::Slider { start, .. } = self
            && !(0.0..=1.0).contains(start)
        {
            issues.push(DocIssue::new("start", format!("must be within [0, 1], got {start}")));
        }

        issues
    }

    /// Coerce what validation would flag, where a sensible fix exists:
    /// duplicate ids are dropped, non-finite geometry is reset, placements
    /// and the slider start are clamped, and authoring blocks from the
    /// wrong mode are cleared.
    pub fn sanitize(&mut self) {
        let mode = self.mode();

        if let Document::Slider { start, .. } = self {
            *start = if start.is_finite() { start.clamp(0.0, 1.0) } else { 0.0 };
        }

        let scene = self.scene_mut();
        let mut seen = HashSet::new();
        scene.items.retain(|item| seen.insert(item.id));

        for item in &mut scene.items {
            if !item.width.is_finite() || item.width <= 0.0 {
                item.width = crate::model::PASTE_WIDTH_FRAC;
            }
            if !item.aspect.is_finite() || item.aspect <= 0.0 {
                item.aspect = 1.0;
            }
            if !item.cx.is_finite() {
                item.cx = 0.5;
            }
            if !item.cy.is_finite() {
                item.cy = 0.5;
            }
            if !item.rotation.is_finite() {
                item.rotation = 0.0;
            }

            match mode {
                Mode::Compose => {
                    item.role = Role::None;
                    item.tag = None;
                }
                Mode::DragDrop => {
                    item.tag = None;
                    if let Role::Draggable { placement, .. } = &mut item.role {
                        placement.clamp_all();
                    }
                }
                Mode::Slider => {
                    item.role = Role::None;
                }
            }
        }
    }
}

fn validate_placement(
    placement: &FinalPlacement,
    target_ids: &HashSet<crate::ItemId>,
    path: &str,
    issues: &mut Vec<DocIssue>,
) {
    let check_point = |p: &crate::model::FracPoint, path: String, issues: &mut Vec<DocIssue>| {
        if !(0.0..=1.0).contains(&p.x) || !(0.0..=1.0).contains(&p.y) {
            issues.push(DocIssue::new(path, format!("must lie within [0, 1]², got ({}, {})", p.x, p.y)));
        }
    };
    match placement {
        FinalPlacement::None => {}
        FinalPlacement::Single(p) => check_point(p, path.to_string(), issues),
        FinalPlacement::PerTarget(map) => {
            for (target, p) in map {
                if !target_ids.contains(target) {
                    issues.push(DocIssue::new(
                        format!("{path}[{:?}]", target.as_str()),
                        "keyed by an id that is not a target item",
                    ));
                }
                check_point(p, format!("{path}[{:?}]", target.as_str()), issues);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FracPoint, Item, ItemContent};
    use crate::ItemId;
    use pretty_assertions::assert_eq;

    fn item(name: &str) -> Item {
        Item {
            id: ItemId::intern(name),
            content: ItemContent::Markup("<svg/>".into()),
            cx: 0.5,
            cy: 0.5,
            width: 0.2,
            aspect: 1.0,
            rotation: 0.0,
            role: Default::default(),
            tag: None,
        }
    }

    #[test]
    fn valid_document_roundtrips() {
        let mut scene = Scene::new();
        scene.append(item("a"));
        let doc = Document::Compose { scene };

        let json = doc.export().unwrap();
        let back = Document::load_or_default(&json, Mode::Compose);
        assert_eq!(back, doc);
    }

    #[test]
    fn dangling_target_reference_blocks_save() {
        let mut scene = Scene::new();
        let mut drag = item("coin");
        drag.role = Role::Draggable {
            accepting_target: Some(ItemId::intern("nowhere")),
            placement: FinalPlacement::None,
        };
        scene.append(drag);
        let doc = Document::DragDrop { scene, prompt: String::new() };

        let issues = doc.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "scene.items[0].role.accepting_target");
        assert!(matches!(doc.export(), Err(DocError::Invalid(_))));
    }

    #[test]
    fn placement_out_of_range_is_flagged_with_path() {
        let mut scene = Scene::new();
        let mut target = item("bin");
        target.role = Role::Target;
        scene.append(target);
        let mut drag = item("coin2");
        drag.role = Role::Draggable {
            accepting_target: Some(ItemId::intern("bin")),
            placement: FinalPlacement::Single(FracPoint::new(1.5, 0.5)),
        };
        scene.append(drag);
        let doc = Document::DragDrop { scene, prompt: String::new() };

        let issues = doc.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "scene.items[1].role.placement");
    }

    #[test]
    fn malformed_json_falls_back_to_default() {
        let doc = Document::load_or_default("{not json", Mode::Slider);
        assert_eq!(doc, Document::default_for(Mode::Slider));
    }

    #[test]
    fn mode_mismatch_falls_back_to_default() {
        let other = Document::Compose { scene: Scene::new() };
        let json = other.export().unwrap();
        let doc = Document::load_or_default(&json, Mode::DragDrop);
        assert_eq!(doc, Document::default_for(Mode::DragDrop));
    }

    #[test]
    fn sanitize_coerces_legacy_geometry() {
        let json = r##"{
            "mode": "slider",
            "scene": {
                "items": [
                    {"id": "m", "kind": "vector-markup", "content": "<svg/>", "cx": 0.5, "cy": 0.5, "width": -3.0},
                    {"id": "m", "kind": "vector-markup", "content": "<svg/>", "cx": 0.5, "cy": 0.5, "width": 0.1}
                ],
                "background": "#FFFFFF"
            },
            "start": 7.0
        }"##;
        let doc = Document::load_or_default(json, Mode::Slider);

        let Document::Slider { scene, start } = &doc else {
            panic!("expected slider document");
        };
        // Duplicate id dropped, bad width reset, start clamped
        assert_eq!(scene.items.len(), 1);
        assert!(scene.items[0].width > 0.0);
        assert_eq!(*start, 1.0);
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn save_into_passes_validated_json() {
        struct Captured(Option<String>);
        impl SaveSink for Captured {
            fn save(&mut self, json: &str) -> Result<(), String> {
                self.0 = Some(json.to_string());
                Ok(())
            }
        }

        let doc = Document::default_for(Mode::Compose);
        let mut sink = Captured(None);
        doc.save_into(&mut sink).unwrap();
        assert!(sink.0.unwrap().contains("\"mode\":\"compose\""));
    }
}
