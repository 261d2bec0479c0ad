//! The authoring session: the one writer over a scene.
//!
//! `EditorSession` owns the scene, viewport, history and gesture engine and
//! exposes the discrete commands the host UI calls from its event handlers.
//! Every command is synchronous; every mutating command pushes its history
//! snapshot strictly before touching the scene.

use crate::gesture::GestureEngine;
use crate::input::{Modifiers, PointerEvent};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use slate_core::doc::{DocError, Document, Mode, SaveSink};
use slate_core::zorder::{self, ZShift};
use slate_core::{Color, History, ItemId, Role, Scene, SliderTag, Viewport};
use slate_ingest::ClipboardPayload;

/// Per-mode behavior switches.
#[derive(Debug, Clone, Copy)]
pub struct ModeConfig {
    /// Whether live drags clamp the item center to the canvas. Free-form
    /// composition lets items overhang; the interaction authors keep
    /// everything reachable.
    pub clamp_drag_to_canvas: bool,
}

impl ModeConfig {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Compose => Self { clamp_drag_to_canvas: false },
            Mode::DragDrop | Mode::Slider => Self { clamp_drag_to_canvas: true },
        }
    }
}

pub struct EditorSession {
    pub mode: Mode,
    pub scene: Scene,
    pub viewport: Viewport,
    pub history: History,
    gesture: GestureEngine,
    /// Drag-drop document field.
    pub prompt: String,
    /// Slider document field.
    pub start: f32,
}

impl EditorSession {
    pub fn new(mode: Mode, viewport: Viewport) -> Self {
        let config = ModeConfig::for_mode(mode);
        Self {
            mode,
            scene: Scene::new(),
            viewport,
            history: History::default(),
            gesture: GestureEngine::new(config.clamp_drag_to_canvas),
            prompt: String::new(),
            start: 0.0,
        }
    }

    /// Start a session from an injected (possibly legacy) document.
    /// Malformed input falls back to the generated default.
    pub fn from_document_json(mode: Mode, viewport: Viewport, json: &str) -> Self {
        let mut session = Self::new(mode, viewport);
        session.load(Document::load_or_default(json, mode));
        session
    }

    fn load(&mut self, doc: Document) {
        match doc {
            Document::Compose { scene } => self.scene = scene,
            Document::DragDrop { scene, prompt } => {
                self.scene = scene;
                self.prompt = prompt;
            }
            Document::Slider { scene, start } => {
                self.scene = scene;
                self.start = start;
            }
        }
        self.history = History::default();
    }

    /// The current state as a saveable document.
    pub fn document(&self) -> Document {
        match self.mode {
            Mode::Compose => Document::Compose { scene: self.scene.clone() },
            Mode::DragDrop => {
                Document::DragDrop { scene: self.scene.clone(), prompt: self.prompt.clone() }
            }
            Mode::Slider => Document::Slider { scene: self.scene.clone(), start: self.start },
        }
    }

    /// Validate and hand the document to the injected sink. A validation
    /// failure blocks the save and carries the issue list back.
    pub fn save_into(&self, sink: &mut dyn SaveSink) -> Result<(), DocError> {
        self.document().save_into(sink)
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn pointer(&mut self, event: PointerEvent) {
        self.gesture.handle(&mut self.scene, &self.viewport, &mut self.history, event);
    }

    /// Canvas resize notification. Fractions are authoritative, so nothing
    /// else changes.
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
    }

    /// Resolve and run a keyboard shortcut.
    pub fn key(&mut self, key: &str, modifiers: Modifiers, in_text_input: bool) -> bool {
        match ShortcutMap::resolve(key, modifiers, in_text_input) {
            Some(action) => {
                self.run(action);
                true
            }
            None => false,
        }
    }

    pub fn run(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Duplicate => self.duplicate_selected(),
            ShortcutAction::Delete => self.delete_selected(),
        }
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Ingest a clipboard payload. One snapshot precedes the append, pushed
    /// only when the pipeline produced at least one item; pasting junk is a
    /// silent no-op. The last appended item becomes the selection.
    pub fn paste(&mut self, payload: &ClipboardPayload) {
        let items = slate_ingest::ingest(payload);
        if items.is_empty() {
            return;
        }
        self.history.push(&self.scene);
        let mut last = None;
        for item in items {
            last = Some(item.id);
            self.scene.append(item);
        }
        if let Some(id) = last {
            self.scene.select(id);
        }
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.scene)
    }

    pub fn delete_selected(&mut self) {
        let Some(selected) = self.scene.selected else {
            return;
        };
        self.history.push(&self.scene);
        self.scene.remove(selected);
    }

    pub fn duplicate_selected(&mut self) {
        let Some(selected) = self.scene.selected else {
            return;
        };
        self.history.push(&self.scene);
        self.scene.duplicate(selected);
    }

    pub fn set_background(&mut self, color: Color) {
        self.history.push(&self.scene);
        self.scene.background = color;
    }

    /// Reorder the selected item. Boundary cases change nothing and push no
    /// snapshot.
    pub fn shift_selected(&mut self, shift: ZShift) {
        let Some(selected) = self.scene.selected else {
            return;
        };
        let Some(index) = self.scene.index_of(selected) else {
            return;
        };
        if !zorder::would_change(self.scene.len(), index, shift) {
            return;
        }
        self.history.push(&self.scene);
        zorder::apply(&mut self.scene, selected, shift);
    }

    /// Property-editor write: replace an item's drag-drop role. Authored
    /// final positions are clamped to the canvas here, unlike live drags.
    pub fn set_role(&mut self, id: ItemId, mut role: Role) {
        if self.scene.get(id).is_none() {
            return;
        }
        if let Role::Draggable { placement, .. } = &mut role {
            placement.clamp_all();
        }
        self.history.push(&self.scene);
        if let Some(item) = self.scene.get_mut(id) {
            item.set_role(role);
        }
    }

    /// Property-editor write: replace an item's slider tag. Setting one tag
    /// clears the other.
    pub fn set_tag(&mut self, id: ItemId, tag: Option<SliderTag>) {
        if self.scene.get(id).is_none() {
            return;
        }
        self.history.push(&self.scene);
        if let Some(item) = self.scene.get_mut(id) {
            item.set_tag(tag);
        }
    }

    pub fn set_slider_start(&mut self, start: f32) {
        self.start = start.clamp(0.0, 1.0);
    }
}
