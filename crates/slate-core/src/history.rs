//! Whole-scene undo history.
//!
//! A bounded stack of scene snapshots. A snapshot is pushed strictly before
//! the mutation it guards, and `undo` replaces the entire current state with
//! the popped copy — a coarse restore, not a per-field patch. There is no
//! redo: nothing ever captures a post-action state.

use crate::scene::Scene;

/// Default maximum undo depth.
pub const DEFAULT_DEPTH: usize = 100;

pub struct History {
    stack: Vec<Scene>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self { stack: Vec::with_capacity(max_depth.min(64)), max_depth }
    }

    /// Deep-copy the scene onto the stack. Call before mutating.
    /// Oldest snapshot is evicted when the stack overflows.
    pub fn push(&mut self, scene: &Scene) {
        self.stack.push(scene.clone());
        if self.stack.len() > self.max_depth {
            self.stack.remove(0);
            log::trace!("history: evicted oldest snapshot (depth {})", self.max_depth);
        }
    }

    /// Pop the most recent snapshot into `scene`. Returns false when the
    /// stack is empty (nothing restored).
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        match self.stack.pop() {
            Some(snapshot) => {
                *scene = snapshot;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, Item, ItemContent};
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
    fn undo_restores_exact_state() {
        let mut scene = Scene::new();
        scene.append(item("a"));
        scene.select(ItemId::intern("a"));
        let before = scene.clone();

        let mut history = History::default();
        history.push(&scene);
        scene.get_mut(ItemId::intern("a")).unwrap().cx = 0.9;
        scene.background = Color::from_hex("#123456").unwrap();
        scene.deselect();

        assert!(history.undo(&mut scene));
        assert_eq!(scene, before);
        assert_eq!(scene.selected, Some(ItemId::intern("a")));
    }

    #[test]
    fn n_undos_restore_pre_first_action_state() {
        let mut scene = Scene::new();
        scene.append(item("a"));
        let original = scene.clone();

        let mut history = History::default();
        for step in 0..10 {
            history.push(&scene);
            scene.get_mut(ItemId::intern("a")).unwrap().cx = 0.1 * step as f32;
        }
        for _ in 0..10 {
            assert!(history.undo(&mut scene));
        }
        assert_eq!(scene, original);
        assert!(!history.can_undo());
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let mut scene = Scene::new();
        scene.append(item("a"));

        let mut history = History::new(3);
        for step in 0..5 {
            history.push(&scene);
            scene.get_mut(ItemId::intern("a")).unwrap().cx = step as f32;
        }
        assert_eq!(history.len(), 3);

        // Deepest surviving snapshot is from step 2 (cx = 1.0 pushed at step 2)
        while history.undo(&mut scene) {}
        assert_eq!(scene.get(ItemId::intern("a")).unwrap().cx, 1.0);
    }

    #[test]
    fn undo_on_empty_stack_is_noop() {
        let mut scene = Scene::new();
        scene.append(item("a"));
        let before = scene.clone();

        let mut history = History::default();
        assert!(!history.undo(&mut scene));
        assert_eq!(scene, before);
    }
}
