//! The scene: an ordered item list plus background and selection.
//!
//! Vec order is z-order, back→front. The whole struct is `Clone`, which is
//! what makes it the unit of history snapshots.

use crate::id::ItemId;
use crate::model::{Color, DUPLICATE_OFFSET_FRAC, Item};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Items in render order; the last element paints on top.
    pub items: Vec<Item>,
    pub background: Color,
    /// Current selection. In-memory only — not part of the saved document.
    #[serde(skip)]
    pub selected: Option<ItemId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self { items: Vec::new(), background: Color::WHITE, selected: None }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Append an item on top of the stack. Ignored if the id is already
    /// present — ids are unique within a scene.
    pub fn append(&mut self, item: Item) {
        if self.index_of(item.id).is_some() {
            log::warn!("scene: dropping append of duplicate id {}", item.id);
            return;
        }
        self.items.push(item);
    }

    /// Remove an item. Clears the selection if the removed item held it.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let idx = self.index_of(id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.items.remove(idx))
    }

    /// Clone an item under a fresh id, offset by a fixed fractional delta,
    /// append it on top and select it. Returns the clone's id.
    pub fn duplicate(&mut self, id: ItemId) -> Option<ItemId> {
        let source = self.get(id)?.clone();
        let mut clone = source;
        clone.id = ItemId::fresh("copy");
        clone.cx += DUPLICATE_OFFSET_FRAC;
        clone.cy += DUPLICATE_OFFSET_FRAC;
        let clone_id = clone.id;
        self.items.push(clone);
        self.selected = Some(clone_id);
        Some(clone_id)
    }

    pub fn select(&mut self, id: ItemId) {
        if self.index_of(id).is_some() {
            self.selected = Some(id);
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.get(self.selected?)
    }

    /// Items from top to bottom — the order hit testing wants.
    pub fn iter_front_to_back(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().rev()
    }
}
