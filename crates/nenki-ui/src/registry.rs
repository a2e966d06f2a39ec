//! Optional string-keyed index of widgets.
//!
//! Apps that want to look widgets up by name own a [`WidgetRegistry`] and
//! pass it around; it is reachable from [`UiCx`](crate::app::UiCx) too.
//! Entries are plain ids, so a destroyed widget simply stops resolving.

use std::collections::HashMap;

use crate::tree::{Handle, WidgetId, WidgetTree};
use crate::widget::Widget;

#[derive(Debug, Default)]
pub struct WidgetRegistry {
    entries: HashMap<String, Vec<Option<WidgetId>>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` under `key`; returns its index within the key.
    pub fn add(&mut self, key: impl Into<String>, id: impl Into<WidgetId>) -> usize {
        let slots = self.entries.entry(key.into()).or_default();
        slots.push(Some(id.into()));
        slots.len() - 1
    }

    /// Every live slot under `key`, in insertion order.
    pub fn get(&self, key: &str) -> Vec<WidgetId> {
        self.entries.get(key).map(|s| s.iter().flatten().copied().collect()).unwrap_or_default()
    }

    pub fn get_at(&self, key: &str, index: usize) -> Option<WidgetId> {
        self.entries.get(key)?.get(index).copied().flatten()
    }

    /// Typed handle for the slot, if it holds a live `W`.
    pub fn get_as<W: Widget>(&self, tree: &WidgetTree, key: &str, index: usize) -> Option<Handle<W>> {
        tree.handle_of(self.get_at(key, index)?)
    }

    /// Drops the whole key.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Clears one slot. Other indices under the key stay valid.
    pub fn remove_at(&mut self, key: &str, index: usize) -> Option<WidgetId> {
        self.entries.get_mut(key)?.get_mut(index)?.take()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
