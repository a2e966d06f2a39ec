//! Retained widget tree.
//!
//! Widgets live in a slot map owned by [`WidgetTree`]. Parent/child links,
//! sizing policies, margins and lifecycle flags are tree bookkeeping, so a
//! widget never holds references to other widgets. Everything else refers
//! to nodes by [`WidgetId`] or by a typed [`Handle`].
//!
//! Lifecycle:
//! - `destroy` flags a node and its descendants; it fires each node's
//!   destroy callback once
//! - the parent drops destroyed children the next time it is laid out
//! - `collect_garbage` frees destroyed nodes at the end of the frame

mod error;
mod node;
mod widget_mut;

pub use error::TreeError;
pub use node::{Child, SizingPolicy};
pub use widget_mut::WidgetMut;

pub(crate) use node::Node;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use nenki_engine::scene::HitTag;
use slotmap::{Key, KeyData, SecondaryMap, SlotMap};

use crate::constraints::Edges;
use crate::widget::{ChildCapacity, Widget};

slotmap::new_key_type! {
    /// Stable key of a widget inside a [`WidgetTree`].
    pub struct WidgetId;
}

impl WidgetId {
    #[inline]
    pub(crate) fn to_tag(self) -> HitTag {
        HitTag(self.data().as_ffi())
    }

    #[inline]
    pub(crate) fn from_tag(tag: HitTag) -> Self {
        KeyData::from_ffi(tag.0).into()
    }
}

// ── Handle ────────────────────────────────────────────────────────────────

/// Typed reference to a widget of type `W`.
///
/// Handles are plain keys: `Copy`, `Send`, and never keep a widget alive.
pub struct Handle<W> {
    id: WidgetId,
    _marker: PhantomData<fn() -> W>,
}

impl<W> Handle<W> {
    #[inline]
    pub(crate) fn new(id: WidgetId) -> Self {
        Self { id, _marker: PhantomData }
    }

    #[inline]
    pub fn id(self) -> WidgetId {
        self.id
    }
}

impl<W> Clone for Handle<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for Handle<W> {}

impl<W> PartialEq for Handle<W> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<W> Eq for Handle<W> {}

impl<W> Hash for Handle<W> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<W> fmt::Debug for Handle<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle<{}>({:?})", std::any::type_name::<W>(), self.id)
    }
}

impl<W> From<Handle<W>> for WidgetId {
    fn from(h: Handle<W>) -> WidgetId {
        h.id
    }
}

// ── Topology ──────────────────────────────────────────────────────────────

/// Node bookkeeping, kept apart from widget storage so a widget and the
/// links around it can be borrowed at the same time.
#[derive(Default)]
pub(crate) struct Topology {
    nodes: SecondaryMap<WidgetId, Node>,
}

type DestroyHooks = Vec<Box<dyn FnOnce()>>;

impl Topology {
    #[inline]
    pub(crate) fn node(&self, id: WidgetId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    fn node_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn is_destroyed(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_none_or(|n| n.destroyed)
    }

    pub(crate) fn children(&self, id: WidgetId) -> &[Child] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    fn is_ancestor_or_self(&self, candidate: WidgetId, of: WidgetId) -> bool {
        let mut cur = Some(of);
        // Bounded walk: a corrupted link can never spin forever.
        for _ in 0..=self.nodes.len() {
            match cur {
                Some(id) if id == candidate => return true,
                Some(id) => cur = self.nodes.get(id).and_then(|n| n.parent),
                None => return false,
            }
        }
        true
    }

    pub(crate) fn attach(
        &mut self,
        parent: WidgetId,
        child: WidgetId,
        policy: SizingPolicy,
    ) -> Result<(), TreeError> {
        if parent == child {
            return Err(TreeError::SelfAttach(child));
        }
        let p = self.nodes.get(parent).ok_or(TreeError::Stale(parent))?;
        let c = self.nodes.get(child).ok_or(TreeError::Stale(child))?;
        if p.destroyed {
            return Err(TreeError::Destroyed(parent));
        }
        if c.destroyed {
            return Err(TreeError::Destroyed(child));
        }
        let capacity = p.capacity;
        if capacity == ChildCapacity::None {
            return Err(TreeError::NoChildren(parent));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }

        self.detach(child);
        if capacity == ChildCapacity::One {
            self.remove_all_children(parent);
        }

        if let Some(p) = self.node_mut(parent) {
            p.children.push(Child { id: child, policy });
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    /// Unlinks `child` from its parent. Returns the former parent.
    pub(crate) fn detach(&mut self, child: WidgetId) -> Option<WidgetId> {
        let parent = self.node_mut(child)?.parent.take()?;
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| c.id != child);
        }
        Some(parent)
    }

    pub(crate) fn remove_child_at(&mut self, parent: WidgetId, index: usize) -> Option<WidgetId> {
        let p = self.node_mut(parent)?;
        if index >= p.children.len() {
            return None;
        }
        let removed = p.children.remove(index).id;
        if let Some(c) = self.node_mut(removed) {
            c.parent = None;
        }
        Some(removed)
    }

    pub(crate) fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        let index = self.children(parent).iter().position(|c| c.id == child);
        match index {
            Some(i) => self.remove_child_at(parent, i).is_some(),
            None => false,
        }
    }

    pub(crate) fn remove_all_children(&mut self, parent: WidgetId) -> usize {
        let Some(p) = self.node_mut(parent) else { return 0 };
        let removed = std::mem::take(&mut p.children);
        for c in &removed {
            if let Some(n) = self.node_mut(c.id) {
                n.parent = None;
            }
        }
        removed.len()
    }

    /// Drops destroyed or freed children from `parent`'s list.
    pub(crate) fn prune(&mut self, parent: WidgetId) -> usize {
        let dead: Vec<WidgetId> = self
            .children(parent)
            .iter()
            .filter(|c| self.is_destroyed(c.id))
            .map(|c| c.id)
            .collect();
        if dead.is_empty() {
            return 0;
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| !dead.contains(&c.id));
        }
        for id in &dead {
            if let Some(n) = self.node_mut(*id) {
                n.parent = None;
            }
        }
        dead.len()
    }

    /// Flags `id` and every descendant. Returns the destroy callbacks to run,
    /// in firing order; already-destroyed nodes contribute nothing.
    #[must_use]
    pub(crate) fn destroy(&mut self, id: WidgetId) -> DestroyHooks {
        let mut hooks = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.node_mut(cur) else { continue };
            if node.destroyed {
                continue;
            }
            node.destroyed = true;
            node.update = false;
            if let Some(hook) = node.on_destroy.take() {
                hooks.push(hook);
            }
            stack.extend(node.children.iter().rev().map(|c| c.id));
        }
        hooks
    }

    pub(crate) fn set_on_destroy(&mut self, id: WidgetId, hook: Box<dyn FnOnce()>) -> bool {
        match self.node_mut(id) {
            Some(n) if !n.destroyed => {
                n.on_destroy = Some(hook);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_update(&mut self, id: WidgetId, update: bool) {
        if let Some(n) = self.node_mut(id) {
            // A destroyed node stays hidden.
            n.update = update && !n.destroyed;
        }
    }

    pub(crate) fn set_margin(&mut self, id: WidgetId, margin: Edges) {
        if let Some(n) = self.node_mut(id) {
            n.margin = margin.non_negative();
        }
    }
}

fn run_hooks(hooks: DestroyHooks) {
    for hook in hooks {
        hook();
    }
}

// ── WidgetTree ────────────────────────────────────────────────────────────

/// Owner of every widget and of the links between them.
///
/// Only the loop thread touches a tree. Other threads go through
/// [`UiHandle::run_once`](crate::queue::UiHandle::run_once).
#[derive(Default)]
pub struct WidgetTree {
    /// `None` while the widget is being laid out.
    widgets: SlotMap<WidgetId, Option<Box<dyn Widget>>>,
    topo: Topology,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live or not-yet-collected widgets.
    #[inline]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: impl Into<WidgetId>) -> bool {
        self.widgets.contains_key(id.into())
    }

    /// Adds a detached, visible, not-destroyed widget.
    pub fn insert<W: Widget>(&mut self, widget: W) -> Handle<W> {
        let capacity = widget.capacity();
        let id = self.widgets.insert(Some(Box::new(widget)));
        self.topo.nodes.insert(id, Node::new(capacity));
        Handle::new(id)
    }

    pub fn get<W: Widget>(&self, handle: Handle<W>) -> Option<&W> {
        self.widgets
            .get(handle.id)?
            .as_deref()?
            .as_any()
            .downcast_ref::<W>()
    }

    /// Mutable access plus the fluent tree operations.
    pub fn get_mut<W: Widget>(&mut self, handle: Handle<W>) -> Option<WidgetMut<'_, W>> {
        let Self { widgets, topo } = self;
        let widget = widgets
            .get_mut(handle.id)?
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<W>()?;
        Some(WidgetMut::new(handle.id, widget, topo))
    }

    /// Type-checked handle for an untyped id.
    pub fn handle_of<W: Widget>(&self, id: WidgetId) -> Option<Handle<W>> {
        let widget = self.widgets.get(id)?.as_deref()?;
        widget.as_any().is::<W>().then(|| Handle::new(id))
    }

    /// `true` once destroyed, and for ids no longer in the tree.
    pub fn is_destroyed(&self, id: impl Into<WidgetId>) -> bool {
        self.topo.is_destroyed(id.into())
    }

    /// Destroys `id` and its descendants. Idempotent.
    pub fn destroy(&mut self, id: impl Into<WidgetId>) {
        let id = id.into();
        let hooks = self.topo.destroy(id);
        if !hooks.is_empty() {
            log::debug!("destroy {id:?}: running {} destroy callback(s)", hooks.len());
        }
        run_hooks(hooks);
    }

    /// Registers the callback fired when `id` is first destroyed. Replaces
    /// any earlier one. Ignored for destroyed or missing widgets.
    pub fn set_on_destroy(&mut self, id: impl Into<WidgetId>, hook: impl FnOnce() + 'static) -> bool {
        self.topo.set_on_destroy(id.into(), Box::new(hook))
    }

    pub fn set_update(&mut self, id: impl Into<WidgetId>, update: bool) {
        self.topo.set_update(id.into(), update);
    }

    pub fn is_update(&self, id: impl Into<WidgetId>) -> bool {
        self.topo.node(id.into()).is_some_and(|n| n.update)
    }

    pub fn set_margin(&mut self, id: impl Into<WidgetId>, margin: Edges) {
        self.topo.set_margin(id.into(), margin);
    }

    pub fn margin(&self, id: impl Into<WidgetId>) -> Edges {
        self.topo.node(id.into()).map(|n| n.margin).unwrap_or_default()
    }

    /// Attaches `child` under `parent`, moving it from any previous parent.
    pub fn try_attach(
        &mut self,
        parent: impl Into<WidgetId>,
        child: impl Into<WidgetId>,
        policy: SizingPolicy,
    ) -> Result<(), TreeError> {
        self.topo.attach(parent.into(), child.into(), policy)
    }

    /// Like [`try_attach`](Self::try_attach) with a rigid policy.
    pub fn try_append_child(
        &mut self,
        parent: impl Into<WidgetId>,
        child: impl Into<WidgetId>,
    ) -> Result<(), TreeError> {
        self.try_attach(parent, child, SizingPolicy::Rigid)
    }

    pub fn parent(&self, id: impl Into<WidgetId>) -> Option<WidgetId> {
        self.topo.node(id.into()).and_then(|n| n.parent)
    }

    /// First child, which for single-child containers is the only one.
    pub fn child(&self, parent: impl Into<WidgetId>) -> Option<WidgetId> {
        self.topo.children(parent.into()).first().map(|c| c.id)
    }

    pub fn children(&self, parent: impl Into<WidgetId>) -> &[Child] {
        self.topo.children(parent.into())
    }

    pub fn child_at(&self, parent: impl Into<WidgetId>, index: usize) -> Option<WidgetId> {
        self.topo.children(parent.into()).get(index).map(|c| c.id)
    }

    pub fn child_count(&self, parent: impl Into<WidgetId>) -> usize {
        self.topo.children(parent.into()).len()
    }

    /// Removes the child at `index` without destroying it.
    pub fn remove_child_at(&mut self, parent: impl Into<WidgetId>, index: usize) -> Option<WidgetId> {
        self.topo.remove_child_at(parent.into(), index)
    }

    /// Removes `child` from `parent` without destroying it.
    pub fn remove_child(&mut self, parent: impl Into<WidgetId>, child: impl Into<WidgetId>) -> bool {
        self.topo.remove_child(parent.into(), child.into())
    }

    pub fn remove_all_children(&mut self, parent: impl Into<WidgetId>) -> usize {
        self.topo.remove_all_children(parent.into())
    }

    /// Frees every destroyed widget. Run once per frame after layout.
    pub fn collect_garbage(&mut self) -> usize {
        let dead: Vec<WidgetId> = self
            .topo
            .nodes
            .iter()
            .filter(|(_, n)| n.destroyed)
            .map(|(id, _)| id)
            .collect();
        for id in &dead {
            self.topo.detach(*id);
        }
        for id in &dead {
            self.topo.nodes.remove(*id);
            self.widgets.remove(*id);
        }
        if !dead.is_empty() {
            log::debug!("collected {} destroyed widget(s)", dead.len());
        }
        dead.len()
    }

    // ── layout support ────────────────────────────────────────────────────

    #[inline]
    pub(crate) fn topology(&self) -> &Topology {
        &self.topo
    }

    #[inline]
    pub(crate) fn prune(&mut self, parent: WidgetId) -> usize {
        self.topo.prune(parent)
    }

    /// Takes a widget out for layout. `None` if it is already out.
    #[inline]
    pub(crate) fn take_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.widgets.get_mut(id)?.take()
    }

    #[inline]
    pub(crate) fn restore_widget(&mut self, id: WidgetId, widget: Box<dyn Widget>) {
        if let Some(slot) = self.widgets.get_mut(id) {
            *slot = Some(widget);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::widgets::container::ContainerLayout;
    use crate::widgets::flex::ColumnLayout;
    use crate::widgets::label::Label;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        (count, move || c.set(c.get() + 1))
    }

    // ── destroy ───────────────────────────────────────────────────────────

    #[test]
    fn destroy_is_idempotent() {
        let mut tree = WidgetTree::new();
        let label = tree.insert(Label::new("x"));
        let (fired, hook) = counter();
        tree.set_on_destroy(label, hook);

        tree.destroy(label);
        tree.destroy(label);

        assert_eq!(fired.get(), 1);
        assert!(tree.is_destroyed(label));
    }

    #[test]
    fn destroy_cascades_to_descendants() {
        let mut tree = WidgetTree::new();
        let outer = tree.insert(ColumnLayout::new());
        let inner = tree.insert(ColumnLayout::new());
        let leaf = tree.insert(Label::new("leaf"));
        tree.try_append_child(outer, inner).unwrap();
        tree.try_append_child(inner, leaf).unwrap();
        let (fired, hook) = counter();
        tree.set_on_destroy(leaf, hook);

        tree.destroy(outer);

        assert!(tree.is_destroyed(inner));
        assert!(tree.is_destroyed(leaf));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn destroyed_widget_cannot_be_attached_or_revived() {
        let mut tree = WidgetTree::new();
        let col = tree.insert(ColumnLayout::new());
        let label = tree.insert(Label::new("x"));
        tree.destroy(label);
        tree.set_update(label, true);

        assert_eq!(tree.try_append_child(col, label), Err(TreeError::Destroyed(label.id())));
        assert!(!tree.is_update(label));
    }

    #[test]
    fn garbage_collection_frees_destroyed_subtree() {
        let mut tree = WidgetTree::new();
        let col = tree.insert(ColumnLayout::new());
        let a = tree.insert(Label::new("a"));
        let b = tree.insert(Label::new("b"));
        tree.try_append_child(col, a).unwrap();
        tree.try_append_child(col, b).unwrap();

        tree.destroy(a);
        assert_eq!(tree.collect_garbage(), 1);

        assert!(!tree.contains(a));
        assert!(tree.is_destroyed(a));
        assert_eq!(tree.children(col).len(), 1);
        assert_eq!(tree.child(col), Some(b.id()));
        assert!(tree.get(a).is_none());
    }

    // ── attach ────────────────────────────────────────────────────────────

    #[test]
    fn attaching_an_ancestor_is_rejected() {
        let mut tree = WidgetTree::new();
        let a = tree.insert(ColumnLayout::new());
        let b = tree.insert(ColumnLayout::new());
        let c = tree.insert(ColumnLayout::new());
        tree.try_append_child(a, b).unwrap();
        tree.try_append_child(b, c).unwrap();

        assert_eq!(
            tree.try_append_child(c, a),
            Err(TreeError::Cycle { parent: c.id(), child: a.id() })
        );
        assert_eq!(tree.try_append_child(a, a), Err(TreeError::SelfAttach(a.id())));
        // A cycle attempt leaves the tree intact and destroy still terminates.
        tree.destroy(a);
        assert!(tree.is_destroyed(c));
    }

    #[test]
    fn leaves_reject_children() {
        let mut tree = WidgetTree::new();
        let label = tree.insert(Label::new("x"));
        let other = tree.insert(Label::new("y"));
        assert_eq!(tree.try_append_child(label, other), Err(TreeError::NoChildren(label.id())));
    }

    #[test]
    fn reparenting_detaches_from_previous_container() {
        let mut tree = WidgetTree::new();
        let a = tree.insert(ContainerLayout::new());
        let b = tree.insert(ContainerLayout::new());
        let x = tree.insert(Label::new("x"));

        tree.try_append_child(a, x).unwrap();
        tree.try_append_child(b, x).unwrap();

        assert_eq!(tree.child(a), None);
        assert_eq!(tree.child(b), Some(x.id()));
        assert_eq!(tree.parent(x), Some(b.id()));
        assert!(!tree.is_destroyed(x));
    }

    #[test]
    fn single_child_container_replaces_previous_child() {
        let mut tree = WidgetTree::new();
        let c = tree.insert(ContainerLayout::new());
        let x = tree.insert(Label::new("x"));
        let y = tree.insert(Label::new("y"));
        tree.try_append_child(c, x).unwrap();
        tree.try_append_child(c, y).unwrap();

        assert_eq!(tree.children(c).len(), 1);
        assert_eq!(tree.child(c), Some(y.id()));
        assert_eq!(tree.parent(x), None);
        assert!(!tree.is_destroyed(x));
    }

    // ── removal ───────────────────────────────────────────────────────────

    #[test]
    fn remove_child_at_preserves_order() {
        let mut tree = WidgetTree::new();
        let col = tree.insert(ColumnLayout::new());
        let ids: Vec<WidgetId> = (0..5)
            .map(|i| {
                let l = tree.insert(Label::new(format!("{i}")));
                let policy = if i % 2 == 0 { SizingPolicy::Rigid } else { SizingPolicy::Flexed(i as f32) };
                tree.try_attach(col, l, policy).unwrap();
                l.id()
            })
            .collect();

        let removed = tree.remove_child_at(col, 2);

        assert_eq!(removed, Some(ids[2]));
        let rest: Vec<WidgetId> = tree.children(col).iter().map(|c| c.id).collect();
        assert_eq!(rest, vec![ids[0], ids[1], ids[3], ids[4]]);
        assert_eq!(tree.children(col)[1].policy, SizingPolicy::Flexed(1.0));
        assert_eq!(tree.parent(ids[2]), None);
        assert!(!tree.is_destroyed(ids[2]));
    }

    #[test]
    fn remove_child_by_id_and_out_of_range_index() {
        let mut tree = WidgetTree::new();
        let col = tree.insert(ColumnLayout::new());
        let a = tree.insert(Label::new("a"));
        tree.try_append_child(col, a).unwrap();

        assert_eq!(tree.remove_child_at(col, 9), None);
        assert!(tree.remove_child(col, a));
        assert!(!tree.remove_child(col, a));
        assert_eq!(tree.child_count(col), 0);
    }

    #[test]
    fn typed_access_checks_the_widget_type() {
        let mut tree = WidgetTree::new();
        let label = tree.insert(Label::new("typed"));
        assert_eq!(tree.get(label).map(|l| l.text().to_string()), Some("typed".into()));
        assert!(tree.handle_of::<ColumnLayout>(label.id()).is_none());
        assert!(tree.handle_of::<Label>(label.id()).is_some());
    }
}
