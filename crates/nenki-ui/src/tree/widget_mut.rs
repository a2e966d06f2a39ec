use std::ops::{Deref, DerefMut};

use crate::constraints::Edges;
use crate::widget::Widget;
use crate::widgets::anchor::Direction;

use super::{Child, Handle, SizingPolicy, Topology, TreeError, WidgetId, run_hooks};

/// Mutable borrow of one widget together with its place in the tree.
///
/// Derefs to the widget. Widget setters return the widget itself, so a
/// chain ends at the first one; put tree operations first or wrap the
/// setters in [`then`](Self::then):
///
/// ```rust,ignore
/// tree.get_mut(row)?
///     .margin(4.0, 8.0, 4.0, 8.0)
///     .then(|r| {
///         r.set_spacing(6.0);
///     })
///     .append_flex_child(1.0, label)
///     .append_rigid_child(button)
///     .set_cross_align(CrossAlign::Center);
/// ```
///
/// Rejected structural operations are logged and leave the tree unchanged;
/// use [`WidgetTree::try_attach`](super::WidgetTree::try_attach) to observe
/// the error instead.
pub struct WidgetMut<'t, W> {
    id: WidgetId,
    widget: &'t mut W,
    topo: &'t mut Topology,
}

impl<'t, W: Widget> WidgetMut<'t, W> {
    pub(super) fn new(id: WidgetId, widget: &'t mut W, topo: &'t mut Topology) -> Self {
        Self { id, widget, topo }
    }

    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    #[inline]
    pub fn handle(&self) -> Handle<W> {
        Handle::new(self.id)
    }

    /// Sets outer spacing, in dp. Negative values are clamped to zero.
    pub fn margin(&mut self, top: f32, left: f32, bottom: f32, right: f32) -> &mut Self {
        self.topo.set_margin(self.id, Edges::new(top, left, bottom, right));
        self
    }

    pub fn margin_edges(&mut self, margin: Edges) -> &mut Self {
        self.topo.set_margin(self.id, margin);
        self
    }

    /// Soft show/hide. Hidden widgets keep their children and state.
    pub fn update(&mut self, update: bool) -> &mut Self {
        self.topo.set_update(self.id, update);
        self
    }

    pub fn is_update(&self) -> bool {
        self.topo.node(self.id).is_some_and(|n| n.update)
    }

    pub fn is_destroyed(&self) -> bool {
        self.topo.is_destroyed(self.id)
    }

    /// Destroys this widget and its descendants.
    pub fn destroy(&mut self) -> &mut Self {
        run_hooks(self.topo.destroy(self.id));
        self
    }

    pub fn on_destroy(&mut self, hook: impl FnOnce() + 'static) -> &mut Self {
        self.topo.set_on_destroy(self.id, Box::new(hook));
        self
    }

    /// Runs `f` in the middle of a chain.
    pub fn then(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        f(self);
        self
    }

    fn attach(&mut self, child: WidgetId, policy: SizingPolicy) -> &mut Self {
        if let Err(err) = self.topo.attach(self.id, child, policy) {
            log::warn!("attach rejected: {err}");
        }
        self
    }

    /// Attaches `child` with a rigid policy. On single-child containers this
    /// replaces the current child.
    pub fn append_child(&mut self, child: impl Into<WidgetId>) -> &mut Self {
        self.attach(child.into(), SizingPolicy::Rigid)
    }

    pub fn append_rigid_child(&mut self, child: impl Into<WidgetId>) -> &mut Self {
        self.attach(child.into(), SizingPolicy::Rigid)
    }

    pub fn append_flex_child(&mut self, weight: f32, child: impl Into<WidgetId>) -> &mut Self {
        self.attach(child.into(), SizingPolicy::Flexed(weight))
    }

    pub fn append_flex_anchor_child(
        &mut self,
        weight: f32,
        direction: Direction,
        child: impl Into<WidgetId>,
    ) -> &mut Self {
        self.attach(child.into(), SizingPolicy::FlexAnchored(weight, direction))
    }

    pub fn try_append_child(&mut self, child: impl Into<WidgetId>, policy: SizingPolicy) -> Result<(), TreeError> {
        self.topo.attach(self.id, child.into(), policy)
    }

    /// Detaches the child at `index` without destroying it.
    pub fn remove_child_at(&mut self, index: usize) -> Option<WidgetId> {
        self.topo.remove_child_at(self.id, index)
    }

    pub fn remove_child(&mut self, child: impl Into<WidgetId>) -> bool {
        self.topo.remove_child(self.id, child.into())
    }

    pub fn remove_child_all(&mut self) -> &mut Self {
        self.topo.remove_all_children(self.id);
        self
    }

    pub fn child(&self) -> Option<WidgetId> {
        self.topo.children(self.id).first().map(|c| c.id)
    }

    pub fn children(&self) -> &[Child] {
        self.topo.children(self.id)
    }

    pub fn child_count(&self) -> usize {
        self.topo.children(self.id).len()
    }
}

impl<W> Deref for WidgetMut<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.widget
    }
}

impl<W> DerefMut for WidgetMut<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.widget
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::WidgetTree;
    use crate::widgets::anchor::Direction;
    use crate::widgets::flex::RowLayout;
    use crate::widgets::label::Label;

    use super::*;

    #[test]
    fn fluent_chain_configures_widget_and_links() {
        let mut tree = WidgetTree::new();
        let row = tree.insert(RowLayout::new());
        let a = tree.insert(Label::new("a"));
        let b = tree.insert(Label::new("b"));
        let c = tree.insert(Label::new("c"));

        tree.get_mut(row)
            .unwrap()
            .margin(1.0, 2.0, 3.0, -4.0)
            .append_rigid_child(a)
            .append_flex_child(2.0, b)
            .append_flex_anchor_child(1.0, Direction::Center, c);

        assert_eq!(tree.margin(row), Edges::new(1.0, 2.0, 3.0, 0.0));
        let policies: Vec<SizingPolicy> = tree.children(row).iter().map(|c| c.policy).collect();
        assert_eq!(
            policies,
            vec![
                SizingPolicy::Rigid,
                SizingPolicy::Flexed(2.0),
                SizingPolicy::FlexAnchored(1.0, Direction::Center),
            ]
        );
    }

    #[test]
    fn rejected_attach_leaves_tree_unchanged() {
        let mut tree = WidgetTree::new();
        let row = tree.insert(RowLayout::new());
        tree.get_mut(row).unwrap().append_child(row);
        assert_eq!(tree.child_count(row), 0);
    }

    #[test]
    fn deref_reaches_widget_setters() {
        let mut tree = WidgetTree::new();
        let label = tree.insert(Label::new("old"));
        let mut w = tree.get_mut(label).unwrap();
        w.set_text("new");
        w.update(false);
        assert_eq!(tree.get(label).unwrap().text(), "new");
        assert!(!tree.is_update(label));
    }

    #[test]
    fn setters_inside_then_keep_the_chain_going() {
        let mut tree = WidgetTree::new();
        let row = tree.insert(RowLayout::new());
        let a = tree.insert(Label::new("a"));
        let b = tree.insert(Label::new("b"));

        tree.get_mut(row)
            .unwrap()
            .then(|r| {
                r.set_spacing(6.0);
            })
            .append_rigid_child(a)
            .append_rigid_child(b)
            .set_spacing(8.0);

        assert_eq!(tree.child_count(row), 2);
        assert_eq!(tree.get(row).unwrap().spacing(), 8.0);
    }
}
