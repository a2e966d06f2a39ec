use crate::coords::{Rect, Vec2};

use super::{DrawCmd, HitArea, ZIndex};

/// A single draw item: z layer + command + clip reference.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub z: ZIndex,
    pub cmd: DrawCmd,
    pub(crate) clip: Option<usize>,
}

/// One scissor region. Parents are resolved lazily so a region keeps its
/// own coordinate space until its owner is positioned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ClipNode {
    pub(crate) rect: Rect,
    pub(crate) parent: Option<usize>,
}

/// Recording position inside a [`DrawList`].
///
/// Everything recorded after a mark can be moved with
/// [`DrawList::translate_since`] or dropped with [`DrawList::truncate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub(crate) items: usize,
    pub(crate) hits: usize,
    pub(crate) clips: usize,
}

/// Output cut out of a [`DrawList`] by [`DrawList::detach`].
///
/// Put it back with [`DrawList::splice`], or drop it to discard it.
#[derive(Debug, Default, Clone)]
pub struct Recording {
    items: Vec<DrawItem>,
    hits: Vec<HitArea>,
    clips: Vec<ClipNode>,
    /// Clip count at the detach point; indices below it are enclosing regions.
    base: usize,
}

impl Recording {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.hits.is_empty() && self.clips.is_empty()
    }
}

/// Recorded draw stream for one frame.
///
/// Widgets record in their own local space. A container lays a child out,
/// then calls [`translate_since`](Self::translate_since) with the mark it
/// took before the child ran to move the child's output into place. Clip
/// regions and hit areas recorded by the child move with it.
///
/// ```ignore
/// let mark = list.mark();
/// // ... child records at its own origin ...
/// list.translate_since(mark, Vec2::new(0.0, y));
/// ```
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    items: Vec<DrawItem>,
    pub(crate) hits: Vec<HitArea>,
    pub(crate) clips: Vec<ClipNode>,
    clip_stack: Vec<usize>,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears everything recorded. Keeps allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
        self.hits.clear();
        self.clips.clear();
        self.clip_stack.clear();
        self.sorted_indices.clear();
        self.sorted_dirty = true;
    }

    /// Returns items in recording order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.hits.is_empty()
    }

    /// Pushes a draw command; it inherits the current clip region.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        self.items.push(DrawItem { z, cmd, clip: self.clip_stack.last().copied() });
        self.sorted_dirty = true;
    }

    /// Inserts a draw command at `mark`, so it paints before anything
    /// recorded after the mark on the same z layer.
    pub fn insert(&mut self, mark: Mark, z: ZIndex, cmd: DrawCmd) {
        let at = mark.items.min(self.items.len());
        self.items.insert(at, DrawItem { z, cmd, clip: self.clip_stack.last().copied() });
        self.sorted_dirty = true;
    }

    /// Begins a scissor region in the current local space.
    ///
    /// Calls must be balanced with [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        let parent = self.clip_stack.last().copied();
        self.clips.push(ClipNode { rect, parent });
        self.clip_stack.push(self.clips.len() - 1);
    }

    /// Ends the most recent scissor region.
    ///
    /// # Panics
    /// Panics (debug only) if called without a matching `push_clip`.
    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    /// Current recording position.
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark { items: self.items.len(), hits: self.hits.len(), clips: self.clips.len() }
    }

    /// Moves every command, hit area and clip region recorded since `mark`.
    pub fn translate_since(&mut self, mark: Mark, by: Vec2) {
        let end = self.mark();
        self.translate_range(mark, end, by);
    }

    /// Moves what was recorded between two marks. Containers use this to
    /// place each child once all siblings are measured.
    pub fn translate_range(&mut self, from: Mark, to: Mark, by: Vec2) {
        if by == Vec2::ZERO {
            return;
        }
        let items = from.items.min(self.items.len())..to.items.min(self.items.len());
        for item in &mut self.items[items] {
            item.cmd.translate(by);
        }
        let hits = from.hits.min(self.hits.len())..to.hits.min(self.hits.len());
        for hit in &mut self.hits[hits] {
            hit.rect = hit.rect.translate(by);
        }
        let clips = from.clips.min(self.clips.len())..to.clips.min(self.clips.len());
        for clip in &mut self.clips[clips] {
            clip.rect = clip.rect.translate(by);
        }
    }

    /// Drops everything recorded since `mark`. Used when a container
    /// measures a child it ends up not showing.
    pub fn truncate(&mut self, mark: Mark) {
        debug_assert!(
            self.clip_stack.iter().all(|&c| c < mark.clips),
            "truncate would drop an open clip region"
        );
        self.items.truncate(mark.items);
        self.hits.truncate(mark.hits);
        self.clips.truncate(mark.clips);
        self.sorted_dirty = true;
    }

    /// Cuts out everything recorded since `mark`.
    ///
    /// Lets a container record children in one order and emit them in
    /// another. Clip regions that enclosed the cut output must still exist
    /// when it is spliced back.
    pub fn detach(&mut self, mark: Mark) -> Recording {
        debug_assert!(
            self.clip_stack.iter().all(|&c| c < mark.clips),
            "detach would cut an open clip region"
        );
        let base = mark.clips.min(self.clips.len());
        let rec = Recording {
            items: self.items.split_off(mark.items.min(self.items.len())),
            hits: self.hits.split_off(mark.hits.min(self.hits.len())),
            clips: self.clips.split_off(base),
            base,
        };
        self.sorted_dirty = true;
        rec
    }

    /// Appends detached output at the current position, rebasing the clip
    /// regions it recorded itself.
    pub fn splice(&mut self, rec: Recording) {
        let from = rec.base;
        let to = self.clips.len();
        let rebase = move |clip: Option<usize>| clip.map(|i| if i >= from { i - from + to } else { i });

        self.clips.extend(rec.clips.into_iter().map(|c| ClipNode { parent: rebase(c.parent), ..c }));
        self.items.extend(rec.items.into_iter().map(|item| DrawItem { clip: rebase(item.clip), ..item }));
        self.hits.extend(rec.hits.into_iter().map(|hit| HitArea { clip: rebase(hit.clip), ..hit }));
        self.sorted_dirty = true;
    }

    /// Effective scissor rect of `item`, intersected with every enclosing
    /// region. `None` = unclipped.
    pub fn clip_rect(&self, item: &DrawItem) -> Option<Rect> {
        self.resolve_clip(item.clip)
    }

    pub(crate) fn resolve_clip(&self, clip: Option<usize>) -> Option<Rect> {
        let mut idx = clip?;
        let mut rect = self.clips.get(idx)?.rect;
        while let Some(parent) = self.clips.get(idx).and_then(|c| c.parent) {
            let Some(node) = self.clips.get(parent) else { break };
            // Disjoint regions collapse to an empty rect so renderers skip the draw.
            rect = node.rect.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
            idx = parent;
        }
        Some(rect)
    }

    #[inline]
    pub(crate) fn current_clip(&self) -> Option<usize> {
        self.clip_stack.last().copied()
    }

    /// Returns indices into `items` in paint order (back-to-front).
    ///
    /// This buffer is owned by `DrawList` and reused across frames.
    pub fn indices_in_paint_order(&mut self) -> &[usize] {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        &self.sorted_indices
    }

    /// Iterates items in paint order without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable sort keeps recording order inside a z layer.
        let items = &self.items;
        self.sorted_indices.sort_by_key(|&i| items[i].z);

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::scene::RectCmd;

    fn rect_of(item: &DrawItem) -> Rect {
        match &item.cmd {
            DrawCmd::Rect(RectCmd { rect, .. }) => *rect,
            other => panic!("unexpected command {other:?}"),
        }
    }

    // ── translate_since ───────────────────────────────────────────────────

    #[test]
    fn translate_moves_only_recent_items() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK);
        let mark = list.mark();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK);
        list.translate_since(mark, Vec2::new(10.0, 20.0));

        assert_eq!(rect_of(&list.items()[0]).origin, Vec2::ZERO);
        assert_eq!(rect_of(&list.items()[1]).origin, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn translate_range_leaves_later_siblings() {
        let mut list = DrawList::new();
        let a = list.mark();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        let b = list.mark();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        list.translate_range(a, b, Vec2::new(0.0, 7.0));
        assert_eq!(rect_of(&list.items()[0]).origin, Vec2::new(0.0, 7.0));
        assert_eq!(rect_of(&list.items()[1]).origin, Vec2::ZERO);
    }

    #[test]
    fn nested_translation_accumulates() {
        let mut list = DrawList::new();
        let outer = list.mark();
        let inner = list.mark();
        list.push_rect(ZIndex::BASE, Rect::new(1.0, 1.0, 2.0, 2.0), Color::WHITE);
        list.translate_since(inner, Vec2::new(3.0, 0.0));
        list.translate_since(outer, Vec2::new(0.0, 4.0));
        assert_eq!(rect_of(&list.items()[0]).origin, Vec2::new(4.0, 5.0));
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn child_clip_moves_with_child_but_parent_clip_stays() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mark = list.mark();
        list.push_clip(Rect::new(0.0, 0.0, 50.0, 50.0));
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK);
        list.pop_clip();
        list.translate_since(mark, Vec2::new(80.0, 0.0));
        list.pop_clip();

        let clip = list.clip_rect(&list.items()[0]);
        assert_eq!(clip, Some(Rect::new(80.0, 0.0, 20.0, 50.0)));
    }

    #[test]
    fn disjoint_clips_resolve_to_empty() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.push_clip(Rect::new(20.0, 20.0, 10.0, 10.0));
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        list.pop_clip();
        list.pop_clip();
        let clip = list.clip_rect(&list.items()[0]);
        assert!(clip.is_some_and(|r| r.is_empty()));
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn insert_paints_before_later_items() {
        let mut list = DrawList::new();
        let mark = list.mark();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        list.insert(mark, ZIndex::BASE, DrawCmd::Rect(RectCmd {
            rect: Rect::new(0.0, 0.0, 9.0, 9.0),
            color: Color::WHITE,
        }));
        let order: Vec<f32> = list.iter_in_paint_order().map(|i| rect_of(i).size.x).collect();
        assert_eq!(order, vec![9.0, 1.0]);
    }

    #[test]
    fn overlay_layer_paints_last() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex::OVERLAY, Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 2.0, 2.0), Color::BLACK);
        assert_eq!(list.indices_in_paint_order(), &[1, 0]);
    }

    #[test]
    fn truncate_discards_recent_output() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        let mark = list.mark();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        list.push_hit(crate::scene::HitTag(1), 0, Rect::new(0.0, 0.0, 1.0, 1.0), false);
        list.truncate(mark);
        assert_eq!(list.items().len(), 1);
        assert!(list.hits().is_empty());
    }

    // ── detach / splice ───────────────────────────────────────────────────

    #[test]
    fn spliced_output_follows_splice_order() {
        let mut list = DrawList::new();
        let a = list.mark();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        let first = list.detach(a);
        let b = list.mark();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 2.0, 2.0), Color::BLACK);
        let second = list.detach(b);
        assert!(list.items().is_empty());

        list.splice(second);
        list.splice(first);

        let sizes: Vec<f32> = list.items().iter().map(|i| rect_of(i).size.x).collect();
        assert_eq!(sizes, vec![2.0, 1.0]);
    }

    #[test]
    fn splice_rebases_inner_clips_and_keeps_outer_ones() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));

        let a = list.mark();
        list.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 50.0, 50.0), Color::BLACK);
        list.pop_clip();
        let first = list.detach(a);

        let b = list.mark();
        list.push_clip(Rect::new(0.0, 0.0, 20.0, 20.0));
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 50.0, 50.0), Color::BLACK);
        list.pop_clip();
        list.push_rect(ZIndex::BASE, Rect::new(0.0, 0.0, 200.0, 200.0), Color::BLACK);
        let second = list.detach(b);

        list.splice(second);
        let at = list.mark();
        list.splice(first);
        list.translate_since(at, Vec2::new(0.0, 95.0));
        list.pop_clip();

        let clips: Vec<Option<Rect>> = list.items().iter().map(|i| list.clip_rect(i)).collect();
        assert_eq!(
            clips,
            vec![
                Some(Rect::new(0.0, 0.0, 20.0, 20.0)),
                Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
                Some(Rect::new(0.0, 95.0, 10.0, 5.0)),
            ]
        );
    }
}
