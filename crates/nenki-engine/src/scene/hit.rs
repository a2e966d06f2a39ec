use crate::coords::{Rect, Vec2};

use super::DrawList;

/// Opaque owner of a hit area. The widget layer stores its node key here.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HitTag(pub u64);

/// Pointer-sensitive region recorded alongside draw commands.
///
/// Hit areas move with [`DrawList::translate_since`] exactly like draw
/// commands, so after a frame they are in window space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitArea {
    pub tag: HitTag,
    /// Owner-defined sub-region (e.g. option index).
    pub part: u32,
    pub rect: Rect,
    /// Whether wheel input may target this area.
    pub scroll: bool,
    pub(crate) clip: Option<usize>,
}

impl DrawList {
    /// Records a hit area clipped by the current clip region.
    pub fn push_hit(&mut self, tag: HitTag, part: u32, rect: Rect, scroll: bool) {
        let clip = self.current_clip();
        self.hits.push(HitArea { tag, part, rect, scroll, clip });
    }

    /// Records a hit area beneath every hit recorded after `mark`.
    pub fn insert_hit(&mut self, mark: super::Mark, tag: HitTag, part: u32, rect: Rect, scroll: bool) {
        let clip = self.current_clip();
        let at = mark.hits.min(self.hits.len());
        self.hits.insert(at, HitArea { tag, part, rect, scroll, clip });
    }

    #[inline]
    pub fn hits(&self) -> &[HitArea] {
        &self.hits
    }

    /// Visible part of `hit` after clipping.
    pub fn hit_rect(&self, hit: &HitArea) -> Option<Rect> {
        match self.resolve_clip(hit.clip) {
            None => Some(hit.rect),
            Some(clip) => clip.intersect(hit.rect),
        }
    }

    /// Topmost hit area under `p`. Later recordings are on top.
    pub fn hit_test(&self, p: Vec2) -> Option<&HitArea> {
        self.hits
            .iter()
            .rev()
            .find(|h| self.hit_rect(h).is_some_and(|r| r.contains(p)))
    }

    /// Topmost scroll-accepting hit area under `p`.
    pub fn hit_test_scroll(&self, p: Vec2) -> Option<&HitArea> {
        self.hits
            .iter()
            .rev()
            .filter(|h| h.scroll)
            .find(|h| self.hit_rect(h).is_some_and(|r| r.contains(p)))
    }
}
