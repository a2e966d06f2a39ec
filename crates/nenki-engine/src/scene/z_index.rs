/// Z-ordering key for draw items.
///
/// Higher values appear on top of lower values. Items sharing a z value
/// paint in recording order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    pub const BASE: ZIndex = ZIndex(0);
    /// Layer for decorations drawn above regular content (scroll indicators).
    pub const OVERLAY: ZIndex = ZIndex(100);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}
