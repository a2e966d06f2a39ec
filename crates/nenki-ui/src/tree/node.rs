use crate::constraints::Edges;
use crate::widget::ChildCapacity;
use crate::widgets::anchor::Direction;

use super::WidgetId;

/// How a multi-child container sizes one child along its main axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingPolicy {
    /// Exactly the space the child asks for.
    Rigid,
    /// A share of the remaining space proportional to the weight.
    Flexed(f32),
    /// Flexed, then positioned inside its share.
    FlexAnchored(f32, Direction),
}

impl SizingPolicy {
    /// Flex weight, `None` for rigid children.
    #[inline]
    pub fn weight(self) -> Option<f32> {
        match self {
            SizingPolicy::Rigid => None,
            SizingPolicy::Flexed(w) | SizingPolicy::FlexAnchored(w, _) => Some(w),
        }
    }
}

/// One entry of a container's ordered child list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Child {
    pub id: WidgetId,
    pub policy: SizingPolicy,
}

/// Tree bookkeeping kept next to each widget.
pub(crate) struct Node {
    pub(crate) capacity: ChildCapacity,
    /// Monotonic: never goes back to false.
    pub(crate) destroyed: bool,
    /// Soft hide. `false` lays out to nothing.
    pub(crate) update: bool,
    pub(crate) margin: Edges,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<Child>,
    pub(crate) on_destroy: Option<Box<dyn FnOnce()>>,
}

impl Node {
    pub(crate) fn new(capacity: ChildCapacity) -> Self {
        Self {
            capacity,
            destroyed: false,
            update: true,
            margin: Edges::default(),
            parent: None,
            children: Vec::new(),
            on_destroy: None,
        }
    }
}
