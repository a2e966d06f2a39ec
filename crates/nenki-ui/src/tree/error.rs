use thiserror::Error;

use super::WidgetId;

/// Rejected structural operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("widget {0:?} is not in the tree")]
    Stale(WidgetId),
    #[error("widget {0:?} is destroyed")]
    Destroyed(WidgetId),
    #[error("widget {0:?} cannot be attached to itself")]
    SelfAttach(WidgetId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: WidgetId, child: WidgetId },
    #[error("widget {0:?} does not take children")]
    NoChildren(WidgetId),
}
