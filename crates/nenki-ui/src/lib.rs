//! Nenki UI: a retained widget tree on top of `nenki-engine`.
//!
//! Widgets live in a [`WidgetTree`](tree::WidgetTree) arena and are
//! composed by attaching children to containers. Every frame the
//! [`AppUi`](app::AppUi) loop lays the tree out from its root, which both
//! measures and records drawing.
//!
//! ```rust,ignore
//! use nenki_ui::prelude::*;
//!
//! let mut app = AppUi::new(UiConfig::default());
//! let tree = app.tree_mut();
//! let column = tree.insert(ColumnLayout::new());
//! let title = tree.insert(Label::new("Hello"));
//! let ok = tree.insert(Button::new("OK"));
//! if let Some(mut c) = tree.get_mut(column) {
//!     c.append_rigid_child(title).append_flex_anchor_child(1.0, Direction::Center, ok);
//! }
//! let root = app.root();
//! if let Some(mut r) = app.tree_mut().get_mut(root) {
//!     r.append_child(column);
//! }
//!
//! // From any thread:
//! let handle = app.handle();
//! handle.run_once(move |cx| {
//!     if let Some(mut l) = cx.tree.get_mut(title) {
//!         l.set_text("Updated");
//!     }
//! });
//!
//! app.run(&mut platform)?;
//! ```

pub mod app;
pub mod constraints;
pub mod context;
pub mod event;
pub mod gesture;
pub mod painter;
pub mod queue;
pub mod registry;
pub mod router;
pub mod tree;
pub mod widget;
pub mod widgets;

pub use app::{AppUi, UiConfig};

/// Everything an application or custom widget usually needs.
pub mod prelude {
    pub use crate::app::{AppUi, UiConfig, UiCx};
    pub use crate::constraints::{Axis, Constraints, Edges};
    pub use crate::context::LayoutCx;
    pub use crate::event::UiEvent;
    pub use crate::queue::UiHandle;
    pub use crate::registry::WidgetRegistry;
    pub use crate::tree::{Handle, SizingPolicy, TreeError, WidgetId, WidgetMut, WidgetTree};
    pub use crate::widget::{ChildCapacity, Dimensions, Widget};
    pub use crate::widgets::{
        anchor::{AnchorLayout, Direction},
        border::Border,
        button::{Button, ButtonStyle},
        checkbox::CheckBox,
        container::ContainerLayout,
        editor::{Editor, EditorStyle},
        flex::{ColumnLayout, CrossAlign, RowLayout},
        label::Label,
        list::{ListLayout, Position},
        radio::{RadioButtons, RadioOption},
        scrollbar::{AnchorStrategy, ScrollbarStyle},
        slider::Slider,
        switch::{Switch, SwitchStyle},
        text::{Alignment, InputHint, TextStyle, Weight, WrapPolicy},
    };

    pub use nenki_engine::coords::{CornerRadii, Rect, Vec2, Viewport};
    pub use nenki_engine::paint::Color;
    pub use nenki_engine::platform::{HeadlessConfig, HeadlessPlatform, Platform};
}
