//! Built-in widgets.
//!
//! Leaves own their interaction state and fire user callbacks on edges.
//! Containers own nothing but layout parameters; their children live in the
//! tree.

pub mod anchor;
pub mod border;
pub mod button;
pub mod checkbox;
pub mod container;
pub mod editor;
pub mod flex;
pub mod label;
pub mod list;
pub mod radio;
pub mod scrollbar;
pub mod slider;
pub mod switch;
pub mod text;

/// At most one callback per event kind; registering again replaces it.
pub(crate) type Handler<W, T> = Option<Box<dyn FnMut(&mut W, T)>>;

/// Invokes the handler stored in `slot(widget)`, giving it the widget.
///
/// The handler is moved out for the call, so it can reconfigure the
/// widget freely; a handler registered during the call wins.
pub(crate) fn fire<W, T>(widget: &mut W, slot: fn(&mut W) -> &mut Handler<W, T>, value: T) {
    let Some(mut f) = slot(widget).take() else { return };
    f(widget, value);
    let s = slot(widget);
    if s.is_none() {
        *s = Some(f);
    }
}
