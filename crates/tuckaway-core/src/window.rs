use crate::{Rect, Result};

/// Platform-agnostic window trait.
///
/// Each platform crate (e.g. `tuckaway-windows`) provides its own
/// implementation. Conceal and restore are written against this trait
/// so they can be exercised without a desktop session.
pub trait Window {
    /// Opaque identifier (the raw handle value).
    fn id(&self) -> usize;

    /// Returns the window bounding rectangle in screen coordinates.
    fn rect(&self) -> Result<Rect>;

    /// Moves and resizes the window.
    fn set_rect(&self, rect: &Rect) -> Result<()>;

    /// Moves the window without changing its size, activation, or
    /// z-order.
    fn move_to(&self, x: i32, y: i32) -> Result<()>;

    /// Returns the extended style bits.
    fn ex_style(&self) -> u32;

    /// Replaces the extended style bits.
    fn set_ex_style(&self, ex_style: u32) -> Result<()>;

    /// Returns whether the window is currently visible.
    fn is_visible(&self) -> bool;

    /// Shows the window, brings it out of the minimized state, and gives
    /// it input focus.
    fn reveal(&self);
}
