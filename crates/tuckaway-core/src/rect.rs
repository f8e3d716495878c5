/// A rectangle in screen coordinates: top-left corner plus size.
///
/// `#[repr(C)]` because it is embedded in the shared state block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Coordinate Windows itself uses to park minimized windows, and the
/// one Tuckaway parks concealed windows at.
pub const PARKED_COORD: i32 = -32000;

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from Win32-style edges.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Whether the rectangle has no area (never captured, or collapsed).
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the rectangle sits at the parking coordinate, meaning it
    /// was captured from a minimized or already concealed window and is
    /// useless as a restore target.
    pub fn is_parked(&self) -> bool {
        self.x <= PARKED_COORD || self.y <= PARKED_COORD
    }
}
