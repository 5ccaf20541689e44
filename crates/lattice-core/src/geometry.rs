//! Plain geometry value types consumed and produced by the layout engines.
//!
//! All values are in logical pixels. None of these types carry any notion of
//! ownership; they are copied freely between caller arrays and engine scratch.

use glam::Vec2;

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    /// Unbounded size, the default upper limit for item max sizes.
    pub const INFINITE: Size = Size {
        width: f32::INFINITY,
        height: f32::INFINITY,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Get the size as Vec2.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }
}

impl From<Vec2> for Size {
    fn from(v: Vec2) -> Self {
        Size::new(v.x, v.y)
    }
}

/// A position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a rect with position and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rect from an origin and a size.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Shrink the rect by the given insets. Extents never go negative.
    pub fn inset_by(&self, insets: Insets) -> Rect {
        Rect::new(
            self.x + insets.left,
            self.y + insets.top,
            (self.width - insets.horizontal()).max(0.0),
            (self.height - insets.vertical()).max(0.0),
        )
    }

    /// Round the edges to whole pixels.
    ///
    /// Edges are rounded rather than the extents so that two siblings sharing an
    /// edge before snapping still share it afterwards.
    pub fn snapped(&self) -> Rect {
        let x = self.x.round();
        let y = self.y.round();
        let x2 = (self.x + self.width).round();
        let y2 = (self.y + self.height).round();
        Rect::new(x, y, x2 - x, y2 - y)
    }

    /// Mirror the rect horizontally inside a region starting at `origin_x`
    /// with the given width.
    pub fn mirrored_x(&self, origin_x: f32, region_width: f32) -> Rect {
        let local = self.x - origin_x;
        Rect::new(
            origin_x + region_width - local - self.width,
            self.y,
            self.width,
            self.height,
        )
    }
}

/// Snap a rect's edges to whole pixels. See [`Rect::snapped`].
pub fn snap_rect(rect: Rect) -> Rect {
    rect.snapped()
}

/// Edge insets (padding, margins, safe areas).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self { top, left, bottom, right }
    }

    /// Create uniform insets.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Create symmetric insets.
    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Total horizontal inset.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical inset.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Per-edge maximum.
    pub fn max(self, other: Insets) -> Insets {
        Insets::new(
            self.top.max(other.top),
            self.left.max(other.left),
            self.bottom.max(other.bottom),
            self.right.max(other.right),
        )
    }
}

/// Clamp an extent between a minimum and maximum. When the bounds cross, the
/// minimum wins.
pub fn clamp_extent(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_edges_not_extents() {
        let a = Rect::new(0.4, 0.0, 10.3, 5.0);
        let b = Rect::new(10.7, 0.0, 10.3, 5.0);

        let sa = a.snapped();
        let sb = b.snapped();

        assert_eq!(sa.x, 0.0);
        assert_eq!(sa.width, 11.0);
        assert_eq!(sb.x, 11.0);
        // Siblings that touched before snapping still touch.
        assert_eq!(sa.right(), sb.x);
    }

    #[test]
    fn test_inset_never_negative() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).inset_by(Insets::uniform(8.0));
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
        assert_eq!(r.x, 8.0);
    }

    #[test]
    fn test_clamp_min_wins() {
        assert_eq!(clamp_extent(50.0, 10.0, 40.0), 40.0);
        assert_eq!(clamp_extent(5.0, 10.0, 40.0), 10.0);
        assert_eq!(clamp_extent(50.0, 60.0, 40.0), 60.0);
    }

    #[test]
    fn test_mirror() {
        let r = Rect::new(10.0, 0.0, 20.0, 5.0).mirrored_x(0.0, 100.0);
        assert_eq!(r.x, 70.0);
        assert_eq!(r.width, 20.0);
    }

    #[test]
    fn test_insets_max() {
        let m = Insets::new(1.0, 10.0, 3.0, 0.0).max(Insets::new(44.0, 0.0, 34.0, 0.0));
        assert_eq!(m, Insets::new(44.0, 10.0, 34.0, 0.0));
    }

    #[test]
    fn test_vec2_interop() {
        let s: Size = Vec2::new(3.0, 4.0).into();
        assert_eq!(s, Size::new(3.0, 4.0));
        assert_eq!(s.to_vec2(), Vec2::new(3.0, 4.0));
    }
}
