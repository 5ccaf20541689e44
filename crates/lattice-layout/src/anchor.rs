//! Anchor layout: each item is pinned to edges of the container.
//!
//! Items are resolved independently of each other, so the order of the items
//! slice never affects the result.

use lattice_core::{
    clamp_extent, DirtyFlag, Insets, LayoutContext, LayoutItem, LayoutResult, Point, Rect, Size,
    UserData,
};

bitflags::bitflags! {
    /// Container edges an item is pinned to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Anchor: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
        const CENTER_X = 1 << 4;
        const CENTER_Y = 1 << 5;
        const FILL = Self::LEFT.bits() | Self::RIGHT.bits() | Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::empty()
    }
}

/// An item laid out by the anchor engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorItem {
    /// Intrinsic size
    pub size: Size,
    /// Distance from each pinned container edge
    pub insets: Insets,
    /// Offset applied when centered
    pub center_offset: Point,
    pub min_size: Size,
    pub max_size: Size,
    pub anchors: Anchor,
    /// Suppressed items get a zero frame and are otherwise skipped
    pub gone: bool,
    pub dirty: DirtyFlag,
    /// Computed frame
    pub frame: Rect,
    pub user_data: Option<UserData>,
}

impl Default for AnchorItem {
    fn default() -> Self {
        Self {
            size: Size::ZERO,
            insets: Insets::ZERO,
            center_offset: Point::ZERO,
            min_size: Size::ZERO,
            max_size: Size::INFINITE,
            anchors: Anchor::empty(),
            gone: false,
            dirty: DirtyFlag::ALL,
            frame: Rect::ZERO,
            user_data: None,
        }
    }
}

impl AnchorItem {
    /// Create an item with an intrinsic size and no anchors.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// Pin to the given edges with the given insets.
    pub fn anchored(mut self, anchors: Anchor, insets: Insets) -> Self {
        self.anchors = anchors;
        self.insets = insets;
        self
    }

    pub fn with_limits(mut self, min: Size, max: Size) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }
}

impl LayoutItem for AnchorItem {
    fn dirty(&self) -> DirtyFlag {
        self.dirty
    }

    fn set_dirty(&mut self, flags: DirtyFlag) {
        self.dirty = flags;
    }

    fn is_gone(&self) -> bool {
        self.gone
    }

    fn frame(&self) -> Rect {
        self.frame
    }
}

/// Anchor layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnchorLayoutParams {
    /// Round frames to whole pixels
    pub pixel_snap: bool,
}

/// Per-axis view of an item's anchors.
struct AxisAnchors {
    near: bool,
    far: bool,
    center: bool,
    near_inset: f32,
    far_inset: f32,
    center_offset: f32,
}

/// Resolve one axis: returns (offset from region start, extent).
fn resolve_axis(region: f32, intrinsic: f32, min: f32, max: f32, a: &AxisAnchors) -> (f32, f32) {
    if a.near && a.far {
        let extent = clamp_extent(region - a.near_inset - a.far_inset, min, max);
        return (a.near_inset, extent);
    }
    let extent = clamp_extent(intrinsic, min, max);
    let offset = if a.near {
        a.near_inset
    } else if a.far {
        region - a.far_inset - extent
    } else if a.center {
        (region - extent) / 2.0 + a.center_offset
    } else {
        0.0
    };
    (offset, extent)
}

/// Lay out anchored items inside the context's container.
///
/// The container is inset by the context's effective padding (the safe area
/// when it is respected).
#[tracing::instrument(level = "trace", skip_all, fields(items = items.len()))]
pub fn layout(
    items: &mut [AnchorItem],
    context: &LayoutContext,
    params: &AnchorLayoutParams,
) -> LayoutResult {
    let region = Rect::from_origin_size(Point::ZERO, context.container)
        .inset_by(context.effective_padding(Insets::ZERO));
    let snap = params.pixel_snap || context.pixel_snap;
    let mut content = Size::ZERO;

    for item in items.iter_mut() {
        item.dirty = DirtyFlag::CLEAN;
        if item.gone {
            item.frame = Rect::ZERO;
            continue;
        }

        let horizontal = AxisAnchors {
            near: item.anchors.contains(Anchor::LEFT),
            far: item.anchors.contains(Anchor::RIGHT),
            center: item.anchors.contains(Anchor::CENTER_X),
            near_inset: item.insets.left,
            far_inset: item.insets.right,
            center_offset: item.center_offset.x,
        };
        let vertical = AxisAnchors {
            near: item.anchors.contains(Anchor::TOP),
            far: item.anchors.contains(Anchor::BOTTOM),
            center: item.anchors.contains(Anchor::CENTER_Y),
            near_inset: item.insets.top,
            far_inset: item.insets.bottom,
            center_offset: item.center_offset.y,
        };

        let (x, width) = resolve_axis(
            region.width,
            item.size.width,
            item.min_size.width,
            item.max_size.width,
            &horizontal,
        );
        let (y, height) = resolve_axis(
            region.height,
            item.size.height,
            item.min_size.height,
            item.max_size.height,
            &vertical,
        );

        let mut frame = Rect::new(region.x + x, region.y + y, width, height);
        if context.rtl {
            frame = frame.mirrored_x(region.x, region.width);
        }
        if snap {
            frame = frame.snapped();
        }
        item.frame = frame;

        content.width = content.width.max(frame.right());
        content.height = content.height.max(frame.bottom());
    }

    tracing::trace!(
        width = content.width,
        height = content.height,
        "anchor layout complete"
    );

    LayoutResult {
        content_size: content,
        success: true,
        line_count: 0,
        unsatisfied_count: 0,
    }
}
