//! Anchor, flex and grid layout engines.
//!
//! Each engine takes a mutable slice of its own item type, a shared
//! [`LayoutContext`] and an engine-specific parameter record, writes a frame
//! into every item and returns a [`LayoutResult`] summary.
//!
//! # Engines
//!
//! 1. **Anchor**: items pinned to container edges, resolved independently
//! 2. **Flex**: single-axis flow with grow/shrink, wrapping and alignment
//! 3. **Grid**: explicit and auto-placed items over sized tracks
//!
//! # Example
//!
//! ```
//! use lattice_layout::flex::{self, FlexItem, FlexLayoutParams};
//! use lattice_layout::{LayoutContext, Size};
//!
//! let mut items = vec![
//!     FlexItem::new(Size::new(50.0, 20.0)).with_grow(1.0),
//!     FlexItem::new(Size::new(50.0, 20.0)),
//! ];
//! let context = LayoutContext::new(Size::new(200.0, 40.0));
//! let result = flex::layout(&mut items, &context, &FlexLayoutParams::row());
//!
//! assert!(result.success);
//! assert_eq!(items[0].frame.width, 150.0);
//! ```

mod align;
pub mod anchor;
pub mod flex;
pub mod grid;

pub use align::{CrossAlign, LinesAlign, MainAlign};
pub use anchor::{Anchor, AnchorItem, AnchorLayoutParams};
pub use flex::{FlexDirection, FlexItem, FlexLayoutParams, FlexLine, FlexLines, FlexWrap};
pub use grid::{GridItem, GridLayoutParams, GridMatrix, TrackSize, GRID_MAX_TRACKS};

pub use lattice_core::{
    any_dirty, clear_all_dirty, DirtyFlag, Insets, LayoutCache, LayoutContext, LayoutItem,
    LayoutResult, Point, Rect, Size, UserData,
};
