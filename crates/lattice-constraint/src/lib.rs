//! Constraint ("auto") layout for the lattice engines.
//!
//! Views are positioned by prioritized linear relations between their edges
//! and dimensions, solved with a Cassowary simplex.
//!
//! # Architecture
//!
//! 1. **Model**: views, attributes, priorities and constraints addressed by `ViewId`
//! 2. **Builders**: constructors for pins, spacing, alignment and sizing
//! 3. **Strategy**: pluggable solver turning constraints into frames
//! 4. **Layout**: validation, unsatisfied counting and frame write-back
//!
//! # Example
//!
//! ```
//! use lattice_constraint::{layout, pin, Attribute, AutoLayoutParams, View, ViewId};
//! use lattice_core::{LayoutContext, Size};
//!
//! let mut views = vec![View::new().with_intrinsic_size(Size::new(80.0, 24.0))];
//! let constraints = [
//!     pin(ViewId(1), Attribute::Left, 16.0),
//!     pin(ViewId(1), Attribute::Bottom, 8.0),
//! ];
//! let context = LayoutContext::new(Size::new(320.0, 240.0));
//!
//! let result = layout(&mut views, &constraints, &context, &AutoLayoutParams::default());
//!
//! assert!(result.success);
//! assert_eq!(views[0].frame.x, 16.0);
//! assert_eq!(views[0].frame.y, 208.0);
//! ```

pub mod cassowary;
mod builders;
mod layout;
mod model;
mod solver;

pub use builders::{align, aspect_ratio, center_in, equal_size, fixed, horizontal_spacing, pin, vertical_spacing};
pub use layout::{layout, layout_with, AutoLayoutParams, RESIDUAL_TOLERANCE};
pub use model::{
    Attribute, AxisPriority, Constraint, Priority, Relation, View, ViewId, MAX_CONSTRAINTS, MAX_VIEWS,
};
pub use solver::{CassowaryStrategy, Solution, Strategy};
