//! Views, attributes, priorities and constraints.

use lattice_core::{Rect, Size, UserData};

use crate::cassowary::Strength;

pub use crate::cassowary::Relation;

/// Maximum number of views in one constraint layout.
pub const MAX_VIEWS: usize = 64;

/// Maximum number of constraints in one constraint layout.
pub const MAX_CONSTRAINTS: usize = 256;

/// Small-integer view address.
///
/// `ViewId(0)` is the container; `ViewId(n)` addresses `views[n - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewId(pub u8);

impl ViewId {
    pub const SUPERVIEW: ViewId = ViewId(0);

    /// Index into the views slice, or `None` for the container.
    pub fn index(self) -> Option<usize> {
        usize::from(self.0).checked_sub(1)
    }

    /// Id of `views[index]`.
    pub fn of(index: usize) -> Option<ViewId> {
        u8::try_from(index + 1).ok().map(ViewId)
    }
}

/// Box edge or dimension a constraint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    /// Left in left-to-right layouts, right otherwise
    Leading,
    /// Right in left-to-right layouts, left otherwise
    Trailing,
    Width,
    Height,
    CenterX,
    CenterY,
    /// Constant-only side of a constraint
    #[default]
    NotAnAttribute,
}

impl Attribute {
    /// Coefficients of (x, y, width, height) that make up this attribute.
    ///
    /// In right-to-left layouts `Leading` is the negated right edge and
    /// `Trailing` the negated left edge, so a positive constant still moves
    /// inward from the reading-direction edge.
    pub fn coefficients(self, rtl: bool) -> [f32; 4] {
        match self {
            Attribute::Left => [1.0, 0.0, 0.0, 0.0],
            Attribute::Right => [1.0, 0.0, 1.0, 0.0],
            Attribute::Top => [0.0, 1.0, 0.0, 0.0],
            Attribute::Bottom => [0.0, 1.0, 0.0, 1.0],
            Attribute::Leading if rtl => [-1.0, 0.0, -1.0, 0.0],
            Attribute::Leading => [1.0, 0.0, 0.0, 0.0],
            Attribute::Trailing if rtl => [-1.0, 0.0, 0.0, 0.0],
            Attribute::Trailing => [1.0, 0.0, 1.0, 0.0],
            Attribute::Width => [0.0, 0.0, 1.0, 0.0],
            Attribute::Height => [0.0, 0.0, 0.0, 1.0],
            Attribute::CenterX => [1.0, 0.0, 0.5, 0.0],
            Attribute::CenterY => [0.0, 1.0, 0.0, 0.5],
            Attribute::NotAnAttribute => [0.0; 4],
        }
    }

    /// Value of this attribute on a resolved frame.
    pub fn value(self, frame: Rect, rtl: bool) -> f32 {
        let [cx, cy, cw, ch] = self.coefficients(rtl);
        cx * frame.x + cy * frame.y + cw * frame.width + ch * frame.height
    }

    /// Edges measured from the far side, whose pin insets are negated.
    pub fn is_far_edge(self) -> bool {
        matches!(self, Attribute::Right | Attribute::Trailing | Attribute::Bottom)
    }
}

/// Constraint priority in (0, 1001]; 1001 means required.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority(pub f32);

impl Priority {
    pub const REQUIRED: Priority = Priority(1001.0);
    pub const HIGH: Priority = Priority(750.0);
    pub const MEDIUM: Priority = Priority(500.0);
    pub const LOW: Priority = Priority(250.0);
    pub const FITTING_SIZE: Priority = Priority(50.0);

    pub fn is_required(self) -> bool {
        self.0 >= Self::REQUIRED.0
    }

    /// Solver strength. Non-required priorities share a unit weight: they are
    /// ordered by solving one priority tier at a time, never by weight.
    pub fn strength(self) -> Strength {
        if self.is_required() {
            Strength::REQUIRED
        } else {
            Strength::new(1.0)
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::REQUIRED
    }
}

/// Per-axis priority.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisPriority {
    pub horizontal: Priority,
    pub vertical: Priority,
}

impl AxisPriority {
    pub fn uniform(priority: Priority) -> Self {
        Self {
            horizontal: priority,
            vertical: priority,
        }
    }
}

/// A box positioned by the constraint engine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct View {
    /// Natural content size, if the view has one
    pub intrinsic_size: Option<Size>,
    /// Resistance to growing past the intrinsic size
    pub hugging: AxisPriority,
    /// Resistance to shrinking below the intrinsic size
    pub compression: AxisPriority,
    /// Computed frame
    pub frame: Rect,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub user_data: Option<UserData>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            intrinsic_size: None,
            hugging: AxisPriority::uniform(Priority::LOW),
            compression: AxisPriority::uniform(Priority::HIGH),
            frame: Rect::ZERO,
            user_data: None,
        }
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intrinsic_size(mut self, size: Size) -> Self {
        self.intrinsic_size = Some(size);
        self
    }

    pub fn with_hugging(mut self, hugging: AxisPriority) -> Self {
        self.hugging = hugging;
        self
    }

    pub fn with_compression(mut self, compression: AxisPriority) -> Self {
        self.compression = compression;
        self
    }
}

/// `first.first_attr REL multiplier * second.second_attr + constant`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub first: ViewId,
    pub first_attr: Attribute,
    pub relation: Relation,
    pub second: ViewId,
    pub second_attr: Attribute,
    pub multiplier: f32,
    pub constant: f32,
    pub priority: Priority,
    /// Inactive constraints are ignored entirely
    pub active: bool,
}

impl Constraint {
    /// Create a required, active constraint.
    pub fn new(
        first: ViewId,
        first_attr: Attribute,
        relation: Relation,
        second: ViewId,
        second_attr: Attribute,
        multiplier: f32,
        constant: f32,
    ) -> Self {
        Self {
            first,
            first_attr,
            relation,
            second,
            second_attr,
            multiplier,
            constant,
            priority: Priority::REQUIRED,
            active: true,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether both views exist for `view_count` views.
    pub(crate) fn references_valid(&self, view_count: usize) -> bool {
        [self.first, self.second]
            .iter()
            .all(|id| id.index().map_or(true, |i| i < view_count))
    }

    /// Amount by which the relation is violated for the given frames.
    ///
    /// `frame_of` resolves a view id to its frame, the container included.
    pub fn residual(&self, frame_of: impl Fn(ViewId) -> Rect, rtl: bool) -> f32 {
        let lhs = self.first_attr.value(frame_of(self.first), rtl);
        let rhs = self.multiplier * self.second_attr.value(frame_of(self.second), rtl) + self.constant;
        match self.relation {
            Relation::Equal => (lhs - rhs).abs(),
            Relation::LessOrEqual => (lhs - rhs).max(0.0),
            Relation::GreaterOrEqual => (rhs - lhs).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_id_addressing() {
        assert_eq!(ViewId::SUPERVIEW.index(), None);
        assert_eq!(ViewId(3).index(), Some(2));
        assert_eq!(ViewId::of(0), Some(ViewId(1)));
        assert_eq!(ViewId::of(255), None);
    }

    #[test]
    fn test_priority_tiers() {
        assert_eq!(Priority::REQUIRED.0, 1001.0);
        assert_eq!(Priority::HIGH.0, 750.0);
        assert_eq!(Priority::MEDIUM.0, 500.0);
        assert_eq!(Priority::LOW.0, 250.0);
        assert_eq!(Priority::FITTING_SIZE.0, 50.0);
        assert!(Priority::REQUIRED.is_required());
        assert!(!Priority(1000.0).is_required());
    }

    #[test]
    fn test_priority_strength() {
        assert!(Priority::REQUIRED.strength().is_required());
        assert!(!Priority(1000.0).strength().is_required());
        assert_eq!(Priority::HIGH.strength(), Priority::LOW.strength());
        assert_eq!(Priority(-5.0).strength().0, 1.0);
    }

    #[test]
    fn test_attribute_values() {
        let frame = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(Attribute::Right.value(frame, false), 110.0);
        assert_eq!(Attribute::CenterY.value(frame, false), 40.0);
        assert_eq!(Attribute::Leading.value(frame, false), 10.0);
        assert_eq!(Attribute::Leading.value(frame, true), -110.0);
        assert_eq!(Attribute::Trailing.value(frame, true), -10.0);
        assert_eq!(Attribute::NotAnAttribute.value(frame, false), 0.0);
    }

    #[test]
    fn test_residual() {
        let c = Constraint::new(
            ViewId(1),
            Attribute::Width,
            Relation::LessOrEqual,
            ViewId::SUPERVIEW,
            Attribute::NotAnAttribute,
            1.0,
            50.0,
        );
        let wide = |_: ViewId| Rect::new(0.0, 0.0, 80.0, 10.0);
        let narrow = |_: ViewId| Rect::new(0.0, 0.0, 30.0, 10.0);
        assert_eq!(c.residual(wide, false), 30.0);
        assert_eq!(c.residual(narrow, false), 0.0);
    }
}
