//! Constraint constructors for common relationships.
//!
//! All builders return required constraints; lower the priority with
//! [`Constraint::with_priority`].

use crate::model::{Attribute, Constraint, Relation, ViewId};

/// Pin an edge of `view` to the same edge of the container, `inset` inward.
///
/// For `Right`, `Trailing` and `Bottom` the constant is negated so a positive
/// inset always moves the view inside the container.
pub fn pin(view: ViewId, attr: Attribute, inset: f32) -> Constraint {
    let constant = if attr.is_far_edge() { -inset } else { inset };
    Constraint::new(view, attr, Relation::Equal, ViewId::SUPERVIEW, attr, 1.0, constant)
}

/// Center `view` on both axes of `container`.
pub fn center_in(view: ViewId, container: ViewId) -> [Constraint; 2] {
    [
        Constraint::new(view, Attribute::CenterX, Relation::Equal, container, Attribute::CenterX, 1.0, 0.0),
        Constraint::new(view, Attribute::CenterY, Relation::Equal, container, Attribute::CenterY, 1.0, 0.0),
    ]
}

/// Place `view2`'s leading edge `spacing` after `view1`'s trailing edge.
pub fn horizontal_spacing(view1: ViewId, view2: ViewId, spacing: f32) -> Constraint {
    Constraint::new(view2, Attribute::Leading, Relation::Equal, view1, Attribute::Trailing, 1.0, spacing)
}

/// Place `view2`'s top edge `spacing` below `view1`'s bottom edge.
pub fn vertical_spacing(view1: ViewId, view2: ViewId, spacing: f32) -> Constraint {
    Constraint::new(view2, Attribute::Top, Relation::Equal, view1, Attribute::Bottom, 1.0, spacing)
}

/// Make an attribute of two views equal.
pub fn align(view1: ViewId, view2: ViewId, attr: Attribute) -> Constraint {
    Constraint::new(view1, attr, Relation::Equal, view2, attr, 1.0, 0.0)
}

/// Give two views the same width and height.
pub fn equal_size(view1: ViewId, view2: ViewId) -> [Constraint; 2] {
    [align(view1, view2, Attribute::Width), align(view1, view2, Attribute::Height)]
}

/// Width = `ratio` * height.
pub fn aspect_ratio(view: ViewId, ratio: f32) -> Constraint {
    Constraint::new(view, Attribute::Width, Relation::Equal, view, Attribute::Height, ratio, 0.0)
}

/// Relate an attribute to a constant, e.g. `width >= 44`.
pub fn fixed(view: ViewId, attr: Attribute, relation: Relation, value: f32) -> Constraint {
    Constraint::new(
        view,
        attr,
        relation,
        ViewId::SUPERVIEW,
        Attribute::NotAnAttribute,
        1.0,
        value,
    )
}
