//! Auto layout entry points.

use lattice_core::{LayoutContext, LayoutError, LayoutResult, Point, Rect, Size};

use crate::model::{Constraint, View, ViewId, MAX_CONSTRAINTS, MAX_VIEWS};
use crate::solver::{CassowaryStrategy, Strategy};

/// Largest violation still counted as satisfied.
pub const RESIDUAL_TOLERANCE: f32 = 0.01;

/// Auto layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AutoLayoutParams {
    /// Round frames to whole pixels
    pub pixel_snap: bool,
    /// Right-to-left: `Leading`/`Trailing` follow the right edge
    pub rtl: bool,
}

fn check_capacity(views: usize, constraints: usize) -> Result<(), LayoutError> {
    if views > MAX_VIEWS {
        return Err(LayoutError::Capacity {
            what: "views",
            count: views,
            max: MAX_VIEWS,
        });
    }
    if constraints > MAX_CONSTRAINTS {
        return Err(LayoutError::Capacity {
            what: "constraints",
            count: constraints,
            max: MAX_CONSTRAINTS,
        });
    }
    Ok(())
}

/// First view id in `constraint` that does not exist.
fn unknown_view(constraint: &Constraint, view_count: usize) -> Option<ViewId> {
    [constraint.first, constraint.second]
        .into_iter()
        .find(|id| id.index().is_some_and(|i| i >= view_count))
}

/// Solve `constraints` over `views` with the default Cassowary strategy.
pub fn layout(
    views: &mut [View],
    constraints: &[Constraint],
    context: &LayoutContext,
    params: &AutoLayoutParams,
) -> LayoutResult {
    layout_with(&mut CassowaryStrategy, views, constraints, context, params)
}

/// Solve `constraints` over `views` with a caller-supplied strategy.
///
/// Inactive constraints are ignored. Unknown view ids, rejected required
/// constraints or exceeded capacities fail the pass; every constraint left
/// out of the solution or violated by more than [`RESIDUAL_TOLERANCE`] is
/// counted in `unsatisfied_count`.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(views = views.len(), constraints = constraints.len())
)]
pub fn layout_with<S: Strategy + ?Sized>(
    strategy: &mut S,
    views: &mut [View],
    constraints: &[Constraint],
    context: &LayoutContext,
    params: &AutoLayoutParams,
) -> LayoutResult {
    let active = constraints.iter().filter(|c| c.active).count();
    if let Err(err) = check_capacity(views.len(), constraints.len()) {
        tracing::warn!(%err, "auto layout rejected");
        return LayoutResult::failure(active);
    }

    let rtl = params.rtl || context.rtl;
    let snap = params.pixel_snap || context.pixel_snap;
    let container = Rect::from_origin_size(Point::ZERO, context.container);

    let mut unknown = 0;
    let mut valid: Vec<Constraint> = Vec::with_capacity(active);
    for constraint in constraints.iter().filter(|c| c.active) {
        match unknown_view(constraint, views.len()) {
            None => valid.push(*constraint),
            Some(ViewId(id)) => {
                let err = LayoutError::UnknownView { id };
                tracing::warn!(%err, "constraint skipped");
                unknown += 1;
            }
        }
    }

    let solution = strategy.solve(views, &valid, container, rtl);

    let required_rejected = solution
        .rejected
        .iter()
        .filter(|&&i| valid.get(i).is_some_and(|c| c.priority.is_required()))
        .count();

    let frame_of = |id: ViewId| match id.index() {
        None => container,
        Some(i) => solution.frames.get(i).copied().unwrap_or(Rect::ZERO),
    };
    let violated = valid
        .iter()
        .enumerate()
        .filter(|(i, _)| solution.rejected.binary_search(i).is_err())
        .filter(|(_, c)| c.residual(frame_of, rtl) > RESIDUAL_TOLERANCE)
        .count();

    let mut content = Size::ZERO;
    for (view, frame) in views.iter_mut().zip(&solution.frames) {
        let frame = if snap { frame.snapped() } else { *frame };
        view.frame = frame;
        content.width = content.width.max(frame.right());
        content.height = content.height.max(frame.bottom());
    }

    let unsatisfied = unknown + solution.rejected.len() + violated;
    if violated > 0 {
        tracing::debug!(violated, "constraints left unsatisfied");
    }
    tracing::trace!(
        unsatisfied,
        width = content.width,
        height = content.height,
        "auto layout complete"
    );

    LayoutResult {
        content_size: content,
        success: unknown == 0 && required_rejected == 0,
        line_count: 0,
        unsatisfied_count: unsatisfied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{aspect_ratio, center_in, equal_size, fixed, horizontal_spacing, pin, vertical_spacing};
    use crate::model::{Attribute, Priority, Relation};
    use crate::solver::Solution;

    fn ctx(width: f32, height: f32) -> LayoutContext {
        LayoutContext::new(Size::new(width, height))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_required_beats_low_priority() {
        let mut views = vec![View::new()];
        let constraints = [
            fixed(ViewId(1), Attribute::Width, Relation::Equal, 100.0),
            fixed(ViewId(1), Attribute::Width, Relation::Equal, 200.0).with_priority(Priority::LOW),
        ];

        let result = layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());

        assert!(result.success);
        assert!(approx(views[0].frame.width, 100.0));
        assert_eq!(result.unsatisfied_count, 1);
    }

    #[test]
    fn test_scaled_medium_cannot_beat_high() {
        let mut views = vec![View::new(), View::new()];
        let constraints = [
            fixed(ViewId(1), Attribute::Width, Relation::Equal, 100.0).with_priority(Priority::HIGH),
            Constraint::new(ViewId(2), Attribute::Width, Relation::Equal, ViewId(1), Attribute::Width, 200.0, 0.0)
                .with_priority(Priority::MEDIUM),
            fixed(ViewId(2), Attribute::Width, Relation::Equal, 0.0),
        ];

        let result = layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());

        assert!(result.success);
        assert!(approx(views[0].frame.width, 100.0));
        assert!(approx(views[1].frame.width, 0.0));
        assert_eq!(result.unsatisfied_count, 1);
    }

    #[test]
    fn test_pin_all_edges() {
        let v = ViewId(1);
        let mut views = vec![View::new()];
        let constraints = [
            pin(v, Attribute::Left, 10.0),
            pin(v, Attribute::Top, 10.0),
            pin(v, Attribute::Right, 10.0),
            pin(v, Attribute::Bottom, 10.0),
        ];

        let result = layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());

        assert!(result.success);
        assert_eq!(result.unsatisfied_count, 0);
        assert_eq!(views[0].frame, Rect::new(10.0, 10.0, 280.0, 180.0));
        assert_eq!(result.content_size, Size::new(290.0, 190.0));
    }

    #[test]
    fn test_center_with_intrinsic_size() {
        let mut views = vec![View::new().with_intrinsic_size(Size::new(100.0, 40.0))];
        let constraints = center_in(ViewId(1), ViewId::SUPERVIEW);

        layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());

        assert_eq!(views[0].frame, Rect::new(100.0, 80.0, 100.0, 40.0));
    }

    #[test]
    fn test_horizontal_chain() {
        let (a, b) = (ViewId(1), ViewId(2));
        let mut views = vec![
            View::new().with_intrinsic_size(Size::new(50.0, 20.0)),
            View::new().with_intrinsic_size(Size::new(30.0, 20.0)),
        ];
        let constraints = [
            pin(a, Attribute::Leading, 10.0),
            pin(a, Attribute::Top, 0.0),
            horizontal_spacing(a, b, 8.0),
            vertical_spacing(a, b, 4.0),
        ];

        layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());
        assert_eq!(views[0].frame, Rect::new(10.0, 0.0, 50.0, 20.0));
        assert_eq!(views[1].frame, Rect::new(68.0, 24.0, 30.0, 20.0));

        let rtl = AutoLayoutParams { rtl: true, ..Default::default() };
        layout(&mut views, &constraints, &ctx(300.0, 200.0), &rtl);
        assert!(approx(views[0].frame.x, 240.0));
        assert!(approx(views[1].frame.x, 202.0));
    }

    #[test]
    fn test_conflicting_required_fails() {
        let mut views = vec![View::new()];
        let constraints = [
            fixed(ViewId(1), Attribute::Width, Relation::Equal, 100.0),
            fixed(ViewId(1), Attribute::Width, Relation::Equal, 200.0),
        ];

        let result = layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());

        assert!(!result.success);
        assert_eq!(result.unsatisfied_count, 1);
        assert!(approx(views[0].frame.width, 100.0));
    }

    #[test]
    fn test_inactive_constraints_ignored() {
        let mut views = vec![View::new()];
        let constraints = [
            fixed(ViewId(1), Attribute::Width, Relation::Equal, 100.0),
            fixed(ViewId(1), Attribute::Width, Relation::Equal, 200.0).inactive(),
        ];

        let result = layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());

        assert!(result.success);
        assert_eq!(result.unsatisfied_count, 0);
    }

    #[test]
    fn test_unknown_view_fails() {
        let mut views = vec![View::new()];
        let constraints = [align_to_missing()];

        let result = layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());

        assert!(!result.success);
        assert_eq!(result.unsatisfied_count, 1);
    }

    fn align_to_missing() -> Constraint {
        crate::builders::align(ViewId(1), ViewId(9), Attribute::Left)
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut views = vec![View::new(); MAX_VIEWS + 1];
        let result = layout(&mut views, &[], &ctx(300.0, 200.0), &AutoLayoutParams::default());
        assert!(!result.success);

        let mut views = vec![View::new()];
        let constraints = vec![pin(ViewId(1), Attribute::Left, 0.0); MAX_CONSTRAINTS + 1];
        let result = layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());
        assert!(!result.success);
        assert_eq!(result.unsatisfied_count, MAX_CONSTRAINTS + 1);
    }

    #[test]
    fn test_aspect_ratio_and_equal_size() {
        let (a, b) = (ViewId(1), ViewId(2));
        let mut views = vec![View::new(), View::new()];
        let mut constraints = vec![
            fixed(a, Attribute::Width, Relation::Equal, 120.0),
            aspect_ratio(a, 2.0),
        ];
        constraints.extend(equal_size(b, a));

        let result = layout(&mut views, &constraints, &ctx(300.0, 200.0), &AutoLayoutParams::default());

        assert!(result.success);
        assert!(approx(views[0].frame.height, 60.0));
        assert!(approx(views[1].frame.width, 120.0));
        assert!(approx(views[1].frame.height, 60.0));
    }

    #[test]
    fn test_pixel_snap() {
        let mut views = vec![View::new().with_intrinsic_size(Size::new(20.0, 20.0))];
        let constraints = [pin(ViewId(1), Attribute::Left, 10.4), pin(ViewId(1), Attribute::Top, 0.6)];
        let params = AutoLayoutParams { pixel_snap: true, ..Default::default() };

        layout(&mut views, &constraints, &ctx(300.0, 200.0), &params);

        assert_eq!(views[0].frame, Rect::new(10.0, 1.0, 20.0, 20.0));
    }

    #[test]
    fn test_empty_input() {
        let result = layout(&mut [], &[], &ctx(0.0, 0.0), &AutoLayoutParams::default());
        assert!(result.success);
        assert_eq!(result.content_size, Size::ZERO);
        assert_eq!(result.unsatisfied_count, 0);
    }

    /// Places every view at a fixed frame and rejects nothing.
    struct Fixed(Rect);

    impl Strategy for Fixed {
        fn solve(&mut self, views: &[View], _: &[Constraint], _: Rect, _: bool) -> Solution {
            Solution {
                frames: vec![self.0; views.len()],
                rejected: Vec::new(),
            }
        }
    }

    #[test]
    fn test_custom_strategy_residuals_counted() {
        let mut views = vec![View::new()];
        let constraints = [
            fixed(ViewId(1), Attribute::Width, Relation::Equal, 50.0),
            fixed(ViewId(1), Attribute::Height, Relation::GreaterOrEqual, 10.0),
        ];
        let mut strategy = Fixed(Rect::new(0.0, 0.0, 40.0, 40.0));

        let result = layout_with(
            &mut strategy,
            &mut views,
            &constraints,
            &ctx(300.0, 200.0),
            &AutoLayoutParams::default(),
        );

        assert!(result.success);
        assert_eq!(result.unsatisfied_count, 1);
        assert_eq!(views[0].frame, Rect::new(0.0, 0.0, 40.0, 40.0));
    }
}
