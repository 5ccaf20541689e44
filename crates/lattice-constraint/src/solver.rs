//! Solving strategies for the constraint engine.
//!
//! A [`Strategy`] turns views and validated constraints into frames. The
//! default [`CassowaryStrategy`] maps every view to four solver variables
//! (x, y, width, height) and the container to constants.

use lattice_core::Rect;

use crate::cassowary::{Expression, LinearConstraint, Relation, Solver, Strength, Variable};
use crate::model::{Attribute, Constraint, Priority, View, ViewId};

/// Solved frames plus the constraints left out of the solution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    /// One frame per view, in view order
    pub frames: Vec<Rect>,
    /// Indices of constraints that could not be added, ascending
    pub rejected: Vec<usize>,
}

/// A constraint solving algorithm.
///
/// `constraints` are active and reference existing views; `container` is the
/// frame of [`ViewId::SUPERVIEW`].
pub trait Strategy {
    fn solve(&mut self, views: &[View], constraints: &[Constraint], container: Rect, rtl: bool) -> Solution;
}

/// Priority of the implicit non-negative width/height constraints.
const NON_NEGATIVE_PRIORITY: Priority = Priority(1000.0);

/// Layout variables for a view.
#[derive(Debug, Clone, Copy)]
struct ViewVars {
    x: Variable,
    y: Variable,
    width: Variable,
    height: Variable,
}

impl ViewVars {
    fn new(solver: &mut Solver) -> Self {
        Self {
            x: solver.new_variable(),
            y: solver.new_variable(),
            width: solver.new_variable(),
            height: solver.new_variable(),
        }
    }

    fn frame(&self, solver: &Solver) -> Rect {
        Rect::new(
            solver.value(self.x) as f32,
            solver.value(self.y) as f32,
            solver.value(self.width) as f32,
            solver.value(self.height) as f32,
        )
    }
}

/// A linear constraint with the priority it was declared at.
struct Soft {
    priority: Priority,
    linear: LinearConstraint,
    /// Caller index; `None` for implicit size constraints
    index: Option<usize>,
}

/// Cassowary simplex with non-required priorities solved as strict tiers.
///
/// Required constraints are added first, in caller order, so when two of them
/// conflict the earlier one wins. Non-required constraints (caller and
/// implicit) are grouped by priority and solved from the highest tier down.
/// After each tier is optimized its achieved errors are pinned as required
/// bounds, so no lower tier can trade them away whatever its multipliers or
/// constraint count. Within a tier, constraints keep caller order and equal
/// weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct CassowaryStrategy;

impl Strategy for CassowaryStrategy {
    fn solve(&mut self, views: &[View], constraints: &[Constraint], container: Rect, rtl: bool) -> Solution {
        let mut base = Solver::new();
        let vars: Vec<ViewVars> = views.iter().map(|_| ViewVars::new(&mut base)).collect();
        let mut rejected = Vec::new();
        let mut implicit = Vec::new();
        for (view, v) in views.iter().zip(&vars) {
            implicit_constraints(view, v, &mut implicit);
        }
        let mut caller = Vec::new();

        for (index, constraint) in constraints.iter().enumerate() {
            let Some(linear) = linearize(constraint, &vars, container, rtl) else {
                rejected.push(index);
                continue;
            };
            if !constraint.priority.is_required() {
                caller.push(Soft {
                    priority: constraint.priority,
                    linear,
                    index: Some(index),
                });
                continue;
            }
            if let Err(err) = base.add_constraint(&linear) {
                tracing::warn!(index, %err, "required constraint rejected");
                rejected.push(index);
            }
        }

        let mut soft = Vec::with_capacity(implicit.len() + caller.len());
        for s in implicit {
            if !s.priority.is_required() {
                soft.push(s);
            } else if let Err(err) = base.add_constraint(&s.linear) {
                tracing::debug!(%err, "implicit size constraint dropped");
            }
        }
        soft.extend(caller);

        // Stable, so insertion order survives inside a tier.
        soft.sort_by(|a, b| b.priority.0.total_cmp(&a.priority.0));

        let mut solved = base.clone();
        let mut start = 0;
        while start < soft.len() {
            let priority = soft[start].priority;
            let end = soft[start..]
                .iter()
                .position(|s| s.priority.0.total_cmp(&priority.0).is_ne())
                .map_or(soft.len(), |n| start + n);
            let tier = &soft[start..end];
            tracing::trace!(priority = priority.0, count = tier.len(), "solving priority tier");

            let mut trial = base.clone();
            let mut accepted = Vec::with_capacity(tier.len());
            for s in tier {
                match trial.add_constraint(&s.linear) {
                    Ok(_) => accepted.push(s),
                    Err(err) => match s.index {
                        Some(index) => {
                            tracing::debug!(index, %err, "optional constraint dropped");
                            rejected.push(index);
                        }
                        None => tracing::debug!(%err, "implicit size constraint dropped"),
                    },
                }
            }
            for s in accepted {
                pin_achieved(&mut base, &trial, &s.linear);
            }

            solved = trial;
            start = end;
        }

        rejected.sort_unstable();
        Solution {
            frames: vars.iter().map(|v| v.frame(&solved)).collect(),
            rejected,
        }
    }
}

/// Add a required bound holding `linear` to the error `solved` achieved for it.
fn pin_achieved(base: &mut Solver, solved: &Solver, linear: &LinearConstraint) {
    let achieved = solved.evaluate(&linear.expression);
    let error = match linear.relation {
        Relation::Equal => achieved,
        Relation::LessOrEqual => achieved.max(0.0),
        Relation::GreaterOrEqual => achieved.min(0.0),
    };
    let expr = linear.expression.clone().with_constant(linear.expression.constant - error);
    if let Err(err) = base.add_constraint(&LinearConstraint::new(expr, linear.relation, Strength::REQUIRED)) {
        tracing::debug!(%err, "tier pin dropped");
    }
}

/// Add `scale * attr(view)` to an expression. Returns `None` for a view
/// outside `vars`.
fn add_attribute(
    expr: &mut Expression,
    view: ViewId,
    attr: Attribute,
    scale: f64,
    vars: &[ViewVars],
    container: Rect,
    rtl: bool,
) -> Option<()> {
    let Some(index) = view.index() else {
        expr.constant += scale * f64::from(attr.value(container, rtl));
        return Some(());
    };
    let v = vars.get(index)?;
    let [cx, cy, cw, ch] = attr.coefficients(rtl);
    for (var, coeff) in [(v.x, cx), (v.y, cy), (v.width, cw), (v.height, ch)] {
        if coeff != 0.0 {
            expr.add_term(var, scale * f64::from(coeff));
        }
    }
    Some(())
}

/// `first.attr - (multiplier * second.attr + constant) REL 0`
fn linearize(constraint: &Constraint, vars: &[ViewVars], container: Rect, rtl: bool) -> Option<LinearConstraint> {
    let mut expr = Expression::from_constant(-f64::from(constraint.constant));
    add_attribute(&mut expr, constraint.first, constraint.first_attr, 1.0, vars, container, rtl)?;
    add_attribute(
        &mut expr,
        constraint.second,
        constraint.second_attr,
        -f64::from(constraint.multiplier),
        vars,
        container,
        rtl,
    )?;
    Some(LinearConstraint::new(expr, constraint.relation, constraint.priority.strength()))
}

/// Non-negative extents, plus hugging and compression around the intrinsic size.
fn implicit_constraints(view: &View, v: &ViewVars, out: &mut Vec<Soft>) {
    let mut push = |priority: Priority, expr: Expression, relation: Relation| {
        out.push(Soft {
            priority,
            linear: LinearConstraint::new(expr, relation, priority.strength()),
            index: None,
        });
    };
    for extent in [v.width, v.height] {
        push(NON_NEGATIVE_PRIORITY, Expression::from_variable(extent), Relation::GreaterOrEqual);
    }

    if let Some(size) = view.intrinsic_size {
        let axes = [
            (v.width, size.width, view.hugging.horizontal, view.compression.horizontal),
            (v.height, size.height, view.hugging.vertical, view.compression.vertical),
        ];
        for (extent, intrinsic, hugging, compression) in axes {
            let expr = Expression::from_variable(extent).with_constant(-f64::from(intrinsic));
            push(hugging, expr.clone(), Relation::LessOrEqual);
            push(compression, expr, Relation::GreaterOrEqual);
        }
    }
}
