//! Cassowary constraint solver implementation.
//!
//! This is an implementation of the Cassowary linear constraint solving algorithm,
//! as described in "The Cassowary Linear Arithmetic Constraint Solving Algorithm"
//! by Greg J. Badros and Alan Borning.
//!
//! Rows and cells are kept in ordered maps keyed by symbol creation order, so
//! entering/leaving choices (and therefore the solution) are deterministic and
//! the simplex pivots follow Bland's rule.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use lattice_core::SolverError;
use smallvec::SmallVec;

/// Tolerance for floating-point comparisons.
const EPSILON: f64 = 1e-8;

/// Pivot budget for a single optimization.
const MAX_ITERATIONS: usize = 10_000;

fn near_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Unique identifier for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum SymbolKind {
    /// An external variable (the actual unknowns we're solving for)
    External,
    /// A slack variable (for inequality constraints)
    Slack,
    /// An error variable (for non-required constraints)
    Error,
    /// A dummy variable (for required equality constraints)
    Dummy,
}

/// Tableau symbol, ordered by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Symbol {
    id: usize,
    kind: SymbolKind,
}

impl Symbol {
    fn is_external(&self) -> bool {
        self.kind == SymbolKind::External
    }

    fn is_dummy(&self) -> bool {
        self.kind == SymbolKind::Dummy
    }

    fn is_pivotable(&self) -> bool {
        matches!(self.kind, SymbolKind::Slack | SymbolKind::Error)
    }
}

/// A linear expression in the form: constant + Σ(coefficient * variable)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub constant: f64,
    terms: SmallVec<[(Variable, f64); 4]>,
}

impl Expression {
    /// Create a constant expression.
    pub fn from_constant(value: f64) -> Self {
        Self {
            constant: value,
            terms: SmallVec::new(),
        }
    }

    /// Create an expression from a single variable.
    pub fn from_variable(var: Variable) -> Self {
        let mut expr = Self::default();
        expr.add_term(var, 1.0);
        expr
    }

    /// Add a term to the expression.
    pub fn add_term(&mut self, var: Variable, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// Builder form of [`Expression::add_term`].
    pub fn with_term(mut self, var: Variable, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// Get an iterator over the terms.
    pub fn terms(&self) -> impl Iterator<Item = &(Variable, f64)> {
        self.terms.iter()
    }
}

/// Constraint strength, used as the objective weight of its error terms.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Strength(pub f64);

impl Strength {
    pub const REQUIRED: Strength = Strength(1_001_001_000.0);

    /// Create a custom strength.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, Self::REQUIRED.0))
    }

    /// Check if this is a required constraint.
    pub fn is_required(&self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}

/// The relation of a constraint (equality or inequality).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

/// `expression REL 0` at a given strength.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub expression: Expression,
    pub relation: Relation,
    pub strength: Strength,
}

impl LinearConstraint {
    /// Create a new constraint.
    pub fn new(expression: Expression, relation: Relation, strength: Strength) -> Self {
        Self {
            expression,
            relation,
            strength,
        }
    }
}

/// Handle for a constraint held by a [`Solver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(usize);

/// A row in the simplex tableau.
#[derive(Debug, Clone, Default)]
struct Row {
    constant: f64,
    cells: BTreeMap<Symbol, f64>,
}

impl Row {
    fn new(constant: f64) -> Self {
        Self {
            constant,
            cells: BTreeMap::new(),
        }
    }

    /// Add to a symbol's coefficient, dropping it when it cancels out.
    fn insert_symbol(&mut self, symbol: Symbol, coefficient: f64) {
        let entry = self.cells.entry(symbol).or_insert(0.0);
        *entry += coefficient;
        if near_zero(*entry) {
            self.cells.remove(&symbol);
        }
    }

    /// Add a multiple of another row.
    fn insert_row(&mut self, other: &Row, coefficient: f64) {
        self.constant += other.constant * coefficient;
        for (&symbol, &c) in &other.cells {
            self.insert_symbol(symbol, c * coefficient);
        }
    }

    fn remove(&mut self, symbol: Symbol) {
        self.cells.remove(&symbol);
    }

    fn reverse_sign(&mut self) {
        self.constant = -self.constant;
        for c in self.cells.values_mut() {
            *c = -*c;
        }
    }

    fn coefficient(&self, symbol: Symbol) -> f64 {
        self.cells.get(&symbol).copied().unwrap_or(0.0)
    }

    /// Solve the row for `symbol`, which must be present.
    fn solve_for(&mut self, symbol: Symbol) {
        let coeff = self.cells.remove(&symbol).unwrap_or(1.0);
        let multiplier = -1.0 / coeff;
        self.constant *= multiplier;
        for c in self.cells.values_mut() {
            *c *= multiplier;
        }
    }

    /// Solve `lhs = row` for `rhs`.
    fn solve_for_symbols(&mut self, lhs: Symbol, rhs: Symbol) {
        self.insert_symbol(lhs, -1.0);
        self.solve_for(rhs);
    }

    /// Substitute a symbol in this row with another row.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        if let Some(coeff) = self.cells.remove(&symbol) {
            self.insert_row(row, coeff);
        }
    }

    fn all_dummies(&self) -> bool {
        self.cells.keys().all(Symbol::is_dummy)
    }
}

/// Marker symbols recorded per constraint.
#[derive(Debug, Clone, Copy)]
struct Tag {
    marker: Symbol,
    other: Option<Symbol>,
}

/// The Cassowary constraint solver.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    /// Counter for generating unique symbol IDs
    symbol_counter: usize,
    /// The objective function row
    objective: Row,
    /// Artificial objective while a row is being made feasible
    artificial: Option<Row>,
    /// The tableau rows, keyed by their basic symbol
    rows: BTreeMap<Symbol, Row>,
    /// External symbol of each variable, in creation order
    var_symbols: IndexMap<Variable, Symbol>,
    /// Marker symbols of each accepted constraint
    constraints: IndexMap<ConstraintId, Tag>,
    /// Counter for constraint IDs
    constraint_counter: usize,
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new variable.
    pub fn new_variable(&mut self) -> Variable {
        let var = Variable(self.var_symbols.len());
        let symbol = self.new_symbol(SymbolKind::External);
        self.var_symbols.insert(var, symbol);
        var
    }

    /// Current value of a variable; 0 for variables that are not basic.
    pub fn value(&self, var: Variable) -> f64 {
        self.var_symbols
            .get(&var)
            .and_then(|symbol| self.rows.get(symbol))
            .map_or(0.0, |row| row.constant)
    }

    /// Value of an expression at the current solution.
    pub fn evaluate(&self, expr: &Expression) -> f64 {
        expr.terms()
            .fold(expr.constant, |acc, &(var, coeff)| acc + coeff * self.value(var))
    }

    /// Number of accepted constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Add a constraint and re-optimize.
    ///
    /// On any error the solver is left exactly as it was before the call.
    pub fn add_constraint(&mut self, constraint: &LinearConstraint) -> Result<ConstraintId, SolverError> {
        let snapshot = self.clone();
        let result = self.try_add_constraint(constraint);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn try_add_constraint(&mut self, constraint: &LinearConstraint) -> Result<ConstraintId, SolverError> {
        let (mut row, tag) = self.create_row(constraint);
        let mut subject = Self::choose_subject(&row, &tag);

        if subject.is_none() && row.all_dummies() {
            if !near_zero(row.constant) {
                return Err(SolverError::UnsatisfiableConstraint);
            }
            subject = Some(tag.marker);
        }

        match subject {
            Some(subject) => {
                row.solve_for(subject);
                self.substitute(subject, &row);
                self.rows.insert(subject, row);
            }
            None => {
                if !self.add_with_artificial_variable(&row)? {
                    return Err(SolverError::UnsatisfiableConstraint);
                }
            }
        }

        let id = ConstraintId(self.constraint_counter);
        self.constraint_counter += 1;
        self.constraints.insert(id, tag);

        self.optimize(false)?;
        Ok(id)
    }

    fn new_symbol(&mut self, kind: SymbolKind) -> Symbol {
        let id = self.symbol_counter;
        self.symbol_counter += 1;
        Symbol { id, kind }
    }

    fn var_symbol(&mut self, var: Variable) -> Symbol {
        if let Some(&symbol) = self.var_symbols.get(&var) {
            return symbol;
        }
        let symbol = self.new_symbol(SymbolKind::External);
        self.var_symbols.insert(var, symbol);
        symbol
    }

    /// Create a tableau row for a constraint, with basic variables substituted.
    fn create_row(&mut self, constraint: &LinearConstraint) -> (Row, Tag) {
        let expr = &constraint.expression;
        let mut row = Row::new(expr.constant);

        for &(var, coeff) in expr.terms() {
            if near_zero(coeff) {
                continue;
            }
            let symbol = self.var_symbol(var);
            match self.rows.get(&symbol) {
                Some(basic) => row.insert_row(basic, coeff),
                None => row.insert_symbol(symbol, coeff),
            }
        }

        let required = constraint.strength.is_required();
        let tag = match constraint.relation {
            Relation::LessOrEqual | Relation::GreaterOrEqual => {
                let coeff = if constraint.relation == Relation::LessOrEqual {
                    1.0
                } else {
                    -1.0
                };
                let slack = self.new_symbol(SymbolKind::Slack);
                row.insert_symbol(slack, coeff);

                let other = (!required).then(|| {
                    let error = self.new_symbol(SymbolKind::Error);
                    row.insert_symbol(error, -coeff);
                    self.objective.insert_symbol(error, constraint.strength.0);
                    error
                });
                Tag { marker: slack, other }
            }
            Relation::Equal if required => {
                let dummy = self.new_symbol(SymbolKind::Dummy);
                row.insert_symbol(dummy, 1.0);
                Tag {
                    marker: dummy,
                    other: None,
                }
            }
            Relation::Equal => {
                let errplus = self.new_symbol(SymbolKind::Error);
                let errminus = self.new_symbol(SymbolKind::Error);
                row.insert_symbol(errplus, -1.0);
                row.insert_symbol(errminus, 1.0);
                self.objective.insert_symbol(errplus, constraint.strength.0);
                self.objective.insert_symbol(errminus, constraint.strength.0);
                Tag {
                    marker: errplus,
                    other: Some(errminus),
                }
            }
        };

        // Ensure the constant is non-negative
        if row.constant < 0.0 {
            row.reverse_sign();
        }

        (row, tag)
    }

    /// Choose the basic symbol for a new row: any external symbol, else a
    /// marker that enters with a negative coefficient.
    fn choose_subject(row: &Row, tag: &Tag) -> Option<Symbol> {
        if let Some(&symbol) = row.cells.keys().find(|s| s.is_external()) {
            return Some(symbol);
        }
        if tag.marker.is_pivotable() && row.coefficient(tag.marker) < 0.0 {
            return Some(tag.marker);
        }
        tag.other
            .filter(|other| other.is_pivotable() && row.coefficient(*other) < 0.0)
    }

    /// Make a row feasible through a temporary artificial variable.
    ///
    /// Returns whether the artificial objective reached zero.
    fn add_with_artificial_variable(&mut self, row: &Row) -> Result<bool, SolverError> {
        let art = self.new_symbol(SymbolKind::Slack);
        self.rows.insert(art, row.clone());
        self.artificial = Some(row.clone());

        let optimized = self.optimize(true);
        let success = self
            .artificial
            .take()
            .is_some_and(|artificial| near_zero(artificial.constant));
        optimized?;

        if let Some(mut art_row) = self.rows.remove(&art) {
            if art_row.cells.is_empty() {
                return Ok(success);
            }
            let Some(entering) = art_row.cells.keys().copied().find(Symbol::is_pivotable) else {
                return Ok(false);
            };
            art_row.solve_for_symbols(art, entering);
            self.substitute(entering, &art_row);
            self.rows.insert(entering, art_row);
        }

        for row in self.rows.values_mut() {
            row.remove(art);
        }
        self.objective.remove(art);
        Ok(success)
    }

    /// Substitute a symbol throughout the tableau.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        for r in self.rows.values_mut() {
            r.substitute(symbol, row);
        }
        self.objective.substitute(symbol, row);
        if let Some(ref mut art) = self.artificial {
            art.substitute(symbol, row);
        }
    }

    /// Optimize the objective (or the artificial objective) with the simplex method.
    fn optimize(&mut self, artificial: bool) -> Result<(), SolverError> {
        for _ in 0..MAX_ITERATIONS {
            let objective = if artificial {
                match self.artificial.as_ref() {
                    Some(row) => row,
                    None => return Ok(()),
                }
            } else {
                &self.objective
            };

            let entering = objective
                .cells
                .iter()
                .find(|(s, c)| !s.is_dummy() && **c < 0.0)
                .map(|(&s, _)| s);
            let Some(entering) = entering else {
                return Ok(());
            };

            let leaving = self
                .leaving_row(entering)
                .ok_or(SolverError::UnboundedObjective)?;
            let Some(mut row) = self.rows.remove(&leaving) else {
                return Err(SolverError::UnboundedObjective);
            };

            row.solve_for_symbols(leaving, entering);
            self.substitute(entering, &row);
            self.rows.insert(entering, row);
        }

        Err(SolverError::IterationLimit)
    }

    /// Row to leave the basis: minimum ratio over restricted rows in which
    /// the entering symbol has a negative coefficient.
    fn leaving_row(&self, entering: Symbol) -> Option<Symbol> {
        let mut min_ratio = f64::MAX;
        let mut leaving = None;

        for (&symbol, row) in &self.rows {
            if symbol.is_external() {
                continue;
            }
            let coeff = row.coefficient(entering);
            if coeff < 0.0 {
                let ratio = -row.constant / coeff;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    leaving = Some(symbol);
                }
            }
        }

        leaving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weak() -> Strength {
        Strength::new(1.0)
    }

    fn strong() -> Strength {
        Strength::new(1_000_000.0)
    }

    #[test]
    fn test_create_variable() {
        let mut solver = Solver::new();
        let v1 = solver.new_variable();
        let v2 = solver.new_variable();
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_simple_equality() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        // x == 100
        let expr = Expression::from_variable(x).with_constant(-100.0);
        solver
            .add_constraint(&LinearConstraint::new(expr, Relation::Equal, Strength::REQUIRED))
            .unwrap();

        assert!((solver.value(x) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_two_variables() {
        let mut solver = Solver::new();
        let x = solver.new_variable();
        let y = solver.new_variable();

        // x == 100
        let expr1 = Expression::from_variable(x).with_constant(-100.0);
        solver
            .add_constraint(&LinearConstraint::new(expr1, Relation::Equal, Strength::REQUIRED))
            .unwrap();

        // y == x + 50
        let expr2 = Expression::from_variable(y).with_term(x, -1.0).with_constant(-50.0);
        solver
            .add_constraint(&LinearConstraint::new(expr2, Relation::Equal, Strength::REQUIRED))
            .unwrap();

        assert!((solver.value(x) - 100.0).abs() < 0.001);
        assert!((solver.value(y) - 150.0).abs() < 0.001);
    }

    #[test]
    fn test_inequality_bounds_weak_preference() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        // x >= 50
        let expr1 = Expression::from_variable(x).with_constant(-50.0);
        solver
            .add_constraint(&LinearConstraint::new(expr1, Relation::GreaterOrEqual, Strength::REQUIRED))
            .unwrap();

        // x == 10 (weak)
        let expr2 = Expression::from_variable(x).with_constant(-10.0);
        solver
            .add_constraint(&LinearConstraint::new(expr2, Relation::Equal, weak()))
            .unwrap();

        assert!((solver.value(x) - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_strength_ordering() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        // x == 100 (weak)
        let expr1 = Expression::from_variable(x).with_constant(-100.0);
        solver
            .add_constraint(&LinearConstraint::new(expr1, Relation::Equal, weak()))
            .unwrap();

        // x == 50 (strong)
        let expr2 = Expression::from_variable(x).with_constant(-50.0);
        solver
            .add_constraint(&LinearConstraint::new(expr2, Relation::Equal, strong()))
            .unwrap();

        // Strong constraint should win
        assert!((solver.value(x) - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_conflicting_required_rolls_back() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        let first = Expression::from_variable(x).with_constant(-100.0);
        solver
            .add_constraint(&LinearConstraint::new(first, Relation::Equal, Strength::REQUIRED))
            .unwrap();

        let second = Expression::from_variable(x).with_constant(-200.0);
        let err = solver
            .add_constraint(&LinearConstraint::new(second, Relation::Equal, Strength::REQUIRED))
            .unwrap_err();

        assert_eq!(err, SolverError::UnsatisfiableConstraint);
        assert_eq!(solver.constraint_count(), 1);
        assert!((solver.value(x) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_conflicting_required_inequality() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        // x >= 100
        let ge = Expression::from_variable(x).with_constant(-100.0);
        solver
            .add_constraint(&LinearConstraint::new(ge, Relation::GreaterOrEqual, Strength::REQUIRED))
            .unwrap();

        // x <= 50
        let le = Expression::from_variable(x).with_constant(-50.0);
        assert!(solver
            .add_constraint(&LinearConstraint::new(le, Relation::LessOrEqual, Strength::REQUIRED))
            .is_err());
        assert!(solver.value(x) >= 99.999);
    }

    #[test]
    fn test_sum_of_widths() {
        let mut solver = Solver::new();
        let a = solver.new_variable();
        let b = solver.new_variable();

        // a + b == 300, a == 2b
        let sum = Expression::from_variable(a).with_term(b, 1.0).with_constant(-300.0);
        let ratio = Expression::from_variable(a).with_term(b, -2.0);
        solver
            .add_constraint(&LinearConstraint::new(sum, Relation::Equal, Strength::REQUIRED))
            .unwrap();
        solver
            .add_constraint(&LinearConstraint::new(ratio, Relation::Equal, Strength::REQUIRED))
            .unwrap();

        assert!((solver.value(a) - 200.0).abs() < 0.001);
        assert!((solver.value(b) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_evaluate_expression() {
        let mut solver = Solver::new();
        let a = solver.new_variable();
        let b = solver.new_variable();
        solver
            .add_constraint(&LinearConstraint::new(
                Expression::from_variable(a).with_constant(-40.0),
                Relation::Equal,
                Strength::REQUIRED,
            ))
            .unwrap();

        // b is unconstrained and reads as 0
        let expr = Expression::from_variable(a).with_term(b, 3.0).with_constant(-10.0);
        assert!((solver.evaluate(&expr) - 30.0).abs() < 0.001);
        assert!((solver.evaluate(&Expression::from_constant(7.5)) - 7.5).abs() < 0.001);
    }
}
