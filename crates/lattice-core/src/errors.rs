//! Error types for the lattice engines.
//!
//! Public layout entry points never return these directly; a structural error
//! is logged and folded into an unsuccessful `LayoutResult`.

use thiserror::Error;

/// Grid axis named in track errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

/// Errors during layout computation.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("{axis} track count {requested} exceeds the maximum of {max}")]
    TrackLimit {
        axis: Axis,
        requested: usize,
        max: usize,
    },

    #[error("Grid cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("Span {row_span}x{col_span} at ({row}, {col}) leaves the grid")]
    SpanOutOfBounds {
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
    },

    #[error("No free cell region for a {row_span}x{col_span} span")]
    NoFreeCell { row_span: usize, col_span: usize },

    #[error("Too many {what}: {count} (maximum {max})")]
    Capacity {
        what: &'static str,
        count: usize,
        max: usize,
    },

    #[error("Constraint references unknown view {id}")]
    UnknownView { id: u8 },

    #[error("Constraint error: {0}")]
    Solver(#[from] SolverError),
}

/// Errors raised by the constraint solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("The constraint cannot be satisfied")]
    UnsatisfiableConstraint,

    #[error("The objective function is unbounded")]
    UnboundedObjective,

    #[error("The solver exceeded its pivot limit")]
    IterationLimit,
}
