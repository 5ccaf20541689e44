//! Grid occupancy matrix and auto-placement.

use lattice_core::{Axis, LayoutError};

/// Maximum number of columns or rows in a grid.
pub const GRID_MAX_TRACKS: usize = 32;

/// Cell occupancy for one grid pass.
///
/// Each cell holds the index of the item covering it. Rows can be appended
/// up to [`GRID_MAX_TRACKS`]; the column count is fixed at creation.
#[derive(Debug, Clone)]
pub struct GridMatrix {
    cells: [[Option<u16>; GRID_MAX_TRACKS]; GRID_MAX_TRACKS],
    rows: usize,
    cols: usize,
}

impl GridMatrix {
    /// Create an empty matrix.
    pub fn new(rows: usize, cols: usize) -> Result<Self, LayoutError> {
        if rows > GRID_MAX_TRACKS {
            return Err(LayoutError::TrackLimit {
                axis: Axis::Row,
                requested: rows,
                max: GRID_MAX_TRACKS,
            });
        }
        if cols > GRID_MAX_TRACKS {
            return Err(LayoutError::TrackLimit {
                axis: Axis::Column,
                requested: cols,
                max: GRID_MAX_TRACKS,
            });
        }
        Ok(Self {
            cells: [[None; GRID_MAX_TRACKS]; GRID_MAX_TRACKS],
            rows,
            cols,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Item covering a cell, if any.
    pub fn cell(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row][col].map(usize::from)
    }

    fn in_bounds(&self, row: usize, col: usize, row_span: usize, col_span: usize) -> bool {
        row_span > 0
            && col_span > 0
            && row.checked_add(row_span).is_some_and(|end| end <= self.rows)
            && col.checked_add(col_span).is_some_and(|end| end <= self.cols)
    }

    fn first_occupied(&self, row: usize, col: usize, row_span: usize, col_span: usize) -> Option<(usize, usize)> {
        (row..row + row_span)
            .flat_map(|r| (col..col + col_span).map(move |c| (r, c)))
            .find(|&(r, c)| self.cells[r][c].is_some())
    }

    /// Check that a span lies inside the grid and covers only free cells.
    pub fn can_place(&self, row: usize, col: usize, row_span: usize, col_span: usize) -> bool {
        self.in_bounds(row, col, row_span, col_span)
            && self.first_occupied(row, col, row_span, col_span).is_none()
    }

    /// Mark every cell of a span as covered by `item`.
    pub fn place(
        &mut self,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        item: usize,
    ) -> Result<(), LayoutError> {
        if !self.in_bounds(row, col, row_span, col_span) {
            return Err(LayoutError::SpanOutOfBounds {
                row,
                col,
                row_span,
                col_span,
            });
        }
        if let Some((row, col)) = self.first_occupied(row, col, row_span, col_span) {
            return Err(LayoutError::CellOccupied { row, col });
        }
        let id = u16::try_from(item).map_err(|_| LayoutError::Capacity {
            what: "grid items",
            count: item + 1,
            max: usize::from(u16::MAX) + 1,
        })?;

        for cells in &mut self.cells[row..row + row_span] {
            for cell in &mut cells[col..col + col_span] {
                *cell = Some(id);
            }
        }
        Ok(())
    }

    /// Append an empty row.
    pub fn add_row(&mut self) -> Result<(), LayoutError> {
        if self.rows >= GRID_MAX_TRACKS {
            return Err(LayoutError::TrackLimit {
                axis: Axis::Row,
                requested: self.rows + 1,
                max: GRID_MAX_TRACKS,
            });
        }
        self.rows += 1;
        Ok(())
    }
}

/// First free region for a span in row-major order.
fn scan(matrix: &GridMatrix, row_span: usize, col_span: usize) -> Option<(usize, usize)> {
    let rows = matrix.rows().checked_sub(row_span - 1)?;
    (0..rows).find_map(|row| {
        (0..=(matrix.cols() - col_span))
            .find(|&col| matrix.can_place(row, col, row_span, col_span))
            .map(|col| (row, col))
    })
}

/// Find the first free region for a span, scanning rows then columns.
///
/// When nothing fits and `add_rows_if_needed` is set, a single row is appended
/// (never past [`GRID_MAX_TRACKS`]) and the scan is retried once. The row stays
/// appended even if the retry fails. The cells are not marked; follow up with
/// [`GridMatrix::place`].
pub fn auto_place(
    matrix: &mut GridMatrix,
    row_span: usize,
    col_span: usize,
    add_rows_if_needed: bool,
) -> Option<(usize, usize)> {
    if row_span == 0 || col_span == 0 || col_span > matrix.cols() || row_span > GRID_MAX_TRACKS {
        return None;
    }

    if let Some(found) = scan(matrix, row_span, col_span) {
        return Some(found);
    }
    if !add_rows_if_needed || matrix.add_row().is_err() {
        return None;
    }
    scan(matrix, row_span, col_span)
}
