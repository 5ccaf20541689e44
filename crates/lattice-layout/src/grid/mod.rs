//! Two-dimensional grid layout.
//!
//! Items are placed into an occupancy matrix (explicit positions first, then
//! auto-placement in row-major order), tracks are sized from their
//! definitions and content, and each item is aligned inside the cells it
//! spans.

mod placement;
mod tracks;

pub use placement::{auto_place, GridMatrix, GRID_MAX_TRACKS};
pub use tracks::{resolve_tracks, track_positions, TrackSize};

use lattice_core::{
    clamp_extent, Axis, DirtyFlag, Fnv32, InlineBuf, Insets, LayoutCache, LayoutContext, LayoutError,
    LayoutItem, LayoutResult, Rect, Size, UserData,
};

use crate::align::{align_in_slot, CrossAlign};
use tracks::span_extent;

pub use lattice_core::{any_dirty, clear_all_dirty};

/// An item laid out by the grid engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridItem {
    /// Intrinsic size
    pub size: Size,
    pub margin: Insets,
    pub min_size: Size,
    pub max_size: Size,
    /// Explicit row; auto-placed when either coordinate is unset
    pub row: Option<usize>,
    /// Explicit column
    pub col: Option<usize>,
    pub row_span: usize,
    pub col_span: usize,
    /// Horizontal alignment inside the cell, overriding the container's
    pub col_align: Option<CrossAlign>,
    /// Vertical alignment inside the cell, overriding the container's
    pub row_align: Option<CrossAlign>,
    pub gone: bool,
    pub dirty: DirtyFlag,
    /// Computed frame
    pub frame: Rect,
    pub user_data: Option<UserData>,
}

impl Default for GridItem {
    fn default() -> Self {
        Self {
            size: Size::ZERO,
            margin: Insets::ZERO,
            min_size: Size::ZERO,
            max_size: Size::INFINITE,
            row: None,
            col: None,
            row_span: 1,
            col_span: 1,
            col_align: None,
            row_align: None,
            gone: false,
            dirty: DirtyFlag::ALL,
            frame: Rect::ZERO,
            user_data: None,
        }
    }
}

impl GridItem {
    /// Create an auto-placed item spanning one cell.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// Place explicitly at a row and column.
    pub fn at(mut self, row: usize, col: usize) -> Self {
        self.row = Some(row);
        self.col = Some(col);
        self
    }

    pub fn with_span(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span;
        self.col_span = col_span;
        self
    }

    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_limits(mut self, min: Size, max: Size) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    pub fn with_align(mut self, col_align: CrossAlign, row_align: CrossAlign) -> Self {
        self.col_align = Some(col_align);
        self.row_align = Some(row_align);
        self
    }

    fn spans(&self) -> (usize, usize) {
        (self.row_span.max(1), self.col_span.max(1))
    }

    fn outer_width(&self) -> f32 {
        clamp_extent(self.size.width, self.min_size.width, self.max_size.width) + self.margin.horizontal()
    }

    fn outer_height(&self) -> f32 {
        clamp_extent(self.size.height, self.min_size.height, self.max_size.height) + self.margin.vertical()
    }

    fn hash_into(&self, h: &mut Fnv32) {
        h.write_size(self.size);
        h.write_insets(self.margin);
        h.write_size(self.min_size);
        h.write_size(self.max_size);
        h.write_usize(self.row.unwrap_or(usize::MAX));
        h.write_usize(self.col.unwrap_or(usize::MAX));
        h.write_usize(self.row_span);
        h.write_usize(self.col_span);
        h.write_u32(self.col_align.map_or(u32::MAX, CrossAlign::code));
        h.write_u32(self.row_align.map_or(u32::MAX, CrossAlign::code));
        h.write_bool(self.gone);
    }
}

impl LayoutItem for GridItem {
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

/// Grid container configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridLayoutParams {
    pub col_tracks: [TrackSize; GRID_MAX_TRACKS],
    pub row_tracks: [TrackSize; GRID_MAX_TRACKS],
    /// Declared column count; more than [`GRID_MAX_TRACKS`] fails the pass
    pub col_count: usize,
    /// Declared row count; more rows are appended by auto-placement
    pub row_count: usize,
    pub col_gap: f32,
    pub row_gap: f32,
    /// Default horizontal alignment inside cells
    pub col_align: CrossAlign,
    /// Default vertical alignment inside cells
    pub row_align: CrossAlign,
    pub padding: Insets,
    /// Sizing of rows appended beyond `row_count`
    pub auto_row_size: TrackSize,
    /// Place items without explicit coordinates, appending a row when the
    /// grid is full
    pub auto_place: bool,
    pub pixel_snap: bool,
}

/// No declared tracks and auto placement on. Columns are never appended, so
/// declare them (see [`GridLayoutParams::with_columns`]) before placing
/// items: with zero columns every item fails the pass.
impl Default for GridLayoutParams {
    fn default() -> Self {
        Self {
            col_tracks: [TrackSize::Auto; GRID_MAX_TRACKS],
            row_tracks: [TrackSize::Auto; GRID_MAX_TRACKS],
            col_count: 0,
            row_count: 0,
            col_gap: 0.0,
            row_gap: 0.0,
            col_align: CrossAlign::Stretch,
            row_align: CrossAlign::Stretch,
            padding: Insets::ZERO,
            auto_row_size: TrackSize::Auto,
            auto_place: true,
            pixel_snap: false,
        }
    }
}

impl GridLayoutParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the columns. Only the first [`GRID_MAX_TRACKS`] are stored but
    /// the full count is kept so the pass can reject it.
    pub fn with_columns(mut self, tracks: &[TrackSize]) -> Self {
        for (slot, track) in self.col_tracks.iter_mut().zip(tracks) {
            *slot = *track;
        }
        self.col_count = tracks.len();
        self
    }

    /// Define the explicit rows.
    pub fn with_rows(mut self, tracks: &[TrackSize]) -> Self {
        for (slot, track) in self.row_tracks.iter_mut().zip(tracks) {
            *slot = *track;
        }
        self.row_count = tracks.len();
        self
    }

    pub fn with_gap(mut self, col_gap: f32, row_gap: f32) -> Self {
        self.col_gap = col_gap;
        self.row_gap = row_gap;
        self
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_align(mut self, col_align: CrossAlign, row_align: CrossAlign) -> Self {
        self.col_align = col_align;
        self.row_align = row_align;
        self
    }

    pub fn with_auto_rows(mut self, size: TrackSize) -> Self {
        self.auto_row_size = size;
        self
    }

    pub fn with_auto_place(mut self, auto_place: bool) -> Self {
        self.auto_place = auto_place;
        self
    }

    fn check_tracks(&self) -> Result<(), LayoutError> {
        if self.col_count > GRID_MAX_TRACKS {
            return Err(LayoutError::TrackLimit {
                axis: Axis::Column,
                requested: self.col_count,
                max: GRID_MAX_TRACKS,
            });
        }
        if self.row_count > GRID_MAX_TRACKS {
            return Err(LayoutError::TrackLimit {
                axis: Axis::Row,
                requested: self.row_count,
                max: GRID_MAX_TRACKS,
            });
        }
        Ok(())
    }

    fn row_track(&self, row: usize) -> TrackSize {
        if row < self.row_count {
            self.row_tracks[row]
        } else {
            self.auto_row_size
        }
    }

    fn hash_into(&self, h: &mut Fnv32) {
        h.write_usize(self.col_count);
        h.write_usize(self.row_count);
        for track in &self.col_tracks[..self.col_count.min(GRID_MAX_TRACKS)] {
            track.hash_into(h);
        }
        for track in &self.row_tracks[..self.row_count.min(GRID_MAX_TRACKS)] {
            track.hash_into(h);
        }
        h.write_f32(self.col_gap);
        h.write_f32(self.row_gap);
        h.write_u32(self.col_align.code());
        h.write_u32(self.row_align.code());
        h.write_insets(self.padding);
        self.auto_row_size.hash_into(h);
        h.write_bool(self.auto_place);
        h.write_bool(self.pixel_snap);
    }
}

/// Cells covered by a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    index: usize,
    row: usize,
    col: usize,
    row_span: usize,
    col_span: usize,
}

/// Items left out of a pass.
#[derive(Debug, Clone, Copy, Default)]
struct Unplaced {
    /// Collisions and track overflows
    failed: usize,
    /// Auto items while auto-placement is off
    skipped: usize,
}

/// Fill the matrix: explicitly positioned items first, then the rest in
/// item order.
fn place_items(
    items: &[GridItem],
    params: &GridLayoutParams,
    matrix: &mut GridMatrix,
    placements: &mut InlineBuf<Placement>,
) -> Unplaced {
    let mut unplaced = Unplaced::default();

    for (index, item) in items.iter().enumerate().filter(|(_, item)| !item.gone) {
        let (Some(row), Some(col)) = (item.row, item.col) else {
            continue;
        };
        let (row_span, col_span) = item.spans();

        // Checked against the declared tracks; only auto items grow rows.
        match matrix.place(row, col, row_span, col_span, index) {
            Ok(()) => placements.push(Placement {
                index,
                row,
                col,
                row_span,
                col_span,
            }),
            Err(err) => {
                tracing::warn!(index, %err, "grid item could not be placed");
                unplaced.failed += 1;
            }
        }
    }

    for (index, item) in items.iter().enumerate().filter(|(_, item)| !item.gone) {
        if item.row.is_some() && item.col.is_some() {
            continue;
        }
        let (row_span, col_span) = item.spans();

        if !params.auto_place {
            tracing::debug!(index, "grid item skipped without auto placement");
            unplaced.skipped += 1;
            continue;
        }
        let placed = match auto_place(matrix, row_span, col_span, true) {
            Some((row, col)) => matrix.place(row, col, row_span, col_span, index).map(|()| (row, col)),
            None => Err(LayoutError::NoFreeCell { row_span, col_span }),
        };

        match placed {
            Ok((row, col)) => placements.push(Placement {
                index,
                row,
                col,
                row_span,
                col_span,
            }),
            Err(err) => {
                tracing::warn!(index, %err, "grid item could not be placed");
                unplaced.failed += 1;
            }
        }
    }

    unplaced
}

/// Largest outer size of the single-span items in each track.
fn track_content(
    items: &[GridItem],
    placements: &[Placement],
    count: usize,
    columns: bool,
) -> InlineBuf<f32> {
    let mut content = InlineBuf::from_elem(0.0, count);
    for p in placements {
        let item = &items[p.index];
        let (track, span, extent) = if columns {
            (p.col, p.col_span, item.outer_width())
        } else {
            (p.row, p.row_span, item.outer_height())
        };
        if span == 1 && track < count {
            content[track] = f32::max(content[track], extent);
        }
    }
    content
}

/// Lay out grid items inside the context's container.
///
/// A declared track count above [`GRID_MAX_TRACKS`] fails the whole pass. An
/// item that collides or overflows the tracks gets a zero frame and fails the
/// pass; the other items are still laid out. With auto-placement off, items
/// without an explicit cell are skipped and only counted.
#[tracing::instrument(level = "trace", skip_all, fields(items = items.len()))]
pub fn layout(
    items: &mut [GridItem],
    context: &LayoutContext,
    params: &GridLayoutParams,
) -> LayoutResult {
    let visible = items.iter().filter(|item| !item.gone).count();

    for item in items.iter_mut().filter(|item| item.gone) {
        item.frame = Rect::ZERO;
        item.dirty = DirtyFlag::CLEAN;
    }

    let mut matrix = match params.check_tracks().and_then(|()| GridMatrix::new(params.row_count, params.col_count)) {
        Ok(matrix) => matrix,
        Err(err) => {
            tracing::warn!(%err, "grid layout rejected");
            for item in items.iter_mut().filter(|item| !item.gone) {
                item.frame = Rect::ZERO;
            }
            return LayoutResult::failure(visible);
        }
    };

    if visible == 0 {
        return LayoutResult::empty();
    }

    let mut placements = InlineBuf::new();
    let unplaced = place_items(items, params, &mut matrix, &mut placements);

    let snap = params.pixel_snap || context.pixel_snap;
    let padding = context.effective_padding(params.padding);
    let inner = Size::new(
        (context.container.width - padding.horizontal()).max(0.0),
        (context.container.height - padding.vertical()).max(0.0),
    );

    let col_defs = &params.col_tracks[..matrix.cols()];
    let row_defs: InlineBuf<TrackSize> = (0..matrix.rows()).map(|r| params.row_track(r)).collect();

    let col_content = track_content(items, &placements, matrix.cols(), true);
    let row_content = track_content(items, &placements, matrix.rows(), false);
    let col_sizes = resolve_tracks(col_defs, inner.width, params.col_gap, &col_content);
    let row_sizes = resolve_tracks(&row_defs, inner.height, params.row_gap, &row_content);
    let col_pos = track_positions(&col_sizes, params.col_gap, padding.left);
    let row_pos = track_positions(&row_sizes, params.row_gap, padding.top);

    let grid_width = span_extent(&col_sizes, 0, col_sizes.len(), params.col_gap);
    let grid_height = span_extent(&row_sizes, 0, row_sizes.len(), params.row_gap);

    let mut placed: InlineBuf<bool> = InlineBuf::from_elem(false, items.len());
    for p in &placements {
        placed[p.index] = true;
    }
    for (item, &is_placed) in items.iter_mut().zip(&placed) {
        if !item.gone && !is_placed {
            item.frame = Rect::ZERO;
        }
    }

    for p in &placements {
        let item = &mut items[p.index];
        let cell_width = span_extent(&col_sizes, p.col, p.col_span, params.col_gap);
        let cell_height = span_extent(&row_sizes, p.row, p.row_span, params.row_gap);

        let (dx, width) = align_in_slot(
            item.col_align.unwrap_or(params.col_align),
            cell_width,
            clamp_extent(item.size.width, item.min_size.width, item.max_size.width),
            item.margin.left,
            item.margin.right,
            item.min_size.width,
            item.max_size.width,
        );
        let (dy, height) = align_in_slot(
            item.row_align.unwrap_or(params.row_align),
            cell_height,
            clamp_extent(item.size.height, item.min_size.height, item.max_size.height),
            item.margin.top,
            item.margin.bottom,
            item.min_size.height,
            item.max_size.height,
        );

        let mut frame = Rect::new(col_pos[p.col] + dx, row_pos[p.row] + dy, width, height);
        if context.rtl {
            frame = frame.mirrored_x(padding.left, inner.width);
        }
        if snap {
            frame = frame.snapped();
        }
        item.frame = frame;
        item.dirty = DirtyFlag::CLEAN;
    }

    let content_size = Size::new(
        grid_width + padding.horizontal(),
        grid_height + padding.vertical(),
    );

    tracing::trace!(
        rows = matrix.rows(),
        cols = matrix.cols(),
        width = content_size.width,
        height = content_size.height,
        "grid layout complete"
    );

    LayoutResult {
        content_size,
        success: unplaced.failed == 0,
        line_count: matrix.rows(),
        unsatisfied_count: unplaced.failed + unplaced.skipped,
    }
}

/// Structural hash of everything that affects a grid pass.
pub fn compute_items_hash(items: &[GridItem], context: &LayoutContext, params: &GridLayoutParams) -> u32 {
    let mut h = Fnv32::new();
    context.hash_into(&mut h);
    params.hash_into(&mut h);
    h.write_usize(items.len());
    for item in items {
        item.hash_into(&mut h);
    }
    h.finish()
}

/// Lay out unless `cache` already holds the result for these exact inputs.
pub fn layout_cached(
    items: &mut [GridItem],
    context: &LayoutContext,
    params: &GridLayoutParams,
    cache: &mut LayoutCache,
) -> LayoutResult {
    let hash = compute_items_hash(items, context, params);
    if cache.is_valid(context.container, items.len(), hash) {
        tracing::debug!(hash, "grid cache hit");
        clear_all_dirty(items);
        return cache.result;
    }

    tracing::debug!(hash, "grid cache miss");
    let result = layout(items, context, params);
    cache.store(context.container, items.len(), hash, result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(width: f32, height: f32) -> LayoutContext {
        LayoutContext::new(Size::new(width, height))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    fn two_by_two() -> GridLayoutParams {
        GridLayoutParams::new()
            .with_columns(&[TrackSize::Fraction(1.0), TrackSize::Fraction(1.0)])
            .with_rows(&[TrackSize::Pixels(40.0), TrackSize::Pixels(40.0)])
            .with_gap(10.0, 10.0)
    }

    #[test]
    fn test_fraction_columns_with_gap() {
        let mut items = vec![
            GridItem::new(Size::new(20.0, 20.0)),
            GridItem::new(Size::new(20.0, 20.0)),
        ];

        let result = layout(&mut items, &ctx(210.0, 100.0), &two_by_two());

        assert!(result.success);
        assert_eq!(result.line_count, 2);
        assert_eq!(items[0].frame, Rect::new(0.0, 0.0, 100.0, 40.0));
        assert_eq!(items[1].frame, Rect::new(110.0, 0.0, 100.0, 40.0));
        assert!(approx(result.content_size.width, 210.0));
        assert!(approx(result.content_size.height, 90.0));
    }

    #[test]
    fn test_auto_placement_flows_row_major() {
        let mut items: Vec<GridItem> = (0..4).map(|_| GridItem::new(Size::new(10.0, 10.0))).collect();

        layout(&mut items, &ctx(210.0, 100.0), &two_by_two());

        assert!(approx(items[2].frame.x, 0.0));
        assert!(approx(items[2].frame.y, 50.0));
        assert!(approx(items[3].frame.x, 110.0));
        assert!(approx(items[3].frame.y, 50.0));
    }

    #[test]
    fn test_explicit_items_placed_first() {
        let mut items = vec![
            GridItem::new(Size::new(10.0, 10.0)),
            GridItem::new(Size::new(10.0, 10.0)).at(0, 0),
        ];

        layout(&mut items, &ctx(210.0, 100.0), &two_by_two());

        assert!(approx(items[1].frame.x, 0.0));
        assert!(approx(items[0].frame.x, 110.0));
    }

    #[test]
    fn test_span_covers_gap() {
        let mut items = vec![GridItem::new(Size::new(10.0, 10.0)).with_span(2, 2)];

        let result = layout(&mut items, &ctx(210.0, 100.0), &two_by_two());

        assert!(result.success);
        assert_eq!(items[0].frame, Rect::new(0.0, 0.0, 210.0, 90.0));
    }

    #[test]
    fn test_rows_appended_for_overflow() {
        let params = two_by_two().with_auto_rows(TrackSize::Pixels(20.0));
        let mut items: Vec<GridItem> = (0..5).map(|_| GridItem::new(Size::new(10.0, 10.0))).collect();

        let result = layout(&mut items, &ctx(210.0, 300.0), &params);

        assert!(result.success);
        assert_eq!(result.line_count, 3);
        assert!(approx(items[4].frame.y, 100.0));
        assert!(approx(items[4].frame.height, 20.0));
    }

    #[test]
    fn test_collision_fails_pass() {
        let mut items = vec![
            GridItem::new(Size::new(10.0, 10.0)).at(0, 0),
            GridItem::new(Size::new(10.0, 10.0)).at(0, 0),
            GridItem::new(Size::new(10.0, 10.0)),
        ];
        items[1].frame = Rect::new(5.0, 5.0, 5.0, 5.0);

        let result = layout(&mut items, &ctx(210.0, 100.0), &two_by_two());

        assert!(!result.success);
        assert_eq!(result.unsatisfied_count, 1);
        assert_eq!(items[1].frame, Rect::ZERO);
        assert!(approx(items[2].frame.x, 110.0));
    }

    #[test]
    fn test_explicit_item_beyond_declared_rows_fails() {
        let mut items = vec![GridItem::new(Size::new(10.0, 10.0)).at(10, 0)];
        items[0].frame = Rect::new(5.0, 5.0, 5.0, 5.0);

        let result = layout(&mut items, &ctx(210.0, 100.0), &two_by_two());

        assert!(!result.success);
        assert_eq!(result.unsatisfied_count, 1);
        assert_eq!(result.line_count, 2);
        assert_eq!(items[0].frame, Rect::ZERO);
    }

    #[test]
    fn test_every_losing_item_cleared() {
        let mut items: Vec<GridItem> = (0..40).map(|_| GridItem::new(Size::new(10.0, 10.0)).at(1, 1)).collect();
        for item in &mut items {
            item.frame = Rect::new(1.0, 1.0, 1.0, 1.0);
        }

        let result = layout(&mut items, &ctx(210.0, 100.0), &two_by_two());

        assert_eq!(result.unsatisfied_count, 39);
        assert_eq!(items[0].frame, Rect::new(110.0, 50.0, 100.0, 40.0));
        assert!(items[1..].iter().all(|item| item.frame == Rect::ZERO));
    }

    #[test]
    fn test_default_params_declare_no_columns() {
        let mut items = vec![GridItem::new(Size::new(10.0, 10.0))];

        let result = layout(&mut items, &ctx(100.0, 100.0), &GridLayoutParams::default());

        assert!(!result.success);
        assert_eq!(result.unsatisfied_count, 1);
        assert_eq!(items[0].frame, Rect::ZERO);
    }

    #[test]
    fn test_auto_items_skipped_without_auto_place() {
        let params = two_by_two().with_auto_place(false);
        let mut items = vec![
            GridItem::new(Size::new(10.0, 10.0)).at(1, 1),
            GridItem::new(Size::new(10.0, 10.0)),
        ];

        let result = layout(&mut items, &ctx(210.0, 100.0), &params);

        assert!(result.success);
        assert_eq!(result.unsatisfied_count, 1);
        assert!(approx(items[0].frame.x, 110.0));
        assert_eq!(items[1].frame, Rect::ZERO);
    }

    #[test]
    fn test_track_limit_fails_pass() {
        let tracks = [TrackSize::Fraction(1.0); GRID_MAX_TRACKS + 1];
        let params = GridLayoutParams::new().with_columns(&tracks);
        let mut items = vec![GridItem::new(Size::new(10.0, 10.0))];

        let result = layout(&mut items, &ctx(330.0, 100.0), &params);

        assert!(!result.success);
        assert_eq!(items[0].frame, Rect::ZERO);
    }

    #[test]
    fn test_auto_track_uses_content() {
        let params = GridLayoutParams::new()
            .with_columns(&[TrackSize::Auto, TrackSize::Fraction(1.0)])
            .with_rows(&[TrackSize::Auto]);
        let mut items = vec![
            GridItem::new(Size::new(60.0, 30.0)).with_margin(Insets::symmetric(5.0, 0.0)),
            GridItem::new(Size::new(10.0, 10.0)),
        ];

        layout(&mut items, &ctx(200.0, 100.0), &params);

        assert!(approx(items[0].frame.x, 5.0));
        assert!(approx(items[0].frame.width, 60.0));
        assert!(approx(items[1].frame.x, 70.0));
        assert!(approx(items[1].frame.width, 130.0));
        assert!(approx(items[1].frame.height, 30.0));
    }

    #[test]
    fn test_cell_alignment() {
        let mut items = vec![GridItem::new(Size::new(20.0, 10.0)).with_align(CrossAlign::Center, CrossAlign::End)];

        layout(&mut items, &ctx(210.0, 100.0), &two_by_two());

        assert_eq!(items[0].frame, Rect::new(40.0, 30.0, 20.0, 10.0));
    }

    #[test]
    fn test_rtl_mirrors_columns() {
        let mut items = vec![GridItem::new(Size::new(10.0, 10.0)).at(0, 0)];

        layout(&mut items, &ctx(210.0, 100.0).with_rtl(true), &two_by_two());

        assert!(approx(items[0].frame.x, 110.0));
        assert!(approx(items[0].frame.width, 100.0));
    }

    #[test]
    fn test_gone_and_empty() {
        let mut items = vec![GridItem {
            gone: true,
            frame: Rect::new(1.0, 1.0, 1.0, 1.0),
            ..GridItem::new(Size::new(10.0, 10.0))
        }];

        let result = layout(&mut items, &ctx(210.0, 100.0), &two_by_two());

        assert!(result.success);
        assert_eq!(items[0].frame, Rect::ZERO);
        assert_eq!(result.content_size, Size::ZERO);
    }

    #[test]
    fn test_cached_layout() {
        let params = two_by_two();
        let context = ctx(210.0, 100.0);
        let mut cache = LayoutCache::new();
        let mut items = vec![GridItem::new(Size::new(10.0, 10.0))];

        let first = layout_cached(&mut items, &context, &params, &mut cache);
        items[0].mark_dirty(DirtyFlag::SIZE);
        let second = layout_cached(&mut items, &context, &params, &mut cache);
        assert_eq!(first, second);
        assert!(!any_dirty(&items));

        items[0].col = Some(1);
        items[0].row = Some(0);
        let hash = compute_items_hash(&items, &context, &params);
        assert!(!cache.is_valid(context.container, 1, hash));
        layout_cached(&mut items, &context, &params, &mut cache);
        assert!(approx(items[0].frame.x, 110.0));
    }
}
