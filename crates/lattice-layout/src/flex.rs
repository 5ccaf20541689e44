//! Flexible-box layout along a single main axis, with wrapping.
//!
//! A pass runs in fixed stages: order items, break them into lines, resolve
//! flexible lengths per line, size lines on the cross axis, stack the lines,
//! then position every item inside its line.

use smallvec::SmallVec;

use lattice_core::{
    clamp_extent, DirtyFlag, Fnv32, InlineBuf, Insets, LayoutCache, LayoutContext, LayoutItem,
    LayoutResult, Rect, Size, UserData,
};

use crate::align::{align_in_slot, distribute, CrossAlign, LinesAlign, MainAlign};

pub use lattice_core::{any_dirty, clear_all_dirty};

const EPSILON: f32 = 1e-4;

/// Main axis direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    pub fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }
}

/// Line wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexWrap {
    /// Keep every item on one line, even when it overflows
    #[default]
    NoWrap,
    Wrap,
    /// Wrap, stacking lines from the cross end
    WrapReverse,
}

/// An item laid out by the flex engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    /// Measured size
    pub size: Size,
    pub margin: Insets,
    pub min_size: Size,
    pub max_size: Size,
    /// Share of positive free space
    pub grow: f32,
    /// Share of negative free space, scaled by basis
    pub shrink: f32,
    /// Starting main size; negative means use the measured size
    pub basis: f32,
    /// Sort key when the container uses ordering
    pub order: i32,
    /// Overrides the container's cross alignment
    pub align_self: Option<CrossAlign>,
    /// Width / height; 0 for none
    pub aspect_ratio: f32,
    /// First baseline measured from the top edge; 0 or less means the bottom edge
    pub baseline: f32,
    pub gone: bool,
    pub dirty: DirtyFlag,
    pub frame: Rect,
    pub user_data: Option<UserData>,
}

impl Default for FlexItem {
    fn default() -> Self {
        Self {
            size: Size::ZERO,
            margin: Insets::ZERO,
            min_size: Size::ZERO,
            max_size: Size::INFINITE,
            grow: 0.0,
            shrink: 1.0,
            basis: -1.0,
            order: 0,
            align_self: None,
            aspect_ratio: 0.0,
            baseline: 0.0,
            gone: false,
            dirty: DirtyFlag::ALL,
            frame: Rect::ZERO,
            user_data: None,
        }
    }
}

impl FlexItem {
    /// Create an item with a measured size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn with_grow(mut self, grow: f32) -> Self {
        self.grow = grow;
        self
    }

    pub fn with_shrink(mut self, shrink: f32) -> Self {
        self.shrink = shrink;
        self
    }

    pub fn with_basis(mut self, basis: f32) -> Self {
        self.basis = basis;
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

    pub fn with_align_self(mut self, align: CrossAlign) -> Self {
        self.align_self = Some(align);
        self
    }

    fn hash_into(&self, h: &mut Fnv32) {
        h.write_size(self.size);
        h.write_insets(self.margin);
        h.write_size(self.min_size);
        h.write_size(self.max_size);
        h.write_f32(self.grow);
        h.write_f32(self.shrink);
        h.write_f32(self.basis);
        h.write_i32(self.order);
        h.write_u32(self.align_self.map_or(u32::MAX, CrossAlign::code));
        h.write_f32(self.aspect_ratio);
        h.write_f32(self.baseline);
        h.write_bool(self.gone);
    }
}

impl LayoutItem for FlexItem {
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

/// Flex container configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlexLayoutParams {
    pub direction: FlexDirection,
    /// Distribution on the main axis
    pub main_align: MainAlign,
    /// Default item alignment on the cross axis
    pub cross_align: CrossAlign,
    /// Distribution of lines on the cross axis
    pub lines_align: LinesAlign,
    pub wrap: FlexWrap,
    pub padding: Insets,
    /// Gap between items on the main axis
    pub gap: f32,
    /// Gap between lines
    pub cross_gap: f32,
    pub pixel_snap: bool,
    /// Sort items by `order` before layout
    pub use_order: bool,
    /// Right-to-left: flips the horizontal axis
    pub rtl: bool,
}

impl FlexLayoutParams {
    /// Create a horizontal container.
    pub fn row() -> Self {
        Self::default()
    }

    /// Create a vertical container.
    pub fn column() -> Self {
        Self {
            direction: FlexDirection::Column,
            ..Default::default()
        }
    }

    pub fn with_direction(mut self, direction: FlexDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_wrap(mut self, wrap: FlexWrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_cross_gap(mut self, cross_gap: f32) -> Self {
        self.cross_gap = cross_gap;
        self
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_main_align(mut self, align: MainAlign) -> Self {
        self.main_align = align;
        self
    }

    pub fn with_cross_align(mut self, align: CrossAlign) -> Self {
        self.cross_align = align;
        self
    }

    pub fn with_lines_align(mut self, align: LinesAlign) -> Self {
        self.lines_align = align;
        self
    }

    fn hash_into(&self, h: &mut Fnv32) {
        h.write_u32(self.direction as u32);
        h.write_u32(self.main_align.code());
        h.write_u32(self.cross_align.code());
        h.write_u32(self.lines_align.code());
        h.write_u32(self.wrap as u32);
        h.write_insets(self.padding);
        h.write_f32(self.gap);
        h.write_f32(self.cross_gap);
        h.write_bool(self.pixel_snap);
        h.write_bool(self.use_order);
        h.write_bool(self.rtl);
    }
}

/// A laid-out flex line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexLine {
    /// First entry of this line in [`FlexLines::order`]
    pub start_index: usize,
    pub count: usize,
    /// Main extent used by the line's items, margins and gaps
    pub main_size: f32,
    pub cross_size: f32,
    /// Cross offset of the line inside the container
    pub cross_position: f32,
    /// Largest baseline distance among baseline-aligned items
    pub max_baseline: f32,
}

/// Line metadata retained from the last pass, for per-line rendering.
#[derive(Debug, Clone, Default)]
pub struct FlexLines {
    pub lines: SmallVec<[FlexLine; 8]>,
    /// Visible item indices in layout order
    pub order: InlineBuf<usize>,
}

impl FlexLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Item indices belonging to a line.
    pub fn items_in(&self, line: &FlexLine) -> &[usize] {
        let end = (line.start_index + line.count).min(self.order.len());
        let start = line.start_index.min(end);
        &self.order[start..end]
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.order.clear();
    }
}

/// Projection of sizes and insets onto the main and cross axes.
#[derive(Clone, Copy)]
struct Axes {
    row: bool,
}

impl Axes {
    fn main(self, size: Size) -> f32 {
        if self.row { size.width } else { size.height }
    }

    fn cross(self, size: Size) -> f32 {
        if self.row { size.height } else { size.width }
    }

    fn main_margins(self, m: Insets) -> (f32, f32) {
        if self.row { (m.left, m.right) } else { (m.top, m.bottom) }
    }

    fn cross_margins(self, m: Insets) -> (f32, f32) {
        if self.row { (m.top, m.bottom) } else { (m.left, m.right) }
    }

    fn size(self, main: f32, cross: f32) -> Size {
        if self.row { Size::new(main, cross) } else { Size::new(cross, main) }
    }
}

/// Per-item scratch state for one pass.
#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    index: usize,
    basis: f32,
    target: f32,
    min_main: f32,
    max_main: f32,
    margin_main: (f32, f32),
    cross: f32,
    min_cross: f32,
    max_cross: f32,
    margin_cross: (f32, f32),
    grow: f32,
    shrink: f32,
    align: CrossAlign,
    aspect_ratio: f32,
    baseline: f32,
    frozen: bool,
    clamped: bool,
    violation: f32,
}

impl Entry {
    fn outer_basis(&self) -> f32 {
        self.basis + self.margin_main.0 + self.margin_main.1
    }

    fn outer_target(&self) -> f32 {
        self.target + self.margin_main.0 + self.margin_main.1
    }

    fn outer_cross(&self) -> f32 {
        self.cross + self.margin_cross.0 + self.margin_cross.1
    }
}

/// Lay out flex items inside the context's container.
pub fn layout(
    items: &mut [FlexItem],
    context: &LayoutContext,
    params: &FlexLayoutParams,
) -> LayoutResult {
    let mut lines = FlexLines::new();
    layout_with_lines(items, context, params, &mut lines)
}

/// Lay out flex items and retain the line metadata in `lines`.
#[tracing::instrument(level = "trace", skip_all, fields(items = items.len()))]
pub fn layout_with_lines(
    items: &mut [FlexItem],
    context: &LayoutContext,
    params: &FlexLayoutParams,
    lines: &mut FlexLines,
) -> LayoutResult {
    lines.clear();

    let axes = Axes {
        row: params.direction.is_row(),
    };
    let rtl = params.rtl || context.rtl;
    let snap = params.pixel_snap || context.pixel_snap;
    let padding = context.effective_padding(params.padding);
    let inner = Size::new(
        (context.container.width - padding.horizontal()).max(0.0),
        (context.container.height - padding.vertical()).max(0.0),
    );
    let avail_main = axes.main(inner);
    let avail_cross = axes.cross(inner);

    for item in items.iter_mut().filter(|item| item.gone) {
        item.frame = Rect::ZERO;
        item.dirty = DirtyFlag::CLEAN;
    }

    lines
        .order
        .extend(items.iter().enumerate().filter(|(_, item)| !item.gone).map(|(i, _)| i));
    if params.use_order {
        // Stable, so equal keys keep their original relative order.
        lines.order.sort_by_key(|&i| items[i].order);
    }
    if lines.order.is_empty() {
        return LayoutResult::empty();
    }

    let mut entries: InlineBuf<Entry> = lines
        .order
        .iter()
        .map(|&index| make_entry(index, &items[index], axes, params.cross_align))
        .collect();

    break_lines(&entries, avail_main, params, lines);

    let mut unsatisfied = 0;
    for line in lines.lines.iter_mut() {
        let slice = &mut entries[line.start_index..line.start_index + line.count];
        unsatisfied += resolve_flexible_lengths(slice, avail_main, params.gap);
        line.main_size = used_main(slice, params.gap);
        for entry in slice.iter_mut() {
            resolve_cross_size(entry, axes);
        }
        size_line(line, slice, axes);
    }

    if params.wrap == FlexWrap::NoWrap && avail_cross > 0.0 {
        if let Some(line) = lines.lines.first_mut() {
            line.cross_size = avail_cross;
        }
    }

    let total_cross = stack_lines(&mut lines.lines, avail_cross, params);

    let main_mirror = params.direction.is_reverse() ^ (rtl && axes.row);
    let cross_mirror = (params.wrap == FlexWrap::WrapReverse) ^ (rtl && !axes.row);
    let cross_extent = if avail_cross > 0.0 { avail_cross } else { total_cross };

    let mut content_main = 0.0_f32;
    for line in lines.lines.iter_mut() {
        let slice = &entries[line.start_index..line.start_index + line.count];
        let free = avail_main - line.main_size;
        let (offset, between) = distribute(params.main_align, free, slice.len());
        content_main = content_main.max(line.main_size);

        let mut cursor = offset;
        for entry in slice {
            let mut main_pos = cursor + entry.margin_main.0;
            cursor += entry.outer_target() + params.gap + between;

            let (cross_off, cross_size) = cross_place(entry, line, axes);
            let mut cross_pos = line.cross_position + cross_off;

            if main_mirror {
                main_pos = avail_main - main_pos - entry.target;
            }
            if cross_mirror {
                cross_pos = cross_extent - cross_pos - cross_size;
            }

            let (x, y) = if axes.row {
                (padding.left + main_pos, padding.top + cross_pos)
            } else {
                (padding.left + cross_pos, padding.top + main_pos)
            };
            let size = axes.size(entry.target, cross_size);
            let mut frame = Rect::new(x, y, size.width, size.height);
            if snap {
                frame = frame.snapped();
            }

            let item = &mut items[entry.index];
            item.frame = frame;
            item.dirty = DirtyFlag::CLEAN;
        }

        if cross_mirror {
            line.cross_position = cross_extent - line.cross_position - line.cross_size;
        }
        let cross_start = if axes.row { padding.top } else { padding.left };
        line.cross_position += cross_start;
    }

    let (main_pad, cross_pad) = if axes.row {
        (padding.horizontal(), padding.vertical())
    } else {
        (padding.vertical(), padding.horizontal())
    };
    let content_size = axes.size(content_main + main_pad, total_cross + cross_pad);

    if unsatisfied > 0 {
        tracing::debug!(unsatisfied, "flex free space could not be fully distributed");
    }
    tracing::trace!(
        lines = lines.lines.len(),
        width = content_size.width,
        height = content_size.height,
        "flex layout complete"
    );

    LayoutResult {
        content_size,
        success: true,
        line_count: lines.lines.len(),
        unsatisfied_count: unsatisfied,
    }
}

fn make_entry(index: usize, item: &FlexItem, axes: Axes, container_align: CrossAlign) -> Entry {
    let min_main = axes.main(item.min_size);
    let max_main = axes.main(item.max_size);
    let raw_basis = if item.basis >= 0.0 {
        item.basis
    } else {
        axes.main(item.size)
    };
    let mut align = item.align_self.unwrap_or(container_align);
    if align == CrossAlign::Baseline && !axes.row {
        align = CrossAlign::Start;
    }
    let basis = clamp_extent(raw_basis, min_main, max_main).max(0.0);

    Entry {
        index,
        basis,
        target: basis,
        min_main,
        max_main,
        margin_main: axes.main_margins(item.margin),
        cross: axes.cross(item.size),
        min_cross: axes.cross(item.min_size),
        max_cross: axes.cross(item.max_size),
        margin_cross: axes.cross_margins(item.margin),
        grow: item.grow.max(0.0),
        shrink: item.shrink.max(0.0),
        align,
        aspect_ratio: item.aspect_ratio,
        baseline: item.baseline,
        ..Default::default()
    }
}

/// Partition entries into lines. A line always holds at least one item.
fn break_lines(entries: &[Entry], avail_main: f32, params: &FlexLayoutParams, lines: &mut FlexLines) {
    let mut start = 0;
    let mut count = 0;
    let mut line_main = 0.0_f32;

    for (k, entry) in entries.iter().enumerate() {
        let outer = entry.outer_basis();
        let needed = if count > 0 { line_main + params.gap + outer } else { outer };
        if params.wrap != FlexWrap::NoWrap && count > 0 && needed > avail_main + EPSILON {
            lines.lines.push(FlexLine {
                start_index: start,
                count,
                ..Default::default()
            });
            start = k;
            count = 0;
            line_main = outer;
        } else {
            line_main = needed;
        }
        count += 1;
    }

    if count > 0 {
        lines.lines.push(FlexLine {
            start_index: start,
            count,
            ..Default::default()
        });
    }
}

fn used_main(entries: &[Entry], gap: f32) -> f32 {
    let gaps = gap * entries.len().saturating_sub(1) as f32;
    entries.iter().map(Entry::outer_target).sum::<f32>() + gaps
}

/// Distribute a line's free space by grow or shrink weight, freezing items
/// that hit their min/max and redistributing until stable.
///
/// Returns the number of clamped items when free space is left over.
fn resolve_flexible_lengths(entries: &mut [Entry], avail_main: f32, gap: f32) -> usize {
    let gaps = gap * entries.len().saturating_sub(1) as f32;
    let margins: f32 = entries.iter().map(|e| e.margin_main.0 + e.margin_main.1).sum();
    let used: f32 = entries.iter().map(|e| e.basis).sum::<f32>() + margins + gaps;
    let free = avail_main - used;
    let growing = free > 0.0;

    for e in entries.iter_mut() {
        e.target = e.basis;
        e.clamped = false;
        e.frozen = free.abs() <= EPSILON
            || (growing && e.grow <= 0.0)
            || (!growing && (e.shrink <= 0.0 || e.basis <= 0.0));
    }
    let had_weight = entries.iter().any(|e| !e.frozen);

    for _ in 0..=entries.len() {
        if entries.iter().all(|e| e.frozen) {
            break;
        }

        let frozen_size: f32 = entries.iter().filter(|e| e.frozen).map(|e| e.target).sum();
        let unfrozen_basis: f32 = entries.iter().filter(|e| !e.frozen).map(|e| e.basis).sum();
        let remaining = avail_main - gaps - margins - frozen_size - unfrozen_basis;

        let weight = |e: &Entry| if growing { e.grow } else { e.shrink * e.basis };
        let total_weight: f32 = entries.iter().filter(|e| !e.frozen).map(weight).sum();
        if total_weight <= 0.0 {
            break;
        }

        let mut total_violation = 0.0_f32;
        for e in entries.iter_mut().filter(|e| !e.frozen) {
            let raw = e.basis + remaining * weight(&*e) / total_weight;
            let clamped = clamp_extent(raw, e.min_main, e.max_main).max(0.0);
            e.target = clamped;
            e.violation = clamped - raw;
            total_violation += e.violation;
        }

        if total_violation.abs() <= EPSILON {
            break;
        }
        for e in entries.iter_mut().filter(|e| !e.frozen) {
            let freeze = if total_violation > 0.0 {
                e.violation > EPSILON
            } else {
                e.violation < -EPSILON
            };
            if freeze {
                e.frozen = true;
                e.clamped = true;
            }
        }
    }

    let leftover = avail_main - used_main(entries, gap);
    if had_weight && leftover.abs() > 0.5 {
        entries.iter().filter(|e| e.clamped).count()
    } else {
        0
    }
}

/// Cross size before stretching; aspect ratio couples it to the main size.
fn resolve_cross_size(entry: &mut Entry, axes: Axes) {
    let cross = if entry.aspect_ratio > 0.0 {
        if axes.row {
            entry.target / entry.aspect_ratio
        } else {
            entry.target * entry.aspect_ratio
        }
    } else {
        entry.cross
    };
    entry.cross = clamp_extent(cross, entry.min_cross, entry.max_cross).max(0.0);
    if entry.baseline <= 0.0 || entry.baseline > entry.cross {
        entry.baseline = entry.cross;
    }
}

fn size_line(line: &mut FlexLine, entries: &[Entry], axes: Axes) {
    let mut max_outer = 0.0_f32;
    let mut max_above = 0.0_f32;
    let mut max_below = 0.0_f32;

    for e in entries {
        if e.align == CrossAlign::Baseline && axes.row {
            let above = e.margin_cross.0 + e.baseline;
            max_above = max_above.max(above);
            max_below = max_below.max(e.outer_cross() - above);
        } else {
            max_outer = max_outer.max(e.outer_cross());
        }
    }

    line.max_baseline = max_above;
    line.cross_size = max_outer.max(max_above + max_below);
}

/// Assign cross positions to lines; returns the total cross extent used.
fn stack_lines(lines: &mut [FlexLine], avail_cross: f32, params: &FlexLayoutParams) -> f32 {
    let count = lines.len();
    let gaps = params.cross_gap * count.saturating_sub(1) as f32;
    let mut total: f32 = lines.iter().map(|l| l.cross_size).sum::<f32>() + gaps;
    let mut free = avail_cross - total;

    if params.lines_align == LinesAlign::Stretch && free > 0.0 && params.wrap != FlexWrap::NoWrap {
        let extra = free / count as f32;
        for line in lines.iter_mut() {
            line.cross_size += extra;
        }
        total = avail_cross;
        free = 0.0;
    }

    let distribution = match params.lines_align {
        LinesAlign::Start | LinesAlign::Stretch => MainAlign::Start,
        LinesAlign::End => MainAlign::End,
        LinesAlign::Center => MainAlign::Center,
        LinesAlign::SpaceBetween => MainAlign::SpaceBetween,
        LinesAlign::SpaceAround => MainAlign::SpaceAround,
        LinesAlign::SpaceEvenly => MainAlign::SpaceEvenly,
    };
    let (offset, between) = if avail_cross > 0.0 {
        distribute(distribution, free, count)
    } else {
        (0.0, 0.0)
    };

    let mut pos = offset;
    for line in lines.iter_mut() {
        line.cross_position = pos;
        pos += line.cross_size + params.cross_gap + between;
    }
    total
}

/// Offset of an item inside its line and its final cross size.
fn cross_place(entry: &Entry, line: &FlexLine, axes: Axes) -> (f32, f32) {
    match entry.align {
        CrossAlign::Baseline if axes.row => (line.max_baseline - entry.baseline, entry.cross),
        CrossAlign::Stretch if entry.aspect_ratio > 0.0 => align_in_slot(
            CrossAlign::Start,
            line.cross_size,
            entry.cross,
            entry.margin_cross.0,
            entry.margin_cross.1,
            entry.min_cross,
            entry.max_cross,
        ),
        align => align_in_slot(
            align,
            line.cross_size,
            entry.cross,
            entry.margin_cross.0,
            entry.margin_cross.1,
            entry.min_cross,
            entry.max_cross,
        ),
    }
}

/// Structural hash of everything that affects a flex pass.
pub fn compute_items_hash(items: &[FlexItem], context: &LayoutContext, params: &FlexLayoutParams) -> u32 {
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
///
/// On a hit the items keep the frames from the cached pass and are marked clean.
pub fn layout_cached(
    items: &mut [FlexItem],
    context: &LayoutContext,
    params: &FlexLayoutParams,
    cache: &mut LayoutCache,
) -> LayoutResult {
    let hash = compute_items_hash(items, context, params);
    if cache.is_valid(context.container, items.len(), hash) {
        tracing::debug!(hash, "flex cache hit");
        clear_all_dirty(items);
        return cache.result;
    }

    tracing::debug!(hash, "flex cache miss");
    let result = layout(items, context, params);
    cache.store(context.container, items.len(), hash, result);
    result
}
