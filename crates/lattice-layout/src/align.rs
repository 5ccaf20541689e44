//! Alignment vocabulary shared by the flex and grid engines.

/// Distribution of items along a flex line's main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MainAlign {
    /// Pack items at the start
    #[default]
    Start,
    /// Pack items at the end
    End,
    /// Center items
    Center,
    /// Distribute items with equal space between
    SpaceBetween,
    /// Distribute items with equal space around
    SpaceAround,
    /// Distribute items with equal space evenly
    SpaceEvenly,
}

/// Alignment of an item on the cross axis of its line, or inside a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossAlign {
    Start,
    End,
    Center,
    /// Fill the line (or cell) minus margins, within min/max
    #[default]
    Stretch,
    /// Line up first baselines; behaves like `Start` where no baseline applies
    Baseline,
}

/// Distribution of flex lines along the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinesAlign {
    #[default]
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    /// Grow every line equally to fill the container
    Stretch,
}

impl MainAlign {
    pub(crate) fn code(self) -> u32 {
        self as u32
    }
}

impl CrossAlign {
    pub(crate) fn code(self) -> u32 {
        self as u32
    }
}

impl LinesAlign {
    pub(crate) fn code(self) -> u32 {
        self as u32
    }
}

/// Leading offset and between-item spacing for distributing `free` space
/// over `count` items. Negative free space falls back to start or center
/// packing for the space-* modes.
pub(crate) fn distribute(align: MainAlign, free: f32, count: usize) -> (f32, f32) {
    if count == 0 {
        return (0.0, 0.0);
    }
    match align {
        MainAlign::Start => (0.0, 0.0),
        MainAlign::End => (free, 0.0),
        MainAlign::Center => (free / 2.0, 0.0),
        MainAlign::SpaceBetween => {
            if free < 0.0 || count < 2 {
                (0.0, 0.0)
            } else {
                (0.0, free / (count - 1) as f32)
            }
        }
        MainAlign::SpaceAround => {
            if free < 0.0 {
                (free / 2.0, 0.0)
            } else {
                let space = free / count as f32;
                (space / 2.0, space)
            }
        }
        MainAlign::SpaceEvenly => {
            if free < 0.0 {
                (free / 2.0, 0.0)
            } else {
                let space = free / (count + 1) as f32;
                (space, space)
            }
        }
    }
}

/// Position and extent of an item inside a slot along one axis.
///
/// `slot` is the available extent, `size` the item's own extent, `margin_start`
/// and `margin_end` its margins. Returns the offset from the slot start and the
/// final extent.
pub(crate) fn align_in_slot(
    align: CrossAlign,
    slot: f32,
    size: f32,
    margin_start: f32,
    margin_end: f32,
    min: f32,
    max: f32,
) -> (f32, f32) {
    match align {
        CrossAlign::Start | CrossAlign::Baseline => (margin_start, size),
        CrossAlign::End => (slot - margin_end - size, size),
        CrossAlign::Center => {
            let outer = size + margin_start + margin_end;
            (margin_start + (slot - outer) / 2.0, size)
        }
        CrossAlign::Stretch => {
            let stretched = lattice_core::clamp_extent(slot - margin_start - margin_end, min, max);
            (margin_start, stretched.max(0.0))
        }
    }
}
