//! Dirty tracking shared by every layout engine.

use crate::geometry::Rect;

bitflags::bitflags! {
    /// Which aspects of an item need recomputation.
    ///
    /// Combine with bitwise OR: `DirtyFlag::SIZE | DirtyFlag::POSITION`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DirtyFlag: u8 {
        const CLEAN = 0;
        const SIZE = 1 << 0;
        const POSITION = 1 << 1;
        const CHILDREN = 1 << 2;
        const CONSTRAINTS = 1 << 3;
        const ALL = Self::SIZE.bits()
            | Self::POSITION.bits()
            | Self::CHILDREN.bits()
            | Self::CONSTRAINTS.bits();
    }
}

impl Default for DirtyFlag {
    /// New items have never been laid out.
    fn default() -> Self {
        DirtyFlag::ALL
    }
}

impl DirtyFlag {
    pub fn is_clean(self) -> bool {
        self.is_empty()
    }
}

/// Common view of the per-item records the engines lay out.
pub trait LayoutItem {
    fn dirty(&self) -> DirtyFlag;
    fn set_dirty(&mut self, flags: DirtyFlag);
    fn is_gone(&self) -> bool;
    fn frame(&self) -> Rect;

    /// Mark aspects of this item as needing recomputation.
    fn mark_dirty(&mut self, flags: DirtyFlag) {
        let merged = self.dirty() | flags;
        self.set_dirty(merged);
    }
}

/// Check whether any visible item needs recomputation.
pub fn any_dirty<T: LayoutItem>(items: &[T]) -> bool {
    items
        .iter()
        .any(|item| !item.is_gone() && !item.dirty().is_clean())
}

/// Mark every item clean.
pub fn clear_all_dirty<T: LayoutItem>(items: &mut [T]) {
    for item in items {
        item.set_dirty(DirtyFlag::CLEAN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        dirty: DirtyFlag,
        gone: bool,
    }

    impl LayoutItem for Probe {
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
            Rect::ZERO
        }
    }

    #[test]
    fn test_default_is_all() {
        assert_eq!(DirtyFlag::default(), DirtyFlag::ALL);
        assert!(DirtyFlag::CLEAN.is_clean());
        assert!(DirtyFlag::ALL.contains(DirtyFlag::CONSTRAINTS));
    }

    #[test]
    fn test_any_dirty_ignores_gone() {
        let mut items = vec![
            Probe { dirty: DirtyFlag::CLEAN, gone: false },
            Probe { dirty: DirtyFlag::SIZE, gone: true },
        ];
        assert!(!any_dirty(&items));

        items[0].mark_dirty(DirtyFlag::POSITION);
        assert!(any_dirty(&items));

        clear_all_dirty(&mut items);
        assert!(!any_dirty(&items));
        assert!(items[1].dirty.is_clean());
    }
}
