//! Context, result and cache records shared by the engines.

use crate::geometry::{Insets, Size};
use crate::hash::Fnv32;

/// Opaque handle back to the caller's view object.
///
/// The engines copy it around but never interpret it; typically an index into
/// a caller-maintained widget table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserData(pub u64);

/// Environment a layout pass runs in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutContext {
    /// Size of the container being laid out
    pub container: Size,
    /// Areas obscured by device chrome
    pub safe_area: Insets,
    /// Whether padding should grow to cover the safe area
    pub respect_safe_area: bool,
    /// Right-to-left reading direction
    pub rtl: bool,
    /// Round output frames to whole pixels
    pub pixel_snap: bool,
}

impl LayoutContext {
    /// Create a left-to-right context with no safe area and no snapping.
    pub fn new(container: Size) -> Self {
        Self {
            container,
            ..Default::default()
        }
    }

    pub fn with_safe_area(mut self, safe_area: Insets) -> Self {
        self.safe_area = safe_area;
        self.respect_safe_area = true;
        self
    }

    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn with_pixel_snap(mut self, pixel_snap: bool) -> Self {
        self.pixel_snap = pixel_snap;
        self
    }

    /// Padding actually applied: each edge is at least the safe-area inset
    /// when the safe area is respected.
    pub fn effective_padding(&self, declared: Insets) -> Insets {
        if self.respect_safe_area {
            declared.max(self.safe_area)
        } else {
            declared
        }
    }

    /// Feed every layout-affecting field into a cache hash.
    pub fn hash_into(&self, hasher: &mut Fnv32) {
        hasher.write_size(self.container);
        hasher.write_insets(self.safe_area);
        hasher.write_bool(self.respect_safe_area);
        hasher.write_bool(self.rtl);
        hasher.write_bool(self.pixel_snap);
    }
}

/// Summary of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutResult {
    /// Extent reached by the laid-out content
    pub content_size: Size,
    /// False only when a structural precondition was violated
    pub success: bool,
    /// Flex lines or grid rows; 0 where not applicable
    pub line_count: usize,
    /// Items or constraints that could not be honored
    pub unsatisfied_count: usize,
}

impl LayoutResult {
    /// Successful result with nothing laid out.
    pub fn empty() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    /// Structural failure.
    pub fn failure(unsatisfied_count: usize) -> Self {
        Self {
            success: false,
            unsatisfied_count,
            ..Default::default()
        }
    }
}

/// Memoization record for a layout pass.
///
/// Reuse is keyed on container size, item count and a 32-bit structural hash.
/// Hash collisions are accepted: two different inputs that collide are treated
/// as equal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutCache {
    pub container: Size,
    pub item_count: usize,
    pub hash: u32,
    pub valid: bool,
    /// Result of the pass that produced the cached frames
    pub result: LayoutResult,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the cached pass can stand in for a fresh one.
    pub fn is_valid(&self, container: Size, item_count: usize, hash: u32) -> bool {
        self.valid
            && self.container == container
            && self.item_count == item_count
            && self.hash == hash
    }

    /// Record a completed pass.
    pub fn store(&mut self, container: Size, item_count: usize, hash: u32, result: LayoutResult) {
        self.container = container;
        self.item_count = item_count;
        self.hash = hash;
        self.result = result;
        self.valid = true;
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_padding() {
        let ctx = LayoutContext::new(Size::new(320.0, 480.0));
        let declared = Insets::uniform(8.0);
        assert_eq!(ctx.effective_padding(declared), declared);

        let ctx = ctx.with_safe_area(Insets::new(44.0, 0.0, 34.0, 0.0));
        assert_eq!(ctx.effective_padding(declared), Insets::new(44.0, 8.0, 34.0, 8.0));
    }

    #[test]
    fn test_cache_validity() {
        let mut cache = LayoutCache::new();
        let size = Size::new(100.0, 50.0);
        assert!(!cache.is_valid(size, 3, 42));

        cache.store(size, 3, 42, LayoutResult::empty());
        assert!(cache.is_valid(size, 3, 42));
        assert!(!cache.is_valid(Size::new(100.0, 50.5), 3, 42));
        assert!(!cache.is_valid(size, 4, 42));
        assert!(!cache.is_valid(size, 3, 43));

        cache.invalidate();
        assert!(!cache.is_valid(size, 3, 42));
    }

    #[test]
    fn test_result_constructors() {
        assert!(LayoutResult::empty().success);
        let failed = LayoutResult::failure(2);
        assert!(!failed.success);
        assert_eq!(failed.unsatisfied_count, 2);
    }
}
