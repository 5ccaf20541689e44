//! Scratch storage for a single layout pass.

use smallvec::SmallVec;

/// Elements held inline before spilling to the heap.
pub const INLINE_CAPACITY: usize = 32;

/// Growable buffer that only allocates once more than [`INLINE_CAPACITY`]
/// elements are pushed.
pub type InlineBuf<T> = SmallVec<[T; INLINE_CAPACITY]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spills_after_inline_capacity() {
        let mut buf: InlineBuf<u32> = InlineBuf::new();
        for i in 0..INLINE_CAPACITY as u32 {
            buf.push(i);
        }
        assert!(!buf.spilled());
        buf.push(99);
        assert!(buf.spilled());
        assert_eq!(buf.len(), INLINE_CAPACITY + 1);
    }
}
