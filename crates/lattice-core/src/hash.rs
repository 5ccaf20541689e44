//! 32-bit FNV-1a hashing of layout inputs, used as the cache key.

use crate::geometry::{Insets, Point, Rect, Size};

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Incremental FNV-1a hasher over float bit patterns.
#[derive(Debug, Clone, Copy)]
pub struct Fnv32 {
    state: u32,
}

impl Default for Fnv32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Fnv32 {
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    pub fn write_u32(&mut self, value: u32) {
        for byte in value.to_le_bytes() {
            self.state ^= u32::from(byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    pub fn write_usize(&mut self, value: usize) {
        self.write_u32(value as u32);
        self.write_u32((value as u64 >> 32) as u32);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u32(u32::from(value));
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    pub fn write_size(&mut self, size: Size) {
        self.write_f32(size.width);
        self.write_f32(size.height);
    }

    pub fn write_point(&mut self, point: Point) {
        self.write_f32(point.x);
        self.write_f32(point.y);
    }

    pub fn write_rect(&mut self, rect: Rect) {
        self.write_f32(rect.x);
        self.write_f32(rect.y);
        self.write_f32(rect.width);
        self.write_f32(rect.height);
    }

    pub fn write_insets(&mut self, insets: Insets) {
        self.write_f32(insets.top);
        self.write_f32(insets.left);
        self.write_f32(insets.bottom);
        self.write_f32(insets.right);
    }

    pub fn finish(&self) -> u32 {
        self.state
    }
}
