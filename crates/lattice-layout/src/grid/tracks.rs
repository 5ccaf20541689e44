//! Grid track sizing.

use lattice_core::{Fnv32, InlineBuf};

/// Track sizing for columns/rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackSize {
    /// Fixed size in pixels
    Pixels(f32),
    /// Share of the space left after fixed and auto tracks (fr units)
    Fraction(f32),
    /// Size of the largest single-span item in the track
    #[default]
    Auto,
    /// At least `min` pixels, growing like a `max` fraction
    MinMax(f32, f32),
}

impl TrackSize {
    pub(crate) fn hash_into(&self, h: &mut Fnv32) {
        match *self {
            TrackSize::Pixels(v) => {
                h.write_u32(0);
                h.write_f32(v);
            }
            TrackSize::Fraction(v) => {
                h.write_u32(1);
                h.write_f32(v);
            }
            TrackSize::Auto => h.write_u32(2),
            TrackSize::MinMax(min, max) => {
                h.write_u32(3);
                h.write_f32(min);
                h.write_f32(max);
            }
        }
    }

    fn flex_weight(&self) -> Option<f32> {
        match *self {
            TrackSize::Fraction(w) | TrackSize::MinMax(_, w) => Some(w.max(0.0)),
            _ => None,
        }
    }
}

/// Resolve track sizes.
///
/// `content[i]` is the largest outer size of the single-span items occupying
/// track `i`; missing entries count as zero. Pixel and auto tracks take their
/// exact size first, then fractional and min-max tracks share what is left by
/// weight. A min-max track whose share would fall under its minimum is frozen
/// at the minimum and the rest is shared again.
pub fn resolve_tracks(tracks: &[TrackSize], available: f32, gap: f32, content: &[f32]) -> InlineBuf<f32> {
    let count = tracks.len();
    let mut sizes: InlineBuf<f32> = InlineBuf::from_elem(0.0, count);
    let mut frozen: InlineBuf<bool> = InlineBuf::from_elem(true, count);
    let mut space = available - gap * count.saturating_sub(1) as f32;

    for (i, track) in tracks.iter().enumerate() {
        match *track {
            TrackSize::Pixels(v) => {
                sizes[i] = v.max(0.0);
                space -= sizes[i];
            }
            TrackSize::Auto => {
                sizes[i] = content.get(i).copied().unwrap_or(0.0).max(0.0);
                space -= sizes[i];
            }
            TrackSize::Fraction(_) | TrackSize::MinMax(..) => frozen[i] = false,
        }
    }
    space = space.max(0.0);

    // Each round either freezes a min-max track or finishes.
    for _ in 0..=count {
        let total_weight: f32 = tracks
            .iter()
            .zip(frozen.iter())
            .filter(|(_, &f)| !f)
            .filter_map(|(t, _)| t.flex_weight())
            .sum();

        let unit = if total_weight > 0.0 { space / total_weight } else { 0.0 };

        let mut froze_any = false;
        for (i, track) in tracks.iter().enumerate() {
            if frozen[i] {
                continue;
            }
            if let TrackSize::MinMax(min, w) = *track {
                if w.max(0.0) * unit < min {
                    sizes[i] = min.max(0.0);
                    frozen[i] = true;
                    space -= sizes[i];
                    froze_any = true;
                }
            }
        }

        if !froze_any {
            for (i, track) in tracks.iter().enumerate() {
                if !frozen[i] {
                    sizes[i] = (track.flex_weight().unwrap_or(0.0) * unit).max(0.0);
                }
            }
            break;
        }
    }

    sizes
}

/// Start offset of each track: a running sum of sizes and gaps.
pub fn track_positions(sizes: &[f32], gap: f32, start: f32) -> InlineBuf<f32> {
    let mut positions = InlineBuf::with_capacity(sizes.len());
    let mut current = start;
    for &size in sizes {
        positions.push(current);
        current += size + gap;
    }
    positions
}

/// Extent of `span` tracks starting at `first`, including the gaps between them.
pub(crate) fn span_extent(sizes: &[f32], first: usize, span: usize, gap: f32) -> f32 {
    let end = (first + span).min(sizes.len());
    let start = first.min(end);
    sizes[start..end].iter().sum::<f32>() + gap * (end - start).saturating_sub(1) as f32
}
