use super::metadata::Version;

// Iterator for placing data in the encoding region of the QR
//------------------------------------------------------------------------------

// Vertical timing track; data columns at or left of it shift over by one
const TIMING_COL: i16 = 6;

/// Walks the matrix in the standard zig-zag order: column pairs from the
/// bottom-right toward the left, right column before left, sweeping
/// upward and downward in alternating pairs. Yields every cell; callers
/// skip the ones already holding function patterns.
pub struct EncRegionIter {
    width: i16,
    // Right column of the current pair
    right: i16,
    // Offset within the current vertical sweep
    vert: i16,
    // 0 for the right column of the pair, 1 for the left
    col: i16,
}

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let width = version.width() as i16;
        Self { width, right: width - 1, vert: 0, col: 0 }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);

    fn next(&mut self) -> Option<Self::Item> {
        if self.right < 1 {
            return None;
        }

        let c = self.right - self.col;
        let upward = (self.right + 1) & 2 == 0;
        let r = if upward { self.width - 1 - self.vert } else { self.vert };

        self.col += 1;
        if self.col == 2 {
            self.col = 0;
            self.vert += 1;
            if self.vert == self.width {
                self.vert = 0;
                self.right -= 2;
                if self.right == TIMING_COL {
                    self.right -= 1;
                }
            }
        }

        Some((r, c))
    }
}
