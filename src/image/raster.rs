//! Owned 8-bit grayscale raster in row-major layout.
//!
//! Renderings are square in practice but nothing here assumes it. The
//! quarter-turn and mirror transforms follow screen conventions: `x` grows to
//! the right, `y` grows downward, and "counter-clockwise" is as seen on screen.
use super::traits::{ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Zero-filled raster of size `width × height`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Rotate counter-clockwise by `quarter_turns × 90°`.
    pub fn rotated_ccw(&self, quarter_turns: u8) -> Raster {
        let (w, h) = (self.width, self.height);
        match quarter_turns % 4 {
            0 => self.clone(),
            1 => self.remap(h, w, |x, y| (y, w - 1 - x)),
            2 => self.remap(w, h, |x, y| (w - 1 - x, h - 1 - y)),
            _ => self.remap(h, w, |x, y| (h - 1 - y, x)),
        }
    }

    /// Mirror left-right.
    pub fn mirrored(&self) -> Raster {
        let w = self.width;
        self.remap(w, self.height, |x, y| (w - 1 - x, y))
    }

    /// Move every source pixel `(x, y)` to `dst(x, y)` in a new raster.
    fn remap<F>(&self, out_w: usize, out_h: usize, dst: F) -> Raster
    where
        F: Fn(usize, usize) -> (usize, usize),
    {
        let mut out = Raster::new(out_w, out_h);
        for (y, row) in self.rows().enumerate() {
            for (x, &px) in row.iter().enumerate() {
                let (dx, dy) = dst(x, y);
                out.data[dy * out_w + dx] = px;
            }
        }
        out
    }
}

impl ImageView for Raster {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
}

impl ImageViewMut for Raster {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        let end = start + self.width;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3×2 raster with pixels numbered row-major:
    /// ```text
    /// 1 2 3
    /// 4 5 6
    /// ```
    fn numbered() -> Raster {
        let mut r = Raster::new(3, 2);
        for i in 0..6 {
            r.set(i % 3, i / 3, i as u8 + 1);
        }
        r
    }

    #[test]
    fn quarter_turn_ccw_moves_right_column_to_top_row() {
        let r = numbered().rotated_ccw(1);
        assert_eq!((r.width(), r.height()), (2, 3));
        assert_eq!(r.data(), &[3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn half_turn_reverses_data() {
        let r = numbered().rotated_ccw(2);
        assert_eq!(r.data(), &[6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn three_quarter_turns_equal_one_clockwise_turn() {
        let r = numbered().rotated_ccw(3);
        assert_eq!(r.data(), &[4, 1, 5, 2, 6, 3]);
        assert_eq!(r.rotated_ccw(1), numbered());
    }

    #[test]
    fn mirror_is_an_involution() {
        let m = numbered().mirrored();
        assert_eq!(m.data(), &[3, 2, 1, 6, 5, 4]);
        assert_eq!(m.mirrored(), numbered());
    }
}
