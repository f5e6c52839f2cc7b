use crate::image::{ImageView, Raster};

/// Mean-centred `grid × grid` cell means of `raster`, scaled to `[0, 1]`.
pub fn grid_signature(raster: &Raster, grid: usize) -> Vec<f32> {
    let grid = grid.max(1);
    let (w, h) = (raster.width(), raster.height());
    let mut cells = vec![0f32; grid * grid];
    if w == 0 || h == 0 {
        return cells;
    }
    for gy in 0..grid {
        let (y0, y1) = cell_span(gy, grid, h);
        for gx in 0..grid {
            let (x0, x1) = cell_span(gx, grid, w);
            let mut sum = 0u64;
            for y in y0..y1 {
                sum += raster.row(y)[x0..x1].iter().map(|&v| v as u64).sum::<u64>();
            }
            let count = ((y1 - y0) * (x1 - x0)).max(1);
            cells[gy * grid + gx] = sum as f32 / (255.0 * count as f32);
        }
    }
    let mean = cells.iter().sum::<f32>() / cells.len() as f32;
    cells.iter_mut().for_each(|c| *c -= mean);
    cells
}

/// `|a - b| / (|a| + |b|)`, zero when both are zero vectors.
pub fn normalized_distance(a: &[f32], b: &[f32]) -> f64 {
    let norm = |v: &[f32]| v.iter().map(|&x| (x as f64).powi(2)).sum::<f64>().sqrt();
    let diff = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (x as f64 - y as f64).powi(2))
        .sum::<f64>()
        .sqrt();
    let denom = norm(a) + norm(b);
    if denom <= f64::EPSILON {
        0.0
    } else {
        diff / denom
    }
}

/// Pixel range of cell `i` out of `n` along an axis of length `len`; never empty.
fn cell_span(i: usize, n: usize, len: usize) -> (usize, usize) {
    let start = (i * len / n).min(len - 1);
    let end = ((i + 1) * len / n).max(start + 1).min(len);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageViewMut;

    /// Row-major `width × height` raster holding `pixels`.
    fn raster(width: usize, height: usize, pixels: &[u8]) -> Raster {
        let mut r = Raster::new(width, height);
        for (i, &v) in pixels.iter().enumerate() {
            r.set(i % width, i / width, v);
        }
        r
    }

    #[test]
    fn flat_image_has_zero_signature() {
        let sig = grid_signature(&raster(4, 4, &[90; 16]), 2);
        assert!(sig.iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn distance_bounds() {
        let a = [1.0f32, -1.0];
        let b = [-1.0f32, 1.0];
        assert_eq!(normalized_distance(&a, &a), 0.0);
        assert!((normalized_distance(&a, &b) - 1.0).abs() < 1e-12);
        assert_eq!(normalized_distance(&[0.0], &[0.0]), 0.0);
    }

    #[test]
    fn small_images_still_fill_every_cell() {
        let sig = grid_signature(&raster(2, 2, &[0, 255, 0, 255]), 4);
        assert_eq!(sig.len(), 16);
    }
}
