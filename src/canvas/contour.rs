//! Marching-squares contour tracing over an [`ElevationGrid`].

use crate::elevation::ElevationGrid;
use crate::types::PlanarPoint;

/// Line segments where the grid crosses `level`
///
/// Cells touching a NaN value produce nothing. Saddle cells are resolved by
/// pairing edges in a fixed order.
pub fn contour_segments(grid: &ElevationGrid, level: f64) -> Vec<[PlanarPoint; 2]> {
    let mut segments = Vec::new();
    for row in 0..grid.rows() - 1 {
        for col in 0..grid.cols() - 1 {
            // Corners counter-clockwise from the lower left
            let corners = [(col, row), (col + 1, row), (col + 1, row + 1), (col, row + 1)];
            let values = corners.map(|(c, r)| grid.value(c, r));
            if values.iter().any(|v| v.is_nan()) {
                continue;
            }
            let positions = corners.map(|(c, r)| grid.position(c, r));

            let crossings: Vec<PlanarPoint> = (0..4)
                .filter_map(|edge| {
                    let (a, b) = (edge, (edge + 1) % 4);
                    let (va, vb) = (values[a], values[b]);
                    if (va >= level) == (vb >= level) {
                        return None;
                    }
                    let t = (level - va) / (vb - va);
                    Some(positions[a].lerp(positions[b], t))
                })
                .collect();

            match crossings.as_slice() {
                [p, q] => segments.push([*p, *q]),
                [p, q, r, s] => {
                    segments.push([*p, *q]);
                    segments.push([*r, *s]);
                }
                _ => {}
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Extent;
    use glam::dvec2;

    fn grid(cols: usize, rows: usize, values: Vec<f64>) -> ElevationGrid {
        let extent = Extent::from_corners(dvec2(0.0, 0.0), dvec2((cols - 1) as f64, (rows - 1) as f64));
        ElevationGrid::new(extent, cols, rows, values).unwrap()
    }

    #[test]
    fn slope_crosses_once_per_cell() {
        // Rises left to right: 0, 10, 20
        let g = grid(3, 2, vec![0.0, 10.0, 20.0, 0.0, 10.0, 20.0]);
        let segments = contour_segments(&g, 5.0);
        assert_eq!(segments.len(), 1);
        for p in segments[0] {
            assert!((p.x - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn level_outside_range_is_empty() {
        let g = grid(2, 2, vec![0.0, 1.0, 2.0, 3.0]);
        assert!(contour_segments(&g, 10.0).is_empty());
        assert!(contour_segments(&g, -1.0).is_empty());
    }

    #[test]
    fn saddle_gives_two_segments() {
        let g = grid(2, 2, vec![10.0, 0.0, 0.0, 10.0]);
        assert_eq!(contour_segments(&g, 5.0).len(), 2);
    }

    #[test]
    fn nan_cells_are_skipped() {
        let g = grid(2, 2, vec![0.0, f64::NAN, 10.0, 10.0]);
        assert!(contour_segments(&g, 5.0).is_empty());
    }
}
