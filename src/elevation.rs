//! Elevation data: scattered samples, the interpolated grid and hillshading.

use std::sync::Arc;

use glam::dvec2;

use crate::bounds::Bounds;
use crate::canvas::Raster;
use crate::defaults;
use crate::errors::{ElevationError, ProjectionError};
use crate::projection::to_planar;
use crate::style::{Colormap, ElevationStyle};
use crate::types::{Extent, GeoPoint, PlanarPoint};

/// One measured elevation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationSample {
    pub position: PlanarPoint,
    pub elevation: f64,
}

/// Grid dimensions in nodes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridResolution {
    pub cols: usize,
    pub rows: usize,
}

impl Default for GridResolution {
    fn default() -> Self {
        Self {
            cols: defaults::GRID_COLS,
            rows: defaults::GRID_ROWS,
        }
    }
}

/// Regular grid of elevations over a planar extent
///
/// Nodes include both edges of the extent; row 0 lies on `extent.min.y`.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationGrid {
    extent: Extent,
    cols: usize,
    rows: usize,
    values: Vec<f64>,
}

impl ElevationGrid {
    pub fn new(extent: Extent, cols: usize, rows: usize, values: Vec<f64>) -> Result<Self, ElevationError> {
        if cols < 2 || rows < 2 || values.len() != cols * rows {
            return Err(ElevationError::InvalidResolution { cols, rows });
        }
        Ok(Self {
            extent,
            cols,
            rows,
            values,
        })
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn value(&self, col: usize, row: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Planar position of a grid node
    pub fn position(&self, col: usize, row: usize) -> PlanarPoint {
        let fx = col as f64 / (self.cols - 1) as f64;
        let fy = row as f64 / (self.rows - 1) as f64;
        self.extent.min + dvec2(fx * self.extent.width(), fy * self.extent.height())
    }

    /// Lambertian shading in [0, 1] lit from `azimuth`/`altitude` degrees.
    ///
    /// Gradients are taken in grid-index units (central differences inside,
    /// one-sided on the edges), and the result is stretched to the full range.
    pub fn hillshade(&self, azimuth: f64, altitude: f64) -> Vec<f64> {
        let az = (90.0 - azimuth).to_radians();
        let alt = altitude.to_radians();
        let light = [az.cos() * alt.cos(), az.sin() * alt.cos(), alt.sin()];

        let derivative = |i: usize, len: usize, at: &dyn Fn(usize) -> f64| -> f64 {
            if i == 0 {
                at(1) - at(0)
            } else if i == len - 1 {
                at(len - 1) - at(len - 2)
            } else {
                (at(i + 1) - at(i - 1)) / 2.0
            }
        };

        let mut intensity = Vec::with_capacity(self.values.len());
        for row in 0..self.rows {
            for col in 0..self.cols {
                let dx = derivative(col, self.cols, &|c| self.value(c, row));
                let dy = derivative(row, self.rows, &|r| self.value(col, r));
                let norm = (dx * dx + dy * dy + 1.0).sqrt();
                let n = [-dx / norm, -dy / norm, 1.0 / norm];
                intensity.push(n[0] * light[0] + n[1] * light[1] + n[2] * light[2]);
            }
        }

        let (min, max) = intensity
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if max - min > 1e-6 {
            for v in &mut intensity {
                *v = (*v - min) / (max - min);
            }
        }
        for v in &mut intensity {
            *v = v.clamp(0.0, 1.0);
        }
        intensity
    }
}

/// Elevation layer of a map
#[derive(Clone, Debug)]
pub struct Elevation {
    samples: Vec<ElevationSample>,
    style: Arc<ElevationStyle>,
    grid: Option<ElevationGrid>,
    shade: Option<Vec<f64>>,
}

impl Elevation {
    pub fn new(samples: Vec<ElevationSample>, style: Arc<ElevationStyle>) -> Self {
        Self {
            samples,
            style,
            grid: None,
            shade: None,
        }
    }

    /// Project `(position, elevation)` pairs
    pub fn from_geo(
        samples: impl IntoIterator<Item = (GeoPoint, f64)>,
        style: Arc<ElevationStyle>,
    ) -> Result<Self, ProjectionError> {
        let samples = samples
            .into_iter()
            .map(|(p, elevation)| {
                Ok(ElevationSample {
                    position: to_planar(p.lat, p.lon)?,
                    elevation,
                })
            })
            .collect::<Result<Vec<_>, ProjectionError>>()?;
        Ok(Self::new(samples, style))
    }

    /// Use an already gridded raster as-is.
    pub fn from_grid(grid: ElevationGrid, style: Arc<ElevationStyle>) -> Self {
        let mut elevation = Self::new(Vec::new(), style);
        elevation.install(grid);
        elevation
    }

    pub fn style(&self) -> &ElevationStyle {
        &self.style
    }

    pub fn samples(&self) -> &[ElevationSample] {
        &self.samples
    }

    /// Interpolate the samples onto a regular grid over `bounds`.
    ///
    /// Samples within `padding` of the bounds take part, so edges are shaped
    /// by their neighbours outside the map. Values are inverse-distance
    /// weighted; a node that coincides with a sample takes its value.
    pub fn generate_grid(
        &mut self,
        bounds: &Bounds,
        resolution: GridResolution,
        padding: f64,
    ) -> Result<&ElevationGrid, ElevationError> {
        let GridResolution { cols, rows } = resolution;
        if cols < 2 || rows < 2 {
            return Err(ElevationError::InvalidResolution { cols, rows });
        }

        let window = bounds.projected().padded(padding);
        let selected: Vec<&ElevationSample> = self
            .samples
            .iter()
            .filter(|s| window.contains(s.position) && s.elevation.is_finite())
            .collect();
        if selected.is_empty() {
            return Err(ElevationError::NoSamples);
        }

        crate::log::debug!(
            cols,
            rows,
            samples = selected.len(),
            "interpolating elevation grid"
        );

        let extent = *bounds.projected();
        let mut values = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let fx = col as f64 / (cols - 1) as f64;
                let fy = row as f64 / (rows - 1) as f64;
                let node = extent.min + dvec2(fx * extent.width(), fy * extent.height());
                values.push(inverse_distance(node, &selected));
            }
        }

        let grid = ElevationGrid::new(extent, cols, rows, values)?;
        Ok(self.install(grid))
    }

    fn install(&mut self, grid: ElevationGrid) -> &ElevationGrid {
        self.shade = Some(grid.hillshade(defaults::HILLSHADE_AZIMUTH, defaults::HILLSHADE_ALTITUDE));
        self.grid.insert(grid)
    }

    /// The interpolated grid
    pub fn grid(&self) -> Result<&ElevationGrid, ElevationError> {
        self.grid.as_ref().ok_or(ElevationError::NotInitialized)
    }

    /// Colormapped elevation background
    pub fn background_raster(&self) -> Result<Raster<'_>, ElevationError> {
        let grid = self.grid()?;
        Ok(Raster {
            extent: grid.extent,
            cols: grid.cols,
            rows: grid.rows,
            values: &grid.values,
            colormap: self.style.colormap,
            vmin: self.style.vmin,
            vmax: self.style.vmax,
            alpha: self.style.colormap_alpha,
        })
    }

    /// Grayscale hillshade overlay
    pub fn hillshade_raster(&self) -> Result<Raster<'_>, ElevationError> {
        let grid = self.grid()?;
        let shade = self.shade.as_deref().ok_or(ElevationError::NotInitialized)?;
        Ok(Raster {
            extent: grid.extent,
            cols: grid.cols,
            rows: grid.rows,
            values: shade,
            colormap: Colormap::Gray,
            vmin: 0.0,
            vmax: 1.0,
            alpha: self.style.hillshade_alpha,
        })
    }
}

fn inverse_distance(node: PlanarPoint, samples: &[&ElevationSample]) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for s in samples {
        let d2 = node.distance_squared(s.position);
        if d2 < 1e-18 {
            return s.elevation;
        }
        let w = d2.powf(-defaults::IDW_POWER / 2.0);
        weighted += w * s.elevation;
        total += w;
    }
    weighted / total
}
