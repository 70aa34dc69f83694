//! Tile ranges covering map bounds and the per-tile render jobs.

use std::ops::Range;

use camino::{Utf8Path, Utf8PathBuf};

use crate::bounds::Bounds;
use crate::canvas::ImageFormat;
use crate::errors::ProjectionError;
use crate::projection::tile_coordinate;
use crate::types::{Extent, TileIndex, tiles_per_axis};

/// Rectangle of tiles at one zoom level
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRange {
    pub(crate) zoom: u8,
    pub(crate) x: Range<u32>,
    pub(crate) y: Range<u32>,
}

impl TileRange {
    /// Every tile that overlaps `bounds` at `zoom`.
    ///
    /// Runs from the floor of the north-west tile coordinate to the ceiling of
    /// the south-east one, so a boundary falling inside a tile includes that
    /// tile. Never empty. Fails only for a zoom above the deepest level.
    pub fn covering(bounds: &Bounds, zoom: u8) -> Result<Self, ProjectionError> {
        let geo = bounds.geo();
        let nw = tile_coordinate(geo.top, geo.left, zoom)?;
        let se = tile_coordinate(geo.bottom, geo.right, zoom)?;
        let n = tiles_per_axis(zoom).ok_or(ProjectionError::ZoomOutOfRange { zoom })?;
        let span = |lo: f64, hi: f64| {
            let start = (lo.floor().max(0.0) as u32).min(n - 1);
            let stop = (hi.ceil().max(0.0) as u32).clamp(start + 1, n);
            start..stop
        };
        Ok(TileRange {
            zoom,
            x: span(nw.x, se.x),
            y: span(nw.y, se.y),
        })
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Tile columns, west to east
    pub fn columns(&self) -> Range<u32> {
        self.x.clone()
    }

    /// Tile rows, north to south
    pub fn rows(&self) -> Range<u32> {
        self.y.clone()
    }

    pub fn len(&self) -> usize {
        self.x.len() * self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tiles in row-major order (all of row `y` before `y + 1`)
    pub fn iter(&self) -> impl Iterator<Item = TileIndex> + '_ {
        self.y.clone().flat_map(move |y| {
            self.x.clone().map(move |x| TileIndex {
                zoom: self.zoom,
                x,
                y,
            })
        })
    }
}

/// One tile to render
#[derive(Clone, Debug, PartialEq)]
pub struct TileJob {
    pub index: TileIndex,
    /// Planar rectangle the tile shows
    pub extent: Extent,
    /// `<dir>/<zoom>/<x>/<y>.<ext>`
    pub path: Utf8PathBuf,
}

impl TileJob {
    pub fn new(index: TileIndex, dir: &Utf8Path, format: ImageFormat) -> Self {
        let path = dir
            .join(index.zoom().to_string())
            .join(index.x().to_string())
            .join(format!("{}.{}", index.y(), format.extension()));
        Self {
            index,
            extent: index.extent(),
            path,
        }
    }

    /// Jobs for every tile in `range`, row-major
    pub fn for_range(range: &TileRange, dir: &Utf8Path, format: ImageFormat) -> Vec<TileJob> {
        range.iter().map(|index| TileJob::new(index, dir, format)).collect()
    }
}
