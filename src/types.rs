//! Coordinate primitives shared across the crate.
//!
//! - Geographic input is `GeoPoint` (degrees)
//! - Projected coordinates are `PlanarPoint` (kilometres, Web Mercator)
//! - Tiles are addressed by `TileIndex`

use std::fmt;

use glam::{DVec2, dvec2};

use crate::defaults::MAX_ZOOM;

/// A point in projected (planar) space.
pub type PlanarPoint = DVec2;

/// Geographic coordinate in degrees
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// Check both components are finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<(f64, f64)> for GeoPoint {
    /// Tuples are `(lat, lon)`.
    fn from((lat, lon): (f64, f64)) -> Self {
        GeoPoint { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Axis-aligned rectangle in planar space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub min: PlanarPoint,
    pub max: PlanarPoint,
}

impl Extent {
    /// Build from two opposite corners, in any order.
    pub fn from_corners(a: PlanarPoint, b: PlanarPoint) -> Self {
        Extent {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> PlanarPoint {
        (self.min + self.max) / 2.0
    }

    /// Closed containment test on both axes
    #[inline]
    pub fn contains(&self, p: PlanarPoint) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// Grow the rectangle by `pad` on every side.
    pub fn padded(&self, pad: f64) -> Self {
        Extent {
            min: self.min - dvec2(pad, pad),
            max: self.max + dvec2(pad, pad),
        }
    }
}

/// Geographic rectangle in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoRect {
    pub bottom: f64,
    pub top: f64,
    pub left: f64,
    pub right: f64,
}

impl GeoRect {
    pub fn north_west(&self) -> GeoPoint {
        GeoPoint::new(self.top, self.left)
    }

    pub fn south_east(&self) -> GeoPoint {
        GeoPoint::new(self.bottom, self.right)
    }
}

/// One raster tile in the pyramid
///
/// Always addresses an existing tile: `zoom <= MAX_ZOOM` and both
/// coordinates below `2^zoom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileIndex {
    pub(crate) zoom: u8,
    pub(crate) x: u32,
    pub(crate) y: u32,
}

impl TileIndex {
    /// Create a tile index, rejecting coordinates outside the zoom level.
    pub fn try_new(x: u32, y: u32, zoom: u8) -> Option<Self> {
        let n = tiles_per_axis(zoom)?;
        (x < n && y < n).then_some(TileIndex { zoom, x, y })
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Tile count along one axis at `zoom` (`2^zoom`), `None` above [`MAX_ZOOM`].
#[inline]
pub fn tiles_per_axis(zoom: u8) -> Option<u32> {
    (zoom <= MAX_ZOOM).then(|| 1u32 << zoom)
}
