//! Map bounds kept in geographic and projected form.
//!
//! Both representations are recomputed together by the constructors; there is
//! no way to update one without the other.

use crate::defaults::{MAX_ZOOM, WORLD_LATITUDE};
use crate::errors::BoundsError;
use crate::projection::{project, tile_index};
use crate::types::{Extent, GeoPoint, GeoRect, PlanarPoint};

/// Output extent and culling window of a map
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    geo: GeoRect,
    projected: Extent,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::world()
    }
}

impl Bounds {
    /// Bounds covering the whole Mercator world.
    pub fn world() -> Self {
        Self::from_clamped(GeoRect {
            bottom: -WORLD_LATITUDE,
            top: WORLD_LATITUDE,
            left: -180.0,
            right: 180.0,
        })
    }

    /// Bounds from a geographic box in degrees.
    ///
    /// Latitudes are clamped to ±85.0511° and longitudes to [-180, 180].
    pub fn from_box(bottom: f64, top: f64, left: f64, right: f64) -> Result<Self, BoundsError> {
        if ![bottom, top, left, right].iter().all(|v| v.is_finite()) {
            return Err(BoundsError::NonFinite);
        }
        if bottom > top {
            return Err(BoundsError::InvertedLatitude { bottom, top });
        }
        if left > right {
            return Err(BoundsError::InvertedLongitude { left, right });
        }
        let clamp_lat = |v: f64| v.clamp(-WORLD_LATITUDE, WORLD_LATITUDE);
        let clamp_lon = |v: f64| v.clamp(-180.0, 180.0);
        Ok(Self::from_clamped(GeoRect {
            bottom: clamp_lat(bottom),
            top: clamp_lat(top),
            left: clamp_lon(left),
            right: clamp_lon(right),
        }))
    }

    /// Tile-aligned bounds covering every point at a reference zoom.
    ///
    /// The rectangle runs from the north-west corner of the tile holding the
    /// north-westernmost extreme to the south-east corner of the tile holding
    /// the south-easternmost one.
    pub fn from_tile_cover(zoom: u8, points: &[GeoPoint]) -> Result<Self, BoundsError> {
        if zoom > MAX_ZOOM {
            return Err(BoundsError::ZoomOutOfRange { zoom });
        }
        let Some(first) = points.first() else {
            return Err(BoundsError::EmptyCover);
        };
        if !points.iter().all(|p| p.is_finite()) {
            return Err(BoundsError::NonFinite);
        }

        let mut rect = GeoRect {
            bottom: first.lat,
            top: first.lat,
            left: first.lon,
            right: first.lon,
        };
        for p in &points[1..] {
            rect.bottom = rect.bottom.min(p.lat);
            rect.top = rect.top.max(p.lat);
            rect.left = rect.left.min(p.lon);
            rect.right = rect.right.max(p.lon);
        }

        let out_of_range = |_| BoundsError::ZoomOutOfRange { zoom };
        let start = tile_index(rect.top, rect.left, zoom).map_err(out_of_range)?;
        let stop = tile_index(rect.bottom, rect.right, zoom).map_err(out_of_range)?;
        let nw = start.north_west();
        let se = stop.south_east();

        crate::log::debug!(
            zoom,
            start = %start,
            stop = %stop,
            "bounds from tile cover"
        );

        Self::from_box(se.lat, nw.lat, nw.lon, se.lon)
    }

    fn from_clamped(geo: GeoRect) -> Self {
        let projected = Extent::from_corners(
            project(geo.bottom, geo.left),
            project(geo.top, geo.right),
        );
        Bounds { geo, projected }
    }

    /// Geographic rectangle (degrees)
    pub fn geo(&self) -> &GeoRect {
        &self.geo
    }

    /// Projected rectangle (planar units)
    pub fn projected(&self) -> &Extent {
        &self.projected
    }

    /// Width over height of the projected rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        self.projected.width() / self.projected.height()
    }

    /// True if any point lies inside the closed projected rectangle.
    pub fn contains_any(&self, points: &[PlanarPoint]) -> bool {
        points.iter().any(|&p| self.projected.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{tile_to_geo, to_planar};
    use glam::dvec2;

    #[test]
    fn world_bounds_are_symmetric() {
        let b = Bounds::world();
        let e = b.projected();
        assert!((e.min.x + e.max.x).abs() < 1e-9);
        assert!((e.min.y + e.max.y).abs() < 1e-9);
        assert_eq!(b.geo().top, WORLD_LATITUDE);
        assert_eq!(b.geo().left, -180.0);
    }

    #[test]
    fn from_box_projects_corners() {
        let b = Bounds::from_box(45.0, 50.0, 5.0, 10.0).unwrap();
        let sw = to_planar(45.0, 5.0).unwrap();
        let ne = to_planar(50.0, 10.0).unwrap();
        assert!((b.projected().min - sw).length() < 1e-9);
        assert!((b.projected().max - ne).length() < 1e-9);
    }

    #[test]
    fn from_box_clamps_to_domain() {
        let b = Bounds::from_box(-90.0, 90.0, -200.0, 200.0).unwrap();
        assert_eq!(*b.geo(), *Bounds::world().geo());
        assert!(b.projected().max.y.is_finite());
    }

    #[test]
    fn from_box_rejects_malformed_input() {
        assert_eq!(
            Bounds::from_box(10.0, 5.0, 0.0, 1.0),
            Err(BoundsError::InvertedLatitude { bottom: 10.0, top: 5.0 })
        );
        assert_eq!(
            Bounds::from_box(0.0, 5.0, 3.0, 1.0),
            Err(BoundsError::InvertedLongitude { left: 3.0, right: 1.0 })
        );
        assert_eq!(
            Bounds::from_box(f64::NAN, 5.0, 0.0, 1.0),
            Err(BoundsError::NonFinite)
        );
    }

    #[test]
    fn tile_cover_is_tile_aligned() {
        let points = [GeoPoint::new(51.5, -0.12), GeoPoint::new(48.85, 2.35)];
        let b = Bounds::from_tile_cover(6, &points).unwrap();

        // London and Paris at zoom 6 fall in tiles x=31..=32, y=21..=22
        let nw = tile_to_geo(31, 21, 6).unwrap();
        let se = tile_to_geo(33, 23, 6).unwrap();
        assert!((b.geo().top - nw.lat).abs() < 1e-9);
        assert!((b.geo().left - nw.lon).abs() < 1e-9);
        assert!((b.geo().bottom - se.lat).abs() < 1e-9);
        assert!((b.geo().right - se.lon).abs() < 1e-9);

        for p in points {
            assert!(b.contains_any(&[to_planar(p.lat, p.lon).unwrap()]));
        }
    }

    #[test]
    fn tile_cover_rejects_empty() {
        assert_eq!(Bounds::from_tile_cover(3, &[]), Err(BoundsError::EmptyCover));
    }

    #[test]
    fn tile_cover_rejects_zoom_beyond_the_pyramid() {
        let oslo = [GeoPoint::new(59.91, 10.75)];
        for zoom in [MAX_ZOOM + 1, 32, 40, u8::MAX] {
            assert_eq!(
                Bounds::from_tile_cover(zoom, &oslo),
                Err(BoundsError::ZoomOutOfRange { zoom })
            );
        }
        let deepest = Bounds::from_tile_cover(MAX_ZOOM, &oslo).unwrap();
        assert!(deepest.projected().width() > 0.0);
    }

    #[test]
    fn contains_any_uses_closed_rectangle() {
        let b = Bounds::from_box(0.0, 10.0, 0.0, 10.0).unwrap();
        let e = *b.projected();
        assert!(b.contains_any(&[e.min]));
        assert!(b.contains_any(&[dvec2(e.max.x, e.min.y)]));
        assert!(!b.contains_any(&[e.max + dvec2(1.0, 0.0)]));
        assert!(b.contains_any(&[e.max + dvec2(1.0, 0.0), e.center()]));
        assert!(!b.contains_any(&[]));
    }
}
