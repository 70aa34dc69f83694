//! Spherical Web Mercator projection and slippy-map tile math.
//!
//! Planar coordinates are in kilometres on a sphere of radius
//! [`EARTH_RADIUS`]. Tile coordinates follow the standard web-map layout:
//! `x` grows eastward from the antimeridian, `y` grows southward from the
//! northern Mercator limit.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::{DVec2, dvec2};

use crate::defaults::{EARTH_RADIUS, MAX_LATITUDE, TILE_SNAP_EPSILON};
use crate::errors::ProjectionError;
use crate::types::{Extent, GeoPoint, PlanarPoint, TileIndex, tiles_per_axis};

/// Forward projection, failing outside the Mercator domain.
pub fn to_planar(lat: f64, lon: f64) -> Result<PlanarPoint, ProjectionError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(ProjectionError::NonFinite { lat, lon });
    }
    if lat.abs() > MAX_LATITUDE {
        return Err(ProjectionError::LatitudeOutOfRange { lat });
    }
    if lon.abs() > 180.0 {
        return Err(ProjectionError::LongitudeOutOfRange { lon });
    }
    Ok(project(lat, lon))
}

/// Project a whole coordinate list, stopping at the first invalid point.
pub fn to_planar_all(points: &[GeoPoint]) -> Result<Vec<PlanarPoint>, ProjectionError> {
    points.iter().map(|p| to_planar(p.lat, p.lon)).collect()
}

/// Unchecked forward projection for coordinates already known to be in range.
#[inline]
pub(crate) fn project(lat: f64, lon: f64) -> PlanarPoint {
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    dvec2(x, y)
}

/// Inverse projection
pub fn to_geo(x: f64, y: f64) -> GeoPoint {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
    GeoPoint::new(lat, lon)
}

fn axis(zoom: u8) -> Result<u32, ProjectionError> {
    tiles_per_axis(zoom).ok_or(ProjectionError::ZoomOutOfRange { zoom })
}

/// Continuous tile-space position of a geographic point at `zoom`.
///
/// Components within `TILE_SNAP_EPSILON * 2^zoom` of an integer are snapped,
/// so tile corners produced by [`tile_to_geo`] land exactly on their tile.
pub fn tile_coordinate(lat: f64, lon: f64, zoom: u8) -> Result<DVec2, ProjectionError> {
    Ok(fractional_tile(lat, lon, f64::from(axis(zoom)?)))
}

fn fractional_tile(lat: f64, lon: f64, n: f64) -> DVec2 {
    let lat_rad = lat.to_radians();
    let x = (lon + 180.0) / 360.0 * n;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;
    let eps = TILE_SNAP_EPSILON * n;
    dvec2(snap(x, eps), snap(y, eps))
}

#[inline]
fn snap(v: f64, eps: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < eps { r } else { v }
}

/// Tile containing a geographic point.
///
/// The fractional coordinate is truncated, then clamped into the zoom level
/// so the eastern and southern edges belong to the last tile.
pub fn tile_index(lat: f64, lon: f64, zoom: u8) -> Result<TileIndex, ProjectionError> {
    let n = axis(zoom)?;
    let t = fractional_tile(lat, lon, f64::from(n));
    let last = i64::from(n) - 1;
    let clamp = |v: f64| (v as i64).clamp(0, last) as u32;
    Ok(TileIndex {
        zoom,
        x: clamp(t.x),
        y: clamp(t.y),
    })
}

/// North-west corner of tile `(x, y)`.
///
/// `x` and `y` may equal `2^zoom` to address the far edge of the last tile.
pub fn tile_to_geo(x: u32, y: u32, zoom: u8) -> Result<GeoPoint, ProjectionError> {
    let n = axis(zoom)?;
    if x > n || y > n {
        return Err(ProjectionError::TileOutOfRange { x, y, zoom });
    }
    Ok(tile_corner(x, y, f64::from(n)))
}

fn tile_corner(x: u32, y: u32, n: f64) -> GeoPoint {
    let lon = f64::from(x) / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * f64::from(y) / n)).sinh().atan().to_degrees();
    GeoPoint::new(lat, lon)
}

impl TileIndex {
    // Valid indices keep `x + 1` and `y + 1` within `2^zoom <= 2^24`.
    fn side(&self) -> f64 {
        f64::from(1u32 << self.zoom)
    }

    pub fn north_west(&self) -> GeoPoint {
        tile_corner(self.x, self.y, self.side())
    }

    pub fn south_east(&self) -> GeoPoint {
        tile_corner(self.x + 1, self.y + 1, self.side())
    }

    /// Planar rectangle covered by this tile
    pub fn extent(&self) -> Extent {
        let nw = self.north_west();
        let se = self.south_east();
        Extent::from_corners(project(se.lat, nw.lon), project(nw.lat, se.lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::MAX_ZOOM;

    const TOL: f64 = 1e-6;

    #[test]
    fn origin_projects_to_origin() {
        let p = to_planar(0.0, 0.0).unwrap();
        assert_eq!(p, dvec2(0.0, 0.0));
    }

    #[test]
    fn antimeridian_is_half_circumference() {
        let p = to_planar(0.0, 180.0).unwrap();
        assert!((p.x - PI * EARTH_RADIUS).abs() < 1e-9);
        let p = to_planar(MAX_LATITUDE, 0.0).unwrap();
        assert!((p.y - PI * EARTH_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn forward_rejects_out_of_domain() {
        assert_eq!(
            to_planar(90.0, 0.0),
            Err(ProjectionError::LatitudeOutOfRange { lat: 90.0 })
        );
        assert!(matches!(
            to_planar(-85.06, 10.0),
            Err(ProjectionError::LatitudeOutOfRange { .. })
        ));
        assert!(matches!(
            to_planar(0.0, 180.5),
            Err(ProjectionError::LongitudeOutOfRange { .. })
        ));
        assert!(matches!(
            to_planar(f64::NAN, 0.0),
            Err(ProjectionError::NonFinite { .. })
        ));
        assert!(to_planar(85.0511, -180.0).is_ok());
    }

    #[test]
    fn planar_round_trip() {
        let mut lat = -85.0;
        while lat <= 85.0 {
            let mut lon = -180.0;
            while lon <= 180.0 {
                let p = to_planar(lat, lon).unwrap();
                let g = to_geo(p.x, p.y);
                assert!((g.lat - lat).abs() < TOL, "lat {lat} -> {}", g.lat);
                assert!((g.lon - lon).abs() < TOL, "lon {lon} -> {}", g.lon);
                lon += 7.5;
            }
            lat += 2.5;
        }
    }

    #[test]
    fn tile_round_trip() {
        for zoom in 0..=8u8 {
            let n = tiles_per_axis(zoom).unwrap();
            let step = (n / 16).max(1);
            for x in (0..n).step_by(step as usize) {
                for y in (0..n).step_by(step as usize) {
                    let g = tile_to_geo(x, y, zoom).unwrap();
                    let t = tile_index(g.lat, g.lon, zoom).unwrap();
                    assert_eq!((t.x, t.y), (x, y), "zoom {zoom}");
                }
            }
        }
    }

    #[test]
    fn tile_round_trip_deep_zoom_edges() {
        let zoom = 20;
        let n = tiles_per_axis(zoom).unwrap();
        for (x, y) in [(0, 0), (n - 1, n - 1), (n / 2, n / 2), (12345, 678_901)] {
            let g = tile_to_geo(x, y, zoom).unwrap();
            let t = tile_index(g.lat, g.lon, zoom).unwrap();
            assert_eq!((t.x, t.y), (x, y));
        }
    }

    #[test]
    fn tile_index_scenarios() {
        let t = tile_index(0.0, -180.0, 1).unwrap();
        assert_eq!((t.x, t.y), (0, 1));

        let t = tile_index(0.0, 0.0, 0).unwrap();
        assert_eq!((t.x, t.y), (0, 0));

        // Far edges clamp into the last tile
        let t = tile_index(-85.0511, 180.0, 2).unwrap();
        assert_eq!((t.x, t.y), (3, 3));
    }

    #[test]
    fn tile_to_geo_corners() {
        let nw = tile_to_geo(0, 0, 0).unwrap();
        assert!((nw.lat - MAX_LATITUDE).abs() < 1e-9);
        assert_eq!(nw.lon, -180.0);

        let center = tile_to_geo(1, 1, 1).unwrap();
        assert!(center.lat.abs() < 1e-12);
        assert_eq!(center.lon, 0.0);
    }

    #[test]
    fn tile_extent_is_square_in_planar_space() {
        let tile = tile_index(48.85, 2.35, 10).unwrap();
        let e = tile.extent();
        assert!((e.width() - e.height()).abs() < 1e-6);
        assert!(e.contains(to_planar(48.85, 2.35).unwrap()));
    }

    #[test]
    fn world_tile_spans_the_plane() {
        let e = TileIndex::try_new(0, 0, 0).unwrap().extent();
        let half = PI * EARTH_RADIUS;
        assert!((e.min.x + half).abs() < 1e-6);
        assert!((e.max.x - half).abs() < 1e-6);
        assert!((e.min.y + half).abs() < 1e-6);
        assert!((e.max.y - half).abs() < 1e-6);
    }

    #[test]
    fn tile_functions_reject_zoom_beyond_the_pyramid() {
        let too_deep = MAX_ZOOM + 1;
        for zoom in [too_deep, 32, 40, u8::MAX] {
            let err = ProjectionError::ZoomOutOfRange { zoom };
            assert_eq!(tile_coordinate(10.0, 10.0, zoom), Err(err));
            assert_eq!(tile_index(10.0, 10.0, zoom), Err(err));
            assert_eq!(tile_to_geo(0, 0, zoom), Err(err));
        }
        assert!(tile_index(10.0, 10.0, MAX_ZOOM).is_ok());
    }

    #[test]
    fn tile_to_geo_allows_the_far_edge_only() {
        let se = tile_to_geo(4, 4, 2).unwrap();
        assert_eq!(se.lon, 180.0);
        assert!((se.lat + MAX_LATITUDE).abs() < 1e-9);
        assert_eq!(
            tile_to_geo(5, 0, 2),
            Err(ProjectionError::TileOutOfRange { x: 5, y: 0, zoom: 2 })
        );
        assert!(tile_to_geo(0, u32::MAX, 2).is_err());
    }

    #[test]
    fn last_tile_at_max_zoom_has_finite_corners() {
        let last = tiles_per_axis(MAX_ZOOM).unwrap() - 1;
        let tile = TileIndex::try_new(last, last, MAX_ZOOM).unwrap();
        let se = tile.south_east();
        assert_eq!(se.lon, 180.0);
        assert!(tile.extent().width() > 0.0);
    }
}
