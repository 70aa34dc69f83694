//! Default constants (projection, output and elevation settings)

/// Earth radius of the working planar units (kilometres).
pub const EARTH_RADIUS: f64 = 6371.0;

/// Latitude at which spherical Web Mercator reaches `y = ±πR`.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Latitude limit used for world bounds and bound clamping.
pub const WORLD_LATITUDE: f64 = 85.0511;

/// Deepest zoom level a `TileIndex` can address.
pub const MAX_ZOOM: u8 = 24;

/// Fractional tile coordinates within `TILE_SNAP_EPSILON * 2^zoom` of an
/// integer snap onto it.
pub const TILE_SNAP_EPSILON: f64 = 1e-11;

pub const TILE_DIR: &str = "tiles";
/// Tiles are square figures of one inch, so dpi == pixel size.
pub const TILE_DPI: u32 = 256;
pub const TILE_SIZE_INCHES: f64 = 1.0;

pub const IMAGE_PATH: &str = "map.png";
pub const IMAGE_DPI: u32 = 1024;

pub const BACKGROUND: &str = "white";

// Feature styles
pub const LINE_WIDTH: f64 = 1.0;
pub const FONT_SIZE: f64 = 7.0;
pub const NODE_TEXT: &str = "P";

// Elevation
pub const ELEVATION_VMIN: f64 = -3000.0;
pub const ELEVATION_VMAX: f64 = 4700.0;
pub const COLORMAP_ALPHA: f64 = 0.4;
pub const HILLSHADE_ALPHA: f64 = 0.25;
pub const CONTOUR_APPEARS_AT: u8 = 15;
pub const CONTOUR_START: f64 = 0.0;
pub const CONTOUR_STOP: f64 = 5000.0;
pub const CONTOUR_COUNT: usize = 100;
pub const CONTOUR_WIDTH: f64 = 0.2;
pub const CONTOUR_LABEL_SKIP: usize = 2;
pub const CONTOUR_LABEL_FONT_SIZE: f64 = 5.0;

pub const HILLSHADE_AZIMUTH: f64 = 30.0;
pub const HILLSHADE_ALTITUDE: f64 = 60.0;

pub const GRID_COLS: usize = 100;
pub const GRID_ROWS: usize = 100;
/// Padding (planar units) around the bounds when selecting samples.
pub const GRID_PADDING: f64 = 1.0;
pub const IDW_POWER: f64 = 2.0;
