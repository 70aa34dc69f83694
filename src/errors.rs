//! Error types with diagnostics using miette
//!
//! One enum per concern; rendering wraps the lower layers.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Projection Errors
// ============================================================================

/// Errors raised by the forward projection
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    #[error("latitude {lat} is outside the Web Mercator domain")]
    #[diagnostic(
        code(cartograph::projection::latitude_out_of_range),
        help("clamp latitudes to ±85.0511° before projecting")
    )]
    LatitudeOutOfRange { lat: f64 },

    #[error("longitude {lon} is outside [-180, 180]")]
    #[diagnostic(code(cartograph::projection::longitude_out_of_range))]
    LongitudeOutOfRange { lon: f64 },

    #[error("coordinate ({lat}, {lon}) is NaN or infinite")]
    #[diagnostic(code(cartograph::projection::non_finite))]
    NonFinite { lat: f64, lon: f64 },

    #[error("zoom {zoom} is above the deepest tile level")]
    #[diagnostic(
        code(cartograph::projection::zoom_out_of_range),
        help("zoom levels run from 0 to 24")
    )]
    ZoomOutOfRange { zoom: u8 },

    #[error("tile corner {x}/{y} is outside zoom level {zoom}")]
    #[diagnostic(code(cartograph::projection::tile_out_of_range))]
    TileOutOfRange { x: u32, y: u32, zoom: u8 },
}

// ============================================================================
// Bounds Errors
// ============================================================================

/// Errors raised when constructing map bounds
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq)]
pub enum BoundsError {
    #[error("bounds contain NaN or infinite values")]
    #[diagnostic(code(cartograph::bounds::non_finite))]
    NonFinite,

    #[error("bottom latitude {bottom} is above top latitude {top}")]
    #[diagnostic(code(cartograph::bounds::inverted_latitude))]
    InvertedLatitude { bottom: f64, top: f64 },

    #[error("left longitude {left} is east of right longitude {right}")]
    #[diagnostic(code(cartograph::bounds::inverted_longitude))]
    InvertedLongitude { left: f64, right: f64 },

    #[error("cannot cover an empty set of points")]
    #[diagnostic(
        code(cartograph::bounds::empty_cover),
        help("pass at least one point to bound by tiles")
    )]
    EmptyCover,

    #[error("zoom {zoom} is above the deepest tile level")]
    #[diagnostic(
        code(cartograph::bounds::zoom_out_of_range),
        help("zoom levels run from 0 to 24")
    )]
    ZoomOutOfRange { zoom: u8 },
}

// ============================================================================
// Elevation Errors
// ============================================================================

/// Errors raised by elevation grid operations
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationError {
    #[error("elevation grid is not initialized")]
    #[diagnostic(
        code(cartograph::elevation::not_initialized),
        help("call `generate_grid` before drawing elevation")
    )]
    NotInitialized,

    #[error("no elevation samples fall inside the padded bounds")]
    #[diagnostic(code(cartograph::elevation::no_samples))]
    NoSamples,

    #[error("grid resolution {cols}x{rows} is too small")]
    #[diagnostic(
        code(cartograph::elevation::invalid_resolution),
        help("a grid needs at least two columns and two rows")
    )]
    InvalidResolution { cols: usize, rows: usize },
}

// ============================================================================
// Style Errors
// ============================================================================

/// Errors raised when parsing style values
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    #[error("unknown color: {name}")]
    #[diagnostic(code(cartograph::style::unknown_color))]
    UnknownColor { name: String },

    #[error("unknown colormap: {name}")]
    #[diagnostic(
        code(cartograph::style::unknown_colormap),
        help("supported colormaps are gist_terrain and gray")
    )]
    UnknownColormap { name: String },
}

// ============================================================================
// Canvas Errors
// ============================================================================

/// Errors raised by a rendering backend
#[derive(Error, Diagnostic, Debug)]
pub enum CanvasError {
    #[error("I/O error writing {path}")]
    #[diagnostic(code(cartograph::canvas::io))]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}")]
    #[diagnostic(code(cartograph::canvas::encode))]
    Encode {
        path: Utf8PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid canvas size {width}x{height} px")]
    #[diagnostic(code(cartograph::canvas::invalid_size))]
    InvalidSize { width: u32, height: u32 },

    #[error("backend rejected {path}: {reason}")]
    #[diagnostic(code(cartograph::canvas::rejected))]
    Rejected { path: Utf8PathBuf, reason: String },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that abort a render before any tile is written
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("invalid zoom range {min}..{max}")]
    #[diagnostic(
        code(cartograph::render::invalid_zoom_range),
        help("the range is half-open and must stay within 0..=24")
    )]
    InvalidZoomRange { min: u8, max: u8 },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Elevation(#[from] ElevationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Canvas(#[from] CanvasError),
}
