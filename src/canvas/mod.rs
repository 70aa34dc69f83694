//! Rendering backends
//!
//! The core never touches pixels. It drives a retained-mode [`Canvas`]: every
//! draw call creates an artist that stays on the canvas, can be hidden or
//! removed, and is rasterized on `save` through the current extent.
//!
//! - `recording`: in-memory backend that records calls and saved frames
//! - `skia`: raster backend on `tiny-skia`, encoded with `image`
//! - `contour`: marching-squares tracing shared by raster backends

pub mod contour;
pub mod recording;
pub mod skia;

pub use recording::{Frame, RecordedArtist, RecordingCanvas};
pub use skia::SkiaCanvas;

use std::fmt;

use camino::Utf8Path;

use crate::elevation::ElevationGrid;
use crate::errors::CanvasError;
use crate::style::{AreaStyle, Color, Colormap, ElevationStyle, LabelStyle, WayStyle};
use crate::types::{Extent, PlanarPoint};

/// Handle to something drawn on a canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtistId(pub u32);

/// Encoded output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    /// Guess the format from a path's extension, defaulting to PNG.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("jpg" | "jpeg") => ImageFormat::Jpeg,
            _ => ImageFormat::Png,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A grid of scalar values drawn through a colormap
#[derive(Clone, Copy, Debug)]
pub struct Raster<'a> {
    /// Planar rectangle the raster covers
    pub extent: Extent,
    pub cols: usize,
    pub rows: usize,
    /// Row-major, row 0 at `extent.min.y`; NaN cells are transparent
    pub values: &'a [f64],
    pub colormap: Colormap,
    pub vmin: f64,
    pub vmax: f64,
    pub alpha: f64,
}

impl Raster<'_> {
    /// Color of one cell, `None` for NaN cells.
    pub fn color_at(&self, col: usize, row: usize) -> Option<Color> {
        let v = self.values[row * self.cols + col];
        if v.is_nan() {
            return None;
        }
        let span = self.vmax - self.vmin;
        let t = if span > 0.0 { (v - self.vmin) / span } else { 0.0 };
        let color = self.colormap.sample(t);
        Some(color.with_alpha((f64::from(color.a) * self.alpha.clamp(0.0, 1.0)).round() as u8))
    }
}

/// Drawing surface used by the renderer
///
/// Sizes are figure inches; pixel dimensions are `inches * dpi` at save time.
/// Line widths and font sizes in styles are points (1/72 inch).
pub trait Canvas {
    /// Start a fresh figure, dropping every artist
    fn begin_canvas(&mut self, width: f64, height: f64, background: Color);

    fn draw_polygon(&mut self, points: &[PlanarPoint], style: &AreaStyle) -> ArtistId;

    fn draw_polyline(&mut self, points: &[PlanarPoint], style: &WayStyle) -> ArtistId;

    fn draw_text(&mut self, at: PlanarPoint, text: &str, style: &LabelStyle) -> ArtistId;

    fn draw_raster(&mut self, raster: &Raster<'_>) -> ArtistId;

    /// Contour lines (and labels where supported) of `grid` at the style's levels
    fn draw_contours(&mut self, grid: &ElevationGrid, style: &ElevationStyle) -> ArtistId;

    fn set_visible(&mut self, artist: ArtistId, visible: bool);

    fn remove(&mut self, artist: ArtistId);

    /// Planar rectangle mapped onto the full figure
    fn set_extent(&mut self, extent: Extent);

    /// Rasterize the visible artists through the current extent and write them
    fn save(&mut self, path: &Utf8Path, format: ImageFormat, dpi: u32) -> Result<(), CanvasError>;
}
