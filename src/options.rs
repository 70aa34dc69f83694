//! Output settings for tile pyramids and whole-map images.

use std::ops::Range;

use camino::{Utf8Path, Utf8PathBuf};

use crate::canvas::ImageFormat;
use crate::defaults;
use crate::errors::RenderError;

/// Settings for [`draw_zoom_levels`](crate::render::draw_zoom_levels)
#[derive(Clone, Debug, PartialEq)]
pub struct TileOptions {
    /// Root of the `<zoom>/<x>/<y>.<ext>` tree
    pub output_dir: Utf8PathBuf,
    pub min_zoom: u8,
    /// Exclusive; `None` renders `min_zoom` only
    pub max_zoom: Option<u8>,
    pub dpi: u32,
    pub format: ImageFormat,
}

impl Default for TileOptions {
    fn default() -> Self {
        Self::new(defaults::TILE_DIR)
    }
}

impl TileOptions {
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            min_zoom: 0,
            max_zoom: None,
            dpi: defaults::TILE_DPI,
            format: ImageFormat::Png,
        }
    }

    pub fn with_zooms(mut self, min: u8, max: Option<u8>) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Zoom levels to render, validated.
    pub fn zoom_range(&self) -> Result<Range<u8>, RenderError> {
        let min = self.min_zoom;
        let max = self.max_zoom.unwrap_or(min.saturating_add(1));
        if min >= max || max > defaults::MAX_ZOOM + 1 {
            return Err(RenderError::InvalidZoomRange { min, max });
        }
        Ok(min..max)
    }
}

/// Settings for [`draw_image`](crate::render::draw_image)
#[derive(Clone, Debug, PartialEq)]
pub struct ImageOptions {
    pub path: Utf8PathBuf,
    pub dpi: u32,
    pub format: ImageFormat,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self::new(defaults::IMAGE_PATH)
    }
}

impl ImageOptions {
    /// Output at `path`, with the format taken from its extension.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        let format = ImageFormat::from_path(&path);
        Self {
            path,
            dpi: defaults::IMAGE_DPI,
            format,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tile_conventions() {
        let options = TileOptions::default();
        assert_eq!(options.output_dir, Utf8PathBuf::from("tiles"));
        assert_eq!(options.dpi, 256);
        assert_eq!(options.zoom_range().unwrap(), 0..1);

        let image = ImageOptions::default();
        assert_eq!(image.dpi, 1024);
        assert_eq!(image.format, ImageFormat::Png);
    }

    #[test]
    fn zoom_range_is_half_open() {
        let options = TileOptions::new("t").with_zooms(3, Some(6));
        assert_eq!(options.zoom_range().unwrap(), 3..6);
        let options = TileOptions::new("t").with_zooms(24, None);
        assert_eq!(options.zoom_range().unwrap(), 24..25);
    }

    #[test]
    fn bad_zoom_ranges_are_rejected() {
        for (min, max) in [(5, Some(5)), (6, Some(2)), (0, Some(26)), (25, None)] {
            let options = TileOptions::new("t").with_zooms(min, max);
            assert!(
                matches!(options.zoom_range(), Err(RenderError::InvalidZoomRange { .. })),
                "{min}..{max:?}"
            );
        }
    }

    #[test]
    fn image_format_follows_path() {
        assert_eq!(ImageOptions::new("overview.jpeg").format, ImageFormat::Jpeg);
    }
}
