//! Raster backend on `tiny-skia`
//!
//! Artists are kept as planar geometry and only rasterized on `save`, so the
//! same canvas can be re-framed and saved once per tile. Text has no font
//! engine behind it: labels are drawn as anchor dots and contour labels are
//! skipped.

use camino::Utf8Path;
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, StrokeDash,
    Transform,
};

use super::contour::contour_segments;
use super::{ArtistId, Canvas, ImageFormat, Raster};
use crate::elevation::ElevationGrid;
use crate::errors::CanvasError;
use crate::log::debug;
use crate::style::{AreaStyle, Color, ElevationStyle, LabelStyle, Marker, WayStyle};
use crate::types::{Extent, PlanarPoint};

const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug)]
enum Artist {
    Polygon {
        points: Vec<PlanarPoint>,
        style: AreaStyle,
    },
    Polyline {
        points: Vec<PlanarPoint>,
        style: WayStyle,
    },
    Text {
        at: PlanarPoint,
        style: LabelStyle,
    },
    Raster {
        extent: Extent,
        cols: usize,
        rows: usize,
        cells: Vec<Option<Color>>,
    },
    Contours {
        /// One batch of segments per level
        lines: Vec<Vec<[PlanarPoint; 2]>>,
        color: Color,
        width: f64,
    },
}

#[derive(Debug)]
struct Slot {
    artist: Artist,
    visible: bool,
}

/// Planar to pixel mapping for one save
struct Frame {
    extent: Extent,
    width: f64,
    height: f64,
    dpi: f64,
}

impl Frame {
    fn px(&self, p: PlanarPoint) -> (f32, f32) {
        let x = (p.x - self.extent.min.x) / self.extent.width() * self.width;
        let y = (self.extent.max.y - p.y) / self.extent.height() * self.height;
        (x as f32, y as f32)
    }

    /// Points to pixels
    fn pt(&self, points: f64) -> f32 {
        (points * self.dpi / POINTS_PER_INCH) as f32
    }
}

#[derive(Debug)]
pub struct SkiaCanvas {
    slots: Vec<Option<Slot>>,
    width: f64,
    height: f64,
    background: Color,
    extent: Option<Extent>,
}

impl Default for SkiaCanvas {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            width: 1.0,
            height: 1.0,
            background: Color::WHITE,
            extent: None,
        }
    }
}

impl SkiaCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, artist: Artist) -> ArtistId {
        let id = ArtistId(self.slots.len() as u32);
        self.slots.push(Some(Slot {
            artist,
            visible: true,
        }));
        id
    }

    /// Rasterize the visible artists at `dpi`
    pub fn render(&self, dpi: u32) -> Result<Pixmap, CanvasError> {
        let width = (self.width * f64::from(dpi)).round() as u32;
        let height = (self.height * f64::from(dpi)).round() as u32;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidSize { width, height })?;
        pixmap.fill(skia_color(self.background));

        let frame = Frame {
            extent: self.extent.unwrap_or(Extent {
                min: PlanarPoint::ZERO,
                max: PlanarPoint::new(f64::from(width), f64::from(height)),
            }),
            width: f64::from(width),
            height: f64::from(height),
            dpi: f64::from(dpi),
        };
        for slot in self.slots.iter().flatten().filter(|s| s.visible) {
            draw_artist(&mut pixmap, &frame, &slot.artist);
        }
        Ok(pixmap)
    }
}

impl Canvas for SkiaCanvas {
    fn begin_canvas(&mut self, width: f64, height: f64, background: Color) {
        self.slots.clear();
        self.width = width;
        self.height = height;
        self.background = background;
        self.extent = None;
    }

    fn draw_polygon(&mut self, points: &[PlanarPoint], style: &AreaStyle) -> ArtistId {
        self.push(Artist::Polygon {
            points: points.to_vec(),
            style: style.clone(),
        })
    }

    fn draw_polyline(&mut self, points: &[PlanarPoint], style: &WayStyle) -> ArtistId {
        self.push(Artist::Polyline {
            points: points.to_vec(),
            style: style.clone(),
        })
    }

    fn draw_text(&mut self, at: PlanarPoint, _text: &str, style: &LabelStyle) -> ArtistId {
        self.push(Artist::Text {
            at,
            style: style.clone(),
        })
    }

    fn draw_raster(&mut self, raster: &Raster<'_>) -> ArtistId {
        let mut cells = Vec::with_capacity(raster.cols * raster.rows);
        for row in 0..raster.rows {
            for col in 0..raster.cols {
                cells.push(raster.color_at(col, row));
            }
        }
        self.push(Artist::Raster {
            extent: raster.extent,
            cols: raster.cols,
            rows: raster.rows,
            cells,
        })
    }

    fn draw_contours(&mut self, grid: &ElevationGrid, style: &ElevationStyle) -> ArtistId {
        let lines = style
            .contour_levels
            .iter()
            .map(|&level| contour_segments(grid, level))
            .filter(|segments| !segments.is_empty())
            .collect::<Vec<_>>();
        debug!(levels = lines.len(), "traced contours");
        self.push(Artist::Contours {
            lines,
            color: style.contour_color,
            width: style.contour_width,
        })
    }

    fn set_visible(&mut self, artist: ArtistId, visible: bool) {
        if let Some(Some(slot)) = self.slots.get_mut(artist.0 as usize) {
            slot.visible = visible;
        }
    }

    fn remove(&mut self, artist: ArtistId) {
        if let Some(slot) = self.slots.get_mut(artist.0 as usize) {
            *slot = None;
        }
    }

    fn set_extent(&mut self, extent: Extent) {
        self.extent = Some(extent);
    }

    fn save(&mut self, path: &Utf8Path, format: ImageFormat, dpi: u32) -> Result<(), CanvasError> {
        let pixmap = self.render(dpi)?;
        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let image = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba).ok_or(
            CanvasError::InvalidSize {
                width: pixmap.width(),
                height: pixmap.height(),
            },
        )?;

        let result = match format {
            ImageFormat::Png => image.save_with_format(path, image::ImageFormat::Png),
            ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(image)
                .to_rgb8()
                .save_with_format(path, image::ImageFormat::Jpeg),
        };
        result.map_err(|source| match source {
            image::ImageError::IoError(source) => CanvasError::Io {
                path: path.to_owned(),
                source,
            },
            source => CanvasError::Encode {
                path: path.to_owned(),
                source,
            },
        })
    }
}

fn skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn paint_for(c: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(c.r, c.g, c.b, c.a);
    paint.anti_alias = true;
    paint
}

fn build_path(frame: &Frame, points: &[PlanarPoint], close: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    let (x, y) = frame.px(*first);
    pb.move_to(x, y);
    for p in rest {
        let (x, y) = frame.px(*p);
        pb.line_to(x, y);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

fn draw_artist(pixmap: &mut Pixmap, frame: &Frame, artist: &Artist) {
    match artist {
        Artist::Polygon { points, style } => {
            let Some(path) = build_path(frame, points, true) else {
                return;
            };
            let paint = paint_for(style.color);
            if style.fill {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            } else {
                let stroke = Stroke {
                    width: 1.0,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        Artist::Polyline { points, style } => {
            let paint = paint_for(style.color);
            if let Some(path) = build_path(frame, points, false) {
                let width = frame.pt(style.line_width).max(0.5);
                let dash = style.line_style.dash_pattern().and_then(|pattern| {
                    StrokeDash::new(pattern.iter().map(|d| *d as f32 * width).collect(), 0.0)
                });
                let stroke = Stroke {
                    width,
                    dash,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
            if let Some(marker) = style.marker {
                let size = frame.pt(style.marker_size).max(1.0);
                for p in points {
                    let (x, y) = frame.px(*p);
                    let shape = match marker {
                        Marker::Circle => PathBuilder::from_circle(x, y, size / 2.0),
                        Marker::Square => Rect::from_xywh(x - size / 2.0, y - size / 2.0, size, size)
                            .map(PathBuilder::from_rect),
                    };
                    if let Some(shape) = shape {
                        pixmap.fill_path(&shape, &paint, FillRule::Winding, Transform::identity(), None);
                    }
                }
            }
        }
        Artist::Text { at, style } => {
            let (x, y) = frame.px(*at);
            let radius = (frame.pt(style.font_size) / 4.0).max(1.0);
            if let Some(dot) = PathBuilder::from_circle(x, y, radius) {
                pixmap.fill_path(&dot, &paint_for(style.color), FillRule::Winding, Transform::identity(), None);
            }
        }
        Artist::Raster {
            extent,
            cols,
            rows,
            cells,
        } => {
            let Some(mut image) = Pixmap::new(*cols as u32, *rows as u32) else {
                return;
            };
            // Raster rows run bottom-up, pixmap rows top-down
            let pixels = image.pixels_mut();
            for row in 0..*rows {
                for col in 0..*cols {
                    let color = cells[row * cols + col].unwrap_or(Color::TRANSPARENT);
                    pixels[(rows - 1 - row) * cols + col] =
                        tiny_skia::ColorU8::from_rgba(color.r, color.g, color.b, color.a).premultiply();
                }
            }
            let (left, top) = frame.px(PlanarPoint::new(extent.min.x, extent.max.y));
            let (right, bottom) = frame.px(PlanarPoint::new(extent.max.x, extent.min.y));
            let transform = Transform::from_row(
                (right - left) / *cols as f32,
                0.0,
                0.0,
                (bottom - top) / *rows as f32,
                left,
                top,
            );
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
        }
        Artist::Contours {
            lines,
            color,
            width,
        } => {
            let paint = paint_for(*color);
            let stroke = Stroke {
                width: frame.pt(*width).max(0.5),
                ..Stroke::default()
            };
            for segments in lines {
                let mut pb = PathBuilder::new();
                for [a, b] in segments {
                    let (ax, ay) = frame.px(*a);
                    let (bx, by) = frame.px(*b);
                    pb.move_to(ax, ay);
                    pb.line_to(bx, by);
                }
                if let Some(path) = pb.finish() {
                    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let c = pixmap.pixel(x, y).unwrap().demultiply();
        (c.red(), c.green(), c.blue(), c.alpha())
    }

    #[test]
    fn polygon_fills_through_extent() {
        let mut canvas = SkiaCanvas::new();
        canvas.begin_canvas(1.0, 1.0, Color::WHITE);
        // Lower-left quarter of the extent
        let square = [dvec2(0.0, 0.0), dvec2(5.0, 0.0), dvec2(5.0, 5.0), dvec2(0.0, 5.0)];
        canvas.draw_polygon(&square, &AreaStyle::new(0, Color::rgb(255, 0, 0)));
        canvas.set_extent(Extent::from_corners(dvec2(0.0, 0.0), dvec2(10.0, 10.0)));

        let pixmap = canvas.render(64).unwrap();
        assert_eq!(pixmap.width(), 64);
        assert_eq!(pixel(&pixmap, 10, 54), (255, 0, 0, 255));
        assert_eq!(pixel(&pixmap, 54, 10), (255, 255, 255, 255));
    }

    #[test]
    fn hidden_artists_are_not_drawn() {
        let mut canvas = SkiaCanvas::new();
        canvas.begin_canvas(1.0, 1.0, Color::WHITE);
        let square = [dvec2(0.0, 0.0), dvec2(10.0, 0.0), dvec2(10.0, 10.0), dvec2(0.0, 10.0)];
        let id = canvas.draw_polygon(&square, &AreaStyle::new(0, Color::BLACK));
        canvas.set_extent(Extent::from_corners(dvec2(0.0, 0.0), dvec2(10.0, 10.0)));
        canvas.set_visible(id, false);

        let pixmap = canvas.render(16).unwrap();
        assert_eq!(pixel(&pixmap, 8, 8), (255, 255, 255, 255));
    }

    #[test]
    fn zero_sized_figure_is_rejected() {
        let mut canvas = SkiaCanvas::new();
        canvas.begin_canvas(0.0, 1.0, Color::WHITE);
        assert!(matches!(
            canvas.render(100),
            Err(CanvasError::InvalidSize { width: 0, height: 100 })
        ));
    }
}
