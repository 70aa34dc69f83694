//! In-memory backend that records draw calls and saved frames.
//!
//! Frames go to a shared log so canvases created on worker threads can be
//! inspected after a parallel render.

use std::collections::BTreeSet;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;

use super::{ArtistId, Canvas, ImageFormat, Raster};
use crate::elevation::ElevationGrid;
use crate::errors::CanvasError;
use crate::style::{AreaStyle, Color, ElevationStyle, LabelStyle, WayStyle};
use crate::types::{Extent, PlanarPoint};

/// What an artist was drawn as
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedArtist {
    Polygon { points: usize, color: Color },
    Polyline { points: usize, color: Color },
    Text { text: String },
    Raster { cols: usize, rows: usize },
    /// `labelled` levels carry `font_size` point labels
    Contours { levels: usize, labelled: usize, font_size: f64 },
}

impl RecordedArtist {
    /// Short description used in frame listings
    pub fn describe(&self) -> String {
        match self {
            RecordedArtist::Polygon { points, .. } => format!("polygon[{points}]"),
            RecordedArtist::Polyline { points, .. } => format!("polyline[{points}]"),
            RecordedArtist::Text { text } => format!("text[{text}]"),
            RecordedArtist::Raster { cols, rows } => format!("raster[{cols}x{rows}]"),
            RecordedArtist::Contours { levels, labelled, .. } => {
                format!("contours[{levels}, {labelled} labelled]")
            }
        }
    }
}

/// One `save` call
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub path: Utf8PathBuf,
    pub format: ImageFormat,
    pub dpi: u32,
    pub extent: Option<Extent>,
    /// Figure size in pixels
    pub size: (u32, u32),
    /// Descriptions of the artists visible at save time, in draw order
    pub visible: Vec<String>,
}

#[derive(Debug)]
struct Slot {
    artist: RecordedArtist,
    visible: bool,
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    slots: Vec<Option<Slot>>,
    figure: (f64, f64),
    background: Option<Color>,
    extent: Option<Extent>,
    frames: Arc<Mutex<Vec<Frame>>>,
    failing: BTreeSet<Utf8PathBuf>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas appending to an existing frame log
    pub fn with_log(frames: Arc<Mutex<Vec<Frame>>>) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }

    /// Make `save` fail for these paths
    pub fn failing_on(mut self, paths: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        self.failing.extend(paths);
        self
    }

    /// Shared frame log
    pub fn log(&self) -> Arc<Mutex<Vec<Frame>>> {
        Arc::clone(&self.frames)
    }

    /// Snapshot of every frame saved so far
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().clone()
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    /// Live artists (visible or not), in draw order
    pub fn artists(&self) -> Vec<(ArtistId, &RecordedArtist, bool)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref()
                    .map(|s| (ArtistId(i as u32), &s.artist, s.visible))
            })
            .collect()
    }

    fn push(&mut self, artist: RecordedArtist) -> ArtistId {
        let id = ArtistId(self.slots.len() as u32);
        self.slots.push(Some(Slot {
            artist,
            visible: true,
        }));
        id
    }

    fn slot_mut(&mut self, artist: ArtistId) -> Option<&mut Slot> {
        self.slots.get_mut(artist.0 as usize).and_then(Option::as_mut)
    }
}

impl Canvas for RecordingCanvas {
    fn begin_canvas(&mut self, width: f64, height: f64, background: Color) {
        self.slots.clear();
        self.figure = (width, height);
        self.background = Some(background);
        self.extent = None;
    }

    fn draw_polygon(&mut self, points: &[PlanarPoint], style: &AreaStyle) -> ArtistId {
        self.push(RecordedArtist::Polygon {
            points: points.len(),
            color: style.color,
        })
    }

    fn draw_polyline(&mut self, points: &[PlanarPoint], style: &WayStyle) -> ArtistId {
        self.push(RecordedArtist::Polyline {
            points: points.len(),
            color: style.color,
        })
    }

    fn draw_text(&mut self, _at: PlanarPoint, text: &str, _style: &LabelStyle) -> ArtistId {
        self.push(RecordedArtist::Text { text: text.to_string() })
    }

    fn draw_raster(&mut self, raster: &Raster<'_>) -> ArtistId {
        self.push(RecordedArtist::Raster {
            cols: raster.cols,
            rows: raster.rows,
        })
    }

    fn draw_contours(&mut self, _grid: &ElevationGrid, style: &ElevationStyle) -> ArtistId {
        let labelled = style
            .label_levels
            .iter()
            .filter(|level| style.contour_levels.contains(level))
            .count();
        self.push(RecordedArtist::Contours {
            levels: style.contour_levels.len(),
            labelled,
            font_size: style.label_font_size,
        })
    }

    fn set_visible(&mut self, artist: ArtistId, visible: bool) {
        if let Some(slot) = self.slot_mut(artist) {
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
        if self.failing.contains(path) {
            return Err(CanvasError::Rejected {
                path: path.to_owned(),
                reason: "configured to fail".to_string(),
            });
        }
        let px = |inches: f64| (inches * f64::from(dpi)).round() as u32;
        let frame = Frame {
            path: path.to_owned(),
            format,
            dpi,
            extent: self.extent,
            size: (px(self.figure.0), px(self.figure.1)),
            visible: self
                .slots
                .iter()
                .flatten()
                .filter(|s| s.visible)
                .map(|s| s.artist.describe())
                .collect(),
        };
        self.frames.lock().push(frame);
        Ok(())
    }
}
