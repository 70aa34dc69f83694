//! Render state - the artists one canvas holds for a map

use crate::canvas::{ArtistId, Canvas, Raster};
use crate::elevation::ElevationGrid;
use crate::errors::{CanvasError, ElevationError};
use crate::feature::Plottable;
use crate::map::Map;
use crate::options::TileOptions;
use crate::style::ElevationStyle;
use crate::tiles::TileJob;

/// Elevation layers of a map, resolved once per render
#[derive(Clone, Copy, Debug)]
pub struct Backdrop<'a> {
    pub colormap: Raster<'a>,
    pub hillshade: Raster<'a>,
    pub grid: &'a ElevationGrid,
    pub style: &'a ElevationStyle,
}

impl<'a> Backdrop<'a> {
    /// `None` for maps without elevation; an error if the grid was never
    /// generated.
    pub fn resolve(map: &'a Map) -> Result<Option<Self>, ElevationError> {
        let Some(elevation) = map.elevation() else {
            return Ok(None);
        };
        Ok(Some(Backdrop {
            colormap: elevation.background_raster()?,
            hillshade: elevation.hillshade_raster()?,
            grid: elevation.grid()?,
            style: elevation.style(),
        }))
    }
}

/// Artists drawn for a map on one canvas
///
/// Feature artists are stored in [`Map::features`] order, so the map must not
/// gain features while a plot is alive.
#[derive(Debug)]
pub struct Plot {
    features: Vec<ArtistId>,
    contours: Option<ArtistId>,
}

impl Plot {
    /// Start a `width` x `height` inch figure with the backdrop and every
    /// feature drawn hidden.
    pub fn draw(
        map: &Map,
        backdrop: Option<&Backdrop<'_>>,
        canvas: &mut dyn Canvas,
        width: f64,
        height: f64,
    ) -> Plot {
        canvas.begin_canvas(width, height, map.background());
        if let Some(backdrop) = backdrop {
            canvas.draw_raster(&backdrop.colormap);
            canvas.draw_raster(&backdrop.hillshade);
        }
        let features = map
            .features()
            .map(|f| {
                let id = f.feature().plot(canvas);
                canvas.set_visible(id, false);
                id
            })
            .collect();
        Plot {
            features,
            contours: None,
        }
    }

    /// Mirror the map's current visibility onto the canvas.
    pub fn sync_visibility(&self, map: &Map, canvas: &mut dyn Canvas) {
        for (f, &id) in map.features().zip(&self.features) {
            canvas.set_visible(id, f.is_shown());
        }
    }

    pub fn show_contours(&mut self, backdrop: &Backdrop<'_>, canvas: &mut dyn Canvas) {
        self.remove_contours(canvas);
        self.contours = Some(canvas.draw_contours(backdrop.grid, backdrop.style));
    }

    pub fn remove_contours(&mut self, canvas: &mut dyn Canvas) {
        if let Some(id) = self.contours.take() {
            canvas.remove(id);
        }
    }

    pub fn has_contours(&self) -> bool {
        self.contours.is_some()
    }
}

/// Frame the canvas on one tile and write it, creating its directories.
pub fn render_tile(job: &TileJob, options: &TileOptions, canvas: &mut dyn Canvas) -> Result<(), CanvasError> {
    if let Some(parent) = job.path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CanvasError::Io {
            path: parent.to_owned(),
            source,
        })?;
    }
    canvas.set_extent(job.extent);
    canvas.save(&job.path, options.format, options.dpi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::feature::Way;
    use crate::style::{Color, WayStyle};
    use glam::dvec2;
    use std::sync::Arc;

    #[test]
    fn features_start_hidden_and_follow_the_map() {
        let mut map = Map::new();
        let style = |z| Arc::new(WayStyle::new(z, Color::BLACK));
        map.add(Way::new(vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0)], style(2)));
        map.add(Way::new(vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0)], style(9)));

        let mut canvas = RecordingCanvas::new();
        let plot = Plot::draw(&map, None, &mut canvas, 1.0, 1.0);
        assert!(canvas.artists().iter().all(|(_, _, visible)| !visible));

        map.begin_pass(5);
        plot.sync_visibility(&map, &mut canvas);
        let visible: Vec<bool> = canvas.artists().iter().map(|(_, _, v)| *v).collect();
        assert_eq!(visible, [true, false]);
    }

    #[test]
    fn missing_grid_is_reported() {
        let mut map = Map::new();
        map.add_elevation(crate::elevation::Elevation::new(
            Vec::new(),
            Arc::new(ElevationStyle::default()),
        ));
        assert_eq!(
            Backdrop::resolve(&map).unwrap_err(),
            ElevationError::NotInitialized
        );
        assert!(Backdrop::resolve(&Map::new()).unwrap().is_none());
    }
}
