//! Rendering orchestration
//!
//! This module is organized into submodules:
//! - `context`: the artists a canvas holds for a map, and single-tile output
//! - `report`: per-run tile accounting
//!
//! A tile pyramid run draws every feature once per canvas, then walks the
//! zoom levels: each level shows the features that appear at it, frames the
//! canvas on every covering tile and saves it.

pub mod context;
pub mod report;

pub use context::{Backdrop, Plot, render_tile};
pub use report::{TileFailure, TileReport};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::canvas::Canvas;
use crate::defaults::TILE_SIZE_INCHES;
use crate::errors::{CanvasError, RenderError};
use crate::log::{debug, info};
use crate::map::Map;
use crate::options::{ImageOptions, TileOptions};
use crate::tiles::{TileJob, TileRange};

/// Shared flag for stopping a render between tiles
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Render the tile pyramid on a single canvas.
///
/// Tiles are written under `options.output_dir` as `<zoom>/<x>/<y>.<ext>`.
/// Tiles that fail to save are collected in the report and the run goes on.
/// The map's visibility is left hidden on return.
pub fn draw_zoom_levels(
    map: &mut Map,
    options: &TileOptions,
    canvas: &mut dyn Canvas,
    cancel: &CancellationToken,
) -> Result<TileReport, RenderError> {
    let zooms = options.zoom_range()?;
    let mut plot = {
        let backdrop = Backdrop::resolve(map)?;
        Plot::draw(map, backdrop.as_ref(), canvas, TILE_SIZE_INCHES, TILE_SIZE_INCHES)
    };

    let mut report = TileReport::default();
    for zoom in zooms {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }

        let range = TileRange::covering(map.bounds(), zoom)?;
        let shown = map.begin_pass(zoom);
        plot.sync_visibility(map, canvas);
        if map.contours_visible_at(zoom) {
            if let Some(backdrop) = Backdrop::resolve(map)? {
                plot.show_contours(&backdrop, canvas);
            }
        }

        info!(zoom, tiles = range.len(), features = shown, "rendering zoom level");
        for index in range.iter() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let job = TileJob::new(index, &options.output_dir, options.format);
            let result = render_tile(&job, options, canvas);
            report.record(job.index, job.path, result);
        }

        plot.remove_contours(canvas);
        map.end_pass();
    }

    if report.cancelled {
        info!(rendered = report.rendered, "tile rendering cancelled");
    }
    Ok(report)
}

/// Render the tile pyramid on a rayon pool.
///
/// Same output as [`draw_zoom_levels`]. Each worker draws the map onto its own
/// canvas from `factory`; the map's visibility is only changed between zoom
/// levels.
pub fn draw_zoom_levels_parallel<C, F>(
    map: &mut Map,
    options: &TileOptions,
    factory: F,
    cancel: &CancellationToken,
) -> Result<TileReport, RenderError>
where
    C: Canvas,
    F: Fn() -> C + Sync,
{
    let zooms = options.zoom_range()?;
    Backdrop::resolve(map)?;

    let mut report = TileReport::default();
    for zoom in zooms {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }

        let range = TileRange::covering(map.bounds(), zoom)?;
        let shown = map.begin_pass(zoom);
        let outcomes = {
            let map: &Map = map;
            let backdrop = Backdrop::resolve(map)?;
            let contours = map.contours_visible_at(zoom);
            info!(zoom, tiles = range.len(), features = shown, "rendering zoom level");

            let jobs = TileJob::for_range(&range, &options.output_dir, options.format);
            jobs.into_par_iter()
                .map_init(
                    || {
                        let mut canvas = factory();
                        let mut plot =
                            Plot::draw(map, backdrop.as_ref(), &mut canvas, TILE_SIZE_INCHES, TILE_SIZE_INCHES);
                        plot.sync_visibility(map, &mut canvas);
                        if let (true, Some(backdrop)) = (contours, backdrop.as_ref()) {
                            plot.show_contours(backdrop, &mut canvas);
                        }
                        debug!(zoom, "prepared worker canvas");
                        (canvas, plot)
                    },
                    |(canvas, _plot), job| {
                        if cancel.is_cancelled() {
                            return None;
                        }
                        let result = render_tile(&job, options, canvas);
                        Some((job, result))
                    },
                )
                .collect::<Vec<Option<(TileJob, Result<(), CanvasError>)>>>()
        };
        map.end_pass();

        for outcome in outcomes {
            match outcome {
                Some((job, result)) => report.record(job.index, job.path, result),
                None => report.cancelled = true,
            }
        }
        if report.cancelled {
            break;
        }
    }

    if report.cancelled {
        info!(rendered = report.rendered, "tile rendering cancelled");
    }
    Ok(report)
}

/// Render the whole map as one image.
///
/// The figure is one inch tall and as wide as the bounds' aspect ratio; every
/// feature is shown and contours are drawn when the map has elevation.
pub fn draw_image(map: &mut Map, options: &ImageOptions, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
    map.show_all();
    let result = plot_image(map, options, canvas);
    map.reset_visibility();
    result
}

fn plot_image(map: &Map, options: &ImageOptions, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
    let backdrop = Backdrop::resolve(map)?;
    let mut plot = Plot::draw(map, backdrop.as_ref(), canvas, map.bounds().aspect_ratio(), 1.0);
    plot.sync_visibility(map, canvas);
    if let Some(backdrop) = &backdrop {
        plot.show_contours(backdrop, canvas);
    }

    if let Some(parent) = options.path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CanvasError::Io {
            path: parent.to_owned(),
            source,
        })?;
    }
    canvas.set_extent(*map.bounds().projected());
    canvas.save(&options.path, options.format, options.dpi)?;
    info!(path = %options.path, dpi = options.dpi, "rendered map image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
