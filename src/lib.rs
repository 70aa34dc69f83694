//! Slippy-map tile rendering.
//!
//! Features (areas, ways, nodes, labels) and an optional elevation layer are
//! projected to spherical Web Mercator, culled against the map bounds when
//! added, and rendered per zoom level into a `<zoom>/<x>/<y>.<ext>` tile tree
//! or into a single whole-map image.
//!
//! ```no_run
//! use std::sync::Arc;
//! use cartograph::{Map, TileOptions, CancellationToken, SkiaCanvas, GeoPoint};
//! use cartograph::style::{Color, WayStyle};
//!
//! # fn main() -> miette::Result<()> {
//! let mut map = Map::new();
//! map.set_by_box(51.0, 52.0, -1.0, 1.0)?;
//! let road = Arc::new(WayStyle::new(8, Color::BLACK));
//! map.add_way(&[GeoPoint::new(51.5, -0.5), GeoPoint::new(51.6, 0.4)], road)?;
//!
//! let options = TileOptions::new("tiles").with_zooms(8, Some(11));
//! let report = cartograph::render::draw_zoom_levels(
//!     &mut map,
//!     &options,
//!     &mut SkiaCanvas::new(),
//!     &CancellationToken::new(),
//! )?;
//! assert!(report.is_complete());
//! # Ok(())
//! # }
//! ```

pub mod bounds;
pub mod canvas;
pub mod defaults;
pub mod elevation;
pub mod errors;
pub mod feature;
pub mod log;
pub mod map;
pub mod options;
pub mod projection;
pub mod render;
pub mod style;
pub mod tiles;
pub mod types;

pub use bounds::Bounds;
pub use canvas::{Canvas, ImageFormat, RecordingCanvas, SkiaCanvas};
pub use elevation::{Elevation, ElevationGrid, GridResolution};
pub use errors::{BoundsError, CanvasError, ElevationError, ProjectionError, RenderError, StyleError};
pub use feature::{Area, Feature, Label, Node, Plottable, Way};
pub use map::{Insertion, Map};
pub use options::{ImageOptions, TileOptions};
pub use render::{CancellationToken, TileReport};
pub use tiles::{TileJob, TileRange};
pub use types::{Extent, GeoPoint, PlanarPoint, TileIndex};
