//! Map features
//!
//! Each feature kind is its own type that knows how to:
//! - Report the zoom level it appears at
//! - Decide whether it survives culling against the map bounds
//! - Plot itself onto a canvas

use std::sync::Arc;

use enum_dispatch::enum_dispatch;

use crate::bounds::Bounds;
use crate::canvas::{ArtistId, Canvas};
use crate::errors::ProjectionError;
use crate::projection::{to_planar, to_planar_all};
use crate::style::{AreaStyle, LabelStyle, NodeStyle, WayStyle};
use crate::types::{GeoPoint, PlanarPoint};

/// Common behavior for all feature kinds
#[enum_dispatch]
pub trait Plottable {
    /// Minimum zoom level at which the feature is shown
    fn appears_at(&self) -> u8;

    /// Projected geometry
    fn points(&self) -> &[PlanarPoint];

    /// Whether the feature is kept when inserted into a map with `bounds`
    fn in_bounds(&self, bounds: &Bounds) -> bool {
        bounds.contains_any(self.points())
    }

    /// Draw the feature, returning the backend handle
    fn plot(&self, canvas: &mut dyn Canvas) -> ArtistId;
}

/// Which layer a feature belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Area,
    Way,
    Node,
    Label,
}

/// Any plottable feature
#[enum_dispatch(Plottable)]
#[derive(Debug, Clone)]
pub enum Feature {
    Area,
    Way,
    Node,
    Label,
}

impl Feature {
    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Area(_) => FeatureKind::Area,
            Feature::Way(_) => FeatureKind::Way,
            Feature::Node(_) => FeatureKind::Node,
            Feature::Label(_) => FeatureKind::Label,
        }
    }
}

// ============================================================================
// Feature Types
// ============================================================================

/// A filled polygon
#[derive(Debug, Clone)]
pub struct Area {
    pub boundary: Vec<PlanarPoint>,
    pub style: Arc<AreaStyle>,
}

impl Area {
    pub fn new(boundary: Vec<PlanarPoint>, style: Arc<AreaStyle>) -> Self {
        Self { boundary, style }
    }

    /// Project a geographic ring
    pub fn from_geo(boundary: &[GeoPoint], style: Arc<AreaStyle>) -> Result<Self, ProjectionError> {
        Ok(Self::new(to_planar_all(boundary)?, style))
    }
}

impl Plottable for Area {
    fn appears_at(&self) -> u8 {
        self.style.appears_at
    }

    fn points(&self) -> &[PlanarPoint] {
        &self.boundary
    }

    fn plot(&self, canvas: &mut dyn Canvas) -> ArtistId {
        canvas.draw_polygon(&self.boundary, &self.style)
    }
}

/// An open polyline (road, river, path)
#[derive(Debug, Clone)]
pub struct Way {
    pub vertices: Vec<PlanarPoint>,
    pub style: Arc<WayStyle>,
}

impl Way {
    pub fn new(vertices: Vec<PlanarPoint>, style: Arc<WayStyle>) -> Self {
        Self { vertices, style }
    }

    pub fn from_geo(vertices: &[GeoPoint], style: Arc<WayStyle>) -> Result<Self, ProjectionError> {
        Ok(Self::new(to_planar_all(vertices)?, style))
    }
}

impl Plottable for Way {
    fn appears_at(&self) -> u8 {
        self.style.appears_at
    }

    fn points(&self) -> &[PlanarPoint] {
        &self.vertices
    }

    fn plot(&self, canvas: &mut dyn Canvas) -> ArtistId {
        canvas.draw_polyline(&self.vertices, &self.style)
    }
}

/// A point of interest drawn as its style's glyph
#[derive(Debug, Clone)]
pub struct Node {
    pub location: PlanarPoint,
    pub style: Arc<NodeStyle>,
}

impl Node {
    pub fn new(location: PlanarPoint, style: Arc<NodeStyle>) -> Self {
        Self { location, style }
    }

    pub fn from_geo(location: GeoPoint, style: Arc<NodeStyle>) -> Result<Self, ProjectionError> {
        Ok(Self::new(to_planar(location.lat, location.lon)?, style))
    }
}

impl Plottable for Node {
    fn appears_at(&self) -> u8 {
        self.style.label.appears_at
    }

    fn points(&self) -> &[PlanarPoint] {
        std::slice::from_ref(&self.location)
    }

    // Text can overlap the bounds even when its anchor does not.
    fn in_bounds(&self, _bounds: &Bounds) -> bool {
        true
    }

    fn plot(&self, canvas: &mut dyn Canvas) -> ArtistId {
        canvas.draw_text(self.location, &self.style.text, &self.style.label)
    }
}

/// A text label anchored at a point
#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    pub location: PlanarPoint,
    pub style: Arc<LabelStyle>,
}

impl Label {
    pub fn new(text: impl Into<String>, location: PlanarPoint, style: Arc<LabelStyle>) -> Self {
        Self {
            text: text.into(),
            location,
            style,
        }
    }

    pub fn from_geo(
        text: impl Into<String>,
        location: GeoPoint,
        style: Arc<LabelStyle>,
    ) -> Result<Self, ProjectionError> {
        Ok(Self::new(text, to_planar(location.lat, location.lon)?, style))
    }
}

impl Plottable for Label {
    fn appears_at(&self) -> u8 {
        self.style.appears_at
    }

    fn points(&self) -> &[PlanarPoint] {
        std::slice::from_ref(&self.location)
    }

    fn in_bounds(&self, _bounds: &Bounds) -> bool {
        true
    }

    fn plot(&self, canvas: &mut dyn Canvas) -> ArtistId {
        canvas.draw_text(self.location, &self.text, &self.style)
    }
}
