//! Map assembly: feature layers, bounds, elevation and per-zoom visibility.

use std::sync::Arc;

use crate::bounds::Bounds;
use crate::elevation::{Elevation, GridResolution};
use crate::errors::{BoundsError, ElevationError, ProjectionError};
use crate::feature::{Area, Feature, FeatureKind, Label, Node, Plottable, Way};
use crate::log::{debug, warn};
use crate::style::{AreaStyle, Color, LabelStyle, NodeStyle, WayStyle};
use crate::types::GeoPoint;

/// Outcome of adding a feature
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    Kept,
    /// Entirely outside the map bounds, dropped
    Culled,
}

/// Per-pass visibility of a feature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

/// A feature owned by a map, with its visibility for the current pass
#[derive(Debug, Clone)]
pub struct MapFeature {
    feature: Feature,
    visibility: Visibility,
}

impl MapFeature {
    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_shown(&self) -> bool {
        self.visibility == Visibility::Shown
    }
}

/// Collection of features to render
///
/// Features are culled against the bounds once, when added. Changing the
/// bounds afterwards does not revisit features already held.
#[derive(Debug, Clone)]
pub struct Map {
    areas: Vec<MapFeature>,
    ways: Vec<MapFeature>,
    nodes: Vec<MapFeature>,
    labels: Vec<MapFeature>,
    elevation: Option<Elevation>,
    bounds: Bounds,
    background: Color,
}

impl Default for Map {
    fn default() -> Self {
        Self {
            areas: Vec::new(),
            ways: Vec::new(),
            nodes: Vec::new(),
            labels: Vec::new(),
            elevation: None,
            bounds: Bounds::world(),
            background: Color::WHITE,
        }
    }
}

impl Map {
    /// An empty map over the whole world on a white background.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn elevation(&self) -> Option<&Elevation> {
        self.elevation.as_ref()
    }

    /// Number of features held, across all layers.
    pub fn len(&self) -> usize {
        self.areas.len() + self.ways.len() + self.nodes.len() + self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    /// Bound the map by a geographic box in degrees.
    pub fn set_by_box(&mut self, bottom: f64, top: f64, left: f64, right: f64) -> Result<(), BoundsError> {
        let bounds = Bounds::from_box(bottom, top, left, right)?;
        self.set_bounds(bounds);
        Ok(())
    }

    /// Bound the map by the tiles covering `points` at `zoom`.
    pub fn set_by_tile_cover(&mut self, zoom: u8, points: &[GeoPoint]) -> Result<(), BoundsError> {
        let bounds = Bounds::from_tile_cover(zoom, points)?;
        self.set_bounds(bounds);
        Ok(())
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        if !self.is_empty() {
            warn!(
                features = self.len(),
                "bounds changed after features were added; existing features are not re-culled"
            );
        }
        self.bounds = bounds;
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Add a projected feature, dropping it if it lies outside the bounds.
    pub fn add(&mut self, feature: impl Into<Feature>) -> Insertion {
        let feature = feature.into();
        if !feature.in_bounds(&self.bounds) {
            debug!(kind = ?feature.kind(), "culled feature outside bounds");
            return Insertion::Culled;
        }
        let layer = match feature.kind() {
            FeatureKind::Area => &mut self.areas,
            FeatureKind::Way => &mut self.ways,
            FeatureKind::Node => &mut self.nodes,
            FeatureKind::Label => &mut self.labels,
        };
        layer.push(MapFeature {
            feature,
            visibility: Visibility::Hidden,
        });
        Insertion::Kept
    }

    pub fn add_area(
        &mut self,
        boundary: &[GeoPoint],
        style: Arc<AreaStyle>,
    ) -> Result<Insertion, ProjectionError> {
        Ok(self.add(Area::from_geo(boundary, style)?))
    }

    pub fn add_way(
        &mut self,
        vertices: &[GeoPoint],
        style: Arc<WayStyle>,
    ) -> Result<Insertion, ProjectionError> {
        Ok(self.add(Way::from_geo(vertices, style)?))
    }

    pub fn add_node(&mut self, location: GeoPoint, style: Arc<NodeStyle>) -> Result<Insertion, ProjectionError> {
        Ok(self.add(Node::from_geo(location, style)?))
    }

    pub fn add_label(
        &mut self,
        text: impl Into<String>,
        location: GeoPoint,
        style: Arc<LabelStyle>,
    ) -> Result<Insertion, ProjectionError> {
        Ok(self.add(Label::from_geo(text, location, style)?))
    }

    /// Attach an elevation layer, replacing any previous one.
    pub fn add_elevation(&mut self, elevation: Elevation) {
        self.elevation = Some(elevation);
    }

    /// Interpolate the elevation samples onto a grid over the current bounds.
    pub fn generate_elevation_grid(
        &mut self,
        resolution: GridResolution,
        padding: f64,
    ) -> Result<(), ElevationError> {
        let elevation = self.elevation.as_mut().ok_or(ElevationError::NotInitialized)?;
        elevation.generate_grid(&self.bounds, resolution, padding)?;
        Ok(())
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Every feature in draw order: areas, ways, nodes, labels.
    pub fn features(&self) -> impl Iterator<Item = &MapFeature> {
        self.areas
            .iter()
            .chain(&self.ways)
            .chain(&self.nodes)
            .chain(&self.labels)
    }

    fn features_mut(&mut self) -> impl Iterator<Item = &mut MapFeature> {
        self.areas
            .iter_mut()
            .chain(&mut self.ways)
            .chain(&mut self.nodes)
            .chain(&mut self.labels)
    }

    /// Start a render pass at `zoom`: hide everything, then show the features
    /// that appear at or below it. Returns how many are shown.
    pub fn begin_pass(&mut self, zoom: u8) -> usize {
        let mut shown = 0;
        for f in self.features_mut() {
            f.visibility = if zoom >= f.feature.appears_at() {
                shown += 1;
                Visibility::Shown
            } else {
                Visibility::Hidden
            };
        }
        shown
    }

    /// Finish a render pass, hiding everything.
    pub fn end_pass(&mut self) {
        self.reset_visibility();
    }

    pub fn reset_visibility(&mut self) {
        for f in self.features_mut() {
            f.visibility = Visibility::Hidden;
        }
    }

    /// Show every feature regardless of zoom.
    pub fn show_all(&mut self) {
        for f in self.features_mut() {
            f.visibility = Visibility::Shown;
        }
    }

    /// Whether contours belong on a pass at `zoom`.
    pub fn contours_visible_at(&self, zoom: u8) -> bool {
        self.elevation
            .as_ref()
            .is_some_and(|e| e.style().contours_visible_at(zoom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ElevationStyle;
    use glam::dvec2;

    fn way(appears_at: u8, points: &[(f64, f64)]) -> Way {
        Way::new(
            points.iter().map(|&(x, y)| dvec2(x, y)).collect(),
            Arc::new(WayStyle::new(appears_at, Color::BLACK)),
        )
    }

    fn small_map() -> Map {
        let mut map = Map::new();
        map.set_by_box(-1.0, 1.0, -1.0, 1.0).unwrap();
        map
    }

    #[test]
    fn default_map_covers_world() {
        let map = Map::new();
        assert_eq!(map.bounds(), &Bounds::world());
        assert_eq!(map.background(), Color::WHITE);
        assert!(map.is_empty());
    }

    #[test]
    fn culls_features_outside_bounds() {
        let mut map = small_map();
        let style = Arc::new(AreaStyle::default());
        let inside = [GeoPoint::new(0.0, 0.0), GeoPoint::new(0.5, 0.0), GeoPoint::new(0.5, 0.5)];
        let outside = [GeoPoint::new(10.0, 10.0), GeoPoint::new(11.0, 10.0), GeoPoint::new(11.0, 11.0)];
        assert_eq!(map.add_area(&inside, style.clone()).unwrap(), Insertion::Kept);
        assert_eq!(map.add_area(&outside, style).unwrap(), Insertion::Culled);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn one_vertex_inside_keeps_a_way() {
        let mut map = small_map();
        let style = Arc::new(WayStyle::default());
        let crossing = [GeoPoint::new(0.0, 0.0), GeoPoint::new(40.0, 40.0)];
        assert_eq!(map.add_way(&crossing, style).unwrap(), Insertion::Kept);
    }

    #[test]
    fn labels_and_nodes_are_never_culled() {
        let mut map = small_map();
        let far = GeoPoint::new(60.0, 100.0);
        assert_eq!(
            map.add_label("far", far, Arc::new(LabelStyle::default())).unwrap(),
            Insertion::Kept
        );
        assert_eq!(
            map.add_node(far, Arc::new(NodeStyle::default())).unwrap(),
            Insertion::Kept
        );
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn projection_errors_surface_from_add() {
        let mut map = Map::new();
        let err = map
            .add_node(GeoPoint::new(89.0, 0.0), Arc::new(NodeStyle::default()))
            .unwrap_err();
        assert!(matches!(err, ProjectionError::LatitudeOutOfRange { .. }));
        assert!(map.is_empty());
    }

    #[test]
    fn tile_cover_beyond_the_deepest_zoom_is_an_error() {
        let mut map = Map::new();
        assert_eq!(
            map.set_by_tile_cover(40, &[GeoPoint::new(10.0, 10.0)]),
            Err(BoundsError::ZoomOutOfRange { zoom: 40 })
        );
        assert_eq!(map.bounds(), &Bounds::world());
    }

    #[test]
    fn bounds_changes_do_not_recull_existing_features() {
        let mut map = Map::new();
        map.add(way(0, &[(5000.0, 5000.0), (5100.0, 5000.0)]));
        map.set_by_box(-1.0, 1.0, -1.0, 1.0).unwrap();
        assert_eq!(map.len(), 1);
        // New insertions use the new bounds
        assert_eq!(map.add(way(0, &[(5000.0, 5000.0)])), Insertion::Culled);
    }

    #[test]
    fn visibility_follows_passes() {
        let mut map = Map::new();
        map.add(way(3, &[(0.0, 0.0)]));
        map.add(way(7, &[(0.0, 0.0)]));
        map.add(Label::new("x", dvec2(0.0, 0.0), Arc::new(LabelStyle::new(5, Color::BLACK))));

        let shown_at = |map: &mut Map, zoom| map.begin_pass(zoom);
        assert_eq!(shown_at(&mut map, 0), 0);
        assert_eq!(shown_at(&mut map, 3), 1);
        assert_eq!(shown_at(&mut map, 5), 2);
        assert_eq!(shown_at(&mut map, 7), 3);
        // Going back down hides features again
        assert_eq!(shown_at(&mut map, 4), 1);

        map.end_pass();
        assert!(map.features().all(|f| !f.is_shown()));

        map.show_all();
        assert!(map.features().all(MapFeature::is_shown));
    }

    #[test]
    fn features_iterate_in_draw_order() {
        let mut map = Map::new();
        map.add(Label::new("l", dvec2(0.0, 0.0), Arc::new(LabelStyle::default())));
        map.add(way(0, &[(0.0, 0.0)]));
        map.add(Area::new(vec![dvec2(0.0, 0.0)], Arc::new(AreaStyle::default())));
        let kinds: Vec<_> = map.features().map(|f| f.feature().kind()).collect();
        assert_eq!(kinds, [FeatureKind::Area, FeatureKind::Way, FeatureKind::Label]);
    }

    #[test]
    fn grid_generation_needs_elevation() {
        let mut map = Map::new();
        assert_eq!(
            map.generate_elevation_grid(GridResolution::default(), 1.0),
            Err(ElevationError::NotInitialized)
        );
        assert!(!map.contours_visible_at(20));
    }

    #[test]
    fn contour_visibility_follows_style() {
        let mut map = Map::new();
        map.add_elevation(Elevation::new(
            Vec::new(),
            Arc::new(ElevationStyle::default().with_contour_zoom(12)),
        ));
        assert!(!map.contours_visible_at(11));
        assert!(map.contours_visible_at(12));
    }
}
