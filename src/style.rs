//! Feature and elevation styles.
//!
//! Styles are immutable once built and shared between features through `Arc`.

use std::fmt;
use std::str::FromStr;

use crate::defaults;
use crate::errors::StyleError;

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }

    /// Linear blend towards `other`, `t` in [0, 1].
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl FromStr for Color {
    type Err = StyleError;

    /// Parse a named color, `#rgb`, `#rrggbb` or `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unknown = || StyleError::UnknownColor { name: s.to_string() };

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(unknown);
        }

        let color = match s.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::rgb(255, 0, 0),
            "green" => Color::rgb(0, 128, 0),
            "blue" => Color::rgb(0, 0, 255),
            "yellow" => Color::rgb(255, 255, 0),
            "cyan" => Color::rgb(0, 255, 255),
            "magenta" => Color::rgb(255, 0, 255),
            "orange" => Color::rgb(255, 165, 0),
            "purple" => Color::rgb(128, 0, 128),
            "brown" => Color::rgb(165, 42, 42),
            "pink" => Color::rgb(255, 192, 203),
            "gray" | "grey" => Color::rgb(128, 128, 128),
            "lightgray" | "lightgrey" => Color::rgb(211, 211, 211),
            "darkgray" | "darkgrey" => Color::rgb(169, 169, 169),
            "silver" => Color::rgb(192, 192, 192),
            "tan" => Color::rgb(210, 180, 140),
            "lightblue" => Color::rgb(173, 216, 230),
            "darkgreen" => Color::rgb(0, 100, 0),
            "none" | "transparent" => Color::TRANSPARENT,
            _ => return Err(unknown()),
        };
        Ok(color)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).ok();
    match hex.len() {
        3 => Some(Color::rgb(
            channel(0, 1)? * 17,
            channel(1, 1)? * 17,
            channel(2, 1)? * 17,
        )),
        6 => Some(Color::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
        8 => Some(Color::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?).with_alpha(channel(6, 2)?)),
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Colormaps available for elevation rasters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Ocean blues through greens and browns to snow
    #[default]
    GistTerrain,
    Gray,
}

impl Colormap {
    const TERRAIN: [(f64, Color); 6] = [
        (0.00, Color::rgb(51, 0, 153)),
        (0.15, Color::rgb(0, 153, 255)),
        (0.25, Color::rgb(0, 204, 102)),
        (0.50, Color::rgb(255, 255, 128)),
        (0.75, Color::rgb(128, 92, 84)),
        (1.00, Color::WHITE),
    ];

    /// Color at normalized position `t` in [0, 1].
    pub fn sample(self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Gray => Color::BLACK.lerp(Color::WHITE, t),
            Colormap::GistTerrain => {
                let stops = &Self::TERRAIN;
                let i = stops.iter().rposition(|(at, _)| *at <= t).unwrap_or(0);
                match stops.get(i + 1) {
                    Some(&(next_at, next)) => {
                        let (at, color) = stops[i];
                        color.lerp(next, (t - at) / (next_at - at))
                    }
                    None => stops[i].1,
                }
            }
        }
    }
}

impl FromStr for Colormap {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gist_terrain" | "terrain" => Ok(Colormap::GistTerrain),
            "gray" | "grey" => Ok(Colormap::Gray),
            _ => Err(StyleError::UnknownColormap { name: s.to_string() }),
        }
    }
}

/// Stroke pattern for ways
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    /// Dash pattern in multiples of the line width, `None` for solid lines.
    pub fn dash_pattern(self) -> Option<&'static [f64]> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some(&[3.7, 1.6]),
            LineStyle::Dotted => Some(&[1.0, 1.65]),
            LineStyle::DashDot => Some(&[6.4, 1.6, 1.0, 1.6]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    Circle,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Style for filled areas
#[derive(Clone, Debug, PartialEq)]
pub struct AreaStyle {
    /// Minimum zoom at which the area is drawn
    pub appears_at: u8,
    pub color: Color,
    pub fill: bool,
    /// Hatch pattern, passed through to backends that support one
    pub hatch: Option<String>,
}

impl Default for AreaStyle {
    fn default() -> Self {
        Self {
            appears_at: 0,
            color: Color::BLACK,
            fill: true,
            hatch: None,
        }
    }
}

impl AreaStyle {
    pub fn new(appears_at: u8, color: Color) -> Self {
        Self {
            appears_at,
            color,
            ..Self::default()
        }
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_hatch(mut self, hatch: impl Into<String>) -> Self {
        self.hatch = Some(hatch.into());
        self
    }
}

/// Style for polylines
#[derive(Clone, Debug, PartialEq)]
pub struct WayStyle {
    pub appears_at: u8,
    pub color: Color,
    pub line_style: LineStyle,
    /// Stroke width in points
    pub line_width: f64,
    pub marker: Option<Marker>,
    /// Marker size in points
    pub marker_size: f64,
}

impl Default for WayStyle {
    fn default() -> Self {
        Self {
            appears_at: 0,
            color: Color::BLACK,
            line_style: LineStyle::Solid,
            line_width: defaults::LINE_WIDTH,
            marker: None,
            marker_size: 0.0,
        }
    }
}

impl WayStyle {
    pub fn new(appears_at: u8, color: Color) -> Self {
        Self {
            appears_at,
            color,
            ..Self::default()
        }
    }

    pub fn with_line(mut self, line_style: LineStyle, line_width: f64) -> Self {
        self.line_style = line_style;
        self.line_width = line_width;
        self
    }

    pub fn with_marker(mut self, marker: Marker, size: f64) -> Self {
        self.marker = Some(marker);
        self.marker_size = size;
        self
    }
}

/// Style for text labels
#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
    pub appears_at: u8,
    pub color: Color,
    /// Font size in points
    pub font_size: f64,
    pub font_weight: FontWeight,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            appears_at: 0,
            color: Color::BLACK,
            font_size: defaults::FONT_SIZE,
            font_weight: FontWeight::Normal,
        }
    }
}

impl LabelStyle {
    pub fn new(appears_at: u8, color: Color) -> Self {
        Self {
            appears_at,
            color,
            ..Self::default()
        }
    }

    pub fn with_font(mut self, font_size: f64, font_weight: FontWeight) -> Self {
        self.font_size = font_size;
        self.font_weight = font_weight;
        self
    }
}

/// Style for point markers drawn as a fixed glyph (e.g. "P" for parking)
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
    pub label: LabelStyle,
    pub text: String,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            label: LabelStyle::default().with_font(defaults::FONT_SIZE, FontWeight::Bold),
            text: defaults::NODE_TEXT.to_string(),
        }
    }
}

impl NodeStyle {
    pub fn new(appears_at: u8, color: Color, text: impl Into<String>) -> Self {
        let mut style = Self::default();
        style.label.appears_at = appears_at;
        style.label.color = color;
        style.text = text.into();
        style
    }
}

/// Style for the elevation background, hillshade and contour overlay
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationStyle {
    pub colormap: Colormap,
    /// Elevation mapped to the start of the colormap
    pub vmin: f64,
    /// Elevation mapped to the end of the colormap
    pub vmax: f64,
    pub colormap_alpha: f64,
    pub hillshade_alpha: f64,
    /// Minimum zoom at which contours are drawn
    pub contour_appears_at: u8,
    pub contour_levels: Vec<f64>,
    pub contour_color: Color,
    /// Contour stroke width in points
    pub contour_width: f64,
    /// Subset of `contour_levels` that carry labels
    ///
    /// Only read by backends that render text; [`SkiaCanvas`](crate::SkiaCanvas)
    /// draws unlabelled contours.
    pub label_levels: Vec<f64>,
    /// Contour label size in points
    pub label_font_size: f64,
}

impl Default for ElevationStyle {
    fn default() -> Self {
        let step = (defaults::CONTOUR_STOP - defaults::CONTOUR_START) / defaults::CONTOUR_COUNT as f64;
        let levels: Vec<f64> = (0..defaults::CONTOUR_COUNT)
            .map(|i| defaults::CONTOUR_START + step * i as f64)
            .collect();
        Self {
            colormap: Colormap::GistTerrain,
            vmin: defaults::ELEVATION_VMIN,
            vmax: defaults::ELEVATION_VMAX,
            colormap_alpha: defaults::COLORMAP_ALPHA,
            hillshade_alpha: defaults::HILLSHADE_ALPHA,
            contour_appears_at: defaults::CONTOUR_APPEARS_AT,
            label_levels: every_nth(&levels, defaults::CONTOUR_LABEL_SKIP),
            contour_levels: levels,
            contour_color: Color::BLACK,
            contour_width: defaults::CONTOUR_WIDTH,
            label_font_size: defaults::CONTOUR_LABEL_FONT_SIZE,
        }
    }
}

impl ElevationStyle {
    /// Replace the contour levels; labels go on every `label_skip`-th level.
    pub fn with_contours(mut self, levels: Vec<f64>, label_skip: usize) -> Self {
        self.label_levels = every_nth(&levels, label_skip.max(1));
        self.contour_levels = levels;
        self
    }

    pub fn with_contour_zoom(mut self, appears_at: u8) -> Self {
        self.contour_appears_at = appears_at;
        self
    }

    pub fn with_range(mut self, vmin: f64, vmax: f64) -> Self {
        self.vmin = vmin;
        self.vmax = vmax;
        self
    }

    /// Whether contours belong on a render pass at `zoom`.
    pub fn contours_visible_at(&self, zoom: u8) -> bool {
        zoom >= self.contour_appears_at
    }
}

fn every_nth(levels: &[f64], n: usize) -> Vec<f64> {
    levels.iter().step_by(n).copied().collect()
}
