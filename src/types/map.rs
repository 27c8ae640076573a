use serde::{Deserialize, Serialize};

use crate::types::route::Location;

pub const DEFAULT_IDLE_MESSAGE: &str = "Santa's still at the North Pole!";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub class_name: String,
    pub glyph: String,
    /// Icon edge length in pixels.
    pub size: u32,
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            class_name: "icon".to_string(),
            glyph: "\u{1F385}".to_string(),
            size: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub weight: f32,
    pub color: String,
    pub opacity: f32,
    pub fill: bool,
    pub fill_color: String,
    pub fill_opacity: f32,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            weight: 2.0,
            color: "green".to_string(),
            opacity: 1.0,
            fill: false,
            fill_color: "green".to_string(),
            fill_opacity: 0.5,
        }
    }
}

/// Rendering parameters handed to a map renderer alongside resolved progress.
#[derive(Debug, Clone)]
pub struct MapScene {
    pub fallback_location: Location,
    pub idle_message: String,
    pub marker_icon: MarkerIcon,
    pub path_style: PathStyle,
}

impl Default for MapScene {
    fn default() -> Self {
        Self {
            fallback_location: Location::new(0.0, 0.0),
            idle_message: DEFAULT_IDLE_MESSAGE.to_string(),
            marker_icon: MarkerIcon::default(),
            path_style: PathStyle::default(),
        }
    }
}

pub const MIN_MAP_DIM: u32 = 64;
pub const MAX_MAP_DIM: u32 = 4096;
pub const MAX_MAP_MEGAPIXELS: f64 = 10.0;
pub const MAX_MAP_ZOOM: f64 = 18.0;

pub fn megapixels(width: u32, height: u32) -> f64 {
    (width as f64 * height as f64) / 1_000_000.0
}

pub fn dimensions_within_limits(width: u32, height: u32) -> bool {
    (MIN_MAP_DIM..=MAX_MAP_DIM).contains(&width)
        && (MIN_MAP_DIM..=MAX_MAP_DIM).contains(&height)
        && megapixels(width, height) <= MAX_MAP_MEGAPIXELS
}

pub fn zoom_within_limits(zoom: f64) -> bool {
    zoom.is_finite() && (0.0..=MAX_MAP_ZOOM).contains(&zoom)
}

/// Camera of the SVG map: centre, zoom and pixel size.
#[derive(Debug, Clone, Copy)]
pub struct MapView {
    pub center: Location,
    pub zoom: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapFormat {
    Svg,
    #[default]
    Png,
}

impl MapFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "svg" => Some(MapFormat::Svg),
            "png" => Some(MapFormat::Png),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            MapFormat::Svg => "image/svg+xml",
            MapFormat::Png => "image/png",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub background: Option<(u8, u8, u8, u8)>,
}
