use std::f64::consts::PI;

use crate::error::RenderError;
use crate::renderer::MapRenderer;
use crate::types::map::{MapView, MarkerIcon, PathStyle};
use crate::types::route::Location;

const TILE_SIZE: f64 = 256.0;
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;
const GRATICULE_STEP_DEG: f64 = 30.0;
const POPUP_FONT_SIZE: f64 = 14.0;
const POPUP_PADDING: f64 = 8.0;
const POPUP_GAP: f64 = 5.0;
pub const OCEAN_FILL: &str = "#AAD3DF";
const GRATICULE_STROKE: &str = "#FFFFFF";

/// Renders markers, paths and popups into a standalone SVG document using a
/// Web Mercator camera.
pub struct SvgMapRenderer {
    view: MapView,
    background: Option<String>,
    paths: Vec<String>,
    markers: Vec<String>,
    popups: Vec<String>,
    /// Edge length of the last placed marker, used to lift popups clear of it.
    marker_size: Option<f64>,
}

impl SvgMapRenderer {
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            background: Some(OCEAN_FILL.to_string()),
            paths: Vec::new(),
            markers: Vec::new(),
            popups: Vec::new(),
            marker_size: None,
        }
    }

    /// Replaces the full-canvas fill. `None` leaves the canvas transparent so the
    /// rasterizer's background shows through.
    pub fn with_background(mut self, fill: Option<&str>) -> Self {
        self.background = fill.map(str::to_string);
        self
    }

    /// Screen position of `location` in pixels, origin top-left.
    pub fn project(&self, location: Location) -> (f64, f64) {
        let world = world_size(self.view.zoom);
        let (x, y) = mercator_project(location, world);
        let (cx, cy) = mercator_project(self.view.center, world);
        (
            x - cx + self.view.width as f64 / 2.0,
            y - cy + self.view.height as f64 / 2.0,
        )
    }

    pub fn finish(self) -> Result<String, RenderError> {
        let width = self.view.width as f64;
        let height = self.view.height as f64;
        if width <= 0.0 || height <= 0.0 {
            return Err(RenderError::SvgError("Invalid viewport size".to_string()));
        }
        if !self.view.zoom.is_finite() || self.view.zoom < 0.0 {
            return Err(RenderError::SvgError(format!(
                "Invalid zoom level: {}",
                self.view.zoom
            )));
        }

        let graticule = self.build_graticule();
        let background = self
            .background
            .as_deref()
            .map(|fill| {
                format!(
                    r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
                    width,
                    height,
                    escape_xml(fill)
                )
            })
            .unwrap_or_default();

        Ok(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
  {}
  {}
  {}
  {}
  {}
</svg>"#,
            width,
            height,
            width,
            height,
            background,
            graticule,
            self.paths.join("\n  "),
            self.markers.join("\n  "),
            self.popups.join("\n  ")
        ))
    }

    fn build_graticule(&self) -> String {
        let mut lines = Vec::new();

        let mut lng = -180.0;
        while lng <= 180.0 {
            let top = self.project(Location::new(MAX_MERCATOR_LAT, lng));
            let bottom = self.project(Location::new(-MAX_MERCATOR_LAT, lng));
            lines.push(build_polyline_path(&[top, bottom]));
            lng += GRATICULE_STEP_DEG;
        }

        let mut lat = -60.0;
        while lat <= 60.0 {
            let west = self.project(Location::new(lat, -180.0));
            let east = self.project(Location::new(lat, 180.0));
            lines.push(build_polyline_path(&[west, east]));
            lat += GRATICULE_STEP_DEG;
        }

        format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-opacity="0.5" stroke-width="1"/>"#,
            lines.join(" "),
            GRATICULE_STROKE
        )
    }
}

impl MapRenderer for SvgMapRenderer {
    fn place_marker(&mut self, location: Location, icon: &MarkerIcon) {
        let (x, y) = self.project(location);
        let size = icon.size.max(1) as f64;
        self.marker_size = Some(size);
        self.markers.push(format!(
            r##"<g class="{}"><circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="#FFFFFF" fill-opacity="0.85" stroke="#C0392B" stroke-width="2"/><text x="{:.2}" y="{:.2}" font-size="{:.1}" text-anchor="middle" dominant-baseline="central">{}</text></g>"##,
            escape_xml(&icon.class_name),
            x,
            y,
            size / 2.0,
            x,
            y,
            size * 0.6,
            escape_xml(&icon.glyph)
        ));
    }

    fn place_path(&mut self, locations: &[Location], style: &PathStyle) {
        if locations.is_empty() {
            return;
        }
        let coords: Vec<(f64, f64)> = locations.iter().map(|l| self.project(*l)).collect();
        let fill = if style.fill {
            format!(
                r#"fill="{}" fill-opacity="{:.2}""#,
                escape_xml(&style.fill_color),
                style.fill_opacity
            )
        } else {
            r#"fill="none""#.to_string()
        };
        self.paths.push(format!(
            r#"<path d="{}" {} stroke="{}" stroke-opacity="{:.2}" stroke-width="{:.1}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            build_polyline_path(&coords),
            fill,
            escape_xml(&style.color),
            style.opacity,
            style.weight
        ));
    }

    fn open_popup(&mut self, location: Location, text: &str) {
        let (x, y) = self.project(location);
        let box_width = text.chars().count() as f64 * POPUP_FONT_SIZE * 0.55 + 2.0 * POPUP_PADDING;
        let box_height = POPUP_FONT_SIZE + 2.0 * POPUP_PADDING;
        let marker_size = self
            .marker_size
            .unwrap_or(MarkerIcon::default().size as f64);
        let box_x = x - box_width / 2.0;
        let box_y = y - marker_size / 2.0 - POPUP_GAP - box_height;
        self.popups.push(format!(
            r##"<g class="popup"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="6" fill="#FFFFFF" stroke="#333333" stroke-opacity="0.3"/><text x="{:.2}" y="{:.2}" font-family="DejaVu Sans, sans-serif" font-size="{:.1}" fill="#333333" text-anchor="middle" dominant-baseline="central">{}</text></g>"##,
            box_x,
            box_y,
            box_width,
            box_height,
            x,
            box_y + box_height / 2.0,
            POPUP_FONT_SIZE,
            escape_xml(text)
        ));
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

fn mercator_project(location: Location, world: f64) -> (f64, f64) {
    let lat = location.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (location.lng + 180.0) / 360.0 * world;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * world;
    (x, y)
}

fn build_polyline_path(points: &[(f64, f64)]) -> String {
    points.iter().enumerate().fold(String::new(), |mut s, (i, (x, y))| {
        if i == 0 {
            s.push_str(&format!("M {:.2} {:.2}", x, y));
        } else {
            s.push_str(&format!(" L {:.2} {:.2}", x, y));
        }
        s
    })
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapView {
        MapView {
            center: Location::new(0.0, 0.0),
            zoom: 1.0,
            width: 512,
            height: 512,
        }
    }

    #[test]
    fn center_projects_to_viewport_middle() {
        let renderer = SvgMapRenderer::new(view());
        let (x, y) = renderer.project(Location::new(0.0, 0.0));
        assert!((x - 256.0).abs() < 1e-9);
        assert!((y - 256.0).abs() < 1e-9);
    }

    #[test]
    fn antimeridian_spans_the_world_width() {
        let renderer = SvgMapRenderer::new(view());
        let (west, _) = renderer.project(Location::new(0.0, -180.0));
        let (east, _) = renderer.project(Location::new(0.0, 180.0));
        assert!((east - west - 512.0).abs() < 1e-9);
    }

    #[test]
    fn poles_are_clamped() {
        let renderer = SvgMapRenderer::new(view());
        let (_, north) = renderer.project(Location::new(90.0, 0.0));
        assert!(north.is_finite());
        assert!(north.abs() < 1e-6);
    }

    #[test]
    fn path_uses_style_and_skips_fill_by_default() {
        let mut renderer = SvgMapRenderer::new(view());
        renderer.place_path(
            &[Location::new(0.0, 0.0), Location::new(10.0, 10.0)],
            &PathStyle::default(),
        );
        let svg = renderer.finish().expect("svg");
        assert!(svg.contains(r#"stroke="green""#));
        assert!(svg.contains(r#"stroke-width="2.0""#));
        assert!(svg.contains(r#"fill="none" stroke="green""#));
        assert!(svg.contains("M 256.00 256.00 L"));
    }

    #[test]
    fn filled_path_carries_fill_color() {
        let mut renderer = SvgMapRenderer::new(view());
        let style = PathStyle {
            fill: true,
            ..PathStyle::default()
        };
        renderer.place_path(&[Location::new(0.0, 0.0), Location::new(1.0, 1.0)], &style);
        let svg = renderer.finish().expect("svg");
        assert!(svg.contains(r#"fill="green" fill-opacity="0.50""#));
    }

    #[test]
    fn popup_text_is_escaped() {
        let mut renderer = SvgMapRenderer::new(view());
        renderer.open_popup(Location::new(0.0, 0.0), "Santa's <still> home & cosy");
        let svg = renderer.finish().expect("svg");
        assert!(svg.contains("Santa&apos;s &lt;still&gt; home &amp; cosy"));
    }

    #[test]
    fn marker_renders_icon_glyph() {
        let mut renderer = SvgMapRenderer::new(view());
        renderer.place_marker(Location::new(0.0, 0.0), &MarkerIcon::default());
        let svg = renderer.finish().expect("svg");
        assert!(svg.contains(r#"<g class="icon">"#));
        assert!(svg.contains("\u{1F385}"));
        assert!(svg.contains(r#"r="25.00""#));
    }

    #[test]
    fn popup_clears_the_marker_it_belongs_to() {
        let large = MarkerIcon {
            size: 120,
            ..MarkerIcon::default()
        };
        let mut renderer = SvgMapRenderer::new(view());
        renderer.place_marker(Location::new(0.0, 0.0), &large);
        renderer.open_popup(Location::new(0.0, 0.0), "hi");
        let svg = renderer.finish().expect("svg");
        // 256 - 60 (half marker) - 5 (gap) - 30 (box height)
        assert!(svg.contains(r#"<rect x="240.30" y="161.00""#));

        let mut renderer = SvgMapRenderer::new(view());
        renderer.place_marker(Location::new(0.0, 0.0), &MarkerIcon::default());
        renderer.open_popup(Location::new(0.0, 0.0), "hi");
        let svg = renderer.finish().expect("svg");
        assert!(svg.contains(r#"<rect x="240.30" y="196.00""#));
    }

    #[test]
    fn background_fill_is_optional() {
        let svg = SvgMapRenderer::new(view()).finish().expect("svg");
        assert!(svg.contains(r##"fill="#AAD3DF""##));

        let svg = SvgMapRenderer::new(view())
            .with_background(None)
            .finish()
            .expect("svg");
        assert!(!svg.contains("<rect"));

        let svg = SvgMapRenderer::new(view())
            .with_background(Some("#FFFFFF"))
            .finish()
            .expect("svg");
        assert!(svg.contains(r##"<rect x="0" y="0" width="512" height="512" fill="#FFFFFF"/>"##));
    }

    #[test]
    fn empty_viewport_is_rejected() {
        let renderer = SvgMapRenderer::new(MapView {
            width: 0,
            ..view()
        });
        assert!(renderer.finish().is_err());
    }
}
