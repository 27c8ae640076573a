use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::pipeline::{rasterize, resolve::resolve_with};
use crate::renderer::{
    render_progress,
    svg::{SvgMapRenderer, OCEAN_FILL},
};
use crate::routes::{parse_now, parse_selection};
use crate::state::AppState;
use crate::types::map::{
    megapixels, zoom_within_limits, MapFormat, MapScene, MapView, OutputConfig, MAX_MAP_DIM,
    MAX_MAP_MEGAPIXELS, MAX_MAP_ZOOM, MIN_MAP_DIM,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/map", get(map))
}

#[derive(Debug, Deserialize)]
struct MapQuery {
    now: Option<String>,
    selection: Option<String>,
    format: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    zoom: Option<f64>,
    background: Option<String>,
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), AppError> {
    let side = MIN_MAP_DIM..=MAX_MAP_DIM;
    if !side.contains(&width) || !side.contains(&height) {
        return Err(AppError::BadRequest(format!(
            "Invalid dimensions: {}x{}. Width/height must be between {} and {}",
            width, height, MIN_MAP_DIM, MAX_MAP_DIM
        )));
    }

    let megapixels = megapixels(width, height);
    if megapixels > MAX_MAP_MEGAPIXELS {
        return Err(AppError::BadRequest(format!(
            "Image too large: {}x{} ({:.2} MP). Max allowed is {:.1} MP",
            width, height, megapixels, MAX_MAP_MEGAPIXELS
        )));
    }

    Ok(())
}

fn parse_background(raw: Option<&str>) -> Result<Option<(u8, u8, u8, u8)>, AppError> {
    match raw {
        Some("white") => Ok(Some((255, 255, 255, 255))),
        Some("black") => Ok(Some((0, 0, 0, 255))),
        Some("transparent") | None => Ok(None),
        Some(other) => Err(AppError::BadRequest(format!(
            "Invalid background: {}. Use 'transparent', 'white', or 'black'",
            other
        ))),
    }
}

async fn map(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<impl IntoResponse, AppError> {
    let config = state.config();
    let now = parse_now(query.now.as_deref())?;
    let selection = parse_selection(query.selection.as_deref(), config.current_selection)?;
    let format = match query.format.as_deref() {
        Some(value) => MapFormat::from_str(value).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid format: {}. Use 'svg' or 'png'", value))
        })?,
        None => MapFormat::default(),
    };

    let (width, height) = match (query.width, query.height) {
        (Some(width), Some(height)) => {
            validate_dimensions(width, height)?;
            (width, height)
        }
        (None, None) => {
            validate_dimensions(config.map_width, config.map_height)?;
            (config.map_width, config.map_height)
        }
        _ => {
            return Err(AppError::BadRequest(
                "Both width and height must be provided together".to_string(),
            ))
        }
    };

    let zoom = query.zoom.unwrap_or(config.map_zoom);
    if !zoom_within_limits(zoom) {
        return Err(AppError::BadRequest(format!(
            "Invalid zoom: {}. Use a value between 0 and {}",
            zoom, MAX_MAP_ZOOM
        )));
    }
    let background = parse_background(query.background.as_deref())?;

    // PNG backgrounds are painted by the rasterizer, so the SVG canvas stays clear.
    let canvas_fill = match (format, query.background.as_deref()) {
        (MapFormat::Png, _) => None,
        (MapFormat::Svg, None) => Some(OCEAN_FILL.to_string()),
        (MapFormat::Svg, Some(_)) => {
            background.map(|(r, g, b, _)| format!("#{:02X}{:02X}{:02X}", r, g, b))
        }
    };

    let feed = state.feed().acquire().await;
    let progress = resolve_with(feed.as_ref(), now, selection);

    let scene = MapScene {
        fallback_location: config.fallback_location,
        ..MapScene::default()
    };
    let mut renderer = SvgMapRenderer::new(MapView {
        center: config.map_center,
        zoom,
        width,
        height,
    })
    .with_background(canvas_fill.as_deref());
    render_progress(&progress, &scene, &mut renderer);
    let svg = renderer.finish()?;

    let image_bytes = match format {
        MapFormat::Svg => svg.into_bytes(),
        MapFormat::Png => {
            let output_config = OutputConfig {
                width,
                height,
                background,
            };
            rasterize::rasterize(&svg, &output_config)?
        }
    };

    tracing::info!(
        "Generated {:?} map ({}x{}, zoom {}, {:?}): {} bytes",
        format,
        width,
        height,
        zoom,
        progress.status(),
        image_bytes.len()
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, format.content_type())],
        image_bytes,
    ))
}
