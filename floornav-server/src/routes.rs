//! HTTP surface over the editing session.

use axum::error_handling::HandleErrorLayer;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, patch, post, put};
use axum::{BoxError, Router};
use floornav_core::{
    Calibration, Crossing, Error, Floorplan, FloorplanDocument, Georeference, LatLng, Node, NodeId,
    PathResult, Poi, PoiId, Segment, SegmentId, Waypoint, Zone, ZoneId, find_path, save_floorplan,
};
use geo::Point;
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ListenConfig;
use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(state: AppState, listen: &ListenConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/floorplan", get(get_floorplan).put(put_floorplan))
        .route("/nodes", post(create_node))
        .route("/nodes/{id}", patch(move_node).delete(delete_node))
        .route("/segments", post(create_segment))
        .route("/segments/{id}", axum::routing::delete(delete_segment))
        .route("/pois", post(create_poi))
        .route("/pois/{id}", patch(update_poi).delete(delete_poi))
        .route("/zones", post(create_zone))
        .route("/zones/{id}", axum::routing::delete(delete_zone))
        .route("/crossings", get(list_crossings))
        .route("/path", post(shortest_path))
        .route("/path/geojson", post(shortest_path_geojson))
        .route(
            "/calibration",
            put(set_calibration).delete(clear_calibration),
        )
        .route("/georeference", put(set_georeference))
        .route("/save", post(save))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(listen.request_timeout()))
                .layer(ConcurrencyLimitLayer::new(listen.concurrency_limit)),
        )
        .layer(cors)
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "request timed out" })),
        )
    } else {
        tracing::error!("Unhandled middleware error: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )
    }
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Whole document

async fn get_floorplan(State(state): State<AppState>) -> Json<FloorplanDocument> {
    Json(state.editor().floorplan().to_document())
}

async fn put_floorplan(
    State(state): State<AppState>,
    Json(document): Json<FloorplanDocument>,
) -> Json<FloorplanDocument> {
    let floorplan = Floorplan::from_document(document);
    let mut editor = state.editor();
    editor.replace_floorplan(floorplan);
    tracing::info!(
        nodes = editor.floorplan().node_count(),
        segments = editor.floorplan().segment_count(),
        "Floorplan replaced"
    );
    Json(editor.floorplan().to_document())
}

async fn save(State(state): State<AppState>) -> ApiResult<Value> {
    let Some(path) = state.document_path.clone() else {
        return Err(ApiError::BadRequest(
            "server was started without a floorplan path".into(),
        ));
    };
    let editor = state.editor();
    save_floorplan(editor.floorplan(), &path)?;
    Ok(Json(json!({ "saved": path })))
}

// Nodes and segments

#[derive(Debug, Deserialize)]
pub struct PositionBody {
    pub x: f64,
    pub y: f64,
}

impl From<PositionBody> for Point<f64> {
    fn from(body: PositionBody) -> Self {
        Point::new(body.x, body.y)
    }
}

async fn create_node(
    State(state): State<AppState>,
    Json(body): Json<PositionBody>,
) -> ApiResult<Node> {
    let node = state
        .editor()
        .apply(|plan| Ok(plan.add_node(body.into()).clone()))?;
    Ok(Json(node))
}

async fn move_node(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<PositionBody>,
) -> ApiResult<Node> {
    let id = NodeId(id);
    let node = state.editor().apply(|plan| {
        plan.move_node(id, body.into())?;
        plan.node(id).cloned().ok_or(Error::UnknownElement {
            kind: "node",
            id: id.0,
        })
    })?;
    Ok(Json(node))
}

async fn delete_node(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Value> {
    let removed = state.editor().apply(|plan| plan.remove_node(NodeId(id)))?;
    Ok(Json(json!({ "removed_segments": removed })))
}

#[derive(Debug, Deserialize)]
pub struct SegmentBody {
    pub start: NodeId,
    pub end: NodeId,
}

async fn create_segment(
    State(state): State<AppState>,
    Json(body): Json<SegmentBody>,
) -> ApiResult<Segment> {
    let segment = state
        .editor()
        .apply(|plan| plan.add_segment(body.start, body.end).cloned())?;
    Ok(Json(segment))
}

async fn delete_segment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Segment> {
    let segment = state
        .editor()
        .apply(|plan| plan.remove_segment(SegmentId(id)))?;
    Ok(Json(segment))
}

// Points of interest and zones

#[derive(Debug, Deserialize)]
pub struct PoiBody {
    pub x: f64,
    pub y: f64,
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PoiPatch {
    pub position: Option<PositionBody>,
    pub name: Option<String>,
    pub kind: Option<String>,
}

async fn create_poi(State(state): State<AppState>, Json(body): Json<PoiBody>) -> ApiResult<Poi> {
    let position = Point::new(body.x, body.y);
    let poi = state
        .editor()
        .apply(|plan| Ok(plan.add_poi(position, body.name, body.kind).clone()))?;
    Ok(Json(poi))
}

async fn update_poi(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<PoiPatch>,
) -> ApiResult<Poi> {
    let id = PoiId(id);
    let poi = state.editor().apply(|plan| {
        let current = plan
            .poi(id)
            .cloned()
            .ok_or(Error::UnknownElement { kind: "poi", id: id.0 })?;
        if let Some(position) = patch.position {
            plan.move_poi(id, position.into())?;
        }
        if patch.name.is_some() || patch.kind.is_some() {
            plan.rename_poi(
                id,
                patch.name.unwrap_or(current.name),
                patch.kind.unwrap_or(current.kind),
            )?;
        }
        plan.poi(id)
            .cloned()
            .ok_or(Error::UnknownElement { kind: "poi", id: id.0 })
    })?;
    Ok(Json(poi))
}

async fn delete_poi(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Poi> {
    let poi = state.editor().apply(|plan| plan.remove_poi(PoiId(id)))?;
    Ok(Json(poi))
}

#[derive(Debug, Deserialize)]
pub struct ZoneBody {
    pub name: String,
    pub category: String,
    pub points: Vec<PositionBody>,
}

async fn create_zone(State(state): State<AppState>, Json(body): Json<ZoneBody>) -> ApiResult<Zone> {
    let points = body.points.into_iter().map(Point::from).collect();
    let zone = state
        .editor()
        .apply(|plan| plan.add_zone(body.name, body.category, points).cloned())?;
    Ok(Json(zone))
}

async fn delete_zone(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Zone> {
    let zone = state.editor().apply(|plan| plan.remove_zone(ZoneId(id)))?;
    Ok(Json(zone))
}

// Analysis

async fn list_crossings(State(state): State<AppState>) -> Json<Vec<Crossing>> {
    Json(state.editor().crossings().to_vec())
}

#[derive(Debug, Deserialize)]
pub struct PathQueryBody {
    pub start: Waypoint,
    pub end: Waypoint,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeoJsonParams {
    #[serde(default)]
    pub wgs84: bool,
}

async fn shortest_path(
    State(state): State<AppState>,
    Json(body): Json<PathQueryBody>,
) -> ApiResult<PathResult> {
    let editor = state.editor();
    let path = find_path(editor.floorplan(), body.start, body.end)?;
    Ok(Json(path))
}

async fn shortest_path_geojson(
    State(state): State<AppState>,
    Query(params): Query<GeoJsonParams>,
    Json(body): Json<PathQueryBody>,
) -> ApiResult<geojson::FeatureCollection> {
    let editor = state.editor();
    let floorplan = editor.floorplan();
    let path = find_path(floorplan, body.start, body.end)?;
    let collection = if params.wgs84 {
        path.to_geojson_wgs84(floorplan)?
    } else {
        path.to_geojson(floorplan)?
    };
    Ok(Json(collection))
}

// Calibration

#[derive(Debug, Deserialize)]
pub struct CalibrationBody {
    pub a: PositionBody,
    pub b: PositionBody,
    pub real_meters: f64,
}

#[derive(Debug, Deserialize)]
pub struct GeoreferenceBody {
    pub anchor_pixel: PositionBody,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub bearing_degrees: f64,
}

async fn set_calibration(
    State(state): State<AppState>,
    Json(body): Json<CalibrationBody>,
) -> ApiResult<Calibration> {
    let calibration = state.editor().apply(|plan| {
        plan.calibrate(body.a.into(), body.b.into(), body.real_meters)
            .cloned()
    })?;
    Ok(Json(calibration))
}

async fn clear_calibration(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.editor().apply(|plan| {
        plan.clear_calibration();
        Ok(())
    })?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_georeference(
    State(state): State<AppState>,
    Json(body): Json<GeoreferenceBody>,
) -> ApiResult<Georeference> {
    let anchor = LatLng::new(body.lat, body.lng);
    let georeference = state.editor().apply(|plan| {
        plan.set_georeference(body.anchor_pixel.into(), anchor, body.bearing_degrees)
            .cloned()
    })?;
    Ok(Json(georeference))
}
