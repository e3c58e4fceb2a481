// HTTP API routes: game setup, solving, health and metrics.

use axum::{
    extract::{Json, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::engine::game::SolverError;
use crate::engine::server::GameServer;
use crate::metrics;

// ── Request types ─────────────────────────────────────────────────────

/// Query parameters of `POST /new_game`, kept as raw strings so bad input gets a `detail` message.
#[derive(Deserialize)]
pub struct NewGameParams {
    pub troops: Option<String>,
    pub fields: Option<String>,
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub game_server: Arc<GameServer>,
}

// ── Error helper ──────────────────────────────────────────────────────

/// Error body in the `{"detail": ...}` shape the frontend reads.
fn json_error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

fn solver_error(e: SolverError) -> Response {
    let status = match e {
        SolverError::TooLarge { .. } | SolverError::TooMuchWork { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        SolverError::NoTroops | SolverError::NoFields => StatusCode::BAD_REQUEST,
    };
    json_error(status, &e.to_string())
}

/// Parse a positive count from a raw query value.
fn parse_count(name: &str, raw: Option<&str>) -> Result<u32, Response> {
    let raw = match raw.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => {
            return Err(json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                &format!("{name} is required"),
            ))
        }
    };
    let value: i64 = raw.parse().map_err(|_| {
        json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            &format!("{name} must be an integer"),
        )
    })?;
    if value <= 0 {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            &format!("{name} must be positive"),
        ));
    }
    u32::try_from(value)
        .map_err(|_| json_error(StatusCode::PAYLOAD_TOO_LARGE, &format!("{name} is too large")))
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(game_server: Arc<GameServer>, static_dir: Option<PathBuf>) -> Router {
    let state = AppState { game_server };

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/new_game", post(new_game))
        .route("/solve_blotto", get(solve_blotto))
        .with_state(state)
        .layer(middleware::from_fn(track_requests));

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Count every request by method, path and status.
async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    metrics::API_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), path.as_str(), response.status().as_str()])
        .inc();
    response
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "blotto-backend" }))
}

async fn get_metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

async fn new_game(State(state): State<AppState>, Query(params): Query<NewGameParams>) -> Response {
    let troops = match parse_count("troops", params.troops.as_deref()) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let fields = match parse_count("fields", params.fields.as_deref()) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match state.game_server.new_game(troops, fields) {
        Ok(()) => (StatusCode::OK, Json(Value::Null)).into_response(),
        Err(e) => {
            tracing::warn!("Rejected new game ({troops} troops, {fields} fields): {e}");
            solver_error(e)
        }
    }
}

async fn solve_blotto(State(state): State<AppState>) -> Response {
    match state.game_server.solve().await {
        Ok(solution) => (StatusCode::OK, Json(solution)).into_response(),
        Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(result: Result<u32, Response>) -> StatusCode {
        match result {
            Ok(_) => StatusCode::OK,
            Err(resp) => resp.status(),
        }
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("troops", Some("5")).ok(), Some(5));
        assert_eq!(parse_count("troops", Some(" 7 ")).ok(), Some(7));
        assert_eq!(status_of(parse_count("troops", None)), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_of(parse_count("troops", Some(""))), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_of(parse_count("troops", Some("abc"))), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_of(parse_count("troops", Some("0"))), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(parse_count("troops", Some("-3"))), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(parse_count("troops", Some("99999999999"))),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_solver_error_status() {
        assert_eq!(solver_error(SolverError::NoFields).status(), StatusCode::BAD_REQUEST);
        let too_large = SolverError::TooLarge {
            troops: 50,
            fields: 10,
            combos: 1_000_000,
            limit: 500,
        };
        assert_eq!(solver_error(too_large).status(), StatusCode::PAYLOAD_TOO_LARGE);
        let too_slow = SolverError::TooMuchWork {
            troops: 1,
            fields: 499,
            work: 31_000_000_000_000,
            limit: 5_000_000_000,
        };
        assert_eq!(solver_error(too_slow).status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
