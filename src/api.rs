// 🌐 REST API with Axum
// Read-only JSON surface over the listing repository.

use crate::aggregate::{aggregate, Summary};
use crate::charts::{
    board_composition, shares_histogram, year_histogram, BoardShare, Histogram, MAX_SHARES_BINS,
};
use crate::filter::Selection;
use crate::listing::Listing;
use crate::repository::ListingRepository;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Shared application state. The repository is immutable, so no lock.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<ListingRepository>,
    pub shares_bins: usize,
}

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Filter parameters shared by every table/metric/chart endpoint.
///
/// `board` is comma-separated: absent means every board, present but
/// empty means no board at all.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub board: Option<String>,
    pub q: Option<String>,
    pub bins: Option<usize>,
}

impl FilterQuery {
    pub fn to_selection(&self, repo: &ListingRepository) -> Selection {
        let mut selection = match &self.board {
            None => repo.default_selection(),
            Some(raw) => Selection::new(
                raw.split(',').map(str::trim).filter(|b| !b.is_empty()),
                None,
            ),
        };

        if let Some(keyword) = &self.q {
            selection.set_keyword(keyword);
        }

        selection
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/boards - Distinct listing boards in file order
async fn get_boards(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse::ok(state.repo.boards().to_vec()))
}

/// GET /api/listings - Filtered listings table
async fn get_listings(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<ApiResponse<Vec<Listing>>> {
    let selection = query.to_selection(&state.repo);
    let listings = state.repo.filter(&selection);
    debug!(rows = listings.len(), "listings requested");

    Json(ApiResponse::ok(listings))
}

/// GET /api/listings/:code - Rows carrying a ticker code
async fn get_listing_by_code(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    let matches: Vec<Listing> = state.repo.find_by_code(&code).into_iter().cloned().collect();

    if matches.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Vec<Listing>>::err(format!("no listing with code {}", code))),
        )
            .into_response();
    }

    (StatusCode::OK, Json(ApiResponse::ok(matches))).into_response()
}

/// GET /api/summary - The three dashboard metrics
async fn get_summary(State(state): State<AppState>, Query(query): Query<FilterQuery>) -> Response {
    let selection = query.to_selection(&state.repo);
    let filtered = state.repo.filter(&selection);

    match aggregate(&filtered) {
        Ok(summary) => (StatusCode::OK, Json(ApiResponse::ok(summary))).into_response(),
        Err(e) => {
            debug!(error = %e, "summary over empty selection");
            (StatusCode::NOT_FOUND, Json(ApiResponse::<Summary>::err(e.to_string()))).into_response()
        }
    }
}

/// GET /api/charts/shares - Shares outstanding histogram
async fn get_shares_chart(State(state): State<AppState>, Query(query): Query<FilterQuery>) -> Response {
    let bins = query.bins.unwrap_or(state.shares_bins);
    if bins == 0 || bins > MAX_SHARES_BINS {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Histogram>::err(format!(
                "bins must be between 1 and {}",
                MAX_SHARES_BINS
            ))),
        )
            .into_response();
    }

    let filtered = state.repo.filter(&query.to_selection(&state.repo));

    (StatusCode::OK, Json(ApiResponse::ok(shares_histogram(&filtered, bins)))).into_response()
}

/// GET /api/charts/years - Listings per year
async fn get_years_chart(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<ApiResponse<Histogram>> {
    let filtered = state.repo.filter(&query.to_selection(&state.repo));

    Json(ApiResponse::ok(year_histogram(&filtered)))
}

/// GET /api/charts/boards - Listing board composition
async fn get_boards_chart(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<ApiResponse<Vec<BoardShare>>> {
    let filtered = state.repo.filter(&query.to_selection(&state.repo));

    Json(ApiResponse::ok(board_composition(&filtered)))
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/boards", get(get_boards))
        .route("/listings", get(get_listings))
        .route("/listings/:code", get(get_listing_by_code))
        .route("/summary", get(get_summary))
        .route("/charts/shares", get(get_shares_chart))
        .route("/charts/years", get(get_years_chart))
        .route("/charts/boards", get(get_boards_chart))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
