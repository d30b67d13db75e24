use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use marketsearch_core::{CatalogItem, Category, Error, Field, IndexManager, SortKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 20 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub score: u32,
    #[serde(flatten)]
    pub item: CatalogItem,
}

#[derive(Deserialize)]
pub struct ListingParams {
    pub sortby: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct ListingResponse {
    pub sort_by: SortKey,
    pub category: Option<Category>,
    pub total: usize,
    pub products: Vec<CatalogItem>,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub items: usize,
    pub name_terms: usize,
    pub description_terms: usize,
    pub keyword_terms: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<IndexManager>,
    pub admin_token: Option<String>,
}

type ApiError = (StatusCode, String);

fn api_error(err: Error) -> ApiError {
    let status = if err.is_invalid_input() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, err.to_string())
}

fn cors_layer() -> CorsLayer {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    }
}

pub fn build_app(manager: Arc<IndexManager>, admin_token: Option<String>) -> Router {
    let app_state = AppState { manager, admin_token };
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/products", get(products_handler))
        .route("/index/refresh", post(refresh_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Rebuild the index every `every`, starting one interval from now.
///
/// Failures are logged by [`IndexManager::refresh`] and the next tick retries.
pub fn spawn_refresh_loop(manager: Arc<IndexManager>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let manager = manager.clone();
            if let Err(e) = tokio::task::spawn_blocking(move || manager.refresh()).await {
                tracing::error!(error = %e, "index refresh task aborted");
            }
        }
    })
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let page = state.manager.perform_search_page(&params.q).map_err(api_error)?;
    let total_hits = page.total_hits;
    let k = params.k.max(1);
    let results = page
        .items
        .into_iter()
        .take(k)
        .map(|item| SearchHit { score: item.relevance_score, item })
        .collect();
    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results }))
}

pub async fn products_handler(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse>, ApiError> {
    let sort_by = match params.sortby.as_deref() {
        Some(raw) if !raw.is_empty() => raw.parse::<SortKey>().map_err(api_error)?,
        _ => SortKey::default(),
    };
    let category = match params.category.as_deref() {
        Some(raw) if !raw.is_empty() => Some(raw.parse::<Category>().map_err(api_error)?),
        _ => None,
    };
    let products = state.manager.browse(category, sort_by).map_err(api_error)?;
    Ok(Json(ListingResponse { sort_by, category, total: products.len(), products }))
}

async fn refresh_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<RefreshResponse>, ApiError> {
    authorize(&state, &headers)?;
    let manager = state.manager.clone();
    let snapshot = tokio::task::spawn_blocking(move || manager.refresh())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(api_error)?;
    Ok(Json(RefreshResponse {
        items: snapshot.item_count(),
        name_terms: snapshot.term_count(Field::Name),
        description_terms: snapshot.term_count(Field::Description),
        keyword_terms: snapshot.term_count(Field::Keyword),
    }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
