use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use readnext_core::persist::LibraryPaths;
use readnext_core::{BookSummary, Library, QueryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct TopRatedParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}
fn default_limit() -> usize { 151 }

#[derive(Deserialize)]
pub struct RecommendParams {
    pub title: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct TopRatedResponse {
    pub count: usize,
    pub books: Vec<BookSummary>,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub title: String,
    pub count: usize,
    pub books: Vec<BookSummary>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub library: Arc<Library>,
}

pub fn build_app(data_dir: String) -> Result<Router> {
    // Load all tables at startup; requests only read them afterwards
    let paths = LibraryPaths::new(&data_dir);
    let library = Library::load(&paths)?;
    let app_state = AppState { library: Arc::new(library) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
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
    };

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/api/top-rated", get(top_rated_handler))
        .route("/api/recommend", get(recommend_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    Ok(app)
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

pub async fn top_rated_handler(
    State(state): State<AppState>,
    Query(params): Query<TopRatedParams>,
) -> Json<TopRatedResponse> {
    let limit = params.limit.max(1).min(500);
    let books = state.library.top_rated(limit);
    Json(TopRatedResponse { count: books.len(), books })
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResponse>, (StatusCode, Json<ErrorResponse>)> {
    let title = params.title.trim();
    if title.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: "empty title".into() }),
        ));
    }
    let k = params.k.max(1).min(50);
    match state.library.recommend(title, k) {
        Ok(books) => Ok(Json(RecommendResponse {
            title: title.to_string(),
            count: books.len(),
            books,
        })),
        Err(err @ QueryError::UnknownTitle(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse { error: err.to_string() }),
        )),
    }
}
