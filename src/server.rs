//! Preview server: exposes the listing pipeline, landing pages, quiz
//! matching, discovery-call requests, blog posts and the debug console over
//! HTTP.

use crate::blog::BlogPost;
use crate::coach::Coach;
use crate::debug_console::DebugConsole;
use crate::discovery::{DiscoveryCallRequest, DiscoveryClient};
use crate::error::AppError;
use crate::filters::ListingQuery;
use crate::i18n::Language;
use crate::markdown::escape_html;
use crate::pipeline::run_pipeline;
use crate::quiz::{match_coaches, CoachMatch, QuizAnswers};
use crate::seo::LandingPage;
use crate::store::StoreClient;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Number of coaches returned by the quiz.
pub const QUIZ_RESULTS: usize = 5;

pub struct AppState {
    pub store: StoreClient,
    pub discovery: DiscoveryClient,
    /// `None` when the console is disabled
    pub console: Option<DebugConsole>,
    pub default_language: Language,
}

#[derive(Debug, Serialize)]
struct ListingResponse {
    coaches: Vec<Coach>,
    total: usize,
    active_filters: usize,
    no_results: bool,
}

#[derive(Debug, Serialize)]
struct LandingResponse {
    slug: String,
    title: String,
    description: String,
    coaches: Vec<Coach>,
}

#[derive(Debug, Default, Deserialize)]
struct LanguageQuery {
    lang: Option<String>,
}

impl LanguageQuery {
    /// Requested language, else the server default.
    fn resolve(&self, default: Language) -> Language {
        self.lang
            .as_deref()
            .and_then(|code| Language::from_code(code).ok())
            .unwrap_or(default)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Remote(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        };
        let body = serde_json::json!({ "error": self.user_message() });
        (status, Json(body)).into_response()
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/coaches", get(list_coaches))
        .route("/landing/:slug", get(landing_page))
        .route("/quiz/match", post(quiz_match))
        .route("/discovery-call", post(discovery_call))
        .route("/blog/:slug", get(blog_post))
        .route("/debug/console", get(debug_console))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to `port` on all interfaces and serve until the process exits.
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Preview server listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .await
        .context("Server error")?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn list_coaches(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingResponse>, AppError> {
    let (search, filters) = query.into_parts();
    let coaches = state.store.fetch_coaches().await?;
    let listing = run_pipeline(&coaches, &search, &filters);

    Ok(Json(ListingResponse {
        total: listing.len(),
        active_filters: listing.active_filters,
        no_results: listing.is_empty(),
        coaches: listing.coaches,
    }))
}

async fn landing_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<Response, AppError> {
    let Some(page) = LandingPage::from_slug(&slug) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let language = query.resolve(state.default_language);

    let coaches = state.store.fetch_coaches().await?;
    let listing = run_pipeline(&coaches, "", &page.filters());

    Ok(Json(LandingResponse {
        slug: page.slug(),
        title: page.meta_title(language),
        description: page.meta_description(language, listing.len()),
        coaches: listing.coaches,
    })
    .into_response())
}

async fn quiz_match(
    State(state): State<Arc<AppState>>,
    Json(answers): Json<QuizAnswers>,
) -> Result<Json<Vec<CoachMatch>>, AppError> {
    let coaches = state.store.fetch_coaches().await?;
    Ok(Json(match_coaches(&coaches, &answers, QUIZ_RESULTS)))
}

/// Forward a discovery-call form to the API. Validation messages come back
/// in the requested language.
async fn discovery_call(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LanguageQuery>,
    Json(request): Json<DiscoveryCallRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let language = query.resolve(state.default_language);
    state.discovery.submit(request, language).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

async fn blog_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    match state.store.fetch_post_by_slug(&slug).await? {
        Some(post) if post.published => Ok(Html(render_post_page(&post)).into_response()),
        _ => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

fn render_post_page(post: &BlogPost) -> String {
    format!(
        "<article>\n<h1>{}</h1>\n<p class=\"reading-time\">{} min read</p>\n{}\n</article>",
        escape_html(&post.title),
        post.reading_time_minutes(),
        post.render_html()
    )
}

async fn debug_console(State(state): State<Arc<AppState>>) -> Response {
    match &state.console {
        Some(console) => console.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
