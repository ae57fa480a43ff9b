//! JSON server over the post repository
//!
//! Routes live under a locale prefix (`/fr/...`, `/en/...`). A request
//! without one is redirected to the locale negotiated from its
//! `Accept-Language` header.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::{group_by_year, ContentError, MarkdownRenderer, Post, PostPage, TagCount};
use crate::generator::Generator;
use crate::i18n::Locale;
use crate::Carnet;

/// Server state
struct ServerState {
    carnet: Carnet,
    renderer: MarkdownRenderer,
}

/// Build the application router
pub fn router(carnet: Carnet) -> Result<Router> {
    let renderer = carnet.renderer()?;
    let state = Arc::new(ServerState { carnet, renderer });

    Ok(Router::new()
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .route("/:lang/posts", get(posts_handler))
        .route("/:lang/post/:slug", get(post_handler))
        .route("/:lang/tags", get(tags_handler))
        .route("/:lang/tags/:tag", get(tag_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(carnet: Carnet, ip: &str, port: u16) -> Result<()> {
    let app = router(carnet)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Errors surfaced to HTTP clients
enum ApiError {
    NotFound,
    Content(ContentError),
    Internal(String),
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        ApiError::Content(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct Body {
            error: String,
        }

        let (status, error) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Content(e) => {
                tracing::error!("{}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Internal(e) => {
                tracing::error!("{}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e)
            }
        };
        (status, Json(Body { error })).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Run blocking filesystem work off the async runtime
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

fn parse_locale(lang: &str) -> ApiResult<Locale> {
    lang.parse().map_err(|_| ApiError::NotFound)
}

async fn posts_handler(
    State(state): State<Arc<ServerState>>,
    Path(lang): Path<String>,
) -> ApiResult<Json<Vec<Post>>> {
    let lang = parse_locale(&lang)?;
    let posts = blocking(move || Ok(state.carnet.repository().get_all_posts(lang)?)).await?;
    Ok(Json(posts))
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path((lang, slug)): Path<(String, String)>,
) -> ApiResult<Json<PostPage>> {
    let lang = parse_locale(&lang)?;
    let page = blocking(move || {
        let repo = state.carnet.repository();
        Ok(PostPage::build(&repo, &state.renderer, lang, &slug)?)
    })
    .await?;
    page.map(Json).ok_or(ApiError::NotFound)
}

async fn tags_handler(
    State(state): State<Arc<ServerState>>,
    Path(lang): Path<String>,
) -> ApiResult<Json<Vec<TagCount>>> {
    let lang = parse_locale(&lang)?;
    let tags = blocking(move || Ok(state.carnet.repository().tags(lang)?)).await?;
    Ok(Json(tags))
}

/// Posts carrying a tag, grouped by year, most recent year first
async fn tag_handler(
    State(state): State<Arc<ServerState>>,
    Path((lang, tag)): Path<(String, String)>,
) -> ApiResult<Json<IndexMap<String, Vec<Post>>>> {
    let lang = parse_locale(&lang)?;
    let posts =
        blocking(move || Ok(state.carnet.repository().get_posts_by_tag(lang, &tag)?)).await?;
    Ok(Json(group_by_year(posts)))
}

async fn sitemap_handler(State(state): State<Arc<ServerState>>) -> ApiResult<Response> {
    let xml = blocking(move || Ok(Generator::new(&state.carnet).sitemap())).await?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

async fn robots_handler(State(state): State<Arc<ServerState>>) -> String {
    Generator::new(&state.carnet).robots()
}

/// Redirect paths lacking a locale prefix; anything else is unknown
async fn fallback_handler(headers: HeaderMap, uri: Uri) -> ApiResult<Response> {
    if Locale::from_path(uri.path()).is_some() {
        return Err(ApiError::NotFound);
    }

    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let lang = Locale::negotiate(accept_language);

    let path = uri.path().trim_end_matches('/');
    let mut target = format!("/{}{}", lang, path);
    if let Some(query) = uri.query() {
        target.push('?');
        target.push_str(query);
    }

    tracing::debug!("Redirecting {} to {}", uri, target);
    Ok(Redirect::temporary(&target).into_response())
}
