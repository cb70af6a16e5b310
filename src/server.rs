//! HTTP API server.
//!
//! Serves the quote and image catalogs as JSON, plus a weather passthrough.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | API description |
//! | `GET`  | `/health` | Liveness check (no dependency checks) |
//! | `GET`  | `/quotes?language=` | Quotes in one language (default from config) |
//! | `GET`  | `/quotes/{id}` | One quote |
//! | `GET`  | `/quotes/random?language=&quotes=` | Random unseen quote, `seen_quotes` cookie |
//! | `GET`  | `/quotes/languages` | Languages with quote counts |
//! | `GET`  | `/images?photographer=&category=` | Images, optionally filtered |
//! | `GET`  | `/images/{id}` | One image |
//! | `GET`  | `/images/random?categories=&photographers=` | Random unseen image, `seen_images` cookie |
//! | `GET`  | `/images/categories` | Categories with image counts |
//! | `GET`  | `/images/photographers` | Photographers with image counts |
//! | `GET`  | `/images/sizes` | Fixed list of CDN renditions |
//! | `GET`  | `/weather?city=` | Weather for a city |
//! | `GET`  | `/weather/location?lat=&lon=` | Weather for coordinates |
//!
//! Query parameters on the random endpoints are repeatable
//! (`?language=en&language=fr`).
//!
//! # Error Contract
//!
//! Errors are `text/plain` with a non-2xx status: `404` for an unknown ID,
//! `400` for missing weather parameters, `503` when weather is not
//! configured, `502` when the weather provider fails, `500` otherwise
//! (including a random pick that exhausted every fallback).
//!
//! # Cookie opt-out
//!
//! `no-cookie=1` on any route drops the incoming `Cookie` header before the
//! handler runs and strips `Set-Cookie` from the response.

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::{CookieJar, Query};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{self, Catalog};
use crate::error::CatalogError;
use crate::images;
use crate::models::{
    CategoryCount, Image, ImageSize, LanguageCount, PhotographerCount, Quote, IMAGE_SIZES,
};
use crate::quotes;
use crate::seen::{self, CookieConfig};
use crate::weather::{Location, Weather, WeatherClient};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    catalog: Catalog,
    cookies: Arc<CookieConfig>,
    default_language: Arc<str>,
    weather: Option<WeatherClient>,
}

impl AppState {
    pub fn new(catalog: Catalog, config: &Config) -> anyhow::Result<Self> {
        let weather = config.weather.as_ref().map(WeatherClient::new).transpose()?;
        Ok(Self {
            catalog,
            cookies: Arc::new(config.cookies.clone()),
            default_language: Arc::from(config.quotes.default_language.as_str()),
            weather,
        })
    }
}

/// Builds the application router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/quotes", get(handle_list_quotes))
        .route("/quotes/random", get(handle_random_quote))
        .route("/quotes/languages", get(handle_quote_languages))
        .route("/quotes/{id}", get(handle_get_quote))
        .route("/images", get(handle_list_images))
        .route("/images/random", get(handle_random_image))
        .route("/images/categories", get(handle_image_categories))
        .route("/images/photographers", get(handle_image_photographers))
        .route("/images/sizes", get(handle_image_sizes))
        .route("/images/{id}", get(handle_get_image))
        .route("/weather", get(handle_weather_city))
        .route("/weather/location", get(handle_weather_location))
        .layer(middleware::from_fn(no_cookie))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server.
///
/// Connects to both catalogs (failing fast if either is unreachable), binds
/// to `[server].bind`, and serves until Ctrl-C or SIGTERM.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let catalog = db::connect_catalog(config).await?;
    let state = AppState::new(catalog.clone(), config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("API server listening on http://{}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    catalog.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}

// ============ Cookie opt-out ============

#[derive(Deserialize)]
struct NoCookieParams {
    #[serde(default, rename = "no-cookie")]
    no_cookie: Vec<String>,
}

/// True when the first `no-cookie` value is `1`. An unparseable query string
/// never opts out.
fn no_cookie_requested(uri: &Uri) -> bool {
    Query::<NoCookieParams>::try_from_uri(uri)
        .ok()
        .and_then(|Query(params)| params.no_cookie.into_iter().next())
        .is_some_and(|value| value == "1")
}

async fn no_cookie(mut request: Request, next: Next) -> Response {
    let opted_out = no_cookie_requested(request.uri());
    if opted_out {
        request.headers_mut().remove(header::COOKIE);
    }

    let mut response = next.run(request).await;
    if opted_out {
        response.headers_mut().remove(header::SET_COOKIE);
    }
    response
}

// ============ Error response ============

/// Internal error type that converts into a plain-text HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A random pick that ran out of fallbacks, or any storage failure.
    fn internal(err: CatalogError) -> Self {
        tracing::warn!("request failed: {}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        if err.is_not_found() {
            Self::new(StatusCode::NOT_FOUND, err.to_string())
        } else {
            Self::internal(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

// ============ GET / and /health ============

#[derive(Serialize)]
struct Endpoint {
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct ApiInfo {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    endpoints: Vec<Endpoint>,
    documentation_url: &'static str,
}

const ENDPOINTS: &[(&str, &str)] = &[
    ("/", "API description"),
    ("/health", "Health check"),
    ("/quotes", "List quotes in a language"),
    ("/quotes/{id}", "Retrieve a quote by its ID"),
    ("/quotes/random", "Retrieve a random unseen quote"),
    ("/quotes/languages", "List languages with quote counts"),
    ("/images", "List images, optionally by photographer or category"),
    ("/images/{id}", "Retrieve an image by its ID"),
    ("/images/random", "Retrieve a random unseen image"),
    ("/images/categories", "List categories with image counts"),
    ("/images/photographers", "List photographers with image counts"),
    ("/images/sizes", "List available image sizes"),
    ("/weather", "Current weather for a city"),
    ("/weather/location", "Current weather for coordinates"),
];

async fn handle_root() -> Json<ApiInfo> {
    Json(ApiInfo {
        name: "Mue API",
        version: env!("CARGO_PKG_VERSION"),
        description: "Random quotes, background images and weather for new-tab pages.",
        endpoints: ENDPOINTS
            .iter()
            .map(|(path, description)| Endpoint {
                method: "GET",
                path,
                description,
            })
            .collect(),
        documentation_url: "https://docs.muetab.com/",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ Quotes ============

#[derive(Deserialize)]
struct ListQuotesParams {
    #[serde(default)]
    language: Vec<String>,
}

async fn handle_list_quotes(
    State(state): State<AppState>,
    Query(params): Query<ListQuotesParams>,
) -> Result<Json<Vec<Quote>>, AppError> {
    let language = params
        .language
        .into_iter()
        .find(|l| !l.is_empty())
        .unwrap_or_else(|| state.default_language.to_string());
    let quotes = quotes::list_quotes(&state.catalog.quotes, &language).await?;
    Ok(Json(quotes))
}

async fn handle_get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Quote>, AppError> {
    Ok(Json(quotes::get_quote(&state.catalog.quotes, &id).await?))
}

async fn handle_quote_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<LanguageCount>>, AppError> {
    Ok(Json(quotes::quote_languages(&state.catalog.quotes).await?))
}

#[derive(Deserialize)]
struct RandomQuoteParams {
    #[serde(default)]
    language: Vec<String>,
    /// Author names.
    #[serde(default)]
    quotes: Vec<String>,
}

fn non_empty(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.is_empty()).collect()
}

async fn handle_random_quote(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Query(params): Query<RandomQuoteParams>,
) -> Result<(CookieJar, Json<Quote>), AppError> {
    let mut languages = non_empty(params.language);
    if languages.is_empty() {
        let preferred = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(quotes::primary_language)
            .unwrap_or_else(|| state.default_language.to_string());
        languages.push(preferred);
    }

    let cookie_name = &state.cookies.seen_quotes;
    let seen = seen::read(&jar, cookie_name);

    let pick = quotes::random_quote(
        &state.catalog.quotes,
        seen,
        languages,
        non_empty(params.quotes),
        &state.default_language,
    )
    .await
    .map_err(AppError::internal)?;

    let jar = jar.add(state.cookies.build(cookie_name, &pick.seen));
    Ok((jar, Json(pick.item)))
}

// ============ Images ============

#[derive(Deserialize)]
struct ListImagesParams {
    photographer: Option<String>,
    category: Option<String>,
}

async fn handle_list_images(
    State(state): State<AppState>,
    Query(params): Query<ListImagesParams>,
) -> Result<Json<Vec<Image>>, AppError> {
    let images = images::list_images(
        &state.catalog.images,
        params.photographer.as_deref(),
        params.category.as_deref(),
    )
    .await?;
    Ok(Json(images))
}

async fn handle_get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Image>, AppError> {
    Ok(Json(images::get_image(&state.catalog.images, &id).await?))
}

async fn handle_image_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryCount>>, AppError> {
    Ok(Json(images::image_categories(&state.catalog.images).await?))
}

async fn handle_image_photographers(
    State(state): State<AppState>,
) -> Result<Json<Vec<PhotographerCount>>, AppError> {
    Ok(Json(images::image_photographers(&state.catalog.images).await?))
}

async fn handle_image_sizes() -> Json<[ImageSize; 4]> {
    Json(IMAGE_SIZES)
}

#[derive(Deserialize)]
struct RandomImageParams {
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    photographers: Vec<String>,
}

async fn handle_random_image(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<RandomImageParams>,
) -> Result<(CookieJar, Json<Image>), AppError> {
    let cookie_name = &state.cookies.seen_images;
    let seen = seen::read(&jar, cookie_name);

    let pick = images::random_image(
        &state.catalog.images,
        seen,
        non_empty(params.categories),
        non_empty(params.photographers),
    )
    .await
    .map_err(AppError::internal)?;

    let jar = jar.add(state.cookies.build(cookie_name, &pick.seen));
    Ok((jar, Json(pick.item)))
}

// ============ Weather ============

#[derive(Deserialize)]
struct CityParams {
    city: Option<String>,
}

#[derive(Deserialize)]
struct CoordinateParams {
    lat: Option<String>,
    lon: Option<String>,
}

async fn lookup_weather(state: &AppState, location: Location) -> Result<Json<Weather>, AppError> {
    let client = state.weather.as_ref().ok_or_else(|| {
        AppError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "weather lookup is not configured",
        )
    })?;
    let weather = client.lookup(&location).await.map_err(|e| {
        tracing::warn!("weather lookup failed: {}", e);
        AppError::new(StatusCode::BAD_GATEWAY, "Failed to get weather data")
    })?;
    Ok(Json(weather))
}

async fn handle_weather_city(
    State(state): State<AppState>,
    Query(params): Query<CityParams>,
) -> Result<Json<Weather>, AppError> {
    let city = params
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::new(StatusCode::BAD_REQUEST, "city is required"))?;
    lookup_weather(&state, Location::City(city)).await
}

async fn handle_weather_location(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<Weather>, AppError> {
    match (params.lat, params.lon) {
        (Some(lat), Some(lon)) if !lat.is_empty() && !lon.is_empty() => {
            lookup_weather(&state, Location::Coordinates { lat, lon }).await
        }
        _ => Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "lat and lon are required",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::ingest::{insert_images, insert_quotes};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn quote(id: &str, language: &str) -> Quote {
        Quote {
            id: id.to_string(),
            quote: format!("quote {id}"),
            author: Some(format!("author {id}")),
            occupation: None,
            language: language.to_string(),
        }
    }

    fn image(id: &str, category: &str) -> Image {
        Image {
            id: id.to_string(),
            camera: None,
            created_at: None,
            location_data: None,
            photographer: "Ana".to_string(),
            category: category.to_string(),
            original_file_name: format!("{id}.jpg"),
            colour: "#ffffff".to_string(),
            pun: 0,
            version: 1,
            blur_hash: "L00000".to_string(),
        }
    }

    async fn app_with(quotes: &[Quote], images: &[Image]) -> Router {
        let pool = memory_pool().await.unwrap();
        insert_quotes(&pool, quotes).await.unwrap();
        insert_images(&pool, images).await.unwrap();
        let catalog = Catalog {
            quotes: pool.clone(),
            images: pool,
        };
        let config = Config::with_paths(PathBuf::from(":memory:"), PathBuf::from(":memory:"));
        router(AppState::new(catalog, &config).unwrap())
    }

    async fn send(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
        let mut req = Request::builder().uri(uri);
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        app.clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn set_cookie(resp: &Response) -> Option<cookie::Cookie<'static>> {
        resp.headers().get(header::SET_COOKIE).map(|v| {
            cookie::Cookie::parse_encoded(v.to_str().unwrap().to_string()).unwrap()
        })
    }

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_cookie_param_detection() {
        assert!(no_cookie_requested(&uri("/quotes?no-cookie=1")));
        assert!(no_cookie_requested(&uri("/quotes?language=en&no-cookie=1")));
        assert!(no_cookie_requested(&uri("/quotes?no-cookie=%31")));
        assert!(no_cookie_requested(&uri("/quotes?no-cookie=1&no-cookie=0")));
        assert!(!no_cookie_requested(&uri("/quotes?no-cookie=0&no-cookie=1")));
        assert!(!no_cookie_requested(&uri("/quotes?no-cookie=0")));
        assert!(!no_cookie_requested(&uri("/quotes?language=en")));
        assert!(!no_cookie_requested(&uri("/quotes")));
    }

    #[tokio::test]
    async fn test_no_cookie_middleware_strips_both_directions() {
        async fn echo_cookie(headers: HeaderMap) -> Response {
            let seen = headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            ([(header::SET_COOKIE, "seen_quotes=x")], seen).into_response()
        }
        let app = Router::new()
            .route("/echo", get(echo_cookie))
            .layer(middleware::from_fn(no_cookie));

        let resp = send(&app, "/echo", Some("seen_quotes=id1")).await;
        assert!(set_cookie(&resp).is_some());
        assert_eq!(body_text(resp).await, "seen_quotes=id1");

        let resp = send(&app, "/echo?no-cookie=%31", Some("seen_quotes=id1")).await;
        assert!(set_cookie(&resp).is_none());
        assert_eq!(body_text(resp).await, "");
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(&[], &[]).await;
        let resp = send(&app, "/health", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let app = app_with(&[], &[]).await;
        let body = body_json(send(&app, "/", None).await).await;
        assert_eq!(body["name"], "Mue API");
        let paths: Vec<&str> = body["endpoints"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap())
            .collect();
        assert!(paths.contains(&"/quotes/random"));
        assert!(paths.contains(&"/images/sizes"));
    }

    #[tokio::test]
    async fn test_list_quotes_defaults_to_english() {
        let app = app_with(&[quote("e1", "en"), quote("f1", "fr")], &[]).await;
        let body = body_json(send(&app, "/quotes", None).await).await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], "e1");

        let body = body_json(send(&app, "/quotes?language=fr", None).await).await;
        assert_eq!(body[0]["id"], "f1");
    }

    #[tokio::test]
    async fn test_get_quote_not_found_is_plain_text_404() {
        let app = app_with(&[quote("e1", "en")], &[]).await;
        let resp = send(&app, "/quotes/missing", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_text(resp).await, "no quote found");
    }

    #[tokio::test]
    async fn test_random_quote_sets_cookie() {
        let app = app_with(&[quote("e1", "en")], &[]).await;
        let resp = send(&app, "/quotes/random", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = set_cookie(&resp).unwrap();
        assert_eq!(cookie.name(), "seen_quotes");
        assert_eq!(cookie.value(), "e1");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(body_json(resp).await["id"], "e1");
    }

    #[tokio::test]
    async fn test_random_quote_excludes_cookie_ids() {
        let app = app_with(&[quote("id1", "en"), quote("id2", "en"), quote("id3", "en")], &[]).await;
        for _ in 0..10 {
            let resp = send(&app, "/quotes/random", Some("seen_quotes=id1,id2")).await;
            assert_eq!(set_cookie(&resp).unwrap().value(), "id1,id2,id3");
            assert_eq!(body_json(resp).await["id"], "id3");
        }
    }

    #[tokio::test]
    async fn test_random_quote_resets_exhausted_seen_set() {
        let app = app_with(&[quote("id1", "fr"), quote("e1", "en")], &[]).await;
        let resp = send(&app, "/quotes/random?language=fr", Some("seen_quotes=id1")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(set_cookie(&resp).unwrap().value(), "id1");
        assert_eq!(body_json(resp).await["id"], "id1");
    }

    #[tokio::test]
    async fn test_random_quote_uses_accept_language() {
        let app = app_with(&[quote("e1", "en"), quote("d1", "de")], &[]).await;
        let req = Request::builder()
            .uri("/quotes/random")
            .header(header::ACCEPT_LANGUAGE, "de-DE,de;q=0.9")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(body_json(resp).await["id"], "d1");
    }

    #[tokio::test]
    async fn test_random_quote_exhausted_is_500_without_cookie() {
        let app = app_with(&[quote("x1", "xx")], &[]).await;
        let resp = send(&app, "/quotes/random?language=zz", Some("seen_quotes=a")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(set_cookie(&resp).is_none());
        assert_eq!(body_text(resp).await, "no quote found");
    }

    #[tokio::test]
    async fn test_no_cookie_opt_out_ignores_incoming_cookie() {
        let app = app_with(
            &[quote("id1", "en"), quote("id2", "en"), quote("id3", "en")],
            &[],
        )
        .await;
        let mut returned_seen = false;
        for _ in 0..30 {
            let resp = send(
                &app,
                "/quotes/random?no-cookie=1",
                Some("seen_quotes=id1,id2"),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert!(set_cookie(&resp).is_none());
            let id = body_json(resp).await["id"].as_str().unwrap().to_string();
            returned_seen |= id == "id1" || id == "id2";
        }
        assert!(returned_seen, "cookie IDs were still excluded");
    }

    #[tokio::test]
    async fn test_oversized_cookie_still_picks() {
        let app = app_with(&[quote("fresh", "en")], &[]).await;
        let ids: Vec<String> = (0..40_000).map(|i| format!("{:08x}", i)).collect();
        let cookie = format!("seen_quotes={}", ids.join(","));
        let resp = send(&app, "/quotes/random", Some(&cookie)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let value = set_cookie(&resp).unwrap().value().to_string();
        assert_eq!(value.split(',').count(), seen::MAX_SEEN_IDS);
        assert!(value.ends_with(",fresh"));
        assert_eq!(body_json(resp).await["id"], "fresh");
    }

    #[tokio::test]
    async fn test_list_quotes_repeated_language_takes_first() {
        let app = app_with(&[quote("e1", "en"), quote("f1", "fr")], &[]).await;
        let resp = send(&app, "/quotes?language=fr&language=en", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], "f1");

        let body = body_json(send(&app, "/quotes?language=&language=fr", None).await).await;
        assert_eq!(body[0]["id"], "f1");
    }

    #[tokio::test]
    async fn test_quote_languages() {
        let app = app_with(&[quote("e1", "en"), quote("e2", "en"), quote("f1", "fr")], &[]).await;
        let body = body_json(send(&app, "/quotes/languages", None).await).await;
        assert_eq!(
            body,
            serde_json::json!([
                {"language": "en", "count": 2},
                {"language": "fr", "count": 1}
            ])
        );
    }

    #[tokio::test]
    async fn test_image_sizes_are_fixed() {
        let app = app_with(&[], &[]).await;
        let body = body_json(send(&app, "/images/sizes", None).await).await;
        assert_eq!(
            body,
            serde_json::json!([
                {"id": "original", "label": "original"},
                {"id": "qhd", "label": "high"},
                {"id": "fhd", "label": "normal"},
                {"id": "hd", "label": "datasaver"}
            ])
        );
    }

    #[tokio::test]
    async fn test_random_image_repeatable_categories() {
        let app = app_with(
            &[],
            &[image("i1", "nature"), image("i2", "city"), image("i3", "ocean")],
        )
        .await;
        let resp = send(
            &app,
            "/images/random?categories=nature&categories=city",
            Some("seen_images=i1"),
        )
        .await;
        let cookie = set_cookie(&resp).unwrap();
        assert_eq!(cookie.name(), "seen_images");
        assert_eq!(cookie.value(), "i1,i2");
        let body = body_json(resp).await;
        assert_eq!(body["id"], "i2");
        assert!(body.get("camera").is_none());
    }

    #[tokio::test]
    async fn test_image_lookups() {
        let app = app_with(&[], &[image("i1", "nature"), image("i2", "city")]).await;
        let body = body_json(send(&app, "/images?category=city", None).await).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let resp = send(&app, "/images/i9", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(send(&app, "/images/photographers", None).await).await;
        assert_eq!(body, serde_json::json!([{"photographer": "Ana", "count": 2}]));

        let body = body_json(send(&app, "/images/categories", None).await).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_weather_unconfigured() {
        let app = app_with(&[], &[]).await;
        let resp = send(&app, "/weather?city=Paris", None).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let resp = send(&app, "/weather/location?lat=1", None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
