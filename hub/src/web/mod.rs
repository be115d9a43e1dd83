//! Web server module for the hub
//!
//! Provides the HTTP server with the REST API, the VNC WebSocket bridge,
//! and the embedded static frontend.

pub mod api;
pub mod files;
pub mod state;
pub mod vnc;

use anyhow::Result;
use axum::{
    http::{header, StatusCode, Uri},
    response::{Html, Response},
    routing::{get, post},
    Router,
};
use rust_embed::RustEmbed;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::HubConfig;
use crate::error::set_expose_detail;
use state::AppState;

/// Embedded static files for the frontend (production mode)
#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

/// Start the web server
pub async fn serve(config: HubConfig, dev_mode: bool) -> Result<()> {
    let dev_mode = dev_mode || config.server.dev_mode;
    set_expose_detail(dev_mode);

    let state = AppState::new(&config)?;
    tracing::info!(
        "tool registry seeded with {} tools, files root {}",
        state.tools.registered_tools().len(),
        state.sandbox.root().display()
    );

    let app = create_router(state, dev_mode);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("hub listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: AppState, dev_mode: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Tools
        .route("/tools", get(api::list_tools).post(api::register_tool))
        .route(
            "/tools/{id}",
            get(api::get_tool)
                .patch(api::update_tool)
                .delete(api::delete_tool),
        )
        // Files
        .route("/files/tree", get(files::tree))
        .route("/files/content", get(files::content))
        .route("/files/save", post(files::save))
        // Chat
        .route("/chat", post(api::chat))
        // Remote sessions
        .route(
            "/remote",
            get(api::list_sessions).post(api::register_session),
        )
        .route(
            "/remote/{id}",
            get(api::get_session).delete(api::delete_session),
        );

    let ws_routes = Router::new().route("/vnc/{id}", get(vnc::vnc_handler));

    let mut router = Router::new()
        .route("/health", get(api::health_check))
        .nest("/api", api_routes)
        .nest("/ws", ws_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Static file serving
    if dev_mode {
        // In dev mode the React frontend runs on its own port; show pointers
        router = router.fallback(dev_fallback);
    } else {
        // In production, serve embedded static files
        router = router.fallback(static_handler);
    }

    router
}

/// Serve embedded static files (production mode)
async fn static_handler(uri: Uri) -> Response<axum::body::Body> {
    let path = uri.path().trim_start_matches('/');

    // Try the exact path first
    if let Some(content) = StaticAssets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let body = axum::body::Body::from(content.data.to_vec());
        return Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime.as_ref())
            .body(body)
            .unwrap();
    }

    // For SPA routing, serve index.html for non-file paths
    if !path.contains('.') || path.is_empty() {
        if let Some(content) = StaticAssets::get("index.html") {
            let body = axum::body::Body::from(content.data.to_vec());
            return Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/html")
                .body(body)
                .unwrap();
        }
    }

    // 404 for missing files
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(axum::body::Body::from("Not Found"))
        .unwrap()
}

/// Dev mode fallback - shows instructions
async fn dev_fallback() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Hub - Dev Mode</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
            max-width: 600px;
            margin: 100px auto;
            padding: 20px;
            background: #1a1a2e;
            color: #eee;
        }
        h1 { color: #38bdf8; }
        code {
            background: #16213e;
            padding: 2px 8px;
            border-radius: 4px;
        }
        a { color: #38bdf8; }
    </style>
</head>
<body>
    <h1>Hub backend is running</h1>
    <p>This is the dev fallback page. Start the frontend dev server and point
    it at this backend, or hit the API directly:</p>
    <ul>
        <li><code>GET /health</code></li>
        <li><code>GET /api/tools</code></li>
        <li><code>GET /api/files/tree</code></li>
        <li><code>POST /api/chat</code></li>
    </ul>
</body>
</html>"#,
    )
}
