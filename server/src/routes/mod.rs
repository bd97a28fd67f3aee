//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module stitches host endpoints, the `/api` proxy, and Leptos SSR
//! rendering under a single Axum router. Compiled WASM/CSS assets are
//! served from the site root's `pkg` directory.

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::path::PathBuf;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{any, get};
use axum::{Json, Router};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use portal::types::PortalSettings;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::proxy;
use crate::state::AppState;

/// Host endpoints plus the API proxy.
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/{*path}", any(proxy::forward))
        .route("/portal/config.json", get(portal_config))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Full application: host endpoints + Leptos SSR + static assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[[workspace.metadata.leptos]]` section).
pub fn app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

/// Public settings the browser loads on startup.
async fn portal_config(State(state): State<AppState>) -> Json<PortalSettings> {
    Json(state.config.settings())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
