//! Professor Al Gorithm · Algorithm Design Canvas Backend
//!
//! - Axum HTTP + WebSocket API
//! - Keyword pattern detection and phase guidance for the four canvas phases
//! - Optional remote catalog provider with a built-in fallback catalog
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                      : u16 (default 3000)
//!   CATALOG_API_TOKEN         : enables the remote catalog provider if present
//!   CATALOG_API_BASE_URL      : default "http://127.0.0.1:8080/v1"
//!   CATALOG_API_TIMEOUT_SECS  : per-attempt timeout (default 10)
//!   CATALOG_API_MAX_ATTEMPTS  : attempts per call, 1..=3 (default 3)
//!   CATALOG_API_BACKOFF_MS    : fixed delay between attempts (default 500)
//!   CANVAS_CONFIG_PATH        : path to TOML config (guardrails, session limits, optional challenge bank)
//!   LOG_LEVEL                 : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT                : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod catalog;
mod patterns;
mod guidance;
mod session;
mod provider;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::catalog::Catalog;
use crate::config::load_canvas_config_from_env;
use crate::provider::{CatalogProvider, HttpCatalogProvider, ProviderSettings};
use crate::routes::build_router;
use crate::state::AppState;

/// Remote provider if a token is configured and the client builds; otherwise fallback-only.
fn build_provider() -> Option<Arc<dyn CatalogProvider>> {
  let settings = ProviderSettings::from_env()?;
  match HttpCatalogProvider::new(settings) {
    Ok(p) => {
      info!(target: "professor", base_url = %p.base_url(), "Catalog provider configured");
      Some(Arc::new(p))
    }
    Err(e) => {
      error!(target: "professor", error = %e, "Failed to build catalog provider; continuing with the built-in catalog");
      None
    }
  }
}

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Config file is optional; errors were already logged by the loader.
  let cfg = load_canvas_config_from_env().unwrap_or_default();
  let catalog = Catalog::with_bank(&cfg.challenges);

  let state = Arc::new(
    AppState::new(catalog, build_provider(), cfg.guardrails)
      .with_session_limits(cfg.sessions.idle_ttl(), cfg.sessions.max_sessions),
  );

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "professor", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
