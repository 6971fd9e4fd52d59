//! Verification Gateway
//!
//! Backend for a zero-knowledge identity-verification demo. The
//! browser saves per-session disclosure/verification options, a
//! mobile wallet later submits a proof carrying the same session id,
//! and this service bridges the two through an ephemeral, TTL-bounded,
//! consume-on-read options store.
//!
//! ## Endpoints
//!
//! - `POST /save-options` - Save verification options for a session id
//! - `POST /verify` - Verify a proof, applying the saved options
//! - `GET /health` - Health check

pub mod clock;
pub mod config;
pub mod handlers;
pub mod redact;
pub mod store;
pub mod sweeper;
pub mod verifier;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use clock::{Clock, ManualClock, SystemClock};
pub use handlers::AppState;
pub use store::OptionsStore;
pub use sweeper::spawn_sweeper;
pub use verifier::{HubProofVerifier, ProofVerifier, VerificationOutcome};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/save-options", post(handlers::save_options_handler))
        .route("/verify", post(handlers::verify_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
