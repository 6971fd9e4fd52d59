//! API request handlers for the verification gateway.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use disclosure_common::{resolve, Error, ResolvedOptions, VerificationOptions};

use crate::redact::redact_credential_subject;
use crate::store::OptionsStore;
use crate::verifier::ProofVerifier;

/// Shared application state
pub struct AppState {
    pub store: Arc<OptionsStore>,
    pub verifier: Arc<dyn ProofVerifier>,
    pub defaults: ResolvedOptions,
}

impl AppState {
    pub fn new(store: Arc<OptionsStore>, verifier: Arc<dyn ProofVerifier>) -> Self {
        Self {
            store,
            verifier,
            defaults: ResolvedOptions::default(),
        }
    }
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "message": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(message) => ApiError {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            other => {
                error!("Internal error: {}", other);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal server error".to_string(),
                }
            }
        }
    }
}

/// Request to save verification options for a session
#[derive(Debug, Deserialize)]
pub struct SaveOptionsRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub options: Option<VerificationOptions>,
}

/// Response from saving options
#[derive(Debug, Serialize)]
pub struct SaveOptionsResponse {
    pub message: String,
}

/// Request to verify a proof
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub proof: Option<Value>,
    #[serde(rename = "publicSignals")]
    pub public_signals: Option<Value>,
}

/// Options echoed back with a successful verification
#[derive(Debug, Serialize)]
pub struct AppliedOptions {
    #[serde(rename = "minimumAge")]
    pub minimum_age: u32,
    pub ofac: bool,
    #[serde(rename = "excludedCountries")]
    pub excluded_countries: Vec<String>,
}

/// Successful verification response
#[derive(Debug, Serialize)]
pub struct VerifySuccessResponse {
    pub status: &'static str,
    pub result: bool,
    #[serde(rename = "credentialSubject")]
    pub credential_subject: Map<String, Value>,
    #[serde(rename = "verificationOptions")]
    pub verification_options: AppliedOptions,
}

/// Failed verification response
#[derive(Debug, Serialize)]
pub struct VerifyFailureResponse {
    pub status: &'static str,
    pub result: bool,
    pub message: String,
    pub details: Value,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "verification-gateway"
    }))
}

/// Save verification options for a session id.
///
/// The configuration UI may call this repeatedly while the user
/// adjusts options; the latest save wins.
pub async fn save_options_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveOptionsRequest>,
) -> Result<Json<SaveOptionsResponse>, ApiError> {
    let user_id = match payload.user_id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(Error::Validation("User ID is required".to_string()).into()),
    };

    let mut options = payload
        .options
        .ok_or_else(|| Error::Validation("Options are required".to_string()))?;

    let dropped = options.normalize();
    if dropped > 0 {
        warn!(
            "Dropped {} excluded-country entr(ies) for user {} during normalization",
            dropped, user_id
        );
    }

    info!("Saving options for user: {}", user_id);
    state.store.set(&user_id, options).await;

    Ok(Json(SaveOptionsResponse {
        message: "Options saved successfully".to_string(),
    }))
}

/// Verify a proof, applying any options saved for its session id.
///
/// The saved record is consumed by this read; a retry for the same
/// session id falls back to the system defaults.
pub async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Response, ApiError> {
    let (proof, public_signals) = match (payload.proof, payload.public_signals) {
        (Some(proof), Some(signals)) => (proof, signals),
        _ => {
            return Err(
                Error::Validation("Proof and publicSignals are required".to_string()).into(),
            )
        }
    };

    // Preliminary pass: surface the session id from the public signals
    let user_id = state
        .verifier
        .extract_user_id(&proof, &public_signals)
        .await?;

    let saved = match &user_id {
        Some(id) => {
            let saved = state.store.take(id).await;
            if saved.is_none() {
                debug!("No saved options for user {}, using defaults", id);
            }
            saved
        }
        None => {
            debug!("No user id in public signals, using default options");
            None
        }
    };

    let resolved = resolve(saved.as_ref(), &state.defaults);

    let outcome = state
        .verifier
        .verify(&proof, &public_signals, &resolved)
        .await?;

    if !outcome.is_valid {
        info!("Proof verification failed for user: {:?}", user_id);
        let body = VerifyFailureResponse {
            status: "error",
            result: false,
            message: "Verification failed".to_string(),
            details: outcome.details,
        };
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let mut credential_subject = outcome.credential_subject;
    redact_credential_subject(&mut credential_subject, &resolved.disclosures);

    info!("Proof verified for user: {:?}", user_id);

    let body = VerifySuccessResponse {
        status: "success",
        result: true,
        credential_subject,
        verification_options: AppliedOptions {
            minimum_age: resolved.minimum_age,
            ofac: resolved.ofac,
            excluded_countries: resolved.excluded_countries,
        },
    };

    Ok((StatusCode::OK, Json(body)).into_response())
}
