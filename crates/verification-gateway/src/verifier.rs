//! Proof-verification collaborator seam.
//!
//! The gateway never inspects proofs itself; it hands them to a
//! verifier behind [`ProofVerifier`] together with the resolved
//! options. The verification flow mirrors the hub's two-pass
//! contract: a preliminary pass surfaces the session identifier from
//! the public signals, then a configured pass produces the result.

use async_trait::async_trait;
use disclosure_common::{Error, ResolvedOptions, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Result of a configured verification pass.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub is_valid: bool,
    /// Disclosed personal-data fields, keyed by field name.
    pub credential_subject: Map<String, Value>,
    /// Verifier-reported detail on why a proof was rejected. Opaque
    /// to the gateway; surfaced verbatim on failure.
    pub details: Value,
}

/// Boundary to the proof-verification collaborator.
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    /// Preliminary pass: surface the session identifier the proof's
    /// public signals carry, if any.
    async fn extract_user_id(&self, proof: &Value, public_signals: &Value)
        -> Result<Option<String>>;

    /// Configured pass: verify the proof under the resolved options.
    async fn verify(
        &self,
        proof: &Value,
        public_signals: &Value,
        options: &ResolvedOptions,
    ) -> Result<VerificationOutcome>;
}

/// Verifier configuration sent to the hub. Country exclusions go out
/// as full names, which is what the hub matches against.
#[derive(Debug, Serialize)]
struct HubVerifierConfig {
    #[serde(rename = "minimumAge", skip_serializing_if = "Option::is_none")]
    minimum_age: Option<u32>,
    #[serde(rename = "excludedCountries")]
    excluded_countries: Vec<String>,
    ofac: bool,
    disclosures: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct HubVerifyRequest<'a> {
    proof: &'a Value,
    #[serde(rename = "publicSignals")]
    public_signals: &'a Value,
    scope: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<HubVerifierConfig>,
}

#[derive(Debug, Deserialize)]
struct HubVerifyResponse {
    #[serde(rename = "isValid")]
    is_valid: bool,
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "credentialSubject", default)]
    credential_subject: Map<String, Value>,
    #[serde(rename = "isValidDetails", default)]
    is_valid_details: Value,
}

/// HTTP client for the verification hub.
pub struct HubProofVerifier {
    base_url: String,
    scope: String,
    client: reqwest::Client,
}

impl HubProofVerifier {
    pub fn new(base_url: String, scope: String) -> Self {
        Self {
            base_url,
            scope,
            client: reqwest::Client::new(),
        }
    }

    async fn post_verify(
        &self,
        proof: &Value,
        public_signals: &Value,
        config: Option<HubVerifierConfig>,
    ) -> Result<HubVerifyResponse> {
        let url = format!("{}/verify", self.base_url);
        debug!("Posting proof to verifier hub: {}", url);

        let request = HubVerifyRequest {
            proof,
            public_signals,
            scope: &self.scope,
            config,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Verifier(format!("Verifier hub unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Verifier(format!(
                "Verifier hub returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Verifier(format!("Invalid verifier hub response: {}", e)))
    }
}

#[async_trait]
impl ProofVerifier for HubProofVerifier {
    async fn extract_user_id(
        &self,
        proof: &Value,
        public_signals: &Value,
    ) -> Result<Option<String>> {
        let response = self.post_verify(proof, public_signals, None).await?;
        Ok(response.user_id)
    }

    async fn verify(
        &self,
        proof: &Value,
        public_signals: &Value,
        options: &ResolvedOptions,
    ) -> Result<VerificationOutcome> {
        let disclosures = options
            .disclosures
            .flags()
            .into_iter()
            .map(|(field, enabled)| (field.to_string(), Value::Bool(enabled)))
            .collect();

        let config = HubVerifierConfig {
            minimum_age: options.age_check_enabled().then_some(options.minimum_age),
            excluded_countries: options.excluded_country_names(),
            ofac: options.ofac,
            disclosures,
        };

        let response = self
            .post_verify(proof, public_signals, Some(config))
            .await?;

        Ok(VerificationOutcome {
            is_valid: response.is_valid,
            credential_subject: response.credential_subject,
            details: response.is_valid_details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serializes_camel_case_wire_names() {
        let options = ResolvedOptions::default();
        let config = HubVerifierConfig {
            minimum_age: Some(options.minimum_age),
            excluded_countries: options.excluded_country_names(),
            ofac: options.ofac,
            disclosures: Map::new(),
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["minimumAge"], 18);
        assert_eq!(json["ofac"], true);
        assert_eq!(
            json["excludedCountries"][0],
            "Iran (Islamic Republic of)"
        );
    }

    #[test]
    fn test_disabled_age_check_omitted_from_config() {
        let config = HubVerifierConfig {
            minimum_age: None,
            excluded_countries: vec![],
            ofac: false,
            disclosures: Map::new(),
        };

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("minimumAge").is_none());
    }

    #[test]
    fn test_hub_response_parses_with_missing_optionals() {
        let json = r#"{"isValid": false, "userId": null}"#;
        let parsed: HubVerifyResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.is_valid);
        assert!(parsed.user_id.is_none());
        assert!(parsed.credential_subject.is_empty());
        assert!(parsed.is_valid_details.is_null());
    }
}
