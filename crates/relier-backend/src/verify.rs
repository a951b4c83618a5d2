//! ID token decoding and signature verification.

use crate::claims::{Audience, VerifiedIdToken};
use crate::config::OidcConfig;
use crate::errors::{BackendError, Result};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

/// Validates ID tokens against the configured client secret
///
/// Tokens are HMAC-signed with the client secret (HS256). The secret is
/// resolved once at construction: when `client_secret_encoded` is set the
/// configured value is base64url-decoded before use as the key, and a
/// malformed value fails here rather than on the first login.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    verify_signature: bool,
}

impl TokenVerifier {
    /// Build a verifier from the relying-party configuration
    pub fn new(config: &OidcConfig) -> Result<Self> {
        let decoding_key = if config.client_secret_encoded {
            let secret = URL_SAFE
                .decode(config.client_secret.as_bytes())
                .map_err(|e| BackendError::ConfigurationInvalid {
                    name: "OIDC_RP_CLIENT_SECRET",
                    message: format!("Secret is flagged base64-encoded but does not decode: {e}"),
                })?;
            DecodingKey::from_secret(&secret)
        } else {
            DecodingKey::from_secret(config.client_secret.as_bytes())
        };

        Ok(TokenVerifier {
            decoding_key,
            verify_signature: config.verify_jwt,
        })
    }

    /// Decode and validate a raw ID token
    ///
    /// Two-pass by design: the token is first decoded without signature
    /// verification solely to extract its `aud` claim, because the
    /// audience the token was issued for is what the full validation
    /// must check against. The first pass establishes no trust.
    ///
    /// Any signature, audience, expiry or format failure aborts the whole
    /// authentication attempt as [`BackendError::InvalidToken`].
    pub fn verify(&self, raw_token: &str) -> Result<VerifiedIdToken> {
        let audience = peek_audience(raw_token)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(audience.values());
        if !self.verify_signature {
            // OIDC_VERIFY_JWT=false: claims are still validated, the
            // signature is not. Unsafe outside test rigs.
            validation.insecure_disable_signature_validation();
        }

        let token = decode::<serde_json::Value>(raw_token, &self.decoding_key, &validation)
            .map_err(|e| BackendError::InvalidToken(e.to_string()))?;

        let claims = match token.claims {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(BackendError::InvalidToken(format!(
                    "Payload is not a JSON object: {other}"
                )))
            }
        };

        Ok(VerifiedIdToken { audience, claims })
    }
}

/// Extract the `aud` claim without any verification
fn peek_audience(raw_token: &str) -> Result<Audience> {
    #[derive(Deserialize)]
    struct AudOnly {
        aud: Audience,
    }

    let mut insecure = Validation::new(Algorithm::HS256);
    insecure.insecure_disable_signature_validation();
    insecure.required_spec_claims.clear();
    insecure.validate_exp = false;
    insecure.validate_aud = false;

    let token = decode::<AudOnly>(raw_token, &DecodingKey::from_secret(&[]), &insecure)
        .map_err(|e| BackendError::InvalidToken(format!("Cannot read audience: {e}")))?;

    Ok(token.claims.aud)
}
