//! Authorization redirect construction.

use crate::config::OidcConfig;
use crate::errors::{BackendError, Result};
use url::Url;

/// Build the URL the browser is redirected to when authentication starts
///
/// Pure: appends `response_type=code`, `scope=openid`, `client_id` and
/// `redirect_uri` to the configured authorization endpoint. The only
/// failure mode is a malformed endpoint in configuration.
pub fn build_authorization_redirect(config: &OidcConfig) -> Result<Url> {
    let mut url = Url::parse(&config.authorization_endpoint).map_err(|e| {
        BackendError::ConfigurationInvalid {
            name: "OIDC_OP_AUTHORIZATION_ENDPOINT",
            message: e.to_string(),
        }
    })?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("scope", "openid")
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.callback_url);

    Ok(url)
}
