//! OAuth2 client-credentials token source for the lock platform

use async_trait::async_trait;
use chrono::Utc;
use oauth2::basic::BasicClient;
use oauth2::{
    ClientId, ClientSecret, EndpointNotSet, EndpointSet, RequestTokenError, Scope, TokenResponse,
    TokenUrl,
};
use pinsync_core::{AccessToken, AccessTokenSource};
use pinsync_domain::constants::LOCK_TOKEN_SCOPES;
use pinsync_domain::{LockConfig, PinSyncError, Result};
use tracing::{debug, instrument};

type TokenClient =
    BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Requests bearer tokens with the client-credentials grant (HTTP Basic
/// client authentication).
pub struct IglooTokenSource {
    client: TokenClient,
    http: reqwest::Client,
}

impl IglooTokenSource {
    pub fn new(config: &LockConfig) -> Result<Self> {
        let token_url = TokenUrl::new(config.token_url.clone()).map_err(|err| {
            PinSyncError::Config(format!("invalid lock.token_url '{}': {err}", config.token_url))
        })?;

        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_token_uri(token_url);

        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(|err| PinSyncError::Internal(format!("failed to build OAuth client: {err}")))?;

        Ok(Self { client, http })
    }
}

#[async_trait]
impl AccessTokenSource for IglooTokenSource {
    #[instrument(skip(self))]
    async fn fetch_token(&self) -> Result<AccessToken> {
        let response = self
            .client
            .exchange_client_credentials()
            .add_scopes(LOCK_TOKEN_SCOPES.iter().map(|s| Scope::new((*s).to_string())))
            .request_async(&self.http)
            .await
            .map_err(|err| match err {
                RequestTokenError::ServerResponse(resp) => {
                    PinSyncError::Auth(format!("token endpoint rejected credentials: {resp}"))
                }
                RequestTokenError::Parse(parse, _) => {
                    PinSyncError::InvalidInput(format!("unparseable token response: {parse}"))
                }
                other => PinSyncError::Network(format!("token request failed: {other}")),
            })?;

        let expires_in = response.expires_in().map(|d| d.as_secs());
        debug!(?expires_in, "Received lock platform token");

        Ok(AccessToken::new(response.access_token().secret().clone(), Utc::now())
            .with_expiry(expires_in))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(server: &MockServer) -> LockConfig {
        LockConfig {
            api_url: format!("{}/jobs", server.uri()),
            device_id: "IGK3".into(),
            bridge_id: "BR1".into(),
            token_url: format!("{}/oauth2/token", server.uri()),
            client_id: "cid".into(),
            client_secret: "csecret".into(),
        }
    }

    #[tokio::test]
    async fn exchanges_client_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            // base64("cid:csecret")
            .and(header("authorization", "Basic Y2lkOmNzZWNyZXQ="))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("igloohomeapi%2Fget-job-status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh-token",
                "token_type": "bearer",
                "expires_in": 86400
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = IglooTokenSource::new(&config(&server)).unwrap().fetch_token().await.unwrap();
        assert_eq!(token.secret(), "fresh-token");
        assert_eq!(token.expires_in_secs, Some(86400));
    }

    #[tokio::test]
    async fn invalid_client_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})),
            )
            .mount(&server)
            .await;

        let result = IglooTokenSource::new(&config(&server)).unwrap().fetch_token().await;
        assert!(matches!(result, Err(PinSyncError::Auth(_))));
    }

    #[tokio::test]
    async fn response_without_token_is_invalid_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
            .mount(&server)
            .await;

        let result = IglooTokenSource::new(&config(&server)).unwrap().fetch_token().await;
        assert!(matches!(result, Err(PinSyncError::InvalidInput(_))));
    }

    #[test]
    fn rejects_malformed_token_url() {
        let mut cfg = LockConfig {
            api_url: String::new(),
            device_id: String::new(),
            bridge_id: String::new(),
            token_url: "not a url".into(),
            client_id: "cid".into(),
            client_secret: "s".into(),
        };
        assert!(matches!(IglooTokenSource::new(&cfg), Err(PinSyncError::Config(_))));
        cfg.token_url = "https://auth.example.com/oauth2/token".into();
        assert!(IglooTokenSource::new(&cfg).is_ok());
    }
}
