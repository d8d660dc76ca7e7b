//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use pinsync_domain::PinSyncError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PinSyncError);

impl From<InfraError> for PinSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PinSyncError> for InfraError {
    fn from(value: PinSyncError) -> Self {
        InfraError(value)
    }
}

/// Map any supported third-party error straight to the domain error.
pub fn to_domain<E>(err: E) -> PinSyncError
where
    InfraError: From<E>,
{
    InfraError::from(err).into()
}

trait IntoPinSyncError {
    fn into_pinsync(self) -> PinSyncError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → PinSyncError */
/* -------------------------------------------------------------------------- */

impl IntoPinSyncError for KeyringError {
    fn into_pinsync(self) -> PinSyncError {
        let description = self.to_string();

        match self {
            KeyringError::NoEntry => PinSyncError::NotFound("keychain entry not found".into()),
            KeyringError::BadEncoding(_) => {
                PinSyncError::Security("credential in keychain is not valid UTF-8".into())
            }
            KeyringError::TooLong(name, limit) => PinSyncError::Security(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            KeyringError::Invalid(attr, reason) => {
                PinSyncError::Security(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            KeyringError::PlatformFailure(err) => {
                PinSyncError::Security(format!("keychain platform error: {err}"))
            }
            KeyringError::NoStorageAccess(err) => {
                PinSyncError::Security(format!("unable to access secure storage: {err}"))
            }
            _ => PinSyncError::Security(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_pinsync())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PinSyncError */
/* -------------------------------------------------------------------------- */

impl IntoPinSyncError for HttpError {
    fn into_pinsync(self) -> PinSyncError {
        if self.is_timeout() {
            return PinSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return PinSyncError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return PinSyncError::InvalidInput(format!("undecodable HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status, None);
        }

        PinSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_pinsync())
    }
}

/// Classify a non-success HTTP status, optionally carrying the response body.
pub fn status_error(status: reqwest::StatusCode, body: Option<&str>) -> PinSyncError {
    let code = status.as_u16();
    let mut message =
        format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
    if let Some(body) = body.map(str::trim).filter(|b| !b.is_empty()) {
        message.push_str(": ");
        message.extend(body.chars().take(200));
    }

    match code {
        401 | 403 => PinSyncError::Auth(message),
        404 => PinSyncError::NotFound(message),
        400..=499 if code != 429 => PinSyncError::InvalidInput(message),
        _ => PinSyncError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* std::io / serde_json / toml → PinSyncError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        let mapped = match value.kind() {
            std::io::ErrorKind::NotFound => PinSyncError::NotFound(value.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                PinSyncError::Security(format!("permission denied: {value}"))
            }
            _ => PinSyncError::Storage(value.to_string()),
        };
        InfraError(mapped)
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(PinSyncError::InvalidInput(format!("invalid JSON: {value}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(PinSyncError::Config(format!("invalid TOML: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn keyring_no_entry_maps_to_not_found() {
        let mapped = to_domain(KeyringError::NoEntry);
        match mapped {
            PinSyncError::NotFound(msg) => assert!(msg.contains("keychain")),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        match to_domain(error) {
            PinSyncError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn status_error_includes_truncated_body() {
        let long_body = "x".repeat(500);
        let err = status_error(StatusCode::BAD_GATEWAY, Some(&long_body));
        match err {
            PinSyncError::Network(msg) => {
                assert!(msg.starts_with("HTTP 502 Bad Gateway: "));
                assert!(msg.len() < 260);
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_is_network_not_input() {
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, None),
            PinSyncError::Network(_)
        ));
        assert!(matches!(status_error(StatusCode::BAD_REQUEST, None), PinSyncError::InvalidInput(_)));
    }

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(to_domain(err), PinSyncError::NotFound(_)));
    }

    #[test]
    fn bad_json_maps_to_invalid_input() {
        let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        assert!(matches!(to_domain(err), PinSyncError::InvalidInput(_)));
    }
}
