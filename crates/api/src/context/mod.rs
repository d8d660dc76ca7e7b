//! Application context - dependency injection container

use std::path::PathBuf;
use std::sync::Arc;

use pinsync_core::{
    CredentialStore, RandomPinGenerator, ReconciliationOrchestrator, TokenRefresher,
};
use pinsync_domain::{Config, Result};
use pinsync_infra::{
    config, credential_store, AcuityClient, HttpClient, IglooLockClient, IglooTokenSource,
};
use tracing::debug;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub credentials: Arc<dyn CredentialStore>,
    pub orchestrator: Arc<ReconciliationOrchestrator>,
    pub refresher: Arc<TokenRefresher>,
}

impl AppContext {
    /// Load configuration (explicit file, else environment, else probed file)
    /// and wire the services.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config = match path {
            Some(path) => config::load_from_file(Some(path))?,
            None => config::load()?,
        };
        Self::new(config)
    }

    /// Wire production adapters for an already validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        let credentials = credential_store(&config.credentials);
        Self::with_credentials(config, credentials)
    }

    /// Same as [`AppContext::new`] with an explicit token store.
    pub fn with_credentials(config: Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let http = HttpClient::from_config(&config.http)?;

        let scheduling = Arc::new(AcuityClient::new(http.clone(), &config.scheduling));
        let lock = Arc::new(IglooLockClient::new(http, &config.lock, Arc::clone(&credentials)));
        let orchestrator = ReconciliationOrchestrator::new(
            scheduling,
            lock,
            Arc::new(RandomPinGenerator),
            config.run.clone(),
        )?;

        let source = Arc::new(IglooTokenSource::new(&config.lock)?);
        let refresher = TokenRefresher::new(source, Arc::clone(&credentials));

        debug!(
            backend = ?config.credentials.backend,
            timezone = %config.run.timezone,
            "Application context initialised"
        );

        Ok(Self {
            config,
            credentials,
            orchestrator: Arc::new(orchestrator),
            refresher: Arc::new(refresher),
        })
    }
}
