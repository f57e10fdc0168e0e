use anyhow::{Context, Result};

use crate::{api::ApiClient, config::Config, session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    api: ApiClient,
    sessions: SessionStore,
}

impl AppState {
    pub async fn new() -> Result<Self> {
        let config = Config::from_env().context("failed to load configuration")?;
        Self::with_config(config).await
    }

    pub async fn with_config(config: Config) -> Result<Self> {
        let sessions = SessionStore::open(config.session_store_path.clone())
            .await
            .context("failed to open session store")?;

        Ok(Self {
            api: ApiClient::new(config.api_base_url),
            sessions,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
