use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use snafu::ResultExt;

use crate::error::{ApplicationError, ConfigLoadSnafu, OpenCacheSnafu};
use crate::store::{LocalStore, RemoteStore, Store};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address", default = "default_host")]
    pub host: SocketAddr,

    /// Directory holding the local cache files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(flatten)]
    remote: Option<RemoteConfig>,
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        envy::from_env::<Config>().context(ConfigLoadSnafu)
    }

    /// The remote section counts as configured only when it carries a real
    /// endpoint; a placeholder (empty) value means local-only mode.
    pub fn remote(&self) -> Option<&RemoteConfig> {
        self.remote
            .as_ref()
            .filter(|remote| !remote.endpoint.is_empty())
    }

    /// Build the persistence router. The backend choice happens here, once:
    /// a configured and reachable remote store wins, anything else leaves the
    /// session on the local cache.
    pub async fn store(&self) -> Result<Store, ApplicationError> {
        let local = LocalStore::new(&self.data_dir).context(OpenCacheSnafu)?;

        let Some(remote_config) = self.remote() else {
            tracing::info!("no remote store configured, running from the local cache");
            return Ok(Store::local(local));
        };

        match RemoteStore::connect(remote_config).await {
            Ok(remote) => Ok(Store::remote(remote, local)),
            Err(error) => {
                tracing::warn!(%error, "remote store unreachable, running from the local cache");
                Ok(Store::local(local))
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    #[serde(rename = "surreal_endpoint")]
    pub endpoint: String,
    #[serde(rename = "surreal_namespace")]
    pub namespace: String,
    #[serde(rename = "surreal_database")]
    pub database: String,

    #[serde(flatten)]
    pub credentials: Option<RemoteCredentials>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteCredentials {
    #[serde(rename = "surreal_username")]
    pub username: String,
    #[serde(rename = "surreal_password")]
    pub password: String,
}

fn default_host() -> SocketAddr {
    ([127, 0, 0, 1], 4000).into()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
