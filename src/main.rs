use std::sync::Arc;

use dotenvy::dotenv;
use snafu::ResultExt;

use drivestream::api::{self, App};
use drivestream::config::Config;
use drivestream::error::{ApplicationError, BindAddressSnafu, WebServerSnafu};
use drivestream::logger;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;
    let _guard = logger::init(&config)?;

    let store = config.store().await?;
    let router = api::create_router(App::new(Arc::new(store)));

    let listener = tokio::net::TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;
    tracing::info!("listening on {}", config.host);

    axum::serve(listener, router).await.context(WebServerSnafu)
}
