//! Run the writer process.

use tracing::warn;

use tweet_api::app;
use tweet_core::AppResult;
use tweet_core::config::{AppConfig, BrokerProvider};
use tweet_realtime::MemoryChannel;

use super::ServeArgs;

/// Execute the api command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> AppResult<()> {
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(ref host) = args.host {
        config.api.host = host.clone();
    }

    if config.broker.provider == BrokerProvider::Memory {
        warn!("In-memory broker selected; notifications will not leave this process");
    }

    let repos = app::Repositories::connect(&config.database).await?;
    let memory = MemoryChannel::new(config.broker.batch_size);
    let gateway = app::channel_gateway(&config.broker, &memory);

    let listener = app::bind(&config.api.bind_address()).await?;
    let router = app::api_app(&repos, gateway);

    let shutdown = super::shutdown_on_signal();
    app::serve("api", listener, router, shutdown).await?;

    repos.close().await;
    Ok(())
}
