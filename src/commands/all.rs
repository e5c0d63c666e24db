//! Run the writer and the notifier in one process.

use tracing::info;

use tweet_api::app;
use tweet_core::AppResult;
use tweet_core::config::{AppConfig, BrokerProvider};
use tweet_realtime::MemoryChannel;

/// Execute the all command
///
/// With `broker.provider = "memory"` both halves share one in-process channel.
pub async fn execute(config: AppConfig) -> AppResult<()> {
    if config.broker.provider == BrokerProvider::Memory {
        info!("Writer and notifier share an in-memory channel");
    }

    let memory = MemoryChannel::new(config.broker.batch_size);

    let repos = app::Repositories::connect(&config.database).await?;
    let gateway = app::channel_gateway(&config.broker, &memory);
    let source = app::channel_source(&config.broker, &memory).await?;

    let api_listener = app::bind(&config.api.bind_address()).await?;
    let notifier_listener = app::bind(&config.notifier.bind_address()).await?;

    let (notifier_router, engine) = app::notifier_app(&config, source).await?;
    let api_router = app::api_app(&repos, gateway);

    let signal = super::shutdown_on_signal();
    let notifier_stop = super::notifier::stop_engine_then_server(signal.clone(), engine);

    tokio::try_join!(
        app::serve("api", api_listener, api_router, signal),
        app::serve("notifier", notifier_listener, notifier_router, notifier_stop),
    )?;

    repos.close().await;
    Ok(())
}
