//! Run the notifier process.

use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use tweet_api::app;
use tweet_core::AppResult;
use tweet_core::config::{AppConfig, BrokerProvider};
use tweet_realtime::{MemoryChannel, NotifierEngine};

use super::ServeArgs;

/// Execute the notifier command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> AppResult<()> {
    if let Some(port) = args.port {
        config.notifier.port = port;
    }
    if let Some(ref host) = args.host {
        config.notifier.host = host.clone();
    }

    if config.broker.provider == BrokerProvider::Memory {
        warn!("In-memory broker selected; only clients will produce messages");
    }

    let memory = MemoryChannel::new(config.broker.batch_size);
    let source = app::channel_source(&config.broker, &memory).await?;
    let listener = app::bind(&config.notifier.bind_address()).await?;
    let (router, engine) = app::notifier_app(&config, source).await?;

    let server_stop = stop_engine_then_server(super::shutdown_on_signal(), engine);
    app::serve("notifier", listener, router, server_stop).await
}

/// Returns a token cancelled after `engine` has shut down in response to `signal`.
///
/// Open WebSocket sessions are closed first so the HTTP server can drain.
pub fn stop_engine_then_server(signal: CancellationToken, engine: NotifierEngine) -> CancellationToken {
    let server_stop = CancellationToken::new();
    let trigger = server_stop.clone();
    tokio::spawn(async move {
        signal.cancelled().await;
        if let Err(e) = engine.shutdown().await {
            error!(error = %e, "Notifier engine shutdown failed");
        }
        trigger.cancel();
    });
    server_stop
}
