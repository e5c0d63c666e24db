//! Application wiring: storage and channel bindings, router state, and serving.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use tweet_core::AppResult;
use tweet_core::config::{AppConfig, BrokerConfig, BrokerProvider, DatabaseConfig, DatabaseProvider};
use tweet_core::error::{AppError, ErrorKind};
use tweet_core::traits::{CommentRepository, PostRepository};
use tweet_database::{DatabasePool, MemoryStore, PgCommentRepository, PgPostRepository};
use tweet_realtime::bridge::{RedisStreamGateway, RedisStreamSource};
use tweet_realtime::{ChannelGateway, ChannelSource, MemoryChannel, NotifierEngine};
use tweet_service::{CommentService, PostService};

use crate::router::{build_api_router, build_notifier_router};
use crate::state::{ApiState, NotifierState};

/// Storage handles for the writer process.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    /// Present for PostgreSQL so the caller can close it on shutdown.
    pub pool: Option<DatabasePool>,
}

impl Repositories {
    /// Both repositories backed by one in-memory store.
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            posts: store.clone(),
            comments: store,
            pool: None,
        }
    }

    /// Opens the store selected by `database.provider`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    tweet_database::migration::run_migrations(pool.pool()).await?;
                }
                Ok(Self {
                    posts: Arc::new(PgPostRepository::new(pool.pool().clone())),
                    comments: Arc::new(PgCommentRepository::new(pool.pool().clone())),
                    pool: Some(pool),
                })
            }
            DatabaseProvider::Memory => {
                info!("Using in-memory post and comment store");
                Ok(Self::in_memory(Arc::new(MemoryStore::new())))
            }
        }
    }

    /// Closes the database pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// Gateway for `broker.provider`. `memory` is used by the in-process binding.
pub fn channel_gateway(config: &BrokerConfig, memory: &MemoryChannel) -> Arc<dyn ChannelGateway> {
    match config.provider {
        BrokerProvider::Redis => Arc::new(RedisStreamGateway::new(config)),
        BrokerProvider::Memory => Arc::new(memory.clone()),
    }
}

/// Source for `broker.provider`. `memory` is used by the in-process binding.
pub async fn channel_source(
    config: &BrokerConfig,
    memory: &MemoryChannel,
) -> AppResult<Arc<dyn ChannelSource>> {
    match config.provider {
        BrokerProvider::Redis => Ok(Arc::new(RedisStreamSource::connect(config).await?)),
        BrokerProvider::Memory => Ok(Arc::new(memory.clone())),
    }
}

/// Builds the writer router on top of existing repositories and a gateway.
pub fn api_app(repos: &Repositories, gateway: Arc<dyn ChannelGateway>) -> Router {
    build_api_router(ApiState {
        post_service: Arc::new(PostService::new(repos.posts.clone())),
        comment_service: Arc::new(CommentService::new(repos.comments.clone(), gateway)),
    })
}

/// Builds the notifier router and starts the engine's background tasks.
pub async fn notifier_app(
    config: &AppConfig,
    source: Arc<dyn ChannelSource>,
) -> AppResult<(Router, NotifierEngine)> {
    let engine = NotifierEngine::new(config.realtime.clone());
    engine.start(source, config.broker.reconnect_delay()).await?;

    let router = build_notifier_router(
        NotifierState {
            engine: engine.clone(),
        },
        &config.notifier.path,
    );
    Ok((router, engine))
}

/// Binds a TCP listener on `addr`.
pub async fn bind(addr: &str) -> AppResult<TcpListener> {
    TcpListener::bind(addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}: {e}"), e)
    })
}

/// Serves `router` until `shutdown` is cancelled.
pub async fn serve(
    name: &'static str,
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> AppResult<()> {
    let addr = listener.local_addr()?;
    info!(server = name, addr = %addr, "Listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.cancelled_owned())
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("{name} server error: {e}"), e))?;

    info!(server = name, "Server stopped");
    Ok(())
}
