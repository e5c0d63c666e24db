//! # tweet-database
//!
//! PostgreSQL connection management and the repositories behind the
//! post and comment write paths, plus a process-local store for
//! development mode.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::comment::PgCommentRepository;
pub use repositories::memory::MemoryStore;
pub use repositories::post::PgPostRepository;
