//! # tweet-core
//!
//! Core crate for the tweet backend. Contains configuration schemas,
//! the unified error system, the comment entity, the notification
//! event encoder, and the repository trait the service layer writes through.
//!
//! This crate has **no** internal dependencies on other tweet crates.

pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
