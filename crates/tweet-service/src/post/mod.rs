//! Post creation.

pub mod service;

pub use service::PostService;
