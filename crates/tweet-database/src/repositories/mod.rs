//! Post and comment repository implementations.

pub mod comment;
pub mod memory;
pub mod post;
