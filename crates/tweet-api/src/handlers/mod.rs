//! Request handlers.

pub mod comment;
pub mod health;
pub mod post;
pub mod ws;
