//! Request extractors.

pub mod peer;
pub mod user;

pub use peer::PeerAddr;
pub use user::ActingUser;
