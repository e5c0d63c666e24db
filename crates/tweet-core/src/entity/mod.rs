//! Domain entities.

pub mod comment;
pub mod post;

pub use comment::Comment;
pub use post::Post;
