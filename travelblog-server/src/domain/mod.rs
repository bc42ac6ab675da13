pub mod blog;
pub mod error;
pub mod like_comment;
pub mod user;

pub use blog::Blog;
pub use error::DomainError;
pub use user::User;
