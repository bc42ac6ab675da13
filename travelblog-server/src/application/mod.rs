pub mod auth_service;
pub mod blog_service;
pub mod like_comment_service;

pub use auth_service::AuthService;
pub use blog_service::BlogService;
pub use like_comment_service::LikeCommentService;
