pub mod blog_repository;
pub mod like_comment_repository;
pub mod user_repository;
