use crate::domain::user::AuthorRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single user's reaction to a blog: a like, optionally carrying a
/// comment. One row per (user, blog) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeComment {
    pub id: i64,
    pub user_id: i64,
    pub blog_id: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub blog_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user: AuthorRef,
}

#[derive(Debug, Serialize)]
pub struct LikeCountResponse {
    pub likes: i64,
}
