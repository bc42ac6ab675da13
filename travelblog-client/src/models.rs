use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub profile_picture: Option<String>,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Public author projection embedded in blogs and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub destination: String,
    pub tags: Vec<String>,
    pub total_cost: Option<f64>,
    pub image: Option<String>,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub user: AuthorRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub query: Option<String>,
    pub destination: Option<String>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub blogs: Vec<BlogResponse>,
    pub pagination: Pagination,
    pub filters: SearchFilters,
}

#[derive(Debug, Serialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub description: String,
    pub destination: String,
    pub tags: Vec<String>,
    pub total_cost: Option<f64>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub tags: Option<Vec<String>>,
    pub total_cost: Option<f64>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ReactionRequest {
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub id: i64,
    pub user_id: i64,
    pub blog_id: i64,
    pub comment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub blog_id: i64,
    pub comment: String,
    pub created_at: String,
    pub user: AuthorRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeCountResponse {
    pub likes: i64,
}
