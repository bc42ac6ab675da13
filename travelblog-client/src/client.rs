use crate::error::ClientError;
use crate::models::*;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;

/// Search criteria for the blog listing endpoint. Every field is
/// optional; unset fields impose no restriction server-side.
#[derive(Debug, Default, Clone)]
pub struct SearchParams {
    pub query: Option<String>,
    pub destination: Option<String>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub tags: Vec<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl SearchParams {
    /// Query-string pairs in the wire format the server expects
    /// (`tags` is a JSON-encoded array).
    pub fn to_query_pairs(&self) -> Result<Vec<(String, String)>, ClientError> {
        let mut pairs = Vec::new();

        if let Some(query) = &self.query {
            pairs.push(("query".to_string(), query.clone()));
        }
        if let Some(destination) = &self.destination {
            pairs.push(("destination".to_string(), destination.clone()));
        }
        if let Some(min_cost) = self.min_cost {
            pairs.push(("minCost".to_string(), min_cost.to_string()));
        }
        if let Some(max_cost) = self.max_cost {
            pairs.push(("maxCost".to_string(), max_cost.to_string()));
        }
        if !self.tags.is_empty() {
            let encoded = serde_json::to_string(&self.tags)
                .map_err(|e| ClientError::SerializationError(e.to_string()))?;
            pairs.push(("tags".to_string(), encoded));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        Ok(pairs)
    }
}

#[derive(Debug, Clone)]
pub struct TravelBlogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl TravelBlogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn add_auth_header(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    // ============== Auth ==============

    pub async fn register(&mut self, req: RegisterRequest) -> Result<AuthResponse, ClientError> {
        let url = self.url("/api/auth/register");
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_auth_response(response).await
    }

    pub async fn login(&mut self, req: LoginRequest) -> Result<AuthResponse, ClientError> {
        let url = self.url("/api/auth/login");
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_auth_response(response).await
    }

    pub async fn profile(&self) -> Result<UserResponse, ClientError> {
        let url = self.url("/api/auth/profile");
        let response = self
            .add_auth_header(self.client.get(&url))
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK => Ok(response.json::<UserResponse>().await?),
            StatusCode::UNAUTHORIZED => {
                let error_text = response.text().await?;
                Err(ClientError::Unauthorized(error_text))
            }
            _ => {
                let error_text = response.text().await?;
                Err(ClientError::TransportError(format!(
                    "HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }

    async fn handle_auth_response(
        &mut self,
        response: reqwest::Response,
    ) -> Result<AuthResponse, ClientError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                let auth_response = response.json::<AuthResponse>().await?;
                self.set_token(auth_response.token.clone());
                Ok(auth_response)
            }
            StatusCode::UNAUTHORIZED => {
                let error_text = response.text().await?;
                Err(ClientError::Unauthorized(error_text))
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            StatusCode::CONFLICT => {
                let error_text = response.text().await?;
                Err(ClientError::InvalidRequest(error_text))
            }
            _ => {
                let error_text = response.text().await?;
                Err(ClientError::TransportError(format!(
                    "HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }

    // ============== Blogs ==============

    pub async fn create_blog(&self, req: CreateBlogRequest) -> Result<BlogResponse, ClientError> {
        let url = self.url("/api/protected/blogs");

        let response = self
            .add_auth_header(self.client.post(&url))
            .json(&req)
            .send()
            .await?;

        self.handle_blog_response(response).await
    }

    pub async fn get_blog(&self, id: i64) -> Result<BlogResponse, ClientError> {
        let url = self.url(&format!("/api/blogs/{}", id));
        let response = self.client.get(&url).send().await?;
        self.handle_blog_response(response).await
    }

    pub async fn update_blog(
        &self,
        id: i64,
        req: UpdateBlogRequest,
    ) -> Result<BlogResponse, ClientError> {
        let url = self.url(&format!("/api/protected/blogs/{}", id));

        let response = self
            .add_auth_header(self.client.put(&url))
            .json(&req)
            .send()
            .await?;

        self.handle_blog_response(response).await
    }

    pub async fn delete_blog(&self, id: i64) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/protected/blogs/{}", id));
        let response = self
            .add_auth_header(self.client.delete(&url))
            .send()
            .await?;

        self.handle_no_content_response(response).await
    }

    /// Search blogs with optional filters and pagination.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse, ClientError> {
        let url = self.url("/api/blogs/search");
        let pairs = params.to_query_pairs()?;

        let response = self.client.get(&url).query(&pairs).send().await?;
        let status = response.status();

        match status {
            StatusCode::OK => Ok(response.json::<SearchResponse>().await?),
            StatusCode::BAD_REQUEST => {
                let error_text = response.text().await?;
                Err(ClientError::InvalidRequest(error_text))
            }
            _ => {
                let error_text = response.text().await?;
                Err(ClientError::TransportError(format!(
                    "HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }

    // ============== Reactions ==============

    pub async fn add_reaction(
        &self,
        blog_id: i64,
        comment: Option<String>,
    ) -> Result<ReactionResponse, ClientError> {
        let url = self.url(&format!("/api/protected/blogs/{}/reaction", blog_id));
        let request = ReactionRequest { comment };

        let response = self
            .add_auth_header(self.client.post(&url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK | StatusCode::CREATED => {
                Ok(response.json::<ReactionResponse>().await?)
            }
            StatusCode::UNAUTHORIZED => {
                let error_text = response.text().await?;
                Err(ClientError::Unauthorized(error_text))
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            _ => {
                let error_text = response.text().await?;
                Err(ClientError::TransportError(format!(
                    "HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }

    pub async fn remove_reaction(&self, blog_id: i64) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/protected/blogs/{}/reaction", blog_id));
        let response = self
            .add_auth_header(self.client.delete(&url))
            .send()
            .await?;

        self.handle_no_content_response(response).await
    }

    pub async fn list_comments(&self, blog_id: i64) -> Result<Vec<CommentResponse>, ClientError> {
        let url = self.url(&format!("/api/blogs/{}/comments", blog_id));
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        match status {
            StatusCode::OK => Ok(response.json::<Vec<CommentResponse>>().await?),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            _ => {
                let error_text = response.text().await?;
                Err(ClientError::TransportError(format!(
                    "HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }

    pub async fn count_likes(&self, blog_id: i64) -> Result<i64, ClientError> {
        let url = self.url(&format!("/api/blogs/{}/likes", blog_id));
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        match status {
            StatusCode::OK => Ok(response.json::<LikeCountResponse>().await?.likes),
            _ => {
                let error_text = response.text().await?;
                Err(ClientError::TransportError(format!(
                    "HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }

    // ============== Shared response handling ==============

    async fn handle_blog_response(
        &self,
        response: reqwest::Response,
    ) -> Result<BlogResponse, ClientError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => Ok(response.json::<BlogResponse>().await?),
            StatusCode::UNAUTHORIZED => {
                let error_text = response.text().await?;
                Err(ClientError::Unauthorized(error_text))
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            StatusCode::FORBIDDEN => {
                let error_text = response.text().await?;
                Err(ClientError::InvalidRequest(format!(
                    "Forbidden: {}",
                    error_text
                )))
            }
            StatusCode::BAD_REQUEST => {
                let error_text = response.text().await?;
                Err(ClientError::InvalidRequest(error_text))
            }
            _ => {
                let error_text = response.text().await?;
                Err(ClientError::TransportError(format!(
                    "HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }

    async fn handle_no_content_response(
        &self,
        response: reqwest::Response,
    ) -> Result<(), ClientError> {
        let status = response.status();

        match status {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::UNAUTHORIZED => {
                let error_text = response.text().await?;
                Err(ClientError::Unauthorized(error_text))
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            _ => {
                let error_text = response.text().await?;
                Err(ClientError::TransportError(format!(
                    "HTTP {}: {}",
                    status, error_text
                )))
            }
        }
    }
}
