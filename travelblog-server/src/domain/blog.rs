use crate::domain::user::AuthorRef;
use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub destination: String,
    pub tags: Vec<String>,
    pub total_cost: Option<f64>,
    pub image: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A blog joined with the public projection of its owner.
#[derive(Debug, Clone)]
pub struct BlogWithAuthor {
    pub blog: Blog,
    pub author: AuthorRef,
}

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub description: String,
    pub destination: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub total_cost: Option<f64>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub tags: Option<Vec<String>>,
    pub total_cost: Option<f64>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub destination: String,
    pub tags: Vec<String>,
    pub total_cost: Option<f64>,
    pub image: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: AuthorRef,
}

impl From<BlogWithAuthor> for BlogResponse {
    fn from(item: BlogWithAuthor) -> Self {
        let BlogWithAuthor { blog, author } = item;
        Self {
            id: blog.id,
            title: blog.title,
            description: blog.description,
            destination: blog.destination,
            tags: blog.tags,
            total_cost: blog.total_cost,
            image: blog.image,
            user_id: blog.user_id,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            user: author,
        }
    }
}

/// Raw query-string parameters of the search endpoint, exactly as the
/// browser sends them. Everything is optional and arrives as text;
/// `tags` is a JSON-encoded array of strings.
#[derive(Debug, Default, Deserialize)]
pub struct RawSearchQuery {
    pub query: Option<String>,
    pub destination: Option<String>,
    #[serde(rename = "minCost")]
    pub min_cost: Option<String>,
    #[serde(rename = "maxCost")]
    pub max_cost: Option<String>,
    pub tags: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Parsed and validated search criteria. Absent clauses impose no
/// restriction; `page` and `limit` are always positive after parsing.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub query: Option<String>,
    pub destination: Option<String>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub tags: Vec<String>,
    pub page: i64,
    pub limit: i64,
}

impl SearchCriteria {
    pub fn from_raw(raw: RawSearchQuery) -> Result<Self, DomainError> {
        let query = raw.query.and_then(non_empty);
        let destination = raw.destination.and_then(non_empty);

        let min_cost = parse_cost(raw.min_cost, "minCost")?;
        let max_cost = parse_cost(raw.max_cost, "maxCost")?;

        let tags = match raw.tags.and_then(non_empty) {
            Some(encoded) => serde_json::from_str::<Vec<String>>(&encoded).map_err(|e| {
                DomainError::ValidationError(format!("tags must be a JSON array of strings: {}", e))
            })?,
            None => Vec::new(),
        };

        // Absent, unparseable or non-positive values fall back to defaults
        let page = parse_positive(raw.page, DEFAULT_PAGE);
        let limit = parse_positive(raw.limit, DEFAULT_LIMIT);

        Ok(Self {
            query,
            destination,
            min_cost,
            max_cost,
            tags,
            page,
            limit,
        })
    }

    pub fn offset(&self) -> i64 {
        // page can be arbitrarily large; a saturated offset still lands
        // past the last row and yields an empty page
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_cost(raw: Option<String>, field: &str) -> Result<Option<f64>, DomainError> {
    match raw.and_then(non_empty) {
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| DomainError::ValidationError(format!("{} must be a number", field))),
        None => Ok(None),
    }
}

fn parse_positive(raw: Option<String>, default: i64) -> i64 {
    match raw.and_then(non_empty).and_then(|s| s.parse::<i64>().ok()) {
        Some(n) if n > 0 => n,
        _ => default,
    }
}

/// Pagination metadata computed from the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// `page` and `limit` must already be positive (guaranteed by
    /// `SearchCriteria::from_raw`). A page past the end is not an error:
    /// it simply has no next page.
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };

        Self {
            total,
            total_pages,
            current_page: page,
            limit,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// Echo of the applied filters, returned alongside the result page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub query: Option<String>,
    pub destination: Option<String>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub tags: Vec<String>,
}

impl From<&SearchCriteria> for SearchFilters {
    fn from(criteria: &SearchCriteria) -> Self {
        Self {
            query: criteria.query.clone(),
            destination: criteria.destination.clone(),
            min_cost: criteria.min_cost,
            max_cost: criteria.max_cost,
            tags: criteria.tags.clone(),
        }
    }
}
