use crate::domain::blog::{BlogWithAuthor, CreateBlogRequest, SearchCriteria, UpdateBlogRequest};
use crate::domain::user::AuthorRef;
use crate::domain::{Blog, DomainError};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, user_id: i64, req: CreateBlogRequest)
        -> Result<BlogWithAuthor, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<BlogWithAuthor, DomainError>;
    async fn update(&self, id: i64, req: UpdateBlogRequest) -> Result<BlogWithAuthor, DomainError>;
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
    /// Count of all matches plus the requested page, newest first.
    async fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<(Vec<BlogWithAuthor>, i64), DomainError>;
}

pub struct PostgresBlogRepository {
    pool: PgPool,
}

impl PostgresBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_WITH_AUTHOR: &str = r#"
SELECT b.id, b.title, b.description, b.destination, b.tags, b.total_cost,
       b.image, b.user_id, b.created_at, b.updated_at,
       u.username, u.name, u.profile_picture
FROM blogs b
JOIN users u ON u.id = b.user_id
"#;

fn blog_with_author_from_row(row: &PgRow) -> Result<BlogWithAuthor, DomainError> {
    let blog = Blog {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        destination: row.try_get("destination")?,
        tags: row.try_get("tags")?,
        total_cost: row.try_get("total_cost")?,
        image: row.try_get("image")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    };
    let author = AuthorRef {
        id: blog.user_id,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        profile_picture: row.try_get("profile_picture")?,
    };
    Ok(BlogWithAuthor { blog, author })
}

/// Appends the conjunction of all present filter clauses to `builder`.
/// Shared by the count and the page-fetch statements so both always see
/// the same predicate.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, criteria: &SearchCriteria) {
    let mut separator = " WHERE ";

    if let Some(query) = &criteria.query {
        let pattern = format!("%{}%", query);
        builder.push(separator);
        builder.push("(b.title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR b.description ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
        separator = " AND ";
    }

    if let Some(destination) = &criteria.destination {
        builder.push(separator);
        builder.push("b.destination ILIKE ");
        builder.push_bind(format!("%{}%", destination));
        separator = " AND ";
    }

    if let Some(min_cost) = criteria.min_cost {
        builder.push(separator);
        builder.push("b.total_cost >= ");
        builder.push_bind(min_cost);
        separator = " AND ";
    }

    if let Some(max_cost) = criteria.max_cost {
        builder.push(separator);
        builder.push("b.total_cost <= ");
        builder.push_bind(max_cost);
        separator = " AND ";
    }

    if !criteria.tags.is_empty() {
        // Array overlap: a blog matches if it shares at least one tag
        builder.push(separator);
        builder.push("b.tags && ");
        builder.push_bind(criteria.tags.clone());
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn create(
        &self,
        user_id: i64,
        req: CreateBlogRequest,
    ) -> Result<BlogWithAuthor, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO blogs (title, description, destination, tags, total_cost, image, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.destination)
        .bind(&req.tags)
        .bind(req.total_cost)
        .bind(&req.image)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create blog: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let id: i64 = row.try_get("id")?;
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: i64) -> Result<BlogWithAuthor, DomainError> {
        let row = sqlx::query(&format!("{} WHERE b.id = $1", SELECT_WITH_AUTHOR))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => blog_with_author_from_row(&row),
            None => Err(DomainError::BlogNotFound),
        }
    }

    async fn update(
        &self,
        id: i64,
        req: UpdateBlogRequest,
    ) -> Result<BlogWithAuthor, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                destination = COALESCE($3, destination),
                tags = COALESCE($4, tags),
                total_cost = COALESCE($5, total_cost),
                image = COALESCE($6, image),
                updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(req.title)
        .bind(req.description)
        .bind(req.destination)
        .bind(req.tags)
        .bind(req.total_cost)
        .bind(req.image)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::BlogNotFound);
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            Err(DomainError::BlogNotFound)
        } else {
            Ok(())
        }
    }

    async fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<(Vec<BlogWithAuthor>, i64), DomainError> {
        // Total match count, ignoring limit/offset
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM blogs b");
        push_filters(&mut count_builder, criteria);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        // Requested page, same predicate
        let mut fetch_builder = QueryBuilder::new(SELECT_WITH_AUTHOR);
        push_filters(&mut fetch_builder, criteria);
        fetch_builder.push(" ORDER BY b.created_at DESC, b.id DESC LIMIT ");
        fetch_builder.push_bind(criteria.limit);
        fetch_builder.push(" OFFSET ");
        fetch_builder.push_bind(criteria.offset());

        let rows = fetch_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let blogs = rows
            .iter()
            .map(blog_with_author_from_row)
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok((blogs, total))
    }
}
