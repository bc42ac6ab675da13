use crate::domain::like_comment::{CommentResponse, LikeComment};
use crate::domain::user::AuthorRef;
use crate::domain::DomainError;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[async_trait]
pub trait LikeCommentRepository: Send + Sync {
    async fn find_by_user_and_blog(
        &self,
        user_id: i64,
        blog_id: i64,
    ) -> Result<Option<LikeComment>, DomainError>;
    async fn create(
        &self,
        user_id: i64,
        blog_id: i64,
        comment: Option<String>,
    ) -> Result<LikeComment, DomainError>;
    async fn update_comment(&self, id: i64, comment: String) -> Result<LikeComment, DomainError>;
    async fn delete_by_user_and_blog(&self, user_id: i64, blog_id: i64)
        -> Result<(), DomainError>;
    /// Reactions carrying a comment, newest first, with the author projection.
    async fn list_comments(&self, blog_id: i64) -> Result<Vec<CommentResponse>, DomainError>;
    async fn count_likes(&self, blog_id: i64) -> Result<i64, DomainError>;
}

pub struct PostgresLikeCommentRepository {
    pool: PgPool,
}

impl PostgresLikeCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REACTION_COLUMNS: &str = "id, user_id, blog_id, comment, created_at, updated_at";

fn reaction_from_row(row: &PgRow) -> Result<LikeComment, DomainError> {
    Ok(LikeComment {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        blog_id: row.try_get("blog_id")?,
        comment: row.try_get("comment")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl LikeCommentRepository for PostgresLikeCommentRepository {
    async fn find_by_user_and_blog(
        &self,
        user_id: i64,
        blog_id: i64,
    ) -> Result<Option<LikeComment>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM like_comments WHERE user_id = $1 AND blog_id = $2",
            REACTION_COLUMNS
        ))
        .bind(user_id)
        .bind(blog_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(reaction_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        user_id: i64,
        blog_id: i64,
        comment: Option<String>,
    ) -> Result<LikeComment, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO like_comments (user_id, blog_id, comment, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING {}
            "#,
            REACTION_COLUMNS
        ))
        .bind(user_id)
        .bind(blog_id)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create reaction: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        reaction_from_row(&row)
    }

    async fn update_comment(&self, id: i64, comment: String) -> Result<LikeComment, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE like_comments
            SET comment = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            REACTION_COLUMNS
        ))
        .bind(comment)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => reaction_from_row(&row),
            None => Err(DomainError::ReactionNotFound),
        }
    }

    async fn delete_by_user_and_blog(
        &self,
        user_id: i64,
        blog_id: i64,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM like_comments WHERE user_id = $1 AND blog_id = $2")
            .bind(user_id)
            .bind(blog_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            Err(DomainError::ReactionNotFound)
        } else {
            Ok(())
        }
    }

    async fn list_comments(&self, blog_id: i64) -> Result<Vec<CommentResponse>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT lc.id, lc.blog_id, lc.comment, lc.created_at,
                   u.id AS author_id, u.username, u.name, u.profile_picture
            FROM like_comments lc
            JOIN users u ON u.id = lc.user_id
            WHERE lc.blog_id = $1 AND lc.comment IS NOT NULL
            ORDER BY lc.created_at DESC, lc.id DESC
            "#,
        )
        .bind(blog_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        rows.iter()
            .map(|row| {
                Ok(CommentResponse {
                    id: row.try_get("id")?,
                    blog_id: row.try_get("blog_id")?,
                    comment: row.try_get("comment")?,
                    created_at: row.try_get("created_at")?,
                    user: AuthorRef {
                        id: row.try_get("author_id")?,
                        username: row.try_get("username")?,
                        name: row.try_get("name")?,
                        profile_picture: row.try_get("profile_picture")?,
                    },
                })
            })
            .collect()
    }

    async fn count_likes(&self, blog_id: i64) -> Result<i64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM like_comments WHERE blog_id = $1")
            .bind(blog_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(row.try_get("count")?)
    }
}
