use crate::data::blog_repository::BlogRepository;
use crate::data::like_comment_repository::LikeCommentRepository;
use crate::domain::like_comment::{CommentResponse, LikeComment};
use crate::domain::DomainError;
use std::sync::Arc;

pub struct LikeCommentService {
    reaction_repo: Arc<dyn LikeCommentRepository + Send + Sync>,
    blog_repo: Arc<dyn BlogRepository + Send + Sync>,
}

impl LikeCommentService {
    pub fn new(
        reaction_repo: Arc<dyn LikeCommentRepository + Send + Sync>,
        blog_repo: Arc<dyn BlogRepository + Send + Sync>,
    ) -> Self {
        Self {
            reaction_repo,
            blog_repo,
        }
    }

    /// Adds a like (optionally with a comment). If the user already
    /// reacted, a provided comment replaces the stored one; otherwise the
    /// existing reaction is returned unchanged. The flag reports whether a
    /// new row was created, so callers can answer 201 vs 200.
    pub async fn add_reaction(
        &self,
        user_id: i64,
        blog_id: i64,
        comment: Option<String>,
    ) -> Result<(LikeComment, bool), DomainError> {
        // 404 if the blog does not exist
        self.blog_repo.find_by_id(blog_id).await?;

        if let Some(existing) = self
            .reaction_repo
            .find_by_user_and_blog(user_id, blog_id)
            .await?
        {
            if let Some(comment) = comment {
                let updated = self.reaction_repo.update_comment(existing.id, comment).await?;
                tracing::info!(
                    "Comment updated: blog_id={}, user_id={}",
                    blog_id,
                    user_id
                );
                return Ok((updated, false));
            }
            return Ok((existing, false));
        }

        let reaction = self.reaction_repo.create(user_id, blog_id, comment).await?;

        tracing::info!("Reaction added: blog_id={}, user_id={}", blog_id, user_id);

        Ok((reaction, true))
    }

    pub async fn remove_reaction(&self, user_id: i64, blog_id: i64) -> Result<(), DomainError> {
        self.reaction_repo
            .delete_by_user_and_blog(user_id, blog_id)
            .await?;

        tracing::info!("Reaction removed: blog_id={}, user_id={}", blog_id, user_id);

        Ok(())
    }

    pub async fn list_comments(&self, blog_id: i64) -> Result<Vec<CommentResponse>, DomainError> {
        self.reaction_repo.list_comments(blog_id).await
    }

    pub async fn count_likes(&self, blog_id: i64) -> Result<i64, DomainError> {
        self.reaction_repo.count_likes(blog_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blog::{
        Blog, BlogWithAuthor, CreateBlogRequest, SearchCriteria, UpdateBlogRequest,
    };
    use crate::domain::user::AuthorRef;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    struct StubBlogRepository {
        existing_ids: Vec<i64>,
    }

    #[async_trait]
    impl BlogRepository for StubBlogRepository {
        async fn create(
            &self,
            _user_id: i64,
            _req: CreateBlogRequest,
        ) -> Result<BlogWithAuthor, DomainError> {
            unimplemented!("not used by reaction tests")
        }

        async fn find_by_id(&self, id: i64) -> Result<BlogWithAuthor, DomainError> {
            if !self.existing_ids.contains(&id) {
                return Err(DomainError::BlogNotFound);
            }
            let now = Utc::now();
            Ok(BlogWithAuthor {
                blog: Blog {
                    id,
                    title: "Trip".to_string(),
                    description: "Notes".to_string(),
                    destination: "Bali".to_string(),
                    tags: vec![],
                    total_cost: None,
                    image: None,
                    user_id: 1,
                    created_at: now,
                    updated_at: now,
                },
                author: AuthorRef {
                    id: 1,
                    username: "owner".to_string(),
                    name: None,
                    profile_picture: None,
                },
            })
        }

        async fn update(
            &self,
            _id: i64,
            _req: UpdateBlogRequest,
        ) -> Result<BlogWithAuthor, DomainError> {
            unimplemented!("not used by reaction tests")
        }

        async fn delete(&self, _id: i64) -> Result<(), DomainError> {
            unimplemented!("not used by reaction tests")
        }

        async fn search(
            &self,
            _criteria: &SearchCriteria,
        ) -> Result<(Vec<BlogWithAuthor>, i64), DomainError> {
            unimplemented!("not used by reaction tests")
        }
    }

    #[derive(Default)]
    struct InMemoryReactionRepository {
        reactions: Mutex<Vec<LikeComment>>,
    }

    #[async_trait]
    impl LikeCommentRepository for InMemoryReactionRepository {
        async fn find_by_user_and_blog(
            &self,
            user_id: i64,
            blog_id: i64,
        ) -> Result<Option<LikeComment>, DomainError> {
            Ok(self
                .reactions
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.user_id == user_id && r.blog_id == blog_id)
                .cloned())
        }

        async fn create(
            &self,
            user_id: i64,
            blog_id: i64,
            comment: Option<String>,
        ) -> Result<LikeComment, DomainError> {
            let mut reactions = self.reactions.lock().unwrap();
            let now = Utc::now();
            let reaction = LikeComment {
                id: reactions.len() as i64 + 1,
                user_id,
                blog_id,
                comment,
                created_at: now,
                updated_at: now,
            };
            reactions.push(reaction.clone());
            Ok(reaction)
        }

        async fn update_comment(
            &self,
            id: i64,
            comment: String,
        ) -> Result<LikeComment, DomainError> {
            let mut reactions = self.reactions.lock().unwrap();
            let reaction = reactions
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(DomainError::ReactionNotFound)?;
            reaction.comment = Some(comment);
            reaction.updated_at = Utc::now();
            Ok(reaction.clone())
        }

        async fn delete_by_user_and_blog(
            &self,
            user_id: i64,
            blog_id: i64,
        ) -> Result<(), DomainError> {
            let mut reactions = self.reactions.lock().unwrap();
            let before = reactions.len();
            reactions.retain(|r| !(r.user_id == user_id && r.blog_id == blog_id));
            if reactions.len() == before {
                Err(DomainError::ReactionNotFound)
            } else {
                Ok(())
            }
        }

        async fn list_comments(&self, blog_id: i64) -> Result<Vec<CommentResponse>, DomainError> {
            let mut comments: Vec<CommentResponse> = self
                .reactions
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.blog_id == blog_id && r.comment.is_some())
                .map(|r| CommentResponse {
                    id: r.id,
                    blog_id: r.blog_id,
                    comment: r.comment.clone().unwrap(),
                    created_at: r.created_at,
                    user: AuthorRef {
                        id: r.user_id,
                        username: format!("user{}", r.user_id),
                        name: None,
                        profile_picture: None,
                    },
                })
                .collect();
            comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(comments)
        }

        async fn count_likes(&self, blog_id: i64) -> Result<i64, DomainError> {
            Ok(self
                .reactions
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.blog_id == blog_id)
                .count() as i64)
        }
    }

    fn service() -> LikeCommentService {
        LikeCommentService::new(
            Arc::new(InMemoryReactionRepository::default()),
            Arc::new(StubBlogRepository {
                existing_ids: vec![1, 2],
            }),
        )
    }

    #[tokio::test]
    async fn like_then_like_again_is_idempotent() {
        let service = service();

        let (first, created) = service.add_reaction(7, 1, None).await.unwrap();
        let (second, created_again) = service.add_reaction(7, 1, None).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(created);
        assert!(!created_again);
        assert_eq!(service.count_likes(1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn replacing_a_comment_does_not_report_creation() {
        let service = service();

        let (_, created) = service
            .add_reaction(7, 1, Some("First impression".to_string()))
            .await
            .unwrap();
        assert!(created);

        let (updated, created) = service
            .add_reaction(7, 1, Some("Second thoughts".to_string()))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(updated.comment.as_deref(), Some("Second thoughts"));
    }

    #[tokio::test]
    async fn comment_replaces_existing_comment() {
        let service = service();

        service
            .add_reaction(7, 1, Some("Nice beach".to_string()))
            .await
            .unwrap();
        let (updated, _) = service
            .add_reaction(7, 1, Some("Actually crowded".to_string()))
            .await
            .unwrap();

        assert_eq!(updated.comment.as_deref(), Some("Actually crowded"));

        let comments = service.list_comments(1).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].comment, "Actually crowded");
    }

    #[tokio::test]
    async fn bare_likes_do_not_appear_as_comments() {
        let service = service();

        service.add_reaction(7, 1, None).await.unwrap();
        service
            .add_reaction(8, 1, Some("Lovely".to_string()))
            .await
            .unwrap();

        assert_eq!(service.count_likes(1).await.unwrap(), 2);
        let comments = service.list_comments(1).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user.id, 8);
    }

    #[tokio::test]
    async fn reacting_to_a_missing_blog_is_not_found() {
        let service = service();

        let err = service.add_reaction(7, 99, None).await.unwrap_err();
        assert!(matches!(err, DomainError::BlogNotFound));
    }

    #[tokio::test]
    async fn removing_an_absent_reaction_is_not_found() {
        let service = service();

        let err = service.remove_reaction(7, 1).await.unwrap_err();
        assert!(matches!(err, DomainError::ReactionNotFound));

        service.add_reaction(7, 1, None).await.unwrap();
        service.remove_reaction(7, 1).await.unwrap();
        assert_eq!(service.count_likes(1).await.unwrap(), 0);
    }
}
