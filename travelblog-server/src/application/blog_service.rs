use crate::data::blog_repository::BlogRepository;
use crate::domain::blog::{
    BlogResponse, CreateBlogRequest, Pagination, RawSearchQuery, SearchCriteria, SearchFilters,
    UpdateBlogRequest,
};
use crate::domain::DomainError;
use std::sync::Arc;

pub struct BlogService {
    blog_repo: Arc<dyn BlogRepository + Send + Sync>,
}

impl BlogService {
    pub fn new(blog_repo: Arc<dyn BlogRepository + Send + Sync>) -> Self {
        Self { blog_repo }
    }

    pub async fn create_blog(
        &self,
        user_id: i64,
        req: CreateBlogRequest,
    ) -> Result<BlogResponse, DomainError> {
        if req.title.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if req.description.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Description cannot be empty".to_string(),
            ));
        }
        if req.destination.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Destination cannot be empty".to_string(),
            ));
        }
        if let Some(cost) = req.total_cost {
            if cost < 0.0 {
                return Err(DomainError::ValidationError(
                    "Total cost cannot be negative".to_string(),
                ));
            }
        }

        let blog = self.blog_repo.create(user_id, req).await?;

        tracing::info!("Blog created: id={}, user_id={}", blog.blog.id, user_id);

        Ok(BlogResponse::from(blog))
    }

    pub async fn get_blog(&self, id: i64) -> Result<BlogResponse, DomainError> {
        let blog = self.blog_repo.find_by_id(id).await?;
        Ok(BlogResponse::from(blog))
    }

    pub async fn update_blog(
        &self,
        id: i64,
        user_id: i64,
        req: UpdateBlogRequest,
    ) -> Result<BlogResponse, DomainError> {
        let existing = self.blog_repo.find_by_id(id).await?;

        if existing.blog.user_id != user_id {
            tracing::warn!(
                "User {} attempted to update blog {} owned by {}",
                user_id,
                id,
                existing.blog.user_id
            );
            return Err(DomainError::Forbidden);
        }

        if let Some(title) = &req.title {
            if title.trim().is_empty() {
                return Err(DomainError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
        }
        if let Some(cost) = req.total_cost {
            if cost < 0.0 {
                return Err(DomainError::ValidationError(
                    "Total cost cannot be negative".to_string(),
                ));
            }
        }

        let updated = self.blog_repo.update(id, req).await?;

        tracing::info!("Blog updated: id={}, user_id={}", id, user_id);

        Ok(BlogResponse::from(updated))
    }

    pub async fn delete_blog(&self, id: i64, user_id: i64) -> Result<(), DomainError> {
        let existing = self.blog_repo.find_by_id(id).await?;

        if existing.blog.user_id != user_id {
            tracing::warn!(
                "User {} attempted to delete blog {} owned by {}",
                user_id,
                id,
                existing.blog.user_id
            );
            return Err(DomainError::Forbidden);
        }

        self.blog_repo.delete(id).await?;

        tracing::info!("Blog deleted: id={}, user_id={}", id, user_id);

        Ok(())
    }

    /// Parses the raw query parameters, runs the filtered count + page
    /// fetch, and computes pagination metadata from the total match count.
    pub async fn search(
        &self,
        raw: RawSearchQuery,
    ) -> Result<(Vec<BlogResponse>, Pagination, SearchFilters), DomainError> {
        let criteria = SearchCriteria::from_raw(raw)?;

        tracing::info!(
            "Searching blogs: page={}, limit={}, query={:?}, destination={:?}, tags={:?}",
            criteria.page,
            criteria.limit,
            criteria.query,
            criteria.destination,
            criteria.tags
        );

        let (items, total) = self.blog_repo.search(&criteria).await?;

        let pagination = Pagination::new(total, criteria.page, criteria.limit);
        let filters = SearchFilters::from(&criteria);

        let blogs = items.into_iter().map(BlogResponse::from).collect();

        Ok((blogs, pagination, filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blog::{Blog, BlogWithAuthor};
    use crate::domain::user::AuthorRef;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::Mutex;

    struct InMemoryBlogRepository {
        blogs: Mutex<Vec<BlogWithAuthor>>,
    }

    impl InMemoryBlogRepository {
        fn new(blogs: Vec<BlogWithAuthor>) -> Self {
            Self {
                blogs: Mutex::new(blogs),
            }
        }

        fn matches(blog: &Blog, criteria: &SearchCriteria) -> bool {
            if let Some(query) = &criteria.query {
                let needle = query.to_lowercase();
                if !blog.title.to_lowercase().contains(&needle)
                    && !blog.description.to_lowercase().contains(&needle)
                {
                    return false;
                }
            }
            if let Some(destination) = &criteria.destination {
                if !blog
                    .destination
                    .to_lowercase()
                    .contains(&destination.to_lowercase())
                {
                    return false;
                }
            }
            if criteria.min_cost.is_some() || criteria.max_cost.is_some() {
                let Some(cost) = blog.total_cost else {
                    return false;
                };
                if let Some(min) = criteria.min_cost {
                    if cost < min {
                        return false;
                    }
                }
                if let Some(max) = criteria.max_cost {
                    if cost > max {
                        return false;
                    }
                }
            }
            if !criteria.tags.is_empty()
                && !blog.tags.iter().any(|t| criteria.tags.contains(t))
            {
                return false;
            }
            true
        }
    }

    #[async_trait]
    impl BlogRepository for InMemoryBlogRepository {
        async fn create(
            &self,
            user_id: i64,
            req: CreateBlogRequest,
        ) -> Result<BlogWithAuthor, DomainError> {
            let mut blogs = self.blogs.lock().unwrap();
            let id = blogs.iter().map(|b| b.blog.id).max().unwrap_or(0) + 1;
            let now = Utc::now();
            let item = BlogWithAuthor {
                blog: Blog {
                    id,
                    title: req.title,
                    description: req.description,
                    destination: req.destination,
                    tags: req.tags,
                    total_cost: req.total_cost,
                    image: req.image,
                    user_id,
                    created_at: now,
                    updated_at: now,
                },
                author: author(user_id),
            };
            blogs.push(item.clone());
            Ok(item)
        }

        async fn find_by_id(&self, id: i64) -> Result<BlogWithAuthor, DomainError> {
            self.blogs
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.blog.id == id)
                .cloned()
                .ok_or(DomainError::BlogNotFound)
        }

        async fn update(
            &self,
            id: i64,
            req: UpdateBlogRequest,
        ) -> Result<BlogWithAuthor, DomainError> {
            let mut blogs = self.blogs.lock().unwrap();
            let item = blogs
                .iter_mut()
                .find(|b| b.blog.id == id)
                .ok_or(DomainError::BlogNotFound)?;
            if let Some(title) = req.title {
                item.blog.title = title;
            }
            if let Some(description) = req.description {
                item.blog.description = description;
            }
            if let Some(destination) = req.destination {
                item.blog.destination = destination;
            }
            if let Some(tags) = req.tags {
                item.blog.tags = tags;
            }
            if let Some(cost) = req.total_cost {
                item.blog.total_cost = Some(cost);
            }
            if let Some(image) = req.image {
                item.blog.image = Some(image);
            }
            item.blog.updated_at = Utc::now();
            Ok(item.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), DomainError> {
            let mut blogs = self.blogs.lock().unwrap();
            let before = blogs.len();
            blogs.retain(|b| b.blog.id != id);
            if blogs.len() == before {
                Err(DomainError::BlogNotFound)
            } else {
                Ok(())
            }
        }

        async fn search(
            &self,
            criteria: &SearchCriteria,
        ) -> Result<(Vec<BlogWithAuthor>, i64), DomainError> {
            let blogs = self.blogs.lock().unwrap();
            let mut matched: Vec<BlogWithAuthor> = blogs
                .iter()
                .filter(|b| Self::matches(&b.blog, criteria))
                .cloned()
                .collect();
            matched.sort_by(|a, b| {
                b.blog
                    .created_at
                    .cmp(&a.blog.created_at)
                    .then(b.blog.id.cmp(&a.blog.id))
            });
            let total = matched.len() as i64;
            let page: Vec<BlogWithAuthor> = matched
                .into_iter()
                .skip(criteria.offset() as usize)
                .take(criteria.limit as usize)
                .collect();
            Ok((page, total))
        }
    }

    fn author(user_id: i64) -> AuthorRef {
        AuthorRef {
            id: user_id,
            username: format!("user{}", user_id),
            name: None,
            profile_picture: None,
        }
    }

    fn blog(id: i64, title: &str, destination: &str, tags: &[&str], cost: Option<f64>) -> BlogWithAuthor {
        // Lower ids are older so the default order is highest id first
        let created_at = Utc::now() - Duration::minutes(1000 - id);
        BlogWithAuthor {
            blog: Blog {
                id,
                title: title.to_string(),
                description: format!("Trip notes for {}", title),
                destination: destination.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                total_cost: cost,
                image: None,
                user_id: 1,
                created_at,
                updated_at: created_at,
            },
            author: author(1),
        }
    }

    fn fifteen_blogs() -> Vec<BlogWithAuthor> {
        (1..=15)
            .map(|i| {
                blog(
                    i,
                    &format!("Trip {}", i),
                    if i % 2 == 0 { "Bali" } else { "Lisbon" },
                    if i % 3 == 0 { &["beach"] } else { &["city"] },
                    Some(i as f64 * 100.0),
                )
            })
            .collect()
    }

    fn service(blogs: Vec<BlogWithAuthor>) -> BlogService {
        BlogService::new(Arc::new(InMemoryBlogRepository::new(blogs)))
    }

    fn raw(pairs: &[(&str, &str)]) -> RawSearchQuery {
        let mut query = RawSearchQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "query" => query.query = value,
                "destination" => query.destination = value,
                "minCost" => query.min_cost = value,
                "maxCost" => query.max_cost = value,
                "tags" => query.tags = value,
                "page" => query.page = value,
                "limit" => query.limit = value,
                other => panic!("unknown parameter {}", other),
            }
        }
        query
    }

    #[tokio::test]
    async fn first_page_of_fifteen() {
        let service = service(fifteen_blogs());

        let (blogs, pagination, _) = service
            .search(raw(&[("page", "1"), ("limit", "10")]))
            .await
            .unwrap();

        assert_eq!(blogs.len(), 10);
        assert_eq!(pagination.total, 15);
        assert_eq!(pagination.total_pages, 2);
        assert!(pagination.has_next_page);
        assert!(!pagination.has_prev_page);
        // Newest (highest id) first
        assert_eq!(blogs[0].id, 15);
        assert_eq!(blogs[9].id, 6);
    }

    #[tokio::test]
    async fn second_page_holds_the_remainder() {
        let service = service(fifteen_blogs());

        let (blogs, pagination, _) = service
            .search(raw(&[("page", "2"), ("limit", "10")]))
            .await
            .unwrap();

        assert_eq!(blogs.len(), 5);
        assert!(!pagination.has_next_page);
        assert!(pagination.has_prev_page);
        assert_eq!(blogs[0].id, 5);
    }

    #[tokio::test]
    async fn inverted_cost_range_yields_nothing() {
        let service = service(fifteen_blogs());

        let (blogs, pagination, _) = service
            .search(raw(&[("minCost", "100"), ("maxCost", "50")]))
            .await
            .unwrap();

        assert!(blogs.is_empty());
        assert_eq!(pagination.total, 0);
        assert_eq!(pagination.total_pages, 0);
    }

    #[tokio::test]
    async fn tag_filter_matches_any_shared_tag() {
        let blogs = vec![
            blog(1, "Resort week", "Maldives", &["beach", "luxury"], None),
            blog(2, "Hostel hop", "Berlin", &["city", "budget"], None),
            blog(3, "Spa escape", "Bali", &["luxury"], None),
        ];
        let service = service(blogs);

        let (found, pagination, _) = service
            .search(raw(&[("tags", r#"["beach","luxury"]"#)]))
            .await
            .unwrap();

        assert_eq!(pagination.total, 2);
        let ids: Vec<i64> = found.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn page_beyond_the_end_is_empty_not_an_error() {
        let service = service(fifteen_blogs());

        let (blogs, pagination, _) = service
            .search(raw(&[("page", "99"), ("limit", "10")]))
            .await
            .unwrap();

        assert!(blogs.is_empty());
        assert_eq!(pagination.total, 15);
        assert_eq!(pagination.total_pages, 2);
        assert!(!pagination.has_next_page);
    }

    #[tokio::test]
    async fn adding_a_tag_filter_never_grows_the_total() {
        let service = service(fifteen_blogs());

        let (_, unfiltered, _) = service.search(raw(&[])).await.unwrap();
        let (_, filtered, _) = service
            .search(raw(&[("tags", r#"["beach"]"#)]))
            .await
            .unwrap();

        assert!(filtered.total <= unfiltered.total);
        assert_eq!(filtered.total, 5);
    }

    #[tokio::test]
    async fn identical_criteria_give_identical_results() {
        let service = service(fifteen_blogs());
        let params = [("destination", "bali"), ("limit", "3")];

        let (first_items, first_pagination, _) = service.search(raw(&params)).await.unwrap();
        let (second_items, second_pagination, _) = service.search(raw(&params)).await.unwrap();

        let first_ids: Vec<i64> = first_items.iter().map(|b| b.id).collect();
        let second_ids: Vec<i64> = second_items.iter().map(|b| b.id).collect();
        assert_eq!(first_ids, second_ids);
        assert_eq!(first_pagination, second_pagination);
    }

    #[tokio::test]
    async fn text_search_is_case_insensitive_over_title_and_description() {
        let blogs = vec![
            blog(1, "Surfing in PORTUGAL", "Ericeira", &[], None),
            blog(2, "Quiet week", "Lisbon", &[], None),
        ];
        let service = service(blogs);

        let (found, _, _) = service.search(raw(&[("query", "portugal")])).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);

        // Matches the generated description text too
        let (found, _, _) = service.search(raw(&[("query", "TRIP NOTES")])).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn malformed_tags_surface_as_validation_error() {
        let service = service(fifteen_blogs());

        let err = service
            .search(raw(&[("tags", "not-json")]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn filters_are_echoed_back() {
        let service = service(fifteen_blogs());

        let (_, _, filters) = service
            .search(raw(&[
                ("query", "Trip"),
                ("destination", "Bali"),
                ("minCost", "100"),
                ("tags", r#"["beach"]"#),
            ]))
            .await
            .unwrap();

        assert_eq!(filters.query.as_deref(), Some("Trip"));
        assert_eq!(filters.destination.as_deref(), Some("Bali"));
        assert_eq!(filters.min_cost, Some(100.0));
        assert_eq!(filters.max_cost, None);
        assert_eq!(filters.tags, vec!["beach"]);
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_and_negative_cost() {
        let service = service(vec![]);

        let err = service
            .create_blog(
                1,
                CreateBlogRequest {
                    title: "  ".to_string(),
                    description: "desc".to_string(),
                    destination: "Bali".to_string(),
                    tags: vec![],
                    total_cost: None,
                    image: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));

        let err = service
            .create_blog(
                1,
                CreateBlogRequest {
                    title: "Trip".to_string(),
                    description: "desc".to_string(),
                    destination: "Bali".to_string(),
                    tags: vec![],
                    total_cost: Some(-5.0),
                    image: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn only_the_owner_can_update_or_delete() {
        let service = service(fifteen_blogs());

        let err = service
            .update_blog(
                1,
                42,
                UpdateBlogRequest {
                    title: Some("Hijacked".to_string()),
                    description: None,
                    destination: None,
                    tags: None,
                    total_cost: None,
                    image: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let err = service.delete_blog(1, 42).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        // The owner can
        service.delete_blog(1, 1).await.unwrap();
        let err = service.get_blog(1).await.unwrap_err();
        assert!(matches!(err, DomainError::BlogNotFound));
    }
}
