use crate::application::{AuthService, BlogService, LikeCommentService};
use crate::domain::blog::{
    BlogResponse, CreateBlogRequest, Pagination, RawSearchQuery, SearchFilters, UpdateBlogRequest,
};
use crate::domain::like_comment::{LikeCountResponse, ReactionRequest};
use crate::domain::user::{LoginUserRequest, RegisterUserRequest, UserResponse};
use crate::domain::DomainError;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;

#[derive(serde::Serialize)]
struct AuthResponse {
    token: String,
    user: UserResponse,
}

/// Search result envelope consumed by the SPA: the page of blogs, the
/// pagination metadata, and an echo of the applied filters.
#[derive(serde::Serialize)]
struct SearchResponse {
    blogs: Vec<BlogResponse>,
    pagination: Pagination,
    filters: SearchFilters,
}

fn get_user_id_from_request(req: &HttpRequest) -> Result<i64, DomainError> {
    req.extensions()
        .get::<i64>()
        .copied()
        .ok_or(DomainError::Unauthorized(
            "User not authenticated".to_string(),
        ))
}

fn error_to_response(err: DomainError) -> HttpResponse {
    let status_code = err.to_status_code();
    let message = err.to_string();

    match status_code {
        400 => HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        401 => HttpResponse::Unauthorized().json(serde_json::json!({ "error": message })),
        403 => HttpResponse::Forbidden().json(serde_json::json!({ "error": message })),
        404 => HttpResponse::NotFound().json(serde_json::json!({ "error": message })),
        409 => HttpResponse::Conflict().json(serde_json::json!({ "error": message })),
        _ => HttpResponse::InternalServerError().json(serde_json::json!({ "error": message })),
    }
}

// ============== Auth Handlers ==============

pub async fn register(
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<RegisterUserRequest>,
) -> impl Responder {
    match auth_service.register(req.into_inner()).await {
        Ok((token, user)) => HttpResponse::Created().json(AuthResponse { token, user }),
        Err(err) => error_to_response(err),
    }
}

pub async fn login(
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<LoginUserRequest>,
) -> impl Responder {
    match auth_service.login(req.into_inner()).await {
        Ok((token, user)) => HttpResponse::Ok().json(AuthResponse { token, user }),
        Err(err) => error_to_response(err),
    }
}

pub async fn profile(
    req: HttpRequest,
    auth_service: web::Data<Arc<AuthService>>,
) -> impl Responder {
    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(err) => return error_to_response(err),
    };

    match auth_service.profile(user_id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => error_to_response(err),
    }
}

// ============== Blog Handlers ==============

pub async fn search_blogs(
    blog_service: web::Data<Arc<BlogService>>,
    query: web::Query<RawSearchQuery>,
) -> impl Responder {
    match blog_service.search(query.into_inner()).await {
        Ok((blogs, pagination, filters)) => HttpResponse::Ok().json(SearchResponse {
            blogs,
            pagination,
            filters,
        }),
        Err(err) => error_to_response(err),
    }
}

pub async fn get_blog(
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<i64>,
) -> impl Responder {
    let blog_id = path.into_inner();

    tracing::info!("Getting blog with id={}", blog_id);

    match blog_service.get_blog(blog_id).await {
        Ok(blog) => HttpResponse::Ok().json(blog),
        Err(err) => error_to_response(err),
    }
}

pub async fn create_blog(
    req: HttpRequest,
    blog_service: web::Data<Arc<BlogService>>,
    blog_data: web::Json<CreateBlogRequest>,
) -> impl Responder {
    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(err) => return error_to_response(err),
    };

    tracing::info!("Creating blog for user_id={}", user_id);

    match blog_service
        .create_blog(user_id, blog_data.into_inner())
        .await
    {
        Ok(blog) => HttpResponse::Created().json(blog),
        Err(err) => error_to_response(err),
    }
}

pub async fn update_blog(
    req: HttpRequest,
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<i64>,
    blog_data: web::Json<UpdateBlogRequest>,
) -> impl Responder {
    let blog_id = path.into_inner();

    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(err) => return error_to_response(err),
    };

    tracing::info!("Updating blog id={} for user_id={}", blog_id, user_id);

    match blog_service
        .update_blog(blog_id, user_id, blog_data.into_inner())
        .await
    {
        Ok(blog) => HttpResponse::Ok().json(blog),
        Err(err) => error_to_response(err),
    }
}

pub async fn delete_blog(
    req: HttpRequest,
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<i64>,
) -> impl Responder {
    let blog_id = path.into_inner();

    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(err) => return error_to_response(err),
    };

    tracing::info!("Deleting blog id={} for user_id={}", blog_id, user_id);

    match blog_service.delete_blog(blog_id, user_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_to_response(err),
    }
}

// ============== Reaction Handlers ==============

pub async fn add_reaction(
    req: HttpRequest,
    reaction_service: web::Data<Arc<LikeCommentService>>,
    path: web::Path<i64>,
    body: web::Json<ReactionRequest>,
) -> impl Responder {
    let blog_id = path.into_inner();

    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(err) => return error_to_response(err),
    };

    match reaction_service
        .add_reaction(user_id, blog_id, body.into_inner().comment)
        .await
    {
        Ok((reaction, true)) => HttpResponse::Created().json(reaction),
        Ok((reaction, false)) => HttpResponse::Ok().json(reaction),
        Err(err) => error_to_response(err),
    }
}

pub async fn remove_reaction(
    req: HttpRequest,
    reaction_service: web::Data<Arc<LikeCommentService>>,
    path: web::Path<i64>,
) -> impl Responder {
    let blog_id = path.into_inner();

    let user_id = match get_user_id_from_request(&req) {
        Ok(id) => id,
        Err(err) => return error_to_response(err),
    };

    match reaction_service.remove_reaction(user_id, blog_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_to_response(err),
    }
}

pub async fn list_comments(
    reaction_service: web::Data<Arc<LikeCommentService>>,
    path: web::Path<i64>,
) -> impl Responder {
    match reaction_service.list_comments(path.into_inner()).await {
        Ok(comments) => HttpResponse::Ok().json(comments),
        Err(err) => error_to_response(err),
    }
}

pub async fn count_likes(
    reaction_service: web::Data<Arc<LikeCommentService>>,
    path: web::Path<i64>,
) -> impl Responder {
    match reaction_service.count_likes(path.into_inner()).await {
        Ok(likes) => HttpResponse::Ok().json(LikeCountResponse { likes }),
        Err(err) => error_to_response(err),
    }
}
