use dotenvy::dotenv;
use std::sync::Arc;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use application::{AuthService, BlogService, LikeCommentService};
use data::{
    blog_repository::PostgresBlogRepository, like_comment_repository::PostgresLikeCommentRepository,
    user_repository::PostgresUserRepository,
};
use infrastructure::{
    config::AppConfig,
    database::{create_pool, run_migrations},
    jwt::JwtService,
    logging::init_logging,
};
use presentation::{http_handlers, middleware::jwt_middleware};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_logging();

    let config = AppConfig::from_env()?;

    let http_addr = format!("0.0.0.0:{}", config.http_port);

    tracing::info!("Starting travelblog server...");
    tracing::info!("HTTP server will listen on {}", http_addr);
    tracing::info!("CORS allowed origins: {}", config.cors_allowed_origins);

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;

    tracing::info!("Running database migrations...");
    run_migrations(&pool).await?;

    tracing::info!("Initializing services...");

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret)?);

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let blog_repo = Arc::new(PostgresBlogRepository::new(pool.clone()));
    let reaction_repo = Arc::new(PostgresLikeCommentRepository::new(pool.clone()));

    let auth_service = Arc::new(AuthService::new(user_repo.clone(), jwt_service.clone()));
    let blog_service = Arc::new(BlogService::new(blog_repo.clone()));
    let reaction_service = Arc::new(LikeCommentService::new(
        reaction_repo.clone(),
        blog_repo.clone(),
    ));

    tracing::info!("Services initialized successfully");

    run_http_server(
        http_addr,
        auth_service,
        blog_service,
        reaction_service,
        jwt_service,
        config.cors_allowed_origins,
    )
    .await?;

    tracing::info!("Shutting down...");
    Ok(())
}

/// Configure CORS for the HTTP server with allowed origins from config
fn configure_cors(allowed_origins: &str) -> actix_cors::Cors {
    use actix_cors::Cors;
    use actix_web::http::header;

    let origins: Vec<&str> = allowed_origins.split(',').map(|s| s.trim()).collect();

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::AUTHORIZATION])
        .max_age(3600);

    for origin in origins {
        if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
            tracing::debug!("Added allowed CORS origin: {}", origin);
        }
    }

    cors
}

async fn run_http_server(
    addr: String,
    auth_service: Arc<AuthService>,
    blog_service: Arc<BlogService>,
    reaction_service: Arc<LikeCommentService>,
    jwt_service: Arc<JwtService>,
    cors_allowed_origins: String,
) -> anyhow::Result<()> {
    use actix_web::{middleware::Logger, web, App, HttpServer};
    use actix_web_httpauth::middleware::HttpAuthentication;

    tracing::info!("Configuring HTTP server...");

    let auth_middleware = HttpAuthentication::bearer(jwt_middleware);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&cors_allowed_origins))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(blog_service.clone()))
            .app_data(web::Data::new(reaction_service.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            // Public routes - authentication
            .service(
                web::scope("/api/auth")
                    .route("/register", web::post().to(http_handlers::register))
                    .route("/login", web::post().to(http_handlers::login))
                    .service(
                        web::scope("/profile")
                            .wrap(auth_middleware.clone())
                            .route("", web::get().to(http_handlers::profile)),
                    ),
            )
            // Public routes - blogs (read-only)
            .service(
                web::scope("/api/blogs")
                    .route("/search", web::get().to(http_handlers::search_blogs))
                    .route("/{id}", web::get().to(http_handlers::get_blog))
                    .route("/{id}/comments", web::get().to(http_handlers::list_comments))
                    .route("/{id}/likes", web::get().to(http_handlers::count_likes)),
            )
            // Protected routes - blogs and reactions (write operations)
            .service(
                web::scope("/api/protected/blogs")
                    .wrap(auth_middleware.clone())
                    .route("", web::post().to(http_handlers::create_blog))
                    .route("/{id}", web::put().to(http_handlers::update_blog))
                    .route("/{id}", web::delete().to(http_handlers::delete_blog))
                    .route(
                        "/{id}/reaction",
                        web::post().to(http_handlers::add_reaction),
                    )
                    .route(
                        "/{id}/reaction",
                        web::delete().to(http_handlers::remove_reaction),
                    ),
            )
    })
    .bind(&addr)?
    .run();

    tracing::info!("HTTP server running on {}", addr);

    server.await?;

    Ok(())
}
