use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use travelblog_client::models::{
    CreateBlogRequest, LoginRequest, RegisterRequest, UpdateBlogRequest,
};
use travelblog_client::{SearchParams, TravelBlogClient};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    server: Option<String>,

    #[arg(long)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long)]
        name: Option<String>,
    },

    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    Status,

    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: String,

        #[arg(long)]
        destination: String,

        #[arg(long)]
        tag: Vec<String>,

        #[arg(long)]
        cost: Option<f64>,

        #[arg(long)]
        image: Option<String>,
    },

    Get {
        #[arg(short, long)]
        id: i64,
    },

    Update {
        #[arg(short, long)]
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        destination: Option<String>,

        #[arg(long)]
        cost: Option<f64>,
    },

    Delete {
        #[arg(short, long)]
        id: i64,
    },

    Search {
        #[arg(short, long)]
        query: Option<String>,

        #[arg(long)]
        destination: Option<String>,

        #[arg(long)]
        min_cost: Option<f64>,

        #[arg(long)]
        max_cost: Option<f64>,

        #[arg(long)]
        tag: Vec<String>,

        #[arg(short, long, default_value_t = 1)]
        page: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },

    Like {
        #[arg(short, long)]
        id: i64,
    },

    Comment {
        #[arg(short, long)]
        id: i64,

        #[arg(short, long)]
        text: String,
    },

    Unlike {
        #[arg(short, long)]
        id: i64,
    },

    Comments {
        #[arg(short, long)]
        id: i64,
    },

    Likes {
        #[arg(short, long)]
        id: i64,
    },
}

struct TokenManager {
    token_path: PathBuf,
}

impl TokenManager {
    fn new(custom_path: Option<PathBuf>) -> Result<Self> {
        let token_path = match custom_path {
            Some(path) => path,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(".travelblog_token")
            }
        };

        Ok(Self { token_path })
    }

    fn save_token(&self, token: &str) -> Result<()> {
        fs::write(&self.token_path, token)
            .with_context(|| format!("Failed to save token to {:?}", self.token_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.token_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.token_path, perms)?;
        }

        println!("✓ Token saved to {:?}", self.token_path);
        Ok(())
    }

    fn load_token(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.token_path) {
            Ok(token) => {
                let token = token.trim().to_string();
                if !token.is_empty() {
                    Ok(Some(token))
                } else {
                    Ok(None)
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read token file"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let server = cli
        .server
        .unwrap_or_else(|| "http://localhost:3000".to_string());

    println!("🔌 Connecting to: {}", server);

    let mut client = TravelBlogClient::new(server);

    let token_manager = TokenManager::new(cli.token_file)?;
    if let Some(token) = token_manager.load_token()? {
        client.set_token(token);
        println!("🔑 Authenticated with saved token");
    }

    match &cli.command {
        Commands::Register {
            username,
            email,
            password,
            name,
        } => {
            println!("📝 Registering user: {}", username);

            let req = RegisterRequest {
                username: username.clone(),
                email: email.clone(),
                password: password.clone(),
                name: name.clone(),
                profile_picture: None,
            };

            match client.register(req).await {
                Ok(response) => {
                    println!("✅ Registration successful!");
                    println!("   User ID: {}", response.user.id);
                    println!("   Username: {}", response.user.username);

                    token_manager.save_token(&response.token)?;
                }
                Err(e) => {
                    println!("❌ Registration failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Login { username, password } => {
            println!("🔑 Logging in as: {}", username);

            let req = LoginRequest {
                username: username.clone(),
                password: password.clone(),
            };

            match client.login(req).await {
                Ok(response) => {
                    println!("✅ Login successful!");
                    println!("   User ID: {}", response.user.id);
                    println!("   Username: {}", response.user.username);

                    token_manager.save_token(&response.token)?;
                }
                Err(e) => {
                    println!("❌ Login failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Status => match token_manager.load_token()? {
            Some(_) => match client.profile().await {
                Ok(user) => {
                    println!("✅ Logged in as: {} (id={})", user.username, user.id);
                    println!("   Email: {}", user.email);
                }
                Err(e) => {
                    println!("❌ Saved token is not valid: {}", e);
                    println!("   Please login again");
                }
            },
            None => {
                println!("❌ No token found");
                println!("   Please login first: travelblog-cli login --username <username> --password <password>");
            }
        },

        Commands::Create {
            title,
            description,
            destination,
            tag,
            cost,
            image,
        } => {
            println!("📝 Creating new blog...");

            let req = CreateBlogRequest {
                title: title.clone(),
                description: description.clone(),
                destination: destination.clone(),
                tags: tag.clone(),
                total_cost: *cost,
                image: image.clone(),
            };

            match client.create_blog(req).await {
                Ok(blog) => {
                    println!("✅ Blog created successfully!");
                    println!("   ID: {}", blog.id);
                    println!("   Title: {}", blog.title);
                    println!("   Destination: {}", blog.destination);
                    println!("   Created: {}", blog.created_at);
                }
                Err(e) => {
                    if e.is_unauthorized() {
                        println!("❌ Unauthorized. Please login first");
                    } else {
                        println!("❌ Failed to create blog: {}", e);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Get { id } => {
            println!("🔍 Getting blog #{}", id);

            match client.get_blog(*id).await {
                Ok(blog) => {
                    println!("✅ Blog retrieved:");
                    println!("   ID: {}", blog.id);
                    println!("   Title: {}", blog.title);
                    println!("   Destination: {}", blog.destination);
                    println!("   Tags: {}", blog.tags.join(", "));
                    if let Some(cost) = blog.total_cost {
                        println!("   Total cost: {}", cost);
                    }
                    println!("   Author: {}", blog.user.username);
                    println!("   Description: {}", blog.description);
                }
                Err(e) => {
                    if e.is_not_found() {
                        println!("❌ Blog #{} not found", id);
                    } else {
                        println!("❌ Error: {}", e);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Update {
            id,
            title,
            description,
            destination,
            cost,
        } => {
            println!("✏️ Updating blog #{}", id);

            let req = UpdateBlogRequest {
                title: title.clone(),
                description: description.clone(),
                destination: destination.clone(),
                total_cost: *cost,
                ..UpdateBlogRequest::default()
            };

            match client.update_blog(*id, req).await {
                Ok(blog) => {
                    println!("✅ Blog updated successfully!");
                    println!("   ID: {}", blog.id);
                    println!("   Title: {}", blog.title);
                    println!("   Updated: {}", blog.updated_at);
                }
                Err(e) => {
                    if e.is_not_found() {
                        println!("❌ Blog #{} not found", id);
                    } else if e.is_unauthorized() {
                        println!("❌ Unauthorized. You may not own this blog or need to login again");
                    } else {
                        println!("❌ Failed to update blog: {}", e);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Delete { id } => {
            println!("🗑️ Deleting blog #{}", id);

            match client.delete_blog(*id).await {
                Ok(()) => {
                    println!("✅ Blog deleted successfully!");
                }
                Err(e) => {
                    if e.is_not_found() {
                        println!("❌ Blog #{} not found", id);
                    } else if e.is_unauthorized() {
                        println!("❌ Unauthorized. You may not own this blog or need to login again");
                    } else {
                        println!("❌ Failed to delete blog: {}", e);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Search {
            query,
            destination,
            min_cost,
            max_cost,
            tag,
            page,
            limit,
        } => {
            println!("📋 Searching blogs (page={}, limit={})", page, limit);

            let params = SearchParams {
                query: query.clone(),
                destination: destination.clone(),
                min_cost: *min_cost,
                max_cost: *max_cost,
                tags: tag.clone(),
                page: Some(*page),
                limit: Some(*limit),
            };

            match client.search(&params).await {
                Ok(response) => {
                    println!(
                        "✅ Showing {} of {} blogs (page {}/{})",
                        response.blogs.len(),
                        response.pagination.total,
                        response.pagination.current_page,
                        response.pagination.total_pages
                    );
                    println!();

                    if response.blogs.is_empty() {
                        println!("   No blogs found");
                    } else {
                        for (i, blog) in response.blogs.iter().enumerate() {
                            println!(
                                "   {}. [{}] {} — {}",
                                i + 1,
                                blog.id,
                                blog.title,
                                blog.destination
                            );
                            println!("      By: {}", blog.user.username);
                            if !blog.tags.is_empty() {
                                println!("      Tags: {}", blog.tags.join(", "));
                            }
                            println!("      {}", truncate(&blog.description, 60));
                            println!();
                        }
                    }

                    if response.pagination.has_next_page {
                        println!("   More results: --page {}", page + 1);
                    }
                }
                Err(e) => {
                    println!("❌ Search failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Like { id } => match client.add_reaction(*id, None).await {
            Ok(_) => println!("✅ Liked blog #{}", id),
            Err(e) => {
                if e.is_not_found() {
                    println!("❌ Blog #{} not found", id);
                } else {
                    println!("❌ Failed to like blog: {}", e);
                }
                std::process::exit(1);
            }
        },

        Commands::Comment { id, text } => {
            match client.add_reaction(*id, Some(text.clone())).await {
                Ok(_) => println!("✅ Comment added to blog #{}", id),
                Err(e) => {
                    if e.is_not_found() {
                        println!("❌ Blog #{} not found", id);
                    } else {
                        println!("❌ Failed to comment: {}", e);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Unlike { id } => match client.remove_reaction(*id).await {
            Ok(()) => println!("✅ Reaction removed from blog #{}", id),
            Err(e) => {
                if e.is_not_found() {
                    println!("❌ No reaction on blog #{}", id);
                } else {
                    println!("❌ Failed to remove reaction: {}", e);
                }
                std::process::exit(1);
            }
        },

        Commands::Comments { id } => match client.list_comments(*id).await {
            Ok(comments) => {
                println!("✅ {} comments on blog #{}", comments.len(), id);
                for comment in comments {
                    println!("   {}: {}", comment.user.username, comment.comment);
                }
            }
            Err(e) => {
                println!("❌ Failed to list comments: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Likes { id } => match client.count_likes(*id).await {
            Ok(likes) => println!("✅ Blog #{} has {} likes", id, likes),
            Err(e) => {
                println!("❌ Failed to count likes: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len).collect();
        format!("{}...", cut)
    }
}
