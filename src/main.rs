use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use projections_site::app::ports::{DataSource, UserStore};
use projections_site::app::SessionService;
use projections_site::blog::aggregate_posts;
use projections_site::config::{Config, DEFAULT_CONFIG_PATH};
use projections_site::infra::{CsvFileSource, InMemoryUserStore, SqliteUserStore};
use projections_site::logging;
use projections_site::web::{app_router, AppState};

#[derive(Parser)]
#[command(name = "projections_site")]
#[command(about = "Projection table, CSV export and blog web application")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep accounts in memory instead of the SQLite user store
        #[arg(long)]
        ephemeral_users: bool,
    },
    /// Create an account in the user store
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Print the blog index, newest first
    Posts,
}

fn open_user_store(config: &Config, ephemeral: bool) -> Result<Arc<dyn UserStore>> {
    if ephemeral {
        info!("Using in-memory user store");
        Ok(Arc::new(InMemoryUserStore::new()))
    } else {
        let store = SqliteUserStore::open(&config.auth.database_path).with_context(|| {
            format!(
                "opening user store at {}",
                config.auth.database_path.display()
            )
        })?;
        Ok(Arc::new(store))
    }
}

async fn serve(mut config: Config, port: Option<u16>, ephemeral_users: bool) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let source: Arc<dyn DataSource> = Arc::new(CsvFileSource::new(&config.data.csv_path));
    let users = open_user_store(&config, ephemeral_users)?;
    let state = AppState::new(
        source,
        users,
        config.data.blog_dir.clone(),
        config.data.static_dir.clone(),
    );
    let app = app_router(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;

    info!(
        "Web server listening on {} (data: {}, posts: {})",
        bind_addr,
        config.data.csv_path.display(),
        config.data.blog_dir.display()
    );
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let (config, from_file) = Config::load(&cli.config)?;
    logging::init_logging(&config.server.log_dir);
    if !from_file {
        info!("No config file at {}, using defaults", cli.config.display());
    }

    match cli.command {
        Commands::Serve {
            port,
            ephemeral_users,
        } => serve(config, port, ephemeral_users).await?,
        Commands::CreateUser { username, password } => {
            let sessions = SessionService::new(open_user_store(&config, false)?);
            let account = sessions.register(&username, &password).await?;
            println!("Created user '{}' (id {})", account.username, account.id);
        }
        Commands::Posts => {
            let posts = aggregate_posts(&config.data.blog_dir)?;
            if posts.is_empty() {
                println!("No posts in {}", config.data.blog_dir.display());
            }
            for post in posts {
                println!("{}  {}", post.date, post.title);
            }
        }
    }

    Ok(())
}
