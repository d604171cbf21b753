use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reelcoach::auth::{self, PasswordHasher, cookie_key};
use reelcoach::config::{
    DB_FILE, DEFAULT_MAX_UPLOAD_BYTES, SECRET_FILE, ServerConfig, load_or_create_secret,
};
use reelcoach::server::{AppState, create_router};
use reelcoach::store::{SqliteStore, Store, UserStore};
use reelcoach::types::Role;
use reelcoach::uploads::UploadNaming;

#[derive(Parser)]
#[command(name = "reelcoach")]
#[command(about = "A training video portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, env = "REELCOACH_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, env = "REELCOACH_PORT", default_value = "8080")]
        port: u16,

        /// Data directory for the database and session secret
        #[arg(long, env = "REELCOACH_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        /// Directory uploaded videos are stored in [default: <data-dir>/uploads]
        #[arg(long, env = "REELCOACH_UPLOAD_DIR")]
        upload_dir: Option<PathBuf>,

        /// Secret the session cookie key is derived from.
        /// If not set, one is generated and kept in the data directory.
        #[arg(long, env = "REELCOACH_SESSION_SECRET", hide_env_values = true)]
        session_secret: Option<String>,

        /// How stored file names are chosen: "unique" or "verbatim"
        #[arg(long, env = "REELCOACH_UPLOAD_NAMING", default_value = "unique")]
        upload_naming: UploadNaming,

        /// Largest accepted upload request, in bytes
        #[arg(
            long,
            env = "REELCOACH_MAX_UPLOAD_BYTES",
            default_value_t = DEFAULT_MAX_UPLOAD_BYTES
        )]
        max_upload_bytes: usize,

        /// PBKDF2 iterations for newly hashed passwords
        #[arg(
            long,
            env = "REELCOACH_PBKDF2_ITERATIONS",
            default_value_t = auth::DEFAULT_ITERATIONS
        )]
        pbkdf2_iterations: u32,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the data directory (database, upload directory and session secret)
    Init {
        #[arg(long, env = "REELCOACH_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        /// Directory uploaded videos are stored in [default: <data-dir>/uploads]
        #[arg(long, env = "REELCOACH_UPLOAD_DIR")]
        upload_dir: Option<PathBuf>,
    },

    /// Create an account without going through the registration page
    CreateUser {
        #[arg(long, env = "REELCOACH_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        username: String,

        /// "employee" or "owner"
        #[arg(long)]
        role: Role,

        #[arg(long, env = "REELCOACH_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// PBKDF2 iterations for the new password hash
        #[arg(
            long,
            env = "REELCOACH_PBKDF2_ITERATIONS",
            default_value_t = auth::DEFAULT_ITERATIONS
        )]
        pbkdf2_iterations: u32,
    },
}

fn open_store(data_dir: &Path) -> anyhow::Result<SqliteStore> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    let store = SqliteStore::new(data_dir.join(DB_FILE))?;
    store.initialize()?;
    Ok(store)
}

fn run_init(data_dir: PathBuf, upload_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir,
        upload_dir,
        ..ServerConfig::default()
    };
    let data_dir = &config.data_dir;

    let store = open_store(data_dir)?;
    let (_, created) = load_or_create_secret(data_dir)?;

    let upload_path = config.upload_path();
    fs::create_dir_all(&upload_path)
        .with_context(|| format!("failed to create {}", upload_path.display()))?;

    println!("Database ready at {}", config.db_path().display());
    println!("Uploads will be stored in {}", upload_path.display());
    if created {
        println!(
            "Session secret written to {}",
            data_dir.join(SECRET_FILE).display()
        );
    }

    let users = store.list_users()?;
    if users.is_empty() {
        println!(
            "No accounts yet. Register one in the browser or run 'reelcoach admin create-user'."
        );
    } else {
        println!("{} account(s) registered.", users.len());
    }

    Ok(())
}

fn run_create_user(
    data_dir: PathBuf,
    username: String,
    role: Role,
    password: String,
    pbkdf2_iterations: u32,
) -> anyhow::Result<()> {
    let store = open_store(&data_dir)?;
    let hasher = PasswordHasher::with_iterations(pbkdf2_iterations)?;

    match auth::register(&store, &hasher, &username, &password, role) {
        Ok(user) => {
            println!("Created {} account '{}'", user.role, user.username);
            Ok(())
        }
        Err(reelcoach::error::Error::DuplicateUsername) => {
            bail!("Username '{username}' already exists")
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = open_store(&config.data_dir)?;

    let secret = match &config.session_secret {
        Some(secret) if !secret.is_empty() => secret.clone(),
        _ => {
            let (secret, created) = load_or_create_secret(&config.data_dir)?;
            if created {
                info!(
                    "Generated session secret at {}",
                    config.data_dir.join(SECRET_FILE).display()
                );
            }
            secret
        }
    };

    let state = AppState::new(Arc::new(store), &config, cookie_key(&secret))?;
    state.uploads.ensure_dir().await?;

    if state.uploads.naming() == UploadNaming::Verbatim {
        warn!("Verbatim upload naming: uploading an existing file name replaces that file");
    }
    info!(
        "Storing uploads in {} ({} naming)",
        state.uploads.base_path().display(),
        state.uploads.naming()
    );
    info!(
        "Hashing new passwords with {} PBKDF2 iterations",
        state.hasher.iterations()
    );

    let app = create_router(Arc::new(state));
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reelcoach=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                upload_dir,
            } => run_init(data_dir, upload_dir)?,
            AdminCommands::CreateUser {
                data_dir,
                username,
                role,
                password,
                pbkdf2_iterations,
            } => run_create_user(data_dir, username, role, password, pbkdf2_iterations)?,
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            upload_dir,
            session_secret,
            upload_naming,
            max_upload_bytes,
            pbkdf2_iterations,
        } => {
            run_serve(ServerConfig {
                host,
                port,
                data_dir,
                upload_dir,
                session_secret,
                upload_naming,
                max_upload_bytes,
                pbkdf2_iterations,
            })
            .await?;
        }
    }

    Ok(())
}
