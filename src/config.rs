//! Configuration management for artwall.
//!
//! Every option can be given on the command line or through an environment
//! variable with the `ARTWALL_` prefix (the database URL also honours the
//! conventional `DATABASE_URL`).
//!
//! # Commands
//!
//! - `serve` - run the HTTP server
//! - `list` - print submissions, newest first
//! - `approve <id>` - approve a submission from the command line
//! - `check` - verify database and bucket connectivity
//!
//! # Environment Variables
//!
//! - `ARTWALL_HOST` - Server bind address (default: 0.0.0.0)
//! - `ARTWALL_PORT` - Server port (default: 3000)
//! - `DATABASE_URL` - Postgres connection string (required)
//! - `ARTWALL_S3_BUCKET` - Bucket holding uploads (required)
//! - `ARTWALL_S3_ENDPOINT` - Custom endpoint for S3-compatible services
//! - `ARTWALL_S3_REGION` - AWS region (default: us-east-1)
//! - `ARTWALL_PUBLIC_BASE_URL` - Base of canonical object URLs (required)
//! - `ARTWALL_PRIVATE_DIR` - Private directory in the bucket (default: .private)
//! - `ARTWALL_UPLOAD_URL_TTL` - Upload URL lifetime in seconds (default: 900)
//! - `ARTWALL_ASSETS_DIR` - Static asset directory (default: ./attached_assets)
//! - `ARTWALL_CACHE_MAX_AGE` - Cache max-age for served images (default: 3600)

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::objects::DEFAULT_PRIVATE_DIR;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default database pool size.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Default upload URL lifetime in seconds (15 minutes).
pub const DEFAULT_UPLOAD_URL_TTL_SECS: u64 = 900;

/// Default static asset directory.
pub const DEFAULT_ASSETS_DIR: &str = "./attached_assets";

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// CLI Arguments
// =============================================================================

/// artwall - a moderated community art gallery backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "artwall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Consume the CLI and return the selected command.
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeConfig),

    /// List submissions, newest first.
    List(ListConfig),

    /// Approve a submission by id.
    Approve(ApproveConfig),

    /// Check database and object store connectivity.
    Check(CheckConfig),
}

/// Database connection options shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Maximum number of pooled database connections.
    #[arg(long, default_value_t = DEFAULT_DB_MAX_CONNECTIONS, env = "ARTWALL_DB_MAX_CONNECTIONS")]
    pub db_max_connections: u32,
}

/// Object store options shared by `serve` and `check`.
#[derive(Args, Debug, Clone)]
pub struct S3Args {
    /// S3 bucket that receives uploads.
    #[arg(long, env = "ARTWALL_S3_BUCKET")]
    pub s3_bucket: String,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    #[arg(long, env = "ARTWALL_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region for S3.
    #[arg(long, default_value = DEFAULT_REGION, env = "ARTWALL_S3_REGION")]
    pub s3_region: String,
}

/// Options for the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "ARTWALL_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "ARTWALL_PORT")]
    pub port: u16,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub s3: S3Args,

    // =========================================================================
    // Object Configuration
    // =========================================================================
    /// Base URL of canonical object URLs, e.g. `https://gallery.s3.amazonaws.com`.
    ///
    /// Submitted image URLs are stored rebased onto this URL.
    #[arg(long, env = "ARTWALL_PUBLIC_BASE_URL")]
    pub public_base_url: String,

    /// Private directory inside the bucket; uploads go to `{dir}/uploads/`.
    #[arg(long, default_value = DEFAULT_PRIVATE_DIR, env = "ARTWALL_PRIVATE_DIR")]
    pub private_dir: String,

    /// Lifetime of presigned upload URLs in seconds.
    #[arg(long, default_value_t = DEFAULT_UPLOAD_URL_TTL_SECS, env = "ARTWALL_UPLOAD_URL_TTL")]
    pub upload_url_ttl: u64,

    /// HTTP Cache-Control max-age in seconds for served images.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "ARTWALL_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Directory served under `/assets`.
    #[arg(long, default_value = DEFAULT_ASSETS_DIR, env = "ARTWALL_ASSETS_DIR")]
    pub assets_dir: String,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "ARTWALL_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.s3.s3_bucket.is_empty() {
            return Err(
                "S3 bucket name is required. Set --s3-bucket or ARTWALL_S3_BUCKET".to_string(),
            );
        }

        if self.database.database_url.is_empty() {
            return Err("Database URL is required. Set --database-url or DATABASE_URL".to_string());
        }

        if self.database.db_max_connections == 0 {
            return Err("db_max_connections must be greater than 0".to_string());
        }

        if self.public_base_url.is_empty() {
            return Err(
                "Public base URL is required. Set --public-base-url or ARTWALL_PUBLIC_BASE_URL"
                    .to_string(),
            );
        }
        if Url::parse(&self.public_base_url).is_err() {
            return Err(format!(
                "public_base_url is not a valid URL: {}",
                self.public_base_url
            ));
        }

        validate_private_dir(&self.private_dir)?;

        if self.upload_url_ttl == 0 {
            return Err("upload_url_ttl must be greater than 0".to_string());
        }
        // S3 presigned URLs are capped at 7 days
        if self.upload_url_ttl > 7 * 24 * 3600 {
            return Err("upload_url_ttl must be at most 604800 seconds (7 days)".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn validate_private_dir(private_dir: &str) -> Result<(), String> {
    let trimmed = private_dir.trim_matches('/');
    if trimmed.is_empty() {
        return Err("private_dir must not be empty".to_string());
    }
    if trimmed.contains('/') || trimmed == "." || trimmed == ".." {
        return Err(format!(
            "private_dir must be a single directory name, got {:?}",
            private_dir
        ));
    }
    Ok(())
}

/// Options for the `list` command.
#[derive(Args, Debug, Clone)]
pub struct ListConfig {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Only show submissions awaiting approval.
    #[arg(long, default_value_t = false)]
    pub pending: bool,

    /// Print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Options for the `approve` command.
#[derive(Args, Debug, Clone)]
pub struct ApproveConfig {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Submission id (UUID).
    pub id: String,
}

/// Options for the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub s3: S3Args,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
