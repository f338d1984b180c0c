//! artwall - moderated community art gallery backend.
//!
//! This binary starts the HTTP server and provides moderation commands.

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use artwall::{
    config::{ApproveConfig, CheckConfig, Cli, Command, ListConfig, ServeConfig},
    create_router, create_s3_client,
    objects::{ObjectBackend, ObjectGateway, S3ObjectBackend},
    server::RouterConfig,
    submission::{ArtworkSubmission, PgSubmissionStore, SubmissionStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::List(config) => run_list(config).await,
        Command::Approve(config) => run_approve(config).await,
        Command::Check(config) => run_check(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("artwall v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  S3 bucket: {}", config.s3.s3_bucket);
    if let Some(ref endpoint) = config.s3.s3_endpoint {
        info!("  S3 endpoint: {}", endpoint);
    }
    info!("  S3 region: {}", config.s3.s3_region);
    info!("  Public base URL: {}", config.public_base_url);
    info!("  Uploads: {}/uploads/", config.private_dir.trim_matches('/'));
    info!("  Upload URL TTL: {}s", config.upload_url_ttl);
    info!("  Assets: {}", config.assets_dir);

    let store = match PgSubmissionStore::connect(
        &config.database.database_url,
        config.database.db_max_connections,
    )
    .await
    {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = store.migrate().await {
        error!("Failed to apply migrations: {}", e);
        return ExitCode::FAILURE;
    }

    let s3_client = create_s3_client(config.s3.s3_endpoint.as_deref(), &config.s3.s3_region).await;
    let backend = S3ObjectBackend::new(s3_client, config.s3.s3_bucket.clone());

    if let Err(e) = backend.ping().await {
        error!("Failed to reach bucket '{}': {}", config.s3.s3_bucket, e);
        error!("  Please check your AWS credentials and the S3 endpoint");
        return ExitCode::FAILURE;
    }

    let gateway = ObjectGateway::new(backend, config.public_base_url.as_str())
        .with_private_dir(&config.private_dir)
        .with_upload_ttl(Duration::from_secs(config.upload_url_ttl));

    let router = create_router(store, gateway, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "artwall=debug,tower_http=debug"
    } else {
        "artwall=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new(&config.assets_dir)
        .with_cache_max_age(config.cache_max_age)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

// =============================================================================
// List Command
// =============================================================================

async fn run_list(config: ListConfig) -> ExitCode {
    let store = match PgSubmissionStore::connect(
        &config.database.database_url,
        config.database.db_max_connections,
    )
    .await
    {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: failed to connect to database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let submissions = match store.list_all().await {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error: failed to list submissions: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let submissions: Vec<ArtworkSubmission> = submissions
        .into_iter()
        .filter(|s| !config.pending || !s.is_approved)
        .collect();

    if config.json {
        match serde_json::to_string_pretty(&submissions) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if submissions.is_empty() {
        println!("(no submissions)");
        return ExitCode::SUCCESS;
    }

    for s in &submissions {
        let status = if s.is_approved { "approved" } else { "pending" };
        println!(
            "{}  {:<8}  {}  \"{}\" by {}",
            s.id,
            status,
            s.created_at.format("%Y-%m-%d %H:%M:%S"),
            s.title,
            s.artist
        );
        println!("    {}", s.image_url);
    }
    println!();
    println!("Total: {} submission(s)", submissions.len());

    ExitCode::SUCCESS
}

// =============================================================================
// Approve Command
// =============================================================================

async fn run_approve(config: ApproveConfig) -> ExitCode {
    let id = match Uuid::parse_str(&config.id) {
        Ok(id) => id,
        Err(_) => {
            eprintln!("Error: '{}' is not a valid submission id", config.id);
            return ExitCode::FAILURE;
        }
    };

    let store = match PgSubmissionStore::connect(
        &config.database.database_url,
        config.database.db_max_connections,
    )
    .await
    {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: failed to connect to database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match store.approve(id).await {
        Ok(true) => {
            println!("Approved {}", id);
            ExitCode::SUCCESS
        }
        Ok(false) => {
            eprintln!("Error: no submission with id {}", id);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: failed to approve {}: {}", id, e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("artwall Configuration Check");
    println!("═══════════════════════════");
    println!();

    print!("Testing database connection... ");
    let store = match PgSubmissionStore::connect(
        &config.database.database_url,
        config.database.db_max_connections,
    )
    .await
    {
        Ok(store) => store,
        Err(e) => {
            println!("✗ failed");
            println!();
            println!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match store.ping().await {
        Ok(()) => println!("✓ success"),
        Err(e) => {
            println!("✗ failed");
            println!();
            println!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    println!("✓ Bucket: {}", config.s3.s3_bucket);
    if let Some(ref endpoint) = config.s3.s3_endpoint {
        println!("✓ Endpoint: {}", endpoint);
    }
    println!("✓ Region: {}", config.s3.s3_region);

    print!("Testing S3 connection... ");
    let s3_client = create_s3_client(config.s3.s3_endpoint.as_deref(), &config.s3.s3_region).await;
    let backend = S3ObjectBackend::new(s3_client, config.s3.s3_bucket.clone());
    match backend.ping().await {
        Ok(()) => println!("✓ success"),
        Err(e) => {
            println!("✗ failed");
            println!();
            println!("Error: {}", e);
            println!();
            println!("Please check:");
            println!("  - Your AWS credentials are configured correctly");
            println!(
                "  - The bucket '{}' exists and is accessible",
                config.s3.s3_bucket
            );
            if config.s3.s3_endpoint.is_some() {
                println!("  - The S3 endpoint is correct and reachable");
            }
            return ExitCode::FAILURE;
        }
    }

    println!();
    println!("═══════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}
