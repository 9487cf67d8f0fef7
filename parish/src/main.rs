mod migrations;

use anyhow::Result;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use parish_core::{
    cache::RolePermissionCache,
    logging,
    repository::{
        EventRegistrationRepository, GroupEventRepository, GroupMemberRepository, GroupRepository,
        MemberRepository, PermissionRepository, RolePermissionRepository,
    },
    service::{EventService, GroupService, MemberService, PermissionService, RegistrationService},
    Config,
};

#[derive(Parser, Debug)]
#[command(name = "parish", about = "Congregation group management backend")]
struct Args {
    /// Path to a configuration file (TOML/YAML/JSON)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load configuration (file, then PARISH_* environment overrides)
    let config = Config::load(args.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("Parish server starting...");
    info!("HTTP address: {}", config.http_address());

    // 3. Initialize database
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_seconds))
        .connect(config.database_url())
        .await?;
    info!("Database pool initialized");

    // 4. Run migrations
    migrations::run_migrations(&pool).await?;

    // 5. Build repositories and services
    let cache = RolePermissionCache::new(
        config.cache.role_permission_capacity,
        config.cache.role_permission_ttl_seconds,
    );

    let permission_service = PermissionService::new(
        PermissionRepository::new(pool.clone()),
        RolePermissionRepository::new(pool.clone()),
        GroupMemberRepository::new(pool.clone()),
        cache,
    );
    let group_service = Arc::new(GroupService::new(
        GroupRepository::new(pool.clone()),
        permission_service.clone(),
    ));
    let member_service = Arc::new(MemberService::new(
        MemberRepository::new(pool.clone()),
        GroupRepository::new(pool.clone()),
        GroupMemberRepository::new(pool.clone()),
    ));
    let event_service = Arc::new(EventService::new(
        GroupRepository::new(pool.clone()),
        GroupEventRepository::new(pool.clone()),
    ));
    let registration_service = Arc::new(RegistrationService::new(
        GroupEventRepository::new(pool.clone()),
        EventRegistrationRepository::new(pool.clone()),
    ));
    let permission_service = Arc::new(permission_service);

    // 6. Build the HTTP router and serve
    let router = parish_api::create_router(
        group_service,
        member_service,
        event_service,
        registration_service,
        permission_service,
    );

    let listener = tokio::net::TcpListener::bind(config.http_address()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
