use crate::cli::{Cli, Commands};
use crate::config::PortalConfig;
use crate::handler::{PortalContext, portal_router};
use crate::service::identity_service::IdentityService;
use crate::service::points_service::PointsService;
use crate::service::taxonomy_service::TaxonomyService;
use migration::{Migrator, MigratorTrait};
use portal_http::{AppBuilder, AppConfig, DEFAULT_HASH_COST, Server, ServerConfig, init_logging};
use sea_orm::{Database, DatabaseConnection};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

fn build_server(config: &PortalConfig, ctx: PortalContext) -> Server {
    let app_config = AppConfig::new()
        .with_logging(true)
        .with_tracing(true)
        .with_logging_config(config.logging.clone());

    let app_builder = AppBuilder::new(app_config)
        .validate_session_config(config.session.clone())
        .merge(portal_router(ctx));

    let server_config = ServerConfig::new(config.port).with_host(config.host.clone());

    Server::new(server_config, app_builder)
}

/// Drops a `foreign_keys` query parameter, which the SQLite connect options
/// do not accept.
fn sanitize_sqlite_url(database_url: &str) -> String {
    let is_sqlite = database_url.starts_with("sqlite://") || database_url.starts_with("sqlite:");
    if !is_sqlite {
        return database_url.to_string();
    }

    let Some((base, query)) = database_url.split_once('?') else {
        return database_url.to_string();
    };

    let filtered: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !key.eq_ignore_ascii_case("foreign_keys")
        })
        .collect();

    if filtered.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", filtered.join("&"))
    }
}

fn init_file_storage_dir(path: &Path) -> Result<Arc<PathBuf>, io::Error> {
    if path.exists() {
        if !path.is_dir() {
            return Err(io::Error::other(format!(
                "FILE_STORAGE_DIR is not a directory: {}",
                path.display()
            )));
        }
    } else {
        std::fs::create_dir_all(path).map_err(|error| {
            io::Error::other(format!(
                "failed to create FILE_STORAGE_DIR {}: {error}",
                path.display()
            ))
        })?;
    }

    match path.canonicalize() {
        Ok(resolved) => Ok(Arc::new(resolved)),
        Err(_) => Ok(Arc::new(path.to_path_buf())),
    }
}

async fn connect(config: &PortalConfig) -> Result<Arc<DatabaseConnection>, Box<dyn std::error::Error>> {
    let database_url = sanitize_sqlite_url(&config.database_url);
    let db = Database::connect(&database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(Arc::new(db))
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = PortalConfig::from_env()?;

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            init_logging(&config.logging)?;
            let storage_dir = init_file_storage_dir(&config.file_storage_dir)?;
            let db = connect(&config).await?;

            let purged = IdentityService::new(db.clone(), config.session.ttl())
                .purge_expired_sessions()
                .await?;
            info!(purged_sessions = purged, "Expired sessions removed");

            let ctx = PortalContext {
                db,
                storage_dir,
                session: config.session.clone(),
                max_upload_bytes: config.max_upload_bytes,
                hash_cost: DEFAULT_HASH_COST,
            };
            build_server(&config, ctx).start().await
        }
        Commands::SeedSubjects => {
            init_logging(&config.logging)?;
            let db = connect(&config).await?;
            let report = TaxonomyService::new(db).seed_defaults().await?;
            info!(
                branches = report.branches_created,
                semesters = report.semesters_created,
                subjects = report.subjects_created,
                "Subject catalogue seeded"
            );
            Ok(())
        }
        Commands::CreateStaff {
            username,
            email,
            password,
        } => {
            init_logging(&config.logging)?;
            let db = connect(&config).await?;
            let user = IdentityService::new(db, config.session.ttl())
                .create_staff(&username, &email, &password)
                .await?;
            info!(user_id = user.id, username = %user.username, "Staff account ready");
            Ok(())
        }
        Commands::AdjustPoints {
            username,
            delta,
            action,
        } => {
            init_logging(&config.logging)?;
            let db = connect(&config).await?;
            let total = PointsService::new(db).adjust(&username, &action, delta).await?;
            info!(username = %username, delta, total, "Points adjusted");
            Ok(())
        }
    }
}
