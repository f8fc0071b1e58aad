use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use studio_service::config::Config;
use studio_service::handlers;
use studio_service::jobs;
use studio_service::metrics;
use studio_service::middleware::{JwtAuthMiddleware, MetricsMiddleware};
use studio_service::platforms::PublisherRegistry;
use studio_service::security::TokenIssuer;
use studio_service::services::{AiService, OAuthService, PublishService};
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_service=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!(error = %e, "configuration error");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to connect to database");
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e)
        })?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!(error = %e, "migration failed");
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let issuer = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl_secs);
    let oauth = OAuthService::new(config.providers.clone());
    let ai = AiService::new(config.ai.clone());
    let publisher = PublishService::new(pool.clone(), PublisherRegistry::with_defaults());
    let http_client = reqwest::Client::new();

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let mut background = JoinSet::new();
    let queue = jobs::spawn_scheduler(
        &mut background,
        pool.clone(),
        publisher,
        &config.scheduler,
        &shutdown_tx,
    );

    let bind_addr = (config.app.host.clone(), config.app.port);
    tracing::info!(host = %config.app.host, port = config.app.port, "starting studio-service");

    let allowed_origins = config.cors.allowed_origins.clone();
    let issuer_data = web::Data::new(issuer.clone());
    let pool_data = web::Data::new(pool);
    let oauth_data = web::Data::new(oauth);
    let ai_data = web::Data::new(ai);
    let queue_data = web::Data::new(queue);
    let http_data = web::Data::new(http_client);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = Cors::permissive();
                break;
            }
            if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }

        App::new()
            .wrap(TracingLogger::default())
            .wrap(MetricsMiddleware)
            .wrap(cors)
            .app_data(pool_data.clone())
            .app_data(issuer_data.clone())
            .app_data(oauth_data.clone())
            .app_data(ai_data.clone())
            .app_data(queue_data.clone())
            .app_data(http_data.clone())
            .route("/api/health", web::get().to(handlers::health))
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .service(web::scope("/api/auth").configure(handlers::auth::configure))
            // Registered before the authenticated scope: providers redirect
            // here without an Authorization header.
            .route(
                "/api/connections/{platform}/callback",
                web::get().to(handlers::connections::callback),
            )
            .service(
                web::scope("/api")
                    .wrap(JwtAuthMiddleware::new(issuer.clone()))
                    .configure(handlers::configure_protected),
            )
    })
    .bind(bind_addr)?
    .run();

    let result = tokio::select! {
        r = server => r,
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received");
            Ok(())
        }
    };

    let _ = shutdown_tx.send(());
    while background.join_next().await.is_some() {}
    tracing::info!("studio-service stopped");

    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
