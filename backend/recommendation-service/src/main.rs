use actix_web::{dev::Service, web, App, HttpServer};
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recommendation_service::handlers::{self, RecommendHandlerState};
use recommendation_service::{metrics, Artifacts, Config, RecommendationEngine};

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,recommendation_service=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true),
        )
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    info!(
        "Starting recommendation-service v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Environment: {}", config.app_env);

    // Artifacts are loaded once, before the server accepts any request, and
    // never written again.
    let artifacts = Artifacts::load(&config.scores_path, &config.metadata_path)
        .context("Failed to load artifacts")?;

    let engine = RecommendationEngine::new(
        artifacts.scores,
        artifacts.metadata,
        config.engine_config(),
    );
    let state = web::Data::new(RecommendHandlerState {
        engine,
        default_k: config.default_k,
    });

    info!("Starting HTTP server on {}:{}", config.http_host, config.http_port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap_fn(|req, srv| {
                let method = req.method().to_string();
                let path = req
                    .match_pattern()
                    .unwrap_or_else(|| req.path().to_string());
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => {
                            metrics::observe_http_request(
                                &method,
                                &path,
                                res.status().as_u16(),
                                start.elapsed(),
                            );
                            Ok(res)
                        }
                        Err(err) => {
                            metrics::observe_http_request(&method, &path, 500, start.elapsed());
                            Err(err)
                        }
                    }
                }
            })
            .configure(handlers::configure)
    })
    .bind((config.http_host.as_str(), config.http_port))
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")
}
