use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use qr_console::client::{ApiClient, Session};
use qr_console::config::AppConfig;
use qr_console::routes::init_routes;
use qr_console::state::app_state::AppState;

/// Configured base, else the legacy `/api/base_url` lookup.
async fn resolve_redirect_base(
    config: &AppConfig,
    upstream: &reqwest::Client,
) -> anyhow::Result<String> {
    if let Some(base) = &config.redirect_base {
        return Ok(base.clone());
    }
    let session = Arc::new(Session::new(None, config.login_path.clone()));
    let api = ApiClient::new(upstream.clone(), &config.api_base, session);
    let base = api
        .fetch_base_url()
        .await
        .context("REDIRECT_BASE not set and /api/base_url is unavailable")?;
    Ok(base.trim_end_matches('/').to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // One pooled client for every upstream call
    let upstream = match reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Error building the upstream client: {}", e);
            std::process::exit(1);
        }
    };

    let redirect_base = match resolve_redirect_base(&config, &upstream).await {
        Ok(base) => base,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };
    info!("Encoding QR codes as {}/r/<code>", redirect_base);

    let bind = (config.bind_addr.clone(), config.port);
    let app_state = web::Data::new(AppState::new(config, redirect_base, upstream));

    HttpServer::new(move || {
        // Create a logger with a custom format instead
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        let cors = app_state
            .config
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![http::header::AUTHORIZATION, http::header::ACCEPT])
            .allowed_header(http::header::CONTENT_TYPE)
            .expose_headers(vec![http::header::CONTENT_DISPOSITION])
            .max_age(3600);
        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind(bind)?
    .run()
    .await
}
