mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::Store;
use crate::services::{PaymentIntentProvider, StripeClient, TokenService, UnconfiguredProvider};

fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().unwrap_or_else(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::process::exit(1);
    });

    log::info!("🚀 Starting Bistro Service...");
    log::info!("📊 Database: {}", config.database_name);

    let db = database::MongoDB::new(&config.database_url, &config.database_name)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to MongoDB: {}", e)))?;
    log::info!("✅ MongoDB connected successfully");

    let store: Arc<dyn Store> = Arc::new(db);
    let store_data = web::Data::from(store);

    let tokens = web::Data::new(TokenService::new(&config.token_secret, config.token_ttl));

    let provider: Arc<dyn PaymentIntentProvider> = match config.stripe_secret_key.clone() {
        Some(key) => Arc::new(
            StripeClient::new(key).map_err(|e| std::io::Error::other(e.to_string()))?,
        ),
        None => {
            log::warn!("⚠️  STRIPE_SECRET_KEY not set; /create-payment-intent will answer 503");
            Arc::new(UnconfiguredProvider)
        }
    };
    let provider_data = web::Data::from(provider);

    let bind_address = config.bind_address();
    let config_data = web::Data::new(config);

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(tokens.clone())
            .app_data(provider_data.clone())
            .app_data(config_data.clone())
            .wrap(build_cors(&config_data.allowed_origins))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
