mod llm;
mod normalize;
mod routes;
mod score;

use crate::llm::LlmClient;
use env_logger::Env;
use log::{error, info};
use serde::Deserialize;
use std::process::exit;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_redoc::Redoc;
use utoipa_redoc::Servable;

fn get_default_port() -> u16 {
    8080
}

fn get_default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn get_default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "get_default_port")]
    port: u16,
    #[serde(default = "get_default_base_url")]
    base_url: String,
    openai_api_key: String,
    #[serde(default = "get_default_model")]
    model: String,
}

#[derive(Debug, Clone)]
struct AppState {
    llm: Arc<LlmClient>,
}

#[derive(OpenApi)]
#[openapi(info(description = "API for analyzing code submissions using llms"))]
struct ApiDoc;

async fn run() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = envy::from_env::<Config>()?;

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(routes::ping))
        .routes(routes!(routes::analyze))
        .split_for_parts();

    // The editor frontend is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    info!("Starting on port {}", config.port);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    axum::serve(
        listener,
        router
            .merge(Redoc::with_url("/redoc", api))
            .layer(cors)
            .with_state(AppState {
                llm: Arc::new(LlmClient::new(&config)),
            }),
    )
    .await?;

    Ok(())
}

fn main() {
    let rt = tokio::runtime::Runtime::new().unwrap();

    if let Err(err) = rt.block_on(run()) {
        error!("{}", err);
        exit(1)
    }
}
