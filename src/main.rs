use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use certgen::{api, openapi, state::AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = std::env::var("CERTGEN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("CERTGEN_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let state = AppState::from_env().expect("failed to initialize state");

    let openapi = openapi::ApiDoc::openapi();

    let app = Router::new()
        // Swagger UI + OpenAPI schema
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi))
        // Operator API
        .route("/certificates", post(api::generate).get(api::list))
        .route("/certificates/download-all", get(api::download_all))
        .route("/certificates/:id/download", get(api::download))
        // Public verification surface (where the QR payload resolves)
        .route("/view/:id", get(api::view))
        .route("/image/:id", get(api::image))
        .route("/health", get(api::health))
        .with_state(Arc::new(state));

    let addr: SocketAddr = format!("{host}:{port}").parse().expect("bind addr");
    info!("Starting certgen on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
