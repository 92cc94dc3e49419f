mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use db::DBClient;
use dotenv::dotenv;
use routes::create_router;
use service::{
    complaint_service::ComplaintService, dashboard_service::DashboardService,
    house_service::HouseService, payment_service::PaymentService,
    resident_service::ResidentService,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub house_service: Arc<HouseService>,
    pub resident_service: Arc<ResidentService>,
    pub payment_service: Arc<PaymentService>,
    pub complaint_service: Arc<ComplaintService>,
    pub dashboard_service: Arc<DashboardService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        Self {
            env: config,
            house_service: Arc::new(HouseService::new(db_client_arc.clone())),
            resident_service: Arc::new(ResidentService::new(db_client_arc.clone())),
            payment_service: Arc::new(PaymentService::new(db_client_arc.clone())),
            complaint_service: Arc::new(ComplaintService::new(db_client_arc.clone())),
            dashboard_service: Arc::new(DashboardService::new(db_client_arc.clone())),
            db_client: db_client_arc,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    tracing::info!("Connection to the database is successful");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let allowed_origins = vec![config
        .app_url
        .parse::<HeaderValue>()
        .context("APP_URL is not a valid origin")?];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app_state = AppState::new(DBClient::new(pool), config.clone());

    let app = create_router(Arc::new(app_state)).layer(ServiceBuilder::new().layer(cors));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    tracing::info!("Server is running on http://localhost:{}", config.port);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
