use anyhow::Result;
use axum::Router;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::LeagueService;
use crate::api::handlers::AppState;
use crate::api::routes::create_router;

pub struct ServerService {
    port: u16,
    service: LeagueService,
}

impl ServerService {
    pub fn new(port: u16, service: LeagueService) -> Self {
        Self { port, service }
    }

    pub fn router(&self) -> Router {
        let state = Arc::new(AppState {
            service: self.service.clone(),
        });

        create_router(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    pub async fn run(&self) -> Result<()> {
        let app = self.router();

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
