use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::{get, put};
use tokio::net;

use crate::domain::device::ports::DeviceService;
use crate::domain::loan::ports::LoanService;
use crate::inbound::http::handlers::{
    create_device::create_device, create_loan::create_loan, delete_device::delete_device,
    get_devices::get_device, get_devices::get_devices, get_loans::get_loan,
    get_loans::get_loans, get_loans::get_loans_by_device, return_loan::return_loan,
    update_device_status::update_device_status,
};

mod handlers;
mod responses;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

#[derive(Debug, Clone)]
struct AppState<DS: DeviceService, LS: LoanService> {
    device_service: Arc<DS>,
    loan_service: Arc<LS>,
}

pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    pub async fn new(
        device_service: impl DeviceService,
        loan_service: impl LoanService,
        config: HttpServerConfig<'_>,
    ) -> anyhow::Result<Self> {
        let router = router(device_service, loan_service);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self
            .listener
            .local_addr()
            .context("failed to read listener address")?;
        tracing::info!("listening on {}", addr);
        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;

        Ok(())
    }
}

/// Builds the application router with request tracing, without binding a listener.
pub fn router(device_service: impl DeviceService, loan_service: impl LoanService) -> Router {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    );

    let state = AppState {
        device_service: Arc::new(device_service),
        loan_service: Arc::new(loan_service),
    };

    axum::Router::new()
        .nest("/api", api_routes())
        .layer(trace_layer)
        .with_state(state)
}

fn api_routes<DS: DeviceService, LS: LoanService>() -> Router<AppState<DS, LS>> {
    Router::new()
        .route(
            "/devices",
            get(get_devices::<DS, LS>).post(create_device::<DS, LS>),
        )
        .route(
            "/devices/{id}",
            get(get_device::<DS, LS>).delete(delete_device::<DS, LS>),
        )
        .route("/devices/{id}/status", put(update_device_status::<DS, LS>))
        .route("/loans", get(get_loans::<DS, LS>).post(create_loan::<DS, LS>))
        .route("/loans/{id}", get(get_loan::<DS, LS>))
        .route("/loans/{id}/return", put(return_loan::<DS, LS>))
        .route("/loans/device/{device_id}", get(get_loans_by_device::<DS, LS>))
}
