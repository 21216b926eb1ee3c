use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use propval::config::AppConfig;
use propval::error::AppError;
use propval::listings::{ClientRateLimiter, Clock, DomainClient, ReqwestTransport, SystemClock};
use propval::telemetry;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if !config.domain.has_credentials() {
        warn!("Domain API credentials missing; listings routes will fail until they are set");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let limiter = Arc::new(ClientRateLimiter::new(
        config.domain.client_requests_per_minute,
        clock.clone(),
    ));
    let transport = Arc::new(ReqwestTransport::new()?);
    let client = Arc::new(DomainClient::new(config.domain.clone(), transport, clock)?);

    let app = app_router(client, limiter)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "property valuation service ready");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
