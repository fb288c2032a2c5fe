use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_commission_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use realty_desk::commission::CommissionDesk;
use realty_desk::config::AppConfig;
use realty_desk::error::AppError;
use realty_desk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let tiers = Arc::new(config.commission.load_tiers()?);
    info!(
        tiers = tiers.tiers().len(),
        source = ?config.commission.tier_table,
        "tier table loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let desk = Arc::new(CommissionDesk::new(
        tiers,
        config.commission.history_capacity,
    ));

    let app = with_commission_routes(desk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "commission desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
