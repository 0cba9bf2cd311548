use crate::cli::ServeArgs;
use crate::infra::{AppState, Platform};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estate_listings::config::AppConfig;
use estate_listings::error::AppError;
use estate_listings::listings::{AssetUrls, ListingCsvImporter};
use estate_listings::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let platform = Platform::in_memory(config.listings)?;
    for demo in platform.demo.all() {
        info!(
            account = %demo.account.id,
            role = demo.account.role.label(),
            token = demo.token,
            "demo account seeded"
        );
    }

    if let Some(path) = args.seed_csv.take() {
        let created = ListingCsvImporter::from_path(
            &path,
            &platform.listings,
            &platform.demo.agent.caller(),
        )?;
        info!(count = created.len(), path = %path.display(), "listings imported");
    }

    let assets = AssetUrls::new(config.server.public_base_url.clone());
    let app = with_operational_routes(platform.api_state(assets))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "listing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
