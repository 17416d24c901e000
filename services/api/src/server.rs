use crate::cli::ServeArgs;
use crate::infra::{load_catalog_records, AppState, InMemoryProfileStore, InMemoryScholarshipStore};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sahulat::config::AppConfig;
use sahulat::error::AppError;
use sahulat::portal::ScholarshipPortal;
use sahulat::telemetry;
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
    if let Some(catalog) = args.catalog.take() {
        config.catalog.source_path = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let records = load_catalog_records(config.catalog.source_path.as_deref())?;
    let scholarships = Arc::new(InMemoryScholarshipStore::new(records));
    let profiles = Arc::new(InMemoryProfileStore::default());
    let portal = Arc::new(ScholarshipPortal::new(scholarships, profiles));

    // Fail before binding if the catalog cannot be normalized.
    let active = portal.active_catalog()?.len();

    let app = with_portal_routes(portal)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, active_scholarships = active, "scholarship portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
