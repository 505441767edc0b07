use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use civiclens::civics::AdministrativeHierarchy;
use civiclens::config::AppConfig;
use civiclens::error::AppError;
use civiclens::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{sample_hierarchy, seeded_service, AppState};
use crate::routes::with_civic_routes;

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

    let hierarchy = match &config.data.hierarchy_seed {
        Some(path) => {
            let hierarchy = AdministrativeHierarchy::from_seed_file(path)?;
            info!(seed = %path.display(), counties = hierarchy.counties().len(), "loaded administrative hierarchy from seed");
            hierarchy
        }
        None => {
            info!("no hierarchy seed configured, using built-in sample dataset");
            sample_hierarchy()
        }
    };

    let (service, profiles) = seeded_service(Arc::new(hierarchy));

    let app = with_civic_routes(service, profiles)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "civic engagement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
