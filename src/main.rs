use std::sync::Arc;

use school_admin::config::GatewayConfig;
use school_admin::gateway::HttpGateway;
use school_admin::models::RecordKind;
use school_admin::notify::TracingNotifier;
use school_admin::report::{self, templates, StaticAssets};
use school_admin::scope::Scope;
use school_admin::services::RecordList;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "school_admin=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = GatewayConfig::new_from_env()?;
    let page_limit = config.page_limit;
    let scope = match std::env::var("SCHOOL_BRANCH_ID") {
        Ok(branch_id) if !branch_id.is_empty() => Scope::branch(branch_id),
        _ => Scope::global(),
    };

    info!("using gateway at {}", config.base_url);
    let gateway = Arc::new(HttpGateway::new(config)?);

    // Preview never deletes, so the confirmation always declines.
    let mut students = RecordList::new(
        gateway,
        Arc::new(TracingNotifier),
        Arc::new(|_: &str| false),
        RecordKind::Student,
        scope,
        page_limit,
    );
    students.refresh().await?;

    let pagination = students.pagination();
    info!(
        "page {}/{} ({} students in total)",
        pagination.page, pagination.pages, pagination.total
    );

    let assets = StaticAssets::new()
        .with("schoolName", std::env::var("SCHOOL_NAME").unwrap_or_default())
        .with("logoUrl", std::env::var("SCHOOL_LOGO_URL").unwrap_or_default());
    let card = templates::id_card();
    for row in students.rows() {
        println!("{}", report::render(RecordKind::Student, row, &card, &assets));
    }

    Ok(())
}
