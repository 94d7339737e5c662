use std::error::Error;

use relay_service::telemetry;
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; the process environment is used as is.
    dotenvy::dotenv().ok();

    // Library events get the detailed layer, everything else a plain one.
    tracing_subscriber::registry()
        .with(telemetry::env_filter("info"))
        .with(telemetry::layer())
        .with(
            fmt::layer()
                .with_target(false)
                .with_filter(filter::filter_fn(|meta| {
                    !telemetry::is_library_target(meta.target())
                })),
        )
        .init();

    api::start().await?;

    Ok(())
}
