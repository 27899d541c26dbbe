use tracing_subscriber::fmt::format::FmtSpan;

use campaign_hub::{Config, Error};

#[actix_web::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    campaign_hub::run(config).await
}
