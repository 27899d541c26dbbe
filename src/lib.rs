use actix_web::web::{self, Data, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpResponse, HttpServer, ResponseError};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod seed;
pub mod template;
pub mod typedid;

pub use campaign::{Campaign, CampaignBody, CampaignId, CampaignPatch, NewCampaign};
pub use config::Config;
pub use database::{Database, MemoryDatabase};
pub use error::Error;
pub use template::{Template, TemplateBody, TemplateCustomization, TemplateId};

/// Registers extractor error handlers and every endpoint. The caller provides
/// `Data<Box<dyn Database>>` and `Data<Config>`.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    // fixed paths before their `{id}` siblings
    .service(campaign::endpoints::get_campaigns)
    .service(campaign::endpoints::create_campaign)
    .service(campaign::endpoints::get_metrics_summary)
    .service(campaign::endpoints::get_campaign_by_id)
    .service(campaign::endpoints::update_campaign)
    .service(campaign::endpoints::delete_campaign)
    .service(campaign::endpoints::get_campaign_schedule)
    .service(template::endpoints::get_templates)
    .service(template::endpoints::get_categories)
    .service(template::endpoints::get_featured_templates)
    .service(template::endpoints::get_templates_by_time_range)
    .service(template::endpoints::get_template_by_id)
    .service(template::endpoints::get_template_metrics)
    .service(template::endpoints::create_campaign_from_template);
}

pub async fn path_not_found() -> HttpResponse {
    Error::PathNotFound.error_response()
}

pub async fn run(config: Config) -> Result<(), Error> {
    let db = MemoryDatabase::initialize(&config).await?;
    let db = Data::new(Box::new(db) as Box<dyn Database>);
    let bind_address = config.bind_address.clone();
    let config = Data::new(config);

    info!("listening on {}", bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .app_data(config.clone())
            .wrap(TracingLogger::default())
            .configure(configure)
            .default_service(web::to(path_not_found))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
