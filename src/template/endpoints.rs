use std::collections::BTreeMap;

use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post};
use serde::{Deserialize, Serialize};

use crate::campaign::NewCampaign;
use crate::config::Config;
use crate::database::Database;
use crate::error::Error;

use super::{manager, Template, TemplateCustomization, TemplateFilter, TemplateId};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBody {
    #[serde(flatten)]
    pub template: Template,
    pub estimated_hours: Option<u32>,
}

impl TemplateBody {
    pub fn render(template: Template) -> TemplateBody {
        TemplateBody {
            estimated_hours: template.estimated_hours(),
            template,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TimeRangeQuery {
    pub min_hours: u32,
    pub max_hours: u32,
}

#[get("/templates")]
#[tracing::instrument(skip(db))]
pub async fn get_templates(
    db: Data<Box<dyn Database>>,
    query: Query<TemplateFilter>,
) -> Result<Json<Vec<TemplateBody>>, Error> {
    let filter = query.into_inner();
    let templates = manager::filter_templates(&***db, &filter).await?;

    let body = templates.into_iter().map(TemplateBody::render).collect();

    Ok(Json(body))
}

#[get("/templates/categories")]
#[tracing::instrument(skip(db))]
pub async fn get_categories(db: Data<Box<dyn Database>>) -> Result<Json<Vec<String>>, Error> {
    let categories = manager::get_categories(&***db).await?;

    Ok(Json(categories))
}

#[get("/templates/featured")]
#[tracing::instrument(skip(db, config))]
pub async fn get_featured_templates(
    db: Data<Box<dyn Database>>,
    config: Data<Config>,
) -> Result<Json<Vec<TemplateBody>>, Error> {
    let templates = manager::get_featured_templates(&***db, &config.featured_templates).await?;

    let body = templates.into_iter().map(TemplateBody::render).collect();

    Ok(Json(body))
}

#[get("/templates/time-range")]
#[tracing::instrument(skip(db))]
pub async fn get_templates_by_time_range(
    db: Data<Box<dyn Database>>,
    query: Query<TimeRangeQuery>,
) -> Result<Json<Vec<TemplateBody>>, Error> {
    let TimeRangeQuery {
        min_hours,
        max_hours,
    } = query.into_inner();
    let templates = manager::get_templates_by_time_range(&***db, min_hours, max_hours).await?;

    let body = templates.into_iter().map(TemplateBody::render).collect();

    Ok(Json(body))
}

#[get("/templates/{template_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_template_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<TemplateId>,
) -> Result<Json<TemplateBody>, Error> {
    let template_id = params.into_inner();
    let template = manager::get_template_by_id(&***db, template_id).await?;

    Ok(Json(TemplateBody::render(template)))
}

#[get("/templates/{template_id}/metrics")]
#[tracing::instrument(skip(db))]
pub async fn get_template_metrics(
    db: Data<Box<dyn Database>>,
    params: Path<TemplateId>,
) -> Result<Json<BTreeMap<String, String>>, Error> {
    let template_id = params.into_inner();
    let metrics = manager::get_template_metrics(&***db, template_id).await?;

    Ok(Json(metrics))
}

#[post("/templates/{template_id}/draft")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign_from_template(
    db: Data<Box<dyn Database>>,
    params: Path<TemplateId>,
    body: Json<TemplateCustomization>,
) -> Result<Json<NewCampaign>, Error> {
    let template_id = params.into_inner();
    let draft =
        manager::create_campaign_from_template(&***db, template_id, body.into_inner()).await?;

    Ok(Json(draft))
}
