use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, patch, post};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::calendar::ScheduledCampaign;
use super::metrics::MetricsSummary;
use super::{manager, Campaign, CampaignFilter, CampaignId, CampaignPatch, Channel, NewCampaign};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBody {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub ctr: f64,
    pub cvr: f64,
    pub budget_utilization: f64,
    pub over_budget: bool,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            ctr: campaign.ctr(),
            cvr: campaign.cvr(),
            budget_utilization: campaign.budget_utilization(),
            over_budget: campaign.is_over_budget(),
            campaign,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeletedBody {
    pub deleted: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MetricsQuery {
    pub channel: Option<Channel>,
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: Data<Box<dyn Database>>,
    query: Query<CampaignFilter>,
) -> Result<Json<Vec<CampaignBody>>, Error> {
    let filter = query.into_inner();
    let campaigns = manager::search_campaigns(&***db, &filter).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

#[post("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<NewCampaign>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign = manager::create_campaign(&***db, body.into_inner()).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[get("/campaigns/metrics")]
#[tracing::instrument(skip(db))]
pub async fn get_metrics_summary(
    db: Data<Box<dyn Database>>,
    query: Query<MetricsQuery>,
) -> Result<Json<MetricsSummary>, Error> {
    let summary = match query.into_inner().channel {
        Some(channel) => manager::get_metrics_summary_by_channel(&***db, channel).await?,
        None => manager::get_metrics_summary(&***db).await?,
    };

    Ok(Json(summary))
}

#[get("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();
    let campaign = manager::get_campaign_by_id(&***db, campaign_id).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[patch("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
    body: Json<CampaignPatch>,
) -> Result<Json<CampaignBody>, Error> {
    let campaign_id = params.into_inner();
    let campaign = manager::update_campaign(&***db, campaign_id, body.into_inner()).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[delete("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<DeletedBody>, Error> {
    let campaign_id = params.into_inner();
    let deleted = manager::delete_campaign(&***db, campaign_id).await?;

    Ok(Json(DeletedBody { deleted }))
}

#[get("/calendar/{day}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_schedule(
    db: Data<Box<dyn Database>>,
    params: Path<NaiveDate>,
) -> Result<Json<Vec<ScheduledCampaign>>, Error> {
    let day = params.into_inner();
    let schedule = manager::get_campaign_schedule(&***db, day).await?;

    Ok(Json(schedule))
}
