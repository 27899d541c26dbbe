use chrono::NaiveDate;
use tracing::info;

use crate::database::Database;
use crate::error::Error;

use super::calendar::{self, ScheduledCampaign};
use super::metrics::MetricsSummary;
use super::{
    Campaign, CampaignFilter, CampaignId, CampaignPatch, CampaignStatus, Channel, NewCampaign,
};

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(db: &dyn Database, campaign: NewCampaign) -> Result<Campaign, Error> {
    let campaign = db.campaigns().insert_campaign(campaign).await?;
    info!("created campaign {}", campaign.id);

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: &dyn Database,
    campaign_id: CampaignId,
    patch: CampaignPatch,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .update_campaign(campaign_id, patch)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: &dyn Database, campaign_id: CampaignId) -> Result<bool, Error> {
    let deleted = db.campaigns().delete_campaign(campaign_id).await?;
    if !deleted {
        return Err(Error::CampaignNotFound { campaign_id });
    }

    info!("deleted campaign {}", campaign_id);
    Ok(true)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns_by_status(
    db: &dyn Database,
    status: CampaignStatus,
) -> Result<Vec<Campaign>, Error> {
    let filter = CampaignFilter {
        status: Some(status),
        ..Default::default()
    };

    search_campaigns(db, &filter).await
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns_by_channel(
    db: &dyn Database,
    channel: Channel,
) -> Result<Vec<Campaign>, Error> {
    let filter = CampaignFilter {
        channel: Some(channel),
        ..Default::default()
    };

    search_campaigns(db, &filter).await
}

#[tracing::instrument(skip(db))]
pub async fn search_campaigns(
    db: &dyn Database,
    filter: &CampaignFilter,
) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(campaigns
        .into_iter()
        .filter(|campaign| filter.matches(campaign))
        .collect())
}

#[tracing::instrument(skip(db))]
pub async fn get_metrics_summary(db: &dyn Database) -> Result<MetricsSummary, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(MetricsSummary::from_campaigns(&campaigns))
}

#[tracing::instrument(skip(db))]
pub async fn get_metrics_summary_by_channel(
    db: &dyn Database,
    channel: Channel,
) -> Result<MetricsSummary, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(MetricsSummary::from_campaigns(
        campaigns.iter().filter(|campaign| campaign.channel.as_ref() == Some(&channel)),
    ))
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_schedule(
    db: &dyn Database,
    day: NaiveDate,
) -> Result<Vec<ScheduledCampaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(calendar::schedule_for(campaigns, day))
}
