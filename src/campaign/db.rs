use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::simulate_latency;
use crate::error::Error;

use super::{Campaign, CampaignId, CampaignPatch, NewCampaign};

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;

    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, Error>;

    async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        patch: CampaignPatch,
    ) -> Result<Option<Campaign>, Error>;

    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error>;
}

#[derive(Debug)]
pub struct MemoryCampaignStore {
    state: RwLock<CampaignState>,
    latency: Duration,
}

#[derive(Debug)]
struct CampaignState {
    // newest first
    campaigns: Vec<Campaign>,
    // highest id ever handed out, survives deletes
    last_id: CampaignId,
}

impl MemoryCampaignStore {
    pub fn new(campaigns: Vec<Campaign>, latency: Duration) -> MemoryCampaignStore {
        let last_id = campaigns
            .iter()
            .map(|campaign| campaign.id)
            .max()
            .unwrap_or_default();

        MemoryCampaignStore {
            state: RwLock::new(CampaignState { campaigns, last_id }),
            latency,
        }
    }
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        simulate_latency(self.latency).await;
        let state = self.state.read().await;

        Ok(state.campaigns.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        simulate_latency(self.latency).await;
        let state = self.state.read().await;

        let campaign = state
            .campaigns
            .iter()
            .find(|campaign| campaign.id == campaign_id)
            .cloned();

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, Error> {
        simulate_latency(self.latency).await;
        let mut state = self.state.write().await;

        let campaign_id = state.last_id.next().ok_or(Error::IdsExhausted)?;
        let campaign = campaign.into_campaign(campaign_id);
        state.last_id = campaign_id;
        state.campaigns.insert(0, campaign.clone());

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        patch: CampaignPatch,
    ) -> Result<Option<Campaign>, Error> {
        simulate_latency(self.latency).await;
        let mut state = self.state.write().await;

        let campaign = state
            .campaigns
            .iter_mut()
            .find(|campaign| campaign.id == campaign_id)
            .map(|campaign| {
                patch.apply(campaign);
                campaign.clone()
            });

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        simulate_latency(self.latency).await;
        let mut state = self.state.write().await;

        let index = state
            .campaigns
            .iter()
            .position(|campaign| campaign.id == campaign_id);

        match index {
            Some(index) => {
                state.campaigns.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
