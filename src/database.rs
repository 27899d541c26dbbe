use std::time::Duration;

use tracing::info;

use crate::campaign::db::{CampaignStore, MemoryCampaignStore};
use crate::campaign::Campaign;
use crate::config::Config;
use crate::error::Error;
use crate::seed::{self, SeedData};
use crate::template::db::{MemoryTemplateStore, TemplateStore};
use crate::template::Template;

pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;
    fn templates(&self) -> &dyn TemplateStore;
}

/// Both stores held in process memory. Nothing is written back to the seed.
#[derive(Debug)]
pub struct MemoryDatabase {
    campaigns: MemoryCampaignStore,
    templates: MemoryTemplateStore,
}

impl MemoryDatabase {
    pub fn new(
        campaigns: Vec<Campaign>,
        templates: Vec<Template>,
        latency: Duration,
    ) -> MemoryDatabase {
        MemoryDatabase {
            campaigns: MemoryCampaignStore::new(campaigns, latency),
            templates: MemoryTemplateStore::new(templates, latency),
        }
    }

    pub fn from_seed(seed: SeedData, latency: Duration) -> MemoryDatabase {
        MemoryDatabase::new(seed.campaigns, seed.templates, latency)
    }

    pub async fn initialize(config: &Config) -> Result<MemoryDatabase, Error> {
        let seed = seed::load(config.seed_dir.as_deref()).await?;
        info!(
            "seeded {} campaigns and {} templates",
            seed.campaigns.len(),
            seed.templates.len()
        );

        Ok(MemoryDatabase::from_seed(seed, config.latency))
    }
}

impl Database for MemoryDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    fn templates(&self) -> &dyn TemplateStore {
        &self.templates
    }
}

/// Stand-in for the round trip to a real backend.
pub(crate) async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    pub fn empty() -> MemoryDatabase {
        MemoryDatabase::new(vec![], vec![], Duration::ZERO)
    }

    pub fn seeded() -> MemoryDatabase {
        MemoryDatabase::from_seed(seed::embedded().unwrap(), Duration::ZERO)
    }
}
