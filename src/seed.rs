use std::path::Path;

use tracing::info;

use crate::campaign::Campaign;
use crate::error::Error;
use crate::template::Template;

const CAMPAIGNS_FILE: &str = "campaigns.json";
const TEMPLATES_FILE: &str = "templates.json";

const EMBEDDED_CAMPAIGNS: &str = include_str!("../seed/campaigns.json");
const EMBEDDED_TEMPLATES: &str = include_str!("../seed/templates.json");

#[derive(Clone, Debug)]
pub struct SeedData {
    pub campaigns: Vec<Campaign>,
    pub templates: Vec<Template>,
}

impl SeedData {
    pub fn parse(campaigns: &str, templates: &str) -> Result<SeedData, Error> {
        Ok(SeedData {
            campaigns: serde_json::from_str(campaigns)?,
            templates: serde_json::from_str(templates)?,
        })
    }
}

/// The seed compiled into the binary.
pub fn embedded() -> Result<SeedData, Error> {
    SeedData::parse(EMBEDDED_CAMPAIGNS, EMBEDDED_TEMPLATES)
}

/// Reads the seed once. With a directory, both files must exist there;
/// otherwise the embedded seed is used.
pub async fn load(dir: Option<&Path>) -> Result<SeedData, Error> {
    let dir = match dir {
        Some(dir) => dir,
        None => return embedded(),
    };

    info!("loading seed data from {}", dir.display());
    let campaigns = tokio::fs::read_to_string(dir.join(CAMPAIGNS_FILE)).await?;
    let templates = tokio::fs::read_to_string(dir.join(TEMPLATES_FILE)).await?;

    SeedData::parse(&campaigns, &templates)
}
