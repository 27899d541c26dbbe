use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::campaign::{CampaignStatus, Channel, NewCampaign};
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type TemplateId = TypedId<Template>;

/// How long a materialized campaign runs when no end date is given.
pub const DEFAULT_CAMPAIGN_DAYS: i64 = 30;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, String>,
    pub template: CampaignBlueprint,
}

impl TypedIdMarker for Template {
    fn tag() -> &'static str {
        "TPL"
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// The partial campaign a template stamps onto new drafts.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBlueprint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    pub channel: Channel,
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

/// Caller overrides applied on top of a blueprint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateCustomization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl Template {
    /// Leading whole number of `estimated_time`, so `"2 hours"` is 2 and
    /// `"1-2 hours"` is 1. Text without a leading number yields `None`.
    pub fn estimated_hours(&self) -> Option<u32> {
        let text = self.estimated_time.trim_start();
        let text = text.strip_prefix('+').unwrap_or(text);
        let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();

        digits.parse().ok()
    }

    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();

        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&query))
    }

    /// Builds a campaign draft from this template. The draft is not stored
    /// anywhere; pass it to the campaign store to persist it.
    pub fn materialize(
        &self,
        customization: TemplateCustomization,
        now: DateTime<Utc>,
    ) -> NewCampaign {
        let blueprint = &self.template;

        let mut draft = NewCampaign::new(
            customization
                .name
                .or_else(|| blueprint.name.clone())
                .unwrap_or_else(|| self.name.clone()),
            customization
                .channel
                .unwrap_or_else(|| blueprint.channel.clone()),
            customization.budget.unwrap_or(blueprint.budget),
        );
        draft.status = customization
            .status
            .or(blueprint.status)
            .unwrap_or_default();
        draft.start_date = Some(customization.start_date.unwrap_or(now));
        draft.end_date = Some(
            customization
                .end_date
                .unwrap_or_else(|| now + Duration::days(DEFAULT_CAMPAIGN_DAYS)),
        );
        draft.content = customization
            .content
            .or_else(|| blueprint.content.clone());

        draft
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TemplateFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl TemplateFilter {
    pub fn matches(&self, template: &Template) -> bool {
        if let Some(search) = &self.search {
            if !template.matches_search(search) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if &template.category != category {
                return false;
            }
        }

        if let Some(difficulty) = self.difficulty {
            if template.difficulty != difficulty {
                return false;
            }
        }

        true
    }
}
