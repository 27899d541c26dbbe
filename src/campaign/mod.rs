use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::typedid::{TypedId, TypedIdMarker};

pub mod calendar;
pub mod db;
pub mod endpoints;
pub mod manager;
pub mod metrics;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub status: CampaignStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}

impl Campaign {
    pub fn ctr(&self) -> f64 {
        metrics::percentage(self.clicks as f64, self.impressions as f64)
    }

    pub fn cvr(&self) -> f64 {
        metrics::percentage(self.conversions as f64, self.clicks as f64)
    }

    pub fn budget_utilization(&self) -> f64 {
        metrics::percentage(self.spent, self.budget)
    }

    /// The store never caps spend; this is only a signal for callers.
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

impl Default for CampaignStatus {
    fn default() -> CampaignStatus {
        CampaignStatus::Draft
    }
}

/// Delivery channel of a campaign. Values outside the known set are kept
/// verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Channel {
    Email,
    Social,
    Search,
    Display,
    Video,
    Other(String),
}

impl Channel {
    pub fn as_str(&self) -> &str {
        match self {
            Channel::Email => "email",
            Channel::Social => "social",
            Channel::Search => "search",
            Channel::Display => "display",
            Channel::Video => "video",
            Channel::Other(other) => other,
        }
    }
}

impl From<String> for Channel {
    fn from(value: String) -> Channel {
        match value.as_str() {
            "email" => Channel::Email,
            "social" => Channel::Social,
            "search" => Channel::Search,
            "display" => Channel::Display,
            "video" => Channel::Video,
            _ => Channel::Other(value),
        }
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> String {
        match channel {
            Channel::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for creating a campaign. The id is assigned by the store and
/// nothing else is checked: missing fields fall back to empty values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl NewCampaign {
    pub fn new(name: impl Into<String>, channel: Channel, budget: f64) -> NewCampaign {
        NewCampaign {
            name: name.into(),
            status: CampaignStatus::Draft,
            channel: Some(channel),
            start_date: None,
            end_date: None,
            budget,
            spent: None,
            impressions: None,
            clicks: None,
            conversions: None,
            content: None,
        }
    }

    pub fn into_campaign(self, id: CampaignId) -> Campaign {
        Campaign {
            id,
            name: self.name,
            status: self.status,
            channel: self.channel,
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            spent: self.spent.unwrap_or(0.0),
            impressions: self.impressions.unwrap_or(0),
            clicks: self.clicks.unwrap_or(0),
            conversions: self.conversions.unwrap_or(0),
            content: self.content,
        }
    }
}

/// Partial update of a campaign. There is deliberately no `id` field, any
/// `id` sent by a client is dropped during deserialization. The dates and
/// `content` can be cleared with an explicit `null`, which arrives as
/// `Some(None)`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impressions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversions: Option<u64>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub content: Option<Option<Value>>,
}

// a present field is always `Some`, so `null` becomes `Some(None)`
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl CampaignPatch {
    pub fn apply(self, campaign: &mut Campaign) {
        if let Some(name) = self.name {
            campaign.name = name;
        }
        if let Some(status) = self.status {
            campaign.status = status;
        }
        if let Some(channel) = self.channel {
            campaign.channel = Some(channel);
        }
        if let Some(start_date) = self.start_date {
            campaign.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            campaign.end_date = end_date;
        }
        if let Some(budget) = self.budget {
            campaign.budget = budget;
        }
        if let Some(spent) = self.spent {
            campaign.spent = spent;
        }
        if let Some(impressions) = self.impressions {
            campaign.impressions = impressions;
        }
        if let Some(clicks) = self.clicks {
            campaign.clicks = clicks;
        }
        if let Some(conversions) = self.conversions {
            campaign.conversions = conversions;
        }
        if let Some(content) = self.content {
            campaign.content = content;
        }
    }
}

/// Criteria used by the campaign list: a free-text search over name and
/// channel, narrowed by exact status and channel matches.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CampaignFilter {
    pub search: Option<String>,
    pub status: Option<CampaignStatus>,
    pub channel: Option<Channel>,
}

impl CampaignFilter {
    pub fn matches(&self, campaign: &Campaign) -> bool {
        if let Some(search) = &self.search {
            let search = search.to_lowercase();
            let in_name = campaign.name.to_lowercase().contains(&search);
            let in_channel = campaign
                .channel
                .as_ref()
                .map_or(false, |channel| channel.as_str().to_lowercase().contains(&search));
            if !in_name && !in_channel {
                return false;
            }
        }

        if let Some(status) = self.status {
            if campaign.status != status {
                return false;
            }
        }

        if let Some(channel) = &self.channel {
            if campaign.channel.as_ref() != Some(channel) {
                return false;
            }
        }

        true
    }
}
