use serde::{Deserialize, Serialize};

use super::{Campaign, CampaignStatus};

/// Flat revenue attributed to each conversion when computing ROAS.
pub const VALUE_PER_CONVERSION: f64 = 50.0;

/// `numerator` as a percentage of `denominator`, or 0 when there is nothing
/// to divide by.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator * 100.0 / denominator
    } else {
        0.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub active_campaigns: usize,
    pub total_campaigns: usize,
    pub total_budget: f64,
    pub total_spent: f64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub ctr: f64,
    pub cvr: f64,
    pub roas: f64,
}

impl MetricsSummary {
    pub fn from_campaigns<'a, I>(campaigns: I) -> MetricsSummary
    where
        I: IntoIterator<Item = &'a Campaign>,
    {
        let mut summary = campaigns
            .into_iter()
            .fold(MetricsSummary::default(), |mut summary, campaign| {
                if campaign.status == CampaignStatus::Active {
                    summary.active_campaigns += 1;
                }
                summary.total_campaigns += 1;
                summary.total_budget += campaign.budget;
                summary.total_spent += campaign.spent;
                // counters are unchecked on write, so the totals clamp
                summary.total_impressions =
                    summary.total_impressions.saturating_add(campaign.impressions);
                summary.total_clicks = summary.total_clicks.saturating_add(campaign.clicks);
                summary.total_conversions =
                    summary.total_conversions.saturating_add(campaign.conversions);
                summary
            });

        summary.ctr = percentage(
            summary.total_clicks as f64,
            summary.total_impressions as f64,
        );
        summary.cvr = percentage(
            summary.total_conversions as f64,
            summary.total_clicks as f64,
        );
        summary.roas = if summary.total_spent > 0.0 {
            summary.total_conversions as f64 * VALUE_PER_CONVERSION / summary.total_spent
        } else {
            0.0
        };

        summary
    }
}
