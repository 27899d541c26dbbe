use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Campaign;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleEvent {
    Starts,
    Ends,
    Ongoing,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScheduledCampaign {
    pub campaign: Campaign,
    pub events: Vec<ScheduleEvent>,
}

/// What happens to `campaign` on `day`, or `None` if it is not running then.
///
/// Days are compared in UTC. A campaign missing either date is never
/// scheduled.
pub fn events_on(campaign: &Campaign, day: NaiveDate) -> Option<Vec<ScheduleEvent>> {
    let start = campaign.start_date?.date_naive();
    let end = campaign.end_date?.date_naive();

    if day < start || day > end {
        return None;
    }

    let mut events = Vec::new();
    if day == start {
        events.push(ScheduleEvent::Starts);
    }
    if day == end {
        events.push(ScheduleEvent::Ends);
    }
    if day > start && day < end {
        events.push(ScheduleEvent::Ongoing);
    }

    Some(events)
}

pub fn schedule_for<I>(campaigns: I, day: NaiveDate) -> Vec<ScheduledCampaign>
where
    I: IntoIterator<Item = Campaign>,
{
    campaigns
        .into_iter()
        .filter_map(|campaign| {
            events_on(&campaign, day).map(|events| ScheduledCampaign { campaign, events })
        })
        .collect()
}
