//! Marketing campaigns and their analytics counters.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::types::{
    Budget, CampaignId, CampaignName, CampaignStatus, CampaignTypeId, Counter, HubId,
    SanitizedText, TypeConstraintError,
};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Campaign {
    pub id: CampaignId,
    pub hub_id: HubId,
    pub campaign_type_id: Option<CampaignTypeId>,
    pub name: CampaignName,
    pub description: Option<String>,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<Budget>,
    pub analytics: CampaignAnalytics,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Running period of a campaign; an open end means "until further notice".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CampaignPeriod {
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl CampaignPeriod {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, TypeConstraintError> {
        match end {
            Some(end) if end < start => Err(TypeConstraintError::InvalidDateRange),
            _ => Ok(Self { start, end }),
        }
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Whether `date` falls inside the period (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.is_none_or(|end| date <= end)
    }
}

/// Optional funnel counters reported for a campaign.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CampaignAnalytics {
    pub impressions: Option<Counter>,
    pub clicks: Option<Counter>,
    pub conversions: Option<Counter>,
}

impl CampaignAnalytics {
    /// Builds the counters, rejecting a funnel that widens downstream.
    pub fn new(
        impressions: Option<Counter>,
        clicks: Option<Counter>,
        conversions: Option<Counter>,
    ) -> Result<Self, TypeConstraintError> {
        if let (Some(impressions), Some(clicks)) = (impressions, clicks) {
            if clicks > impressions {
                return Err(TypeConstraintError::InvalidValue(
                    "clicks exceed impressions".to_string(),
                ));
            }
        }
        if let (Some(clicks), Some(conversions)) = (clicks, conversions) {
            if conversions > clicks {
                return Err(TypeConstraintError::InvalidValue(
                    "conversions exceed clicks".to_string(),
                ));
            }
        }
        Ok(Self {
            impressions,
            clicks,
            conversions,
        })
    }

    /// Clicks per impression, when both counters are known and non-zero.
    pub fn click_through_rate(&self) -> Option<f64> {
        ratio(self.clicks?, self.impressions?)
    }

    /// Conversions per click, when both counters are known and non-zero.
    pub fn conversion_rate(&self) -> Option<f64> {
        ratio(self.conversions?, self.clicks?)
    }
}

fn ratio(part: Counter, whole: Counter) -> Option<f64> {
    if whole.get() == 0 {
        None
    } else {
        Some(part.get() as f64 / whole.get() as f64)
    }
}

#[derive(Clone, Debug)]
pub struct NewCampaign {
    pub hub_id: HubId,
    pub campaign_type_id: Option<CampaignTypeId>,
    pub name: CampaignName,
    pub description: Option<SanitizedText>,
    pub status: CampaignStatus,
    pub period: CampaignPeriod,
    pub budget: Option<Budget>,
    pub analytics: CampaignAnalytics,
}

/// Full replacement of the editable campaign fields.
#[derive(Clone, Debug)]
pub struct UpdateCampaign {
    pub campaign_type_id: Option<CampaignTypeId>,
    pub name: CampaignName,
    pub description: Option<SanitizedText>,
    pub status: CampaignStatus,
    pub period: CampaignPeriod,
    pub budget: Option<Budget>,
    pub analytics: CampaignAnalytics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn counter(value: i64) -> Option<Counter> {
        Some(Counter::new(value).unwrap())
    }

    #[test]
    fn period_rejects_end_before_start() {
        let result = CampaignPeriod::new(date(2025, 3, 10), Some(date(2025, 3, 9)));
        assert_eq!(result, Err(TypeConstraintError::InvalidDateRange));
    }

    #[test]
    fn period_allows_single_day_and_open_end() {
        let single = CampaignPeriod::new(date(2025, 3, 10), Some(date(2025, 3, 10))).unwrap();
        assert!(single.contains(date(2025, 3, 10)));
        assert!(!single.contains(date(2025, 3, 11)));

        let open = CampaignPeriod::new(date(2025, 3, 10), None).unwrap();
        assert!(open.contains(date(2030, 1, 1)));
        assert!(!open.contains(date(2025, 3, 9)));
    }

    #[test]
    fn analytics_funnel_must_narrow() {
        assert!(CampaignAnalytics::new(counter(10), counter(11), None).is_err());
        assert!(CampaignAnalytics::new(None, counter(5), counter(6)).is_err());
        assert!(CampaignAnalytics::new(None, None, counter(6)).is_ok());
    }

    #[test]
    fn analytics_rates() {
        let analytics = CampaignAnalytics::new(counter(200), counter(50), counter(5)).unwrap();
        assert_eq!(analytics.click_through_rate(), Some(0.25));
        assert_eq!(analytics.conversion_rate(), Some(0.1));

        let empty = CampaignAnalytics::new(counter(0), counter(0), None).unwrap();
        assert_eq!(empty.click_through_rate(), None);
        assert_eq!(empty.conversion_rate(), None);
    }
}
