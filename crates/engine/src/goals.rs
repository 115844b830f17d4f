//! Goal progress.
//!
//! Progress is always derived from the contributions on read; nothing here
//! is stored.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{GoalContribution, MoneyCents, QuotaFrequency, SavingsGoal};

/// Completion estimate at the current quota.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalProjection {
    /// Quota periods still needed.
    pub periods: u64,
    pub estimated_date: NaiveDate,
    /// Rounded to one decimal, 30 days per month.
    pub estimated_months: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub current: MoneyCents,
    pub remaining: MoneyCents,
    pub projection: Option<GoalProjection>,
}

impl GoalProgress {
    /// Progress of a goal of `target` after `contributed`, with the
    /// completion projected from `today` at `quota` per `frequency`.
    ///
    /// There is no projection when the quota is zero or the target is
    /// already reached.
    #[must_use]
    pub fn compute(
        target: MoneyCents,
        quota: MoneyCents,
        frequency: QuotaFrequency,
        contributed: MoneyCents,
        today: NaiveDate,
    ) -> Self {
        let remaining = (target - contributed).non_negative();
        let projection = (quota.is_positive() && remaining.is_positive())
            .then(|| project(remaining, quota, frequency, today))
            .flatten();
        Self {
            current: contributed,
            remaining,
            projection,
        }
    }

    /// Progress of `goal` given its contributions.
    #[must_use]
    pub fn of(goal: &SavingsGoal, contributions: &[GoalContribution], today: NaiveDate) -> Self {
        let contributed = contributions.iter().map(|c| c.amount).sum();
        Self::compute(
            goal.target_amount,
            goal.quota_amount,
            goal.frequency,
            contributed,
            today,
        )
    }
}

fn project(
    remaining: MoneyCents,
    quota: MoneyCents,
    frequency: QuotaFrequency,
    today: NaiveDate,
) -> Option<GoalProjection> {
    let remaining = u64::try_from(remaining.cents()).ok()?;
    let quota = u64::try_from(quota.cents()).ok()?;
    let periods = remaining.div_ceil(quota);
    let days = periods.checked_mul(frequency.days_per_period())?;
    let estimated_date = today.checked_add_days(Days::new(days))?;
    let estimated_months = (days as f64 / 30.0 * 10.0).round() / 10.0;
    Some(GoalProjection {
        periods,
        estimated_date,
        estimated_months,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[test]
    fn monthly_quota_projection() {
        let progress = GoalProgress::compute(
            MoneyCents::new(100_000),
            MoneyCents::new(10_000),
            QuotaFrequency::Monthly,
            MoneyCents::ZERO,
            today(),
        );
        assert_eq!(progress.current, MoneyCents::ZERO);
        assert_eq!(progress.remaining, MoneyCents::new(100_000));
        let projection = progress.projection.unwrap();
        assert_eq!(projection.periods, 10);
        assert_eq!(
            projection.estimated_date,
            today().checked_add_days(Days::new(300)).unwrap()
        );
        assert_eq!(projection.estimated_months, 10.0);
    }

    #[test]
    fn partial_period_rounds_up() {
        let progress = GoalProgress::compute(
            MoneyCents::new(10_000),
            MoneyCents::new(3_000),
            QuotaFrequency::Weekly,
            MoneyCents::new(500),
            today(),
        );
        let projection = progress.projection.unwrap();
        // 95.00 left at 30.00 a week
        assert_eq!(projection.periods, 4);
        assert_eq!(projection.estimated_months, 0.9);
    }

    #[test]
    fn over_contribution_clamps_remaining() {
        let progress = GoalProgress::compute(
            MoneyCents::new(10_000),
            MoneyCents::new(1_000),
            QuotaFrequency::Daily,
            MoneyCents::new(12_000),
            today(),
        );
        assert_eq!(progress.current, MoneyCents::new(12_000));
        assert_eq!(progress.remaining, MoneyCents::ZERO);
        assert!(progress.projection.is_none());
    }

    #[test]
    fn zero_quota_has_no_projection() {
        let progress = GoalProgress::compute(
            MoneyCents::new(10_000),
            MoneyCents::ZERO,
            QuotaFrequency::Monthly,
            MoneyCents::ZERO,
            today(),
        );
        assert!(progress.projection.is_none());
    }
}
