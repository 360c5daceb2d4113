// Remaining-budget pacing: how much of the FAAB budget can go out per week.

use chrono::{Datelike, NaiveDate};

use crate::config::LeagueConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLabel {
    Flush,
    Healthy,
    Tight,
    Critical,
}

impl BudgetLabel {
    fn from_factor(factor: f64) -> BudgetLabel {
        if factor >= 1.3 {
            BudgetLabel::Flush
        } else if factor >= 0.9 {
            BudgetLabel::Healthy
        } else if factor >= 0.6 {
            BudgetLabel::Tight
        } else {
            BudgetLabel::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BudgetLabel::Flush => "FLUSH",
            BudgetLabel::Healthy => "HEALTHY",
            BudgetLabel::Tight => "TIGHT",
            BudgetLabel::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub remaining: u32,
    pub total_budget: u32,
    pub weeks_remaining: u32,
    pub ideal_weekly: f64,
    pub weekly_budget: f64,
    /// Bid multiplier: above 1 when ahead of pace, below when behind.
    pub budget_factor: f64,
    pub label: BudgetLabel,
    pub is_playoffs: bool,
    pub max_single_bid: u32,
}

/// Month and day the fantasy regular season is assumed to end when the
/// league reports no week numbers.
const SEASON_END: (u32, u32) = (4, 13);

fn calendar_weeks_remaining(today: NaiveDate) -> u32 {
    let year = if today.month() <= 6 {
        today.year()
    } else {
        today.year() + 1
    };
    let days_left = NaiveDate::from_ymd_opt(year, SEASON_END.0, SEASON_END.1)
        .map_or(1, |end| (end - today).num_days().max(1));
    ((days_left / 7) as u32).max(1)
}

/// Budget pacing for the current week.
///
/// With a current week and end week, the regular season runs up to the
/// playoff start; otherwise the weeks left are estimated from `today`.
pub fn compute_budget_status(
    remaining: u32,
    current_week: Option<u32>,
    league: &LeagueConfig,
    max_bid_percent: f64,
    today: NaiveDate,
) -> BudgetStatus {
    let is_playoffs = matches!(
        (current_week, league.playoff_start_week),
        (Some(cur), Some(start)) if cur >= start
    );

    let weeks_remaining = match (current_week, league.end_week) {
        (Some(cur), Some(end)) => match league.playoff_start_week {
            Some(start) if !is_playoffs => start.saturating_sub(cur).max(1),
            _ => (end + 1).saturating_sub(cur).max(1),
        },
        _ => calendar_weeks_remaining(today),
    };

    let total_budget = if is_playoffs {
        league.budget.playoffs
    } else {
        league.budget.regular_season
    };
    let weeks = weeks_remaining as f64;
    let ideal_weekly = total_budget as f64 / weeks;
    let weekly_budget = remaining as f64 / weeks;
    let factor = (weekly_budget / ideal_weekly.max(1.0)).clamp(0.5, 2.0);
    let budget_factor = (factor * 100.0).round() / 100.0;

    BudgetStatus {
        remaining,
        total_budget,
        weeks_remaining,
        ideal_weekly,
        weekly_budget,
        budget_factor,
        label: BudgetLabel::from_factor(budget_factor),
        is_playoffs,
        max_single_bid: (remaining as f64 * max_bid_percent).floor() as u32,
    }
}
