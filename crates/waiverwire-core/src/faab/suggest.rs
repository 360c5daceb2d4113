// Per-player FAAB bid suggestions from the tier's historical prices, scaled
// for budget pace, schedule density and roster strength.

use crate::config::FaabConfig;
use crate::faab::budget::BudgetStatus;
use crate::faab::history::{BidAnalysis, PremiumSummary, TierBidStats};
use crate::faab::{BidStrategy, Tier};
use crate::valuation::needs::RosterStrength;
use crate::valuation::schedule::ScheduleOutlook;
use crate::valuation::scoring::PlayerValuation;

/// Minimum standard bids in a tier before its prices are trusted.
const MIN_TIER_SAMPLES: usize = 2;
const HIGH_CONFIDENCE_SAMPLES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn label(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// Optional scaling inputs shared by every suggestion in a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BidContext<'a> {
    pub budget: Option<&'a BudgetStatus>,
    pub schedule: Option<&'a ScheduleOutlook>,
    pub roster: Option<&'a RosterStrength>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BidSuggestion {
    pub player: String,
    pub adj_score: f64,
    pub tier: Tier,
    pub strategy: BidStrategy,
    /// Bid from the tier's prices (or the heuristic) before any bump.
    pub base_bid: u32,
    /// After the Elite bump, before scaling.
    pub tier_bid: u32,
    pub suggested_bid: u32,
    pub confidence: Confidence,
    pub samples: usize,
    pub games_this_week: Option<u32>,
    pub premium_range: Option<PremiumSummary>,
    pub reason: String,
    /// Each bump, scaling factor and cap applied, in order.
    pub adjustments: Vec<String>,
}

/// Elite targets always get at least `max(+$1, +pct)` over the tier base.
pub fn elite_bump(base: u32, pct: f64) -> u32 {
    // Shave float noise so 30 * 0.1 stays a $3 bump.
    let bump = (base as f64 * pct - 1e-9).ceil().max(0.0) as u32;
    base + bump.max(1)
}

fn tier_base(stats: &TierBidStats, tier: Tier, strategy: BidStrategy) -> (u32, String) {
    match strategy {
        BidStrategy::Value => (
            stats.p25.unwrap_or(stats.min),
            format!("P25 for {tier} tier (bargain, std bids)"),
        ),
        BidStrategy::Competitive => (
            stats.median.round() as u32,
            format!("Median for {tier} tier (market rate, std bids)"),
        ),
        BidStrategy::Aggressive => (
            stats.p75.unwrap_or(stats.max),
            format!("P75 for {tier} tier (higher win rate, std bids)"),
        ),
    }
}

fn heuristic_base(adj_score: f64, league_median: f64, strategy: BidStrategy) -> u32 {
    let score_mult = (adj_score / 5.0).min(2.0);
    let base = ((league_median * score_mult) as i64).max(1) as f64;
    match strategy {
        BidStrategy::Value => ((base * 0.7) as i64).max(1) as u32,
        BidStrategy::Competitive => base as u32,
        BidStrategy::Aggressive => (base * 1.4) as u32,
    }
}

/// Budget, schedule and roster scaling followed by the safety caps.
///
/// Each factor truncates to whole dollars. The result is at least $1 unless
/// a cap forces it lower: never above `max_single_bid` and never above the
/// remaining budget. Every step that changes the bid is described in
/// `adjustments`.
fn scale_bid(
    bid: u32,
    games: Option<(u32, f64)>,
    ctx: &BidContext<'_>,
    cfg: &FaabConfig,
    adjustments: &mut Vec<String>,
) -> u32 {
    let mut bid = bid as f64;
    if let Some(budget) = ctx.budget {
        bid = (bid * budget.budget_factor).trunc();
        adjustments.push(format!(
            "budget x{:.2} ({})",
            budget.budget_factor,
            budget.label.label()
        ));
    }
    if let Some((games, avg)) = games {
        let factor = (1.0 + cfg.schedule_weight * (games as f64 - avg)).max(0.0);
        bid = (bid * factor).trunc();
        adjustments.push(format!("schedule x{factor:.2} ({games}G vs {avg:.1} avg)"));
    }
    if let Some(roster) = ctx.roster {
        bid = (bid * roster.bid_factor).trunc();
        adjustments.push(format!("roster x{:.2} ({})", roster.bid_factor, roster.label));
    }

    let mut bid = (bid as u32).max(1);
    if let Some(budget) = ctx.budget {
        if bid > budget.max_single_bid {
            bid = budget.max_single_bid;
            adjustments.push(format!("capped at max single bid ${bid}"));
        }
        if bid > budget.remaining {
            bid = budget.remaining;
            adjustments.push(format!("capped at remaining budget ${bid}"));
        }
    }
    bid
}

fn context_notes(games: Option<(u32, f64)>, ctx: &BidContext<'_>) -> Vec<String> {
    let mut notes = Vec::new();
    if let Some(budget) = ctx.budget {
        notes.push(format!("Budget: {}", budget.label.label()));
    }
    if let Some(roster) = ctx.roster {
        notes.push(format!("Roster: {}", roster.label));
    }
    if let Some((g, _)) = games {
        notes.push(format!("{g}G this week"));
    }
    notes
}

/// Suggest a bid for one player.
///
/// Tiers with at least two standard bids price from their distribution;
/// otherwise the league median (or the configured default) is scaled by
/// score and the suggestion is low confidence.
pub fn suggest_bid(
    player: &str,
    adj_score: f64,
    team: Option<&str>,
    analysis: &BidAnalysis,
    strategy: BidStrategy,
    ctx: &BidContext<'_>,
    cfg: &FaabConfig,
) -> BidSuggestion {
    let tier = analysis.thresholds.tier_for(adj_score);
    let games = match (team, ctx.schedule) {
        (Some(team), Some(schedule)) => schedule.current_week(team),
        _ => None,
    };
    let stats = analysis.tier_stats(tier);
    let samples = stats.map_or(0, |s| s.count);

    let (base_bid, confidence, mut reason) = match stats {
        Some(stats) if stats.count >= MIN_TIER_SAMPLES => {
            let (base, reason) = tier_base(stats, tier, strategy);
            let confidence = if stats.count >= HIGH_CONFIDENCE_SAMPLES {
                Confidence::High
            } else {
                Confidence::Medium
            };
            (base, confidence, reason)
        }
        _ => {
            let league_median = analysis
                .summary
                .median
                .unwrap_or(cfg.default_bid as f64);
            (
                heuristic_base(adj_score, league_median, strategy),
                Confidence::Low,
                format!(
                    "Limited tier data ({samples} std bids). Estimate based on league median (${league_median}) x score factor"
                ),
            )
        }
    };

    let mut adjustments = Vec::new();
    let tier_bid = if tier == Tier::Elite {
        let bumped = elite_bump(base_bid, cfg.elite_bump);
        adjustments.push(format!("elite bump +${}", bumped - base_bid));
        bumped
    } else {
        base_bid
    };
    let suggested_bid = scale_bid(tier_bid, games, ctx, cfg, &mut adjustments);

    let notes = context_notes(games, ctx);
    if !notes.is_empty() {
        reason.push_str(&format!(" ({})", notes.join(", ")));
    }

    BidSuggestion {
        player: player.to_string(),
        adj_score,
        tier,
        strategy,
        base_bid,
        tier_bid,
        suggested_bid,
        confidence,
        samples,
        games_this_week: games.map(|(g, _)| g),
        premium_range: analysis.premium_summary.clone(),
        reason,
        adjustments,
    }
}

/// Suggestions for the first `top_n` ranked candidates.
pub fn suggest_bids(
    ranked: &[PlayerValuation],
    analysis: &BidAnalysis,
    strategy: BidStrategy,
    ctx: &BidContext<'_>,
    cfg: &FaabConfig,
    top_n: usize,
) -> Vec<BidSuggestion> {
    ranked
        .iter()
        .take(top_n)
        .map(|p| {
            suggest_bid(
                &p.name,
                p.adj_score,
                Some(&p.team),
                analysis,
                strategy,
                ctx,
                cfg,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
