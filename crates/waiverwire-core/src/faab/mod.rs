// FAAB bid analysis: value tiers, league bid history, budget pacing and
// per-player bid suggestions.

pub mod budget;
pub mod history;
pub mod suggest;
pub mod tiers;

pub use budget::{compute_budget_status, BudgetLabel, BudgetStatus};
pub use history::{analyze_bid_history, classify_bids, BidAnalysis, BidRecord};
pub use suggest::{elite_bump, suggest_bid, suggest_bids, BidContext, BidSuggestion, Confidence};
pub use tiers::{compute_tier_thresholds, score_to_tier, TierThresholds};

// ---------------------------------------------------------------------------
// BidStrategy
// ---------------------------------------------------------------------------

/// How aggressively to bid relative to what the league has paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidStrategy {
    /// Lower quartile of historical prices.
    Value,
    /// Median price.
    Competitive,
    /// Upper quartile.
    Aggressive,
}

impl BidStrategy {
    pub fn parse(s: &str) -> Option<BidStrategy> {
        match s.trim().to_lowercase().as_str() {
            "value" => Some(BidStrategy::Value),
            "competitive" => Some(BidStrategy::Competitive),
            "aggressive" => Some(BidStrategy::Aggressive),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BidStrategy::Value => "value",
            BidStrategy::Competitive => "competitive",
            BidStrategy::Aggressive => "aggressive",
        }
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Value tier of a waiver candidate, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Elite,
    Strong,
    Solid,
    Streamer,
    Dart,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Elite,
        Tier::Strong,
        Tier::Solid,
        Tier::Streamer,
        Tier::Dart,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Elite => "Elite",
            Tier::Strong => "Strong",
            Tier::Solid => "Solid",
            Tier::Streamer => "Streamer",
            Tier::Dart => "Dart",
        }
    }

    pub fn parse(s: &str) -> Option<Tier> {
        let s = s.trim();
        Tier::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
