// One scoring run over a loaded snapshot: effective config, candidate
// ranking, roster context, league checks and FAAB suggestions.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use waiverwire_core::category::Category;
use waiverwire_core::config::{Config, ConfigError};
use waiverwire_core::faab::history::BidAnalysis;
use waiverwire_core::faab::suggest::{suggest_bids, BidContext, BidSuggestion};
use waiverwire_core::faab::{
    analyze_bid_history, compute_budget_status, compute_tier_thresholds, BidStrategy, BudgetStatus,
};
use waiverwire_core::league::{
    check_il_compliance, check_transaction_limit, IlViolation, TransactionLimitStatus,
};
use waiverwire_core::names::{normalize_name, NameIndex};
use waiverwire_core::valuation::impact::{roster_impact, RosterImpact};
use waiverwire_core::valuation::needs::{identify_droppable_players, RosterStrength};
use waiverwire_core::valuation::scoring::{
    build_roster_profile, roster_zscores, score_candidates, PlayerValuation,
};
use waiverwire_core::valuation::zscore::normalize_pool;

use crate::snapshot::Snapshot;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Date used for budget pacing when the league reports no week.
    pub today: NaiveDate,
    pub strategy: Option<BidStrategy>,
    pub top_n: Option<usize>,
}

/// The best candidate swapped for the first drop candidate.
#[derive(Debug, Clone)]
pub struct DropPreview {
    pub add: String,
    pub drop: String,
    pub impact: RosterImpact,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ranked: Vec<PlayerValuation>,
    pub pool_size: usize,
    pub roster_strength: Option<RosterStrength>,
    pub weakest: Vec<Category>,
    pub droppable: Vec<String>,
    pub preview: Option<DropPreview>,
    pub budget: Option<BudgetStatus>,
    pub transactions: Option<TransactionLimitStatus>,
    pub il_violations: Vec<IlViolation>,
    pub analysis: BidAnalysis,
    pub strategy: BidStrategy,
    pub bids: Vec<BidSuggestion>,
}

/// Merge the snapshot's detected league settings over the file config.
pub fn effective_config(base: &Config, snapshot: &Snapshot) -> Result<Config, ConfigError> {
    match &snapshot.league_state {
        Some(state) => {
            let merged = base.with_overrides(&state.overrides)?;
            debug!("applied league overrides: {:?}", state.overrides);
            Ok(merged)
        }
        None => Ok(base.clone()),
    }
}

pub fn run(config: &Config, snapshot: &Snapshot, opts: &RunOptions) -> RunOutput {
    let punts = &config.league.punts;
    let top_n = opts.top_n.unwrap_or(config.scoring.pool.top_n);
    let strategy = opts.strategy.unwrap_or(config.scoring.faab.strategy);

    // --- Pool and roster context ---
    let pool = normalize_pool(&snapshot.stats, &config.scoring.pool);
    if pool.is_empty() {
        warn!("no players pass the pool filters");
    }

    let roster_names = snapshot.roster_names();
    let roster_z = roster_zscores(&roster_names, &snapshot.stats, &pool);
    let profile = build_roster_profile(&roster_z, config);
    let roster_strength = profile.as_ref().map(|p| p.strength());
    if let Some(s) = &roster_strength {
        info!("roster strength: {} (avg z {:.2})", s.label, s.avg_z);
    }

    let ranked = score_candidates(&pool, &snapshot.inputs, profile.as_ref(), config, top_n);

    // --- Drop candidates and add/drop preview ---
    let totals: Vec<(String, f64)> = roster_z
        .iter()
        .map(|(name, z)| (name.clone(), z.total(punts)))
        .collect();
    let droppable = identify_droppable_players(&totals, &config.league.roster);

    let preview = ranked.first().and_then(|add| {
        droppable.iter().find_map(|drop| {
            let key = normalize_name(drop);
            roster_z
                .iter()
                .find(|(name, _)| normalize_name(name) == key)
                .map(|(name, z)| DropPreview {
                    add: add.name.clone(),
                    drop: name.clone(),
                    impact: roster_impact(&add.zscores, z, punts),
                })
        })
    });

    // --- League checks ---
    let state = snapshot.league_state.as_ref();
    let budget = state.and_then(|s| s.remaining_budget).map(|remaining| {
        compute_budget_status(
            remaining,
            state.and_then(|s| s.current_week),
            &config.league,
            config.scoring.faab.max_bid_percent,
            opts.today,
        )
    });
    let transactions = state
        .and_then(|s| s.transactions_used)
        .map(|used| check_transaction_limit(used, config.league.weekly_transaction_limit));
    let il_violations = check_il_compliance(&snapshot.roster, &config.league.il);
    for v in &il_violations {
        warn!("IL violation: {} in {} with status {}", v.player, v.slot, v.status);
    }

    // --- FAAB ---
    let scores: Vec<f64> = ranked.iter().map(|v| v.adj_score).collect();
    let thresholds = compute_tier_thresholds(&scores, &config.scoring.faab.tiers);
    let analysis = match &snapshot.bids {
        Some(records) => {
            let lookup: NameIndex<f64> = ranked.iter().map(|v| (v.name.as_str(), v.adj_score)).collect();
            analyze_bid_history(
                records,
                Some(&lookup),
                thresholds,
                config.league.my_team.as_deref(),
                &config.scoring.faab,
            )
        }
        None => BidAnalysis::empty(thresholds),
    };
    info!(
        "bid history: {} paid bids, {} premium",
        analysis.summary.faab_bids, analysis.summary.premium_count
    );

    let ctx = BidContext {
        budget: budget.as_ref(),
        schedule: snapshot.inputs.schedule.as_ref(),
        roster: roster_strength.as_ref(),
    };
    let bids = suggest_bids(
        &ranked,
        &analysis,
        strategy,
        &ctx,
        &config.scoring.faab,
        ranked.len(),
    );

    RunOutput {
        ranked,
        pool_size: pool.len(),
        weakest: profile.map(|p| p.weakest).unwrap_or_default(),
        roster_strength,
        droppable,
        preview,
        budget,
        transactions,
        il_violations,
        analysis,
        strategy,
        bids,
    }
}
