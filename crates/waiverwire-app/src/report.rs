// Plain-text rendering of a scoring run.

use waiverwire_core::config::Config;
use waiverwire_core::faab::suggest::BidSuggestion;
use waiverwire_core::faab::Tier;
use waiverwire_core::valuation::scoring::PlayerValuation;

use crate::run::RunOutput;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Render the full report: rankings, roster context, league checks and
/// FAAB suggestions. Sections with no data are omitted.
pub fn render_report(out: &RunOutput, config: &Config) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("{} waiver report", config.league.name));
    if !config.league.punts.is_empty() {
        let punted: Vec<&str> = config.league.punts.iter().map(|c| c.label()).collect();
        lines.push(format!("Punting: {}", punted.join(", ")));
    }
    lines.push(format!(
        "Pool: {} qualifying players, {} candidates shown",
        out.pool_size,
        out.ranked.len()
    ));
    lines.push(String::new());

    lines.extend(rankings_section(&out.ranked));
    lines.extend(roster_section(out));
    lines.extend(league_section(out));
    lines.extend(faab_section(out));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

fn player_notes(p: &PlayerValuation) -> String {
    let mut notes: Vec<String> = Vec::new();
    if !p.injury.label.is_empty() {
        notes.push(p.injury.label.clone());
    }
    if p.is_hot() {
        notes.push("HOT".to_string());
    }
    if p.is_trending {
        notes.push("TRENDING".to_string());
    }
    if p.boosts_suppressed {
        notes.push("boosts off".to_string());
    }
    let news = p.news.summary();
    if !news.is_empty() {
        notes.push(news);
    }
    notes.join("; ")
}

fn rankings_section(ranked: &[PlayerValuation]) -> Vec<String> {
    let mut lines = vec!["TOP AVAILABLE".to_string(), RULE.to_string()];
    if ranked.is_empty() {
        lines.push("No available players.".to_string());
        lines.push(String::new());
        return lines;
    }
    lines.push(format!(
        "{:>3}  {:<24} {:<4} {:>6} {:>6} {:>5} {:>5} {:>6} {:>5} {:>5} {:>5}  {}",
        "#", "Player", "Team", "Adj", "Z_Tot", "Need", "Avail", "Injury", "Sched", "News", "Boost", "Notes"
    ));
    for (i, p) in ranked.iter().enumerate() {
        lines.push(format!(
            "{:>3}  {:<24} {:<4} {:>6.2} {:>6.2} {:>5.2} {:>5.2} {:>6.2} {:>5.2} {:>5.2} {:>5.2}  {}",
            i + 1,
            truncate(&p.name, 24),
            p.team,
            p.adj_score,
            p.z_total,
            p.need_boost,
            p.availability.multiplier,
            p.injury.multiplier,
            p.schedule_multiplier,
            p.news.multiplier,
            p.recency_boost + p.trending_boost,
            player_notes(p),
        ));
    }
    lines.push(String::new());
    lines
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max - 1).chain(std::iter::once('.')).collect()
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

fn roster_section(out: &RunOutput) -> Vec<String> {
    let Some(strength) = &out.roster_strength else {
        return Vec::new();
    };
    let mut lines = vec!["ROSTER".to_string(), RULE.to_string()];
    lines.push(format!(
        "Strength: {} (avg z {:+.2}, bid factor x{:.2})",
        strength.label, strength.avg_z, strength.bid_factor
    ));
    if !out.weakest.is_empty() {
        let needs: Vec<&str> = out.weakest.iter().map(|c| c.label()).collect();
        lines.push(format!("Needs: {}", needs.join(", ")));
    }
    if !out.droppable.is_empty() {
        lines.push(format!("Drop candidates: {}", out.droppable.join(", ")));
    }
    if let Some(preview) = &out.preview {
        lines.push(format!(
            "Swap preview: add {} / drop {} (net {:+.2})",
            preview.add, preview.drop, preview.impact.net
        ));
        let deltas: Vec<String> = preview
            .impact
            .deltas
            .iter()
            .map(|(c, d)| format!("{} {:+.2}", c.label(), d))
            .collect();
        lines.push(format!("  {}", deltas.join("  ")));
    }
    lines.push(String::new());
    lines
}

// ---------------------------------------------------------------------------
// League checks
// ---------------------------------------------------------------------------

fn league_section(out: &RunOutput) -> Vec<String> {
    if out.budget.is_none() && out.transactions.is_none() && out.il_violations.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["LEAGUE".to_string(), RULE.to_string()];
    if let Some(b) = &out.budget {
        lines.push(format!(
            "Budget: ${} of ${} left, {} weeks{} -> ${:.1}/week (ideal ${:.1}), {} x{:.2}, max bid ${}",
            b.remaining,
            b.total_budget,
            b.weeks_remaining,
            if b.is_playoffs { " (playoffs)" } else { "" },
            b.weekly_budget,
            b.ideal_weekly,
            b.label.label(),
            b.budget_factor,
            b.max_single_bid,
        ));
    }
    if let Some(t) = &out.transactions {
        lines.push(format!("Transactions: {}", t.message));
    }
    for v in &out.il_violations {
        lines.push(format!(
            "IL violation: {} in {} is {} (allowed: {})",
            v.player,
            v.slot,
            v.status,
            v.eligible.join(", ")
        ));
    }
    if !out.il_violations.is_empty() {
        lines.push("Add/drop moves are blocked until IL slots are fixed.".to_string());
    }
    lines.push(String::new());
    lines
}

// ---------------------------------------------------------------------------
// FAAB
// ---------------------------------------------------------------------------

fn faab_section(out: &RunOutput) -> Vec<String> {
    if out.bids.is_empty() {
        return Vec::new();
    }
    let analysis = &out.analysis;
    let mut lines = vec![
        format!("FAAB SUGGESTIONS ({})", out.strategy.label()),
        RULE.to_string(),
    ];

    let thresholds: Vec<String> = Tier::ALL
        .iter()
        .filter_map(|t| analysis.thresholds.threshold(*t).map(|v| format!("{} >= {:.2}", t, v)))
        .collect();
    lines.push(format!(
        "Tiers{}: {}",
        if analysis.thresholds.from_pool { "" } else { " (defaults)" },
        thresholds.join(", ")
    ));

    let s = &analysis.summary;
    if analysis.has_history() {
        let fmt_opt = |v: Option<f64>| v.map_or("-".to_string(), |v| format!("${:.1}", v));
        lines.push(format!(
            "History: {} paid bids ({} standard, {} premium), median {}, mean {}",
            s.faab_bids,
            s.standard_count,
            s.premium_count,
            fmt_opt(s.median),
            fmt_opt(s.mean),
        ));
        if let Some(threshold) = s.outlier_threshold {
            lines.push(format!("Premium threshold: ${:.1}", threshold));
        }
        for (tier, stats) in &analysis.by_tier {
            lines.push(format!(
                "  {:<9} n={:<3} median ${:.1} range ${}-${}",
                tier.to_string(),
                stats.count,
                stats.median,
                stats.min,
                stats.max
            ));
        }
    } else {
        lines.push("History: none, using heuristic bids".to_string());
    }

    lines.push(format!(
        "{:<24} {:<9} {:>6} {:>5} {:<6}  {}",
        "Player", "Tier", "Adj", "Bid", "Conf", "Reason"
    ));
    for b in &out.bids {
        lines.push(bid_line(b));
        if !b.adjustments.is_empty() {
            lines.push(format!("{:<24} {}", "", b.adjustments.join(", ")));
        }
    }
    lines.push(String::new());
    lines
}

fn bid_line(b: &BidSuggestion) -> String {
    let mut reason = b.reason.clone();
    if let Some(p) = &b.premium_range {
        reason.push_str(&format!(" [premium ${}-${}]", p.min, p.max));
    }
    format!(
        "{:<24} {:<9} {:>6.2} {:>5} {:<6}  {}",
        truncate(&b.player, 24),
        b.tier.to_string(),
        b.adj_score,
        format!("${}", b.suggested_bid),
        b.confidence.label(),
        reason
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("Short", 24), "Short");
        assert_eq!(truncate("Abcdefghij", 5), "Abcd.");
    }
}
