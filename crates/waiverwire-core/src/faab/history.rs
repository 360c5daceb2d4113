// League bid history: outlier separation, summary statistics and per-tier,
// per-team breakdowns.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::FaabConfig;
use crate::faab::tiers::TierThresholds;
use crate::faab::Tier;
use crate::names::{normalize_name, NameIndex};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One completed waiver claim from the league transaction log.
#[derive(Debug, Clone, PartialEq)]
pub struct BidRecord {
    pub player: String,
    /// Dollars paid; 0 for a free pickup.
    pub amount: u32,
    pub team: String,
    pub date: Option<NaiveDate>,
    pub drop_player: Option<String>,
    /// Valuation of the added player, when known.
    pub score: Option<f64>,
    /// Tier recorded with the claim, used when no score resolves.
    pub tier: Option<Tier>,
}

/// A bid with the tier resolved for this analysis. `None` is "Unknown".
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedBid {
    pub record: BidRecord,
    pub score: Option<f64>,
    pub tier: Option<Tier>,
}

// ---------------------------------------------------------------------------
// Outlier separation
// ---------------------------------------------------------------------------

/// Premium-bid cutoff for a set of paid amounts, or `None` when there are
/// fewer than four bids (everything is standard then).
///
/// Quartiles are taken by index: `Q1 = sorted[n/4]`, `Q3 = sorted[3n/4]`.
/// The returned value is the upper fence `Q3 + factor * IQR`, raised to the
/// premium floor when one is configured.
pub fn classify_bids(amounts: &[u32], cfg: &FaabConfig) -> Option<f64> {
    if amounts.len() < 4 {
        return None;
    }
    let mut sorted = amounts.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    let q1 = sorted[n / 4] as f64;
    let q3 = sorted[3 * n / 4] as f64;
    let fence = q3 + cfg.iqr_factor * (q3 - q1);
    Some(cfg.premium_floor.map_or(fence, |floor| fence.max(floor)))
}

fn is_premium(amount: u32, threshold: Option<f64>, cfg: &FaabConfig) -> bool {
    let Some(threshold) = threshold else {
        return false;
    };
    let amount = amount as f64;
    match cfg.premium_floor {
        // A configured floor makes the cutoff inclusive at the floor itself.
        Some(floor) if threshold <= floor => amount >= floor,
        _ => amount > threshold,
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64)
}

fn median(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    Some(if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
    })
}

/// Sample standard deviation; needs at least two values.
fn sample_stdev(values: &[u32]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (*v as f64 - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Overall league figures. Standard-bid statistics exclude premium bids;
/// the `raw_*` fields include them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidSummary {
    pub total_transactions: usize,
    pub faab_bids: usize,
    pub free_pickups: usize,
    pub standard_count: usize,
    pub premium_count: usize,
    pub outlier_threshold: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub stdev: Option<f64>,
    pub raw_mean: Option<f64>,
    pub raw_max: Option<u32>,
}

/// Distribution of standard bids within one tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierBidStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: u32,
    pub max: u32,
    /// Index quartiles, present from four bids up.
    pub p25: Option<u32>,
    pub p75: Option<u32>,
}

impl TierBidStats {
    fn from_amounts(amounts: &[u32]) -> Option<TierBidStats> {
        let mut sorted = amounts.to_vec();
        sorted.sort_unstable();
        let n = sorted.len();
        let (min, max) = (*sorted.first()?, *sorted.last()?);
        let (p25, p75) = if n >= 4 {
            (Some(sorted[n / 4]), Some(sorted[3 * n / 4]))
        } else {
            (None, None)
        };
        Some(TierBidStats {
            count: n,
            mean: round1(mean(&sorted)?),
            median: round1(median(&sorted)?),
            min,
            max,
            p25,
            p75,
        })
    }
}

/// Premium pool summary (count, mean, median, range).
#[derive(Debug, Clone, PartialEq)]
pub struct PremiumSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSpend {
    pub total_spent: u32,
    pub num_bids: usize,
    pub avg_bid: f64,
    pub max_bid: u32,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BidAnalysis {
    pub summary: BidSummary,
    pub thresholds: TierThresholds,
    pub by_tier: BTreeMap<Tier, TierBidStats>,
    /// Standard bids whose player could not be tiered.
    pub unknown_tier: Option<TierBidStats>,
    pub by_team: BTreeMap<String, TeamSpend>,
    /// Paid standard bids, highest first.
    pub standard: Vec<ClassifiedBid>,
    /// Paid premium bids, highest first.
    pub premium: Vec<ClassifiedBid>,
    pub premium_summary: Option<PremiumSummary>,
    pub your_bids: Vec<ClassifiedBid>,
}

impl BidAnalysis {
    /// Analysis of an empty history: heuristic bids everywhere.
    pub fn empty(thresholds: TierThresholds) -> BidAnalysis {
        BidAnalysis {
            summary: BidSummary::default(),
            thresholds,
            by_tier: BTreeMap::new(),
            unknown_tier: None,
            by_team: BTreeMap::new(),
            standard: Vec::new(),
            premium: Vec::new(),
            premium_summary: None,
            your_bids: Vec::new(),
        }
    }

    pub fn tier_stats(&self, tier: Tier) -> Option<&TierBidStats> {
        self.by_tier.get(&tier)
    }

    pub fn has_history(&self) -> bool {
        self.summary.faab_bids > 0
    }
}

fn classify_record(
    record: &BidRecord,
    scores: Option<&NameIndex<f64>>,
    thresholds: &TierThresholds,
) -> ClassifiedBid {
    let score = scores
        .and_then(|s| s.get(&record.player).copied())
        .or(record.score);
    let tier = score.map(|s| thresholds.tier_for(s)).or(record.tier);
    ClassifiedBid {
        record: record.clone(),
        score,
        tier,
    }
}

/// Analyze the league's completed claims.
///
/// Tiers come from the current valuation of the added player (`scores`),
/// then the record's own score, then its recorded tier. Free pickups count
/// toward the totals only. Per-tier statistics use standard bids; per-team
/// spending covers every paid bid.
pub fn analyze_bid_history(
    records: &[BidRecord],
    scores: Option<&NameIndex<f64>>,
    thresholds: TierThresholds,
    my_team: Option<&str>,
    cfg: &FaabConfig,
) -> BidAnalysis {
    if records.is_empty() {
        return BidAnalysis::empty(thresholds);
    }

    let classified: Vec<ClassifiedBid> = records
        .iter()
        .map(|r| classify_record(r, scores, &thresholds))
        .collect();

    let paid: Vec<&ClassifiedBid> = classified.iter().filter(|c| c.record.amount > 0).collect();
    let paid_amounts: Vec<u32> = paid.iter().map(|c| c.record.amount).collect();
    let threshold = classify_bids(&paid_amounts, cfg);

    let (mut premium, mut standard): (Vec<ClassifiedBid>, Vec<ClassifiedBid>) = paid
        .iter()
        .map(|c| (*c).clone())
        .partition(|c| is_premium(c.record.amount, threshold, cfg));
    standard.sort_by(|a, b| b.record.amount.cmp(&a.record.amount));
    premium.sort_by(|a, b| b.record.amount.cmp(&a.record.amount));

    let std_amounts: Vec<u32> = standard.iter().map(|c| c.record.amount).collect();
    let summary = BidSummary {
        total_transactions: records.len(),
        faab_bids: paid.len(),
        free_pickups: records.len() - paid.len(),
        standard_count: standard.len(),
        premium_count: premium.len(),
        outlier_threshold: threshold,
        mean: mean(&std_amounts).map(round1),
        median: median(&std_amounts).map(round1),
        min: std_amounts.iter().copied().min(),
        max: std_amounts.iter().copied().max(),
        stdev: sample_stdev(&std_amounts).map(round1),
        raw_mean: mean(&paid_amounts).map(round1),
        raw_max: paid_amounts.iter().copied().max(),
    };

    let mut tier_amounts: BTreeMap<Tier, Vec<u32>> = BTreeMap::new();
    let mut unknown_amounts = Vec::new();
    for bid in &standard {
        match bid.tier {
            Some(t) => tier_amounts.entry(t).or_default().push(bid.record.amount),
            None => unknown_amounts.push(bid.record.amount),
        }
    }
    let by_tier = tier_amounts
        .into_iter()
        .filter_map(|(t, amounts)| TierBidStats::from_amounts(&amounts).map(|s| (t, s)))
        .collect();

    let mut by_team: BTreeMap<String, TeamSpend> = BTreeMap::new();
    for bid in &paid {
        let spend = by_team.entry(bid.record.team.clone()).or_default();
        spend.total_spent += bid.record.amount;
        spend.num_bids += 1;
        spend.max_bid = spend.max_bid.max(bid.record.amount);
    }
    for spend in by_team.values_mut() {
        spend.avg_bid = round1(spend.total_spent as f64 / spend.num_bids.max(1) as f64);
    }

    let premium_amounts: Vec<u32> = premium.iter().map(|c| c.record.amount).collect();
    let premium_summary = TierBidStats::from_amounts(&premium_amounts).map(|s| PremiumSummary {
        count: s.count,
        mean: s.mean,
        median: s.median,
        min: s.min,
        max: s.max,
    });

    let your_bids = match my_team {
        Some(team) => {
            let key = normalize_name(team);
            classified
                .iter()
                .filter(|c| normalize_name(&c.record.team) == key)
                .cloned()
                .collect()
        }
        None => Vec::new(),
    };

    BidAnalysis {
        summary,
        thresholds,
        by_tier,
        unknown_tier: TierBidStats::from_amounts(&unknown_amounts),
        by_team,
        standard,
        premium,
        premium_summary,
        your_bids,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TierConfig;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn bid(player: &str, amount: u32, team: &str) -> BidRecord {
        BidRecord {
            player: player.to_string(),
            amount,
            team: team.to_string(),
            date: None,
            drop_player: None,
            score: None,
            tier: None,
        }
    }

    fn fallback() -> TierThresholds {
        TierThresholds::fallback(&TierConfig::default())
    }

    #[test]
    fn iqr_threshold_by_index() {
        let cfg = FaabConfig::default();
        // sorted 1,2,3,4,5,6,7,40: Q1 = s[2] = 3, Q3 = s[6] = 7, fence 13
        let amounts = [5, 1, 40, 3, 7, 2, 6, 4];
        assert_eq!(classify_bids(&amounts, &cfg), Some(13.0));
        assert_eq!(classify_bids(&[1, 50, 2], &cfg), None);
    }

    #[test]
    fn fewer_than_four_bids_are_all_standard() {
        let records = [bid("A", 1, "T1"), bid("B", 80, "T2"), bid("C", 2, "T1")];
        let a = analyze_bid_history(&records, None, fallback(), None, &FaabConfig::default());
        assert_eq!(a.summary.premium_count, 0);
        assert_eq!(a.standard.len(), 3);
        assert_eq!(a.summary.outlier_threshold, None);
    }

    #[test]
    fn premium_bids_are_separated() {
        let records = [
            bid("A", 5, "T1"),
            bid("B", 1, "T2"),
            bid("Returning Star", 40, "T3"),
            bid("C", 3, "T1"),
            bid("D", 7, "T2"),
            bid("E", 2, "T3"),
            bid("F", 6, "T1"),
            bid("G", 4, "T2"),
            bid("Free Guy", 0, "T1"),
        ];
        let a = analyze_bid_history(&records, None, fallback(), Some("t1"), &FaabConfig::default());
        assert_eq!(a.summary.total_transactions, 9);
        assert_eq!(a.summary.free_pickups, 1);
        assert_eq!(a.summary.faab_bids, 8);
        assert_eq!(a.summary.premium_count, 1);
        assert_eq!(a.premium[0].record.player, "Returning Star");
        assert_eq!(a.summary.max, Some(7));
        assert_eq!(a.summary.raw_max, Some(40));
        assert!(approx_eq(a.summary.mean.unwrap(), 4.0, 1e-12));
        assert!(approx_eq(a.summary.median.unwrap(), 4.0, 1e-12));
        assert!(approx_eq(a.summary.raw_mean.unwrap(), 8.5, 1e-12));
        let prem = a.premium_summary.as_ref().unwrap();
        assert_eq!((prem.count, prem.min, prem.max), (1, 40, 40));
        // Standard list is sorted high to low
        assert_eq!(a.standard[0].record.amount, 7);

        let t1 = &a.by_team["T1"];
        assert_eq!(t1.total_spent, 14);
        assert_eq!(t1.num_bids, 3);
        assert_eq!(t1.max_bid, 6);
        assert_eq!(a.your_bids.len(), 4);
    }

    #[test]
    fn premium_floor_keeps_low_pools_standard() {
        let cfg = FaabConfig {
            premium_floor: Some(10.0),
            ..FaabConfig::default()
        };
        // Q1 = Q3 = 1, fence 1; without the floor the 3 would be premium
        let records = [bid("A", 1, "T"), bid("B", 1, "T"), bid("C", 1, "T"), bid("D", 1, "T"), bid("E", 3, "T")];
        let a = analyze_bid_history(&records, None, fallback(), None, &cfg);
        assert_eq!(a.summary.outlier_threshold, Some(10.0));
        assert_eq!(a.summary.premium_count, 0);

        let a = analyze_bid_history(&records, None, fallback(), None, &FaabConfig::default());
        assert_eq!(a.summary.premium_count, 1);
    }

    #[test]
    fn tiers_resolved_from_current_scores() {
        let mut records: Vec<BidRecord> = (1..=4).map(|i| bid("Big Man", i, "T")).collect();
        records.push(BidRecord {
            score: Some(2.6),
            ..bid("Wing", 3, "T")
        });
        records.push(BidRecord {
            tier: Some(Tier::Dart),
            ..bid("Guard", 1, "T")
        });
        records.push(bid("Mystery", 2, "T"));
        let scores: NameIndex<f64> = [("Big Man", 6.5)].into_iter().collect();
        let a = analyze_bid_history(&records, Some(&scores), fallback(), None, &FaabConfig::default());

        let elite = a.tier_stats(Tier::Elite).unwrap();
        assert_eq!(elite.count, 4);
        assert_eq!((elite.p25, elite.p75), (Some(2), Some(4)));
        assert!(approx_eq(elite.median, 2.5, 1e-12));
        assert_eq!(a.tier_stats(Tier::Solid).unwrap().count, 1);
        assert_eq!(a.tier_stats(Tier::Dart).unwrap().count, 1);
        assert_eq!(a.unknown_tier.as_ref().unwrap().count, 1);
    }

    #[test]
    fn empty_history() {
        let a = analyze_bid_history(&[], None, fallback(), Some("Me"), &FaabConfig::default());
        assert!(!a.has_history());
        assert!(a.by_tier.is_empty());
        assert!(a.premium_summary.is_none());
    }
}
