// Value tiers: percentile cutoffs over the live candidate pool, floored at
// absolute minimums, with fixed fallback bands for small pools.

use crate::config::TierConfig;
use crate::faab::Tier;

/// Minimum scores for Elite, Strong, Solid and Streamer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub cutoffs: [f64; 4],
    /// True when the cutoffs came from the candidate pool rather than the
    /// fixed fallback bands.
    pub from_pool: bool,
}

impl TierThresholds {
    pub fn fallback(cfg: &TierConfig) -> TierThresholds {
        TierThresholds {
            cutoffs: cfg.fallback,
            from_pool: false,
        }
    }

    /// First tier whose threshold the score reaches; Dart otherwise.
    pub fn tier_for(&self, score: f64) -> Tier {
        Tier::ALL
            .into_iter()
            .zip(self.cutoffs)
            .find(|(_, cut)| score >= *cut)
            .map_or(Tier::Dart, |(tier, _)| tier)
    }

    /// Minimum score for a tier. Dart has none.
    pub fn threshold(&self, tier: Tier) -> Option<f64> {
        match tier {
            Tier::Elite => Some(self.cutoffs[0]),
            Tier::Strong => Some(self.cutoffs[1]),
            Tier::Solid => Some(self.cutoffs[2]),
            Tier::Streamer => Some(self.cutoffs[3]),
            Tier::Dart => None,
        }
    }
}

/// Linear-interpolated percentile (0..=100) of an ascending slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Tier thresholds for the current candidate pool.
///
/// Pools smaller than `min_pool_size` (or empty) use the fallback bands.
/// Otherwise each cutoff is the pool percentile rounded to cents, raised to
/// its floor when the percentile falls below it.
pub fn compute_tier_thresholds(scores: &[f64], cfg: &TierConfig) -> TierThresholds {
    let mut sorted: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
    if sorted.is_empty() || sorted.len() < cfg.min_pool_size {
        return TierThresholds::fallback(cfg);
    }
    sorted.sort_by(f64::total_cmp);

    let mut cutoffs = [0.0; 4];
    for (i, cut) in cutoffs.iter_mut().enumerate() {
        let raw = percentile(&sorted, cfg.percentiles[i]).unwrap_or(cfg.fallback[i]);
        *cut = round2(raw).max(cfg.floors[i]);
    }
    TierThresholds {
        cutoffs,
        from_pool: true,
    }
}

/// Convenience wrapper over `TierThresholds::tier_for`.
pub fn score_to_tier(score: f64, thresholds: &TierThresholds) -> Tier {
    thresholds.tier_for(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn percentile_interpolates() {
        let s = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&s, 50.0), Some(3.0));
        assert!(approx_eq(percentile(&s, 90.0).unwrap(), 4.6, 1e-12));
        assert_eq!(percentile(&s, 0.0), Some(1.0));
        assert_eq!(percentile(&s, 100.0), Some(5.0));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn elite_cutoff_clamped_to_floor() {
        // 20 players, p90 = 3.2
        let mut scores = vec![0.5; 17];
        scores.extend([3.2, 3.2, 3.2]);
        let cfg = TierConfig::default();
        let t = compute_tier_thresholds(&scores, &cfg);
        assert!(t.from_pool);
        assert_eq!(t.cutoffs[0], 4.0);
        assert_eq!(t.tier_for(3.5), Tier::Strong);
        assert_eq!(t.tier_for(4.0), Tier::Elite);
    }

    #[test]
    fn percentile_cutoffs_above_floors() {
        let scores: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let t = compute_tier_thresholds(&scores, &TierConfig::default());
        // p90 = 9, p70 = 7, p40 = 4, p15 = 1.5
        assert_eq!(t.cutoffs, [9.0, 7.0, 4.0, 1.5]);
        assert_eq!(t.tier_for(8.9), Tier::Strong);
        assert_eq!(t.tier_for(1.4), Tier::Dart);
    }

    #[test]
    fn small_pool_uses_fallback() {
        let cfg = TierConfig::default();
        let t = compute_tier_thresholds(&[9.0, 8.0, 1.0], &cfg);
        assert!(!t.from_pool);
        assert_eq!(t.cutoffs, [6.0, 4.0, 2.5, 1.0]);
        assert_eq!(score_to_tier(5.99, &t), Tier::Strong);
        assert_eq!(score_to_tier(6.0, &t), Tier::Elite);
        assert_eq!(score_to_tier(0.99, &t), Tier::Dart);
        assert_eq!(compute_tier_thresholds(&[], &cfg), t);
    }

    #[test]
    fn thresholds_never_below_floor() {
        let scores = vec![-1.0; 30];
        let cfg = TierConfig::default();
        let t = compute_tier_thresholds(&scores, &cfg);
        for (cut, floor) in t.cutoffs.iter().zip(cfg.floors) {
            assert!(*cut >= floor);
        }
        assert_eq!(t.threshold(Tier::Dart), None);
        assert_eq!(t.threshold(Tier::Solid), Some(1.5));
    }
}
