// Roster category profile, need boost, roster strength and drop candidates.

use std::collections::HashSet;

use crate::category::{Category, CategoryZScores, PuntSet};
use crate::config::{NeedsConfig, RosterRules};
use crate::names::normalize_name;

// ---------------------------------------------------------------------------
// RosterProfile
// ---------------------------------------------------------------------------

/// Average z-scores of the players on a roster and its weakest categories.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterProfile {
    pub averages: CategoryZScores,
    /// Weakest non-punted categories, weakest first.
    pub weakest: Vec<Category>,
    pub punts: PuntSet,
    pub size: usize,
}

impl RosterProfile {
    /// Build a profile from the roster's z-score vectors. Returns `None` for
    /// an empty roster.
    ///
    /// Punted categories never appear in `weakest`. Equal averages keep the
    /// canonical category order.
    pub fn build<'z>(
        players: impl IntoIterator<Item = &'z CategoryZScores>,
        punts: &PuntSet,
        cfg: &NeedsConfig,
    ) -> Option<RosterProfile> {
        let mut sums = [0.0_f64; 9];
        let mut size = 0usize;
        for z in players {
            for (cat, v) in z.iter() {
                sums[cat.index()] += v;
            }
            size += 1;
        }
        if size == 0 {
            return None;
        }

        let mut averages = CategoryZScores::zero();
        for cat in Category::ALL {
            averages.set(cat, sums[cat.index()] / size as f64);
        }

        let mut active: Vec<Category> = punts.active().collect();
        active.sort_by(|a, b| averages.get(*a).total_cmp(&averages.get(*b)));
        active.truncate(cfg.count);

        Some(RosterProfile {
            averages,
            weakest: active,
            punts: punts.clone(),
            size,
        })
    }

    /// `weight * sum(candidate z in each weakest category)`.
    pub fn need_boost(&self, candidate: &CategoryZScores, cfg: &NeedsConfig) -> f64 {
        cfg.weight * self.weakest.iter().map(|c| candidate.get(*c)).sum::<f64>()
    }

    pub fn strength(&self) -> RosterStrength {
        RosterStrength::from_profile(self)
    }
}

/// Need boost with an optional roster; no roster means no boost.
pub fn need_boost(
    profile: Option<&RosterProfile>,
    candidate: &CategoryZScores,
    cfg: &NeedsConfig,
) -> f64 {
    profile.map_or(0.0, |p| p.need_boost(candidate, cfg))
}

// ---------------------------------------------------------------------------
// RosterStrength
// ---------------------------------------------------------------------------

const STRONG_CATEGORY: f64 = 0.3;
const WEAK_CATEGORY: f64 = -0.3;

/// Overall roster quality over the non-punted categories.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterStrength {
    pub avg_z: f64,
    pub strong: Vec<Category>,
    pub weak: Vec<Category>,
    pub label: &'static str,
    /// FAAB multiplier: stronger rosters bid less, weaker rosters more.
    pub bid_factor: f64,
}

impl RosterStrength {
    pub fn from_profile(profile: &RosterProfile) -> RosterStrength {
        let active: Vec<Category> = profile.punts.active().collect();
        if active.is_empty() {
            return RosterStrength::unknown();
        }
        let avg_z = active
            .iter()
            .map(|c| profile.averages.get(*c))
            .sum::<f64>()
            / active.len() as f64;

        let strong = active
            .iter()
            .copied()
            .filter(|c| profile.averages.get(*c) >= STRONG_CATEGORY)
            .collect();
        let weak = active
            .iter()
            .copied()
            .filter(|c| profile.averages.get(*c) <= WEAK_CATEGORY)
            .collect();

        let label = if avg_z >= 0.4 {
            "Strong roster"
        } else if avg_z >= 0.1 {
            "Solid roster"
        } else if avg_z >= -0.2 {
            "Average roster"
        } else if avg_z >= -0.5 {
            "Below average"
        } else {
            "Weak roster"
        };

        RosterStrength {
            avg_z,
            strong,
            weak,
            label,
            bid_factor: (1.0 - 0.15 * avg_z).clamp(0.7, 1.3),
        }
    }

    /// Neutral strength used when there is no roster.
    pub fn unknown() -> RosterStrength {
        RosterStrength {
            avg_z: 0.0,
            strong: Vec::new(),
            weak: Vec::new(),
            label: "Unknown",
            bid_factor: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Drop candidates
// ---------------------------------------------------------------------------

/// Lowest-value roster players plus the configured droppable list.
///
/// `roster` is (name, Z_Total). The bottom `auto_droppable_count` by Z_Total
/// come first (worst first), then the configured names. Undroppable players
/// never appear and names are deduplicated after normalisation.
pub fn identify_droppable_players(roster: &[(String, f64)], rules: &RosterRules) -> Vec<String> {
    let undroppable: HashSet<String> = rules.undroppable.iter().map(|n| normalize_name(n)).collect();

    let mut eligible: Vec<&(String, f64)> = roster
        .iter()
        .filter(|(name, _)| !undroppable.contains(&normalize_name(name)))
        .collect();
    eligible.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let auto = eligible
        .into_iter()
        .take(rules.auto_droppable_count)
        .map(|(name, _)| name.as_str());

    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for name in auto.chain(rules.droppable.iter().map(String::as_str)) {
        let key = normalize_name(name);
        if undroppable.contains(&key) || !seen.insert(key) {
            continue;
        }
        merged.push(name.to_string());
    }
    merged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn zs(values: [f64; 9]) -> CategoryZScores {
        let mut z = CategoryZScores::zero();
        for (cat, v) in Category::ALL.iter().zip(values) {
            z.set(*cat, v);
        }
        z
    }

    #[test]
    fn averages_and_weakest_categories() {
        // FG%, FT%, 3PM, PTS, REB, AST, STL, BLK, TO
        let roster = [
            zs([0.5, -1.0, 0.2, 0.0, 1.0, -0.4, 0.1, -0.8, 0.3]),
            zs([0.3, -0.6, 0.0, 0.4, 0.6, -0.2, 0.1, -0.2, 0.1]),
        ];
        let cfg = NeedsConfig::default();
        let profile = RosterProfile::build(roster.iter(), &PuntSet::none(), &cfg).unwrap();
        assert_eq!(profile.size, 2);
        assert!(approx_eq(profile.averages.get(Category::FtPct), -0.8, 1e-12));
        assert_eq!(
            profile.weakest,
            vec![Category::FtPct, Category::Blk, Category::Ast]
        );
    }

    #[test]
    fn punted_categories_never_drive_needs() {
        let roster = [zs([0.5, -1.0, 0.2, 0.0, 1.0, -0.4, 0.1, -0.8, 0.3])];
        let punts = PuntSet::from_categories([Category::FtPct]);
        let profile = RosterProfile::build(roster.iter(), &punts, &NeedsConfig::default()).unwrap();
        assert!(!profile.weakest.contains(&Category::FtPct));
        assert_eq!(
            profile.weakest,
            vec![Category::Blk, Category::Ast, Category::Pts]
        );
    }

    #[test]
    fn need_boost_sums_weak_categories() {
        let roster = [zs([0.5, -1.0, 0.2, 0.0, 1.0, -0.4, 0.1, -0.8, 0.3])];
        let cfg = NeedsConfig::default();
        let profile = RosterProfile::build(roster.iter(), &PuntSet::none(), &cfg).unwrap();
        let candidate = zs([0.0, 1.0, 0.0, 0.0, 0.0, 0.5, 0.0, 2.0, 0.0]);
        // weakest: FT%, BLK, AST -> 0.5 * (1.0 + 2.0 + 0.5)
        assert!(approx_eq(profile.need_boost(&candidate, &cfg), 1.75, 1e-12));
        assert_eq!(need_boost(None, &candidate, &cfg), 0.0);
    }

    #[test]
    fn empty_roster_has_no_profile() {
        let empty: Vec<CategoryZScores> = Vec::new();
        assert!(RosterProfile::build(empty.iter(), &PuntSet::none(), &NeedsConfig::default()).is_none());
    }

    #[test]
    fn strength_labels_and_bid_factor() {
        let cfg = NeedsConfig::default();
        let strong = [zs([0.6; 9])];
        let p = RosterProfile::build(strong.iter(), &PuntSet::none(), &cfg).unwrap();
        let s = p.strength();
        assert_eq!(s.label, "Strong roster");
        assert!(approx_eq(s.bid_factor, 0.91, 1e-12));
        assert_eq!(s.strong.len(), 9);

        let weak = [zs([-3.0; 9])];
        let p = RosterProfile::build(weak.iter(), &PuntSet::none(), &cfg).unwrap();
        let s = p.strength();
        assert_eq!(s.label, "Weak roster");
        assert!(approx_eq(s.bid_factor, 1.3, 1e-12));
        assert_eq!(s.weak.len(), 9);

        let avg = [zs([0.0; 9])];
        let p = RosterProfile::build(avg.iter(), &PuntSet::none(), &cfg).unwrap();
        assert_eq!(p.strength().label, "Average roster");
        assert_eq!(RosterStrength::unknown().bid_factor, 1.0);
    }

    #[test]
    fn droppable_merges_auto_and_configured() {
        let roster = vec![
            ("Star Player".to_string(), 8.0),
            ("Bench Guy".to_string(), -1.5),
            ("Deep Reserve".to_string(), -3.0),
            ("Role Player".to_string(), 0.5),
            ("Protected Vet".to_string(), -4.0),
        ];
        let rules = RosterRules {
            undroppable: vec!["Protected Vet".into()],
            droppable: vec!["Bench Guy".into(), "Injured Wing".into(), "protected vet".into()],
            auto_droppable_count: 2,
        };
        let names = identify_droppable_players(&roster, &rules);
        assert_eq!(names, vec!["Deep Reserve", "Bench Guy", "Injured Wing"]);
    }

    #[test]
    fn droppable_without_auto_detection() {
        let rules = RosterRules {
            undroppable: Vec::new(),
            droppable: vec!["Someone".into()],
            auto_droppable_count: 0,
        };
        let roster = vec![("Bench Guy".to_string(), -1.5)];
        assert_eq!(identify_droppable_players(&roster, &rules), vec!["Someone"]);
    }
}
