// Injury-report severity multipliers.
//
// Status tag first, then the free-text blurb nudges Out / Day-To-Day
// players toward a longer or shorter absence. Suspensions scale with the
// share of the remaining schedule the player will miss.

use crate::config::InjuryConfig;
use crate::names::NameIndex;
use crate::textmatch::RuleSpec;

/// Blurb phrases that mean an Out player will miss a long stretch.
pub const EXTENDED_ABSENCE_PHRASES: &[RuleSpec] = &[
    ("Season-Ending", 0.05, "rest|remainder of the season", None),
    ("Season-Ending", 0.05, "season ending", None),
    ("Torn Ligament", 0.05, "torn acl|achilles|meniscus", None),
    ("Surgery", 0.05, "surgery", Some("avoid|avoided|avoids|no|without")),
    ("No Timetable", 0.05, "no timetable|timeline", None),
    ("Indefinite", 0.05, "indefinitely", None),
];

/// Blurb phrases that mean an absent or limited player is close to playing.
pub const RETURN_SOON_PHRASES: &[RuleSpec] = &[
    ("After Break", 0.40, "return after the all star break", None),
    ("After Break", 0.40, "return|returning ... after the? break", None),
    ("Return To Action", 0.40, "return|returned|returning to action", None),
    ("Progressing", 0.40, "progressed|progressing to", None),
    ("Court Work", 0.40, "on court workouts", None),
    ("Scrimmaging", 0.40, "scrimmage|scrimmages|scrimmaging", None),
    ("Expected Back", 0.40, "expected to return", None),
    ("Near Return", 0.40, "nearing a? return", None),
    ("Day-To-Day", 0.40, "day to day", None),
    ("Game-Time Decision", 0.40, "game time decision", None),
];

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjuryStatus {
    Healthy,
    DayToDay,
    Out,
    OutForSeason,
    Suspended,
}

impl InjuryStatus {
    /// Parse a provider status string. Returns `None` for unrecognized tags.
    pub fn parse(s: &str) -> Option<InjuryStatus> {
        let key: String = s
            .trim()
            .to_uppercase()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();
        match key.as_str() {
            "" | "HEALTHY" | "ACTIVE" => Some(InjuryStatus::Healthy),
            "DTD" | "GTD" | "DAY TO DAY" | "QUESTIONABLE" | "PROBABLE" | "DOUBTFUL" => {
                Some(InjuryStatus::DayToDay)
            }
            "O" | "OUT" | "INJ" | "INJURED" => Some(InjuryStatus::Out),
            "OFS" | "OUT FOR SEASON" | "SEASON" => Some(InjuryStatus::OutForSeason),
            "SUSP" | "SUSPENDED" | "SUSPENSION" => Some(InjuryStatus::Suspended),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InjuryStatus::Healthy => "Healthy",
            InjuryStatus::DayToDay => "Day-To-Day",
            InjuryStatus::Out => "Out",
            InjuryStatus::OutForSeason => "Out For Season",
            InjuryStatus::Suspended => "Suspended",
        }
    }
}

/// One injury-report entry.
#[derive(Debug, Clone, PartialEq)]
pub struct InjuryRecord {
    pub player: String,
    pub status: InjuryStatus,
    /// Free-text blurb from the report.
    pub context: String,
    pub suspension_games: Option<u32>,
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Which way the context blurb moved the base multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjuryContext {
    Base,
    Extended,
    ReturningSoon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InjuryAssessment {
    pub status: InjuryStatus,
    pub context: InjuryContext,
    pub multiplier: f64,
    /// Label of the blurb phrase that adjusted the multiplier, if any.
    pub matched: Option<String>,
    pub label: String,
}

impl InjuryAssessment {
    pub fn healthy() -> Self {
        InjuryAssessment {
            status: InjuryStatus::Healthy,
            context: InjuryContext::Base,
            multiplier: 1.0,
            matched: None,
            label: String::new(),
        }
    }

    /// Removed from output entirely.
    pub fn is_excluded(&self) -> bool {
        self.multiplier <= 0.0
    }

    /// Still listed, but momentum boosts are zeroed.
    pub fn is_near_elimination(&self, cfg: &InjuryConfig) -> bool {
        self.multiplier > 0.0 && self.multiplier <= cfg.near_elimination
    }
}

/// Suspension multiplier from the share of remaining games the player
/// will be available for.
pub fn suspension_multiplier_by_fraction(suspension_games: u32, remaining_games: u32) -> f64 {
    let remaining = remaining_games as f64;
    let avail = (remaining - suspension_games as f64).max(0.0) / remaining;
    if avail <= 0.0 {
        0.0
    } else if avail <= 0.15 {
        0.03
    } else if avail <= 0.35 {
        0.10
    } else if avail <= 0.60 {
        0.30
    } else if avail <= 0.85 {
        0.60
    } else {
        0.85
    }
}

/// Suspension multiplier from raw game count, used when the remaining
/// schedule is unknown.
pub fn suspension_multiplier_static(suspension_games: u32) -> f64 {
    match suspension_games {
        g if g >= 10 => 0.0,
        g if g >= 5 => 0.03,
        g if g >= 2 => 0.15,
        1 => 0.85,
        _ => 1.0,
    }
}

/// Resolve a multiplier for one injury record.
///
/// `remaining_games` is the player's team's remaining schedule, when known.
pub fn assess_injury(
    record: &InjuryRecord,
    remaining_games: Option<u32>,
    cfg: &InjuryConfig,
) -> InjuryAssessment {
    let mut out = InjuryAssessment {
        status: record.status,
        ..InjuryAssessment::healthy()
    };

    match record.status {
        InjuryStatus::Healthy => {}
        InjuryStatus::OutForSeason => {
            out.multiplier = 0.0;
            out.label = "Out For Season".into();
        }
        InjuryStatus::Suspended => {
            out.multiplier = match (record.suspension_games, remaining_games) {
                (None, _) => cfg.unknown_suspension,
                (Some(games), Some(rem)) if rem > 0 => {
                    suspension_multiplier_by_fraction(games, rem)
                }
                (Some(games), _) => suspension_multiplier_static(games),
            };
            out.label = match record.suspension_games {
                Some(g) => format!("Suspended ({g} games)"),
                None => "Suspended".into(),
            };
        }
        InjuryStatus::Out => {
            out.multiplier = cfg.out;
            out.label = "Out".into();
            if let Some(hit) = cfg.extended_phrases.scan(&record.context).into_iter().next() {
                out.multiplier = cfg.out_extended;
                out.context = InjuryContext::Extended;
                out.matched = Some(hit.label);
                out.label = "Out (extended)".into();
            } else if let Some(hit) = cfg.return_phrases.scan(&record.context).into_iter().next() {
                out.multiplier = cfg.out_returning;
                out.context = InjuryContext::ReturningSoon;
                out.matched = Some(hit.label);
                out.label = "Out (returning soon)".into();
            }
        }
        InjuryStatus::DayToDay => {
            out.multiplier = cfg.day_to_day;
            out.label = "Day-To-Day".into();
            if let Some(hit) = cfg.return_phrases.scan(&record.context).into_iter().next() {
                out.multiplier = cfg.day_to_day_returning;
                out.context = InjuryContext::ReturningSoon;
                out.matched = Some(hit.label);
                out.label = "Day-To-Day (returning soon)".into();
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Injury report keyed by normalised player name.
#[derive(Debug, Clone, Default)]
pub struct InjuryReport {
    entries: NameIndex<Vec<InjuryRecord>>,
}

impl InjuryReport {
    pub fn new(records: Vec<InjuryRecord>) -> Self {
        let mut report = InjuryReport::default();
        for record in records {
            report.insert(record);
        }
        report
    }

    pub fn insert(&mut self, record: InjuryRecord) {
        let name = record.player.clone();
        match self.entries.get_exact_mut(&name) {
            Some(list) => list.push(record),
            None => {
                self.entries.insert(&name, vec![record]);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All report blurbs for a player joined into one string.
    pub fn context_for(&self, player: &str) -> Option<String> {
        let records = self.entries.get(player)?;
        let text = records
            .iter()
            .map(|r| r.context.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!text.is_empty()).then_some(text)
    }

    /// Assess a player. Duplicate report entries resolve to the most severe
    /// (lowest) multiplier; a player absent from the report is healthy.
    pub fn assess(
        &self,
        player: &str,
        remaining_games: Option<u32>,
        cfg: &InjuryConfig,
    ) -> InjuryAssessment {
        let Some(records) = self.entries.get(player) else {
            return InjuryAssessment::healthy();
        };
        records
            .iter()
            .map(|r| assess_injury(r, remaining_games, cfg))
            .min_by(|a, b| a.multiplier.total_cmp(&b.multiplier))
            .unwrap_or_else(InjuryAssessment::healthy)
    }
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

    fn record(status: InjuryStatus, context: &str) -> InjuryRecord {
        InjuryRecord {
            player: "Test Player".into(),
            status,
            context: context.into(),
            suspension_games: None,
        }
    }

    fn suspended(games: Option<u32>) -> InjuryRecord {
        InjuryRecord {
            suspension_games: games,
            ..record(InjuryStatus::Suspended, "")
        }
    }

    #[test]
    fn parses_provider_status_tags() {
        assert_eq!(InjuryStatus::parse("GTD"), Some(InjuryStatus::DayToDay));
        assert_eq!(InjuryStatus::parse("day-to-day"), Some(InjuryStatus::DayToDay));
        assert_eq!(InjuryStatus::parse("O"), Some(InjuryStatus::Out));
        assert_eq!(InjuryStatus::parse("INJ"), Some(InjuryStatus::Out));
        assert_eq!(InjuryStatus::parse("Out For Season"), Some(InjuryStatus::OutForSeason));
        assert_eq!(InjuryStatus::parse("SUSP"), Some(InjuryStatus::Suspended));
        assert_eq!(InjuryStatus::parse(""), Some(InjuryStatus::Healthy));
        assert_eq!(InjuryStatus::parse("NA"), None);
    }

    #[test]
    fn out_for_season_is_excluded() {
        let cfg = InjuryConfig::default();
        let a = assess_injury(&record(InjuryStatus::OutForSeason, ""), None, &cfg);
        assert_eq!(a.multiplier, 0.0);
        assert!(a.is_excluded());
        assert!(!a.is_near_elimination(&cfg));
    }

    #[test]
    fn out_base_and_context_adjustments() {
        let cfg = InjuryConfig::default();

        let base = assess_injury(&record(InjuryStatus::Out, "Sprained ankle."), None, &cfg);
        assert!(approx_eq(base.multiplier, 0.10, 1e-12));
        assert_eq!(base.context, InjuryContext::Base);

        let ext = assess_injury(
            &record(InjuryStatus::Out, "Underwent surgery on his knee, no timetable for a return."),
            None,
            &cfg,
        );
        assert!(approx_eq(ext.multiplier, 0.05, 1e-12));
        assert_eq!(ext.label, "Out (extended)");
        assert!(ext.is_near_elimination(&cfg));

        let ret = assess_injury(
            &record(InjuryStatus::Out, "He is expected to return after the All-Star break."),
            None,
            &cfg,
        );
        assert!(approx_eq(ret.multiplier, 0.40, 1e-12));
        assert_eq!(ret.context, InjuryContext::ReturningSoon);
        assert_eq!(ret.label, "Out (returning soon)");
    }

    #[test]
    fn avoided_surgery_is_not_extended() {
        let cfg = InjuryConfig::default();
        let a = assess_injury(
            &record(InjuryStatus::Out, "Imaging showed he will avoid surgery."),
            None,
            &cfg,
        );
        assert!(approx_eq(a.multiplier, 0.10, 1e-12));
    }

    #[test]
    fn day_to_day_return_phrasing() {
        let cfg = InjuryConfig::default();
        let base = assess_injury(&record(InjuryStatus::DayToDay, "Back soreness."), None, &cfg);
        assert!(approx_eq(base.multiplier, 0.90, 1e-12));
        let gtd = assess_injury(
            &record(InjuryStatus::DayToDay, "Listed as a game-time decision Friday."),
            None,
            &cfg,
        );
        assert!(approx_eq(gtd.multiplier, 0.95, 1e-12));
    }

    #[test]
    fn malformed_text_falls_back_to_base() {
        let cfg = InjuryConfig::default();
        for text in ["", "!!!???", "\u{1F3C0}\u{1F3C0}", "   "] {
            let a = assess_injury(&record(InjuryStatus::Out, text), None, &cfg);
            assert!(approx_eq(a.multiplier, cfg.out, 1e-12));
        }
    }

    #[test]
    fn suspension_longer_than_schedule_is_excluded() {
        let cfg = InjuryConfig::default();
        let a = assess_injury(&suspended(Some(25)), Some(20), &cfg);
        assert_eq!(a.multiplier, 0.0);
        assert!(a.is_excluded());
    }

    #[test]
    fn suspension_scales_with_available_fraction() {
        let cfg = InjuryConfig::default();
        // (80 - 25) / 80 = 0.6875 -> 0.60 bucket
        let a = assess_injury(&suspended(Some(25)), Some(80), &cfg);
        assert!(approx_eq(a.multiplier, 0.60, 1e-12));
        assert_eq!(a.label, "Suspended (25 games)");

        assert!(approx_eq(suspension_multiplier_by_fraction(18, 20), 0.03, 1e-12));
        assert!(approx_eq(suspension_multiplier_by_fraction(14, 20), 0.10, 1e-12));
        assert!(approx_eq(suspension_multiplier_by_fraction(10, 20), 0.30, 1e-12));
        assert!(approx_eq(suspension_multiplier_by_fraction(2, 20), 0.85, 1e-12));
    }

    #[test]
    fn suspension_without_schedule_uses_static_thresholds() {
        assert_eq!(suspension_multiplier_static(12), 0.0);
        assert_eq!(suspension_multiplier_static(10), 0.0);
        assert!(approx_eq(suspension_multiplier_static(5), 0.03, 1e-12));
        assert!(approx_eq(suspension_multiplier_static(3), 0.15, 1e-12));
        assert!(approx_eq(suspension_multiplier_static(1), 0.85, 1e-12));
        assert_eq!(suspension_multiplier_static(0), 1.0);

        let cfg = InjuryConfig::default();
        let a = assess_injury(&suspended(Some(3)), None, &cfg);
        assert!(approx_eq(a.multiplier, 0.15, 1e-12));
        let zero_remaining = assess_injury(&suspended(Some(3)), Some(0), &cfg);
        assert!(approx_eq(zero_remaining.multiplier, 0.15, 1e-12));
    }

    #[test]
    fn suspension_of_unknown_length() {
        let cfg = InjuryConfig::default();
        let a = assess_injury(&suspended(None), Some(40), &cfg);
        assert!(approx_eq(a.multiplier, cfg.unknown_suspension, 1e-12));
    }

    #[test]
    fn report_keeps_most_severe_duplicate() {
        let cfg = InjuryConfig::default();
        let report = InjuryReport::new(vec![
            InjuryRecord {
                player: "Ja Morant".into(),
                ..record(InjuryStatus::DayToDay, "")
            },
            InjuryRecord {
                player: "Ja Morant".into(),
                ..record(InjuryStatus::Out, "")
            },
        ]);
        assert_eq!(report.len(), 1);
        let a = report.assess("ja morant", None, &cfg);
        assert_eq!(a.status, InjuryStatus::Out);
        assert!(approx_eq(a.multiplier, 0.10, 1e-12));
    }

    #[test]
    fn report_lookup_misses_are_healthy() {
        let cfg = InjuryConfig::default();
        let report = InjuryReport::default();
        let a = report.assess("Anyone", Some(30), &cfg);
        assert_eq!(a.multiplier, 1.0);
        assert!(a.label.is_empty());
    }
}
