// Role and performance signals from news blurbs and recent box scores.

use crate::config::NewsConfig;
use crate::textmatch::{KeywordHit, RuleSpec};
use crate::valuation::momentum::GameLog;

/// Default news keyword table: (label, multiplier, pattern, unless).
pub const NEWS_KEYWORDS: &[RuleSpec] = &[
    // ---- Role: positive ----
    ("Starting", 1.15, "start|starting|started|starts ... lineup|role|five|center|forward|guard", Some("lost|losing|lose|from|of")),
    ("Starting", 1.15, "moved|moving ... start|starting", None),
    ("Starting", 1.15, "insert|inserted ... start|starting", None),
    ("Starting", 1.15, "earned|earning ... start|starting", None),
    ("Starting", 1.15, "promoted|promotion ... start|role|lineup", None),
    ("Starting", 1.15, "step|stepping into ... start|starting", None),
    ("Starting", 1.15, "entering|entered ... start|starting", None),
    ("Starting", 1.12, "run away with ... start|starting", None),
    ("Will Start", 1.12, "will start", None),
    ("Exp. Starter", 1.10, "expected to start", None),
    ("Proj. Starter", 1.10, "projected to? start", None),
    ("Starting Nod", 1.10, "starting the? nod", None),
    ("Starting Nod", 1.10, "will get the? nod", None),
    ("In Starting Lineup", 1.12, "in the starting lineup", None),
    ("Expanded Role", 1.10, "expanded|expanding ... role", None),
    ("Expanded Role", 1.10, "big|bigger opportunity|role", None),
    ("Featured Role", 1.10, "featured|featuring role", None),
    ("Green Light", 1.08, "green light", None),
    ("Next Man Up", 1.12, "next man up", None),
    // ---- Performance ----
    ("Career High", 1.12, "career high", None),
    ("Season High", 1.10, "season high", None),
    ("Best Game", 1.10, "best game", None),
    ("Breakout", 1.10, "breakout|breakthrough", None),
    ("Big Scoring", 1.08, "30+ point|points|pts", None),
    ("Triple-Double", 1.08, "triple double", None),
    ("Double-Double", 1.05, "double double", None),
    // ---- Health: positive ----
    ("Returning", 1.10, "return|returned|returning|returns to? action|practice|lineup|play|court", None),
    ("Expected Return", 1.08, "expect|expected|expects to? return", None),
    ("Near Return", 1.08, "nearing a? return", None),
    ("Near Return", 1.08, "trending ... return", None),
    ("Eligible Return", 1.08, "eligible to? return", None),
    ("Cleared", 1.12, "cleared ... play|return|action|practice|contact", None),
    ("Full Practice", 1.08, "full participant|practice|contact", None),
    ("No Restrictions", 1.10, "no|without|lifted minute|minutes? restriction|restrictions", None),
    ("Ramping Up", 1.06, "ramp|ramping up", None),
    ("Debut", 1.08, "debut", None),
    // ---- Minutes ----
    ("More Minutes", 1.10, "increased|increasing ... minutes", None),
    ("More Minutes", 1.08, "more minutes", None),
    ("More Minutes", 1.08, "uptick ... minutes", None),
    ("More Minutes", 1.08, "uptick ... playing time", None),
    // ---- Buzz ----
    ("Waiver Buzz", 1.10, "must add|roster", None),
    ("Waiver Buzz", 1.10, "waiver wire", None),
    ("Pickup Buzz", 1.08, "pick up", None),
    ("Pickup Buzz", 1.08, "pickup", None),
    ("Pickup Buzz", 1.08, "scoop up", None),
    ("Pickup Buzz", 1.08, "add him", None),
    // ---- Role: negative ----
    ("Benched", 0.85, "back|moved|sent|demoted ... bench", None),
    ("Lost Starting Role", 0.85, "lost|losing|lose ... start|starting", None),
    ("Bench Role", 0.88, "coming off the? bench", None),
    ("Reduced Role", 0.88, "reduced ... role|minutes", None),
    ("Load Mgmt", 0.90, "load management", None),
    ("Resting", 0.92, "rest|resting|rested ... game|tonight|tomorrow", None),
    ("Mins Restriction", 0.90, "minute|minutes restriction|limit", Some("no|without|lifted")),
    // ---- Health: negative ----
    ("Re-Evaluation", 0.82, "reevaluat*", None),
    ("Re-Evaluation", 0.82, "re evaluat*", None),
    ("Week-to-Week", 0.78, "week to week", None),
    ("No Timeline", 0.72, "no timetable", None),
    ("Indefinite", 0.65, "indefinitely", None),
    ("Second Opinion", 0.80, "second opinion", None),
    ("Re-Injury", 0.75, "reaggravat*", None),
    ("Re-Injury", 0.75, "re aggravat*", None),
    ("Season-Ending", 0.0, "season ending", None),
    ("Shut Down", 0.0, "shut down", None),
    ("DNP", 0.80, "dnp", None),
    ("DNP", 0.80, "did not play", None),
    ("Sitting Tomorrow", 0.80, "sit out? tomorrow|monday|tuesday|wednesday|thursday|friday|saturday|sunday", None),
    ("Ruled Out", 0.75, "ruled out", None),
    ("Out Tomorrow", 0.78, "will not|miss ... tomorrow", None),
    ("Out Tomorrow", 0.78, "will not|miss ... next game", None),
    // ---- Transactions ----
    ("Traded", 0.92, "traded|trade ... to|from", None),
    ("Trade Deadline", 0.95, "trade deadline", None),
    ("G-League", 0.70, "g league", None),
    ("G-League", 0.70, "gleague", None),
    ("G-League", 0.70, "two way", None),
    ("G-League", 0.70, "sent down", None),
    ("Suspended", 0.60, "arrest|arrested|charged|suspended|suspension", None),
];

// ---------------------------------------------------------------------------
// Box-score standouts
// ---------------------------------------------------------------------------

/// (stat label, [(threshold, multiplier)] highest first).
const STANDOUT_TIERS: &[(&str, &[(f64, f64)])] = &[
    ("PTS", &[(30.0, 1.08), (22.0, 1.05), (15.0, 1.03)]),
    ("REB", &[(12.0, 1.06), (8.0, 1.04)]),
    ("AST", &[(10.0, 1.06), (6.0, 1.04)]),
    ("STL", &[(4.0, 1.06), (3.0, 1.04)]),
    ("BLK", &[(4.0, 1.06), (3.0, 1.04)]),
    ("3PM", &[(6.0, 1.06), (4.0, 1.04)]),
];

const RECENT_STARTER: (&str, f64) = ("Recent Starter", 1.08);

fn standout_value(game: &GameLog, stat: &str) -> f64 {
    let s = &game.stats;
    match stat {
        "PTS" => s.pts,
        "REB" => s.reb,
        "AST" => s.ast,
        "STL" => s.stl,
        "BLK" => s.blk,
        "3PM" => s.fg3m,
        _ => 0.0,
    }
}

/// Standout lines across the recent games: for each stat, the best game's
/// highest tier reached (e.g. "32 PTS").
pub fn standout_hits(games: &[GameLog]) -> Vec<KeywordHit> {
    let mut hits = Vec::new();
    for (stat, tiers) in STANDOUT_TIERS {
        let best = games
            .iter()
            .map(|g| standout_value(g, stat))
            .fold(0.0_f64, f64::max);
        if let Some((_, mult)) = tiers.iter().find(|(threshold, _)| best >= *threshold) {
            hits.push(KeywordHit {
                label: format!("{best:.0} {stat}"),
                multiplier: *mult,
            });
        }
    }
    if games.last().is_some_and(|g| g.started) {
        hits.push(KeywordHit {
            label: RECENT_STARTER.0.to_string(),
            multiplier: RECENT_STARTER.1,
        });
    }
    hits
}

// ---------------------------------------------------------------------------
// Combined signal
// ---------------------------------------------------------------------------

/// News multiplier and the signals behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsSignal {
    pub multiplier: f64,
    pub keyword_hits: Vec<KeywordHit>,
    pub box_score_hits: Vec<KeywordHit>,
}

impl NewsSignal {
    pub fn neutral() -> Self {
        NewsSignal {
            multiplier: 1.0,
            keyword_hits: Vec::new(),
            box_score_hits: Vec::new(),
        }
    }

    /// Short display form: labels of everything that fired.
    pub fn summary(&self) -> String {
        self.keyword_hits
            .iter()
            .chain(&self.box_score_hits)
            .map(|h| h.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Product of the multipliers of all hits (1.0 with no hits).
pub fn combine_multiplicative(hits: &[KeywordHit]) -> f64 {
    hits.iter().map(|h| h.multiplier).product()
}

/// Scan news text and recent games.
///
/// Keyword multipliers combine multiplicatively. Box-score signals take
/// the larger of their own best multiplier and the keyword product. The
/// result is clamped at zero.
pub fn news_signal(text: &str, recent_games: &[GameLog], cfg: &NewsConfig) -> NewsSignal {
    if !cfg.enabled {
        return NewsSignal::neutral();
    }

    let keyword_hits = cfg.keywords.scan(text);
    let mut multiplier = combine_multiplicative(&keyword_hits);

    let box_score_hits = if cfg.box_scores {
        standout_hits(recent_games)
    } else {
        Vec::new()
    };
    if let Some(best) = box_score_hits.iter().map(|h| h.multiplier).reduce(f64::max) {
        multiplier = multiplier.max(best);
    }

    NewsSignal {
        multiplier: multiplier.max(0.0),
        keyword_hits,
        box_score_hits,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::momentum::GameStatLine;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn game(pts: f64, reb: f64, started: bool) -> GameLog {
        GameLog {
            date: None,
            started,
            minutes: 30.0,
            stats: GameStatLine {
                pts,
                reb,
                ..GameStatLine::default()
            },
        }
    }

    fn labels(signal: &NewsSignal) -> Vec<&str> {
        signal.keyword_hits.iter().map(|h| h.label.as_str()).collect()
    }

    #[test]
    fn starting_role_is_detected() {
        let cfg = NewsConfig::default();
        let s = news_signal("Smith will be in the starting lineup Friday.", &[], &cfg);
        assert!(labels(&s).contains(&"In Starting Lineup"));
        assert!(s.multiplier > 1.0);
    }

    #[test]
    fn each_label_counts_once() {
        let cfg = NewsConfig::default();
        let s = news_signal(
            "He was moved to the starting five and started at center.",
            &[],
            &cfg,
        );
        let starting = s.keyword_hits.iter().filter(|h| h.label == "Starting").count();
        assert_eq!(starting, 1);
    }

    #[test]
    fn multipliers_combine_multiplicatively() {
        let cfg = NewsConfig::default();
        let s = news_signal("Career high night; he's a must add.", &[], &cfg);
        assert_eq!(labels(&s), vec!["Career High", "Waiver Buzz"]);
        assert!(approx_eq(s.multiplier, 1.12 * 1.10, 1e-12));
    }

    #[test]
    fn restriction_veto() {
        let cfg = NewsConfig::default();
        let lifted = news_signal("He will play with no minutes restriction.", &[], &cfg);
        assert!(labels(&lifted).contains(&"No Restrictions"));
        assert!(!labels(&lifted).contains(&"Mins Restriction"));

        let limited = news_signal("He remains on a minutes restriction.", &[], &cfg);
        assert_eq!(labels(&limited), vec!["Mins Restriction"]);
        assert!(approx_eq(limited.multiplier, 0.90, 1e-12));
    }

    #[test]
    fn negative_signals_reduce() {
        let cfg = NewsConfig::default();
        let s = news_signal("Coach said he'll be coming off the bench.", &[], &cfg);
        assert!(approx_eq(s.multiplier, 0.88, 1e-12));
        let s = news_signal("Suffered a season-ending injury.", &[], &cfg);
        assert_eq!(s.multiplier, 0.0);
    }

    #[test]
    fn standouts_take_highest_tier_per_stat() {
        let hits = standout_hits(&[game(18.0, 9.0, false), game(32.0, 4.0, true)]);
        let pts = hits.iter().find(|h| h.label.ends_with("PTS")).unwrap();
        assert_eq!(pts.label, "32 PTS");
        assert!(approx_eq(pts.multiplier, 1.08, 1e-12));
        let reb = hits.iter().find(|h| h.label.ends_with("REB")).unwrap();
        assert!(approx_eq(reb.multiplier, 1.04, 1e-12));
        assert!(hits.iter().any(|h| h.label == "Recent Starter"));
    }

    #[test]
    fn box_scores_merge_by_max() {
        let cfg = NewsConfig::default();
        // Keyword product 0.88, standout 1.05 -> 1.05
        let s = news_signal("Coming off the bench.", &[game(24.0, 2.0, false)], &cfg);
        assert!(approx_eq(s.multiplier, 1.05, 1e-12));
        // Keyword product 1.12 * 1.10 beats a 1.03 standout
        let s = news_signal("Career high and a must add", &[game(16.0, 0.0, false)], &cfg);
        assert!(approx_eq(s.multiplier, 1.12 * 1.10, 1e-12));
    }

    #[test]
    fn disabled_or_empty_is_neutral() {
        let cfg = NewsConfig {
            enabled: false,
            ..NewsConfig::default()
        };
        assert_eq!(news_signal("career high", &[], &cfg), NewsSignal::neutral());

        let cfg = NewsConfig::default();
        let s = news_signal("", &[], &cfg);
        assert_eq!(s.multiplier, 1.0);
        assert!(s.summary().is_empty());
    }
}
