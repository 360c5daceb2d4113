// Snapshot loading: one directory of already-fetched league data.
//
// `stats.csv` is required. Every other file is optional and disables the
// signal that depends on it when absent:
//
//   owned.json         ["Player", ...] rostered anywhere in the league
//   roster.json        [{"player", "slot", "status"}] the user's roster
//   injuries.json      [{"player", "status", "context", "suspension_games"}]
//   schedule.json      {"weeks": [{"games": {"BOS": 4}, "average": 3.5}],
//                       "remaining": {"BOS": 30}}
//   activity.json      {"as_of": "2026-01-15", "last_played": {"Player": "2026-01-14"}}
//   trending.json      [{"player", "percent_owned", "delta"}]
//   game_logs.json     {"Player": [{"date", "started", "minutes", "fgm", ...}]}
//   news.json          {"Player": "latest blurb"}
//   bids.csv           player,amount,team,date,drop_player,score,tier
//   league_state.json  {"current_week", "remaining_budget",
//                       "transactions_used", "overrides": {...}}

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use waiverwire_core::config::ConfigOverrides;
use waiverwire_core::faab::{BidRecord, Tier};
use waiverwire_core::league::RosterSlot;
use waiverwire_core::names::NameIndex;
use waiverwire_core::valuation::injury::{InjuryRecord, InjuryReport, InjuryStatus};
use waiverwire_core::valuation::momentum::{GameLog, GameStatLine, OwnershipTrend};
use waiverwire_core::valuation::schedule::{ScheduleOutlook, WeekSchedule};
use waiverwire_core::valuation::scoring::{ActivityData, ScoringInputs};
use waiverwire_core::valuation::zscore::{PlayerStatRecord, StatLine};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// League-wide state at snapshot time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeagueState {
    pub current_week: Option<u32>,
    pub remaining_budget: Option<u32>,
    pub transactions_used: Option<u32>,
    /// Settings detected from the league, merged over the config files.
    pub overrides: ConfigOverrides,
}

/// Everything loaded from a snapshot directory.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub stats: Vec<PlayerStatRecord>,
    pub roster: Vec<RosterSlot>,
    pub inputs: ScoringInputs,
    pub bids: Option<Vec<BidRecord>>,
    pub league_state: Option<LeagueState>,
}

impl Snapshot {
    pub fn roster_names(&self) -> Vec<String> {
        self.roster.iter().map(|r| r.player.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Raw serde structs (private)
// ---------------------------------------------------------------------------

/// Season stat row. Percentages are fractions (0.475), not 47.5. Extra
/// columns are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawStatRow {
    #[serde(alias = "Name", alias = "PLAYER_NAME")]
    Player: String,
    #[serde(default, alias = "TEAM_ABBREVIATION")]
    Team: String,
    #[serde(default)]
    GP: Option<f64>,
    MIN: f64,
    #[serde(default)]
    TEAM_GP: Option<f64>,
    #[serde(alias = "FG%")]
    FG_PCT: f64,
    FGA: f64,
    #[serde(alias = "FT%")]
    FT_PCT: f64,
    FTA: f64,
    #[serde(alias = "3PM")]
    FG3M: f64,
    PTS: f64,
    REB: f64,
    AST: f64,
    STL: f64,
    BLK: f64,
    #[serde(alias = "TO")]
    TOV: f64,
}

#[derive(Debug, Deserialize)]
struct RawBid {
    player: String,
    amount: f64,
    #[serde(default)]
    team: String,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    drop_player: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    tier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRosterEntry {
    player: String,
    #[serde(default)]
    slot: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct RawInjury {
    player: String,
    status: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    suspension_games: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawWeek {
    games: HashMap<String, u32>,
    #[serde(default)]
    average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSchedule {
    #[serde(default)]
    weeks: Vec<RawWeek>,
    #[serde(default)]
    remaining: HashMap<String, u32>,
}

#[derive(Debug, Deserialize)]
struct RawActivity {
    as_of: NaiveDate,
    last_played: HashMap<String, NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RawTrend {
    player: String,
    #[serde(default)]
    percent_owned: f64,
    delta: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGame {
    date: Option<NaiveDate>,
    started: bool,
    minutes: f64,
    fgm: f64,
    fga: f64,
    ftm: f64,
    fta: f64,
    fg3m: f64,
    pts: f64,
    reb: f64,
    ast: f64,
    stl: f64,
    blk: f64,
    tov: f64,
}

// ---------------------------------------------------------------------------
// Reader-based loaders (enable testing without temp files)
// ---------------------------------------------------------------------------

fn stats_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerStatRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawStatRow>() {
        match result {
            Ok(raw) => {
                let name = raw.Player.trim().to_string();
                let line = StatLine {
                    fg_pct: raw.FG_PCT,
                    fga: raw.FGA,
                    ft_pct: raw.FT_PCT,
                    fta: raw.FTA,
                    fg3m: raw.FG3M,
                    pts: raw.PTS,
                    reb: raw.REB,
                    ast: raw.AST,
                    stl: raw.STL,
                    blk: raw.BLK,
                    tov: raw.TOV,
                };
                if !line.is_finite() || !raw.MIN.is_finite() {
                    warn!("skipping stat row for '{}': non-finite value", name);
                    continue;
                }
                rows.push(PlayerStatRecord {
                    name,
                    team: raw.Team.trim().to_uppercase(),
                    games_played: raw.GP.map(|g| g.max(0.0).round() as u32),
                    minutes: raw.MIN,
                    team_games_played: raw.TEAM_GP.map(|g| g.max(0.0).round() as u32),
                    line,
                });
            }
            Err(e) => warn!("skipping malformed stat row: {}", e),
        }
    }
    Ok(rows)
}

fn bids_from_reader<R: Read>(rdr: R) -> Result<Vec<BidRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut bids = Vec::new();
    for result in reader.deserialize::<RawBid>() {
        match result {
            Ok(raw) => {
                if !raw.amount.is_finite() || raw.amount < 0.0 {
                    warn!("skipping bid for '{}': invalid amount {}", raw.player.trim(), raw.amount);
                    continue;
                }
                let tier = raw.tier.as_deref().and_then(|t| {
                    let parsed = Tier::parse(t);
                    if parsed.is_none() && !t.trim().is_empty() {
                        debug!("unknown tier '{}' on bid for '{}'", t, raw.player.trim());
                    }
                    parsed
                });
                bids.push(BidRecord {
                    player: raw.player.trim().to_string(),
                    amount: raw.amount.round() as u32,
                    team: raw.team.trim().to_string(),
                    date: raw.date,
                    drop_player: raw.drop_player.filter(|d| !d.trim().is_empty()),
                    score: raw.score.filter(|s| s.is_finite()),
                    tier,
                });
            }
            Err(e) => warn!("skipping malformed bid row: {}", e),
        }
    }
    Ok(bids)
}

fn injuries_from_raw(raw: Vec<RawInjury>) -> InjuryReport {
    let mut report = InjuryReport::default();
    for entry in raw {
        match InjuryStatus::parse(&entry.status) {
            Some(status) => report.insert(InjuryRecord {
                player: entry.player.trim().to_string(),
                status,
                context: entry.context,
                suspension_games: entry.suspension_games,
            }),
            None => warn!(
                "skipping injury entry for '{}': unknown status '{}'",
                entry.player.trim(),
                entry.status
            ),
        }
    }
    report
}

fn schedule_from_raw(raw: RawSchedule) -> ScheduleOutlook {
    let weeks = raw
        .weeks
        .into_iter()
        .map(|w| {
            let week = WeekSchedule::from_games(w.games);
            match w.average {
                Some(avg) => week.with_average(avg),
                None => week,
            }
        })
        .collect();
    ScheduleOutlook::new(weeks).with_remaining(raw.remaining)
}

fn game_from_raw(g: RawGame) -> GameLog {
    GameLog {
        date: g.date,
        started: g.started,
        minutes: g.minutes,
        stats: GameStatLine {
            fgm: g.fgm,
            fga: g.fga,
            ftm: g.ftm,
            fta: g.fta,
            fg3m: g.fg3m,
            pts: g.pts,
            reb: g.reb,
            ast: g.ast,
            stl: g.stl,
            blk: g.blk,
            tov: g.tov,
        },
    }
}

/// Game logs keyed by player, each sorted oldest first.
fn game_logs_from_raw(raw: HashMap<String, Vec<RawGame>>) -> NameIndex<Vec<GameLog>> {
    raw.into_iter()
        .map(|(name, games)| {
            let mut logs: Vec<GameLog> = games.into_iter().map(game_from_raw).collect();
            logs.sort_by_key(|g| g.date);
            (name, logs)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, SnapshotError> {
    std::fs::File::open(path).map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let file = open(path)?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| SnapshotError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse an optional JSON file; a missing file is `None`.
fn optional_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Option<T>, SnapshotError> {
    let path = dir.join(name);
    if !path.exists() {
        debug!("{} not found, signal disabled", name);
        return Ok(None);
    }
    read_json(&path).map(Some)
}

pub fn load_stats(path: &Path) -> Result<Vec<PlayerStatRecord>, SnapshotError> {
    stats_from_reader(open(path)?).map_err(|e| SnapshotError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn load_bids(path: &Path) -> Result<Vec<BidRecord>, SnapshotError> {
    bids_from_reader(open(path)?).map_err(|e| SnapshotError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load a snapshot directory.
pub fn load_snapshot(dir: &Path) -> Result<Snapshot, SnapshotError> {
    let stats_path: PathBuf = dir.join("stats.csv");
    let stats = load_stats(&stats_path)?;
    if stats.is_empty() {
        return Err(SnapshotError::Validation(format!(
            "{} produced zero valid rows",
            stats_path.display()
        )));
    }
    info!("loaded {} stat rows from {}", stats.len(), stats_path.display());

    let roster: Vec<RosterSlot> = optional_json::<Vec<RawRosterEntry>>(dir, "roster.json")?
        .unwrap_or_default()
        .into_iter()
        .map(|r| RosterSlot {
            player: r.player.trim().to_string(),
            slot: r.slot,
            status: r.status,
        })
        .collect();

    let owned = optional_json::<Vec<String>>(dir, "owned.json")?
        .map(|names| names.iter().map(|n| (n.as_str(), ())).collect::<NameIndex<()>>());

    let injuries = optional_json::<Vec<RawInjury>>(dir, "injuries.json")?
        .map(injuries_from_raw)
        .unwrap_or_default();

    let schedule = optional_json::<RawSchedule>(dir, "schedule.json")?.map(schedule_from_raw);

    let activity = optional_json::<RawActivity>(dir, "activity.json")?.map(|a| ActivityData {
        as_of: a.as_of,
        last_played: a.last_played.into_iter().collect(),
    });

    let trending = optional_json::<Vec<RawTrend>>(dir, "trending.json")?.map(|rows| {
        rows.into_iter()
            .map(|t| {
                (
                    t.player,
                    OwnershipTrend {
                        percent_owned: t.percent_owned,
                        delta: t.delta,
                    },
                )
            })
            .collect::<NameIndex<OwnershipTrend>>()
    });

    let game_logs =
        optional_json::<HashMap<String, Vec<RawGame>>>(dir, "game_logs.json")?.map(game_logs_from_raw);

    let news = optional_json::<HashMap<String, String>>(dir, "news.json")?
        .map(|m| m.into_iter().collect::<NameIndex<String>>());

    let bids_path = dir.join("bids.csv");
    let bids = if bids_path.exists() {
        Some(load_bids(&bids_path)?)
    } else {
        None
    };

    let league_state = optional_json::<LeagueState>(dir, "league_state.json")?;

    let inputs = ScoringInputs {
        owned,
        roster: roster.iter().map(|r| r.player.clone()).collect(),
        injuries,
        schedule,
        activity,
        trending,
        game_logs,
        news,
    };
    debug!(
        "snapshot: {} roster, {} injuries, {} bids",
        roster.len(),
        inputs.injuries.len(),
        bids.as_ref().map_or(0, Vec::len)
    );

    Ok(Snapshot {
        stats,
        roster,
        inputs,
        bids,
        league_state,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_csv_with_aliases() {
        let csv = "\
Name,Team,GP,MIN,FG%,FGA,FT%,FTA,3PM,PTS,REB,AST,STL,BLK,TO,AGE
 Nikola Jokic ,den,70,34.6,0.583,18.0,0.817,6.0,1.1,26.4,12.4,9.0,1.4,0.9,3.0,29
";
        let rows = stats_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.name, "Nikola Jokic");
        assert_eq!(r.team, "DEN");
        assert_eq!(r.games_played, Some(70));
        assert_eq!(r.team_games_played, None);
        assert_eq!(r.line.tov, 3.0);
        assert_eq!(r.line.fg3m, 1.1);
    }

    #[test]
    fn malformed_stat_rows_skipped() {
        let csv = "\
Player,Team,GP,MIN,FG_PCT,FGA,FT_PCT,FTA,FG3M,PTS,REB,AST,STL,BLK,TOV
Good Player,BOS,40,30,0.47,12,0.8,4,2,18,5,4,1,0.5,2
Bad Player,BOS,40,thirty,0.47,12,0.8,4,2,18,5,4,1,0.5,2
NaN Player,BOS,40,30,NaN,12,0.8,4,2,18,5,4,1,0.5,2
";
        let rows = stats_from_reader(csv.as_bytes()).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Good Player"]);
    }

    #[test]
    fn bids_csv_optional_columns() {
        let csv = "\
player,amount,team,date,drop_player,score,tier
Wing Guy,12,Rivals,2026-01-05,Old Guard,3.4,
Big Man,0,Me,,,,Streamer
Broken,-3,Rivals,,,,
";
        let bids = bids_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(bids.len(), 2);
        assert_eq!(bids[0].amount, 12);
        assert_eq!(bids[0].date, NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(bids[0].drop_player.as_deref(), Some("Old Guard"));
        assert_eq!(bids[0].tier, None);
        assert_eq!(bids[1].amount, 0);
        assert_eq!(bids[1].tier, Some(Tier::Streamer));
        assert_eq!(bids[1].score, None);
    }

    #[test]
    fn unknown_injury_status_skipped() {
        let raw: Vec<RawInjury> = serde_json::from_str(
            r#"[
                {"player": "Hurt Guy", "status": "O", "context": "Out with a sprain"},
                {"player": "Weird Guy", "status": "MYSTERY"},
                {"player": "Banned Guy", "status": "SUSP", "suspension_games": 10}
            ]"#,
        )
        .unwrap();
        let report = injuries_from_raw(raw);
        assert_eq!(report.len(), 2);
        assert_eq!(report.context_for("Hurt Guy").as_deref(), Some("Out with a sprain"));
    }

    #[test]
    fn schedule_json_average_override() {
        let raw: RawSchedule = serde_json::from_str(
            r#"{"weeks": [{"games": {"bos": 4, "LAL": 2}}, {"games": {"BOS": 3}, "average": 3.5}],
                "remaining": {"BOS": 30}}"#,
        )
        .unwrap();
        let outlook = schedule_from_raw(raw);
        assert_eq!(outlook.current_week("BOS"), Some((4, 3.0)));
        assert_eq!(outlook.weeks[1].average, 3.5);
        assert_eq!(outlook.remaining_games("bos"), Some(30));
        assert_eq!(outlook.remaining_games("LAL"), None);
    }

    #[test]
    fn game_logs_sorted_oldest_first() {
        let raw: HashMap<String, Vec<RawGame>> = serde_json::from_str(
            r#"{"Hot Hand": [
                {"date": "2026-01-12", "pts": 30, "started": true},
                {"date": "2026-01-10", "pts": 10}
            ]}"#,
        )
        .unwrap();
        let logs = game_logs_from_raw(raw);
        let games = logs.get("Hot Hand").unwrap();
        assert_eq!(games[0].stats.pts, 10.0);
        assert!(games[1].started);
    }

    #[test]
    fn league_state_defaults() {
        let state: LeagueState = serde_json::from_str(
            r#"{"current_week": 12, "overrides": {"weekly_transaction_limit": 4}}"#,
        )
        .unwrap();
        assert_eq!(state.current_week, Some(12));
        assert_eq!(state.remaining_budget, None);
        assert_eq!(state.overrides.weekly_transaction_limit, Some(4));
    }
}
