// Configuration loading and parsing (league.toml, scoring.toml) plus the
// effective-configuration merge with auto-detected league overrides.

use crate::category::{Category, PuntSet};
use crate::faab::BidStrategy;
use crate::textmatch::{KeywordRule, KeywordTable, PatternError, RuleSpec};
use crate::valuation::injury::{EXTENDED_ABSENCE_PHRASES, RETURN_SOON_PHRASES};
use crate::valuation::news::NEWS_KEYWORDS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

/// Immutable configuration threaded into every engine call.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub league: LeagueConfig,
    pub scoring: ScoringConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    name: String,
    #[serde(default = "default_num_teams")]
    num_teams: usize,
    #[serde(default)]
    my_team: Option<String>,
    #[serde(default = "default_transaction_limit")]
    weekly_transaction_limit: u32,
    #[serde(default)]
    playoff_start_week: Option<u32>,
    #[serde(default)]
    end_week: Option<u32>,
    #[serde(default)]
    punt_categories: Vec<String>,
    #[serde(default)]
    faab: BudgetConfig,
    #[serde(default)]
    il: IlRules,
    #[serde(default)]
    roster: RosterRules,
}

fn default_num_teams() -> usize {
    12
}

fn default_transaction_limit() -> u32 {
    3
}

#[derive(Debug, Clone)]
pub struct LeagueConfig {
    pub name: String,
    pub num_teams: usize,
    /// The user's team name, used to pick out "your bids" in FAAB history.
    pub my_team: Option<String>,
    pub weekly_transaction_limit: u32,
    pub playoff_start_week: Option<u32>,
    pub end_week: Option<u32>,
    pub punts: PuntSet,
    pub budget: BudgetConfig,
    pub il: IlRules,
    pub roster: RosterRules,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        LeagueConfig {
            name: "Waiver League".into(),
            num_teams: default_num_teams(),
            my_team: None,
            weekly_transaction_limit: default_transaction_limit(),
            playoff_start_week: None,
            end_week: None,
            punts: PuntSet::none(),
            budget: BudgetConfig::default(),
            il: IlRules::default(),
            roster: RosterRules::default(),
        }
    }
}

/// FAAB budget totals. The playoff budget is a fresh allotment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub regular_season: u32,
    pub playoffs: u32,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        BudgetConfig {
            regular_season: 300,
            playoffs: 100,
        }
    }
}

/// Injury-report statuses allowed in each injured-list slot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IlRules {
    pub il_eligible: Vec<String>,
    pub il_plus_eligible: Vec<String>,
}

impl Default for IlRules {
    fn default() -> Self {
        IlRules {
            il_eligible: vec!["INJ".into(), "O".into(), "SUSP".into()],
            il_plus_eligible: vec![
                "INJ".into(),
                "O".into(),
                "GTD".into(),
                "DTD".into(),
                "SUSP".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterRules {
    /// Never suggested as drop candidates.
    pub undroppable: Vec<String>,
    /// Always listed as drop candidates.
    pub droppable: Vec<String>,
    /// How many lowest-value roster players to flag automatically.
    pub auto_droppable_count: usize,
}

impl Default for RosterRules {
    fn default() -> Self {
        RosterRules {
            undroppable: Vec::new(),
            droppable: Vec::new(),
            auto_droppable_count: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// scoring.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire scoring.toml file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ScoringFile {
    pool: PoolConfig,
    needs: NeedsConfig,
    availability: AvailabilityConfig,
    injury: InjurySection,
    schedule: ScheduleConfig,
    momentum: MomentumConfig,
    news: NewsSection,
    faab: FaabSection,
}

/// The public scoring config assembled from the scoring.toml sections.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub pool: PoolConfig,
    pub needs: NeedsConfig,
    pub availability: AvailabilityConfig,
    pub injury: InjuryConfig,
    pub schedule: ScheduleConfig,
    pub momentum: MomentumConfig,
    pub news: NewsConfig,
    pub faab: FaabConfig,
}

/// Minimum-volume filters for the reference population and output size.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub min_games: u32,
    pub min_minutes: f64,
    pub top_n: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            min_games: 5,
            min_minutes: 15.0,
            top_n: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    /// Number of weakest categories treated as priority needs.
    pub count: usize,
    pub weight: f64,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        NeedsConfig {
            count: 3,
            weight: 0.5,
        }
    }
}

/// Games-played and last-appearance thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    pub healthy_rate: f64,
    pub moderate_rate: f64,
    pub risky_rate: f64,
    pub healthy_multiplier: f64,
    pub moderate_multiplier: f64,
    pub risky_multiplier: f64,
    pub fragile_multiplier: f64,
    pub active_days: i64,
    pub questionable_days: i64,
    pub active_multiplier: f64,
    pub questionable_multiplier: f64,
    pub inactive_multiplier: f64,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        AvailabilityConfig {
            healthy_rate: 0.80,
            moderate_rate: 0.60,
            risky_rate: 0.40,
            healthy_multiplier: 1.00,
            moderate_multiplier: 0.85,
            risky_multiplier: 0.65,
            fragile_multiplier: 0.45,
            active_days: 3,
            questionable_days: 10,
            active_multiplier: 1.00,
            questionable_multiplier: 0.75,
            inactive_multiplier: 0.30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct InjurySection {
    out: f64,
    out_extended: f64,
    out_returning: f64,
    day_to_day: f64,
    day_to_day_returning: f64,
    near_elimination: f64,
    unknown_suspension: f64,
    extra_extended_phrases: Vec<String>,
    extra_return_phrases: Vec<String>,
}

impl Default for InjurySection {
    fn default() -> Self {
        let d = InjuryConfig::default();
        InjurySection {
            out: d.out,
            out_extended: d.out_extended,
            out_returning: d.out_returning,
            day_to_day: d.day_to_day,
            day_to_day_returning: d.day_to_day_returning,
            near_elimination: d.near_elimination,
            unknown_suspension: d.unknown_suspension,
            extra_extended_phrases: Vec::new(),
            extra_return_phrases: Vec::new(),
        }
    }
}

/// Injury multipliers plus the compiled context phrase tables.
#[derive(Debug, Clone)]
pub struct InjuryConfig {
    pub out: f64,
    pub out_extended: f64,
    pub out_returning: f64,
    pub day_to_day: f64,
    pub day_to_day_returning: f64,
    /// Multipliers at or below this (but above zero) suppress momentum boosts.
    pub near_elimination: f64,
    /// Suspended with no known length.
    pub unknown_suspension: f64,
    pub extended_phrases: KeywordTable,
    pub return_phrases: KeywordTable,
}

impl Default for InjuryConfig {
    fn default() -> Self {
        InjuryConfig {
            out: 0.10,
            out_extended: 0.05,
            out_returning: 0.40,
            day_to_day: 0.90,
            day_to_day_returning: 0.95,
            near_elimination: 0.05,
            unknown_suspension: 0.05,
            extended_phrases: builtin_table("extended", EXTENDED_ABSENCE_PHRASES),
            return_phrases: builtin_table("return", RETURN_SOON_PHRASES),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub weeks_ahead: usize,
    pub weight: f64,
    pub decay: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            weeks_ahead: 3,
            weight: 0.10,
            decay: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub recent_games: usize,
    pub hot_threshold: f64,
    pub recency_weight: f64,
    pub trending_weight: f64,
    pub trending_min_delta: f64,
    pub trending_cap: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        MomentumConfig {
            recent_games: 3,
            hot_threshold: 1.0,
            recency_weight: 0.25,
            trending_weight: 0.15,
            trending_min_delta: 5.0,
            trending_cap: 3.0,
        }
    }
}

/// One extra keyword rule from scoring.toml.
#[derive(Debug, Clone, Deserialize)]
struct RuleEntry {
    label: String,
    multiplier: f64,
    pattern: String,
    #[serde(default)]
    unless: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct NewsSection {
    enabled: bool,
    box_scores: bool,
    rules: Vec<RuleEntry>,
}

impl Default for NewsSection {
    fn default() -> Self {
        NewsSection {
            enabled: true,
            box_scores: true,
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub enabled: bool,
    /// Standout box scores and recent starts.
    pub box_scores: bool,
    pub keywords: KeywordTable,
}

impl Default for NewsConfig {
    fn default() -> Self {
        NewsConfig {
            enabled: true,
            box_scores: true,
            keywords: builtin_table("news", NEWS_KEYWORDS),
        }
    }
}

/// Percentile cutoffs, absolute floors and fixed fallback thresholds for
/// Elite, Strong, Solid and Streamer (Dart is everything below).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    pub percentiles: [f64; 4],
    pub floors: [f64; 4],
    pub fallback: [f64; 4],
    pub min_pool_size: usize,
}

impl Default for TierConfig {
    fn default() -> Self {
        TierConfig {
            percentiles: [90.0, 70.0, 40.0, 15.0],
            floors: [4.0, 2.5, 1.5, 0.5],
            fallback: [6.0, 4.0, 2.5, 1.0],
            min_pool_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct FaabSection {
    strategy: String,
    default_bid: u32,
    max_bid_percent: f64,
    iqr_factor: f64,
    premium_floor: Option<f64>,
    schedule_weight: f64,
    elite_bump: f64,
    tiers: TierConfig,
}

impl Default for FaabSection {
    fn default() -> Self {
        let d = FaabConfig::default();
        FaabSection {
            strategy: d.strategy.label().to_string(),
            default_bid: d.default_bid,
            max_bid_percent: d.max_bid_percent,
            iqr_factor: d.iqr_factor,
            premium_floor: d.premium_floor,
            schedule_weight: d.schedule_weight,
            elite_bump: d.elite_bump,
            tiers: d.tiers,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FaabConfig {
    pub strategy: BidStrategy,
    /// League median stand-in when there is no bid history.
    pub default_bid: u32,
    pub max_bid_percent: f64,
    pub iqr_factor: f64,
    /// Optional minimum amount for a bid to count as premium.
    pub premium_floor: Option<f64>,
    pub schedule_weight: f64,
    pub elite_bump: f64,
    pub tiers: TierConfig,
}

impl Default for FaabConfig {
    fn default() -> Self {
        FaabConfig {
            strategy: BidStrategy::Competitive,
            default_bid: 1,
            max_bid_percent: 0.50,
            iqr_factor: 1.5,
            premium_floor: None,
            schedule_weight: 0.15,
            elite_bump: 0.10,
            tiers: TierConfig::default(),
        }
    }
}

/// Compile a built-in keyword table. A pattern that fails to compile is
/// logged and the table falls back to empty.
fn builtin_table(name: &str, specs: &[RuleSpec]) -> KeywordTable {
    KeywordTable::from_specs(specs).unwrap_or_else(|e| {
        warn!("built-in {} keyword table failed to compile: {}", name, e);
        KeywordTable::default()
    })
}

fn extend_table(
    table: &mut KeywordTable,
    field: &str,
    label: &str,
    multiplier: f64,
    patterns: &[String],
) -> Result<(), ConfigError> {
    for pattern in patterns {
        let rule = KeywordRule::new(label, multiplier, pattern)
            .map_err(|e: PatternError| invalid(field, e.to_string()))?;
        table.push(rule);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Effective configuration
// ---------------------------------------------------------------------------

/// League values detected at runtime (from the league provider) that take
/// precedence over the files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub num_teams: Option<usize>,
    pub budget_regular_season: Option<u32>,
    pub budget_playoffs: Option<u32>,
    pub weekly_transaction_limit: Option<u32>,
    pub playoff_start_week: Option<u32>,
    pub end_week: Option<u32>,
    pub punt_categories: Option<Vec<String>>,
    pub faab_strategy: Option<String>,
}

impl Config {
    /// Merge auto-detected overrides into a new validated config.
    /// `self` is left untouched.
    pub fn with_overrides(&self, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
        let mut merged = self.clone();
        let league = &mut merged.league;
        if let Some(n) = overrides.num_teams {
            league.num_teams = n;
        }
        if let Some(b) = overrides.budget_regular_season {
            league.budget.regular_season = b;
        }
        if let Some(b) = overrides.budget_playoffs {
            league.budget.playoffs = b;
        }
        if let Some(l) = overrides.weekly_transaction_limit {
            league.weekly_transaction_limit = l;
        }
        if overrides.playoff_start_week.is_some() {
            league.playoff_start_week = overrides.playoff_start_week;
        }
        if overrides.end_week.is_some() {
            league.end_week = overrides.end_week;
        }
        if let Some(names) = &overrides.punt_categories {
            league.punts = parse_punts(names)?;
        }
        if let Some(s) = &overrides.faab_strategy {
            merged.scoring.faab.strategy = parse_strategy(s)?;
        }
        validate(&merged)?;
        Ok(merged)
    }
}

fn parse_punts(names: &[String]) -> Result<PuntSet, ConfigError> {
    let mut cats = Vec::with_capacity(names.len());
    for name in names {
        let cat = Category::from_name(name)
            .ok_or_else(|| invalid("league.punt_categories", format!("unknown category `{name}`")))?;
        cats.push(cat);
    }
    Ok(PuntSet::from_categories(cats))
}

fn parse_strategy(name: &str) -> Result<BidStrategy, ConfigError> {
    BidStrategy::parse(name).ok_or_else(|| {
        invalid(
            "faab.strategy",
            format!("must be one of value, competitive, aggressive; got `{name}`"),
        )
    })
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// (optionally) `config/scoring.toml`, relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    load_config_dir(&base_dir.join("config"))
}

fn load_config_dir(config_dir: &Path) -> Result<Config, ConfigError> {
    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;
    let raw = league_file.league;

    let league = LeagueConfig {
        name: raw.name,
        num_teams: raw.num_teams,
        my_team: raw.my_team,
        weekly_transaction_limit: raw.weekly_transaction_limit,
        playoff_start_week: raw.playoff_start_week,
        end_week: raw.end_week,
        punts: parse_punts(&raw.punt_categories)?,
        budget: raw.faab,
        il: raw.il,
        roster: raw.roster,
    };

    // --- scoring.toml (optional, every field defaults) ---
    let scoring_path = config_dir.join("scoring.toml");
    let scoring_file: ScoringFile = if scoring_path.exists() {
        let text = read_file(&scoring_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: scoring_path.clone(),
            source: e,
        })?
    } else {
        ScoringFile::default()
    };

    let config = Config {
        league,
        scoring: assemble_scoring(scoring_file)?,
    };

    validate(&config)?;

    Ok(config)
}

fn assemble_scoring(file: ScoringFile) -> Result<ScoringConfig, ConfigError> {
    let inj = file.injury;
    let mut injury = InjuryConfig {
        out: inj.out,
        out_extended: inj.out_extended,
        out_returning: inj.out_returning,
        day_to_day: inj.day_to_day,
        day_to_day_returning: inj.day_to_day_returning,
        near_elimination: inj.near_elimination,
        unknown_suspension: inj.unknown_suspension,
        ..InjuryConfig::default()
    };
    extend_table(
        &mut injury.extended_phrases,
        "injury.extra_extended_phrases",
        "Extended",
        injury.out_extended,
        &inj.extra_extended_phrases,
    )?;
    extend_table(
        &mut injury.return_phrases,
        "injury.extra_return_phrases",
        "Returning",
        injury.out_returning,
        &inj.extra_return_phrases,
    )?;

    let mut news = NewsConfig {
        enabled: file.news.enabled,
        box_scores: file.news.box_scores,
        ..NewsConfig::default()
    };
    for entry in &file.news.rules {
        let mut rule = KeywordRule::new(&entry.label, entry.multiplier, &entry.pattern)
            .map_err(|e| invalid("news.rules", e.to_string()))?;
        if let Some(u) = &entry.unless {
            rule = rule
                .unless(u)
                .map_err(|e| invalid("news.rules", e.to_string()))?;
        }
        news.keywords.push(rule);
    }

    let f = file.faab;
    let faab = FaabConfig {
        strategy: parse_strategy(&f.strategy)?,
        default_bid: f.default_bid,
        max_bid_percent: f.max_bid_percent,
        iqr_factor: f.iqr_factor,
        premium_floor: f.premium_floor,
        schedule_weight: f.schedule_weight,
        elite_bump: f.elite_bump,
        tiers: f.tiers,
    };

    Ok(ScoringConfig {
        pool: file.pool,
        needs: file.needs,
        availability: file.availability,
        injury,
        schedule: file.schedule,
        momentum: file.momentum,
        news,
        faab,
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    copied.sort();
    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first. When the working directory has neither `config/` nor `defaults/`,
/// the per-user config directory (e.g. `~/.config/waiverwire`) is used.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        ensure_config_files(&cwd)?;
        return load_config_from(&cwd);
    }
    match directories::ProjectDirs::from("", "", "waiverwire") {
        Some(dirs) => load_config_dir(dirs.config_dir()),
        None => Err(ConfigError::FileNotFound {
            path: cwd.join("config"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn check_descending(field: &str, values: &[f64]) -> Result<(), ConfigError> {
    if values.windows(2).any(|w| w[0] <= w[1]) {
        return Err(invalid(
            field,
            format!("must be strictly descending, got {values:?}"),
        ));
    }
    Ok(())
}

fn check_unit(name: &str, val: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&val) {
        return Err(invalid(name, format!("must be between 0.0 and 1.0, got {val}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;
    if league.num_teams == 0 {
        return Err(invalid("league.num_teams", "must be greater than 0"));
    }
    if league.budget.regular_season == 0 {
        return Err(invalid("league.faab.regular_season", "must be greater than 0"));
    }
    if let (Some(start), Some(end)) = (league.playoff_start_week, league.end_week) {
        if start > end {
            return Err(invalid(
                "league.playoff_start_week",
                format!("must not be after end_week ({start} > {end})"),
            ));
        }
    }
    if league.punts.len() >= Category::ALL.len() {
        return Err(invalid("league.punt_categories", "cannot punt every category"));
    }

    let s = &config.scoring;
    if s.pool.top_n == 0 {
        return Err(invalid("pool.top_n", "must be > 0"));
    }
    if s.pool.min_minutes < 0.0 {
        return Err(invalid(
            "pool.min_minutes",
            format!("must be >= 0, got {}", s.pool.min_minutes),
        ));
    }
    if s.needs.count == 0 {
        return Err(invalid("needs.count", "must be > 0"));
    }

    // Weights must be non-negative
    let weight_fields: &[(&str, f64)] = &[
        ("needs.weight", s.needs.weight),
        ("schedule.weight", s.schedule.weight),
        ("momentum.recency_weight", s.momentum.recency_weight),
        ("momentum.trending_weight", s.momentum.trending_weight),
        ("momentum.trending_min_delta", s.momentum.trending_min_delta),
        ("momentum.hot_threshold", s.momentum.hot_threshold),
        ("faab.schedule_weight", s.faab.schedule_weight),
        ("faab.elite_bump", s.faab.elite_bump),
        ("faab.iqr_factor", s.faab.iqr_factor),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(invalid(name, format!("must be >= 0, got {val}")));
        }
    }
    if s.momentum.trending_cap <= 0.0 {
        return Err(invalid(
            "momentum.trending_cap",
            format!("must be > 0, got {}", s.momentum.trending_cap),
        ));
    }
    if s.momentum.recent_games == 0 {
        return Err(invalid("momentum.recent_games", "must be > 0"));
    }

    // Multipliers are fractions of full value
    let a = &s.availability;
    let i = &s.injury;
    let unit_fields: &[(&str, f64)] = &[
        ("availability.healthy_multiplier", a.healthy_multiplier),
        ("availability.moderate_multiplier", a.moderate_multiplier),
        ("availability.risky_multiplier", a.risky_multiplier),
        ("availability.fragile_multiplier", a.fragile_multiplier),
        ("availability.active_multiplier", a.active_multiplier),
        ("availability.questionable_multiplier", a.questionable_multiplier),
        ("availability.inactive_multiplier", a.inactive_multiplier),
        ("injury.out", i.out),
        ("injury.out_extended", i.out_extended),
        ("injury.out_returning", i.out_returning),
        ("injury.day_to_day", i.day_to_day),
        ("injury.day_to_day_returning", i.day_to_day_returning),
        ("injury.near_elimination", i.near_elimination),
        ("injury.unknown_suspension", i.unknown_suspension),
    ];
    for (name, val) in unit_fields {
        check_unit(name, *val)?;
    }

    check_descending(
        "availability.rates",
        &[a.healthy_rate, a.moderate_rate, a.risky_rate],
    )?;
    if a.healthy_rate > 1.0 || a.risky_rate <= 0.0 {
        return Err(invalid(
            "availability.rates",
            format!(
                "must lie in (0, 1], got {} / {}",
                a.healthy_rate, a.risky_rate
            ),
        ));
    }
    if a.active_days < 0 || a.active_days >= a.questionable_days {
        return Err(invalid(
            "availability.active_days",
            format!(
                "must be >= 0 and below questionable_days ({} vs {})",
                a.active_days, a.questionable_days
            ),
        ));
    }

    if s.schedule.weeks_ahead == 0 {
        return Err(invalid("schedule.weeks_ahead", "must be > 0"));
    }
    if !(s.schedule.decay > 0.0 && s.schedule.decay <= 1.0) {
        return Err(invalid(
            "schedule.decay",
            format!("must be in (0, 1], got {}", s.schedule.decay),
        ));
    }

    let f = &s.faab;
    if !(f.max_bid_percent > 0.0 && f.max_bid_percent <= 1.0) {
        return Err(invalid(
            "faab.max_bid_percent",
            format!("must be in (0, 1], got {}", f.max_bid_percent),
        ));
    }
    let t = &f.tiers;
    check_descending("faab.tiers.floors", &t.floors)?;
    check_descending("faab.tiers.fallback", &t.fallback)?;
    check_descending("faab.tiers.percentiles", &t.percentiles)?;
    if t.percentiles.iter().any(|p| *p <= 0.0 || *p >= 100.0) {
        return Err(invalid(
            "faab.tiers.percentiles",
            format!("must lie strictly between 0 and 100, got {:?}", t.percentiles),
        ));
    }
    if t.min_pool_size == 0 {
        return Err(invalid("faab.tiers.min_pool_size", "must be > 0"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LEAGUE_TOML: &str = r#"
[league]
name = "Test Hoops"
num_teams = 10
my_team = "Bench Mob"
weekly_transaction_limit = 4
playoff_start_week = 20
end_week = 22
punt_categories = ["FT%"]

[league.faab]
regular_season = 200
playoffs = 50

[league.roster]
undroppable = ["Nikola Jokic"]
auto_droppable_count = 2
"#;

    /// Fresh scratch directory under the system temp dir.
    fn scratch(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("waiverwire_config_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    fn expect_validation(result: Result<Config, ConfigError>, expected_field: &str) {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, expected_field),
            Err(other) => panic!("expected ValidationError, got: {other}"),
            Ok(_) => panic!("expected ValidationError for {expected_field}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        validate(&Config::default()).expect("default config should validate");
    }

    #[test]
    fn builtin_tables_compile_completely() {
        let injury = InjuryConfig::default();
        assert_eq!(injury.extended_phrases.len(), EXTENDED_ABSENCE_PHRASES.len());
        assert_eq!(injury.return_phrases.len(), RETURN_SOON_PHRASES.len());
        assert_eq!(NewsConfig::default().keywords.len(), NEWS_KEYWORDS.len());
    }

    #[test]
    fn load_league_only_uses_scoring_defaults() {
        let tmp = scratch("league_only");
        fs::write(tmp.join("config/league.toml"), LEAGUE_TOML).unwrap();

        let config = load_config_from(&tmp).expect("should load");
        assert_eq!(config.league.name, "Test Hoops");
        assert_eq!(config.league.num_teams, 10);
        assert_eq!(config.league.my_team.as_deref(), Some("Bench Mob"));
        assert_eq!(config.league.weekly_transaction_limit, 4);
        assert_eq!(config.league.budget.regular_season, 200);
        assert_eq!(config.league.budget.playoffs, 50);
        assert!(config.league.punts.contains(Category::FtPct));
        assert_eq!(config.league.roster.auto_droppable_count, 2);
        assert_eq!(config.league.il.il_eligible, vec!["INJ", "O", "SUSP"]);

        assert_eq!(config.scoring.pool.top_n, 15);
        assert_eq!(config.scoring.needs.count, 3);
        assert!((config.scoring.schedule.decay - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.scoring.faab.strategy, BidStrategy::Competitive);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn partial_scoring_file_keeps_other_defaults() {
        let tmp = scratch("partial_scoring");
        fs::write(tmp.join("config/league.toml"), LEAGUE_TOML).unwrap();
        fs::write(
            tmp.join("config/scoring.toml"),
            r#"
[schedule]
weight = 0.2

[faab]
strategy = "aggressive"

[[news.rules]]
label = "Closer Role"
multiplier = 1.07
pattern = "closing ... minutes"
"#,
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load");
        assert!((config.scoring.schedule.weight - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.scoring.schedule.weeks_ahead, 3);
        assert_eq!(config.scoring.faab.strategy, BidStrategy::Aggressive);
        assert_eq!(
            config.scoring.news.keywords.len(),
            NEWS_KEYWORDS.len() + 1
        );
        let hits = config
            .scoring
            .news
            .keywords
            .scan("He was closing out the final minutes");
        assert!(hits.iter().any(|h| h.label == "Closer Role"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn extra_injury_phrases_extend_tables() {
        let tmp = scratch("extra_injury");
        fs::write(tmp.join("config/league.toml"), LEAGUE_TOML).unwrap();
        fs::write(
            tmp.join("config/scoring.toml"),
            "[injury]\nextra_extended_phrases = [\"out ... 6+ weeks\"]\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load");
        assert!(config
            .scoring
            .injury
            .extended_phrases
            .matches_any("Expected to be out at least 8 weeks"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bad_extra_pattern() {
        let tmp = scratch("bad_pattern");
        fs::write(tmp.join("config/league.toml"), LEAGUE_TOML).unwrap();
        fs::write(
            tmp.join("config/scoring.toml"),
            "[[news.rules]]\nlabel = \"X\"\nmultiplier = 1.1\npattern = \"week-to-week\"\n",
        )
        .unwrap();

        expect_validation(load_config_from(&tmp), "news.rules");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_punt_category() {
        let tmp = scratch("bad_punt");
        let text = LEAGUE_TOML.replace(r#"["FT%"]"#, r#"["HR"]"#);
        fs::write(tmp.join("config/league.toml"), text).unwrap();

        expect_validation(load_config_from(&tmp), "league.punt_categories");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_strategy() {
        let tmp = scratch("bad_strategy");
        fs::write(tmp.join("config/league.toml"), LEAGUE_TOML).unwrap();
        fs::write(tmp.join("config/scoring.toml"), "[faab]\nstrategy = \"yolo\"\n").unwrap();

        expect_validation(load_config_from(&tmp), "faab.strategy");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_weight() {
        let mut config = Config::default();
        config.scoring.needs.weight = -0.5;
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "needs.weight"));
    }

    #[test]
    fn rejects_tier_floors_out_of_order() {
        let mut config = Config::default();
        config.scoring.faab.tiers.floors = [4.0, 1.5, 2.5, 0.5];
        let err = validate(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { ref field, .. } if field == "faab.tiers.floors")
        );
    }

    #[test]
    fn rejects_availability_rates_out_of_order() {
        let mut config = Config::default();
        config.scoring.availability.moderate_rate = 0.85;
        let err = validate(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { ref field, .. } if field == "availability.rates")
        );
    }

    #[test]
    fn rejects_decay_out_of_range() {
        let mut config = Config::default();
        config.scoring.schedule.decay = 0.0;
        assert!(validate(&config).is_err());
        config.scoring.schedule.decay = 1.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn rejects_injury_multiplier_above_one() {
        let mut config = Config::default();
        config.scoring.injury.out_returning = 1.4;
        let err = validate(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { ref field, .. } if field == "injury.out_returning")
        );
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = scratch("missing_league");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch("invalid_toml");
        fs::write(tmp.join("config/league.toml"), "this is not valid [[[ toml").unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    // ---- Effective configuration ----

    #[test]
    fn overrides_merge_without_mutating_base() {
        let base = Config::default();
        let overrides = ConfigOverrides {
            budget_regular_season: Some(1000),
            weekly_transaction_limit: Some(5),
            playoff_start_week: Some(19),
            end_week: Some(21),
            punt_categories: Some(vec!["TO".into(), "FG%".into()]),
            faab_strategy: Some("value".into()),
            ..ConfigOverrides::default()
        };

        let merged = base.with_overrides(&overrides).expect("should merge");
        assert_eq!(merged.league.budget.regular_season, 1000);
        assert_eq!(merged.league.weekly_transaction_limit, 5);
        assert_eq!(merged.league.playoff_start_week, Some(19));
        assert!(merged.league.punts.contains(Category::Tov));
        assert!(merged.league.punts.contains(Category::FgPct));
        assert_eq!(merged.scoring.faab.strategy, BidStrategy::Value);

        assert_eq!(base.league.budget.regular_season, 300);
        assert!(base.league.punts.is_empty());
    }

    #[test]
    fn overrides_are_validated() {
        let overrides = ConfigOverrides {
            num_teams: Some(0),
            ..ConfigOverrides::default()
        };
        expect_validation(Config::default().with_overrides(&overrides), "league.num_teams");
    }

    // ---- ensure_config_files ----

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("waiverwire_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join("league.toml"), LEAGUE_TOML).unwrap();
        fs::write(defaults_dir.join("scoring.toml"), "").unwrap();
        fs::write(defaults_dir.join("overrides.toml.example"), "").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 2);
        assert!(tmp.join("config/league.toml").exists());
        assert!(!tmp.join("config/overrides.toml.example").exists());

        // Second run copies nothing and keeps local edits
        fs::write(tmp.join("config/scoring.toml"), "# custom\n").unwrap();
        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config/scoring.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("waiverwire_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"))
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }
}
