// Waiver wire entry point.
//
// Run sequence:
// 1. Initialize tracing (log to file, stdout is the report)
// 2. Load config
// 3. Load the snapshot directory (first argument, default `data`)
// 4. Merge detected league settings into the config
// 5. Score candidates and suggest bids
// 6. Print the report

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use waiverwire_app::report::render_report;
use waiverwire_app::run::{effective_config, run, RunOptions};
use waiverwire_app::snapshot::load_snapshot;
use waiverwire_core::config;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("waiverwire starting up");

    // 2. Load config
    let base = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, ${} FAAB",
        base.league.name, base.league.num_teams, base.league.budget.regular_season
    );

    // 3. Load the snapshot
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    let snapshot = load_snapshot(&dir)
        .with_context(|| format!("failed to load snapshot from {}", dir.display()))?;

    // 4. Effective config
    let config = effective_config(&base, &snapshot).context("invalid league overrides")?;

    // 5. Score
    let opts = RunOptions {
        today: chrono::Local::now().date_naive(),
        strategy: None,
        top_n: None,
    };
    let output = run(&config, &snapshot, &opts);
    info!(
        "Ranked {} candidates from a pool of {}",
        output.ranked.len(),
        output.pool_size
    );

    // 6. Report
    print!("{}", render_report(&output, &config));
    Ok(())
}

/// Initialize tracing to log to a file so stdout carries only the report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("waiverwire.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("waiverwire=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
