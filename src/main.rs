use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use pl_elo::collector::{CollectorConfig, SeasonCollector};
use pl_elo::dataset;
use pl_elo::elo::{EloConfig, EloEngine};
use pl_elo::scores_fetch::{BbcFixtureProvider, PREMIER_LEAGUE_URN};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let cfg = collector_config_from_env()?;
    let urn =
        std::env::var("TOURNAMENT_URN").unwrap_or_else(|_| PREMIER_LEAGUE_URN.to_string());
    let provider = BbcFixtureProvider::new(urn);

    let mut collector = SeasonCollector::new(cfg);
    collector.run(&provider)?;
    let matches = collector.into_matches();
    info!(matches = matches.len(), "season collected");

    let out_path = PathBuf::from(
        std::env::var("OUT_CSV").unwrap_or_else(|_| "matches.csv".to_string()),
    );
    let rows = dataset::save_matches_csv(&out_path, &matches)?;
    info!(rows, path = %out_path.display(), "saved match dataset");

    let elo_defaults = EloConfig::default();
    let elo_cfg = EloConfig {
        k: env_f64("ELO_K", elo_defaults.k),
        home_adv_pts: env_f64("ELO_HOME_ADV", elo_defaults.home_adv_pts),
    };
    let mut engine = EloEngine::new(&matches, elo_cfg);
    engine.run_season(&matches)?;

    println!("Final rankings ({} matches):", matches.len());
    for (pos, (team, rating)) in engine.rankings().iter().enumerate() {
        println!("{:>2}. {team:<26} {rating:7.1}", pos + 1);
    }

    Ok(())
}

fn collector_config_from_env() -> Result<CollectorConfig> {
    let defaults = CollectorConfig::default();
    let start = opt_date_env("SEASON_START").unwrap_or(defaults.start);
    let end = opt_date_env("SEASON_END").unwrap_or(defaults.end);
    if end < start {
        anyhow::bail!("SEASON_END {end} precedes SEASON_START {start}");
    }
    let fetch_delay = std::env::var("FETCH_DELAY_MS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(defaults.fetch_delay);
    Ok(CollectorConfig {
        start,
        end,
        fetch_delay,
    })
}

fn opt_date_env(key: &str) -> Option<NaiveDate> {
    let raw = std::env::var(key).ok()?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<f64>().ok())
        .unwrap_or(default)
}
