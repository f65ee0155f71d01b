mod apportion;
mod cache;
mod config;
mod contributions;
mod github;
mod languages;
mod streak;
mod svg;
mod theme;
mod tiles;

use anyhow::{Context, Result};
use cache::JsonFileCache;
use chrono::Local;
use clap::Parser;
use config::{Args, Config};
use github::GitHub;
use log::{info, warn};
use std::fs;
use tiles::{Languages, RenderConfig, Tile};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::from_args(args, std::env::var("USERNAME").ok())?;

    run(&config).await
}

async fn run(config: &Config) -> Result<()> {
    info!("Starting language statistics and contribution data generation...");

    if config.token.is_none() {
        warn!(
            "GH_TOKEN not provided. Only public repositories will be analyzed \
             and GitHub rate limits will be lower."
        );
    }

    let github = GitHub::new(&config.api_url, config.token.clone())?;

    let repos = github
        .fetch_repositories(config.username.as_deref())
        .await
        .context("Failed to fetch repositories")?;
    let totals = languages::aggregate(&github, &repos, &config.excluded_langs).await;

    if config.report {
        totals.report();
    }

    let total_bytes = totals.total();
    if total_bytes == 0 {
        anyhow::bail!("No language data found");
    }

    info!("Top {} languages (by byte size):", config.top_langs);
    for (language, bytes) in totals.top(config.top_langs) {
        info!(
            "  {}: {} bytes ({:.2}%)",
            language,
            svg::format_number(bytes),
            languages::percent(bytes, total_bytes)
        );
    }

    let login = resolve_login(config, &github).await;
    let contributions = match (&login, config.contributions) {
        (_, false) => None,
        (_, true) if !github.is_authenticated() => {
            warn!("Contribution statistics require GH_TOKEN, skipping");
            None
        }
        (None, true) => {
            warn!("Unknown username, skipping contribution statistics");
            None
        }
        (Some(login), true) => {
            let store = JsonFileCache::new(&config.cache);
            let today = Local::now().date_naive();
            contributions::collect(&github, login, &store, today).await
        }
    };
    if let Some(summary) = &contributions {
        summary.log();
    }

    let tile = Languages::new(&totals, config.top_langs, contributions);
    let render_config = RenderConfig::new(login.as_deref(), theme::KANAGAWA);

    fs::create_dir_all(&config.output).with_context(|| {
        format!("Failed to create output directory {}", config.output.display())
    })?;
    let path = config.output.join(tile.filename());
    fs::write(&path, tile.render(&render_config))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("SVG successfully written to {}", path.display());
    info!(
        "Total code size analyzed (bytes): {}",
        svg::format_number(total_bytes)
    );

    Ok(())
}

/// Username from the configuration, or the owner of the token
async fn resolve_login(config: &Config, github: &GitHub) -> Option<String> {
    if let Some(username) = &config.username {
        return Some(username.clone());
    }
    if !github.is_authenticated() {
        return None;
    }
    match github.fetch_viewer_login().await {
        Ok(login) => Some(login),
        Err(e) => {
            warn!("Could not resolve the authenticated user: {:#}", e);
            None
        }
    }
}
