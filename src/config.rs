use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_TOP_LANGS: usize = 6;

#[derive(Parser, Debug)]
#[command(name = "github-langs")]
#[command(about = "Generate a \"most used languages\" SVG badge for a GitHub profile")]
pub struct Args {
    /// GitHub username (falls back to USERNAME)
    #[arg(short, long, env = "GITHUB_USERNAME")]
    pub username: Option<String>,

    /// GitHub token; without one only public repositories are analyzed
    #[arg(short, long, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Number of languages shown on the badge
    #[arg(long = "top", env = "TOP_LANGS")]
    pub top_langs: Option<String>,

    /// Comma-separated languages to leave out (case-insensitive)
    #[arg(short, long = "exclude", env = "EXCLUDED_LANGS", default_value = "")]
    pub excluded_langs: String,

    /// Output directory
    #[arg(short, long, default_value = "assets")]
    pub output: PathBuf,

    /// Contribution cache file
    #[arg(long, default_value = ".contribution_cache.json")]
    pub cache: PathBuf,

    /// Skip contribution statistics
    #[arg(long)]
    pub no_contributions: bool,

    /// Log a detailed per-language breakdown
    #[arg(long)]
    pub report: bool,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,
}

/// Settings for one run, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub username: Option<String>,
    pub token: Option<String>,
    pub top_langs: usize,
    /// Lowercased names of excluded languages
    pub excluded_langs: HashSet<String>,
    pub output: PathBuf,
    pub cache: PathBuf,
    pub contributions: bool,
    pub report: bool,
    pub api_url: String,
}

impl Config {
    /// Build the configuration; `fallback_username` is consulted when no
    /// username was given explicitly.
    pub fn from_args(args: Args, fallback_username: Option<String>) -> Result<Self> {
        let username = non_empty(args.username).or_else(|| non_empty(fallback_username));
        let token = non_empty(args.token);

        if token.is_none() && username.is_none() {
            anyhow::bail!(
                "Either GH_TOKEN (recommended) or GITHUB_USERNAME/USERNAME must be provided"
            );
        }

        let excluded_langs = parse_excluded(&args.excluded_langs);
        if !excluded_langs.is_empty() {
            info!("Excluding languages: {}", args.excluded_langs);
        }

        Ok(Self {
            username,
            token,
            top_langs: parse_top_langs(args.top_langs.as_deref()),
            excluded_langs,
            output: args.output,
            cache: args.cache,
            contributions: !args.no_contributions,
            report: args.report,
            api_url: args.api_url,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the top-N setting, falling back to the default on bad input
pub fn parse_top_langs(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_TOP_LANGS;
    };

    match raw.parse::<i64>() {
        Ok(value) if value > 0 => value as usize,
        Ok(_) => {
            warn!(
                "TOP_LANGS must be positive, got {:?}. Falling back to {}.",
                raw, DEFAULT_TOP_LANGS
            );
            DEFAULT_TOP_LANGS
        }
        Err(_) => {
            warn!(
                "Invalid TOP_LANGS value {:?}. Falling back to {}.",
                raw, DEFAULT_TOP_LANGS
            );
            DEFAULT_TOP_LANGS
        }
    }
}

/// Split a comma-separated language list into lowercased names
pub fn parse_excluded(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|lang| lang.trim().to_lowercase())
        .filter(|lang| !lang.is_empty())
        .collect()
}
