//! Year-keyed snapshot of contribution calendars.

use crate::github::{ContributionCalendar, ContributionTotals};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionCache {
    #[serde(default)]
    pub years: BTreeMap<i32, ContributionCalendar>,
    #[serde(default)]
    pub all_types: BTreeMap<i32, ContributionTotals>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ContributionCache {
    pub fn insert_year(
        &mut self,
        year: i32,
        calendar: ContributionCalendar,
        totals: ContributionTotals,
    ) {
        self.years.insert(year, calendar);
        self.all_types.insert(year, totals);
    }
}

/// Storage for the contribution cache
pub trait CacheRepository {
    /// Load the cache; a missing or unreadable store yields an empty cache
    fn load(&self) -> ContributionCache;

    fn save(&self, cache: &ContributionCache) -> Result<()>;
}

/// Cache stored as a pretty-printed JSON file
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<ContributionCache> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl CacheRepository for JsonFileCache {
    fn load(&self) -> ContributionCache {
        if !self.path.exists() {
            debug!("No contribution cache at {}", self.path.display());
            return ContributionCache::default();
        }

        match self.read() {
            Ok(cache) => {
                debug!(
                    "Loaded {} cached years from {}",
                    cache.years.len(),
                    self.path.display()
                );
                cache
            }
            Err(e) => {
                warn!("Could not load cache {}: {:#}", self.path.display(), e);
                ContributionCache::default()
            }
        }
    }

    fn save(&self, cache: &ContributionCache) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(cache)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write cache {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{ContributionDay, Week};
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample() -> ContributionCache {
        let day = |d, count| ContributionDay {
            date: NaiveDate::from_ymd_opt(2023, 12, d).unwrap(),
            contribution_count: count,
        };
        let mut cache = ContributionCache::default();
        cache.insert_year(
            2023,
            ContributionCalendar {
                total_contributions: 7,
                weeks: vec![Week {
                    contribution_days: vec![day(30, 3), day(31, 4)],
                }],
            },
            ContributionTotals {
                total_commit_contributions: 6,
                total_issue_contributions: 1,
                ..Default::default()
            },
        );
        cache.last_updated = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        cache
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileCache::new(dir.path().join("cache.json"));
        assert_eq!(store.load(), ContributionCache::default());
    }

    #[test]
    fn saved_cache_loads_back() {
        let dir = tempdir().unwrap();
        let store = JsonFileCache::new(dir.path().join("nested").join("cache.json"));
        let cache = sample();

        store.save(&cache).unwrap();
        assert_eq!(store.load(), cache);
    }

    #[test]
    fn file_layout_is_keyed_by_year() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        JsonFileCache::new(&path).save(&sample()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["years"]["2023"]["totalContributions"], 7);
        assert_eq!(
            raw["years"]["2023"]["weeks"][0]["contributionDays"][1]["date"],
            "2023-12-31"
        );
        assert_eq!(raw["all_types"]["2023"]["totalCommitContributions"], 6);
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(JsonFileCache::new(path).load(), ContributionCache::default());
    }
}
