//! All-time contribution statistics, fetched year by year and cached.

use crate::cache::{CacheRepository, ContributionCache};
use crate::github::{ContributionCalendar, ContributionTotals, ContributionsCollection, GitHub};
use crate::streak::{self, Streaks};
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use log::{info, warn};
use std::time::Duration;

/// Pause between consecutive yearly requests
const REQUEST_DELAY: Duration = Duration::from_secs(1);
const FALLBACK_DAYS: i64 = 365;

/// Where contribution history comes from
pub trait ContributionSource {
    async fn created_at(&self, login: &str) -> Result<DateTime<Utc>>;

    async fn contributions(
        &self,
        login: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ContributionsCollection>;
}

impl ContributionSource for GitHub {
    async fn created_at(&self, login: &str) -> Result<DateTime<Utc>> {
        self.fetch_created_at(login).await
    }

    async fn contributions(
        &self,
        login: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ContributionsCollection> {
        self.fetch_contributions(login, from, to).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionSummary {
    /// Contributions counted by the calendar
    pub total_contributions: u64,
    pub totals: ContributionTotals,
    pub streaks: Streaks,
    pub years_fetched: usize,
}

impl ContributionSummary {
    pub fn all_types_total(&self) -> u64 {
        self.totals.all_types()
    }

    /// Build the summary of a calendar, with streaks relative to `today`
    pub fn from_calendar(
        calendar: &ContributionCalendar,
        totals: ContributionTotals,
        years_fetched: usize,
        today: NaiveDate,
    ) -> Self {
        Self {
            total_contributions: calendar.total_contributions,
            totals,
            streaks: streak::calculate(calendar.days(), today),
            years_fetched,
        }
    }

    pub fn log(&self) {
        info!("Contribution data:");
        info!("  Total contributions (all time): {}", self.total_contributions);
        info!("  Total contributions (all types): {}", self.all_types_total());
        info!("  Years analyzed: {}", self.years_fetched);
        info!("  Current streak: {} days", self.streaks.current);
        info!("  Longest streak: {} days", self.streaks.longest);
    }
}

/// Concatenate the cached years in ascending order
pub fn merge_years(cache: &ContributionCache) -> (ContributionCalendar, ContributionTotals) {
    let mut calendar = ContributionCalendar::default();
    let mut totals = ContributionTotals::default();

    for (year, year_calendar) in &cache.years {
        calendar.weeks.extend(year_calendar.weeks.iter().cloned());
        calendar.total_contributions += year_calendar.total_contributions;
        if let Some(year_totals) = cache.all_types.get(year) {
            totals += *year_totals;
        }
    }

    (calendar, totals)
}

/// Years that need a request: missing from the cache, plus the current one
pub fn years_to_fetch(cache: &ContributionCache, first: i32, current: i32) -> Vec<i32> {
    (first..=current)
        .filter(|year| *year == current || !cache.years.contains_key(year))
        .collect()
}

/// Fetch all-time contribution statistics for `login`.
///
/// Returns `None` when nothing could be fetched; the badge is then rendered
/// without the contribution row.
pub async fn collect(
    source: &impl ContributionSource,
    login: &str,
    store: &impl CacheRepository,
    today: NaiveDate,
) -> Option<ContributionSummary> {
    info!("Fetching contribution data for user: {}", login);

    let created_at = match source.created_at(login).await {
        Ok(created_at) => created_at,
        Err(e) => {
            warn!("Could not determine account creation date: {:#}", e);
            return collect_recent(source, login, today).await;
        }
    };

    let first_year = created_at.year();
    let current_year = today.year();
    info!("Account created: {}", created_at.format("%Y-%m-%d"));
    info!("Fetching contributions from {} to {}...", first_year, current_year);

    let mut cache = store.load();
    let years = years_to_fetch(&cache, first_year, current_year);
    info!("Years to fetch: {:?}", years);

    for (i, &year) in years.iter().enumerate() {
        info!("Fetching {}... ({}/{})", year, i + 1, years.len());

        match fetch_year(source, login, year).await {
            Ok((calendar, totals)) => {
                cache.insert_year(year, calendar, totals);
                cache.last_updated = Some(Utc::now());
                if let Err(e) = store.save(&cache) {
                    warn!("Could not save cache: {:#}", e);
                }
            }
            Err(e) => warn!("Failed to fetch data for {}: {:#}", year, e),
        }

        if i + 1 < years.len() {
            tokio::time::sleep(REQUEST_DELAY).await;
        }
    }

    if cache.years.is_empty() {
        warn!("No contribution data available");
        return None;
    }

    let (calendar, totals) = merge_years(&cache);
    Some(ContributionSummary::from_calendar(
        &calendar,
        totals,
        cache.years.len(),
        today,
    ))
}

async fn fetch_year(
    source: &impl ContributionSource,
    login: &str,
    year: i32,
) -> Result<(ContributionCalendar, ContributionTotals)> {
    let from = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .with_context(|| format!("Invalid year {}", year))?;
    let to = Utc
        .with_ymd_and_hms(year, 12, 31, 23, 59, 59)
        .single()
        .with_context(|| format!("Invalid year {}", year))?;

    let collection = source.contributions(login, from, to).await?;
    Ok((collection.contribution_calendar, collection.totals))
}

/// Contributions of the last year only, used when the account history is
/// unavailable
async fn collect_recent(
    source: &impl ContributionSource,
    login: &str,
    today: NaiveDate,
) -> Option<ContributionSummary> {
    info!("Falling back to last {} days...", FALLBACK_DAYS);

    let (from, to) = recent_window(today);
    match source.contributions(login, from, to).await {
        Ok(collection) => Some(ContributionSummary::from_calendar(
            &collection.contribution_calendar,
            collection.totals,
            1,
            today,
        )),
        Err(e) => {
            warn!("Could not fetch recent contributions: {:#}", e);
            None
        }
    }
}

/// The `FALLBACK_DAYS` days up to and including `today`
fn recent_window(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let to = today.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::days(1)
        - chrono::Duration::seconds(1);
    let from = (today - chrono::Duration::days(FALLBACK_DAYS))
        .and_time(NaiveTime::MIN)
        .and_utc();
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{ContributionDay, Week};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// History that fails for selected years and records requested windows
    struct FakeHistory {
        created: Option<DateTime<Utc>>,
        failing: Vec<i32>,
        windows: RefCell<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    }

    impl FakeHistory {
        fn new(created: Option<DateTime<Utc>>, failing: &[i32]) -> Self {
            Self {
                created,
                failing: failing.to_vec(),
                windows: RefCell::new(Vec::new()),
            }
        }

        fn requested_years(&self) -> Vec<i32> {
            self.windows.borrow().iter().map(|(from, _)| from.year()).collect()
        }
    }

    impl ContributionSource for FakeHistory {
        async fn created_at(&self, _login: &str) -> Result<DateTime<Utc>> {
            self.created.context("user not found")
        }

        async fn contributions(
            &self,
            _login: &str,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> Result<ContributionsCollection> {
            self.windows.borrow_mut().push((from, to));
            if self.failing.contains(&from.year()) {
                anyhow::bail!("rate limited");
            }
            Ok(ContributionsCollection {
                totals: commits(2),
                contribution_calendar: calendar(from.year(), &[1, 1]),
            })
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        initial: ContributionCache,
        saved: RefCell<Vec<ContributionCache>>,
    }

    impl CacheRepository for MemoryCache {
        fn load(&self) -> ContributionCache {
            self.initial.clone()
        }

        fn save(&self, cache: &ContributionCache) -> Result<()> {
            self.saved.borrow_mut().push(cache.clone());
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn created(year: i32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(year, 5, 1, 12, 0, 0).unwrap())
    }

    fn calendar(year: i32, counts: &[u32]) -> ContributionCalendar {
        let start = NaiveDate::from_ymd_opt(year, 12, 31).unwrap()
            - chrono::Duration::days(counts.len() as i64 - 1);
        let days = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| ContributionDay {
                date: start + chrono::Duration::days(i as i64),
                contribution_count: count,
            })
            .collect();
        ContributionCalendar {
            total_contributions: counts.iter().map(|&c| c as u64).sum(),
            weeks: vec![Week {
                contribution_days: days,
            }],
        }
    }

    fn commits(n: u64) -> ContributionTotals {
        ContributionTotals {
            total_commit_contributions: n,
            total_pull_request_review_contributions: 1,
            ..Default::default()
        }
    }

    #[test]
    fn only_missing_and_current_years_are_fetched() {
        let mut cache = ContributionCache::default();
        cache.insert_year(2020, calendar(2020, &[1]), commits(1));
        cache.insert_year(2022, calendar(2022, &[1]), commits(1));
        cache.insert_year(2023, calendar(2023, &[1]), commits(1));

        assert_eq!(years_to_fetch(&cache, 2020, 2023), vec![2021, 2023]);
        assert_eq!(years_to_fetch(&ContributionCache::default(), 2023, 2023), vec![2023]);
    }

    #[test]
    fn years_merge_in_order_and_sum_totals() {
        let mut cache = ContributionCache::default();
        cache.insert_year(2023, calendar(2023, &[2, 3]), commits(5));
        cache.insert_year(2022, calendar(2022, &[4]), commits(4));

        let (merged, totals) = merge_years(&cache);
        assert_eq!(merged.total_contributions, 9);
        assert_eq!(totals.total_commit_contributions, 9);
        assert_eq!(totals.all_types(), 11);

        let dates: Vec<_> = merged.days().map(|(date, _)| date.year()).collect();
        assert_eq!(dates, vec![2022, 2023, 2023]);
    }

    #[test]
    fn streak_runs_across_year_boundary() {
        let mut cache = ContributionCache::default();
        cache.insert_year(2022, calendar(2022, &[0, 1, 1]), commits(2));
        let mut next = calendar(2023, &[0]);
        next.weeks[0].contribution_days = (1..=3)
            .map(|d| ContributionDay {
                date: NaiveDate::from_ymd_opt(2023, 1, d).unwrap(),
                contribution_count: 1,
            })
            .collect();
        next.total_contributions = 3;
        cache.insert_year(2023, next, commits(3));

        let (merged, totals) = merge_years(&cache);
        let today = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
        let summary = ContributionSummary::from_calendar(&merged, totals, 2, today);

        assert_eq!(summary.total_contributions, 5);
        assert_eq!(
            summary.streaks,
            Streaks {
                current: 5,
                longest: 5
            }
        );
        assert_eq!(summary.years_fetched, 2);
    }

    #[tokio::test]
    async fn failed_year_is_skipped_and_each_success_is_saved() {
        let mut initial = ContributionCache::default();
        initial.insert_year(2021, calendar(2021, &[1]), commits(1));
        let store = MemoryCache {
            initial,
            ..Default::default()
        };
        let history = FakeHistory::new(created(2021), &[2023]);

        let summary = collect(&history, "octocat", &store, date(2024, 1, 3))
            .await
            .unwrap();

        assert_eq!(history.requested_years(), vec![2022, 2023, 2024]);

        let saved = store.saved.borrow();
        let saved_years: Vec<Vec<i32>> = saved
            .iter()
            .map(|cache| cache.years.keys().copied().collect())
            .collect();
        assert_eq!(saved_years, vec![vec![2021, 2022], vec![2021, 2022, 2024]]);
        assert!(saved.iter().all(|cache| cache.last_updated.is_some()));

        assert_eq!(summary.years_fetched, 3);
        assert_eq!(summary.total_contributions, 5);
        assert_eq!(summary.totals.total_commit_contributions, 5);
    }

    #[tokio::test]
    async fn nothing_fetched_yields_no_summary() {
        let store = MemoryCache::default();
        let history = FakeHistory::new(created(2024), &[2024]);

        let summary = collect(&history, "octocat", &store, date(2024, 1, 3)).await;

        assert_eq!(summary, None);
        assert!(store.saved.borrow().is_empty());
    }

    #[tokio::test]
    async fn unknown_creation_date_falls_back_to_last_year() {
        let store = MemoryCache::default();
        let history = FakeHistory::new(None, &[]);

        let summary = collect(&history, "octocat", &store, date(2024, 1, 3))
            .await
            .unwrap();

        assert_eq!(
            *history.windows.borrow(),
            vec![(
                Utc.with_ymd_and_hms(2023, 1, 3, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 1, 3, 23, 59, 59).unwrap(),
            )]
        );
        assert_eq!(summary.years_fetched, 1);
        assert!(store.saved.borrow().is_empty());
    }
}
