//! Language byte counts aggregated across repositories.

use crate::github::{GitHub, Repository};
use log::{debug, info};
use std::collections::{HashMap, HashSet};

/// Bytes per language, in the order languages were first seen
#[derive(Debug, Default)]
pub struct Tally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, language: &str, bytes: u64) {
        match self.index.get(language) {
            Some(&i) => self.entries[i].1 += bytes,
            None => {
                self.index.insert(language.to_string(), self.entries.len());
                self.entries.push((language.to_string(), bytes));
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, bytes)| bytes).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All languages sorted by bytes, descending; ties keep first-seen order
    pub fn sorted(&self) -> Vec<(String, u64)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

/// Aggregated language totals, with excluded languages kept apart
#[derive(Debug, Default)]
pub struct LanguageTotals {
    pub included: Tally,
    pub excluded: Tally,
    /// Repositories that contributed at least one language
    pub repositories: usize,
}

impl LanguageTotals {
    /// Add one repository's language breakdown.
    ///
    /// `excluded` holds lowercased names; matching is case-insensitive while
    /// the display name keeps its original case.
    pub fn add_repository<'a, I>(&mut self, repo: &str, languages: I, excluded: &HashSet<String>)
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut any = false;
        for (language, bytes) in languages {
            any = true;
            if excluded.contains(&language.to_lowercase()) {
                debug!("Excluding {} from {}", language, repo);
                self.excluded.add(language, bytes);
            } else {
                self.included.add(language, bytes);
            }
        }
        if any {
            self.repositories += 1;
        }
    }

    /// Total bytes of the languages that count towards the badge
    pub fn total(&self) -> u64 {
        self.included.total()
    }

    /// The `n` largest included languages
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut top = self.included.sorted();
        top.truncate(n);
        top
    }

    /// Log a full breakdown of included and excluded languages
    pub fn report(&self) {
        let total = self.total();
        let excluded_total = self.excluded.total();

        info!("Language statistics");
        info!("Total repositories analyzed: {}", self.repositories);
        info!("Total code size (bytes): {}", total);
        info!("Languages found: {}", self.included.len());

        for (language, bytes) in self.included.sorted() {
            info!("  {}: {} bytes ({:.2}%)", language, bytes, percent(bytes, total));
        }

        if !self.excluded.is_empty() {
            let grand_total = total + excluded_total;
            info!("Excluded languages:");
            for (language, bytes) in self.excluded.sorted() {
                info!(
                    "  {}: {} bytes ({:.2}%)",
                    language,
                    bytes,
                    percent(bytes, grand_total)
                );
            }
            info!("Total excluded bytes: {}", excluded_total);
            info!("Total code size including excluded (bytes): {}", grand_total);
        }
    }
}

/// Share of `bytes` in `total`, in percent
pub fn percent(bytes: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        bytes as f64 / total as f64 * 100.0
    }
}

/// Fetch languages for every repository and aggregate them
pub async fn aggregate(
    github: &GitHub,
    repos: &[Repository],
    excluded: &HashSet<String>,
) -> LanguageTotals {
    let mut totals = LanguageTotals::default();
    info!("Processing {} repositories...", repos.len());

    for (i, repo) in repos.iter().enumerate() {
        debug!("Processing {}/{}: {}", i + 1, repos.len(), repo.name);
        let languages = github.fetch_languages(repo).await;
        totals.add_repository(&repo.name, languages.iter(), excluded);
    }

    info!(
        "Language aggregation complete. Found {} languages.",
        totals.included.len()
    );
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::LanguageBytes;
    use pretty_assertions::assert_eq;

    fn excluded(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_lowercase()).collect()
    }

    #[test]
    fn bytes_accumulate_across_repositories() {
        let mut totals = LanguageTotals::default();
        let none = excluded(&[]);
        totals.add_repository("a", [("Rust", 100), ("Shell", 10)], &none);
        totals.add_repository("b", [("Rust", 50), ("Python", 70)], &none);

        assert_eq!(totals.total(), 230);
        assert_eq!(totals.repositories, 2);
        assert_eq!(
            totals.top(10),
            vec![
                ("Rust".to_string(), 150),
                ("Python".to_string(), 70),
                ("Shell".to_string(), 10),
            ]
        );
    }

    #[test]
    fn exclusion_is_case_insensitive() {
        let mut totals = LanguageTotals::default();
        let skip = excluded(&["html", "CSS"]);
        totals.add_repository("site", [("HTML", 900), ("Css", 300), ("TypeScript", 40)], &skip);

        assert_eq!(totals.total(), 40);
        assert_eq!(totals.top(6), vec![("TypeScript".to_string(), 40)]);
        assert_eq!(
            totals.excluded.sorted(),
            vec![("HTML".to_string(), 900), ("Css".to_string(), 300)]
        );
    }

    #[test]
    fn top_is_truncated_and_ties_keep_aggregation_order() {
        let mut totals = LanguageTotals::default();
        let none = excluded(&[]);
        totals.add_repository("a", [("Go", 5), ("C", 5), ("Lua", 9), ("Nix", 1)], &none);

        assert_eq!(
            totals.top(3),
            vec![
                ("Lua".to_string(), 9),
                ("Go".to_string(), 5),
                ("C".to_string(), 5),
            ]
        );
    }

    #[test]
    fn equal_bytes_rank_in_payload_order() {
        let payload: LanguageBytes = serde_json::from_str(r#"{"Python": 100, "C": 100}"#).unwrap();
        let mut totals = LanguageTotals::default();
        totals.add_repository("mixed", payload.iter(), &excluded(&[]));

        assert_eq!(
            totals.top(2),
            vec![("Python".to_string(), 100), ("C".to_string(), 100)]
        );
    }

    #[test]
    fn repositories_without_languages_are_not_counted() {
        let mut totals = LanguageTotals::default();
        totals.add_repository("empty", Vec::<(&str, u64)>::new(), &excluded(&[]));
        assert_eq!(totals.repositories, 0);
        assert!(totals.top(6).is_empty());
    }

    #[test]
    fn percent_of_empty_total_is_zero() {
        assert_eq!(percent(10, 0), 0.0);
        assert_eq!(percent(25, 100), 25.0);
    }
}
