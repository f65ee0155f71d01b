use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

/// Repository as returned by the REST `repos` listings
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    pub languages_url: String,
}

/// Bytes per language of one repository, in the order the API lists them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct LanguageBytes(pub Vec<(String, u64)>);

impl From<serde_json::Map<String, serde_json::Value>> for LanguageBytes {
    fn from(payload: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(
            payload
                .into_iter()
                .filter_map(|(language, bytes)| Some((language, bytes.as_u64()?)))
                .collect(),
        )
    }
}

impl LanguageBytes {
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.0.iter().map(|(language, bytes)| (language.as_str(), *bytes))
    }
}

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
pub struct Viewer {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct UserData<T> {
    pub user: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreation {
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContributions {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    #[serde(flatten)]
    pub totals: ContributionTotals,
    pub contribution_calendar: ContributionCalendar,
}

/// Per-type contribution counts of a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionTotals {
    pub total_commit_contributions: u64,
    pub total_issue_contributions: u64,
    pub total_pull_request_contributions: u64,
    pub total_pull_request_review_contributions: u64,
}

impl ContributionTotals {
    pub fn all_types(&self) -> u64 {
        self.total_commit_contributions
            + self.total_issue_contributions
            + self.total_pull_request_contributions
            + self.total_pull_request_review_contributions
    }
}

impl std::ops::AddAssign for ContributionTotals {
    fn add_assign(&mut self, other: Self) {
        self.total_commit_contributions += other.total_commit_contributions;
        self.total_issue_contributions += other.total_issue_contributions;
        self.total_pull_request_contributions += other.total_pull_request_contributions;
        self.total_pull_request_review_contributions +=
            other.total_pull_request_review_contributions;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<Week>,
}

impl ContributionCalendar {
    /// All days of the calendar, flattened in week order
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.weeks
            .iter()
            .flat_map(|week| week.contribution_days.iter())
            .map(|day| (day.date, day.contribution_count))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub contribution_count: u32,
}
