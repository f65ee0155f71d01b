mod types;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use std::time::Duration;
pub use types::*;

const USER_AGENT: &str = concat!("github-langs/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const LANGUAGES_TIMEOUT: Duration = Duration::from_secs(15);

// REST pagination limits
const MAX_PER_PAGE: u32 = 100;
const MAX_PAGES: u32 = 50;

const CONTRIBUTIONS_QUERY: &str = r#"
    query($login: String!, $from: DateTime!, $to: DateTime!) {
        user(login: $login) {
            contributionsCollection(from: $from, to: $to) {
                totalCommitContributions
                totalIssueContributions
                totalPullRequestContributions
                totalPullRequestReviewContributions
                contributionCalendar {
                    totalContributions
                    weeks {
                        contributionDays {
                            date
                            contributionCount
                        }
                    }
                }
            }
        }
    }
"#;

/// Thin client over the GitHub REST and GraphQL APIs
pub struct GitHub {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHub {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn rest_get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.header("Authorization", format!("token {}", token)),
            None => request,
        }
    }

    /// Fetch all non-fork, non-archived repositories owned by the user.
    ///
    /// Uses `/user/repos` when a token is configured (private repositories
    /// included), otherwise the public `/users/{username}/repos` listing.
    pub async fn fetch_repositories(&self, username: Option<&str>) -> Result<Vec<Repository>> {
        let endpoint = match (&self.token, username) {
            (Some(_), _) => format!("{}/user/repos", self.api_url),
            (None, Some(username)) => format!("{}/users/{}/repos", self.api_url, username),
            (None, None) => anyhow::bail!("A username is required without a token"),
        };
        info!(
            "Fetching repositories for user: {}",
            username.unwrap_or("<authenticated user>")
        );

        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let batch = match self.fetch_repository_page(&endpoint, page).await {
                Ok(batch) => batch,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    warn!("Error fetching repositories page {}: {:#}", page, e);
                    break;
                }
            };
            if batch.is_empty() {
                break;
            }

            let fetched = batch.len();
            let active: Vec<_> = batch
                .into_iter()
                .filter(|repo| !repo.fork && !repo.archived)
                .collect();
            info!(
                "Page {}: {} repos, {} non-forks (active)",
                page,
                fetched,
                active.len()
            );
            repos.extend(active);

            page += 1;
            if page > MAX_PAGES {
                warn!("Reached maximum page limit ({})", MAX_PAGES);
                break;
            }
        }

        info!("Total repositories found: {}", repos.len());
        Ok(repos)
    }

    async fn fetch_repository_page(&self, endpoint: &str, page: u32) -> Result<Vec<Repository>> {
        debug!("Fetching repositories page {}", page);
        let repos = self
            .rest_get(endpoint)
            .query(&[
                ("per_page", MAX_PER_PAGE.to_string()),
                ("page", page.to_string()),
                ("type", "owner".to_string()),
                ("sort", "updated".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("Invalid repositories page {}", page))?;
        Ok(repos)
    }

    /// Fetch language byte counts for a repository.
    ///
    /// Failures are logged and yield an empty map, so one broken repository
    /// does not abort the whole aggregation.
    pub async fn fetch_languages(&self, repo: &Repository) -> LanguageBytes {
        self.try_fetch_languages(repo).await.unwrap_or_else(|e| {
            warn!("Could not fetch languages for {}: {:#}", repo.name, e);
            LanguageBytes::default()
        })
    }

    async fn try_fetch_languages(&self, repo: &Repository) -> Result<LanguageBytes> {
        let languages = self
            .rest_get(&repo.languages_url)
            .timeout(LANGUAGES_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(languages)
    }

    /// Login of the user owning the token
    pub async fn fetch_viewer_login(&self) -> Result<String> {
        let data: ViewerData = self
            .execute_query("query { viewer { login } }", serde_json::json!({}))
            .await?;
        Ok(data.viewer.login)
    }

    /// Account creation timestamp of `login`
    pub async fn fetch_created_at(&self, login: &str) -> Result<DateTime<Utc>> {
        let query = r#"
            query($login: String!) {
                user(login: $login) {
                    createdAt
                }
            }
        "#;
        let data: UserData<UserCreation> = self
            .execute_query(query, serde_json::json!({ "login": login }))
            .await?;
        let user = data
            .user
            .with_context(|| format!("User '{}' not found", login))?;
        Ok(user.created_at)
    }

    /// Contributions collection of `login` between `from` and `to`
    pub async fn fetch_contributions(
        &self,
        login: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ContributionsCollection> {
        debug!("Fetching contributions for {} from {} to {}", login, from, to);
        let variables = serde_json::json!({
            "login": login,
            "from": from.to_rfc3339(),
            "to": to.to_rfc3339(),
        });
        let data: UserData<UserContributions> =
            self.execute_query(CONTRIBUTIONS_QUERY, variables).await?;
        let user = data
            .user
            .with_context(|| format!("User '{}' not found", login))?;
        Ok(user.contributions_collection)
    }

    /// Execute a GraphQL query and return the parsed response
    async fn execute_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let token = self
            .token
            .as_deref()
            .context("The GraphQL API requires a token")?;

        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        debug!("Sending GraphQL request to GitHub API");

        let response: GraphQLResponse<T> = self
            .client
            .post(format!("{}/graphql", self.api_url))
            .header("Authorization", format!("Bearer {}", token))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(errors) = response.errors {
            let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
            anyhow::bail!("GraphQL errors: {}", messages.join(", "));
        }

        response.data.context("No data in response")
    }
}
