use async_trait::async_trait;
use collector::api::{Account, Client, QuotaState, Repo, RepoListing, Result};
use log::debug;
use reqwest::header;
use reqwest::Response;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

mod builder;
mod payload;
mod quota;

pub use builder::GithubClientBuilder;
pub use quota::QuotaTracker;

pub struct GithubClient {
    client: reqwest::Client,
    github_url: Url,
    quota: QuotaTracker,
}

impl GithubClient {
    /// Quota announced by the latest response headers.
    pub async fn last_observed_quota(&self) -> Option<QuotaState> {
        self.quota.last_observed().await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.github_url.clone();
        url.path_segments_mut()
            .map_err(|_| collector::api::Error::Error("API URL cannot be used as a base URL."))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<Response> {
        debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        self.quota.observe(response.headers()).await;
        Ok(response.error_for_status()?)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let response = self.get(url, query).await?;
        Ok(response.json::<T>().await?)
    }
}

fn page_query(page: u32, per_page: u32) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("per_page", per_page.to_string())]
}

/// Page number of the `rel="last"` entry of a `Link` header.
fn last_page(link: &str) -> Option<u32> {
    link.split(',')
        .find(|entry| entry.contains("rel=\"last\""))
        .and_then(|entry| {
            let start = entry.find('<')?;
            let end = entry.find('>')?;
            entry.get(start + 1..end)
        })
        .and_then(|url| Url::parse(url).ok())
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, page)| page.parse().ok())
        })
}

#[async_trait]
impl Client for GithubClient {
    async fn rate_limit(&self) -> Result<QuotaState> {
        let body = self.get_json::<payload::RateLimitBody>(&["rate_limit"], &[]).await?;
        Ok(body.resources.core.into())
    }

    async fn authenticated_login(&self) -> Result<String> {
        let user = self.get_json::<payload::User>(&["user"], &[]).await?;
        Ok(user.login)
    }

    async fn account(&self, login: &str) -> Result<Account> {
        let user = self.get_json::<payload::User>(&["users", login], &[]).await?;
        Ok(user.into())
    }

    async fn following(&self, login: &str, page: u32, per_page: u32) -> Result<Vec<String>> {
        let users = self
            .get_json::<Vec<payload::SimpleUser>>(&["users", login, "following"], &page_query(page, per_page))
            .await?;
        Ok(users.into_iter().map(|user| user.login).collect())
    }

    async fn repos(&self, listing: RepoListing, login: &str, page: u32, per_page: u32) -> Result<Vec<Repo>> {
        let listing = listing.to_string();
        let repos = self
            .get_json::<Vec<payload::RepoBody>>(&["users", login, listing.as_str()], &page_query(page, per_page))
            .await?;
        Ok(repos.into_iter().map(Repo::from).collect())
    }

    async fn subscribers(&self, repo: &Repo) -> Result<u32> {
        let details = self
            .get_json::<payload::RepoDetails>(&["repos", repo.owner.as_str(), repo.name.as_str()], &[])
            .await?;
        Ok(details.subscribers_count)
    }

    async fn license(&self, repo: &Repo) -> Result<Option<String>> {
        let license = self
            .get_json::<payload::RepoLicense>(&["repos", repo.owner.as_str(), repo.name.as_str(), "license"], &[])
            .await?;
        Ok(license.license.map(|license| license.name))
    }

    async fn languages(&self, repo: &Repo) -> Result<Vec<(String, u64)>> {
        let languages = self
            .get_json::<payload::Languages>(&["repos", repo.owner.as_str(), repo.name.as_str(), "languages"], &[])
            .await?;
        Ok(languages.into_iter().collect())
    }

    async fn contributors(&self, repo: &Repo) -> Result<u32> {
        let url = self.endpoint(&["repos", repo.owner.as_str(), repo.name.as_str(), "contributors"])?;
        let query = [
            ("per_page", "1".to_string()),
            ("anon", "true".to_string()),
        ];
        let response = self.get(url, &query).await?;
        // Empty repositories answer with no content at all.
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(0);
        }
        let last = response
            .headers()
            .get(header::LINK)
            .and_then(|link| link.to_str().ok())
            .and_then(last_page);
        match last {
            Some(last) => Ok(last),
            None => {
                let contributors = response.json::<Vec<serde::de::IgnoredAny>>().await?;
                Ok(contributors.len() as u32)
            }
        }
    }
}

#[cfg(test)]
mod tests;
