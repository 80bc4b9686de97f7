use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use derive_more::Constructor;
use strum_macros::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error: {0}")]
    Error(&'static str),
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Request budget of the remote service, as last reported by it.
#[derive(Constructor, Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    pub limit: u32,
    pub remaining: u32,
    /// Epoch seconds at which `remaining` goes back to `limit`.
    pub reset: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    pub login: String,
    pub html_url: String,
    pub bio: Option<String>,
    pub blog: Option<String>,
    pub company: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub email: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub id: u64,
    pub location: Option<String>,
    pub name: Option<String>,
    pub public_gists: u32,
    pub public_repos: u32,
    pub kind: Option<String>,
    pub site_admin: bool,
    pub twitter_username: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Repo {
    pub owner: String,
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub stargazers_count: u32,
    pub watchers_count: u32,
    pub forks_count: u32,
    pub fork: bool,
    pub language: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub topics: Vec<String>,
}

impl Repo {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Repository collections that can be listed for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RepoListing {
    #[strum(serialize = "repos")]
    Owned,
    #[strum(serialize = "starred")]
    Starred,
}

#[async_trait]
pub trait Client: Send + Sync {
    const FIRST_PAGE_NUMBER: u32 = 1;
    const MAX_PAGE_SIZE: u32 = 100;

    async fn rate_limit(&self) -> Result<QuotaState>;

    /// Login of the account the client is authenticated as.
    async fn authenticated_login(&self) -> Result<String>;

    async fn account(&self, login: &str) -> Result<Account>;

    /// Logins of the accounts followed by `login`.
    async fn following(&self, login: &str, page: u32, per_page: u32) -> Result<Vec<String>>;

    async fn repos(&self, listing: RepoListing, login: &str, page: u32, per_page: u32) -> Result<Vec<Repo>>;

    async fn subscribers(&self, repo: &Repo) -> Result<u32>;

    /// License name, `None` when the repository declares none.
    async fn license(&self, repo: &Repo) -> Result<Option<String>>;

    /// Bytes of code per language.
    async fn languages(&self, repo: &Repo) -> Result<Vec<(String, u64)>>;

    async fn contributors(&self, repo: &Repo) -> Result<u32>;
}
