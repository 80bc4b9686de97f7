use chrono::{DateTime, Utc};
use collector::api::{Account, QuotaState, Repo};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize, Debug)]
pub struct User {
    pub login: String,
    pub html_url: String,
    pub bio: Option<String>,
    pub blog: Option<String>,
    pub company: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub email: Option<String>,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub id: u64,
    pub location: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub public_gists: u32,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub site_admin: bool,
    pub twitter_username: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for Account {
    fn from(user: User) -> Self {
        Account {
            login: user.login,
            html_url: user.html_url,
            bio: user.bio,
            blog: user.blog,
            company: user.company,
            created_at: user.created_at,
            email: user.email,
            followers: user.followers,
            following: user.following,
            id: user.id,
            location: user.location,
            name: user.name,
            public_gists: user.public_gists,
            public_repos: user.public_repos,
            kind: user.kind,
            site_admin: user.site_admin,
            twitter_username: user.twitter_username,
            updated_at: user.updated_at,
        }
    }
}

/// Entry of a user listing, which carries far fewer fields than `User`.
#[derive(Deserialize, Debug)]
pub struct SimpleUser {
    pub login: String,
}

#[derive(Deserialize, Debug)]
pub struct RepoBody {
    pub name: String,
    pub owner: RepoOwner,
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub watchers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub fork: bool,
    pub language: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct RepoOwner {
    pub login: String,
}

impl From<RepoBody> for Repo {
    fn from(repo: RepoBody) -> Self {
        Repo {
            owner: repo.owner.login,
            name: repo.name,
            html_url: repo.html_url,
            description: repo.description,
            stargazers_count: repo.stargazers_count,
            watchers_count: repo.watchers_count,
            forks_count: repo.forks_count,
            fork: repo.fork,
            language: repo.language,
            created_at: repo.created_at,
            pushed_at: repo.pushed_at,
            topics: repo.topics,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct RepoDetails {
    #[serde(default)]
    pub subscribers_count: u32,
}

#[derive(Deserialize, Debug)]
pub struct RepoLicense {
    pub license: Option<License>,
}

#[derive(Deserialize, Debug)]
pub struct License {
    pub name: String,
}

pub type Languages = HashMap<String, u64>;

#[derive(Deserialize, Debug)]
pub struct RateLimitBody {
    pub resources: RateLimitResources,
}

#[derive(Deserialize, Debug)]
pub struct RateLimitResources {
    pub core: RateLimitResource,
}

#[derive(Deserialize, Debug)]
pub struct RateLimitResource {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}

impl From<RateLimitResource> for QuotaState {
    fn from(resource: RateLimitResource) -> Self {
        QuotaState::new(resource.limit, resource.remaining, resource.reset)
    }
}
