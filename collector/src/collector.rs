use crate::api::{Account, Client, QuotaState, Repo, RepoListing, Result};
use crate::record::{languages_field, repo_record, Field, Record, RepoExtras};
use chrono::Utc;
use derive_more::Constructor;
use log::{debug, info, warn};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

/// Below this many remaining calls the collector waits for the quota window to reset.
pub const QUOTA_THRESHOLD: u32 = 500;
/// Extra seconds slept past the reported reset time.
pub const RESET_MARGIN_SECS: i64 = 5;

/// Records gathered for one seed account.
#[derive(Constructor, Debug, Clone, PartialEq)]
pub struct Collection {
    /// Login as reported by the service, whatever the case the seed was typed in.
    pub login: String,
    pub records: Vec<Record>,
}

/// Walks paginated collections of a remote service while keeping clear of its request quota.
///
/// A single collector is meant to serve a whole run: the last quota it observed stays with it
/// from one seed account to the next.
pub struct PaginatedCollector<CLIENT: Client> {
    client: Arc<CLIENT>,
    per_page: u32,
    quota: Option<QuotaState>,
}

impl<CLIENT: Client> PaginatedCollector<CLIENT> {
    pub fn new(client: CLIENT, per_page: u32) -> Self {
        Self::with_client(Arc::new(client), per_page)
    }

    pub fn with_client(client: Arc<CLIENT>, per_page: u32) -> Self {
        let per_page = per_page.clamp(1, CLIENT::MAX_PAGE_SIZE);
        PaginatedCollector {
            client,
            per_page,
            quota: None,
        }
    }

    pub fn client(&self) -> &CLIENT {
        &self.client
    }

    /// Quota reported by the latest `check_quota`.
    pub fn quota(&self) -> Option<QuotaState> {
        self.quota
    }

    /// Refreshes the quota and, when it runs low, sleeps until the next window.
    pub async fn check_quota(&mut self) -> Result<()> {
        let quota = self.client.rate_limit().await?;
        self.quota = Some(quota);
        match time_to_wait(&quota, Utc::now().timestamp()) {
            Some(delay) => {
                info!(
                    "{} remaining API calls. Waiting for {} seconds.",
                    quota.remaining,
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
            }
            None => debug!("Remaining limit {}. Not waiting.", quota.remaining),
        }
        Ok(())
    }

    /// Records of the accounts followed by `seed`, in the order the service lists them.
    ///
    /// With `extended` every followed account is directly followed by the records of the
    /// accounts it follows itself.
    pub async fn collect(&mut self, seed: &str, extended: bool) -> Result<Collection> {
        self.check_quota().await?;
        let seed = self.client.account(seed).await?;
        let mut records = Vec::new();
        let mut paginator = Paginator::new(CLIENT::FIRST_PAGE_NUMBER, self.per_page, Some(seed.following));
        while let Some(page) = paginator.next_page() {
            let logins = self.following_page(&seed.login, &page).await?;
            paginator.observe(&page, logins.len());
            for login in logins {
                let account = self.client.account(&login).await?;
                records.push(Record::from(&account));
                if extended {
                    let nested = self.following_accounts(&account).await?;
                    debug!("{} follows {} accounts", account.login, nested.len());
                    records.extend(nested.iter().map(Record::from));
                }
            }
        }
        info!("Collected {} accounts followed by {}", records.len(), seed.login);
        Ok(Collection::new(seed.login, records))
    }

    /// Records of the repositories owned or starred by `seed`.
    pub async fn collect_repos(&mut self, seed: &str, listing: RepoListing) -> Result<Collection> {
        self.check_quota().await?;
        let seed = self.client.account(seed).await?;
        let total = match listing {
            RepoListing::Owned => Some(seed.public_repos),
            RepoListing::Starred => None,
        };
        let mut records = Vec::new();
        let mut paginator = Paginator::new(CLIENT::FIRST_PAGE_NUMBER, self.per_page, total);
        while let Some(page) = paginator.next_page() {
            self.check_quota().await?;
            let repos = self
                .client
                .repos(listing, &seed.login, page.page_no, page.page_size)
                .await?;
            debug!("Page {} of {} {}: {} items", page.page_no, seed.login, listing, repos.len());
            paginator.observe(&page, repos.len());
            for repo in repos {
                let extras = self.repo_extras(&repo).await;
                records.push(repo_record(&seed.login, &repo, extras));
            }
        }
        info!("Collected {} {} of {}", records.len(), listing, seed.login);
        Ok(Collection::new(seed.login, records))
    }

    async fn following_page(&mut self, login: &str, page: &Page) -> Result<Vec<String>> {
        self.check_quota().await?;
        let logins = self.client.following(login, page.page_no, page.page_size).await?;
        debug!("Page {} of {} following: {} items", page.page_no, login, logins.len());
        Ok(logins)
    }

    async fn following_accounts(&mut self, account: &Account) -> Result<Vec<Account>> {
        let mut accounts = Vec::new();
        let mut paginator = Paginator::new(CLIENT::FIRST_PAGE_NUMBER, self.per_page, Some(account.following));
        while let Some(page) = paginator.next_page() {
            let logins = self.following_page(&account.login, &page).await?;
            paginator.observe(&page, logins.len());
            for login in logins {
                accounts.push(self.client.account(&login).await?);
            }
        }
        Ok(accounts)
    }

    async fn repo_extras(&self, repo: &Repo) -> RepoExtras {
        let client = &self.client;
        RepoExtras {
            subscribers: fail_soft(repo, "subscribers", client.subscribers(repo).await.map(Field::value)),
            license: fail_soft(repo, "license", client.license(repo).await.map(Field::optional)),
            languages: fail_soft(repo, "languages", client.languages(repo).await.map(languages_field)),
            contributors: fail_soft(repo, "contributors", client.contributors(repo).await.map(Field::value)),
        }
    }
}

fn fail_soft<E: Display>(repo: &Repo, field: &str, result: std::result::Result<Field, E>) -> Field {
    result.unwrap_or_else(|err| {
        warn!("Failed to get {} of {}: {}", field, repo.full_name(), err);
        Field::Missing
    })
}

/// How long to sleep before the next call, `None` when the quota still allows it.
pub fn time_to_wait(quota: &QuotaState, now: i64) -> Option<Duration> {
    if quota.remaining >= QUOTA_THRESHOLD {
        return None;
    }
    let wait = quota.reset - now + RESET_MARGIN_SECS;
    if wait <= 0 {
        return None;
    }
    Some(Duration::from_secs(wait as u64))
}

#[derive(Constructor, Debug, PartialEq)]
struct Page {
    page_no: u32,
    page_size: u32,
}

/// Hands out page numbers until the reported total is covered or the service runs dry.
#[derive(Constructor)]
struct Paginator {
    page_no: u32,
    page_size: u32,
    remaining: Option<u32>,
}

impl Paginator {
    fn next_page(&mut self) -> Option<Page> {
        match self.remaining {
            Some(0) => None,
            _ => {
                let page = Page::new(self.page_no, self.page_size);
                self.page_no += 1;
                Some(page)
            }
        }
    }

    /// Accounts for a fetched page. A short page means the collection ended early.
    fn observe(&mut self, page: &Page, items: usize) {
        if items < page.page_size as usize {
            self.remaining = Some(0);
            return;
        }
        self.remaining = self.remaining.map(|remaining| remaining.saturating_sub(page.page_size));
    }
}
