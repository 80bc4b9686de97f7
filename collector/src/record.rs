use crate::api::{Account, Repo};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt::Display;

pub const MISSING: &str = "NA";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const ACCOUNT_FIELDS: [&str; 18] = [
    "username",
    "url",
    "bio",
    "blog",
    "company",
    "created_at",
    "email",
    "followers",
    "following",
    "id",
    "location",
    "name",
    "public_gists",
    "public_repos",
    "type",
    "site_admin",
    "twitter_username",
    "updated_at",
];

pub const REPO_FIELDS: [&str; 17] = [
    "User",
    "Owner",
    "Name",
    "URL",
    "Description",
    "Stars",
    "Watchers",
    "Subscribers",
    "Forks",
    "Fork",
    "License",
    "Language",
    "Languages",
    "Creation date",
    "Modification date",
    "Contributors",
    "Topics",
];

/// Value of a record field. `Missing` stands for anything that could not be
/// extracted, or that the remote side left empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Value(String),
    Missing,
}

impl Field {
    pub fn value(value: impl Display) -> Self {
        Field::Value(value.to_string())
    }

    pub fn optional<T: Display>(value: Option<T>) -> Self {
        value.map(Field::value).unwrap_or(Field::Missing)
    }

    pub fn date(date: Option<DateTime<Utc>>) -> Self {
        Field::optional(date.map(|date| date.format(DATE_FORMAT)))
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Value(value) => f.write_str(value),
            Field::Missing => f.write_str(MISSING),
        }
    }
}

/// Ordered named fields of one remote entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<(&'static str, Field)>,
}

impl Record {
    pub fn with(mut self, name: &'static str, field: Field) -> Self {
        self.fields.push((name, field));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(key, _)| *key == name).map(|(_, field)| field)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn values(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().map(|(_, field)| field)
    }
}

impl From<&Account> for Record {
    fn from(account: &Account) -> Self {
        Record::default()
            .with("username", Field::value(&account.login))
            .with("url", Field::value(&account.html_url))
            .with("bio", Field::optional(account.bio.as_ref()))
            .with("blog", Field::optional(account.blog.as_ref()))
            .with("company", Field::optional(account.company.as_ref()))
            .with("created_at", Field::date(account.created_at))
            .with("email", Field::optional(account.email.as_ref()))
            .with("followers", Field::value(account.followers))
            .with("following", Field::value(account.following))
            .with("id", Field::value(account.id))
            .with("location", Field::optional(account.location.as_ref()))
            .with("name", Field::optional(account.name.as_ref()))
            .with("public_gists", Field::value(account.public_gists))
            .with("public_repos", Field::value(account.public_repos))
            .with("type", Field::optional(account.kind.as_ref()))
            .with("site_admin", Field::value(account.site_admin))
            .with("twitter_username", Field::optional(account.twitter_username.as_ref()))
            .with("updated_at", Field::date(account.updated_at))
    }
}

/// Repository fields needing one extra request each. Any of them may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoExtras {
    pub subscribers: Field,
    pub license: Field,
    pub languages: Field,
    pub contributors: Field,
}

impl RepoExtras {
    pub fn missing() -> Self {
        RepoExtras {
            subscribers: Field::Missing,
            license: Field::Missing,
            languages: Field::Missing,
            contributors: Field::Missing,
        }
    }
}

pub fn repo_record(user: &str, repo: &Repo, extras: RepoExtras) -> Record {
    let topics = if repo.topics.is_empty() {
        Field::Missing
    } else {
        Field::value(repo.topics.join(","))
    };
    Record::default()
        .with("User", Field::value(user))
        .with("Owner", Field::value(&repo.owner))
        .with("Name", Field::value(&repo.name))
        .with("URL", Field::value(&repo.html_url))
        .with("Description", Field::optional(repo.description.as_ref()))
        .with("Stars", Field::value(repo.stargazers_count))
        .with("Watchers", Field::value(repo.watchers_count))
        .with("Subscribers", extras.subscribers)
        .with("Forks", Field::value(repo.forks_count))
        .with("Fork", Field::value(repo.fork))
        .with("License", extras.license)
        .with("Language", Field::optional(repo.language.as_ref()))
        .with("Languages", extras.languages)
        .with("Creation date", Field::date(repo.created_at))
        .with("Modification date", Field::date(repo.pushed_at))
        .with("Contributors", extras.contributors)
        .with("Topics", topics)
}

/// Renders a language breakdown largest first, e.g. `Rust:1200,Shell:80`.
pub fn languages_field(mut languages: Vec<(String, u64)>) -> Field {
    if languages.is_empty() {
        return Field::Missing;
    }
    languages.sort_by(|(a_name, a_bytes), (b_name, b_bytes)| b_bytes.cmp(a_bytes).then_with(|| a_name.cmp(b_name)));
    let rendered: Vec<String> = languages
        .into_iter()
        .map(|(language, bytes)| format!("{}:{}", language, bytes))
        .collect();
    Field::value(rendered.join(","))
}

/// Keeps the first occurrence of every structurally identical record.
pub fn drop_duplicates(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    records.into_iter().filter(|record| seen.insert(record.clone())).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ExportKind {
    #[strum(serialize = "following")]
    Following,
    #[strum(serialize = "following_extended")]
    FollowingExtended,
    #[strum(serialize = "starred-repos")]
    Starred,
    #[strum(serialize = "repos")]
    Repos,
}

impl ExportKind {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            ExportKind::Following | ExportKind::FollowingExtended => &ACCOUNT_FIELDS,
            ExportKind::Starred | ExportKind::Repos => &REPO_FIELDS,
        }
    }
}

/// Records of one seed account, written together to one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBatch {
    pub account: String,
    pub kind: ExportKind,
    pub generated_at: i64,
    pub records: Vec<Record>,
}

impl ExportBatch {
    pub fn new(account: impl Into<String>, kind: ExportKind, records: Vec<Record>) -> Self {
        ExportBatch {
            account: account.into(),
            kind,
            generated_at: Utc::now().timestamp(),
            records,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_{}-{}.csv", self.generated_at, self.account, self.kind)
    }
}

/// Tests

#[cfg(test)]
fn account(login: &str, followers: u32) -> Account {
    Account {
        login: login.to_string(),
        html_url: format!("https://github.com/{}", login),
        followers,
        ..Account::default()
    }
}

#[test]
fn account_record_follows_header_test() {
    let record = Record::from(&account("bob", 3));
    assert_eq!(record.names().collect::<Vec<_>>(), ACCOUNT_FIELDS.to_vec());
    assert_eq!(record.get("username"), Some(&Field::value("bob")));
    assert_eq!(record.get("bio"), Some(&Field::Missing));
}

#[test]
fn blank_blog_is_kept_test() {
    let blank = Account {
        blog: Some(String::new()),
        ..account("bob", 3)
    };
    assert_eq!(Record::from(&blank).get("blog"), Some(&Field::value("")));
    assert_eq!(Record::from(&blank).get("blog").map(ToString::to_string), Some(String::new()));
    assert_eq!(Record::from(&account("bob", 3)).get("blog"), Some(&Field::Missing));
}

#[test]
fn repo_record_follows_header_test() {
    let repo = Repo {
        owner: "alice".to_string(),
        name: "tool".to_string(),
        topics: vec!["cli".to_string(), "rust".to_string()],
        ..Repo::default()
    };
    let record = repo_record("alice", &repo, RepoExtras::missing());
    assert_eq!(record.names().collect::<Vec<_>>(), REPO_FIELDS.to_vec());
    assert_eq!(record.get("License").map(ToString::to_string), Some("NA".to_string()));
    assert_eq!(record.get("Topics"), Some(&Field::value("cli,rust")));
}

#[test]
fn date_field_format_test() {
    let date = DateTime::parse_from_rfc3339("2011-01-25T18:44:36Z").map(|date| date.with_timezone(&Utc));
    assert_eq!(Field::date(date.ok()), Field::value("2011-01-25 18:44:36"));
    assert_eq!(Field::date(None), Field::Missing);
}

#[test]
fn languages_field_test() {
    let languages = vec![("Shell".to_string(), 80), ("Rust".to_string(), 1200), ("C".to_string(), 80)];
    assert_eq!(languages_field(languages), Field::value("Rust:1200,C:80,Shell:80"));
    assert_eq!(languages_field(Vec::new()), Field::Missing);
}

#[test]
fn drop_duplicates_test() {
    let bob = Record::from(&account("bob", 3));
    let carol = Record::from(&account("carol", 1));
    let records = vec![bob.clone(), carol.clone(), bob.clone()];
    assert_eq!(drop_duplicates(records), vec![bob.clone(), carol]);

    let drifted = Record::from(&account("bob", 4));
    assert_eq!(drop_duplicates(vec![bob.clone(), drifted.clone()]), vec![bob, drifted]);
}

#[test]
fn file_name_test() {
    let mut batch = ExportBatch::new("alice", ExportKind::FollowingExtended, Vec::new());
    batch.generated_at = 1700000000;
    assert_eq!(batch.file_name(), "1700000000_alice-following_extended.csv");
    batch.kind = ExportKind::Following;
    assert_eq!(batch.file_name(), "1700000000_alice-following.csv");
}
