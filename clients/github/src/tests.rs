use super::*;
use wiremock::matchers::{header as header_matcher, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GithubClient {
    GithubClientBuilder::default()
        .with_github_url(server.uri())
        .build()
        .unwrap()
}

fn repo(owner: &str, name: &str) -> Repo {
    Repo {
        owner: owner.to_string(),
        name: name.to_string(),
        ..Repo::default()
    }
}

#[test]
fn last_page_test() {
    let link = r#"<https://api.github.com/repositories/1/contributors?per_page=1&anon=true&page=2>; rel="next", <https://api.github.com/repositories/1/contributors?per_page=1&anon=true&page=42>; rel="last""#;
    assert_eq!(last_page(link), Some(42));
    let first_only = r#"<https://api.github.com/repositories/1/contributors?page=2>; rel="next""#;
    assert_eq!(last_page(first_only), None);
    assert_eq!(last_page(""), None);
}

#[tokio::test]
async fn rate_limit_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .and(header_matcher("Accept", "application/vnd.github.v3+json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ratelimit-limit", "5000")
                .insert_header("x-ratelimit-remaining", "4321")
                .insert_header("x-ratelimit-reset", "1700000000")
                .set_body_raw(
                    r#"{
                        "resources": {
                            "core": { "limit": 5000, "remaining": 4321, "reset": 1700000000, "used": 679 },
                            "search": { "limit": 30, "remaining": 30, "reset": 1700000000, "used": 0 }
                        },
                        "rate": { "limit": 5000, "remaining": 4321, "reset": 1700000000, "used": 679 }
                    }"#,
                    "application/json",
                ),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let quota = client.rate_limit().await.unwrap();

    assert_eq!(quota, QuotaState::new(5000, 4321, 1700000000));
    assert_eq!(client.last_observed_quota().await, Some(quota));
}

#[tokio::test]
async fn account_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/bob"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{
                "login": "bob",
                "id": 42,
                "html_url": "https://github.com/bob",
                "type": "User",
                "site_admin": false,
                "name": "Bob",
                "company": null,
                "blog": "",
                "location": "Lyon",
                "email": null,
                "bio": null,
                "twitter_username": null,
                "public_repos": 3,
                "public_gists": 1,
                "followers": 10,
                "following": 2,
                "created_at": "2011-01-25T18:44:36Z",
                "updated_at": "2022-05-01T08:00:00Z"
            }"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let account = client(&server).account("bob").await.unwrap();

    assert_eq!(account.login, "bob");
    assert_eq!(account.id, 42);
    assert_eq!(account.kind.as_deref(), Some("User"));
    assert_eq!(account.bio, None);
    assert_eq!(account.following, 2);
    assert_eq!(
        account.created_at.map(|date| date.timestamp()),
        Some(1295981076),
    );
}

#[tokio::test]
async fn following_page_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/alice/following"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{ "login": "bob", "id": 1 }, { "login": "carol", "id": 2 }]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let logins = client(&server).following("alice", 2, 50).await.unwrap();

    assert_eq!(logins, vec!["bob", "carol"]);
}

#[tokio::test]
async fn starred_under_base_path_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/users/alice/starred"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{
                "name": "tool",
                "owner": { "login": "bob" },
                "html_url": "https://github.com/bob/tool",
                "description": null,
                "stargazers_count": 12,
                "watchers_count": 12,
                "forks_count": 1,
                "fork": false,
                "language": "Rust",
                "created_at": "2020-01-01T00:00:00Z",
                "pushed_at": null,
                "topics": ["cli"]
            }]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = GithubClientBuilder::default()
        .with_github_url(format!("{}/api/v3", server.uri()))
        .build()
        .unwrap();
    let repos = client.repos(RepoListing::Starred, "alice", 1, 100).await.unwrap();

    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].full_name(), "bob/tool");
    assert_eq!(repos[0].pushed_at, None);
    assert_eq!(repos[0].topics, vec!["cli"]);
}

#[tokio::test]
async fn contributors_count_test() {
    let server = MockServer::start().await;
    let link = format!(
        r#"<{0}/repositories/1/contributors?per_page=1&anon=true&page=2>; rel="next", <{0}/repositories/1/contributors?per_page=1&anon=true&page=17>; rel="last""#,
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/repos/bob/busy/contributors"))
        .and(query_param("per_page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link.as_str())
                .set_body_raw(r#"[{ "login": "bob", "contributions": 100 }]"#, "application/json"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/bob/solo/contributors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"[{ "login": "bob", "contributions": 3 }]"#, "application/json"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/bob/empty/contributors"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client(&server);

    assert_eq!(client.contributors(&repo("bob", "busy")).await.unwrap(), 17);
    assert_eq!(client.contributors(&repo("bob", "solo")).await.unwrap(), 1);
    assert_eq!(client.contributors(&repo("bob", "empty")).await.unwrap(), 0);
}

#[tokio::test]
async fn missing_license_is_error_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/bob/tool/license"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(r#"{ "message": "Not Found" }"#, "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/bob/lib/license"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{ "name": "LICENSE", "license": { "key": "mit", "name": "MIT License" } }"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = client(&server);

    assert!(client.license(&repo("bob", "tool")).await.is_err());
    assert_eq!(
        client.license(&repo("bob", "lib")).await.unwrap().as_deref(),
        Some("MIT License")
    );
}
