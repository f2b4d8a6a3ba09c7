//! Integration tests for the guarded profile screen.


use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fixtures::{make_token, now_secs, profile_json, write_session};

#[tokio::test]
async fn test_profile_redirects_unauthenticated_to_login() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    cargo_bin_cmd!("lexid")
        .env("LEXID_HOME", home.path())
        .env("LEXID_API_BASE_URL", server.uri())
        .arg("profile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"))
        .stderr(predicate::str::contains("lexid login --return-to /profile"));
}

#[tokio::test]
async fn test_profile_renders_when_authenticated() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();
    write_session(
        home.path(),
        &make_token("ana@example.com", now_secs() + 3600),
        "r1",
    );

    Mock::given(method("GET"))
        .and(path("/citizens/find-by-email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("ana@example.com")))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("lexid")
        .env("LEXID_HOME", home.path())
        .env("LEXID_API_BASE_URL", server.uri())
        .arg("profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("Citizen profile"))
        .stdout(predicate::str::contains("Ana Pereira"))
        .stdout(predicate::str::contains("Porto"));
}

#[tokio::test]
async fn test_profile_with_dead_session_clears_store_and_redirects() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();
    write_session(
        home.path(),
        &make_token("ana@example.com", now_secs() - 10),
        "r1",
    );

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "message": "Refresh token expired" })),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("lexid")
        .env("LEXID_HOME", home.path())
        .env("LEXID_API_BASE_URL", server.uri())
        .arg("profile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("lexid login --return-to /profile"));

    // The failed refresh wiped the stored credentials.
    assert!(!home.path().join("session.json").exists());
}
