//! Integration tests for the registration screen and its OTP sub-flow.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn message_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({ "message": message }))
}

/// Stdin for the registration prompts, in order: full name, email, phone,
/// language, location, password, confirmation.
fn registration_input(email: &str, extra: &str) -> String {
    format!("Ana Pereira\n{email}\n+15551234567\npt\nPorto\nStr0ng!Pass\nStr0ng!Pass\n{extra}")
}

#[tokio::test]
async fn test_register_with_email_verification() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .and(body_partial_json(serde_json::json!({ "email": "ana@example.com" })))
        .respond_with(message_response(200, "Verification code sent"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mail/confirm"))
        .and(body_partial_json(
            serde_json::json!({ "email": "ana@example.com", "code": "123456" }),
        ))
        .respond_with(message_response(200, "Email verified."))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/citizens/add"))
        .and(body_partial_json(serde_json::json!({
            "fullName": "Ana Pereira",
            "email": "ana@example.com"
        })))
        .respond_with(message_response(200, "Citizen registered successfully."))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("lexid")
        .env("LEXID_HOME", home.path())
        .env("LEXID_API_BASE_URL", server.uri())
        .arg("register")
        .write_stdin(registration_input("ana@example.com", "123456\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Email verified."))
        .stdout(predicate::str::contains("Citizen registered successfully."));

    // Registration does not sign the citizen in.
    assert!(!home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_register_retries_after_wrong_code() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .respond_with(message_response(200, "Verification code sent"))
        .mount(&server)
        .await;
    // First code is rejected, second accepted.
    Mock::given(method("POST"))
        .and(path("/mail/confirm"))
        .respond_with(message_response(200, "Invalid code."))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mail/confirm"))
        .respond_with(message_response(200, "Email verified."))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/citizens/add"))
        .respond_with(message_response(200, "Citizen registered successfully."))
        .mount(&server)
        .await;

    cargo_bin_cmd!("lexid")
        .env("LEXID_HOME", home.path())
        .env("LEXID_API_BASE_URL", server.uri())
        .arg("register")
        .write_stdin(registration_input("ana@example.com", "000000\n123456\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid code."))
        .stdout(predicate::str::contains("Citizen registered successfully."));
}

#[tokio::test]
async fn test_register_skips_otp_when_already_verified() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .respond_with(message_response(200, "Email already verified"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mail/confirm"))
        .respond_with(message_response(200, "Email verified."))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/citizens/add"))
        .respond_with(message_response(200, "Citizen registered successfully."))
        .mount(&server)
        .await;

    // No code on stdin: the flow never asks for one.
    cargo_bin_cmd!("lexid")
        .env("LEXID_HOME", home.path())
        .env("LEXID_API_BASE_URL", server.uri())
        .arg("register")
        .write_stdin(registration_input("ana@example.com", ""))
        .assert()
        .success()
        .stdout(predicate::str::contains("Email already verified."))
        .stdout(predicate::str::contains("Citizen registered successfully."));
}

#[tokio::test]
async fn test_register_phone_only_needs_no_verification() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .respond_with(message_response(200, "Verification code sent"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/citizens/add"))
        .and(body_partial_json(serde_json::json!({ "phoneNumber": "+15551234567" })))
        .respond_with(message_response(200, "Citizen registered successfully."))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("lexid")
        .env("LEXID_HOME", home.path())
        .env("LEXID_API_BASE_URL", server.uri())
        .arg("register")
        .write_stdin(registration_input("", ""))
        .assert()
        .success()
        .stdout(predicate::str::contains("Citizen registered successfully."));
}

#[tokio::test]
async fn test_register_blocked_by_short_password() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/citizens/add"))
        .respond_with(message_response(200, "Citizen registered successfully."))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("lexid")
        .env("LEXID_HOME", home.path())
        .env("LEXID_API_BASE_URL", server.uri())
        .arg("register")
        .write_stdin("Ana Pereira\n\n+15551234567\npt\nPorto\nSh0rt!\nSh0rt!\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
}

#[tokio::test]
async fn test_register_blocked_without_contact() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    cargo_bin_cmd!("lexid")
        .env("LEXID_HOME", home.path())
        .env("LEXID_API_BASE_URL", server.uri())
        .arg("register")
        .write_stdin("Ana Pereira\n\n\npt\nPorto\nStr0ng!Pass\nStr0ng!Pass\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("email address or a phone number"));
}
