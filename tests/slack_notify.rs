//! Transport tests for the Slack webhook client.

use signalman::context::RunContext;
use signalman::slack::{self, SlackConfig};
use signalman::ErrorCode;

fn config(url: String) -> SlackConfig {
    SlackConfig {
        start_time: "1000".to_string(),
        workflow_name: "Deploy".to_string(),
        workflow_success: "1".to_string(),
        app_name: "orders-api".to_string(),
        github_url: "https://github.com".to_string(),
        service_url: "https://orders.example.com".to_string(),
        image_name: "registry.example.com/orders".to_string(),
        image_tag: "1.4.0".to_string(),
        webhook_url: url,
        dry_run: false,
    }
}

fn ctx() -> RunContext {
    RunContext {
        run_id: 777,
        repository: "octocat/hello-world".to_string(),
    }
}

#[test]
fn notify_posts_the_message_as_json_text() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/webhook")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Regex(
            r#""text":"\*Deploy\* workflow in \*orders-api\*"#.to_string(),
        ))
        .with_status(200)
        .create();

    let cfg = config(format!("{}/webhook", server.url()));
    let receipt = slack::notify(&cfg, &ctx()).expect("notify succeeds");

    assert!(receipt.delivered);
    // The full message shape is covered by the compose_message unit tests.
    mock.assert();
}

#[test]
fn webhook_rejection_includes_code_status_text_and_body() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/webhook")
        .with_status(404)
        .with_body("no_service")
        .create();

    let cfg = config(format!("{}/webhook", server.url()));
    let err = slack::notify(&cfg, &ctx()).expect_err("404 must fail");

    assert_eq!(err.code, ErrorCode::TransportStatus);
    assert_eq!(
        err.message,
        "Failed to push to Slack: 404 Not Found - no_service"
    );
}

#[test]
fn dry_run_sends_nothing() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/webhook").expect(0).create();

    let mut cfg = config(format!("{}/webhook", server.url()));
    cfg.dry_run = true;

    let receipt = slack::notify(&cfg, &ctx()).expect("dry run succeeds");

    assert!(!receipt.delivered);
    mock.assert();
}
