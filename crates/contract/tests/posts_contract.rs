//! Posts group against a local fixture

mod common;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use apitest_contract::suites::posts;
use apitest_contract::{Outcome, TestRunner};

use common::{config_for, mount_posts, Behaviour};

const READ_AFTER_WRITE: [&str; 4] = [
    "checkCreatedRecordIfPresent",
    "checkUpdatedRecord",
    "checkPartiallyUpdatedData",
    "checkDeletedRecord",
];

#[tokio::test]
async fn posts_pass_against_documented_contract() {
    let server = MockServer::start().await;
    mount_posts(&server, Behaviour::Documented).await;

    let runner = TestRunner::new(config_for(&server));
    let result = runner.run_suite(&posts::suite()).await.unwrap();

    for r in &result.results {
        assert_eq!(r.outcome, Outcome::Passed, "{} failed: {:?}", r.name, r.error);
    }
    assert_eq!(result.total, 15);
    assert_eq!(result.passed, 15);
}

/// The public fixture never persists writes: only the read-after-write
/// cases fail, and each fails on its own.
#[tokio::test]
async fn non_durable_fixture_fails_only_read_after_write_cases() {
    let server = MockServer::start().await;
    mount_posts(&server, Behaviour::NonDurable).await;

    let runner = TestRunner::new(config_for(&server));
    let result = runner.run_suite(&posts::suite()).await.unwrap();

    for r in &result.results {
        let expected = if READ_AFTER_WRITE.contains(&r.name.as_str()) {
            Outcome::Failed
        } else {
            Outcome::Passed
        };
        assert_eq!(r.outcome, expected, "{}: {:?}", r.name, r.error);
    }
    assert_eq!(result.failed, 4);
    assert_eq!(result.skipped, 0);

    let created = result.get("checkCreatedRecordIfPresent").unwrap();
    assert!(created.error.as_deref().unwrap().contains("expected 1, got 0"));

    let patched = result.get("checkPartiallyUpdatedData").unwrap();
    assert_eq!(
        patched.error.as_deref(),
        Some("Field mismatch on 'userId': expected 1, got 0")
    );

    let deleted = result.get("checkDeletedRecord").unwrap();
    assert!(deleted
        .error
        .as_deref()
        .unwrap()
        .contains("expected 404, got 200"));
}

/// The partial-update echo keeps the documented `userId` of 1 as the
/// expectation even though the public fixture answers with 0.
#[tokio::test]
async fn partial_update_pins_documented_user_id() {
    let server = MockServer::start().await;
    mount_posts(&server, Behaviour::NonDurable).await;

    let runner = TestRunner::new(config_for(&server));
    let result = runner
        .run_case(&posts::suite(), "checkPartiallyUpdatedData")
        .await
        .unwrap();

    assert_eq!(result.outcome("checkPartialUpdate"), Some(Outcome::Passed));
    let patched = result.get("checkPartiallyUpdatedData").unwrap();
    assert_eq!(patched.outcome, Outcome::Failed);
    assert_eq!(
        patched.error.as_deref(),
        Some("Field mismatch on 'userId': expected 1, got 0")
    );
}

#[tokio::test]
async fn failed_root_skips_dependents_but_not_siblings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let runner = TestRunner::new(config_for(&server));
    let result = runner.run_suite(&posts::suite()).await.unwrap();

    assert_eq!(result.outcome("getAllPosts"), Some(Outcome::Failed));
    for name in [
        "checkGetAllPostsCount",
        "checkGetValidPost",
        "checkGetInvalidPost",
        "checkPostsWithQueryParameters",
        "checkPostsWithMultipleQueryParameters",
    ] {
        let r = result.get(name).unwrap();
        assert_eq!(r.outcome, Outcome::Skipped, "{name}");
        assert_eq!(r.error.as_deref(), Some("prerequisite 'getAllPosts' failed"));
    }

    // Independent cases still ran (and failed against the empty server);
    // their own dependents were skipped in turn.
    assert_eq!(result.outcome("checkCreatePost"), Some(Outcome::Failed));
    assert_eq!(result.outcome("checkCreatedRecordIfPresent"), Some(Outcome::Skipped));
    assert_eq!(result.outcome("checkDeletedRecord"), Some(Outcome::Failed));
    assert_eq!(result.total, 15);
    assert_eq!(result.failed, 7);
    assert_eq!(result.skipped, 8);
    assert_eq!(result.passed, 0);
}

#[tokio::test]
async fn single_case_runs_with_its_prerequisite() {
    let server = MockServer::start().await;
    mount_posts(&server, Behaviour::Documented).await;

    let runner = TestRunner::new(config_for(&server));
    let result = runner
        .run_case(&posts::suite(), "checkGetValidPost")
        .await
        .unwrap();

    let names: Vec<&str> = result.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["getAllPosts", "checkGetValidPost"]);
    assert_eq!(result.passed, 2);
}

#[tokio::test]
async fn valid_post_mismatch_reports_expected_and_actual() {
    let server = MockServer::start().await;
    mount_posts(&server, Behaviour::Documented).await;
    let mut wrong = common::post(1);
    wrong.title = "something else".to_string();
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wrong))
        .with_priority(1)
        .mount(&server)
        .await;

    let runner = TestRunner::new(config_for(&server));
    let result = runner
        .run_case(&posts::suite(), "checkGetValidPost")
        .await
        .unwrap();

    let r = result.get("checkGetValidPost").unwrap();
    assert_eq!(r.outcome, Outcome::Failed);
    let message = r.error.as_deref().unwrap();
    assert!(message.contains("'title'"));
    assert!(message.contains(posts::POST_1_TITLE));
    assert!(message.contains("something else"));
}
