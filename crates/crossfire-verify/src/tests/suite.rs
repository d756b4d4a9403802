//! Suite ordering, aggregation and error containment.

use serde_json::json;

use crate::checks::Category;
use crate::suite::VerificationSuite;
use crate::tests::mocks::{MockTransport, Reply};
use crate::tests::test_config;

fn healthy_cluster() -> MockTransport {
    // `/owners` serves the owner listing, then the rate-limit burst,
    // then the payload-filter probes.
    let mut owners = vec![Reply::json(json!([{"id": 1, "firstName": "George"}]))];
    owners.extend(std::iter::repeat_n(Reply::status(200), 6));
    owners.extend(std::iter::repeat_n(Reply::status(429), 4));
    owners.push(Reply::status(403));

    MockTransport::new()
        .open("c1.example", 8080)
        .open("c2.example", 8080)
        .on_get("https://public-c1.example", Reply::status(403))
        .on_get_sequence("http://customers.c1/owners", owners)
        .on_get("http://visits.c2/owners/1/pets/1/visits", Reply::json(json!([])))
        .on_post("http://customers.c1/test", Reply::status(403))
        .on_get(
            "http://customers.c1/actuator/health",
            Reply::json(json!({"status": "UP"})),
        )
        .on_get(
            "http://visits.c2/actuator/health",
            Reply::json(json!({"status": "UP"})),
        )
}

#[tokio::test(start_paused = true)]
async fn healthy_cluster_passes_every_category() {
    let suite = VerificationSuite::new(test_config(), healthy_cluster().shared());

    let outcome = suite.run_all().await;

    assert!(outcome.passed(), "{}", outcome.render());
    let names: Vec<&str> = outcome.results.iter().map(|r| r.test_name.as_str()).collect();
    let expected: Vec<&str> = Category::ALL.iter().map(|c| c.result_name()).collect();
    assert_eq!(names, expected);

    let report = suite.report(&outcome);
    assert_eq!(report.summary.total_tests, 6);
    assert_eq!(report.summary.passed_tests, 6);
    assert_eq!(report.summary.failed_tests, 0);
}

#[tokio::test(start_paused = true)]
async fn unreachable_cluster_fails_without_aborting() {
    let suite = VerificationSuite::new(test_config(), MockTransport::new().shared());

    let outcome = suite.run_all().await;

    assert!(!outcome.passed());
    assert_eq!(outcome.results.len(), 6);
    let passed: Vec<&str> = outcome
        .results
        .iter()
        .filter(|r| r.passed)
        .map(|r| r.test_name.as_str())
        .collect();
    assert_eq!(passed, ["Public Access Blocked", "Load Balancer Configuration"]);
    assert_eq!(outcome.summary().failed_tests, 4);
}

#[tokio::test(start_paused = true)]
async fn category_error_is_recorded_as_failure() {
    let mock = healthy_cluster().on_get(
        "http://customers.c1/owners",
        Reply::Status(200, "not a list".into()),
    );
    let suite = VerificationSuite::new(test_config(), mock.shared());

    let outcome = suite.run_all().await;

    let cross = outcome.result(Category::CrossCluster).unwrap();
    assert!(!cross.passed);
    assert!(cross.message.starts_with("Error: unexpected response"));
    // Later categories still ran.
    assert!(outcome.result(Category::ServiceHealth).unwrap().passed);
    assert!(outcome.result(Category::LoadBalancer).unwrap().passed);
    assert!(!outcome.passed());
}

#[tokio::test(start_paused = true)]
async fn single_unhealthy_service_fails_the_run() {
    let mock = healthy_cluster().on_get(
        "http://visits.c2/actuator/health",
        Reply::json(json!({"status": "DOWN"})),
    );
    let suite = VerificationSuite::new(test_config(), mock.shared());

    let outcome = suite.run_all().await;

    assert!(!outcome.passed());
    assert_eq!(outcome.summary().passed_tests, 5);
    assert!(outcome.render().contains("❌ FAIL Service Health"));
}

#[test]
fn missing_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = VerificationSuite::from_config_path(dir.path().join("config.json")).unwrap_err();
    assert!(err.is_config_not_found());
}

#[test]
fn suite_loads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "c1": {"endpoint": "10.0.1.10:8080", "public_endpoint": "c1.example.com", "internal_endpoint": "customers.c1.local"},
            "c2": {"endpoint": "10.1.1.10:8080", "public_endpoint": "c2.example.com", "internal_endpoint": "visits.c2.local"}
        }"#,
    )
    .unwrap();

    let suite = VerificationSuite::from_config_path(&path).unwrap();

    assert_eq!(suite.config().c2.internal_endpoint, "visits.c2.local");
}
