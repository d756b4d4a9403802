//! Per-category verdicts against scripted responses.

use std::time::Duration;

use serde_json::json;

use crate::checks::{Category, probe_health};
use crate::error::ProbeError;
use crate::tests::mocks::{MockTransport, Reply};
use crate::tests::test_config;

const OWNERS: &str = "http://customers.c1/owners";
const WAF: &str = "http://customers.c1/test";
const C1_HEALTH: &str = "http://customers.c1/actuator/health";
const C2_HEALTH: &str = "http://visits.c2/actuator/health";

/// Burst replies for `/owners`, then the payload-filter verdict.
fn burst(ok: usize, limited: usize, then: Reply) -> Vec<Reply> {
    let mut replies = Vec::new();
    replies.extend(std::iter::repeat_n(Reply::status(200), ok));
    replies.extend(std::iter::repeat_n(Reply::status(429), limited));
    replies.push(then);
    replies
}

// ============================================================================
// Network connectivity
// ============================================================================

#[tokio::test(start_paused = true)]
async fn connectivity_passes_when_both_directions_connect() {
    let mock = MockTransport::new()
        .open("c1.example", 8080)
        .open("c2.example", 8080);
    let config = test_config();

    let result = Category::NetworkConnectivity.run(&mock, &config).await.unwrap();

    assert!(result.passed);
    assert_eq!(result.test_name, "Network Connectivity");
    assert_eq!(result.message, "C1→C2: ✓, C2→C1: ✓");
    let seen = mock.seen();
    assert_eq!(seen[0].target, "c2.example:8080");
    assert_eq!(seen[1].target, "c1.example:8080");
    assert_eq!(seen[0].timeout, config.probes.connect_timeout);
}

#[tokio::test(start_paused = true)]
async fn connectivity_fails_when_one_direction_is_down() {
    let mock = MockTransport::new().open("c2.example", 8080);

    let result = Category::NetworkConnectivity
        .run(&mock, &test_config())
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(result.message, "C1→C2: ✓, C2→C1: ✗");
    assert_eq!(result.detail("c2_to_c1"), Some(&json!(false)));
}

#[tokio::test(start_paused = true)]
async fn connectivity_defaults_to_port_80() {
    let mock = MockTransport::new()
        .open("c1.example", 80)
        .open("c2.example", 80);
    let mut config = test_config();
    config.c1.endpoint = "c1.example".into();
    config.c2.endpoint = "c2.example".into();

    let result = Category::NetworkConnectivity.run(&mock, &config).await.unwrap();

    assert!(result.passed);
}

// ============================================================================
// Public access
// ============================================================================

#[tokio::test(start_paused = true)]
async fn public_access_blocked_by_refusal_or_status() {
    let mock = MockTransport::new().on_get("https://public-c1.example", Reply::status(403));

    let result = Category::PublicAccess.run(&mock, &test_config()).await.unwrap();

    assert!(result.passed);
    assert_eq!(result.test_name, "Public Access Blocked");
    assert_eq!(result.detail("public-c1.example"), Some(&json!(403)));
    assert_eq!(result.detail("public-c2.example"), Some(&json!("blocked")));
}

#[tokio::test(start_paused = true)]
async fn public_access_fails_when_endpoint_serves_content() {
    let mock = MockTransport::new()
        .on_get("https://public-c1.example", Reply::status(503))
        .on_get("https://public-c2.example", Reply::status(200));

    let result = Category::PublicAccess.run(&mock, &test_config()).await.unwrap();

    assert!(!result.passed);
    assert!(result.message.contains("public-c2.example (200)"));
}

#[tokio::test(start_paused = true)]
async fn public_access_presents_configured_user_agent() {
    let mock = MockTransport::new();
    let config = test_config();

    Category::PublicAccess.run(&mock, &config).await.unwrap();

    for seen in mock.seen() {
        assert_eq!(seen.user_agent.as_deref(), Some(config.probes.user_agent.as_str()));
        assert_eq!(seen.timeout, config.probes.public_timeout);
    }
}

// ============================================================================
// Cross-cluster communication
// ============================================================================

#[tokio::test(start_paused = true)]
async fn cross_cluster_follows_first_owner() {
    let mock = MockTransport::new()
        .on_get(OWNERS, Reply::json(json!([{"id": 3}, {"id": 9}])))
        .on_get("http://visits.c2/owners/3/pets/1/visits", Reply::status(404));

    let result = Category::CrossCluster.run(&mock, &test_config()).await.unwrap();

    assert!(result.passed);
    assert_eq!(result.detail("visits_status"), Some(&json!(404)));
    assert_eq!(mock.count("GET", "http://visits.c2/owners/3/"), 1);
}

#[tokio::test(start_paused = true)]
async fn cross_cluster_passes_with_no_owners() {
    let mock = MockTransport::new().on_get(OWNERS, Reply::json(json!([])));

    let result = Category::CrossCluster.run(&mock, &test_config()).await.unwrap();

    assert!(result.passed);
    assert_eq!(mock.count("GET", "http://visits.c2"), 0);
}

#[tokio::test(start_paused = true)]
async fn cross_cluster_fails_on_owner_listing_error() {
    let mock = MockTransport::new().on_get(OWNERS, Reply::status(500));

    let result = Category::CrossCluster.run(&mock, &test_config()).await.unwrap();

    assert!(!result.passed);
    assert!(result.message.contains("500"));
}

#[tokio::test(start_paused = true)]
async fn cross_cluster_fails_on_visits_error() {
    let mock = MockTransport::new()
        .on_get(OWNERS, Reply::json(json!([{"id": 1}])))
        .on_get("http://visits.c2/owners/1/pets/1/visits", Reply::status(502));

    let result = Category::CrossCluster.run(&mock, &test_config()).await.unwrap();

    assert!(!result.passed);
}

#[tokio::test(start_paused = true)]
async fn cross_cluster_rejects_malformed_owner_list() {
    let mock = MockTransport::new().on_get(OWNERS, Reply::Status(200, "<html>".into()));

    let err = Category::CrossCluster
        .run(&mock, &test_config())
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Decode(_)));
}

// ============================================================================
// Security controls
// ============================================================================

#[tokio::test(start_paused = true)]
async fn security_controls_pass_when_everything_blocks() {
    let mock = MockTransport::new()
        .on_post(WAF, Reply::status(403))
        .on_get_sequence(OWNERS, burst(7, 3, Reply::status(403)));

    let result = Category::SecurityControls
        .run(&mock, &test_config())
        .await
        .unwrap();

    assert!(result.passed, "{}", result.message);
    assert_eq!(result.message, "WAF: ✓, Rate Limit: ✓, Malicious: ✓");
    assert_eq!(result.detail("waf_blocked"), Some(&json!("4/4")));
    assert_eq!(result.detail("rate_limited"), Some(&json!("3/10")));
    assert_eq!(result.detail("malicious_blocked"), Some(&json!("4/4")));
}

#[tokio::test(start_paused = true)]
async fn waf_counts_dropped_connections_as_blocked() {
    // Unrouted POSTs are refused.
    let mock = MockTransport::new().on_get_sequence(OWNERS, burst(0, 10, Reply::refused()));

    let result = Category::SecurityControls
        .run(&mock, &test_config())
        .await
        .unwrap();

    assert!(result.passed, "{}", result.message);
    assert_eq!(mock.count("POST", WAF), 4);
}

#[tokio::test(start_paused = true)]
async fn waf_below_ratio_fails() {
    let mock = MockTransport::new()
        .on_post_sequence(
            WAF,
            vec![
                Reply::status(403),
                Reply::status(429),
                Reply::status(403),
                Reply::status(200),
            ],
        )
        .on_get_sequence(OWNERS, burst(9, 1, Reply::status(403)));

    let result = Category::SecurityControls
        .run(&mock, &test_config())
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(result.message, "WAF: ✗, Rate Limit: ✓, Malicious: ✓");
    assert_eq!(result.detail("waf_blocked"), Some(&json!("3/4")));
}

#[tokio::test(start_paused = true)]
async fn rate_limit_requires_a_429() {
    let mock = MockTransport::new()
        .on_post(WAF, Reply::status(403))
        .on_get_sequence(OWNERS, burst(10, 0, Reply::status(403)));

    let result = Category::SecurityControls
        .run(&mock, &test_config())
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(result.message, "WAF: ✓, Rate Limit: ✗, Malicious: ✓");
}

#[tokio::test(start_paused = true)]
async fn rate_limit_burst_is_paced() {
    let mock = MockTransport::new()
        .on_post(WAF, Reply::status(403))
        .on_get_sequence(OWNERS, burst(0, 10, Reply::status(403)));
    let config = test_config();

    let started = tokio::time::Instant::now();
    Category::SecurityControls.run(&mock, &config).await.unwrap();

    let pauses = config.probes.rate_limit_burst - 1;
    assert!(started.elapsed() >= config.probes.rate_limit_interval * pauses);
}

#[tokio::test(start_paused = true)]
async fn malicious_payloads_are_query_encoded() {
    let mock = MockTransport::new()
        .on_post(WAF, Reply::status(403))
        .on_get_sequence(OWNERS, burst(0, 10, Reply::status(200)));

    let result = Category::SecurityControls
        .run(&mock, &test_config())
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(result.message, "WAF: ✓, Rate Limit: ✓, Malicious: ✗");
    let queried: Vec<String> = mock
        .seen()
        .into_iter()
        .filter(|s| s.target.contains("?lastName="))
        .map(|s| s.target)
        .collect();
    assert_eq!(queried.len(), 4);
    assert!(queried.iter().all(|url| !url.contains(' ') && !url.contains('<')));
}

// ============================================================================
// Service health
// ============================================================================

#[tokio::test(start_paused = true)]
async fn health_up_passes_and_down_fails() {
    let up = MockTransport::new()
        .on_get(C1_HEALTH, Reply::json(json!({"status": "UP"})))
        .on_get(C2_HEALTH, Reply::json(json!({"status": "UP"})));
    let down = MockTransport::new()
        .on_get(C1_HEALTH, Reply::json(json!({"status": "UP"})))
        .on_get(C2_HEALTH, Reply::json(json!({"status": "DOWN"})));
    let config = test_config();

    let healthy = Category::ServiceHealth.run(&up, &config).await.unwrap();
    let unhealthy = Category::ServiceHealth.run(&down, &config).await.unwrap();

    assert!(healthy.passed);
    assert_eq!(healthy.message, "All services are healthy and responding");
    assert!(!unhealthy.passed);
    assert_eq!(unhealthy.message, "Unhealthy: Visits Service (C2)");
    assert_eq!(unhealthy.detail("Visits Service (C2)"), Some(&json!("DOWN")));
}

#[tokio::test(start_paused = true)]
async fn health_probe_interprets_responses() {
    let config = test_config();
    let cases = [
        (Reply::json(json!({"status": "UP"})), true),
        (Reply::json(json!({"status": "DOWN"})), false),
        (Reply::json(json!({"components": {}})), false),
        (Reply::Status(503, r#"{"status":"UP"}"#.into()), false),
        (Reply::Status(200, "not json".into()), false),
        (Reply::refused(), false),
    ];

    for (reply, expected) in cases {
        let mock = MockTransport::new().on_get(C1_HEALTH, reply.clone());
        let probe = probe_health(&mock, "customers.c1", &config).await;
        assert_eq!(probe.healthy, expected, "{reply:?} -> {probe:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn health_uses_health_timeout() {
    let mock = MockTransport::new();
    let config = test_config();

    Category::ServiceHealth.run(&mock, &config).await.unwrap();

    let seen = mock.seen();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|s| s.timeout == config.probes.health_timeout));
    assert_eq!(config.probes.health_timeout, Duration::from_secs(5));
}

// ============================================================================
// Load balancer
// ============================================================================

#[tokio::test(start_paused = true)]
async fn load_balancer_makes_no_requests() {
    let mock = MockTransport::new();

    let result = Category::LoadBalancer.run(&mock, &test_config()).await.unwrap();

    assert!(result.passed);
    assert!(mock.seen().is_empty());
}
