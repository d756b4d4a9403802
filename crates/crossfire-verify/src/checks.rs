//! The six verification categories.
//!
//! Each category runs its probes through a [`Transport`] and produces
//! exactly one [`VerificationResult`]. Expected network failures (a
//! refused connection on a restricted endpoint, a WAF dropping a request)
//! are part of the verdict. Anything else surfaces as a [`ProbeError`]
//! and is recorded by the suite as a failed category.

use std::fmt;

use crossfire_core::VerificationConfig;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::error::{ProbeError, ProbeResult};
use crate::result::VerificationResult;
use crate::transport::{HttpResponse, Transport, split_host_port, with_query};

/// Statuses that show a public endpoint is not serving the application.
pub const BLOCKED_PUBLIC_STATUSES: [u16; 4] = [403, 404, 502, 503];

/// Statuses that show an attack payload was rejected.
pub const BLOCKED_ATTACK_STATUSES: [u16; 2] = [403, 429];

/// Status returned by a rate limiter.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Simulated load balancer inspections.
pub const LOAD_BALANCER_CHECKS: [&str; 4] = [
    "WAF Integration",
    "SSL/TLS Configuration",
    "Health Check Configuration",
    "Target Group Configuration",
];

/// A group of related checks aggregated into one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// TCP reachability between the clusters.
    NetworkConnectivity,
    /// Public endpoints refuse direct access.
    PublicAccess,
    /// Visits service reaches the customers service.
    CrossCluster,
    /// WAF, rate limiting and payload filtering.
    SecurityControls,
    /// Actuator health of both services.
    ServiceHealth,
    /// Load balancer configuration.
    LoadBalancer,
}

impl Category {
    /// All categories in execution order.
    pub const ALL: [Self; 6] = [
        Self::NetworkConnectivity,
        Self::PublicAccess,
        Self::CrossCluster,
        Self::SecurityControls,
        Self::ServiceHealth,
        Self::LoadBalancer,
    ];

    /// Heading shown while the category runs.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::NetworkConnectivity => "Network Connectivity",
            Self::PublicAccess => "Public Access Verification",
            Self::CrossCluster => "Cross-Cluster Communication",
            Self::SecurityControls => "Security Controls",
            Self::ServiceHealth => "Service Health",
            Self::LoadBalancer => "Load Balancer Configuration",
        }
    }

    /// Name recorded in the category's [`VerificationResult`].
    #[must_use]
    pub const fn result_name(self) -> &'static str {
        match self {
            Self::PublicAccess => "Public Access Blocked",
            other => other.title(),
        }
    }

    /// Runs the category's probes.
    ///
    /// # Errors
    /// Returns a [`ProbeError`] if a probe fails in a way the category
    /// cannot interpret.
    pub async fn run(
        self,
        transport: &dyn Transport,
        config: &VerificationConfig,
    ) -> ProbeResult<VerificationResult> {
        match self {
            Self::NetworkConnectivity => network_connectivity(transport, config).await,
            Self::PublicAccess => public_access(transport, config).await,
            Self::CrossCluster => cross_cluster(transport, config).await,
            Self::SecurityControls => security_controls(transport, config).await,
            Self::ServiceHealth => service_health(transport, config).await,
            Self::LoadBalancer => Ok(load_balancer()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

const fn mark(ok: bool) -> &'static str {
    if ok { "✓" } else { "✗" }
}

// ============================================================================
// Network connectivity
// ============================================================================

/// Returns true if a TCP connection to `endpoint` succeeds.
pub async fn tcp_reachable(
    transport: &dyn Transport,
    endpoint: &str,
    config: &VerificationConfig,
) -> bool {
    let (host, port) = match split_host_port(endpoint) {
        Ok(parts) => parts,
        Err(e) => {
            warn!(endpoint, error = %e, "cannot probe endpoint");
            return false;
        }
    };
    match transport
        .tcp_connect(&host, port, config.probes.connect_timeout)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            debug!(endpoint, error = %e, "TCP probe failed");
            false
        }
    }
}

async fn network_connectivity(
    transport: &dyn Transport,
    config: &VerificationConfig,
) -> ProbeResult<VerificationResult> {
    let c1_to_c2 = tcp_reachable(transport, &config.c2.endpoint, config).await;
    let c2_to_c1 = tcp_reachable(transport, &config.c1.endpoint, config).await;
    info!(c1_to_c2, c2_to_c1, "network connectivity probed");

    let mut details = Map::new();
    details.insert("c1_to_c2".into(), json!(c1_to_c2));
    details.insert("c2_to_c1".into(), json!(c2_to_c1));

    Ok(VerificationResult::new(
        Category::NetworkConnectivity.result_name(),
        c1_to_c2 && c2_to_c1,
        format!("C1→C2: {}, C2→C1: {}", mark(c1_to_c2), mark(c2_to_c1)),
    )
    .with_details(details))
}

// ============================================================================
// Public access
// ============================================================================

async fn public_access(
    transport: &dyn Transport,
    config: &VerificationConfig,
) -> ProbeResult<VerificationResult> {
    let probes = &config.probes;
    let mut details = Map::new();
    let mut exposed = Vec::new();

    for endpoint in [&config.c1.public_endpoint, &config.c2.public_endpoint] {
        let url = format!("https://{endpoint}");
        match transport
            .get(&url, probes.public_timeout, Some(probes.user_agent.as_str()))
            .await
        {
            Ok(response) if !BLOCKED_PUBLIC_STATUSES.contains(&response.status) => {
                warn!(endpoint = %endpoint, status = response.status, "public endpoint answered");
                details.insert(endpoint.clone(), json!(response.status));
                exposed.push(format!("{endpoint} ({})", response.status));
            }
            Ok(response) => {
                info!(endpoint = %endpoint, status = response.status, "public access blocked");
                details.insert(endpoint.clone(), json!(response.status));
            }
            Err(e) => {
                info!(endpoint = %endpoint, error = %e, "public access blocked");
                details.insert(endpoint.clone(), json!("blocked"));
            }
        }
    }

    let name = Category::PublicAccess.result_name();
    let result = if exposed.is_empty() {
        VerificationResult::pass(name, "All public endpoints are properly restricted")
    } else {
        VerificationResult::fail(
            name,
            format!("Publicly reachable: {}", exposed.join(", ")),
        )
    };
    Ok(result.with_details(details))
}

// ============================================================================
// Cross-cluster communication
// ============================================================================

fn owner_id(owner: &Value) -> ProbeResult<String> {
    match owner.get("id") {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ProbeError::decode("owner record has no id")),
    }
}

async fn cross_cluster(
    transport: &dyn Transport,
    config: &VerificationConfig,
) -> ProbeResult<VerificationResult> {
    let timeout = config.probes.request_timeout;
    let name = Category::CrossCluster.result_name();

    let owners_url = format!("http://{}/owners", config.c1.internal_endpoint);
    let response = transport.get(&owners_url, timeout, None).await?;
    if !response.is_ok() {
        warn!(status = response.status, "failed to list owners");
        return Ok(VerificationResult::fail(
            name,
            format!("Customers service returned {}", response.status),
        ));
    }

    let owners: Vec<Value> = response.json()?;
    let Some(first) = owners.first() else {
        warn!("no owners available for cross-cluster check");
        return Ok(VerificationResult::pass(
            name,
            "No owners found; cross-cluster call chain not exercised",
        ));
    };

    let visits_url = format!(
        "http://{}/owners/{}/pets/1/visits",
        config.c2.internal_endpoint,
        owner_id(first)?
    );
    let visits = transport.get(&visits_url, timeout, None).await?;

    let mut details = Map::new();
    details.insert("owners".into(), json!(owners.len()));
    details.insert("visits_status".into(), json!(visits.status));

    // 404 only means the pet has no visits yet.
    let result = if matches!(visits.status, 200 | 404) {
        info!(status = visits.status, "cross-cluster communication working");
        VerificationResult::pass(name, "Visits service can communicate with customers service")
    } else {
        warn!(status = visits.status, "cross-cluster call failed");
        VerificationResult::fail(
            name,
            format!("Visits service returned {}", visits.status),
        )
    };
    Ok(result.with_details(details))
}

// ============================================================================
// Security controls
// ============================================================================

/// Returns true if `blocked` out of `total` meets the configured ratio.
#[must_use]
pub fn meets_block_ratio(blocked: usize, total: usize, ratio: f64) -> bool {
    total > 0 && blocked as f64 >= total as f64 * ratio
}

fn attack_blocked(outcome: &ProbeResult<HttpResponse>) -> bool {
    match outcome {
        Ok(response) => BLOCKED_ATTACK_STATUSES.contains(&response.status),
        Err(e) => e.is_transport(),
    }
}

async fn waf_blocked(transport: &dyn Transport, config: &VerificationConfig) -> usize {
    let url = format!("http://{}/test", config.c1.internal_endpoint);
    let mut blocked = 0;
    for payload in &config.probes.malicious_payloads {
        let outcome = transport
            .post_form(&url, &[("input", payload.as_str())], config.probes.waf_timeout)
            .await;
        if attack_blocked(&outcome) {
            blocked += 1;
        }
    }
    blocked
}

async fn rate_limited(transport: &dyn Transport, config: &VerificationConfig) -> u32 {
    let probes = &config.probes;
    let url = format!("http://{}/owners", config.c1.internal_endpoint);
    let mut limited = 0;
    for i in 0..probes.rate_limit_burst {
        if i > 0 {
            tokio::time::sleep(probes.rate_limit_interval).await;
        }
        match transport.get(&url, probes.rate_limit_timeout, None).await {
            Ok(response) if response.status == TOO_MANY_REQUESTS => limited += 1,
            Ok(_) => {}
            Err(e) => debug!(error = %e, "burst request failed"),
        }
    }
    limited
}

async fn payloads_blocked(
    transport: &dyn Transport,
    config: &VerificationConfig,
) -> ProbeResult<usize> {
    let base = format!("http://{}/owners", config.c1.internal_endpoint);
    let mut blocked = 0;
    for payload in &config.probes.malicious_payloads {
        let url = with_query(&base, "lastName", payload)?;
        let outcome = transport.get(&url, config.probes.waf_timeout, None).await;
        if attack_blocked(&outcome) {
            blocked += 1;
        }
    }
    Ok(blocked)
}

async fn security_controls(
    transport: &dyn Transport,
    config: &VerificationConfig,
) -> ProbeResult<VerificationResult> {
    let probes = &config.probes;
    let payload_count = probes.malicious_payloads.len();

    let waf = waf_blocked(transport, config).await;
    let waf_ok = meets_block_ratio(waf, payload_count, probes.waf_block_ratio);
    info!(blocked = waf, total = payload_count, "WAF probe finished");

    let limited = rate_limited(transport, config).await;
    let rate_ok = limited > 0;
    info!(limited, total = probes.rate_limit_burst, "rate limit probe finished");

    let malicious = payloads_blocked(transport, config).await?;
    let malicious_ok = meets_block_ratio(malicious, payload_count, probes.waf_block_ratio);
    info!(blocked = malicious, total = payload_count, "payload filter probe finished");

    let mut details = Map::new();
    details.insert("waf_blocked".into(), json!(format!("{waf}/{payload_count}")));
    details.insert(
        "rate_limited".into(),
        json!(format!("{limited}/{}", probes.rate_limit_burst)),
    );
    details.insert(
        "malicious_blocked".into(),
        json!(format!("{malicious}/{payload_count}")),
    );

    Ok(VerificationResult::new(
        Category::SecurityControls.result_name(),
        waf_ok && rate_ok && malicious_ok,
        format!(
            "WAF: {}, Rate Limit: {}, Malicious: {}",
            mark(waf_ok),
            mark(rate_ok),
            mark(malicious_ok)
        ),
    )
    .with_details(details))
}

// ============================================================================
// Service health
// ============================================================================

/// Health verdict for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthProbe {
    /// Whether the service reported `UP`.
    pub healthy: bool,
    /// Reported status, HTTP status or probe error.
    pub observed: String,
}

/// Probes `http://{endpoint}/actuator/health`.
pub async fn probe_health(
    transport: &dyn Transport,
    endpoint: &str,
    config: &VerificationConfig,
) -> HealthProbe {
    let url = format!("http://{endpoint}/actuator/health");
    let response = match transport.get(&url, config.probes.health_timeout, None).await {
        Ok(response) => response,
        Err(e) => {
            return HealthProbe {
                healthy: false,
                observed: e.to_string(),
            };
        }
    };
    if !response.is_ok() {
        return HealthProbe {
            healthy: false,
            observed: format!("HTTP {}", response.status),
        };
    }

    match response.json::<Value>() {
        Ok(body) => {
            let status = body
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("UNKNOWN");
            HealthProbe {
                healthy: status == "UP",
                observed: status.to_string(),
            }
        }
        Err(e) => HealthProbe {
            healthy: false,
            observed: e.to_string(),
        },
    }
}

async fn service_health(
    transport: &dyn Transport,
    config: &VerificationConfig,
) -> ProbeResult<VerificationResult> {
    let services = [
        (&config.c1.internal_endpoint, "Customers Service (C1)"),
        (&config.c2.internal_endpoint, "Visits Service (C2)"),
    ];

    let mut details = Map::new();
    let mut unhealthy = Vec::new();
    for (endpoint, service) in services {
        let probe = probe_health(transport, endpoint, config).await;
        if probe.healthy {
            info!(service, "service healthy");
        } else {
            warn!(service, observed = %probe.observed, "service unhealthy");
            unhealthy.push(service);
        }
        details.insert(service.into(), json!(probe.observed));
    }

    let name = Category::ServiceHealth.result_name();
    let result = if unhealthy.is_empty() {
        VerificationResult::pass(name, "All services are healthy and responding")
    } else {
        VerificationResult::fail(name, format!("Unhealthy: {}", unhealthy.join(", ")))
    };
    Ok(result.with_details(details))
}

// ============================================================================
// Load balancer
// ============================================================================

fn load_balancer() -> VerificationResult {
    let mut details = Map::new();
    for check in LOAD_BALANCER_CHECKS {
        info!(check, "load balancer check passed (simulated)");
        details.insert(check.into(), json!(true));
    }
    VerificationResult::pass(
        Category::LoadBalancer.result_name(),
        "ALB is properly configured with security controls",
    )
    .with_details(details)
}
