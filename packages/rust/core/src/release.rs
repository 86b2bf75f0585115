//! Release checking against the GitHub releases API.
//!
//! The check is best-effort: any network or parse failure is reported as
//! [`VersionStatus::CheckFailed`] and never aborts the calling command.

use std::time::Duration;

use chrono::{DateTime, Utc};
use pagebase_shared::{PagebaseError, Result};
use serde::Deserialize;
use tracing::{debug, instrument};

/// GitHub repository queried for releases.
const RELEASE_REPO: &str = "ricardodantas/pagebase";

/// Default GitHub API endpoint.
const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default timeout in seconds for the release request.
const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// User-Agent string for release requests.
const USER_AGENT: &str = concat!("pagebase/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// VersionStatus
// ---------------------------------------------------------------------------

/// Outcome of a release check.
#[derive(Debug, Clone)]
pub enum VersionStatus {
    /// Running the latest version.
    UpToDate,
    /// A newer version is available.
    UpdateAvailable {
        latest: String,
        current: String,
        published_at: Option<DateTime<Utc>>,
    },
    /// Could not check (network error, unexpected response, etc.).
    CheckFailed(String),
}

/// Configuration for the release check.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// API base URL, overridable for tests.
    pub api_base: String,
    /// Timeout for the HTTP request in seconds.
    pub timeout_secs: u64,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Raw release payload from the GitHub API.
#[derive(Debug, Deserialize)]
struct ReleaseInfo {
    tag_name: String,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

/// Check whether a release newer than `current` has been published.
#[instrument(skip_all, fields(current = %current))]
pub async fn check_latest_release(current: &str, opts: &ReleaseOptions) -> VersionStatus {
    let release = match fetch_latest(opts).await {
        Ok(release) => release,
        Err(message) => {
            debug!(%message, "release check failed");
            return VersionStatus::CheckFailed(message);
        }
    };

    let latest = release.tag_name.trim_start_matches('v').to_string();
    if version_is_newer(&latest, current) {
        VersionStatus::UpdateAvailable {
            latest,
            current: current.to_string(),
            published_at: release.published_at,
        }
    } else {
        VersionStatus::UpToDate
    }
}

async fn fetch_latest(opts: &ReleaseOptions) -> std::result::Result<ReleaseInfo, String> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| format!("could not build HTTP client: {e}"))?;

    let url = format!("{}/repos/{RELEASE_REPO}/releases/latest", opts.api_base);
    debug!(%url, "fetching latest release");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("network error: {e}"))?;

    if !response.status().is_success() {
        return Err(format!("unexpected status {}", response.status()));
    }

    response
        .json::<ReleaseInfo>()
        .await
        .map_err(|e| format!("could not parse release info: {e}"))
}

/// Compare semver-ish versions, true if `latest` is newer than `current`.
///
/// Missing components count as zero, so `1.2` compares as `1.2.0`.
pub fn version_is_newer(latest: &str, current: &str) -> bool {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|s| s.parse().ok()).collect() };

    let latest_parts = parse(latest);
    let current_parts = parse(current);

    for i in 0..3 {
        let l = latest_parts.get(i).copied().unwrap_or(0);
        let c = current_parts.get(i).copied().unwrap_or(0);
        if l != c {
            return l > c;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Package manager
// ---------------------------------------------------------------------------

/// How the tool was installed, for upgrade instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Cargo,
    Homebrew,
}

impl PackageManager {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Homebrew => "brew",
        }
    }

    /// Shell command that upgrades the installed binary.
    pub fn upgrade_command(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo install pagebase-cli",
            Self::Homebrew => "brew upgrade pagebase",
        }
    }
}

/// Detect how pagebase was installed. Falls back to cargo.
pub fn detect_package_manager() -> PackageManager {
    if let Ok(output) = std::process::Command::new("brew")
        .args(["list", "pagebase"])
        .output()
    {
        if output.status.success() {
            return PackageManager::Homebrew;
        }
    }
    PackageManager::Cargo
}

/// Run the upgrade command for the detected package manager.
pub fn run_upgrade(pm: PackageManager) -> Result<()> {
    let (cmd, args): (&str, Vec<&str>) = match pm {
        PackageManager::Cargo => ("cargo", vec!["install", "pagebase-cli"]),
        PackageManager::Homebrew => ("brew", vec!["upgrade", "pagebase"]),
    };

    let status = std::process::Command::new(cmd)
        .args(&args)
        .status()
        .map_err(|e| PagebaseError::config(format!("failed to run {cmd}: {e}")))?;

    if !status.success() {
        return Err(PagebaseError::config(format!(
            "upgrade failed with status: {status}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE_PATH: &str = "/repos/ricardodantas/pagebase/releases/latest";

    fn opts_for(server: &wiremock::MockServer) -> ReleaseOptions {
        ReleaseOptions {
            api_base: server.uri(),
            timeout_secs: 2,
        }
    }

    #[test]
    fn version_comparison() {
        assert!(version_is_newer("0.2.0", "0.1.0"));
        assert!(version_is_newer("1.0.0", "0.9.9"));
        assert!(version_is_newer("0.1.10", "0.1.9"));
        assert!(!version_is_newer("0.1.0", "0.1.0"));
        assert!(!version_is_newer("0.1.0", "0.2.0"));
        // Missing components compare as zero.
        assert!(version_is_newer("1.2.1", "1.2"));
        assert!(!version_is_newer("1.2", "1.2.0"));
    }

    #[tokio::test]
    async fn reports_newer_release() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path(RELEASE_PATH))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_raw(
                r#"{"tag_name": "v9.9.9", "published_at": "2026-08-01T00:00:00Z"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        match check_latest_release("0.1.0", &opts_for(&server)).await {
            VersionStatus::UpdateAvailable {
                latest,
                current,
                published_at,
            } => {
                assert_eq!(latest, "9.9.9");
                assert_eq!(current, "0.1.0");
                assert!(published_at.is_some());
            }
            other => panic!("expected UpdateAvailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn up_to_date_when_tag_matches() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path(RELEASE_PATH))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_raw(r#"{"tag_name": "v0.1.0"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        match check_latest_release("0.1.0", &opts_for(&server)).await {
            VersionStatus::UpToDate => {}
            other => panic!("expected UpToDate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_is_reported_not_fatal() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path(RELEASE_PATH))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        match check_latest_release("0.1.0", &opts_for(&server)).await {
            VersionStatus::CheckFailed(message) => assert!(message.contains("404")),
            other => panic!("expected CheckFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_a_check_failure() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path(RELEASE_PATH))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_raw(r#"{"unexpected": true}"#, "application/json"),
            )
            .mount(&server)
            .await;

        match check_latest_release("0.1.0", &opts_for(&server)).await {
            VersionStatus::CheckFailed(message) => {
                assert!(message.contains("parse"), "got: {message}");
            }
            other => panic!("expected CheckFailed, got {other:?}"),
        }
    }
}
