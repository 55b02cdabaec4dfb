//! App update check.
//!
//! The version endpoint lives outside the API base URL and answers with a
//! plain JSON object rather than the usual status envelope.

use crate::client::api::ApiClient;
use crate::shared::config::ConfigError;
use crate::shared::error::ClientError;
use crate::shared::wire::lenient_bool;
use serde::Deserialize;
use std::cmp::Ordering;

const OPTIONAL_MESSAGE: &str = "A new version of the app is available.";
const MANDATORY_MESSAGE: &str = "A critical update is available. You must update the app to continue.";

/// Compare dotted versions part by part. Missing or non-numeric parts count as 0.
pub fn compare_versions(current: &str, latest: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> { v.split('.').map(|p| p.trim().parse().unwrap_or(0)).collect() };
    let (a, b) = (parse(current), parse(latest));

    (0..a.len().max(b.len()))
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionReply {
    #[serde(default, deserialize_with = "lenient_bool")]
    success: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    update_required: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    must_update: bool,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    update_message: Option<String>,
    #[serde(default)]
    latest_version: String,
}

/// Result of an update check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    UpToDate,
    Optional { download_url: Option<String>, message: String },
    Mandatory { download_url: Option<String>, message: String },
}

impl UpdateCheck {
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Self::Mandatory { .. })
    }
}

/// Ask the version endpoint whether `current_version` needs an update.
///
/// The update is mandatory when the endpoint says so or when the latest
/// version is at or past any of `force_versions`.
pub async fn check_for_update(
    api: &ApiClient,
    current_version: &str,
    platform: &str,
    force_versions: &[&str],
) -> Result<UpdateCheck, ClientError> {
    let url = api.config().version_url().ok_or(ConfigError::InvalidValue {
        key: "version_url",
        message: "no version endpoint configured".to_string(),
    })?;

    let reply: VersionReply = api
        .get_raw(url, &[("currentVersion", current_version), ("platform", platform)])
        .await
        .inspect_err(|e| e.log("check_for_update"))?;

    if !reply.success {
        tracing::warn!("version check failed");
        return Err(ClientError::backend(Some("Version check failed".to_string())));
    }
    if !reply.update_required {
        return Ok(UpdateCheck::UpToDate);
    }

    let mandatory = reply.must_update
        || force_versions
            .iter()
            .any(|forced| compare_versions(&reply.latest_version, forced).is_ge());
    tracing::info!(latest = %reply.latest_version, mandatory, "update available");

    Ok(if mandatory {
        UpdateCheck::Mandatory {
            download_url: reply.download_url,
            message: reply.update_message.unwrap_or_else(|| MANDATORY_MESSAGE.to_string()),
        }
    } else {
        UpdateCheck::Optional {
            download_url: reply.download_url,
            message: reply.update_message.unwrap_or_else(|| OPTIONAL_MESSAGE.to_string()),
        }
    })
}
