//! Release identifier resolution.

use super::first_input;
use crate::client::{ReleaseApi, ReleaseHandle};
use crate::env::EnvConfig;
use crate::error::Result;

/// `release` wins over the deprecated `version`
const RELEASE_INPUTS: [&str; 2] = ["release", "version"];

/// `release_prefix` wins over the deprecated `version_prefix`
const PREFIX_INPUTS: [&str; 2] = ["release_prefix", "version_prefix"];

/// Stripped from values such as `${{ github.ref }}`
const TAG_REF_PREFIX: &str = "refs/tags/";

/// What the user asked for, before the service is consulted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Explicit release, ref prefix already stripped
    pub explicit: Option<String>,
    /// Prefix prepended to the final identifier
    pub prefix: Option<String>,
}

/// Read the release request from the step inputs
pub fn release_request(env: &EnvConfig) -> ReleaseRequest {
    let explicit = first_input(env, &RELEASE_INPUTS).map(|release| {
        release
            .strip_prefix(TAG_REF_PREFIX)
            .unwrap_or(release)
            .to_string()
    });

    ReleaseRequest {
        explicit,
        prefix: first_input(env, &PREFIX_INPUTS).map(str::to_string),
    }
}

impl ReleaseRequest {
    /// Produce the release handle, asking the service to propose one if needed.
    ///
    /// The prefix applies to whichever value was chosen.
    pub async fn resolve<C: ReleaseApi>(&self, client: &C) -> Result<ReleaseHandle> {
        let release = match &self.explicit {
            Some(release) => release.clone(),
            None => {
                log::debug!("Release version not provided, proposing one...");
                client.propose_version().await?
            }
        };

        Ok(ReleaseHandle::new(match &self.prefix {
            Some(prefix) => format!("{prefix}{release}"),
            None => release,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::EchoClient;

    async fn resolve(env: EnvConfig) -> String {
        release_request(&env)
            .resolve(&EchoClient)
            .await
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_strips_tag_ref() {
        let env = EnvConfig::default().with_input("release", "refs/tags/v1.0.0");
        assert_eq!(resolve(env).await, "v1.0.0");
    }

    #[tokio::test]
    async fn test_plain_release_unchanged() {
        let env = EnvConfig::default().with_input("release", "v1.0.0");
        assert_eq!(resolve(env).await, "v1.0.0");
    }

    #[tokio::test]
    async fn test_release_beats_deprecated_version() {
        let env = EnvConfig::default()
            .with_input("version", "v0.9.0")
            .with_input("release", "v1.0.0");
        assert_eq!(resolve(env).await, "v1.0.0");

        let env = EnvConfig::default().with_input("version", "refs/tags/v0.9.0");
        assert_eq!(resolve(env).await, "v0.9.0");
    }

    #[tokio::test]
    async fn test_proposed_when_absent() {
        assert_eq!(resolve(EnvConfig::default()).await, "releases propose-version");
    }

    #[tokio::test]
    async fn test_prefix_applies_to_proposed() {
        let env = EnvConfig::default().with_input("release_prefix", "prefix-");
        assert_eq!(resolve(env).await, "prefix-releases propose-version");
    }

    #[tokio::test]
    async fn test_prefix_applies_to_explicit_after_stripping() {
        let env = EnvConfig::default()
            .with_input("release", "refs/tags/v1.0.0")
            .with_input("version_prefix", "old-")
            .with_input("release_prefix", "prefix-");
        assert_eq!(resolve(env).await, "prefix-v1.0.0");
    }
}
