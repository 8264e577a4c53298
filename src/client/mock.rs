//! Network-free stand-in for the release service.

use super::ReleaseApi;
use crate::error::Result;

/// Echoes every command back as its space-joined arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoClient;

impl ReleaseApi for EchoClient {
    async fn execute(&self, args: Vec<String>, _live: bool) -> Result<String> {
        let echoed = args.join(" ");
        log::debug!("[mock] sentry-cli {}", echoed);
        Ok(echoed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ReleaseHandle;

    #[tokio::test]
    async fn test_execute_joins_arguments() {
        let output = EchoClient
            .execute(vec!["releases".into(), "list".into()], true)
            .await
            .unwrap();
        assert_eq!(output, "releases list");
    }

    #[tokio::test]
    async fn test_typed_operations_succeed() {
        let release = ReleaseHandle::new("v1");
        EchoClient.new_release(&release, &["p".to_string()]).await.unwrap();
        EchoClient.finalize(&release).await.unwrap();
        assert_eq!(
            EchoClient.propose_version().await.unwrap(),
            "releases propose-version"
        );
    }
}
