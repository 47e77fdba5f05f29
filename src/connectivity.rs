//! Network reachability probing.

use std::time::Duration;

use async_trait::async_trait;

/// Reachability boundary consulted by connectivity-checked actions.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Best-effort reachability check. Implementations err on the side of
    /// `true`: a broken probe must not strand the engine offline.
    async fn is_reachable(&self) -> bool;
}

/// Probe issuing a HEAD request against a configured URL.
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn is_reachable(&self) -> bool {
        match self.client.head(&self.url).send().await {
            // Any response at all, whatever the status, proves the path works.
            Ok(_) => true,
            Err(err) if err.is_connect() || err.is_timeout() => {
                tracing::debug!(url = %self.url, error = %err, "connectivity probe failed");
                false
            }
            // The probe itself misbehaving is not evidence of being offline.
            Err(err) => {
                tracing::debug!(url = %self.url, error = %err, "connectivity probe errored, assuming reachable");
                true
            }
        }
    }
}

/// Probe that always reports reachable. Used offline and in tests.
pub struct AlwaysReachable;

#[async_trait]
impl ConnectivityProbe for AlwaysReachable {
    async fn is_reachable(&self) -> bool {
        true
    }
}
