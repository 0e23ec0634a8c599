//! HTTP sink implementation.

use async_trait::async_trait;
use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use cdeventer_events::HttpMessage;

use crate::error::{DeliveryError, Result};
use crate::sink::{DeliveryOutcome, Sink};

/// Delivers CloudEvents over HTTP.
///
/// Every send opens its own connection: the idle pool is disabled and the
/// request carries `Connection: close`. The inner `reqwest::Client` holds no
/// per-request state, so one `HttpSink` can serve concurrent sends.
///
/// # Example
///
/// ```no_run
/// use cdeventer_client::HttpSink;
///
/// # fn example() -> cdeventer_client::Result<()> {
/// let sink = HttpSink::builder().user_agent("my-controller/1.0").build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpSink {
    http: reqwest::Client,
}

impl HttpSink {
    /// Create a new sink builder.
    pub fn builder() -> HttpSinkBuilder {
        HttpSinkBuilder::new()
    }

    /// Create a sink with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn send(
        &self,
        target: &Url,
        message: &HttpMessage,
        cancel: &CancellationToken,
    ) -> DeliveryOutcome {
        let mut request = self.http.post(target.clone());
        for (name, value) in &message.headers {
            request = request.header(*name, value.as_str());
        }
        let request = request.body(message.body.clone());
        let event_id = message.header("ce-id").unwrap_or("-");

        debug!(event_id, target = %target, bytes = message.body.len(), "sending CloudEvent");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => DeliveryOutcome::Undelivered(DeliveryError::Cancelled),
            result = request.send() => match result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        warn!(event_id, status = status.as_u16(), "sink did not acknowledge CloudEvent");
                    }
                    DeliveryOutcome::Delivered { status: status.as_u16() }
                }
                Err(e) => DeliveryOutcome::Undelivered(DeliveryError::Http(e)),
            },
        }
    }
}

/// Builder for creating an [`HttpSink`].
#[derive(Debug, Default)]
pub struct HttpSinkBuilder {
    user_agent: Option<String>,
}

impl HttpSinkBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the sink.
    pub fn build(self) -> Result<HttpSink> {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("cdeventer/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| DeliveryError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpSink { http })
    }
}
