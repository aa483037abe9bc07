//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ConfigError, Options};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            // Reading the body to the end hands the connection back on every path.
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`Client::send_code`].
pub enum SendError {
    /// The request could not be sent or the response could not be read
    /// (DNS, TLS, connection reset, timeouts, etc).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn StdError + Send + Sync>),

    /// Response body is not the JSON reply the gateway is expected to send.
    #[error("decode error: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),

    /// The gateway answered with a non-zero result code.
    #[error("({code}) {msg}")]
    Gateway { code: i64, msg: String },
}

#[derive(Debug, Clone)]
/// Builder for [`Client`].
///
/// Use this when you need a request timeout or a custom user-agent.
pub struct ClientBuilder {
    options: Options,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a builder with no timeout/user-agent override.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`Client`].
    pub fn build(self) -> Result<Client, SendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SendError::Network(Box::new(err)))?;

        Ok(Client {
            options: self.options,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Verification-code SMS client for a single configured gateway.
///
/// The client holds only immutable options and a shared HTTP transport, so
/// clones and concurrent calls need no synchronization.
pub struct Client {
    options: Options,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with default HTTP settings (no timeout).
    ///
    /// For more customization, use [`Client::builder`].
    pub fn new(options: Options) -> Self {
        Self {
            options,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Parse a source string and create a client with default HTTP settings.
    pub fn from_source(source: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Options::parse(source)?))
    }

    /// Start building a client with custom settings.
    pub fn builder(options: Options) -> ClientBuilder {
        ClientBuilder::new(options)
    }

    /// Options this client was configured with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Send a verification code to `phone_number`.
    ///
    /// Issues exactly one form POST to the configured address. The HTTP
    /// status does not affect the outcome; only the reply's `code` does.
    ///
    /// Errors:
    /// - [`SendError::Network`] when the request fails or the body cannot be read,
    /// - [`SendError::Decode`] when the body is not the expected JSON,
    /// - [`SendError::Gateway`] when the gateway returns a non-zero code.
    pub async fn send_code(&self, phone_number: &str, code: &str) -> Result<(), SendError> {
        let params =
            crate::transport::encode_send_code_form(&self.options, phone_number, code);

        tracing::debug!(
            address = %self.options.address(),
            tpl_id = %self.options.tpl_id().as_str(),
            "sending verification code"
        );

        let response = self
            .http
            .post_form(self.options.address(), params)
            .await
            .map_err(SendError::Network)?;

        let reply = crate::transport::decode_send_code_json_response(&response.body)
            .map_err(|err| SendError::Decode(Box::new(err)))?;

        tracing::debug!(
            status = response.status,
            reply_status = reply.http_status_code,
            code = reply.code,
            detail = %reply.detail,
            "gateway replied"
        );

        if reply.is_accepted() {
            return Ok(());
        }

        Err(SendError::Gateway {
            code: reply.code,
            msg: reply.msg,
        })
    }
}
