//! HTTP gateway talking to the policy REST API

use async_trait::async_trait;
use policy_console_core::{PolicyDraft, PolicyListEntry};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::{EndpointConfig, GatewayError, PolicyGateway};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway backed by the remote policy API
#[derive(Debug, Clone)]
pub struct HttpPolicyGateway {
    client: Client,
    base_url: Url,
    endpoints: EndpointConfig,
}

impl HttpPolicyGateway {
    /// Create a gateway with default endpoints and request timeout
    pub fn new(base_url: Url) -> Result<Self, GatewayError> {
        Self::with_timeout(base_url, EndpointConfig::default(), DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: Url,
        endpoints: EndpointConfig,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, endpoints))
    }

    /// Create with a preconfigured client (headers, proxies, TLS)
    pub fn with_client(client: Client, base_url: Url, endpoints: EndpointConfig) -> Self {
        Self {
            client,
            base_url,
            endpoints,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(
        &self,
        method: Method,
        template: &str,
        params: &[(&str, &str)],
    ) -> Result<(RequestBuilder, Url), GatewayError> {
        let url = EndpointConfig::resolve(&self.base_url, template, params)?;
        tracing::debug!("{} {}", method, url);
        Ok((self.client.request(method, url.clone()), url))
    }

    /// Send the request and return the body of a 2xx reply
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Vec<u8>, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }
        Ok(body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, GatewayError> {
        let body = self.send(request, url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Like `send_json`, but an empty reply body reads as `null`
    async fn send_reply(&self, request: RequestBuilder, url: &Url) -> Result<Value, GatewayError> {
        let body = self.send(request, url).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PolicyGateway for HttpPolicyGateway {
    async fn fetch_by_fragment(
        &self,
        fragment_type: &str,
        fragment_id: &str,
    ) -> Result<Vec<PolicyListEntry>, GatewayError> {
        let (request, url) = self.request(
            Method::GET,
            &self.endpoints.fetch_by_fragment,
            &[("type", fragment_type), ("id", fragment_id)],
        )?;
        self.send_json(request, &url).await
    }

    async fn fetch_all(&self) -> Result<Vec<PolicyListEntry>, GatewayError> {
        let (request, url) = self.request(Method::GET, &self.endpoints.fetch_all, &[])?;
        self.send_json(request, &url).await
    }

    async fn create(&self, draft: &PolicyDraft) -> Result<PolicyDraft, GatewayError> {
        let (request, url) = self.request(Method::POST, &self.endpoints.create, &[])?;
        self.send_json(request.json(draft), &url).await
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let (request, url) = self.request(Method::DELETE, &self.endpoints.delete, &[("id", id)])?;
        self.send(request, &url).await?;
        Ok(())
    }

    async fn run(&self, id: &str) -> Result<Value, GatewayError> {
        let (request, url) = self.request(Method::GET, &self.endpoints.run, &[("id", id)])?;
        self.send_reply(request, &url).await
    }

    async fn fetch_fake(&self) -> Result<PolicyDraft, GatewayError> {
        let (request, url) = self.request(Method::GET, &self.endpoints.fetch_fake, &[])?;
        self.send_json(request, &url).await
    }

    async fn stop(&self, draft: &PolicyDraft) -> Result<Value, GatewayError> {
        let (request, url) = self.request(Method::PUT, &self.endpoints.stop, &[])?;
        self.send_reply(request.json(draft), &url).await
    }

    async fn save(&self, draft: &PolicyDraft) -> Result<PolicyDraft, GatewayError> {
        let (request, url) = self.request(Method::PUT, &self.endpoints.save, &[])?;
        self.send_json(request.json(draft), &url).await
    }
}
