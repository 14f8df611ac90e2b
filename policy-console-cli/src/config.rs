//! Runtime settings resolved from flags and environment

use anyhow::Context;
use policy_console_gateway::{EndpointConfig, HttpPolicyGateway};
use std::time::Duration;
use url::Url;

use crate::Cli;

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: Url,
    pub timeout: Duration,
    pub endpoints: EndpointConfig,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let endpoints = match &cli.endpoints {
            Some(path) => EndpointConfig::from_json_file(path)
                .with_context(|| format!("failed to load endpoints from {}", path.display()))?,
            None => EndpointConfig::default(),
        };

        Ok(Self {
            api_url: cli.api_url.clone(),
            timeout: Duration::from_secs(cli.timeout),
            endpoints,
        })
    }

    pub fn gateway(&self) -> anyhow::Result<HttpPolicyGateway> {
        tracing::debug!("Using policy API at {} (timeout {:?})", self.api_url, self.timeout);
        HttpPolicyGateway::with_timeout(self.api_url.clone(), self.endpoints.clone(), self.timeout)
            .context("failed to build HTTP client")
    }
}
