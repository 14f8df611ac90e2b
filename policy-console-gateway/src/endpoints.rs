//! REST endpoint templates of the policy API

use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::GatewayError;

/// Path templates for each gateway operation, relative to the API base URL.
///
/// A `{name}` placeholder must fill a whole path segment; the substituted
/// value is percent-encoded as a single segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub fetch_by_fragment: String,
    pub fetch_all: String,
    pub create: String,
    pub delete: String,
    pub run: String,
    pub fetch_fake: String,
    pub stop: String,
    pub save: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            fetch_by_fragment: "/policy/fragment/{type}/{id}".to_string(),
            fetch_all: "/policy/all".to_string(),
            create: "/policy".to_string(),
            delete: "/policy/{id}".to_string(),
            run: "/policy/run/{id}".to_string(),
            fetch_fake: "/data-templates/fake_policy.json".to_string(),
            stop: "/policyContext".to_string(),
            save: "/policy".to_string(),
        }
    }
}

impl EndpointConfig {
    /// Load templates from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::InvalidEndpoint(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Resolve `template` against `base`, substituting `params`.
    pub fn resolve(
        base: &Url,
        template: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, GatewayError> {
        let mut segments = Vec::new();
        for segment in template.split('/').filter(|s| !s.is_empty()) {
            let value = match segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
            {
                Some(name) => params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| {
                        GatewayError::InvalidEndpoint(format!(
                            "no value for placeholder '{{{}}}' in '{}'",
                            name, template
                        ))
                    })?,
                None => segment,
            };
            segments.push(value);
        }

        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidEndpoint(format!("{} cannot be a base URL", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:9090").unwrap()
    }

    #[test]
    fn test_resolve_plain_template() {
        let url = EndpointConfig::resolve(&base(), "/policy/all", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9090/policy/all");
    }

    #[test]
    fn test_resolve_substitutes_and_encodes_segments() {
        let url = EndpointConfig::resolve(
            &base(),
            "/policy/fragment/{type}/{id}",
            &[("type", "input"), ("id", "a b/c")],
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://localhost:9090/policy/fragment/input/a%20b%2Fc");
    }

    #[test]
    fn test_resolve_keeps_base_path_prefix() {
        let base = Url::parse("http://localhost:9090/sparta/").unwrap();
        let url = EndpointConfig::resolve(&base, "/policy/{id}", &[("id", "42")]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9090/sparta/policy/42");
    }

    #[test]
    fn test_resolve_rejects_unknown_placeholder() {
        let err = EndpointConfig::resolve(&base(), "/policy/{uuid}", &[("id", "1")]).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EndpointConfig =
            serde_json::from_str(r#"{"fetch_all": "/v2/policies"}"#).unwrap();
        assert_eq!(config.fetch_all, "/v2/policies");
        assert_eq!(config.create, EndpointConfig::default().create);
    }
}
