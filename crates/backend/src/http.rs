use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use shared::{BackendConfig, BeaconIdentity};
use tracing::{debug, info, warn};

use crate::{BackendClient, BackendError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    action_uuid: Option<String>,
}

/// Backend client speaking JSON over HTTP
pub struct HttpBackendClient {
    client: Client,
    base_url: Url,
}

impl HttpBackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| BackendError::InvalidConfig(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidConfig(format!(
                "{} cannot be used as a base url",
                config.base_url
            )));
        }

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint<I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidConfig(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn lookup_url(&self, beacon: &BeaconIdentity) -> Result<Url> {
        self.endpoint([
            "beacons".to_string(),
            beacon.vendor_id.to_string(),
            beacon.major.to_string(),
            beacon.minor.to_string(),
            "action".to_string(),
        ])
    }

    pub(crate) fn perform_url(&self, action_id: &str) -> Result<Url> {
        self.endpoint(["actions", action_id, "perform"])
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn lookup_action(&self, beacon: &BeaconIdentity) -> Result<Option<String>> {
        let url = self.lookup_url(beacon)?;
        debug!(%url, "Looking up action for beacon");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::LookupFailed(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(beacon = %beacon, "No action registered for beacon");
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, "Action lookup rejected");
            return Err(BackendError::LookupFailed(format!(
                "backend returned status {}: {}",
                status, error_text
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| BackendError::UnexpectedResponse(e.to_string()))?;

        Ok(body.action_uuid)
    }

    async fn perform_action(&self, action_id: &str) -> Result<()> {
        let url = self.perform_url(action_id)?;
        info!(action_id, "Performing action");

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| BackendError::ActionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let reason = if error_text.trim().is_empty() {
                format!("backend returned status {}", status)
            } else {
                error_text
            };
            return Err(BackendError::ActionFailed(reason));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn client(base_url: &str) -> HttpBackendClient {
        HttpBackendClient::new(&BackendConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_lookup_url() {
        let vendor_id = Uuid::parse_str("33013f7f-cb46-4db6-b4be-542c310a81eb").unwrap();
        let beacon = BeaconIdentity::new(vendor_id, 204, 7);

        let url = client("http://localhost:8080/api/").lookup_url(&beacon).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/beacons/33013f7f-cb46-4db6-b4be-542c310a81eb/204/7/action"
        );
    }

    #[test]
    fn test_perform_url_encodes_action_id() {
        let url = client("http://localhost:8080").perform_url("abc/123").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/actions/abc%2F123/perform");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpBackendClient::new(&BackendConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(BackendError::InvalidConfig(_))));

        let result = HttpBackendClient::new(&BackendConfig {
            base_url: "mailto:pay@example.com".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(BackendError::InvalidConfig(_))));
    }
}
