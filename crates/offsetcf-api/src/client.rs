// OffsetCF REST client
//
// Wraps `reqwest::Client` with URL construction, status mapping, and
// body decoding. Endpoint groups (merchants, stores, opt-ins) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Production API host, used when no override is configured.
pub const DEFAULT_API_URL: &str = "https://api.offsetcf.com";

/// Error body shape returned by the backend on failures.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Async HTTP client for the OffsetCF merchant API.
///
/// All methods return decoded payloads; non-success statuses surface as
/// [`Error::Api`] with the backend's message when one is provided.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root (e.g. `https://api.offsetcf.com`). A path
    /// prefix is preserved, so `https://host/api` yields `https://host/api/merchants`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::validate_base(&base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        Self::validate_base(&base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        })
    }

    /// Client pointed at [`DEFAULT_API_URL`].
    pub fn production(transport: &TransportConfig) -> Result<Self, Error> {
        Self::new(Url::parse(DEFAULT_API_URL)?, transport)
    }

    fn validate_base(base_url: &Url) -> Result<(), Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }
        Ok(())
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// Store identifiers are shop domains (`name.myshopify.com`) and must
    /// land as a single segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        self.handle_response(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::check_status(resp).await.map(drop)
    }

    /// GET a binary payload (CSV export), bypassing JSON decoding.
    pub(crate) async fn get_bytes(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<Bytes, Error> {
        debug!("GET {url} params={params:?} (binary)");

        let resp = self
            .http
            .get(url)
            .query(params)
            .header(ACCEPT, "text/csv, application/octet-stream")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let resp = Self::check_status(resp).await?;
        let bytes = resp.bytes().await.map_err(|e| self.map_send_error(e))?;
        trace!(len = bytes.len(), "received binary payload");
        Ok(bytes)
    }

    // ── Response handling ────────────────────────────────────────────

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Map non-success statuses to [`Error::Api`], passing the response
    /// through untouched otherwise.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                let preview: String = body.chars().take(200).collect();
                if preview.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                } else {
                    preview
                }
            });

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await.map_err(|e| self.map_send_error(e))?;

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn url_joins_segments_onto_root() {
        let c = client("https://api.offsetcf.com");
        let url = c.url(&["merchants", "m-1"]).unwrap();
        assert_eq!(url.as_str(), "https://api.offsetcf.com/merchants/m-1");
    }

    #[test]
    fn url_preserves_path_prefix() {
        let c = client("https://example.test/api/");
        let url = c.url(&["stores"]).unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/stores");
    }

    #[test]
    fn url_encodes_each_segment() {
        let c = client("https://api.offsetcf.com");
        let url = c.url(&["merchants", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "https://api.offsetcf.com/merchants/a%2Fb%20c");
    }

    #[test]
    fn rejects_cannot_be_a_base_url() {
        let result =
            ApiClient::with_client(reqwest::Client::new(), Url::parse("mailto:ops@x.y").unwrap());
        assert!(matches!(result, Err(Error::InvalidBaseUrl { .. })));
    }
}
