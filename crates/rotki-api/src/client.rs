// Async HTTP client for the rotki backend REST API.
//
// Base path: /api/1/
// Every response body is a `{ result, message }` envelope; this module strips
// it so endpoint methods only ever see the payload.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::models::ApiResponse;
use crate::transport::TransportConfig;

const API_PREFIX: &str = "api/1/";

/// Async client for the rotki backend.
///
/// Endpoint groups (tasks, DeFi modules, blockchains, settings) are
/// implemented as inherent methods in sibling modules so this file stays
/// focused on transport mechanics.
#[derive(Debug, Clone)]
pub struct RotkiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RotkiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the backend at `base_url` (e.g. `http://127.0.0.1:4242`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Append `/api/1/` unless the caller already pointed at it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api/1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/{API_PREFIX}"));
        }

        Ok(url)
    }

    /// The normalized API root (always ends with `/api/1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    /// GET that returns the decoded envelope whatever the HTTP status.
    ///
    /// The task endpoint reports a failed task with the failing query's
    /// status code but still carries a meaningful `result`.
    pub(crate) async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<(reqwest::StatusCode, ApiResponse<T>), Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => Ok((status, envelope)),
            Err(_) if !status.is_success() => Err(Self::parse_error(status, &body)),
            Err(e) => Err(Error::Deserialization {
                message: e.to_string(),
                body,
            }),
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &body));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        envelope.result.ok_or_else(|| Error::Api {
            status: status.as_u16(),
            message: if envelope.message.is_empty() {
                "response carried no result".into()
            } else {
                envelope.message
            },
        })
    }

    fn parse_error(status: reqwest::StatusCode, raw: &str) -> Error {
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(raw)
            .ok()
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.to_owned()
                }
            });

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Error::Authentication { message },
            reqwest::StatusCode::CONFLICT => Error::Conflict { message },
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
