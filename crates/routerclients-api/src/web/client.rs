// Web API HTTP client
//
// Wraps `reqwest::Client` with router-specific URL construction, the
// `asus_token` cookie and the `Referer` header the firmware insists on.
// Login/logout live in `auth.rs`; this file covers the data hooks.

use std::collections::HashMap;
use std::fmt;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, COOKIE, REFERER};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::web::models::{ClientListEnvelope, ClientRecord, is_client_entry, value_to_string};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "asus_token";

/// Separator between hook calls in one `appGet.cgi` query, pre-encoded `;`.
const HOOK_SEPARATOR: &str = "%3B";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Authenticated session handle returned by [`AsusWebClient::login`].
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub(crate) fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.0.expose_secret())
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(**redacted**)")
    }
}

/// HTTP client for the router's local management API.
///
/// Stateless apart from the base URL: the session token is passed into
/// every call, so one client can serve consecutive logins.
#[derive(Debug)]
pub struct AsusWebClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AsusWebClient {
    /// Create a client for the router at `base_url` (e.g. `http://192.168.1.1`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Absolute URL of a UI page, used for both endpoints and `Referer`.
    pub(crate) fn page_url(&self, page: &str) -> Result<Url, Error> {
        Url::parse(&format!("{}/{page}", self.base())).map_err(Error::InvalidUrl)
    }

    /// `appGet.cgi?hook=...` with the hook string passed through verbatim.
    ///
    /// The firmware parses the raw query itself, so the hook must not be
    /// re-encoded by a query builder.
    fn hook_url(&self, hook: &str) -> Result<Url, Error> {
        Url::parse(&format!("{}/appGet.cgi?hook={hook}", self.base())).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get_hook<T: DeserializeOwned>(
        &self,
        token: &SessionToken,
        hook: &str,
        endpoint: &str,
    ) -> Result<T, Error> {
        let url = self.hook_url(hook)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(REFERER, self.page_url("index.asp")?.as_str())
            .header(COOKIE, token.cookie_header())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Http {
                status: status.as_u16(),
                endpoint: endpoint.to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(endpoint, bytes = body.len(), "hook response");

        serde_json::from_str(&body).map_err(|e| {
            let preview = body
                .char_indices()
                .nth(200)
                .map_or(body.as_str(), |(idx, _)| &body[..idx]);
            Error::Deserialization {
                message: format!("{endpoint}: {e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    // ── Data hooks ───────────────────────────────────────────────────

    /// Every client the router currently knows about, online or not.
    ///
    /// Metadata entries mixed into the same map are skipped, as are
    /// entries whose shape can't be read as a client.
    pub async fn client_list(&self, token: &SessionToken) -> Result<Vec<ClientRecord>, Error> {
        let envelope: ClientListEnvelope = self
            .get_hook(token, "get_clientlist()", "get_clientlist")
            .await?;

        let clients = envelope
            .get_clientlist
            .into_iter()
            .filter(|(_, value)| is_client_entry(value))
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(key, error = %e, "skipping unreadable client entry");
                    None
                }
            })
            .collect();

        Ok(clients)
    }

    /// Read a batch of nvram variables in one request.
    ///
    /// Values come back ASCII-escaped by `nvram_char_to_ascii`; decoding is
    /// left to the caller. Variables the router doesn't know are absent.
    pub async fn nvram(
        &self,
        token: &SessionToken,
        keys: &[String],
    ) -> Result<HashMap<String, String>, Error> {
        let hook = keys
            .iter()
            .map(|key| format!("nvram_char_to_ascii({key},{key})"))
            .collect::<Vec<_>>()
            .join(HOOK_SEPARATOR);

        let values: HashMap<String, Value> = self.get_hook(token, &hook, "nvram").await?;

        Ok(values
            .into_iter()
            .map(|(key, value)| (key, value_to_string(value)))
            .collect())
    }
}
