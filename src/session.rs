//! Authenticated Salesforce REST session.
//!
//! A [`Session`] wraps an HTTP client whose default headers carry the bearer
//! token, plus the instance base URL and API version every other call needs.
//! It is created once by [`Session::login`] and only read afterwards.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::AuthError;
use crate::query::{QueryResponse, api_error_message, sandbox_check_query};

#[derive(Debug, Deserialize)]
struct OrganizationRow {
    #[serde(rename = "IsSandbox")]
    is_sandbox: bool,
}

/// Authenticated handle for the Salesforce REST API
#[derive(Clone)]
pub struct Session {
    base_url: Url,
    api_version: String,
    client: reqwest::Client,
    is_sandbox: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .field("is_sandbox", &self.is_sandbox)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Build a session from the configured instance and token and confirm the
    /// token is live
    ///
    /// One attempt, no retries. Any failure, including transport errors, is
    /// returned as an [`AuthError`].
    pub async fn login(config: &Config) -> Result<Self, AuthError> {
        let host = config.instance_host.trim();
        let base_url = instance_base_url(host)?;

        let mut token = HeaderValue::from_str(&format!("Bearer {}", config.auth_token.trim()))
            .map_err(|_| AuthError::MalformedToken)?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-prettyprint"),
            HeaderValue::from_static("1"),
        );

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| AuthError::Network {
                host: host.to_string(),
                source,
            })?;

        let mut session = Self {
            base_url,
            api_version: config.api_version.clone(),
            client,
            is_sandbox: false,
        };

        session.is_sandbox = session.check_sandbox(host).await?;
        tracing::debug!(
            instance = %session.base_url,
            api_version = %session.api_version,
            sandbox = session.is_sandbox,
            "session validated"
        );

        Ok(session)
    }

    /// Run the sandbox query; a successful answer proves the token works
    async fn check_sandbox(&self, host: &str) -> Result<bool, AuthError> {
        let network = |source| AuthError::Network {
            host: host.to_string(),
            source,
        };

        let soql = sandbox_check_query().build();
        let response = self.send_query(&soql).await.map_err(network)?;

        let status = response.status();
        let body = response.text().await.map_err(network)?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AuthError::InvalidToken {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(AuthError::ValidationFailed {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let parsed: QueryResponse<OrganizationRow> = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        parsed
            .records
            .first()
            .map(|org| org.is_sandbox)
            .ok_or_else(|| {
                AuthError::InvalidResponse("organization query returned no rows".into())
            })
    }

    /// Issue a SOQL query against the REST query endpoint
    pub(crate) async fn send_query(&self, soql: &str) -> reqwest::Result<reqwest::Response> {
        let mut url = self.data_url("query");
        url.query_pairs_mut().append_pair("q", soql);
        tracing::debug!(soql, "sending query");
        self.client.get(url).send().await
    }

    /// Versioned REST URL, e.g. `/services/data/v62.0/query`
    pub fn data_url(&self, resource: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!(
            "/services/data/v{}/{}",
            self.api_version,
            resource.trim_start_matches('/')
        ));
        url
    }

    /// Instance root URL (scheme and host)
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Host name of the instance
    pub fn instance_host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    /// Negotiated REST API version
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Whether the org answered as a sandbox during validation
    pub fn is_sandbox(&self) -> bool {
        self.is_sandbox
    }

    /// HTTP client carrying the session's auth headers
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Turn the configured host into a root URL, assuming HTTPS when no scheme is given
fn instance_base_url(host: &str) -> Result<Url, AuthError> {
    let invalid = |reason: String| AuthError::InvalidInstance {
        host: host.to_string(),
        reason,
    };

    let host_only = host.trim_end_matches('/');
    if host_only.is_empty() {
        return Err(invalid("instance host is empty".into()));
    }

    let raw = if host_only.contains("://") {
        host_only.to_string()
    } else {
        format!("https://{host_only}")
    };

    let url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("no host name".into()));
    }
    Ok(url)
}
