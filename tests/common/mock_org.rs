//! wiremock stand-in for a Salesforce org

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::query_result;

/// Token the mock org accepts
pub const TEST_TOKEN: &str = "00DTEST!session-token";

/// Query path for the default API version
pub const QUERY_PATH: &str = "/services/data/v62.0/query";

/// Token validation query sent by `Session::login`
pub const SANDBOX_SOQL: &str = "SELECT IsSandbox FROM Organization LIMIT 1";

/// Log listing query for a threshold
pub fn apex_log_soql(min_length: u64) -> String {
    format!(
        "SELECT Id, StartTime, Location, LogLength FROM ApexLog \
         WHERE LogLength > {min_length} AND StartTime = TODAY ORDER BY LogLength DESC"
    )
}

/// Mock org with builder-style endpoint registration
pub struct MockOrg {
    /// Underlying server; its `uri()` is the instance host to configure
    pub server: MockServer,
}

impl MockOrg {
    /// Start a server that accepts [`TEST_TOKEN`] on the validation query
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .and(query_param("q", SANDBOX_SOQL))
            .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(query_result(vec![
                serde_json::json!({
                    "attributes": {"type": "Organization"},
                    "IsSandbox": true
                }),
            ])))
            .mount(&server)
            .await;
        Self { server }
    }

    /// Instance host pointing at the mock server
    pub fn host(&self) -> String {
        self.server.uri()
    }

    /// Answer the log query for `min_length` with these rows
    pub async fn with_logs(&self, min_length: u64, rows: Vec<serde_json::Value>) {
        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .and(query_param("q", apex_log_soql(min_length)))
            .respond_with(ResponseTemplate::new(200).set_body_json(query_result(rows)))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Serve a log body, expecting exactly `times` downloads
    pub async fn with_body(&self, id: &str, body: Vec<u8>, times: u64) {
        Mock::given(method("GET"))
            .and(path("/apexdebug/traceDownload.apexp"))
            .and(query_param("id", id))
            .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Fail the download of one log with `status`
    pub async fn with_failing_body(&self, id: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path("/apexdebug/traceDownload.apexp"))
            .and(query_param("id", id))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Assert that no download request reached the server
    pub async fn assert_no_downloads(&self) {
        let requests = self.server.received_requests().await.unwrap_or_default();
        assert!(
            requests
                .iter()
                .all(|r| r.url.path() != "/apexdebug/traceDownload.apexp"),
            "unexpected download request"
        );
    }
}
