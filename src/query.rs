//! Apex log listing.
//!
//! Builds the `ApexLog` SOQL query, sends it through the session and turns the
//! result into typed [`LogRecord`]s, largest first.

use serde::Deserialize;

use crate::error::ListError;
use crate::session::Session;
use crate::types::LogRecord;

/// Body of a REST query response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse<T> {
    /// Total number of matching rows on the server
    #[serde(default)]
    pub total_size: u64,
    /// False when more batches are available through `next_records_url`
    #[serde(default = "default_done")]
    pub done: bool,
    /// Rows in this batch
    pub records: Vec<T>,
    /// Locator of the next batch, if any
    #[serde(default)]
    pub next_records_url: Option<String>,
}

fn default_done() -> bool {
    true
}

/// One entry of a Salesforce REST error body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorEntry {
    error_code: String,
    message: String,
}

/// Render a Salesforce error body (`[{"errorCode": .., "message": ..}]`) for logs
///
/// Falls back to the raw body when it is not in that shape.
pub(crate) fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<Vec<ApiErrorEntry>>(body) {
        Ok(entries) if !entries.is_empty() => entries
            .iter()
            .map(|e| format!("{}: {}", e.error_code, e.message))
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.trim().to_string(),
    }
}

/// A SOQL literal in a WHERE condition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SoqlValue {
    /// Unsigned integer literal
    Unsigned(u64),
    /// Date literal such as `TODAY` or `LAST_N_DAYS:7`, emitted verbatim
    DateLiteral(&'static str),
}

impl std::fmt::Display for SoqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoqlValue::Unsigned(v) => write!(f, "{v}"),
            SoqlValue::DateLiteral(v) => f.write_str(v),
        }
    }
}

/// Minimal SOQL builder: one object, AND-ed conditions, one descending sort key
#[derive(Clone, Debug)]
pub struct SoqlQuery {
    fields: Vec<&'static str>,
    object: &'static str,
    conditions: Vec<(&'static str, &'static str, SoqlValue)>,
    order_by_desc: Option<&'static str>,
    limit: Option<u32>,
}

impl SoqlQuery {
    /// Start a `SELECT <fields> FROM <object>` query
    pub fn select(fields: &[&'static str], object: &'static str) -> Self {
        Self {
            fields: fields.to_vec(),
            object,
            conditions: Vec::new(),
            order_by_desc: None,
            limit: None,
        }
    }

    /// Add `field <op> value` to the WHERE clause
    pub fn filter(mut self, field: &'static str, op: &'static str, value: SoqlValue) -> Self {
        self.conditions.push((field, op, value));
        self
    }

    /// Sort by `field`, largest first
    pub fn order_by_desc(mut self, field: &'static str) -> Self {
        self.order_by_desc = Some(field);
        self
    }

    /// Set the LIMIT clause
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the query text
    pub fn build(&self) -> String {
        let mut clauses = vec![format!(
            "SELECT {} FROM {}",
            self.fields.join(", "),
            self.object
        )];
        for (i, (field, op, value)) in self.conditions.iter().enumerate() {
            let keyword = if i == 0 { "WHERE" } else { "AND" };
            clauses.push(format!("{keyword} {field} {op} {value}"));
        }
        if let Some(field) = self.order_by_desc {
            clauses.push(format!("ORDER BY {field} DESC"));
        }
        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {limit}"));
        }
        clauses.join(" ")
    }
}

/// Query reading the org's sandbox flag; cheap and readable by any API user
pub fn sandbox_check_query() -> SoqlQuery {
    SoqlQuery::select(&["IsSandbox"], "Organization").limit(1)
}

/// Query selecting today's Apex logs larger than `min_length` bytes, largest first
pub fn apex_log_query(min_length: u64) -> SoqlQuery {
    SoqlQuery::select(&["Id", "StartTime", "Location", "LogLength"], "ApexLog")
        .filter("LogLength", ">", SoqlValue::Unsigned(min_length))
        .filter("StartTime", "=", SoqlValue::DateLiteral("TODAY"))
        .order_by_desc("LogLength")
}

/// List today's Apex logs larger than `min_length` bytes
///
/// The result is sorted by length, largest first, whatever order the server
/// answered in. An empty vector means there is nothing to download. Only the
/// first batch of a multi-batch result is returned.
pub async fn list_logs(session: &Session, min_length: u64) -> Result<Vec<LogRecord>, ListError> {
    let soql = apex_log_query(min_length).build();
    let response = session.send_query(&soql).await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ListError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }

    let parsed: QueryResponse<LogRecord> = serde_json::from_str(&body)?;
    if !parsed.done {
        tracing::warn!(
            total = parsed.total_size,
            returned = parsed.records.len(),
            next = parsed.next_records_url.as_deref().unwrap_or_default(),
            "query result has more batches; only the first is processed"
        );
    }

    let mut records = parsed.records;
    let before = records.len();
    records.retain(|r| r.length > min_length);
    if records.len() != before {
        tracing::debug!(
            dropped = before - records.len(),
            min_length,
            "dropped records at or below the length threshold"
        );
    }
    records.sort_by(|a, b| b.length.cmp(&a.length));

    Ok(records)
}
