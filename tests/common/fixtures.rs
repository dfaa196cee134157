//! ApexLog query rows and log bodies used across tests

/// The three SystemLog records from a real org export, largest first
pub const SAMPLE_LOGS: [(&str, u64); 3] = [
    ("07LUE000009slSz2AI", 13864),
    ("07LUE000009shu62AA", 13861),
    ("07LUE000009sdhB2AQ", 13860),
];

/// Start of a typical Apex debug log body
pub const LOG_BODY_HEADER: &str = "62.0 APEX_CODE,FINEST;APEX_PROFILING,INFO;CALLOUT,INFO;DB,INFO\n\
09:43:13.0 (1234567)|USER_INFO|[EXTERNAL]|005000000000001|user@example.com|(GMT+00:00)\n\
09:43:13.0 (2345678)|EXECUTION_STARTED\n";

/// One `ApexLog` row as returned by the REST query endpoint
pub fn apex_log_row(id: &str, length: u64) -> serde_json::Value {
    serde_json::json!({
        "attributes": {
            "type": "ApexLog",
            "url": format!("/services/data/v62.0/sobjects/ApexLog/{id}")
        },
        "Id": id,
        "StartTime": "2025-04-17T09:43:13.000+0000",
        "Location": "SystemLog",
        "LogLength": length
    })
}

/// A complete query response wrapping the given rows
pub fn query_result(rows: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "totalSize": rows.len(),
        "done": true,
        "records": rows
    })
}

/// Distinct body for a log id so written files can be told apart
pub fn log_body(id: &str) -> Vec<u8> {
    format!("{LOG_BODY_HEADER}09:43:14.0 (3456789)|CODE_UNIT_STARTED|{id}\n").into_bytes()
}
